use std::sync::{Arc, Mutex, MutexGuard};
use studybro_core::doubt::{MediaGeneration, OperationKind};
use studybro_core::{Result, StudyError};

/// Session-scoped single-in-flight lock.
///
/// At most one [`OperationKind`] runs at a time. A second start is rejected
/// with [`StudyError::Busy`] instead of being queued.
#[derive(Debug, Clone, Default)]
pub struct OperationGuard {
    running: Arc<Mutex<Option<OperationKind>>>,
}

impl OperationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<OperationKind>> {
        self.running.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Claims the session for `kind`.
    ///
    /// The returned permit releases the session when dropped.
    pub fn try_begin(&self, kind: OperationKind) -> Result<OperationPermit> {
        let mut slot = self.slot();
        if let Some(running) = *slot {
            tracing::debug!("[Guard] Rejected {} while {} is running", kind, running);
            return Err(StudyError::Busy { running });
        }
        *slot = Some(kind);

        Ok(OperationPermit {
            running: Arc::clone(&self.running),
            kind,
        })
    }

    pub fn running(&self) -> Option<OperationKind> {
        *self.slot()
    }

    /// The media flag derived from the running operation.
    pub fn media_generation(&self) -> MediaGeneration {
        self.running()
            .map(|kind| kind.media_generation())
            .unwrap_or_default()
    }
}

/// Proof that the holder owns the session until it is dropped.
#[derive(Debug)]
pub struct OperationPermit {
    running: Arc<Mutex<Option<OperationKind>>>,
    kind: OperationKind,
}

impl OperationPermit {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }
}

impl Drop for OperationPermit {
    fn drop(&mut self) {
        let mut slot = self.running.lock().unwrap_or_else(|e| e.into_inner());
        if *slot == Some(self.kind) {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_operation_is_rejected() {
        let guard = OperationGuard::new();
        let permit = guard.try_begin(OperationKind::GeneratingImage).unwrap();

        let err = guard.try_begin(OperationKind::GeneratingVideo).unwrap_err();
        assert!(matches!(
            err,
            StudyError::Busy {
                running: OperationKind::GeneratingImage
            }
        ));
        assert_eq!(guard.media_generation(), MediaGeneration::Image);
        assert_eq!(permit.kind(), OperationKind::GeneratingImage);
    }

    #[test]
    fn test_drop_releases_session() {
        let guard = OperationGuard::new();
        {
            let _permit = guard.try_begin(OperationKind::Solving).unwrap();
            assert_eq!(guard.running(), Some(OperationKind::Solving));
        }

        assert!(guard.running().is_none());
        assert_eq!(guard.media_generation(), MediaGeneration::None);
        assert!(guard.try_begin(OperationKind::GeneratingVideo).is_ok());
    }

    #[test]
    fn test_clones_share_the_slot() {
        let guard = OperationGuard::new();
        let other = guard.clone();
        let _permit = guard.try_begin(OperationKind::Solving).unwrap();
        assert!(other.try_begin(OperationKind::Solving).unwrap_err().is_busy());
    }
}

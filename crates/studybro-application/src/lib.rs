//! Application layer for StudyBro.
//!
//! Use cases that drive one tutoring session: the solve/stream/persist flow,
//! history replay, diagram and video generation, profile editing and the
//! follow-up chat. Storage and the remote provider are injected as traits.

pub mod chat_service;
pub mod profile_service;
pub mod session;
pub mod solver_usecase;

pub use chat_service::ChatService;
pub use profile_service::ProfileService;
pub use session::{OperationGuard, OperationPermit, SessionState};
pub use solver_usecase::{DoubtSolverUseCase, MediaOutcome, SubmitOutcome};

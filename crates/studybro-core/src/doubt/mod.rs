//! Doubt domain module.
//!
//! Everything a single doubt-solving request needs: the per-request session
//! configuration, the optional photographed question, the transient solver
//! result and the kinds of operations a session can run.
//!
//! # Module Structure
//!
//! - `model`: Language, explanation mode, session configuration and request
//! - `image`: Inline image attachments (data URLs)
//! - `result`: Transient solver result and media-generation flag
//! - `operation`: Kinds of in-flight session operations

mod image;
mod model;
mod operation;
mod result;

// Re-export public API
pub use image::{DEFAULT_IMAGE_MIME, ImageAttachment};
pub use model::{DoubtRequest, ExplanationMode, Language, SessionConfig};
pub use operation::OperationKind;
pub use result::{GENERIC_FAILURE_MESSAGE, MediaGeneration, SolverResult};

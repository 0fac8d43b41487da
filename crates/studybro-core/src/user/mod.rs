//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: User profile domain model
//! - `repository`: Profile persistence trait

mod model;
mod repository;

// Re-export public API
pub use model::UserProfile;
pub use repository::ProfileRepository;

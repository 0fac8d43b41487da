pub mod chat;
pub mod config;
pub mod doubt;
pub mod error;
pub mod history;
pub mod media;
pub mod provider;
pub mod user;

// Re-export common error type
pub use error::{Result, StudyError};

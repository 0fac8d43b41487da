pub mod config_service;
pub mod history_store;
pub mod image_loader;
pub mod media_store;
pub mod paths;
pub mod profile_store;
pub mod secret_service;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::history_store::JsonHistoryRepository;
pub use crate::media_store::FileMediaStore;
pub use crate::paths::StudyPaths;
pub use crate::profile_store::JsonProfileRepository;

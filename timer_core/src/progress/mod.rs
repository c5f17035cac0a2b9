pub mod migrate;
pub mod storage;
pub mod store;

pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{apply_attempt, AttemptRecord, PersistError, ProgressStore};

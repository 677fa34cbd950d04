pub mod pool;
pub mod uploads;

pub use uploads::{MemoryUploadStore, PgUploadStore, UploadStore, UploadedGameRecord};

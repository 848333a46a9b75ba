pub mod config;
pub mod flashcards;
pub mod storage;
pub mod sync;

pub use config::AppConfig;
pub use flashcards::{StudySession, StudySnapshot};

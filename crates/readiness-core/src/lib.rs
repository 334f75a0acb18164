pub mod error;
pub mod models;
pub mod rules;
pub mod source;
pub mod storage;

pub use error::{Error, Result};
pub use rules::evaluate;
pub use source::IssueSource;
pub use storage::{SettingsStore, get_settings, save_settings};

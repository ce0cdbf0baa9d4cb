pub mod app;
pub mod config;
pub mod content;
pub mod error;
pub mod random;
pub mod session;
pub mod stats;
pub mod store;

pub use app::{App, AppAdvance};
pub use config::Config;
pub use content::{Catalog, Difficulty, Level, SentenceTemplate, WordId, WordRecord};
pub use error::CoreError;
pub use session::pool::{QuestionPool, Scope};
pub use session::result::SessionSummary;
pub use session::state::{Answer, Phase, QuestionKind, Session, SessionMode, Snapshot};
pub use stats::profile::StatsProfile;
pub use store::json_store::JsonStore;

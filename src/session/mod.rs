pub mod error;
pub mod facade;
pub mod state;
pub mod types;

pub use error::SessionError;
pub use facade::Session;
pub use state::{ScenarioRecord, SessionState};
pub use types::AnalysisReport;

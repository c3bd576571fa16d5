pub mod history;
pub mod session;

pub use history::CommandHistory;
pub use session::{IssueSummary, Report, Session, SessionError, SolutionSummary};

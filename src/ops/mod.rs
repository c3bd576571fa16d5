pub mod command;
pub mod dispatch;
pub mod issue_ops;
pub mod tag_ops;
pub mod view;

pub use command::{Command, CommandError, CommandResult};
pub use dispatch::{Context, execute};
pub use view::{Filter, IssueView, SortKey};

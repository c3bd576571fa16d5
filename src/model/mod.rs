pub mod config;
pub mod directory;
pub mod field;
pub mod issue;
pub mod issue_list;
pub mod solution;
pub mod versioned;

pub use config::*;
pub use directory::*;
pub use field::FieldError;
pub use issue::*;
pub use issue_list::*;
pub use solution::*;
pub use versioned::*;

pub mod args;
pub mod command_parser;

pub use command_parser::{ParseError, USAGE, parse_command};

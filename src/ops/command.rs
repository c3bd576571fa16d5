use crate::model::directory::Level;
use crate::model::field::FieldError;
use crate::model::issue_list::ListError;
use crate::model::versioned::HistoryError;

use super::view::SortKey;

/// A parsed, field-validated command.
///
/// The parser resolves the command word once; the dispatcher only ever
/// matches on these variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddIssue {
        statement: String,
        description: String,
        tags: Vec<String>,
    },
    AddSolution {
        link: String,
        remark: String,
    },
    /// Edit fields of the selected issue; `None` leaves a field unchanged
    EditIssue {
        statement: Option<String>,
        description: Option<String>,
        tags: Option<Vec<String>>,
    },
    /// Edit fields of the selected solution
    EditSolution {
        link: Option<String>,
        remark: Option<String>,
    },
    /// Delete an issue (at root, by visible index) or a solution of the
    /// selected issue
    Delete {
        index: usize,
    },
    Find {
        keywords: Vec<String>,
    },
    FindTag {
        tag: String,
    },
    AddTag {
        tags: Vec<String>,
    },
    /// Rename `old` to `new` on every issue, or drop it when `new` is `None`
    RefactorTag {
        old: String,
        new: Option<String>,
    },
    List,
    Sort(SortKey),
    Select {
        index: usize,
    },
    Retrieve {
        index: Option<usize>,
    },
    SetPrimary {
        index: usize,
    },
    ResetPrimary,
    Home,
    Undo,
    Redo,
    Clear,
    Exit,
}

const ANYWHERE: &[Level] = &[Level::Root, Level::Issue, Level::Solution];
const ROOT_ONLY: &[Level] = &[Level::Root];
const ISSUE_ONLY: &[Level] = &[Level::Issue];
const SOLUTION_ONLY: &[Level] = &[Level::Solution];
const ISSUE_OR_DEEPER: &[Level] = &[Level::Issue, Level::Solution];
const ROOT_OR_ISSUE: &[Level] = &[Level::Root, Level::Issue];

impl Command {
    /// The command word, as typed in the shell
    pub fn word(&self) -> &'static str {
        match self {
            Command::AddIssue { .. } => "add",
            Command::AddSolution { .. } => "solution",
            Command::EditIssue { .. } | Command::EditSolution { .. } => "edit",
            Command::Delete { .. } => "delete",
            Command::Find { .. } => "find",
            Command::FindTag { .. } => "findtag",
            Command::AddTag { .. } => "tag",
            Command::RefactorTag { .. } => "retag",
            Command::List => "list",
            Command::Sort(_) => "sort",
            Command::Select { .. } => "select",
            Command::Retrieve { .. } => "retrieve",
            Command::SetPrimary { .. } => "star",
            Command::ResetPrimary => "unstar",
            Command::Home => "home",
            Command::Undo => "undo",
            Command::Redo => "redo",
            Command::Clear => "clear",
            Command::Exit => "exit",
        }
    }

    /// Directory levels at which this command may run
    pub fn levels(&self) -> &'static [Level] {
        match self {
            Command::AddIssue { .. } | Command::RefactorTag { .. } => ROOT_ONLY,
            Command::AddSolution { .. } | Command::Retrieve { .. } => ISSUE_OR_DEEPER,
            Command::EditIssue { .. }
            | Command::AddTag { .. }
            | Command::SetPrimary { .. }
            | Command::ResetPrimary => ISSUE_ONLY,
            Command::EditSolution { .. } => SOLUTION_ONLY,
            Command::Delete { .. } | Command::Select { .. } => ROOT_OR_ISSUE,
            Command::Find { .. }
            | Command::FindTag { .. }
            | Command::List
            | Command::Sort(_)
            | Command::Home
            | Command::Undo
            | Command::Redo
            | Command::Clear
            | Command::Exit => ANYWHERE,
        }
    }

    pub fn is_legal_at(&self, level: Level) -> bool {
        self.levels().contains(&level)
    }
}

/// What a successful command hands back to the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// Human-readable feedback
    pub message: String,
    /// Whether a new undo point was created
    pub committed: bool,
    /// Link copied out by `retrieve`
    pub retrieved: Option<String>,
    /// The session should end
    pub exit: bool,
}

impl CommandResult {
    pub fn read_only(message: impl Into<String>) -> Self {
        CommandResult {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn committed(message: impl Into<String>) -> Self {
        CommandResult {
            message: message.into(),
            committed: true,
            ..Default::default()
        }
    }
}

/// Error type for command execution. Every variant leaves the collection,
/// the history and the directory exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("'{command}' is not available at {level} level")]
    WrongDirectory { command: &'static str, level: Level },
    #[error("issue not found: {0}")]
    IssueNotFound(String),
    #[error("solution not found: {0}")]
    SolutionNotFound(String),
    #[error("no issue is tagged #{0}")]
    TagNotFound(String),
    #[error("an issue with this statement already exists: {0}")]
    DuplicateIssue(String),
    #[error("this solution already exists: {0}")]
    DuplicateSolution(String),
    #[error("tag already present: #{0}")]
    DuplicateTag(String),
    #[error("no more commands to undo")]
    NoUndoableState,
    #[error("no more commands to redo")]
    NoRedoableState,
    #[error(transparent)]
    InvalidField(#[from] FieldError),
    #[error("solution {0} is already the primary solution")]
    AlreadyPrimary(usize),
    #[error("this issue has no primary solution")]
    NoPrimarySolution,
}

impl From<ListError> for CommandError {
    /// Issue-collection failures; solution lists map their errors explicitly.
    fn from(err: ListError) -> Self {
        match err {
            ListError::Duplicate(key) => CommandError::DuplicateIssue(key),
            ListError::NotFound(key) => CommandError::IssueNotFound(key),
        }
    }
}

impl From<HistoryError> for CommandError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::NoUndoableState => CommandError::NoUndoableState,
            HistoryError::NoRedoableState => CommandError::NoRedoableState,
        }
    }
}

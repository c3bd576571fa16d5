use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::io::storage::{self, StorageError};
use crate::model::config::AppConfig;
use crate::model::directory::Directory;
use crate::model::issue::{Issue, IssueList};
use crate::model::versioned::VersionedIssueBook;
use crate::ops::command::{Command, CommandError};
use crate::ops::dispatch::{self, Context};
use crate::ops::view::IssueView;
use crate::parse::{ParseError, parse_command};

use super::history::CommandHistory;

/// Error type for one line of input
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Command(#[from] CommandError),
    /// The command ran but its result could not be saved
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// Whether the shell should stop
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::Storage(_))
    }
}

/// One row of the issue listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSummary {
    /// 1-based position in the listing
    pub index: usize,
    /// 1-based storage position
    pub position: usize,
    pub statement: String,
    pub tags: Vec<String>,
    pub frequency: u32,
    pub solution_count: usize,
    pub selected: bool,
}

/// One row of the selected issue's solution listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionSummary {
    pub index: usize,
    pub link: String,
    pub remark: String,
    pub primary: bool,
    pub selected: bool,
}

/// What the presentation gets back after each line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub message: String,
    pub directory: Directory,
    pub issues: Vec<IssueSummary>,
    /// The selected issue's solutions, empty at root
    pub solutions: Vec<SolutionSummary>,
    /// Link copied out by `retrieve`
    pub retrieved: Option<String>,
    pub exit: bool,
}

/// A running tracker: the versioned collection, the navigation state, the
/// listing view and the typed-line history.
#[derive(Debug)]
pub struct Session {
    book: VersionedIssueBook,
    directory: Directory,
    view: IssueView,
    history: CommandHistory,
    data_file: Option<PathBuf>,
    autosave: bool,
}

impl Session {
    /// Start from `issues` with nothing persisted.
    pub fn in_memory(issues: IssueList) -> Self {
        Session {
            book: VersionedIssueBook::new(issues),
            directory: Directory::Root,
            view: IssueView::default(),
            history: CommandHistory::new(),
            data_file: None,
            autosave: false,
        }
    }

    /// Load the collection named by `config` and save back to it.
    pub fn open(config: &AppConfig) -> Result<Self, StorageError> {
        let issues = storage::load_issues(&config.storage.data_file)?;
        let mut session = Session::in_memory(issues);
        session.book = session.book.with_undo_limit(config.history.undo_limit());
        session.data_file = Some(config.storage.data_file.clone());
        session.autosave = config.storage.autosave;
        Ok(session)
    }

    pub fn issues(&self) -> &[Issue] {
        self.book.as_slice()
    }

    pub fn book(&self) -> &VersionedIssueBook {
        &self.book
    }

    pub fn directory(&self) -> Directory {
        self.directory
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut CommandHistory {
        &mut self.history
    }

    /// Run one line at the current time.
    pub fn run_line(&mut self, line: &str) -> Result<Report, SessionError> {
        self.run_line_at(line, Utc::now())
    }

    /// Run one line with `now` as the modification time.
    ///
    /// The line is recorded in the history whether or not it succeeds.
    pub fn run_line_at(&mut self, line: &str, now: DateTime<Utc>) -> Result<Report, SessionError> {
        self.history.push(line.trim());
        let command = parse_command(line)?;
        let mut ctx = Context {
            book: &mut self.book,
            directory: &mut self.directory,
            view: &mut self.view,
        };
        let result = dispatch::execute(&command, &mut ctx, now)?;
        // undo, redo and select change the live collection without committing
        let changed = result.committed
            || matches!(
                command,
                Command::Undo | Command::Redo | Command::Select { .. }
            );
        if changed && self.autosave {
            self.save()?;
        } else if result.exit && !self.autosave && self.data_file.is_some() {
            self.save()?;
        }
        Ok(Report {
            message: result.message,
            directory: self.directory,
            issues: self.listing(),
            solutions: self.solution_listing(),
            retrieved: result.retrieved,
            exit: result.exit,
        })
    }

    /// Write the live collection to the data file, if there is one.
    pub fn save(&self) -> Result<(), StorageError> {
        match &self.data_file {
            Some(path) => storage::save_issues(path, self.book.issues()),
            None => Ok(()),
        }
    }

    /// The current listing under the active filter and sort
    pub fn listing(&self) -> Vec<IssueSummary> {
        let issues = self.book.as_slice();
        let selected = self.directory.issue_index();
        self.view
            .visible(issues)
            .into_iter()
            .enumerate()
            .map(|(i, pos)| {
                let issue = &issues[pos];
                IssueSummary {
                    index: i + 1,
                    position: pos + 1,
                    statement: issue.statement().to_string(),
                    tags: issue.tags().iter().cloned().collect(),
                    frequency: issue.frequency(),
                    solution_count: issue.solutions().len(),
                    selected: pos + 1 == selected,
                }
            })
            .collect()
    }

    /// Solutions of the selected issue. Empty at root, or when the
    /// selection no longer points at an issue.
    pub fn solution_listing(&self) -> Vec<SolutionSummary> {
        let Ok((_, issue)) = dispatch::selected_issue(&self.book, &self.directory) else {
            return Vec::new();
        };
        let selected = match self.directory {
            Directory::Solution { solution, .. } => solution,
            _ => 0,
        };
        issue
            .solutions()
            .iter()
            .enumerate()
            .map(|(i, s)| SolutionSummary {
                index: i + 1,
                link: s.link().to_string(),
                remark: s.remark().to_string(),
                primary: s.is_primary(),
                selected: i + 1 == selected,
            })
            .collect()
    }
}

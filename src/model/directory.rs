use std::fmt;

use serde::Serialize;

/// The current navigation address.
///
/// Indices are 1-based storage positions. `Solution` can only be reached
/// through `Issue`, so "a solution is selected" always implies "an issue is
/// selected".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "level", rename_all = "lowercase")]
pub enum Directory {
    #[default]
    Root,
    Issue { issue: usize },
    Solution { issue: usize, solution: usize },
}

/// The three directory levels, used to declare where a command is legal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Root,
    Issue,
    Solution,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Root => write!(f, "root"),
            Level::Issue => write!(f, "issue"),
            Level::Solution => write!(f, "solution"),
        }
    }
}

/// A selection transition was asked for with an index outside `[1, count]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange {
    pub index: usize,
    pub count: usize,
}

impl Directory {
    pub fn level(self) -> Level {
        match self {
            Directory::Root => Level::Root,
            Directory::Issue { .. } => Level::Issue,
            Directory::Solution { .. } => Level::Solution,
        }
    }

    /// Selected issue position, 0 when at root.
    pub fn issue_index(self) -> usize {
        match self {
            Directory::Root => 0,
            Directory::Issue { issue } | Directory::Solution { issue, .. } => issue,
        }
    }

    /// Selected solution position, 0 unless at solution level.
    pub fn solution_index(self) -> usize {
        match self {
            Directory::Solution { solution, .. } => solution,
            _ => 0,
        }
    }

    /// Root → Issue. `issue` must lie in `[1, issue_count]`.
    ///
    /// Only valid from `Root`; callers gate on level before calling.
    pub fn select_issue(self, issue: usize, issue_count: usize) -> Result<Directory, OutOfRange> {
        debug_assert_eq!(self.level(), Level::Root);
        if issue == 0 || issue > issue_count {
            return Err(OutOfRange {
                index: issue,
                count: issue_count,
            });
        }
        Ok(Directory::Issue { issue })
    }

    /// Issue → Solution. `solution` must lie in `[1, solution_count]`.
    pub fn select_solution(
        self,
        solution: usize,
        solution_count: usize,
    ) -> Result<Directory, OutOfRange> {
        debug_assert_eq!(self.level(), Level::Issue);
        if solution == 0 || solution > solution_count {
            return Err(OutOfRange {
                index: solution,
                count: solution_count,
            });
        }
        Ok(Directory::Solution {
            issue: self.issue_index(),
            solution,
        })
    }

    /// Any → Root.
    pub fn home(self) -> Directory {
        Directory::Root
    }
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directory::Root => write!(f, "/"),
            Directory::Issue { issue } => write!(f, "/{}", issue),
            Directory::Solution { issue, solution } => write!(f, "/{}/{}", issue, solution),
        }
    }
}

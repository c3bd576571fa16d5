//! Builders for modified issue values.
//!
//! Every function takes the current issue by reference and returns the
//! replacement value; nothing here touches the collection. The dispatcher
//! substitutes the result and commits.

use chrono::{DateTime, Utc};

use crate::model::issue::Issue;
use crate::model::issue_list::{ListError, UniqueList};
use crate::model::solution::Solution;

use super::command::CommandError;

/// Field overrides for an issue edit. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueEdit {
    pub statement: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

fn solution_error(err: ListError) -> CommandError {
    match err {
        ListError::Duplicate(key) => CommandError::DuplicateSolution(key),
        ListError::NotFound(key) => CommandError::SolutionNotFound(key),
    }
}

/// The solution at 1-based `index`, or `SolutionNotFound`.
pub fn solution_at(issue: &Issue, index: usize) -> Result<&Solution, CommandError> {
    index
        .checked_sub(1)
        .and_then(|i| issue.solutions().get(i))
        .ok_or_else(|| CommandError::SolutionNotFound(format!("index {}", index)))
}

/// Apply the supplied overrides, leaving the rest of the issue as is.
pub fn edit_issue(
    issue: &Issue,
    edit: &IssueEdit,
    now: DateTime<Utc>,
) -> Result<Issue, CommandError> {
    let mut edited = issue.clone();
    if let Some(statement) = &edit.statement {
        edited = edited.with_statement(statement, now)?;
    }
    if let Some(description) = &edit.description {
        edited = edited.with_description(description, now)?;
    }
    if let Some(tags) = &edit.tags {
        edited = edited.with_tags(tags, now)?;
    }
    Ok(edited)
}

/// Append `solution`, rejecting a link + remark pair the issue already has.
pub fn add_solution(
    issue: &Issue,
    solution: Solution,
    now: DateTime<Utc>,
) -> Result<Issue, CommandError> {
    let mut solutions = issue.solutions().clone();
    solutions.add(solution).map_err(solution_error)?;
    Ok(issue.clone().with_solutions(solutions, now)?)
}

/// Replace the link and/or remark of the solution at 1-based `index`.
pub fn edit_solution(
    issue: &Issue,
    index: usize,
    link: Option<&str>,
    remark: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Issue, CommandError> {
    let target = solution_at(issue, index)?;
    let replacement = target.with_fields(link, remark)?;
    let mut solutions = issue.solutions().clone();
    solutions.replace(target, replacement).map_err(solution_error)?;
    Ok(issue.clone().with_solutions(solutions, now)?)
}

/// Drop the solution at 1-based `index`. Returns the new issue and the
/// removed solution.
pub fn delete_solution(
    issue: &Issue,
    index: usize,
    now: DateTime<Utc>,
) -> Result<(Issue, Solution), CommandError> {
    let target = solution_at(issue, index)?;
    let mut solutions = issue.solutions().clone();
    let removed = solutions.remove(target).map_err(solution_error)?;
    Ok((issue.clone().with_solutions(solutions, now)?, removed))
}

/// Flag the solution at 1-based `index` as primary, clearing any other.
pub fn set_primary(issue: &Issue, index: usize, now: DateTime<Utc>) -> Result<Issue, CommandError> {
    let target = solution_at(issue, index)?;
    if target.is_primary() {
        return Err(CommandError::AlreadyPrimary(index));
    }
    let flagged: Vec<Solution> = issue
        .solutions()
        .iter()
        .enumerate()
        .map(|(i, s)| s.with_primary(i + 1 == index))
        .collect();
    let solutions = UniqueList::from_vec(flagged).map_err(solution_error)?;
    Ok(issue.clone().with_solutions(solutions, now)?)
}

/// Clear the primary flag. Fails if no solution carries it.
pub fn reset_primary(issue: &Issue, now: DateTime<Utc>) -> Result<Issue, CommandError> {
    if issue.primary_solution().is_none() {
        return Err(CommandError::NoPrimarySolution);
    }
    let cleared: Vec<Solution> = issue.solutions().iter().map(|s| s.with_primary(false)).collect();
    let solutions = UniqueList::from_vec(cleared).map_err(solution_error)?;
    Ok(issue.clone().with_solutions(solutions, now)?)
}

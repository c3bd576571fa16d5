use chrono::{DateTime, Utc};

use crate::model::directory::{Directory, Level};
use crate::model::issue::Issue;
use crate::model::solution::Solution;
use crate::model::versioned::VersionedIssueBook;

use super::command::{Command, CommandError, CommandResult};
use super::issue_ops::{self, IssueEdit};
use super::tag_ops;
use super::view::{Filter, IssueView};

/// The state one command runs against. Borrowed from the session for the
/// duration of a single `execute` call.
pub struct Context<'a> {
    pub book: &'a mut VersionedIssueBook,
    pub directory: &'a mut Directory,
    pub view: &'a mut IssueView,
}

/// Run `command` against `ctx`.
///
/// On success the collection has been mutated and committed at most once.
/// On error nothing in `ctx` has changed.
pub fn execute(
    command: &Command,
    ctx: &mut Context<'_>,
    now: DateTime<Utc>,
) -> Result<CommandResult, CommandError> {
    let directory = *ctx.directory;
    let level = directory.level();
    if !command.is_legal_at(level) {
        tracing::debug!(command = command.word(), %level, "rejected: wrong directory");
        return Err(CommandError::WrongDirectory {
            command: command.word(),
            level,
        });
    }
    tracing::debug!(command = command.word(), %directory, "executing");

    match command {
        Command::AddIssue {
            statement,
            description,
            tags,
        } => add_issue(ctx, statement, description, tags, now),
        Command::AddSolution { link, remark } => add_solution(ctx, link, remark, now),
        Command::EditIssue {
            statement,
            description,
            tags,
        } => {
            let edit = IssueEdit {
                statement: statement.clone(),
                description: description.clone(),
                tags: tags.clone(),
            };
            edit_issue(ctx, &edit, now)
        }
        Command::EditSolution { link, remark } => {
            edit_solution(ctx, link.as_deref(), remark.as_deref(), now)
        }
        Command::Delete { index } => match level {
            Level::Root => delete_issue(ctx, *index),
            _ => delete_solution(ctx, *index, now),
        },
        Command::Find { keywords } => {
            let filter = Filter::keywords(keywords).map_err(|e| {
                CommandError::InvalidField(crate::model::FieldError {
                    field: "keywords",
                    reason: e.to_string(),
                })
            })?;
            ctx.view.filter = filter;
            Ok(CommandResult::read_only(listed_message(ctx)))
        }
        Command::FindTag { tag } => {
            let tag = crate::model::field::validate_tag(tag)?;
            ctx.view.filter = Filter::Tag(tag);
            Ok(CommandResult::read_only(listed_message(ctx)))
        }
        Command::AddTag { tags } => add_tags(ctx, tags, now),
        Command::RefactorTag { old, new } => refactor_tag(ctx, old, new.as_deref(), now),
        Command::List => {
            ctx.view.reset();
            Ok(CommandResult::read_only(listed_message(ctx)))
        }
        Command::Sort(key) => {
            ctx.view.sort = Some(*key);
            Ok(CommandResult::read_only(format!("Sorted by {}", key)))
        }
        Command::Select { index } => match level {
            Level::Root => select_issue(ctx, *index),
            _ => select_solution(ctx, *index),
        },
        Command::Retrieve { index } => retrieve(ctx, *index),
        Command::SetPrimary { index } => set_primary(ctx, *index, now),
        Command::ResetPrimary => reset_primary(ctx, now),
        Command::Home => {
            *ctx.directory = ctx.directory.home();
            Ok(CommandResult::read_only("Moved to root"))
        }
        Command::Undo => {
            ctx.book.undo()?;
            ctx.view.reset();
            Ok(CommandResult::read_only("Undo successful"))
        }
        Command::Redo => {
            ctx.book.redo()?;
            ctx.view.reset();
            Ok(CommandResult::read_only("Redo successful"))
        }
        Command::Clear => {
            ctx.book.issues_mut().set_all(Vec::new())?;
            ctx.book.commit();
            *ctx.directory = Directory::Root;
            ctx.view.reset();
            Ok(CommandResult::committed("All issues cleared"))
        }
        Command::Exit => Ok(CommandResult {
            message: "Goodbye".into(),
            exit: true,
            ..Default::default()
        }),
    }
}

// ---------------------------------------------------------------------------
// Selection helpers
// ---------------------------------------------------------------------------

/// The selected issue and its 0-based storage position.
///
/// A selection can go stale after undo, redo or a delete elsewhere; that
/// surfaces here as `IssueNotFound` rather than being corrected.
pub fn selected_issue<'a>(
    book: &'a VersionedIssueBook,
    directory: &Directory,
) -> Result<(usize, &'a Issue), CommandError> {
    let position = directory
        .issue_index()
        .checked_sub(1)
        .ok_or_else(|| CommandError::IssueNotFound("no issue selected".into()))?;
    book.issues()
        .get(position)
        .map(|issue| (position, issue))
        .ok_or_else(|| {
            CommandError::IssueNotFound(format!(
                "selected issue {} no longer exists",
                position + 1
            ))
        })
}

/// The selected solution (1-based index within its issue).
fn selected_solution<'a>(
    issue: &'a Issue,
    directory: &Directory,
) -> Result<(usize, &'a Solution), CommandError> {
    let index = directory.solution_index();
    issue_ops::solution_at(issue, index).map(|s| (index, s))
}

/// Substitute `replacement` for the issue at `position` and commit.
fn replace_and_commit(
    ctx: &mut Context<'_>,
    position: usize,
    replacement: Issue,
) -> Result<(), CommandError> {
    let target = ctx.book.issues().as_slice()[position].clone();
    ctx.book.issues_mut().replace(&target, replacement)?;
    ctx.book.commit();
    Ok(())
}

fn listed_message(ctx: &Context<'_>) -> String {
    let n = ctx.view.visible(ctx.book.as_slice()).len();
    match n {
        1 => "1 issue listed".to_string(),
        n => format!("{} issues listed", n),
    }
}

// ---------------------------------------------------------------------------
// Issue commands
// ---------------------------------------------------------------------------

fn add_issue(
    ctx: &mut Context<'_>,
    statement: &str,
    description: &str,
    tags: &[String],
    now: DateTime<Utc>,
) -> Result<CommandResult, CommandError> {
    let issue = Issue::new(statement, description, tags, now)?;
    let message = format!("New issue added: {}", issue.statement());
    ctx.book.issues_mut().add(issue)?;
    ctx.book.commit();
    Ok(CommandResult::committed(message))
}

fn edit_issue(
    ctx: &mut Context<'_>,
    edit: &IssueEdit,
    now: DateTime<Utc>,
) -> Result<CommandResult, CommandError> {
    let (position, issue) = selected_issue(ctx.book, ctx.directory)?;
    let edited = issue_ops::edit_issue(issue, edit, now)?;
    let message = format!("Edited issue: {}", edited.statement());
    replace_and_commit(ctx, position, edited)?;
    Ok(CommandResult::committed(message))
}

fn delete_issue(
    ctx: &mut Context<'_>,
    visible_index: usize,
) -> Result<CommandResult, CommandError> {
    let position = ctx
        .view
        .resolve(ctx.book.as_slice(), visible_index)
        .ok_or_else(|| CommandError::IssueNotFound(format!("index {}", visible_index)))?;
    let target = ctx.book.as_slice()[position].clone();
    let removed = ctx.book.issues_mut().remove(&target)?;
    ctx.book.commit();
    Ok(CommandResult::committed(format!("Deleted issue: {}", removed.statement())))
}

fn select_issue(
    ctx: &mut Context<'_>,
    visible_index: usize,
) -> Result<CommandResult, CommandError> {
    let issues = ctx.book.as_slice();
    let position = ctx
        .view
        .resolve(issues, visible_index)
        .ok_or_else(|| CommandError::IssueNotFound(format!("index {}", visible_index)))?;
    let directory = ctx
        .directory
        .select_issue(position + 1, issues.len())
        .map_err(|e| CommandError::IssueNotFound(format!("index {}", e.index)))?;

    let issue = issues[position].clone();
    let message = format!("Selected issue: {}", issue.statement());
    // the lookup count is bookkeeping, not an undo step
    ctx.book
        .issues_mut()
        .replace(&issue, issue.clone().with_frequency_bumped())?;
    ctx.book.amend_current();
    *ctx.directory = directory;
    Ok(CommandResult::read_only(message))
}

// ---------------------------------------------------------------------------
// Solution commands
// ---------------------------------------------------------------------------

fn add_solution(
    ctx: &mut Context<'_>,
    link: &str,
    remark: &str,
    now: DateTime<Utc>,
) -> Result<CommandResult, CommandError> {
    let (position, issue) = selected_issue(ctx.book, ctx.directory)?;
    let solution = Solution::new(link, remark)?;
    let message = format!("New solution added: {}", solution.link());
    let updated = issue_ops::add_solution(issue, solution, now)?;
    replace_and_commit(ctx, position, updated)?;
    Ok(CommandResult::committed(message))
}

fn edit_solution(
    ctx: &mut Context<'_>,
    link: Option<&str>,
    remark: Option<&str>,
    now: DateTime<Utc>,
) -> Result<CommandResult, CommandError> {
    let (position, issue) = selected_issue(ctx.book, ctx.directory)?;
    let (index, _) = selected_solution(issue, ctx.directory)?;
    let updated = issue_ops::edit_solution(issue, index, link, remark, now)?;
    replace_and_commit(ctx, position, updated)?;
    Ok(CommandResult::committed(format!("Edited solution {}", index)))
}

fn delete_solution(
    ctx: &mut Context<'_>,
    index: usize,
    now: DateTime<Utc>,
) -> Result<CommandResult, CommandError> {
    let (position, issue) = selected_issue(ctx.book, ctx.directory)?;
    let (updated, removed) = issue_ops::delete_solution(issue, index, now)?;
    replace_and_commit(ctx, position, updated)?;
    Ok(CommandResult::committed(format!("Deleted solution: {}", removed.link())))
}

fn select_solution(ctx: &mut Context<'_>, index: usize) -> Result<CommandResult, CommandError> {
    let (_, issue) = selected_issue(ctx.book, ctx.directory)?;
    let directory = ctx
        .directory
        .select_solution(index, issue.solutions().len())
        .map_err(|e| CommandError::SolutionNotFound(format!("index {}", e.index)))?;
    *ctx.directory = directory;
    Ok(CommandResult::read_only(format!("Selected solution {}", index)))
}

fn retrieve(ctx: &mut Context<'_>, index: Option<usize>) -> Result<CommandResult, CommandError> {
    let (_, issue) = selected_issue(ctx.book, ctx.directory)?;
    let solution = match (index, ctx.directory.level()) {
        (Some(i), _) => issue_ops::solution_at(issue, i)?,
        (None, Level::Solution) => selected_solution(issue, ctx.directory)?.1,
        (None, _) => {
            issue
                .primary_solution()
                .ok_or(CommandError::NoPrimarySolution)?
                .1
        }
    };
    let link = solution.link().to_string();
    Ok(CommandResult {
        message: format!("Retrieved link: {}", link),
        retrieved: Some(link),
        ..Default::default()
    })
}

fn set_primary(
    ctx: &mut Context<'_>,
    index: usize,
    now: DateTime<Utc>,
) -> Result<CommandResult, CommandError> {
    let (position, issue) = selected_issue(ctx.book, ctx.directory)?;
    let updated = issue_ops::set_primary(issue, index, now)?;
    replace_and_commit(ctx, position, updated)?;
    Ok(CommandResult::committed(format!("Solution {} is now primary", index)))
}

fn reset_primary(ctx: &mut Context<'_>, now: DateTime<Utc>) -> Result<CommandResult, CommandError> {
    let (position, issue) = selected_issue(ctx.book, ctx.directory)?;
    let updated = issue_ops::reset_primary(issue, now)?;
    replace_and_commit(ctx, position, updated)?;
    Ok(CommandResult::committed("Primary solution cleared"))
}

// ---------------------------------------------------------------------------
// Tag commands
// ---------------------------------------------------------------------------

fn add_tags(
    ctx: &mut Context<'_>,
    tags: &[String],
    now: DateTime<Utc>,
) -> Result<CommandResult, CommandError> {
    let (position, issue) = selected_issue(ctx.book, ctx.directory)?;
    let updated = tag_ops::add_tags(issue, tags, now)?;
    replace_and_commit(ctx, position, updated)?;
    Ok(CommandResult::committed(format!("Added {} tag(s)", tags.len())))
}

fn refactor_tag(
    ctx: &mut Context<'_>,
    old: &str,
    new: Option<&str>,
    now: DateTime<Utc>,
) -> Result<CommandResult, CommandError> {
    let refactored = tag_ops::refactor_tag(ctx.book.as_slice(), old, new, now)?;
    ctx.book.issues_mut().set_all(refactored.issues)?;
    ctx.book.commit();
    let message = match new {
        Some(new) => format!(
            "Renamed #{} to #{} on {} issue(s)",
            old.trim_start_matches('#'),
            new.trim_start_matches('#'),
            refactored.changed
        ),
        None => format!(
            "Removed #{} from {} issue(s)",
            old.trim_start_matches('#'),
            refactored.changed
        ),
    };
    Ok(CommandResult::committed(message))
}

use chrono::{DateTime, Utc};
use indexmap::IndexSet;

use crate::model::field::validate_tag;
use crate::model::issue::Issue;

use super::command::CommandError;

/// Add `tags` to an issue. Fails if any of them is already present.
pub fn add_tags(issue: &Issue, tags: &[String], now: DateTime<Utc>) -> Result<Issue, CommandError> {
    let mut merged = issue.tags().clone();
    for raw in tags {
        let tag = validate_tag(raw)?;
        if !merged.insert(tag.clone()) {
            return Err(CommandError::DuplicateTag(tag));
        }
    }
    Ok(issue.clone().with_tags(merged, now)?)
}

/// Outcome of a tag refactor across the whole collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refactored {
    /// The full replacement issue list, in storage order
    pub issues: Vec<Issue>,
    /// How many issues carried the old tag
    pub changed: usize,
}

/// Rename `old` to `new` on every issue carrying it, or remove it when
/// `new` is `None`. Tag order is kept; a rename onto a tag the issue
/// already has merges the two.
///
/// Returns the complete new list so the caller can swap it in and commit
/// once for the whole batch.
pub fn refactor_tag(
    issues: &[Issue],
    old: &str,
    new: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Refactored, CommandError> {
    let old = validate_tag(old)?;
    let new = new.map(validate_tag).transpose()?;
    if new.as_deref() == Some(old.as_str()) {
        return Err(CommandError::DuplicateTag(old));
    }

    let mut changed = 0;
    let mut result = Vec::with_capacity(issues.len());
    for issue in issues {
        if !issue.has_tag(&old) {
            result.push(issue.clone());
            continue;
        }
        changed += 1;
        let retagged: IndexSet<&str> = issue
            .tags()
            .iter()
            .filter_map(|t| {
                if *t == old {
                    new.as_deref()
                } else {
                    Some(t.as_str())
                }
            })
            .collect();
        result.push(issue.clone().with_tags(retagged, now)?);
    }

    if changed == 0 {
        return Err(CommandError::TagNotFound(old));
    }
    Ok(Refactored {
        issues: result,
        changed,
    })
}

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::field::{FieldError, validate_description, validate_statement, validate_tag};
use super::issue_list::{Identity, UniqueList};
use super::solution::Solution;

/// The unique issue collection
pub type IssueList = UniqueList<Issue>;

/// A tracked problem with its attached solutions.
///
/// Issues are values: every change goes through a `with_*` method that
/// returns a new `Issue`, which callers substitute into the collection.
/// Structural equality (`==`) compares every field; identity (see
/// [`Identity`]) compares only the statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IssueRecord")]
pub struct Issue {
    statement: String,
    description: String,
    solutions: UniqueList<Solution>,
    tags: IndexSet<String>,
    frequency: u32,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
}

impl Issue {
    /// Create an issue with no solutions, stamped `now`.
    pub fn new<I, S>(
        statement: &str,
        description: &str,
        tags: I,
        now: DateTime<Utc>,
    ) -> Result<Self, FieldError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Issue {
            statement: validate_statement(statement)?,
            description: validate_description(description)?,
            solutions: UniqueList::new(),
            tags: collect_tags(tags)?,
            frequency: 0,
            created: now,
            modified: now,
        })
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn solutions(&self) -> &UniqueList<Solution> {
        &self.solutions
    }

    pub fn tags(&self) -> &IndexSet<String> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// The primary solution and its 0-based position, if one is flagged.
    pub fn primary_solution(&self) -> Option<(usize, &Solution)> {
        self.solutions.iter().enumerate().find(|(_, s)| s.is_primary())
    }

    pub fn with_statement(self, statement: &str, now: DateTime<Utc>) -> Result<Issue, FieldError> {
        Ok(Issue {
            statement: validate_statement(statement)?,
            modified: now,
            ..self
        })
    }

    pub fn with_description(
        self,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<Issue, FieldError> {
        Ok(Issue {
            description: validate_description(description)?,
            modified: now,
            ..self
        })
    }

    /// Replace the whole tag set.
    pub fn with_tags<I, S>(self, tags: I, now: DateTime<Utc>) -> Result<Issue, FieldError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Issue {
            tags: collect_tags(tags)?,
            modified: now,
            ..self
        })
    }

    /// Replace the solution list. Fails if more than one is primary.
    pub fn with_solutions(
        self,
        solutions: UniqueList<Solution>,
        now: DateTime<Utc>,
    ) -> Result<Issue, FieldError> {
        check_single_primary(&solutions)?;
        Ok(Issue {
            solutions,
            modified: now,
            ..self
        })
    }

    /// Count one more lookup. The modified stamp is left alone.
    pub fn with_frequency_bumped(self) -> Issue {
        Issue {
            frequency: self.frequency.saturating_add(1),
            ..self
        }
    }
}

impl Identity for Issue {
    /// Same trimmed statement, case-sensitive.
    fn is_same(&self, other: &Self) -> bool {
        self.statement.trim() == other.statement.trim()
    }

    fn identity_key(&self) -> String {
        self.statement.trim().to_string()
    }
}

fn collect_tags<I, S>(tags: I) -> Result<IndexSet<String>, FieldError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter().map(|t| validate_tag(t.as_ref())).collect()
}

fn check_single_primary(solutions: &UniqueList<Solution>) -> Result<(), FieldError> {
    let primaries = solutions.iter().filter(|s| s.is_primary()).count();
    if primaries > 1 {
        return Err(FieldError {
            field: "solutions",
            reason: format!("{} solutions flagged primary, at most one allowed", primaries),
        });
    }
    Ok(())
}

/// Unchecked on-disk shape, validated into an [`Issue`]
#[derive(Deserialize)]
struct IssueRecord {
    statement: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    solutions: UniqueList<Solution>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    frequency: u32,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
}

impl TryFrom<IssueRecord> for Issue {
    type Error = FieldError;

    fn try_from(record: IssueRecord) -> Result<Self, Self::Error> {
        check_single_primary(&record.solutions)?;
        Ok(Issue {
            statement: validate_statement(&record.statement)?,
            description: validate_description(&record.description)?,
            solutions: record.solutions,
            tags: collect_tags(record.tags)?,
            frequency: record.frequency,
            created: record.created,
            modified: record.modified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn issue(statement: &str) -> Issue {
        Issue::new(statement, "", ["java"], at(0)).unwrap()
    }

    #[test]
    fn identity_is_trimmed_statement() {
        let a = Issue::new("NPE in loop", "one", Vec::<String>::new(), at(0)).unwrap();
        let b = Issue::new("  NPE in loop ", "two", ["x"], at(5)).unwrap();
        assert!(a.is_same(&b));
        assert_ne!(a, b);
        let c = issue("npe in loop");
        assert!(!a.is_same(&c));
    }

    #[test]
    fn tags_are_a_set() {
        let a = Issue::new("s", "", ["a", "b", "a"], at(0)).unwrap();
        assert_eq!(a.tags().len(), 2);
        let b = Issue::new("s", "", ["b", "a"], at(0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_tag_rejected() {
        assert!(Issue::new("s", "", ["no spaces"], at(0)).is_err());
    }

    #[test]
    fn with_methods_touch_modified_only() {
        let a = issue("s");
        let b = a.clone().with_description("more", at(10)).unwrap();
        assert_eq!(b.created(), at(0));
        assert_eq!(b.modified(), at(10));
        assert_eq!(b.description(), "more");
        assert_eq!(a.description(), "");
    }

    #[test]
    fn frequency_bump_keeps_modified() {
        let a = issue("s").with_frequency_bumped().with_frequency_bumped();
        assert_eq!(a.frequency(), 2);
        assert_eq!(a.modified(), at(0));
    }

    #[test]
    fn two_primaries_rejected() {
        let first = Solution::new("https://a.io", "a").unwrap().with_primary(true);
        let second = Solution::new("https://b.io", "b").unwrap().with_primary(true);
        let list = UniqueList::from_vec(vec![first.clone(), second]).unwrap();
        assert!(issue("s").with_solutions(list, at(1)).is_err());

        let ok = UniqueList::from_vec(vec![first]).unwrap();
        let updated = issue("s").with_solutions(ok, at(1)).unwrap();
        assert_eq!(updated.primary_solution().map(|(i, _)| i), Some(0));
    }

    #[test]
    fn serde_round_trip_preserves_structure() {
        let sol = Solution::new("https://a.io", "a").unwrap().with_primary(true);
        let original = issue("s")
            .with_solutions(UniqueList::from_vec(vec![sol]).unwrap(), at(3))
            .unwrap();
        let json = serde_json::to_string(&original).unwrap();
        let back: Issue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn deserialize_rejects_blank_statement() {
        let json = r#"{"statement":"  ",
            "created":"2025-01-01T00:00:00Z",
            "modified":"2025-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<Issue>(json).is_err());
    }
}

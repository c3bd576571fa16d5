use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::model::issue::Issue;

/// Listing order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Most looked-up first
    Frequency,
    /// Most recently modified first
    Time,
    /// Alphabetical by smallest tag, untagged last
    Tag,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Frequency => write!(f, "frequency"),
            SortKey::Time => write!(f, "time"),
            SortKey::Tag => write!(f, "tag"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "freq" | "frequency" => Ok(SortKey::Frequency),
            "time" | "chrono" | "chronological" => Ok(SortKey::Time),
            "tag" | "tags" => Ok(SortKey::Tag),
            other => Err(format!("unknown sort key '{}' (expected freq, time or tag)", other)),
        }
    }
}

/// Which issues the listing shows
#[derive(Debug, Clone, Default)]
pub enum Filter {
    #[default]
    All,
    /// Statement contains any of the keywords as a whitespace-separated
    /// word, ignoring case
    Keywords { keywords: Vec<String>, pattern: Regex },
    Tag(String),
}

impl Filter {
    /// Build a keyword filter. Keywords are matched literally, so `c++`
    /// or `(again)` work as typed.
    pub fn keywords(keywords: &[String]) -> Result<Filter, regex::Error> {
        let alternatives: Vec<String> = keywords.iter().map(|k| regex::escape(k)).collect();
        let pattern = Regex::new(&format!(
            r"(?i)(?:^|\s)(?:{})(?:\s|$)",
            alternatives.join("|")
        ))?;
        Ok(Filter::Keywords {
            keywords: keywords.to_vec(),
            pattern,
        })
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        match self {
            Filter::All => true,
            Filter::Keywords { pattern, .. } => pattern.is_match(issue.statement()),
            Filter::Tag(tag) => issue.has_tag(tag),
        }
    }
}

/// The filter and sort applied to the issue listing.
///
/// Visible indices (1-based, as shown to the user) are translated to
/// storage positions here, before anything touches the collection.
#[derive(Debug, Clone, Default)]
pub struct IssueView {
    pub filter: Filter,
    pub sort: Option<SortKey>,
}

impl IssueView {
    /// Show everything in storage order
    pub fn reset(&mut self) {
        *self = IssueView::default();
    }

    pub fn is_reset(&self) -> bool {
        matches!(self.filter, Filter::All) && self.sort.is_none()
    }

    /// 0-based storage positions of the visible issues, in display order
    pub fn visible(&self, issues: &[Issue]) -> Vec<usize> {
        let mut positions: Vec<usize> = issues
            .iter()
            .enumerate()
            .filter(|(_, issue)| self.filter.matches(issue))
            .map(|(i, _)| i)
            .collect();
        if let Some(key) = self.sort {
            // stable: equal keys keep storage order after the statement tie-break
            positions.sort_by(|&a, &b| compare(key, &issues[a], &issues[b]));
        }
        positions
    }

    /// Storage position (0-based) of the issue shown at `visible_index`
    /// (1-based), if any
    pub fn resolve(&self, issues: &[Issue], visible_index: usize) -> Option<usize> {
        if visible_index == 0 {
            return None;
        }
        self.visible(issues).get(visible_index - 1).copied()
    }
}

fn compare(key: SortKey, a: &Issue, b: &Issue) -> Ordering {
    let primary = match key {
        SortKey::Frequency => b.frequency().cmp(&a.frequency()),
        SortKey::Time => b.modified().cmp(&a.modified()),
        SortKey::Tag => match (smallest_tag(a), smallest_tag(b)) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    };
    primary.then_with(|| a.statement().cmp(b.statement()))
}

fn smallest_tag(issue: &Issue) -> Option<&str> {
    issue.tags().iter().map(String::as_str).min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn issue(statement: &str, tags: &[&str], modified: i64, lookups: u32) -> Issue {
        let mut i = Issue::new(statement, "", tags, Utc.timestamp_opt(0, 0).unwrap())
            .unwrap()
            .with_description("", Utc.timestamp_opt(modified, 0).unwrap())
            .unwrap();
        for _ in 0..lookups {
            i = i.with_frequency_bumped();
        }
        i
    }

    fn sample() -> Vec<Issue> {
        vec![
            issue("NPE in loop", &["java"], 30, 1),
            issue("Segfault on exit", &["c"], 10, 5),
            issue("Borrow checker loop", &[], 20, 0),
        ]
    }

    fn statements(issues: &[Issue], view: &IssueView) -> Vec<String> {
        view.visible(issues)
            .into_iter()
            .map(|i| issues[i].statement().to_string())
            .collect()
    }

    #[test]
    fn default_view_is_storage_order() {
        let issues = sample();
        let view = IssueView::default();
        assert_eq!(view.visible(&issues), vec![0, 1, 2]);
        assert!(view.is_reset());
    }

    #[test]
    fn keyword_filter_matches_whole_words_ignoring_case() {
        let issues = sample();
        let view = IssueView {
            filter: Filter::keywords(&["LOOP".to_string()]).unwrap(),
            sort: None,
        };
        assert_eq!(
            statements(&issues, &view),
            vec!["NPE in loop", "Borrow checker loop"]
        );
        let partial = IssueView {
            filter: Filter::keywords(&["seg".to_string()]).unwrap(),
            sort: None,
        };
        assert!(partial.visible(&issues).is_empty());
    }

    #[test]
    fn keywords_are_literal() {
        let issues = vec![issue("a+b fails", &[], 0, 0)];
        let view = IssueView {
            filter: Filter::keywords(&["a+b".to_string()]).unwrap(),
            sort: None,
        };
        assert_eq!(view.visible(&issues), vec![0]);
    }

    #[test]
    fn keywords_with_punctuation() {
        let issues = vec![
            issue("crash in c++ code", &[], 0, 0),
            issue("NPE (again)", &[], 0, 0),
            issue("c and c#", &[], 0, 0),
        ];
        let find = |k: &str| IssueView {
            filter: Filter::keywords(&[k.to_string()]).unwrap(),
            sort: None,
        };
        assert_eq!(find("C++").visible(&issues), vec![0]);
        assert_eq!(find("(again)").visible(&issues), vec![1]);
        assert_eq!(find("c").visible(&issues), vec![2]);
        assert!(find("again").visible(&issues).is_empty());
    }

    #[test]
    fn tag_filter() {
        let issues = sample();
        let view = IssueView {
            filter: Filter::Tag("c".into()),
            sort: None,
        };
        assert_eq!(statements(&issues, &view), vec!["Segfault on exit"]);
    }

    #[test]
    fn sorts() {
        let issues = sample();
        let mut view = IssueView {
            sort: Some(SortKey::Frequency),
            ..Default::default()
        };
        assert_eq!(view.visible(&issues), vec![1, 0, 2]);
        view.sort = Some(SortKey::Time);
        assert_eq!(view.visible(&issues), vec![0, 2, 1]);
        view.sort = Some(SortKey::Tag);
        assert_eq!(view.visible(&issues), vec![1, 0, 2]);
    }

    #[test]
    fn resolve_translates_visible_index() {
        let issues = sample();
        let view = IssueView {
            sort: Some(SortKey::Frequency),
            ..Default::default()
        };
        assert_eq!(view.resolve(&issues, 1), Some(1));
        assert_eq!(view.resolve(&issues, 3), Some(2));
        assert_eq!(view.resolve(&issues, 0), None);
        assert_eq!(view.resolve(&issues, 4), None);
    }

    #[test]
    fn sort_key_parsing() {
        assert_eq!("freq".parse::<SortKey>(), Ok(SortKey::Frequency));
        assert_eq!("TIME".parse::<SortKey>(), Ok(SortKey::Time));
        assert_eq!("tag".parse::<SortKey>(), Ok(SortKey::Tag));
        assert!("size".parse::<SortKey>().is_err());
    }
}

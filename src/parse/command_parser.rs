use crate::model::field::validate_tag;
use crate::ops::command::Command;
use crate::ops::view::SortKey;

use super::args::{ArgMap, Prefix};

/// Syntax errors. These are caught before a command reaches the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
    #[error("{message}\nusage: {usage}")]
    InvalidFormat { message: String, usage: &'static str },
}

/// Command words with their usage lines, in help order
pub const USAGE: &[(&str, &str)] = &[
    ("add", "add <statement> [d/<description>] [t/<tag>]..."),
    ("solution", "solution l/<link> r/<remark>"),
    (
        "edit",
        "edit [s/<statement>] [d/<description>] [t/<tag>]...  |  edit [l/<link>] [r/<remark>]",
    ),
    ("delete", "delete <index>"),
    ("find", "find <keyword>..."),
    ("findtag", "findtag <tag>"),
    ("tag", "tag <tag>..."),
    ("retag", "retag <old> [<new>]"),
    ("list", "list"),
    ("sort", "sort freq|time|tag"),
    ("select", "select <index>"),
    ("retrieve", "retrieve [<index>]"),
    ("star", "star <index>"),
    ("unstar", "unstar"),
    ("home", "home"),
    ("undo", "undo"),
    ("redo", "redo"),
    ("clear", "clear"),
    ("exit", "exit"),
];

fn usage(word: &str) -> &'static str {
    USAGE
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, u)| *u)
        .unwrap_or("")
}

fn invalid(word: &str, message: impl Into<String>) -> ParseError {
    ParseError::InvalidFormat {
        message: message.into(),
        usage: usage(word),
    }
}

/// Parse one line of input into a [`Command`].
///
/// Field-level syntax is checked here (indices are positive integers, tags
/// are well-formed). Domain rules are left to the dispatcher.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };
    let word_lower = word.to_ascii_lowercase();
    let word = word_lower.as_str();

    match word {
        "add" => parse_add(rest),
        "solution" => parse_solution(rest),
        "edit" => parse_edit(rest),
        "delete" => Ok(Command::Delete {
            index: parse_index(word, rest)?,
        }),
        "find" => {
            let keywords: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
            if keywords.is_empty() {
                return Err(invalid(word, "at least one keyword is required"));
            }
            Ok(Command::Find { keywords })
        }
        "findtag" => {
            let tags = parse_tags(word, rest)?;
            match tags.as_slice() {
                [tag] => Ok(Command::FindTag { tag: tag.clone() }),
                _ => Err(invalid(word, "exactly one tag is required")),
            }
        }
        "tag" => {
            let tags = parse_tags(word, rest)?;
            if tags.is_empty() {
                return Err(invalid(word, "at least one tag is required"));
            }
            Ok(Command::AddTag { tags })
        }
        "retag" => {
            let tags = parse_tags(word, rest)?;
            match tags.as_slice() {
                [old] => Ok(Command::RefactorTag {
                    old: old.clone(),
                    new: None,
                }),
                [old, new] => Ok(Command::RefactorTag {
                    old: old.clone(),
                    new: Some(new.clone()),
                }),
                _ => Err(invalid(word, "expected an old tag and an optional new tag")),
            }
        }
        "sort" => {
            let key = rest.parse::<SortKey>().map_err(|e| invalid(word, e))?;
            Ok(Command::Sort(key))
        }
        "select" => Ok(Command::Select {
            index: parse_index(word, rest)?,
        }),
        "retrieve" => {
            let index = if rest.is_empty() {
                None
            } else {
                Some(parse_index(word, rest)?)
            };
            Ok(Command::Retrieve { index })
        }
        "star" => Ok(Command::SetPrimary {
            index: parse_index(word, rest)?,
        }),
        "list" | "unstar" | "home" | "undo" | "redo" | "clear" | "exit" => {
            if !rest.is_empty() {
                return Err(invalid(word, format!("'{}' takes no arguments", word)));
            }
            Ok(match word {
                "list" => Command::List,
                "unstar" => Command::ResetPrimary,
                "home" => Command::Home,
                "undo" => Command::Undo,
                "redo" => Command::Redo,
                "clear" => Command::Clear,
                _ => Command::Exit,
            })
        }
        _ => Err(ParseError::UnknownCommand(word.to_string())),
    }
}

fn parse_index(word: &str, rest: &str) -> Result<usize, ParseError> {
    match rest.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid(word, format!("index must be a positive integer, got '{}'", rest))),
    }
}

fn parse_tags(word: &str, rest: &str) -> Result<Vec<String>, ParseError> {
    rest.split_whitespace()
        .map(|t| validate_tag(t).map_err(|e| invalid(word, e.to_string())))
        .collect()
}

/// Values of every `t/`. A bare `t/` contributes nothing, so `edit t/`
/// clears the tag set.
fn tags_from(word: &str, map: &ArgMap) -> Result<Vec<String>, ParseError> {
    map.all(Prefix::Tag)
        .into_iter()
        .filter(|t| !t.is_empty())
        .map(|t| validate_tag(t).map_err(|e| invalid(word, e.to_string())))
        .collect()
}

fn reject_unexpected(word: &str, map: &ArgMap, allowed: &[Prefix]) -> Result<(), ParseError> {
    match map.unexpected(allowed) {
        Some(p) => Err(invalid(word, format!("'{}' is not accepted here", p.marker()))),
        None => Ok(()),
    }
}

fn parse_add(rest: &str) -> Result<Command, ParseError> {
    let map = ArgMap::tokenize(rest);
    reject_unexpected("add", &map, &[Prefix::Statement, Prefix::Description, Prefix::Tag])?;
    let statement = match (map.preamble.as_str(), map.last(Prefix::Statement)) {
        ("", Some(s)) => s.to_string(),
        (pre, None) if !pre.is_empty() => pre.to_string(),
        ("", None) => return Err(invalid("add", "a statement is required")),
        _ => {
            return Err(invalid(
                "add",
                "give the statement either before the prefixes or with s/, not both",
            ));
        }
    };
    Ok(Command::AddIssue {
        statement,
        description: map.last(Prefix::Description).unwrap_or("").to_string(),
        tags: tags_from("add", &map)?,
    })
}

fn parse_solution(rest: &str) -> Result<Command, ParseError> {
    let map = ArgMap::tokenize(rest);
    reject_unexpected("solution", &map, &[Prefix::Link, Prefix::Remark])?;
    if !map.preamble.is_empty() {
        return Err(invalid("solution", format!("unexpected text '{}'", map.preamble)));
    }
    match (map.last(Prefix::Link), map.last(Prefix::Remark)) {
        (Some(link), Some(remark)) => Ok(Command::AddSolution {
            link: link.to_string(),
            remark: remark.to_string(),
        }),
        _ => Err(invalid("solution", "both l/ and r/ are required")),
    }
}

fn parse_edit(rest: &str) -> Result<Command, ParseError> {
    let map = ArgMap::tokenize(rest);
    if !map.preamble.is_empty() {
        return Err(invalid("edit", format!("unexpected text '{}'", map.preamble)));
    }
    let issue_fields = [Prefix::Statement, Prefix::Description, Prefix::Tag];
    let solution_fields = [Prefix::Link, Prefix::Remark];
    let touches_issue = issue_fields.iter().any(|p| map.has(*p));
    let touches_solution = solution_fields.iter().any(|p| map.has(*p));

    match (touches_issue, touches_solution) {
        (true, true) => Err(invalid(
            "edit",
            "issue fields and solution fields cannot be edited together",
        )),
        (false, false) => Err(invalid("edit", "nothing to edit")),
        (true, false) => Ok(Command::EditIssue {
            statement: map.last(Prefix::Statement).map(str::to_string),
            description: map.last(Prefix::Description).map(str::to_string),
            tags: if map.has(Prefix::Tag) {
                Some(tags_from("edit", &map)?)
            } else {
                None
            },
        }),
        (false, true) => Ok(Command::EditSolution {
            link: map.last(Prefix::Link).map(str::to_string),
            remark: map.last(Prefix::Remark).map(str::to_string),
        }),
    }
}

use serde::Serialize;

use crate::model::directory::Directory;
use crate::shell::session::{IssueSummary, Report, SolutionSummary};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ReportJson {
    pub message: String,
    pub directory: Directory,
    pub path: String,
    pub issues: Vec<IssueJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub solutions: Vec<SolutionJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieved: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub exit: bool,
}

#[derive(Serialize)]
pub struct IssueJson {
    pub index: usize,
    pub position: usize,
    pub statement: String,
    pub tags: Vec<String>,
    pub frequency: u32,
    pub solutions: usize,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
}

#[derive(Serialize)]
pub struct SolutionJson {
    pub index: usize,
    pub link: String,
    pub remark: String,
    pub primary: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
}

#[derive(Serialize)]
pub struct ErrorJson {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn report_to_json(report: &Report) -> ReportJson {
    ReportJson {
        message: report.message.clone(),
        directory: report.directory,
        path: report.directory.to_string(),
        issues: report.issues.iter().map(issue_to_json).collect(),
        solutions: report.solutions.iter().map(solution_to_json).collect(),
        retrieved: report.retrieved.clone(),
        exit: report.exit,
    }
}

fn issue_to_json(issue: &IssueSummary) -> IssueJson {
    IssueJson {
        index: issue.index,
        position: issue.position,
        statement: issue.statement.clone(),
        tags: issue.tags.clone(),
        frequency: issue.frequency,
        solutions: issue.solution_count,
        selected: issue.selected,
    }
}

fn solution_to_json(solution: &SolutionSummary) -> SolutionJson {
    SolutionJson {
        index: solution.index,
        link: solution.link.clone(),
        remark: solution.remark.clone(),
        primary: solution.primary,
        selected: solution.selected,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("#{}", t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format one listing row: `> 2. statement #tag (1 solution)`
pub fn format_issue_line(issue: &IssueSummary) -> String {
    let marker = if issue.selected { '>' } else { ' ' };
    let tags = if issue.tags.is_empty() {
        String::new()
    } else {
        format!(" {}", format_tags(&issue.tags))
    };
    let solutions = match issue.solution_count {
        0 => String::new(),
        1 => " (1 solution)".to_string(),
        n => format!(" ({} solutions)", n),
    };
    format!("{} {}. {}{}{}", marker, issue.index, issue.statement, tags, solutions)
}

/// Format one solution row, indented under its issue
pub fn format_solution_line(solution: &SolutionSummary) -> String {
    let marker = if solution.selected { '>' } else { ' ' };
    let star = if solution.primary { " *" } else { "" };
    format!(
        "  {} {}. {} - {}{}",
        marker, solution.index, solution.link, solution.remark, star
    )
}

/// Format a report as the lines the shell prints
pub fn format_report(report: &Report) -> Vec<String> {
    let mut lines = vec![report.message.clone()];
    if let Some(link) = &report.retrieved {
        if !report.message.contains(link.as_str()) {
            lines.push(link.clone());
        }
    }
    if report.exit {
        return lines;
    }
    lines.extend(report.issues.iter().map(format_issue_line));
    if !report.solutions.is_empty() {
        lines.push(format!("solutions at {}:", report.directory));
        lines.extend(report.solutions.iter().map(format_solution_line));
    }
    lines
}

/// The shell prompt for the current directory
pub fn prompt(directory: Directory) -> String {
    format!("fb:{}> ", directory)
}

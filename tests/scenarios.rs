//! End-to-end behavior of the tracker core, driven through `Session` the
//! way the shell drives it.

use chrono::{DateTime, TimeZone, Utc};
use fixbook::model::{Directory, IssueList};
use fixbook::ops::CommandError;
use fixbook::shell::{Report, Session, SessionError};
use pretty_assertions::assert_eq;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn run(session: &mut Session, line: &str) -> Report {
    session
        .run_line_at(line, at(session.history().len() as i64))
        .unwrap_or_else(|e| panic!("'{}' failed: {}", line, e))
}

fn command_error(session: &mut Session, line: &str) -> CommandError {
    match session.run_line_at(line, at(0)) {
        Err(SessionError::Command(e)) => e,
        other => panic!("'{}' should fail with a command error, got {:?}", line, other),
    }
}

fn statements(session: &Session) -> Vec<String> {
    session
        .issues()
        .iter()
        .map(|i| i.statement().to_string())
        .collect()
}

fn with_issues(statements: &[&str]) -> Session {
    let mut session = Session::in_memory(IssueList::new());
    for s in statements {
        run(&mut session, &format!("add {}", s));
    }
    session
}

#[test]
fn identity_is_the_trimmed_statement() {
    let mut session = with_issues(&["NPE in loop"]);
    assert_eq!(
        command_error(&mut session, "add   NPE in loop   d/different description"),
        CommandError::DuplicateIssue("NPE in loop".into())
    );

    run(&mut session, "delete 1");
    run(&mut session, "add NPE in loop d/second time around");
    assert_eq!(statements(&session), vec!["NPE in loop"]);
    assert_eq!(session.issues()[0].description(), "second time around");
}

#[test]
fn add_then_duplicate() {
    let mut session = Session::in_memory(IssueList::new());
    run(&mut session, "add NPE in loop d/stack trace attached");
    assert_eq!(session.issues().len(), 1);

    let pointer = session.book().pointer();
    assert!(matches!(
        command_error(&mut session, "add NPE in loop d/stack trace attached"),
        CommandError::DuplicateIssue(_)
    ));
    assert_eq!(session.issues().len(), 1);
    assert_eq!(session.book().pointer(), pointer);
}

#[test]
fn navigate_and_add_solution() {
    let mut session = with_issues(&["NPE in loop"]);
    let report = run(&mut session, "select 1");
    assert_eq!(report.directory, Directory::Issue { issue: 1 });

    run(&mut session, "solution l/https://example.com/fix r/works");
    let solutions = session.issues()[0].solutions();
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions.as_slice()[0].link(), "https://example.com/fix");
    assert_eq!(solutions.as_slice()[0].remark(), "works");

    assert!(matches!(
        command_error(&mut session, "select 2"),
        CommandError::SolutionNotFound(_)
    ));
    assert_eq!(session.directory(), Directory::Issue { issue: 1 });

    let report = run(&mut session, "select 1");
    assert_eq!(report.directory, Directory::Solution { issue: 1, solution: 1 });
    assert!(matches!(
        command_error(&mut session, "select 2"),
        CommandError::WrongDirectory { .. }
    ));
}

#[test]
fn undo_after_delete_restores_order() {
    let mut session = with_issues(&["first", "second", "third"]);
    run(&mut session, "delete 2");
    assert_eq!(statements(&session), vec!["first", "third"]);
    run(&mut session, "undo");
    assert_eq!(statements(&session), vec!["first", "second", "third"]);
}

#[test]
fn batch_retag_is_one_undo_step() {
    let mut session = Session::in_memory(IssueList::new());
    for s in ["a", "b", "c"] {
        run(&mut session, &format!("add {} t/java", s));
    }
    let before = session.issues().to_vec();
    let pointer = session.book().pointer();

    run(&mut session, "retag java jvm");
    assert_eq!(session.book().pointer(), pointer + 1);
    assert!(session.issues().iter().all(|i| i.has_tag("jvm") && !i.has_tag("java")));

    run(&mut session, "undo");
    assert_eq!(session.issues(), before.as_slice());
}

#[test]
fn redo_branch_is_discarded_by_new_commit() {
    let mut session = with_issues(&["a", "b"]);
    run(&mut session, "undo");
    run(&mut session, "add c");
    assert_eq!(command_error(&mut session, "redo"), CommandError::NoRedoableState);
    assert_eq!(statements(&session), vec!["a", "c"]);
}

#[test]
fn select_is_not_an_undo_step() {
    let mut session = with_issues(&["a", "b"]);
    run(&mut session, "undo");
    let report = run(&mut session, "select 1");
    assert_eq!(report.directory, Directory::Issue { issue: 1 });
    run(&mut session, "redo");
    assert_eq!(statements(&session), vec!["a", "b"]);

    run(&mut session, "home");
    run(&mut session, "delete 2");
    run(&mut session, "add c");
    run(&mut session, "select 2");
    run(&mut session, "undo");
    assert_eq!(statements(&session), vec!["a"]);
}

#[test]
fn bare_tag_prefix_clears_tags() {
    let mut session = with_issues(&[]);
    run(&mut session, "add flaky test t/ci t/linux");
    run(&mut session, "select 1");
    run(&mut session, "edit t/");
    assert!(session.issues()[0].tags().is_empty());
    run(&mut session, "undo");
    assert_eq!(session.issues()[0].tags().len(), 2);
}

#[test]
fn wrong_directory_leaves_history_alone() {
    let mut session = with_issues(&["a"]);
    let pointer = session.book().pointer();
    let snapshots = session.book().snapshot_count();
    let root_rejects = [
        "tag java",
        "star 1",
        "unstar",
        "edit d/x",
        "edit r/x",
        "solution l/https://a.io r/x",
    ];
    for line in root_rejects {
        assert!(
            matches!(command_error(&mut session, line), CommandError::WrongDirectory { .. }),
            "{} should be rejected at root",
            line
        );
    }
    assert_eq!(session.book().pointer(), pointer);
    assert_eq!(session.book().snapshot_count(), snapshots);
}

#[test]
fn read_only_commands_do_not_commit() {
    let mut session = with_issues(&["NPE in loop", "Segfault"]);
    let pointer = session.book().pointer();
    for line in ["list", "find loop", "findtag java", "sort freq", "sort time", "home"] {
        run(&mut session, line);
    }
    assert_eq!(session.book().pointer(), pointer);
}

#[test]
fn delete_uses_the_visible_index() {
    let mut session = with_issues(&["alpha", "beta", "gamma"]);
    let report = run(&mut session, "find gamma");
    assert_eq!(report.issues.len(), 1);
    run(&mut session, "delete 1");
    assert_eq!(statements(&session), vec!["alpha", "beta"]);
}

#[test]
fn stale_selection_is_not_corrected_after_undo() {
    let mut session = with_issues(&["a", "b"]);
    run(&mut session, "select 2");
    run(&mut session, "undo");
    assert_eq!(statements(&session), vec!["a"]);
    assert_eq!(session.directory(), Directory::Issue { issue: 2 });

    assert!(matches!(
        command_error(&mut session, "tag java"),
        CommandError::IssueNotFound(_)
    ));
    let report = run(&mut session, "home");
    assert_eq!(report.directory, Directory::Root);
}

#[test]
fn stale_solution_selection_after_delete() {
    let mut session = with_issues(&["a"]);
    run(&mut session, "select 1");
    run(&mut session, "solution l/https://a.io r/one");
    run(&mut session, "select 1");
    run(&mut session, "undo");
    assert_eq!(
        session.directory(),
        Directory::Solution { issue: 1, solution: 1 }
    );
    assert!(matches!(
        command_error(&mut session, "edit r/changed"),
        CommandError::SolutionNotFound(_)
    ));
}

#[test]
fn retrieve_primary_link() {
    let mut session = with_issues(&["a"]);
    run(&mut session, "select 1");
    run(&mut session, "solution l/https://a.io/one r/one");
    run(&mut session, "solution l/https://a.io/two r/two");
    assert_eq!(command_error(&mut session, "retrieve"), CommandError::NoPrimarySolution);

    run(&mut session, "star 2");
    let report = run(&mut session, "retrieve");
    assert_eq!(report.retrieved.as_deref(), Some("https://a.io/two"));
    assert_eq!(command_error(&mut session, "star 2"), CommandError::AlreadyPrimary(2));
}

#[test]
fn clear_empties_and_goes_home() {
    let mut session = with_issues(&["a", "b"]);
    run(&mut session, "select 1");
    let report = run(&mut session, "clear");
    assert!(report.issues.is_empty());
    assert_eq!(report.directory, Directory::Root);
    run(&mut session, "undo");
    assert_eq!(statements(&session), vec!["a", "b"]);
}

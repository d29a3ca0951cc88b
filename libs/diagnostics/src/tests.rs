use std::fmt::Display;

use test_log::test;

use crate::*;

#[derive(Debug, Clone, PartialEq)]
enum ShapeIssue {
    Empty,
    TooWide(f64),
}

impl Display for ShapeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "shape is empty"),
            Self::TooWide(w) => write!(f, "shape is {w} wide"),
        }
    }
}

impl Diagnostic for ShapeIssue {
    fn help(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::TooWide(_) => Some("use a narrower shape"),
        }
    }
}

#[test]
fn issues_keep_insertion_order() {
    let mut issues = IssueSet::new();
    assert!(issues.is_empty());
    issues.add_and_emit(ShapeIssue::TooWide(3.));
    issues.add_and_emit(ShapeIssue::Empty);
    assert_eq!(issues.len(), 2);
    assert_eq!(
        issues.iter().cloned().collect::<Vec<_>>(),
        vec![ShapeIssue::TooWide(3.), ShapeIssue::Empty]
    );
    assert_eq!((&issues).into_iter().count(), 2);
}

#[test]
fn help_is_optional() {
    assert_eq!(ShapeIssue::Empty.help(), None);
    assert_eq!(ShapeIssue::TooWide(1.).help(), Some("use a narrower shape"));
}

#[test]
fn default_set_is_empty() {
    let issues: IssueSet<ShapeIssue> = IssueSet::default();
    assert_eq!(issues, IssueSet::new());
    assert_eq!(issues.len(), 0);
}

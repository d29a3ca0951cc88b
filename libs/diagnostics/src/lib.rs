//! Non-fatal issues found while building a computation's inputs.
//!
//! An issue is anything worth telling the user that does not stop the work,
//! such as a substrate whose usable area is empty. Issues implement
//! [`Diagnostic`] and are kept in an [`IssueSet`], which logs each one with
//! [`tracing`] as it is added.

#![warn(missing_docs)]

#[cfg(test)]
pub(crate) mod tests;

use std::fmt::{Debug, Display};

/// A non-fatal issue that should be reported to users.
pub trait Diagnostic: Debug + Display {
    /// What the user can change to make the issue go away.
    fn help(&self) -> Option<&str> {
        None
    }
}

/// An ordered list of issues.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueSet<T> {
    issues: Vec<T>,
}

impl<T> IssueSet<T> {
    /// Creates an empty issue set.
    #[inline]
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Iterates over the issues in the order they were added.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.issues.iter()
    }

    /// The number of issues.
    #[inline]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns `true` if no issue was reported.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl<T: Diagnostic> IssueSet<T> {
    /// Logs `issue` as a warning and appends it to the set.
    pub fn add_and_emit(&mut self, issue: T) {
        match issue.help() {
            Some(help) => tracing::warn!(help, "{}", issue),
            None => tracing::warn!("{}", issue),
        }
        self.issues.push(issue);
    }
}

impl<T> Default for IssueSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a IssueSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

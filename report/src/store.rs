//! Suite-wide accumulator of audit results.

use std::rc::Rc;

use tracing::debug;

use crate::outcome::TestRunResult;

/// Collects every audit result of a suite run.
///
/// Each appended result lands in two views that share it: `all`, kept for
/// the whole suite, and `current`, drained after every completed test case.
#[derive(Debug, Default)]
pub struct ResultStore {
    all: Vec<Rc<TestRunResult>>,
    current: Vec<Rc<TestRunResult>>,
}

impl ResultStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a result in both views.
    pub fn append(&mut self, result: TestRunResult) {
        debug!(
            test = %result.test_name,
            passes = result.pass_count(),
            violations = result.violation_count(),
            "audit result recorded"
        );
        let result = Rc::new(result);
        self.all.push(Rc::clone(&result));
        self.current.push(result);
    }

    /// Returns and clears the results recorded since the last drain.
    pub fn drain_current(&mut self) -> Vec<Rc<TestRunResult>> {
        std::mem::take(&mut self.current)
    }

    /// Every result of the suite, in append order.
    pub fn all(&self) -> &[Rc<TestRunResult>] {
        &self.all
    }

    /// Results recorded since the last drain.
    pub fn current(&self) -> &[Rc<TestRunResult>] {
        &self.current
    }

    /// Number of results in the suite.
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Forgets everything.
    pub fn reset(&mut self) {
        self.all.clear();
        self.current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::RawAuditResults;

    fn result(name: &str) -> TestRunResult {
        TestRunResult::from_raw(name, "", RawAuditResults::default())
    }

    #[test]
    fn append_feeds_both_views() {
        let mut store = ResultStore::new();
        store.append(result("a"));
        store.append(result("b"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.current().len(), 2);
        assert!(Rc::ptr_eq(&store.all()[0], &store.current()[0]));
    }

    #[test]
    fn drain_clears_only_current() {
        let mut store = ResultStore::new();
        store.append(result("a"));

        let drained = store.drain_current();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].test_name, "a");
        assert!(store.current().is_empty());
        assert_eq!(store.len(), 1);

        store.append(result("b"));
        let drained = store.drain_current();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].test_name, "b");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn reset_empties_everything() {
        let mut store = ResultStore::new();
        store.append(result("a"));
        store.reset();
        assert!(store.is_empty());
        assert!(store.drain_current().is_empty());
    }
}

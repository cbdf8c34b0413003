//! Operation catalog.
//!
//! [`OpRepo`] is an ordered registry of named binary operations. Code `0`
//! is always the zero-cost `forward` operation; every operation added later
//! costs `1`. The catalog also carries the fitness hook, which is the only
//! coupling between the engine and a concrete problem.

use super::ops;
use super::types::{Feedback, MultiFunction, Sim, Value};
use std::fmt;
use std::sync::Arc;

/// Code of the built-in `forward` operation.
pub const FORWARD: usize = 0;

/// A binary operation on values.
pub type ValueOp2 = fn(Value, Value) -> Value;

/// Fitness hook: computes one weakness per alternative.
pub type FeedbackFn = dyn Fn(&dyn MultiFunction) -> Feedback + Send + Sync;

/// Passes `lhs` through unchanged.
pub fn forward_op(lhs: Value, _rhs: Value) -> Value {
    lhs
}

/// One catalog entry.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Name used for symbolic rendering.
    pub name: String,
    /// Function applied by [`OpRepo::perform`].
    pub fun: ValueOp2,
    /// Execution cost weight.
    pub cost: usize,
}

/// Available operations plus the fitness hook.
///
/// # Examples
///
/// ```
/// use u_gp::gp::{ops, MultiFunction, OpRepo};
///
/// let repo = OpRepo::new(|fun: &dyn MultiFunction| vec![0.0; fun.num_alternatives()])
///     .add("add", ops::add)
///     .add("mul", ops::mul);
///
/// assert_eq!(repo.max_op(), 2);
/// assert_eq!(repo.name_of(0), "forward");
/// assert_eq!(repo.cost_of(0), 0);
/// assert_eq!(repo.perform(2, 6, 7), 42);
/// ```
#[derive(Clone)]
pub struct OpRepo {
    find_weakness: Arc<FeedbackFn>,
    list: Vec<Entry>,
}

impl OpRepo {
    /// Creates a catalog holding only `forward`.
    pub fn new<F>(find_weakness: F) -> Self
    where
        F: Fn(&dyn MultiFunction) -> Feedback + Send + Sync + 'static,
    {
        Self {
            find_weakness: Arc::new(find_weakness),
            list: vec![Entry {
                name: "forward".into(),
                fun: forward_op,
                cost: 0,
            }],
        }
    }

    /// Creates a catalog with the standard operations from [`ops`].
    ///
    /// Codes: `add`=1, `sub`=2, `mul`=3, `div`=4, `mod`=5, `pow`=6,
    /// `and`=7, `or`=8, `xor`=9.
    pub fn with_arithmetic<F>(find_weakness: F) -> Self
    where
        F: Fn(&dyn MultiFunction) -> Feedback + Send + Sync + 'static,
    {
        Self::new(find_weakness)
            .add("add", ops::add)
            .add("sub", ops::sub)
            .add("mul", ops::mul)
            .add("div", ops::div)
            .add("mod", ops::rem)
            .add("pow", ops::pow)
            .add("and", ops::and)
            .add("or", ops::or)
            .add("xor", ops::xor)
    }

    /// Appends an operation with cost `1`.
    pub fn add(mut self, name: impl Into<String>, fun: ValueOp2) -> Self {
        self.list.push(Entry {
            name: name.into(),
            fun,
            cost: 1,
        });
        self
    }

    /// Returns the name of operation `code`.
    ///
    /// # Panics
    /// Panics if `code > self.max_op()`.
    pub fn name_of(&self, code: usize) -> &str {
        &self.entry(code).name
    }

    /// Returns the cost of operation `code`.
    ///
    /// # Panics
    /// Panics if `code > self.max_op()`.
    pub fn cost_of(&self, code: usize) -> usize {
        self.entry(code).cost
    }

    /// Highest valid operation code.
    pub fn max_op(&self) -> usize {
        self.list.len() - 1
    }

    /// Number of entries, `forward` included.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Always `false`: `forward` is never removed.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Looks up the code of the first operation named `name`.
    pub fn code_of(&self, name: &str) -> Option<usize> {
        self.list.iter().position(|e| e.name == name)
    }

    /// Applies operation `code` to `lhs` and `rhs`.
    ///
    /// # Panics
    /// Panics if `code > self.max_op()`.
    pub fn perform(&self, code: usize, lhs: Value, rhs: Value) -> Value {
        (self.entry(code).fun)(lhs, rhs)
    }

    /// Runs the fitness hook on `sim` and feeds the result back into it.
    pub fn find_weakness<S: Sim>(&self, sim: &mut S) {
        let feedback = (self.find_weakness)(&*sim);
        sim.handle_feedback(&feedback);
    }

    fn entry(&self, code: usize) -> &Entry {
        assert!(
            code <= self.max_op(),
            "operation code {code} out of range (max {})",
            self.max_op()
        );
        &self.list[code]
    }
}

impl fmt::Debug for OpRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpRepo")
            .field("ops", &self.list.iter().map(|e| &e.name).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_feedback(fun: &dyn MultiFunction) -> Feedback {
        vec![0.0; fun.num_alternatives()]
    }

    #[test]
    fn test_forward_is_code_zero() {
        let repo = OpRepo::new(no_feedback);
        assert_eq!(repo.max_op(), 0);
        assert_eq!(repo.name_of(FORWARD), "forward");
        assert_eq!(repo.cost_of(FORWARD), 0);
        assert_eq!(repo.perform(FORWARD, 5, 9), 5);
    }

    #[test]
    fn test_added_ops_cost_one() {
        let repo = OpRepo::new(no_feedback)
            .add("sub", ops::sub)
            .add("xor", ops::xor);
        assert_eq!(repo.max_op(), 2);
        assert_eq!(repo.len(), 3);
        assert_eq!(repo.cost_of(1), 1);
        assert_eq!(repo.cost_of(2), 1);
        assert_eq!(repo.name_of(1), "sub");
        assert_eq!(repo.perform(1, 5, 9), -4);
        assert_eq!(repo.perform(2, 5, 9), 12);
    }

    #[test]
    fn test_arithmetic_codes() {
        let repo = OpRepo::with_arithmetic(no_feedback);
        assert_eq!(repo.max_op(), 9);
        assert_eq!(repo.code_of("add"), Some(1));
        assert_eq!(repo.code_of("mod"), Some(5));
        assert_eq!(repo.code_of("pow"), Some(6));
        assert_eq!(repo.code_of("xor"), Some(9));
        assert_eq!(repo.code_of("nand"), None);
        assert_eq!(repo.perform(4, 1, 0), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_name_of_out_of_range_panics() {
        let repo = OpRepo::new(no_feedback).add("add", ops::add);
        repo.name_of(2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_perform_out_of_range_panics() {
        let repo = OpRepo::new(no_feedback);
        repo.perform(1, 0, 0);
    }

    #[test]
    fn test_debug_lists_names() {
        let repo = OpRepo::new(no_feedback).add("add", ops::add);
        let text = format!("{repo:?}");
        assert!(text.contains("forward"));
        assert!(text.contains("add"));
    }
}

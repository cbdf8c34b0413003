//! Programs as flat, topologically ordered operation lists.
//!
//! A [`Program`] is a DAG of binary operations over a fixed number of
//! inputs. Operands are [`Ref`]s, which address either an input or an
//! operation at a strictly earlier position, so the list is always a valid
//! evaluation order and can never contain a cycle.
//!
//! The list is divided into *slots* of `out_cnt` consecutive operations.
//! Each slot is one candidate output vector (an *alternative*).
//!
//! # Analyses
//!
//! - [`Program::get_cost`]: cost reachable from a slot, shared nodes counted once
//! - [`Program::size_of`]: expanded tree size, shared nodes counted per use
//! - [`Program::as_string`]: fully expanded `name(lhs,rhs)` rendering
//!
//! Cost deduplicates shared subexpressions and size does not; the two
//! answer different questions and must stay that way.

use super::repo::{OpRepo, FORWARD};
use super::stats::Stats;
use super::types::{Alternatives, MultiFunction, Sim, Value, Weakness};
use rand::Rng;
use std::sync::Arc;

/// Expressions expanding to more nodes than this render as a placeholder.
pub const MAX_RENDER_NODES: usize = 9000;

/// Operand reference: a program input or an earlier operation's result.
///
/// # Examples
///
/// ```
/// use u_gp::gp::Ref;
///
/// let a = Ref::input(2);
/// assert!(a.is_input());
/// assert_eq!(a.in_idx(), 2);
/// assert_eq!(Ref::nop(), Ref::input(0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ref {
    /// Input slot `k`.
    Input(usize),
    /// Result of the operation at position `k`.
    Op(usize),
}

impl Ref {
    /// References input `idx`.
    pub fn input(idx: usize) -> Self {
        Ref::Input(idx)
    }

    /// References the operation at position `idx`.
    pub fn op(idx: usize) -> Self {
        Ref::Op(idx)
    }

    /// Filler for the unused operand of `forward`.
    pub fn nop() -> Self {
        Ref::Input(0)
    }

    /// Draws uniformly from all inputs and all operations before `limit`.
    ///
    /// The `in_cnt + limit` candidates are equally likely.
    ///
    /// # Panics
    /// Panics if `in_cnt + limit == 0`.
    pub fn random<R: Rng>(rng: &mut R, in_cnt: usize, limit: usize) -> Self {
        assert!(in_cnt + limit > 0, "no reference to draw from");
        let idx = rng.random_range(0..in_cnt + limit);
        if idx < in_cnt {
            Ref::Input(idx)
        } else {
            Ref::Op(idx - in_cnt)
        }
    }

    /// Whether this references an input.
    pub fn is_input(&self) -> bool {
        matches!(self, Ref::Input(_))
    }

    /// Whether this references an operation.
    pub fn is_operation(&self) -> bool {
        matches!(self, Ref::Op(_))
    }

    /// Input index.
    ///
    /// # Panics
    /// Panics if this references an operation.
    pub fn in_idx(&self) -> usize {
        match *self {
            Ref::Input(idx) => idx,
            Ref::Op(idx) => panic!("op({idx}) is not an input reference"),
        }
    }

    /// Operation index.
    ///
    /// # Panics
    /// Panics if this references an input.
    pub fn op_idx(&self) -> usize {
        match *self {
            Ref::Op(idx) => idx,
            Ref::Input(idx) => panic!("in({idx}) is not an operation reference"),
        }
    }
}

/// A single operation node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Op {
    /// Catalog code; [`FORWARD`] ignores `rhs`.
    pub code: usize,
    /// Left operand.
    pub lhs: Ref,
    /// Right operand.
    pub rhs: Ref,
}

/// The edit applied by one mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MutationKind {
    /// Draw a new operation code.
    ReplaceCode,
    /// Draw a new left operand.
    ReplaceLhs,
    /// Draw a new right operand.
    ReplaceRhs,
}

impl MutationKind {
    /// Picks one of the three edits uniformly.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        match rng.random_range(0..3) {
            0 => MutationKind::ReplaceCode,
            1 => MutationKind::ReplaceLhs,
            _ => MutationKind::ReplaceRhs,
        }
    }
}

/// Record of an applied mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation {
    /// Position of the edited operation.
    pub position: usize,
    /// What was edited.
    pub kind: MutationKind,
}

/// An individual: operation list, shape, and fitness state.
#[derive(Debug, Clone)]
pub struct Program {
    repo: Arc<OpRepo>,
    stats: Stats,
    in_cnt: usize,
    out_cnt: usize,
    program: Vec<Op>,
    best_slot: usize,
}

impl Program {
    /// Creates an empty program born in generation `gen`.
    ///
    /// # Panics
    /// Panics if `out_cnt == 0`.
    pub fn new(repo: Arc<OpRepo>, in_cnt: usize, out_cnt: usize, gen: usize) -> Self {
        assert!(out_cnt > 0, "programs must have at least one output");
        Self {
            repo,
            stats: Stats::unevaluated(gen),
            in_cnt,
            out_cnt,
            program: Vec::new(),
            best_slot: 0,
        }
    }

    fn assert_valid(&self, r: Ref, limit: usize) {
        match r {
            Ref::Input(idx) => assert!(
                idx < self.in_cnt,
                "input reference {idx} out of range (in_cnt {})",
                self.in_cnt
            ),
            Ref::Op(idx) => assert!(
                idx < limit,
                "operation reference {idx} must point before position {limit}"
            ),
        }
    }

    fn rnd_op<R: Rng>(&self, rng: &mut R) -> usize {
        rng.random_range(0..=self.repo.max_op())
    }

    fn rnd_ref<R: Rng>(&self, rng: &mut R, limit: usize) -> Ref {
        Ref::random(rng, self.in_cnt, limit)
    }

    /// Appends an operation and returns a reference to its result.
    ///
    /// # Panics
    /// Panics if `code` is not in the catalog or an operand does not
    /// reference an input or an earlier operation.
    pub fn add_op(&mut self, code: usize, lhs: Ref, rhs: Ref) -> Ref {
        let op_idx = self.program.len();
        assert!(
            code <= self.repo.max_op(),
            "operation code {code} out of range (max {})",
            self.repo.max_op()
        );
        self.assert_valid(lhs, op_idx);
        self.assert_valid(rhs, op_idx);
        self.program.push(Op { code, lhs, rhs });
        Ref::op(op_idx)
    }

    /// Appends a zero-cost pass-through of `r`.
    pub fn add_forward(&mut self, r: Ref) -> Ref {
        self.add_op(FORWARD, r, Ref::nop())
    }

    /// Appends random operations until the program holds `op_cnt` of them.
    ///
    /// # Panics
    /// Panics if `op_cnt` is not a positive multiple of `out_cnt`.
    pub fn grow<R: Rng>(&mut self, rng: &mut R, op_cnt: usize) {
        assert!(
            op_cnt >= self.out_cnt && op_cnt % self.out_cnt == 0,
            "op_cnt {op_cnt} must be a positive multiple of out_cnt {}",
            self.out_cnt
        );
        while self.program.len() < op_cnt {
            let op_idx = self.program.len();
            let code = self.rnd_op(rng);
            let lhs = self.rnd_ref(rng, op_idx);
            let rhs = self.rnd_ref(rng, op_idx);
            self.add_op(code, lhs, rhs);
        }
    }

    /// Applies one random edit to a random operation.
    ///
    /// New operands only reference positions before the edited one.
    ///
    /// # Panics
    /// Panics if the program is empty.
    pub fn mutate<R: Rng>(&mut self, rng: &mut R) -> Mutation {
        assert!(!self.program.is_empty(), "cannot mutate an empty program");
        let position = rng.random_range(0..self.program.len());
        let kind = MutationKind::random(rng);
        match kind {
            MutationKind::ReplaceCode => self.program[position].code = self.rnd_op(rng),
            MutationKind::ReplaceLhs => self.program[position].lhs = self.rnd_ref(rng, position),
            MutationKind::ReplaceRhs => self.program[position].rhs = self.rnd_ref(rng, position),
        }
        Mutation { position, kind }
    }

    /// Resets the birth generation.
    pub fn reborn(&mut self, gen: usize) {
        self.stats.born = gen;
    }

    /// Current fitness state.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Slot selected by the last [`handle_feedback`](Sim::handle_feedback).
    pub fn best_slot(&self) -> usize {
        self.best_slot
    }

    /// The operation list.
    pub fn ops(&self) -> &[Op] {
        &self.program
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.program.len()
    }

    /// Whether no operation has been added yet.
    pub fn is_empty(&self) -> bool {
        self.program.is_empty()
    }

    /// The shared operation catalog.
    pub fn repo(&self) -> &OpRepo {
        &self.repo
    }

    /// References to the `out_cnt` outputs of `slot`.
    ///
    /// # Panics
    /// Panics if the slot lies beyond the end of the program.
    pub fn slot_refs(&self, slot: usize) -> Vec<Ref> {
        let offset = self.slot_offset(slot);
        (offset..offset + self.out_cnt).map(Ref::op).collect()
    }

    fn slot_offset(&self, slot: usize) -> usize {
        let offset = slot * self.out_cnt;
        assert!(
            offset + self.out_cnt <= self.program.len(),
            "slot {slot} out of range ({} operations, out_cnt {})",
            self.program.len(),
            self.out_cnt
        );
        offset
    }

    /// Total cost of the operations reachable from the outputs of `slot`.
    ///
    /// Each operation is counted once no matter how many paths reach it.
    /// `forward` costs nothing and only its left operand is followed.
    ///
    /// # Panics
    /// Panics if the slot lies beyond the end of the program.
    pub fn get_cost(&self, slot: usize) -> usize {
        let offset = self.slot_offset(slot);
        let mut cost = 0;
        let mut done = vec![false; self.program.len()];
        let mut todo: Vec<Ref> = (offset..offset + self.out_cnt).map(Ref::op).collect();
        while let Some(r) = todo.pop() {
            let Ref::Op(idx) = r else { continue };
            if done[idx] {
                continue;
            }
            done[idx] = true;
            let op = &self.program[idx];
            cost += self.repo.cost_of(op.code);
            todo.push(op.lhs);
            if op.code != FORWARD {
                todo.push(op.rhs);
            }
        }
        cost
    }

    /// Number of nodes in the fully expanded expression behind `r`.
    ///
    /// Inputs count 1, `forward` adds nothing, every other operation adds
    /// 1 plus both operand sizes. Shared operations are counted once per
    /// use, so heavily shared programs can grow exponentially; the count
    /// saturates at `usize::MAX`.
    ///
    /// # Panics
    /// Panics if `r` does not reference an input or an existing operation.
    pub fn size_of(&self, r: Ref) -> usize {
        self.assert_valid(r, self.program.len());
        let target = match r {
            Ref::Input(_) => return 1,
            Ref::Op(idx) => idx,
        };
        let mut sizes: Vec<usize> = Vec::with_capacity(target + 1);
        let get = |sizes: &[usize], r: Ref| match r {
            Ref::Input(_) => 1,
            Ref::Op(idx) => sizes[idx],
        };
        for op in &self.program[..=target] {
            let size = if op.code == FORWARD {
                get(&sizes, op.lhs)
            } else {
                get(&sizes, op.lhs)
                    .saturating_add(get(&sizes, op.rhs))
                    .saturating_add(1)
            };
            sizes.push(size);
        }
        sizes[target]
    }

    /// Renders the expression behind `r` as nested `name(lhs,rhs)` text.
    ///
    /// Inputs render as `iN`; `forward` nodes are transparent, however long
    /// the chain. Expressions larger than [`MAX_RENDER_NODES`] render as
    /// `expr(N nodes)`.
    ///
    /// # Panics
    /// Panics if `r` does not reference an input or an existing operation.
    pub fn as_string(&self, r: Ref) -> String {
        let expr_size = self.size_of(r);
        if expr_size > MAX_RENDER_NODES {
            return format!("expr({expr_size} nodes)");
        }
        let mut out = String::new();
        self.render(r, &mut out);
        out
    }

    fn render(&self, r: Ref, out: &mut String) {
        // explicit stack: long forward chains have size 1 but unbounded depth
        let mut todo = vec![Render::Expr(r)];
        while let Some(step) = todo.pop() {
            match step {
                Render::Text(c) => out.push(c),
                Render::Expr(Ref::Input(idx)) => {
                    out.push('i');
                    out.push_str(&idx.to_string());
                }
                Render::Expr(Ref::Op(idx)) => {
                    let op = &self.program[idx];
                    if op.code == FORWARD {
                        todo.push(Render::Expr(op.lhs));
                    } else {
                        out.push_str(self.repo.name_of(op.code));
                        out.push('(');
                        todo.push(Render::Text(')'));
                        todo.push(Render::Expr(op.rhs));
                        todo.push(Render::Text(','));
                        todo.push(Render::Expr(op.lhs));
                    }
                }
            }
        }
    }
}

enum Render {
    Expr(Ref),
    Text(char),
}

impl MultiFunction for Program {
    fn num_inputs(&self) -> usize {
        self.in_cnt
    }

    fn num_outputs(&self) -> usize {
        self.out_cnt
    }

    fn num_alternatives(&self) -> usize {
        self.program.len() / self.out_cnt
    }

    /// Evaluates every operation in order; each slot yields one alternative.
    fn execute(&self, input: &[Value]) -> Alternatives {
        assert_eq!(
            input.len(),
            self.in_cnt,
            "expected {} inputs, got {}",
            self.in_cnt,
            input.len()
        );
        let mut values: Vec<Value> = Vec::with_capacity(self.program.len());
        for op in &self.program {
            let get = |r: Ref| match r {
                Ref::Input(idx) => input[idx],
                Ref::Op(idx) => values[idx],
            };
            let value = self.repo.perform(op.code, get(op.lhs), get(op.rhs));
            values.push(value);
        }
        values
            .chunks_exact(self.out_cnt)
            .map(<[Value]>::to_vec)
            .collect()
    }
}

impl Sim for Program {
    /// Scores every slot and keeps the best one's stats.
    ///
    /// All slots share this program's birth generation, so ties between
    /// slots are decided by cost and then by slot order (earliest wins).
    fn handle_feedback(&mut self, feedback: &[Weakness]) {
        assert_eq!(
            feedback.len(),
            self.num_alternatives(),
            "feedback must hold one weakness per alternative"
        );
        let born = self.stats.born;
        let mut best_slot = 0;
        let mut best = Stats::new(feedback[0], self.get_cost(0), born);
        for (slot, &weakness) in feedback.iter().enumerate().skip(1) {
            let stats = Stats::new(weakness, self.get_cost(slot), born);
            if stats < best {
                best = stats;
                best_slot = slot;
            }
        }
        self.stats = best;
        self.best_slot = best_slot;
        log::trace!(
            "feedback: slot {} of {} (weakness={}, cost={})",
            best_slot,
            feedback.len(),
            best.weakness,
            best.cost
        );
    }
}

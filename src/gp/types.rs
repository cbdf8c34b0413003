//! Core value types and the evaluation boundary.
//!
//! [`MultiFunction`] is the read-only capability set handed to a fitness
//! hook; [`Sim`] adds the single write path the engine uses to store the
//! hook's verdict back into an individual.

/// All inputs, outputs and intermediate values have this type.
pub type Value = i32;

/// Externally computed fitness score. Lower is better.
pub type Weakness = f64;

/// Output values of one alternative.
pub type Output = Vec<Value>;

/// Output values of every alternative, in slot order.
pub type Alternatives = Vec<Output>;

/// Weakness per alternative, in slot order.
pub type Feedback = Vec<Weakness>;

/// Multiple alternatives for a function taking multiple inputs and
/// producing multiple outputs.
///
/// A fitness hook only ever sees an individual through this trait, so it
/// cannot mutate engine state.
///
/// # Examples
///
/// ```
/// use u_gp::gp::{Feedback, MultiFunction};
///
/// fn find_weakness(fun: &dyn MultiFunction) -> Feedback {
///     let input = vec![3; fun.num_inputs()];
///     fun.execute(&input)
///         .iter()
///         .map(|out| out.iter().map(|v| (v - 7).abs() as f64).sum::<f64>())
///         .collect()
/// }
/// # let _ = find_weakness;
/// ```
pub trait MultiFunction {
    /// Number of values expected by [`execute`](Self::execute).
    fn num_inputs(&self) -> usize;

    /// Number of values in each produced [`Output`].
    fn num_outputs(&self) -> usize;

    /// Number of alternatives produced per execution.
    fn num_alternatives(&self) -> usize;

    /// Runs the function on `input`, producing one [`Output`] per alternative.
    ///
    /// # Panics
    /// Panics if `input.len() != self.num_inputs()`.
    fn execute(&self, input: &[Value]) -> Alternatives;
}

/// A simulated individual: a [`MultiFunction`] that accepts feedback.
pub trait Sim: MultiFunction {
    /// Stores the result of fitness evaluation.
    ///
    /// `feedback` holds one weakness per alternative.
    fn handle_feedback(&mut self, feedback: &[Weakness]);
}

//! Exemplar-driven pixel synthesis by incremental adjacency-rule collapse
//!
//! Pairwise color adjacency statistics are learned from an exemplar image
//! over a diamond neighborhood. An output grid is then resolved one pixel at
//! a time: the most constrained cell is picked, a color is drawn in
//! proportion to its accumulated rule support, and the decision is
//! propagated to every neighbor. There is no backtracking; cells that run out
//! of candidates stay unresolved and are reported.

#![forbid(unsafe_code)]

/// Priority buckets, propagation, selection and the generation session
pub mod algorithm;
/// Exemplar access and rule learning
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Neighborhood offsets and grid state
pub mod spatial;

pub use algorithm::executor::{GenerationSession, GenerationStats, StepOutcome, Synthesizer};
pub use analysis::exemplar::{ColorSource, Exemplar};
pub use analysis::rules::LearnedModel;
pub use io::error::{AlgorithmError, Result};

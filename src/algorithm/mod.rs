/// Unresolved cells bucketed by viable candidate count
pub mod buckets;
/// Generation session, stepping and the host-side synthesizer
pub mod executor;
/// Constraint propagation from a newly fixed cell
pub mod propagation;
/// Most-constrained cell selection and weighted color draws
pub mod selection;

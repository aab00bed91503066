/// Exemplar images and the color source abstraction
pub mod exemplar;
/// Palette, adjacency rules and the learned model
pub mod rules;

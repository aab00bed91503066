//! Algorithm limits and runtime configuration defaults

/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Default Manhattan radius of the neighborhood diamond
pub const DEFAULT_RADIUS: usize = 1;

/// Default side length of the square output grid
pub const DEFAULT_SIZE: usize = 64;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed output grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;

// One u64 per cell and palette color, 1 GiB at the limit
/// Maximum number of candidate weights a session may allocate
pub const MAX_CANDIDATE_WEIGHTS: usize = 1 << 27;

// Offset count grows quadratically with the radius, as does the rule table
/// Maximum accepted neighborhood radius
pub const MAX_RADIUS: usize = 16;

/// Placeholder shown for cells that are not resolved yet
pub const UNSET_COLOR: [u8; 4] = [128, 128, 128, 230];

/// Color used when a border sentinel has to be drawn
pub const OUTSIDE_COLOR: [u8; 4] = [0, 0, 0, 0];

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_result";
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 5;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 50;

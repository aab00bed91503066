//! Diamond-shaped neighborhood offsets defining every adjacency relation

use crate::io::configuration::MAX_RADIUS;
use crate::io::error::{Result, invalid_parameter};

/// Relative displacement between two pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Offset {
    /// Horizontal displacement
    pub dx: i32,
    /// Vertical displacement
    pub dy: i32,
}

impl Offset {
    /// Create an offset from its components
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// The offset pointing the opposite way
    pub const fn reversed(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
        }
    }

    /// Manhattan length of the offset
    pub const fn manhattan(self) -> u32 {
        self.dx.unsigned_abs() + self.dy.unsigned_abs()
    }

    /// Apply the offset to a position, which may land outside any grid
    pub const fn apply(self, x: i64, y: i64) -> (i64, i64) {
        (x + self.dx as i64, y + self.dy as i64)
    }
}

/// All offsets with Manhattan distance at most `radius`, zero offset included
///
/// The set is symmetric: every offset's reverse is also a member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborhoodOffsets {
    radius: usize,
    offsets: Vec<Offset>,
}

impl NeighborhoodOffsets {
    /// Build the diamond for the given radius
    ///
    /// # Errors
    ///
    /// Returns an error if the radius exceeds `MAX_RADIUS`
    pub fn new(radius: usize) -> Result<Self> {
        if radius > MAX_RADIUS {
            return Err(invalid_parameter(
                "radius",
                &radius,
                &format!("must be at most {MAX_RADIUS}"),
            ));
        }

        let r = radius as i32;
        let mut offsets = Vec::with_capacity(2 * radius * (radius + 1) + 1);
        for dx in -r..=r {
            for dy in -r..=r {
                let offset = Offset::new(dx, dy);
                if offset.manhattan() <= radius as u32 {
                    offsets.push(offset);
                }
            }
        }

        Ok(Self { radius, offsets })
    }

    /// Radius the diamond was built with
    pub const fn radius(&self) -> usize {
        self.radius
    }

    /// Number of offsets in the set
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Always false, the zero offset is a member of every neighborhood
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Membership test
    pub fn contains(&self, offset: Offset) -> bool {
        offset.manhattan() <= self.radius as u32
    }

    /// Iterate over the offsets
    pub fn iter(&self) -> std::slice::Iter<'_, Offset> {
        self.offsets.iter()
    }

    /// Offsets as a slice
    pub fn as_slice(&self) -> &[Offset] {
        &self.offsets
    }
}

impl<'a> IntoIterator for &'a NeighborhoodOffsets {
    type Item = &'a Offset;
    type IntoIter = std::slice::Iter<'a, Offset>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! Palette and adjacency rule learning from an exemplar
//!
//! Every exemplar pixel is paired with every neighborhood offset. The pixel's
//! own color becomes `c1`, whatever sits at the offset becomes `c2` (the edge
//! sentinel when the offset leaves the image), and identical observations
//! are merged by counting occurrences.

use crate::analysis::exemplar::ColorSource;
use crate::io::error::{AlgorithmError, Result};
use crate::spatial::grid::Neighbor;
use crate::spatial::neighborhood::{NeighborhoodOffsets, Offset};
use std::collections::HashMap;
use std::fmt;

/// Distinct exemplar colors with dense indices in first-seen order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<[u8; 4]>,
    lookup: HashMap<[u8; 4], usize>,
}

impl Palette {
    /// Create an empty palette
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of a color, inserting it if unseen
    pub fn intern(&mut self, color: [u8; 4]) -> usize {
        if let Some(&index) = self.lookup.get(&color) {
            return index;
        }
        let index = self.colors.len();
        self.colors.push(color);
        self.lookup.insert(color, index);
        index
    }

    /// Index of a known color
    pub fn index_of(&self, color: [u8; 4]) -> Option<usize> {
        self.lookup.get(&color).copied()
    }

    /// RGBA value of a palette index
    pub fn color(&self, index: usize) -> Option<[u8; 4]> {
        self.colors.get(index).copied()
    }

    /// Number of distinct colors
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True before any color has been seen
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colors in index order
    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors
    }

    fn describe(&self, neighbor: Neighbor) -> String {
        match neighbor {
            Neighbor::Outside => "outside".to_string(),
            Neighbor::Color(index) => self.color(index).map_or_else(
                || format!("color {index}"),
                |[r, g, b, a]| format!("#{r:02x}{g:02x}{b:02x}{a:02x}"),
            ),
        }
    }
}

/// Adjacency observation: a cell holding `c1` had `c2` at `offset`
///
/// Read the other way round, `c1` may appear at the reversed offset from a
/// cell holding `c2`, which is the form propagation consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rule {
    /// Palette index of the scanned cell
    pub c1: usize,
    /// What was found at `offset` from it
    pub c2: Neighbor,
    /// Displacement from `c1` to `c2`
    pub offset: Offset,
    /// Number of exemplar positions showing this relation
    pub occurrences: u64,
}

impl Rule {
    /// Render the rule with actual colors
    pub const fn display<'a>(&'a self, palette: &'a Palette) -> RuleDisplay<'a> {
        RuleDisplay {
            rule: self,
            palette,
        }
    }
}

/// Human readable form of a rule, see [`Rule::display`]
pub struct RuleDisplay<'a> {
    rule: &'a Rule,
    palette: &'a Palette,
}

impl fmt::Display for RuleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sees {} at {}/{} ({}x)",
            self.palette.describe(Neighbor::Color(self.rule.c1)),
            self.palette.describe(self.rule.c2),
            self.rule.offset.dx,
            self.rule.offset.dy,
            self.rule.occurrences
        )
    }
}

/// Deduplicated rule list, unique per `(c1, c2, offset)`
#[derive(Clone, Debug, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
    positions: HashMap<(usize, Neighbor, Offset), usize>,
}

impl RuleTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation, merging with an existing identical rule
    pub fn observe(&mut self, c1: usize, c2: Neighbor, offset: Offset) {
        use std::collections::hash_map::Entry;

        match self.positions.entry((c1, c2, offset)) {
            Entry::Occupied(entry) => {
                if let Some(rule) = self.rules.get_mut(*entry.get()) {
                    rule.occurrences += 1;
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(self.rules.len());
                self.rules.push(Rule {
                    c1,
                    c2,
                    offset,
                    occurrences: 1,
                });
            }
        }
    }

    /// Look up a single rule
    pub fn get(&self, c1: usize, c2: Neighbor, offset: Offset) -> Option<&Rule> {
        self.positions
            .get(&(c1, c2, offset))
            .and_then(|&position| self.rules.get(position))
    }

    /// Rules in first-observed order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of distinct rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when nothing was observed
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Sum of all occurrence counts
    pub fn total_occurrences(&self) -> u64 {
        self.rules.iter().map(|rule| rule.occurrences).sum()
    }
}

/// Summed rule support keyed by `(c2, offset)`
///
/// For a key, the vector holds, per palette color `c1`, the total occurrences
/// of rules `(c1, c2, offset)`. A missing key means no rule mentions that
/// relation at all.
#[derive(Clone, Debug, Default)]
pub struct RuleIndex {
    support: HashMap<(Neighbor, Offset), Vec<u64>>,
}

impl RuleIndex {
    /// Aggregate a rule table for a palette of `palette_len` colors
    pub fn build(table: &RuleTable, palette_len: usize) -> Self {
        let mut support: HashMap<(Neighbor, Offset), Vec<u64>> = HashMap::new();
        for rule in table.rules() {
            let sums = support
                .entry((rule.c2, rule.offset))
                .or_insert_with(|| vec![0; palette_len]);
            if let Some(sum) = sums.get_mut(rule.c1) {
                *sum += rule.occurrences;
            }
        }
        Self { support }
    }

    /// Per-`c1` occurrences of `c2` sitting at `offset` from `c1`
    pub fn support(&self, c2: Neighbor, offset: Offset) -> Option<&[u64]> {
        self.support.get(&(c2, offset)).map(Vec::as_slice)
    }

    /// Number of distinct `(c2, offset)` keys
    pub fn len(&self) -> usize {
        self.support.len()
    }

    /// True when no rules were indexed
    pub fn is_empty(&self) -> bool {
        self.support.is_empty()
    }
}

/// Everything learned from one exemplar at one radius
///
/// Immutable once built and shared read-only by generation sessions.
#[derive(Clone, Debug)]
pub struct LearnedModel {
    offsets: NeighborhoodOffsets,
    palette: Palette,
    rules: RuleTable,
    index: RuleIndex,
}

impl LearnedModel {
    /// Scan the exemplar and learn palette and rules for the given radius
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The radius exceeds the configured maximum
    /// - The exemplar has no pixels
    pub fn learn<S: ColorSource + ?Sized>(source: &S, radius: usize) -> Result<Self> {
        let offsets = NeighborhoodOffsets::new(radius)?;
        Self::learn_with_offsets(source, offsets)
    }

    /// Learn against an already built neighborhood
    ///
    /// # Errors
    ///
    /// Returns an error if the exemplar has no pixels
    pub fn learn_with_offsets<S: ColorSource + ?Sized>(
        source: &S,
        offsets: NeighborhoodOffsets,
    ) -> Result<Self> {
        let (width, height) = (source.width(), source.height());
        if width == 0 || height == 0 {
            return Err(AlgorithmError::InvalidSourceData {
                reason: "Exemplar must contain at least one pixel".to_string(),
            });
        }

        let mut palette = Palette::new();
        let mut rules = RuleTable::new();

        for y in 0..height {
            for x in 0..width {
                let Some(color) = source.color_at(x, y) else {
                    continue;
                };
                let c1 = palette.intern(color);

                for &offset in &offsets {
                    let target = offset.apply(x as i64, y as i64);
                    let c2 = exemplar_neighbor(source, &mut palette, target, width, height);
                    rules.observe(c1, c2, offset);
                }
            }
        }

        let index = RuleIndex::build(&rules, palette.len());

        Ok(Self {
            offsets,
            palette,
            rules,
            index,
        })
    }

    /// Neighborhood the rules were learned with
    pub const fn offsets(&self) -> &NeighborhoodOffsets {
        &self.offsets
    }

    /// Learned palette
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Learned rule table
    pub const fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Keyed support lookup used during propagation
    pub const fn index(&self) -> &RuleIndex {
        &self.index
    }

    /// Radius the neighborhood was built with
    pub const fn radius(&self) -> usize {
        self.offsets.radius()
    }
}

// Neighbor colors may be seen before the scan reaches them, so they are
// interned here as well to keep indices dense.
fn exemplar_neighbor<S: ColorSource + ?Sized>(
    source: &S,
    palette: &mut Palette,
    target: (i64, i64),
    width: usize,
    height: usize,
) -> Neighbor {
    crate::spatial::grid::checked_position(target.0, target.1, width, height)
        .and_then(|(x, y)| source.color_at(x, y))
        .map_or(Neighbor::Outside, |color| {
            Neighbor::Color(palette.intern(color))
        })
}

use crate::{
    algorithm::buckets::PriorityBuckets,
    algorithm::propagation::{PropagationReport, propagate_fixed_cell},
    algorithm::selection::{RandomSelector, Selection, select_next_cell},
    analysis::exemplar::ColorSource,
    analysis::rules::LearnedModel,
    io::configuration::{MAX_CANDIDATE_WEIGHTS, MAX_GRID_DIMENSION},
    io::error::{Result, computation_error, invalid_parameter},
    io::visualization::VisualizationCapture,
    spatial::grid::{CandidateGrid, Neighbor, OutputGrid, Pixel, Position},
};
use ndarray::ArrayView1;

/// Outcome of a single generation step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// One cell was fixed
    Resolved {
        /// Column of the fixed cell
        x: usize,
        /// Row of the fixed cell
        y: usize,
        /// Palette index drawn for it
        color: usize,
    },
    /// Unresolved cells remain, but every one of them is a contradiction
    Stuck {
        /// Number of cells left without a viable color
        contradictions: usize,
    },
    /// Every cell has been fixed
    Exhausted,
}

impl StepOutcome {
    /// Whether further steps can make progress
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Resolved { .. })
    }
}

/// Counters describing a run so far
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Cells fixed by the selector
    pub resolved: usize,
    /// Cells currently stuck in the contradiction bucket
    pub contradictions: usize,
    /// Cells still unset, contradictions included
    pub unresolved: usize,
    /// Calls to `step` that did work, terminal ones included
    pub steps: usize,
}

/// Validate output dimensions before anything is allocated
///
/// # Errors
///
/// Returns an error if either dimension is zero or exceeds `MAX_GRID_DIMENSION`
pub fn validate_dimensions(width: usize, height: usize) -> Result<()> {
    for (parameter, value) in [("width", width), ("height", height)] {
        if value == 0 {
            return Err(invalid_parameter(parameter, &value, &"must be at least 1"));
        }
        if value > MAX_GRID_DIMENSION {
            return Err(invalid_parameter(
                parameter,
                &value,
                &format!("must be at most {MAX_GRID_DIMENSION}"),
            ));
        }
    }
    Ok(())
}

/// One generation run over a fresh output grid
///
/// Owns the output pixels, the candidate weights and the priority buckets.
/// The learned model is borrowed read-only, so several sequential runs can
/// share it.
pub struct GenerationSession<'m> {
    model: &'m LearnedModel,
    output: OutputGrid,
    candidates: CandidateGrid,
    buckets: PriorityBuckets,
    random_selector: RandomSelector,
    resolved: usize,
    steps: usize,
    finished: Option<StepOutcome>,
    /// Optional capture of each resolved cell
    pub visualization: Option<VisualizationCapture>,
}

impl<'m> GenerationSession<'m> {
    /// Allocate the grids and seed the border constraints
    ///
    /// Every cell starts with weight 1 for every palette color and sits in
    /// the bucket equal to the palette size. Fixing the surrounding ring to
    /// `Outside` then propagates into the border-adjacent cells.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are out of range, the model has an
    /// empty palette, or the candidate weights would exceed
    /// `MAX_CANDIDATE_WEIGHTS`
    pub fn new(model: &'m LearnedModel, width: usize, height: usize, seed: u64) -> Result<Self> {
        validate_dimensions(width, height)?;
        let palette_len = model.palette().len();
        if palette_len == 0 {
            return Err(invalid_parameter(
                "palette",
                &palette_len,
                &"model has no colors to generate with",
            ));
        }
        let weight_count = width
            .checked_mul(height)
            .and_then(|cells| cells.checked_mul(palette_len))
            .filter(|&count| count <= MAX_CANDIDATE_WEIGHTS);
        if weight_count.is_none() {
            return Err(invalid_parameter(
                "size",
                &format!("{width}x{height}"),
                &format!(
                    "{palette_len} colors per cell exceed the limit of {MAX_CANDIDATE_WEIGHTS} candidate weights"
                ),
            ));
        }

        let output = OutputGrid::new(width, height);
        let candidates = CandidateGrid::new(width, height, palette_len);
        let mut buckets = PriorityBuckets::new(width, height, palette_len);
        for y in 0..height {
            for x in 0..width {
                buckets.insert((x, y), palette_len);
            }
        }

        let mut session = Self {
            model,
            output,
            candidates,
            buckets,
            random_selector: RandomSelector::new(seed),
            resolved: 0,
            steps: 0,
            finished: None,
            visualization: None,
        };
        session.seed_border();
        Ok(session)
    }

    fn seed_border(&mut self) {
        let (w, h) = (self.width() as i64, self.height() as i64);
        for y in -1..=h {
            for x in -1..=w {
                if x == -1 || y == -1 || x == w || y == h {
                    self.propagate((x, y), Neighbor::Outside);
                }
            }
        }
    }

    fn propagate(&mut self, origin: (i64, i64), fixed: Neighbor) -> PropagationReport {
        propagate_fixed_cell(
            &self.output,
            &mut self.candidates,
            &mut self.buckets,
            self.model.offsets(),
            self.model.index(),
            origin,
            fixed,
        )
    }

    /// Resolve exactly one cell, or report why nothing is left to do
    ///
    /// Picks the most constrained non-contradiction cell, draws a color in
    /// proportion to its weights, fixes it and propagates. Once a terminal
    /// outcome is reached it is returned again on every later call.
    ///
    /// # Errors
    ///
    /// Returns an error if a selected cell has no drawable color, which the
    /// bucket bookkeeping rules out
    pub fn step(&mut self) -> Result<StepOutcome> {
        if let Some(outcome) = self.finished {
            return Ok(outcome);
        }
        self.steps += 1;

        let (position, candidates) =
            match select_next_cell(&mut self.buckets, &mut self.random_selector) {
                Selection::Cell {
                    position,
                    candidates,
                } => (position, candidates),
                Selection::Stuck { contradictions } => {
                    return Ok(self.finish(StepOutcome::Stuck { contradictions }));
                }
                Selection::Exhausted => return Ok(self.finish(StepOutcome::Exhausted)),
            };

        let color = self
            .candidates
            .weights(position)
            .and_then(|weights| self.random_selector.draw_color(weights))
            .ok_or_else(|| {
                computation_error(
                    "color draw",
                    &format!(
                        "cell {position:?} was selected from bucket {candidates} but has no positive weight"
                    ),
                )
            })?;

        self.fix(position, color);
        if let Some(viz) = &mut self.visualization {
            viz.record_placement(position, color, self.resolved);
        }

        Ok(StepOutcome::Resolved {
            x: position.0,
            y: position.1,
            color,
        })
    }

    fn fix(&mut self, position: Position, color: usize) {
        self.output.set(position, Pixel::Color(color));
        self.resolved += 1;
        self.propagate(
            (position.0 as i64, position.1 as i64),
            Neighbor::Color(color),
        );
    }

    fn finish(&mut self, outcome: StepOutcome) -> StepOutcome {
        self.finished = Some(outcome);
        outcome
    }

    /// Step until a terminal outcome and return the final counters
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::step`]
    pub fn run(&mut self) -> Result<GenerationStats> {
        while !self.step()?.is_terminal() {}
        Ok(self.stats())
    }

    /// Step at most `limit` times, returning the last outcome
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::step`]
    pub fn run_steps(&mut self, limit: usize) -> Result<Option<StepOutcome>> {
        let mut last = None;
        for _ in 0..limit {
            let outcome = self.step()?;
            last = Some(outcome);
            if outcome.is_terminal() {
                break;
            }
        }
        Ok(last)
    }

    /// Current counters
    pub fn stats(&self) -> GenerationStats {
        GenerationStats {
            resolved: self.resolved,
            contradictions: self.contradictions(),
            unresolved: self.buckets.total_len(),
            steps: self.steps,
        }
    }

    /// Cells currently in the contradiction bucket
    pub fn contradictions(&self) -> usize {
        self.buckets.len_of(0)
    }

    /// Terminal outcome, once reached
    pub const fn finished(&self) -> Option<StepOutcome> {
        self.finished
    }

    /// Whether a terminal outcome has been reached
    pub const fn is_finished(&self) -> bool {
        self.finished.is_some()
    }

    /// Output pixels for rendering
    pub const fn output(&self) -> &OutputGrid {
        &self.output
    }

    /// Candidate weights of a cell
    pub fn weights(&self, x: usize, y: usize) -> Option<ArrayView1<'_, u64>> {
        self.candidates.weights((x, y))
    }

    /// Bucket currently holding a cell, `None` once it is fixed
    pub fn bucket_of(&self, x: usize, y: usize) -> Option<usize> {
        self.buckets.bucket_of((x, y))
    }

    /// Read-only access to the buckets
    pub const fn buckets(&self) -> &PriorityBuckets {
        &self.buckets
    }

    /// Model this run generates from
    pub const fn model(&self) -> &'m LearnedModel {
        self.model
    }

    /// Output width
    pub fn width(&self) -> usize {
        self.output.width()
    }

    /// Output height
    pub fn height(&self) -> usize {
        self.output.height()
    }

    /// Total number of output cells
    pub fn cell_count(&self) -> usize {
        self.width() * self.height()
    }

    /// Start recording resolved cells for GIF export
    pub fn enable_visualization(&mut self) {
        self.visualization = Some(VisualizationCapture::new(
            self.width(),
            self.height(),
            self.model.palette().colors().to_vec(),
        ));
    }
}

/// Host-side owner of an exemplar that relearns only when the radius changes
pub struct Synthesizer<S> {
    exemplar: S,
    model: Option<LearnedModel>,
}

impl<S: ColorSource> Synthesizer<S> {
    /// Wrap an exemplar; nothing is learned yet
    pub const fn new(exemplar: S) -> Self {
        Self {
            exemplar,
            model: None,
        }
    }

    /// Make sure the model matches `radius`, learning it if needed
    ///
    /// Returns true if the rules were (re)built.
    ///
    /// # Errors
    ///
    /// Returns an error if learning fails
    pub fn prepare(&mut self, radius: usize) -> Result<bool> {
        if self
            .model
            .as_ref()
            .is_some_and(|model| model.radius() == radius)
        {
            return Ok(false);
        }
        self.model = Some(LearnedModel::learn(&self.exemplar, radius)?);
        Ok(true)
    }

    /// Cached model, if `prepare` has run
    pub const fn model(&self) -> Option<&LearnedModel> {
        self.model.as_ref()
    }

    /// The exemplar being learned from
    pub const fn exemplar(&self) -> &S {
        &self.exemplar
    }

    /// Start a fresh run against the cached model
    ///
    /// # Errors
    ///
    /// Returns an error if no model has been prepared or the dimensions are
    /// invalid
    pub fn session(
        &self,
        width: usize,
        height: usize,
        seed: u64,
    ) -> Result<GenerationSession<'_>> {
        let model = self.model.as_ref().ok_or_else(|| {
            invalid_parameter("radius", &"<unset>", &"call prepare before starting a session")
        })?;
        GenerationSession::new(model, width, height, seed)
    }
}

use core::fmt;

use kymo_core::Kymograph;
use kymo_filter::{DesignError, ZeroPhaseLowpass, local_maxima};
use tracing::debug;

/// Parameters for per-line trajectory extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackConfig {
    /// Rows excluded from the top of the detection window.
    pub top_margin: usize,
    /// Rows excluded from the bottom of the detection window.
    pub bottom_margin: usize,
    /// Minimum filtered intensity for a local maximum to qualify.
    pub min_height: f32,
    /// Low-pass filter order.
    pub filter_order: usize,
    /// Low-pass cutoff frequency, reciprocal of the cutoff length.
    pub cutoff: f64,
    /// Spatial sampling rate along a line, reciprocal of the pixel size.
    pub sampling_rate: f64,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            top_margin: 0,
            bottom_margin: 0,
            min_height: 0.0,
            filter_order: 4,
            cutoff: 0.1,
            sampling_rate: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackError {
    Design(DesignError),
    DistanceOutOfRange {
        line: usize,
        row: usize,
        len: usize,
    },
    RadiusOutOfRange {
        line: usize,
        row: usize,
        folded: usize,
        len: usize,
    },
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Design(e) => e.fmt(f),
            Self::DistanceOutOfRange { line, row, len } => {
                write!(
                    f,
                    "scan line {line}: row {row} lies outside the distance axis ({len} entries); \
                     pixel size, distance from center and image height disagree"
                )
            }
            Self::RadiusOutOfRange {
                line,
                row,
                folded,
                len,
            } => {
                write!(
                    f,
                    "scan line {line}: row {row} folds to index {folded}, outside the radius \
                     axis ({len} entries); pixel size, distance from center and image height \
                     disagree"
                )
            }
        }
    }
}

impl std::error::Error for TrackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Design(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DesignError> for TrackError {
    fn from(e: DesignError) -> Self {
        Self::Design(e)
    }
}

/// Per-line tracking outcome, in scan-line order. `None` marks a line where
/// no peak qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trajectory {
    positions: Vec<Option<usize>>,
}

impl Trajectory {
    pub fn new(positions: Vec<Option<usize>>) -> Self {
        Self { positions }
    }

    pub fn positions(&self) -> &[Option<usize>] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Rows of the present entries, in line order, absences dropped.
    pub fn present(&self) -> impl Iterator<Item = usize> + '_ {
        self.positions.iter().filter_map(|p| *p)
    }

    pub fn present_count(&self) -> usize {
        self.positions.iter().filter(|p| p.is_some()).count()
    }
}

/// Extracts one tracked row per scan line, or marks the line absent.
#[derive(Debug, Clone)]
pub struct TrajectoryExtractor {
    filter: ZeroPhaseLowpass,
    top_margin: usize,
    bottom_margin: usize,
    min_height: f32,
}

impl TrajectoryExtractor {
    /// Designs the line filter up front, so a bad cutoff fails here rather
    /// than on the first line.
    pub fn new(cfg: &TrackConfig) -> Result<Self, TrackError> {
        Ok(Self {
            filter: ZeroPhaseLowpass::new(cfg.filter_order, cfg.cutoff, cfg.sampling_rate)?,
            top_margin: cfg.top_margin,
            bottom_margin: cfg.bottom_margin,
            min_height: cfg.min_height,
        })
    }

    /// Runs the full per-line pipeline: filter, then detect.
    pub fn extract(&self, kymo: &Kymograph<f32>) -> Result<Trajectory, TrackError> {
        let filtered = self.filter_lines(kymo)?;
        Ok(self.detect(&filtered))
    }

    /// Zero-phase low-passes every scan line into a new buffer.
    pub fn filter_lines(&self, kymo: &Kymograph<f32>) -> Result<Kymograph<f32>, TrackError> {
        let mut data = Vec::with_capacity(kymo.rows() * kymo.lines());
        for i in 0..kymo.lines() {
            data.extend(self.filter.apply(kymo.line(i))?);
        }

        Ok(Kymograph::from_vec(kymo.rows(), kymo.lines(), data)
            .expect("filtered buffer sized rows * lines"))
    }

    /// Peak detection and selection over an already filtered kymograph.
    ///
    /// Margins that leave no window produce an all-absent trajectory.
    pub fn detect(&self, filtered: &Kymograph<f32>) -> Trajectory {
        let rows = filtered.rows();
        let lo = self.top_margin.min(rows);
        let hi = rows.saturating_sub(self.bottom_margin).max(lo);

        let mut positions = Vec::with_capacity(filtered.lines());
        for line in 0..filtered.lines() {
            let profile = filtered.line(line);
            let candidates = local_maxima(&profile[lo..hi], self.min_height);
            let selected = select_position(profile, &candidates, lo);
            debug!(line, candidates = ?candidates, selected = ?selected, "scan line peaks");
            positions.push(selected);
        }

        Trajectory::new(positions)
    }
}

/// Applies the selection policy to window-relative candidate indices.
///
/// A single candidate resolves directly. Several resolve to the brightest
/// candidate's intensity, then to the first row of the whole profile holding
/// exactly that value, so an equal value occurring before the window wins.
// TODO: confirm with the lab whether ties should resolve within the
// detection window only instead of across the whole profile.
fn select_position(profile: &[f32], candidates: &[usize], offset: usize) -> Option<usize> {
    match candidates {
        [] => None,
        &[only] => Some(only + offset),
        _ => {
            let best = candidates
                .iter()
                .map(|&c| profile[c + offset])
                .fold(f32::NEG_INFINITY, f32::max);
            profile.iter().position(|&v| v == best)
        }
    }
}

//! YAML parameter file shared between acquisition runs.
//!
//! Two groups: `filenames` locates the input image and the output
//! directory, `parameters` holds the physical scan settings. Spatial
//! quantities are in nanometres, intensities in native image units.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use kymo_track::{ScanGeometry, TrackConfig};

/// Parsed parameter file.
///
/// ```yaml
/// filenames:
///   data_dir: /data/run-042
///   data_name: kymo_left
/// parameters:
///   pixel_size: 2.5
///   distance_from_center: 250.0
///   top_pixels: 10
///   bottom_pixels: 10
///   border: 15.0
///   cutoff_length: 25.0
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    pub filenames: Filenames,
    pub parameters: Parameters,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Filenames {
    /// Directory holding the input image; outputs land next to it.
    pub data_dir: PathBuf,
    /// Input image stem, extended with `.tiff`.
    pub data_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameters {
    /// Physical extent of one row, nm.
    pub pixel_size: f64,
    /// Half-extent of the scan around its centre, nm.
    pub distance_from_center: f64,
    /// Rows excluded at the top of the detection window.
    pub top_pixels: usize,
    /// Rows excluded at the bottom of the detection window.
    pub bottom_pixels: usize,
    /// Minimum filtered intensity for a candidate peak.
    pub border: f32,
    /// Low-pass cutoff expressed as a length, nm.
    pub cutoff_length: f64,
}

impl Params {
    /// Reads and validates a parameter file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read parameter file {}", path.display()))?;
        let params: Self = serde_yml::from_str(&content)
            .with_context(|| format!("failed to parse parameter file {}", path.display()))?;
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<()> {
        if self.filenames.data_name.is_empty() {
            bail!("data_name must not be empty");
        }
        if self.parameters.pixel_size <= 0.0 {
            bail!("pixel_size must be positive");
        }
        if self.parameters.distance_from_center <= 0.0 {
            bail!("distance_from_center must be positive");
        }
        if self.parameters.cutoff_length <= 0.0 {
            bail!("cutoff_length must be positive");
        }
        if !self.parameters.border.is_finite() {
            bail!("border must be finite");
        }
        Ok(())
    }

    /// `{data_dir}/{data_name}.tiff`
    pub fn image_path(&self) -> PathBuf {
        self.filenames
            .data_dir
            .join(format!("{}.tiff", self.filenames.data_name))
    }

    /// Overlay image written next to the input.
    pub fn overlay_path(&self) -> PathBuf {
        self.filenames.data_dir.join("trajectory_overlaid_kymo.png")
    }

    /// Trajectory table written next to the input.
    pub fn table_path(&self) -> PathBuf {
        self.filenames.data_dir.join("trajectory.csv")
    }

    /// Extraction settings in filter units: lengths become frequencies
    /// against a sampling rate of one sample per `pixel_size`.
    pub fn track_config(&self) -> TrackConfig {
        TrackConfig {
            top_margin: self.parameters.top_pixels,
            bottom_margin: self.parameters.bottom_pixels,
            min_height: self.parameters.border,
            cutoff: 1.0 / self.parameters.cutoff_length,
            sampling_rate: 1.0 / self.parameters.pixel_size,
            ..TrackConfig::default()
        }
    }

    pub fn scan_geometry(&self) -> ScanGeometry {
        ScanGeometry {
            pixel_size: self.parameters.pixel_size,
            distance_from_center: self.parameters.distance_from_center,
        }
    }
}

//! Trajectory table output.
//!
//! One row per present scan line, in scan order. Absent lines are
//! dropped from all three columns identically, so the k-th row always
//! describes the k-th detection.

use anyhow::{Context, Result};
use serde::Serialize;

use kymo_track::Trajectory;

/// Field names are the exact CSV headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryRecord {
    pub trajectory_position_in_pixel: usize,
    pub distance_from_center_in_nm: f64,
    pub radius_from_center_in_nm: f64,
}

/// Zips present rows with their converted coordinates.
pub fn build_records(
    trajectory: &Trajectory,
    distances: &[f64],
    radii: &[f64],
) -> Vec<TrajectoryRecord> {
    assert_eq!(
        distances.len(),
        trajectory.present_count(),
        "one distance per present line"
    );
    assert_eq!(
        radii.len(),
        trajectory.present_count(),
        "one radius per present line"
    );

    trajectory
        .present()
        .zip(distances.iter().zip(radii))
        .map(|(row, (&distance, &radius))| TrajectoryRecord {
            trajectory_position_in_pixel: row,
            distance_from_center_in_nm: distance,
            radius_from_center_in_nm: radius,
        })
        .collect()
}

/// Serializes records into CSV bytes. The header row is always written,
/// even when no line carried a detection.
pub fn to_csv_bytes(records: &[TrajectoryRecord]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut buf);
        writer
            .write_record([
                "trajectory_position_in_pixel",
                "distance_from_center_in_nm",
                "radius_from_center_in_nm",
            ])
            .context("writing the csv header")?;
        for record in records {
            writer
                .serialize(record)
                .context("writing a trajectory row")?;
        }
        writer.flush().context("flushing the csv buffer")?;
    }
    Ok(buf)
}

use crate::extractor::{TrackError, Trajectory};

/// Physical geometry of the scan axis, mapping trajectory rows to distances.
///
/// The scan covers `[-distance_from_center, +distance_from_center]` in steps
/// of `pixel_size`; both values are in nm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanGeometry {
    pub pixel_size: f64,
    pub distance_from_center: f64,
}

impl ScanGeometry {
    /// Signed positions from `-distance_from_center` through
    /// `+distance_from_center`, one per row. A half-step overshoot on the
    /// upper bound keeps the endpoint included despite accumulated
    /// floating-point error.
    pub fn distance_axis(&self) -> Vec<f64> {
        arange(
            -self.distance_from_center,
            self.distance_from_center + 0.5 * self.pixel_size,
            self.pixel_size,
        )
    }

    /// One-sided radial positions `0` through `distance_from_center`.
    pub fn radius_axis(&self) -> Vec<f64> {
        arange(
            0.0,
            self.distance_from_center + 0.5 * self.pixel_size,
            self.pixel_size,
        )
    }

    /// Signed distance from center for every present trajectory entry, in
    /// line order. Absent lines are dropped, not carried as gaps, so the
    /// output can be shorter than the trajectory.
    pub fn distances(&self, trajectory: &Trajectory) -> Result<Vec<f64>, TrackError> {
        let axis = self.distance_axis();
        let mut out = Vec::with_capacity(trajectory.present_count());
        for (line, pos) in trajectory.positions().iter().enumerate() {
            let Some(row) = *pos else { continue };
            let v = axis
                .get(row)
                .copied()
                .ok_or(TrackError::DistanceOutOfRange {
                    line,
                    row,
                    len: axis.len(),
                })?;
            out.push(v);
        }
        Ok(out)
    }

    /// Folded radius for every present trajectory entry, in line order.
    ///
    /// Rows fold around the center row `rows / 2`: a row `k` above or below
    /// the center maps to the same radius `k * pixel_size`.
    pub fn radii(&self, trajectory: &Trajectory, rows: usize) -> Result<Vec<f64>, TrackError> {
        let axis = self.radius_axis();
        let mid = rows / 2;

        let mut out = Vec::with_capacity(trajectory.present_count());
        for (line, pos) in trajectory.positions().iter().enumerate() {
            let Some(row) = *pos else { continue };
            let folded = if row < mid { mid - row } else { row - mid };
            let v = axis.get(folded).copied().ok_or(TrackError::RadiusOutOfRange {
                line,
                row,
                folded,
                len: axis.len(),
            })?;
            out.push(v);
        }
        Ok(out)
    }
}

/// Half-open `[start, stop)` with a float step: `start + i * step` for `i`
/// in `0..ceil((stop - start) / step)`.
fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let n = ((stop - start) / step).ceil().max(0.0) as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::ScanGeometry;
    use crate::{TrackError, Trajectory};

    const GEOM: ScanGeometry = ScanGeometry {
        pixel_size: 1.0,
        distance_from_center: 4.0,
    };

    #[test]
    fn distance_axis_spans_both_sides() {
        let axis = GEOM.distance_axis();
        assert_eq!(axis.len(), 9);
        assert_eq!(axis[0], -4.0);
        assert_eq!(axis[8], 4.0);

        let fine = ScanGeometry {
            pixel_size: 0.5,
            distance_from_center: 2.5,
        };
        let axis = fine.distance_axis();
        assert_eq!(axis.len(), 11);
        assert!((axis[10] - 2.5).abs() < 1e-12);
    }

    #[test]
    fn radius_axis_is_one_sided() {
        let axis = GEOM.radius_axis();
        assert_eq!(axis, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn axis_lengths_match_row_count() {
        // rows = 2 * distance / pixel + 1 when the geometry is consistent.
        for (pixel, distance, rows) in [(1.0, 4.0, 9usize), (0.5, 8.0, 33), (2.0, 10.0, 11)] {
            let geom = ScanGeometry {
                pixel_size: pixel,
                distance_from_center: distance,
            };
            assert_eq!(geom.distance_axis().len(), rows);
            let radius_len = geom.radius_axis().len();
            assert!(radius_len == rows / 2 || radius_len == rows / 2 + 1);
        }
    }

    #[test]
    fn absences_are_dropped_in_order() {
        let traj = Trajectory::new(vec![None, Some(3), None, Some(7)]);

        let distances = GEOM.distances(&traj).expect("in range");
        assert_eq!(distances, vec![-1.0, 3.0]);

        let radii = GEOM.radii(&traj, 10).expect("in range");
        assert_eq!(radii, vec![2.0, 2.0]);
    }

    #[test]
    fn folding_is_symmetric_around_center() {
        let traj = Trajectory::new(vec![Some(2), Some(5), Some(8)]);
        let radii = GEOM.radii(&traj, 10).expect("in range");
        assert_eq!(radii, vec![3.0, 0.0, 3.0]);
    }

    #[test]
    fn row_outside_distance_axis_is_loud() {
        let traj = Trajectory::new(vec![Some(1), Some(9)]);
        match GEOM.distances(&traj) {
            Err(TrackError::DistanceOutOfRange { line: 1, row: 9, len: 9 }) => {}
            other => panic!("expected distance violation, got {other:?}"),
        }
    }

    #[test]
    fn folded_index_outside_radius_axis_is_loud() {
        let traj = Trajectory::new(vec![Some(39)]);
        match GEOM.radii(&traj, 40) {
            Err(TrackError::RadiusOutOfRange {
                line: 0,
                row: 39,
                folded: 19,
                len: 5,
            }) => {}
            other => panic!("expected radius violation, got {other:?}"),
        }
    }
}

//! Overlay rendering: the kymograph through a jet colour map with the
//! extracted trajectory drawn on top at native resolution.
//!
//! Rows map to y, scan lines to x. The trajectory is a dark polyline,
//! one segment between each pair of consecutive present lines; a line
//! with no position leaves a gap on both sides.

use image::{Rgb, RgbImage};

use kymo_core::Kymograph;
use kymo_track::Trajectory;

const TRACE_OPACITY: f32 = 0.8;

/// Renders the overlay image.
///
/// Intensities are min-max normalized over the whole kymograph before
/// the colour map is applied, so the output spans the full jet range
/// regardless of the input bit depth.
pub fn render(kymo: &Kymograph<f32>, trajectory: &Trajectory) -> RgbImage {
    assert_eq!(
        trajectory.len(),
        kymo.lines(),
        "one trajectory entry per scan line"
    );

    let width = kymo.lines() as u32;
    let height = kymo.rows() as u32;
    let (lo, span) = intensity_range(kymo.data());

    let mut img = RgbImage::new(width, height);
    for line in 0..kymo.lines() {
        for (row, &v) in kymo.line(line).iter().enumerate() {
            let t = (v - lo) / span;
            img.put_pixel(line as u32, row as u32, Rgb(colormap_jet(t)));
        }
    }

    for (x, y) in trace_pixels(trajectory, kymo.rows()) {
        darken(img.get_pixel_mut(x as u32, y as u32));
    }

    img
}

/// Pixels covered by the trajectory polyline, each listed once even
/// where consecutive segments share a vertex.
fn trace_pixels(trajectory: &Trajectory, rows: usize) -> Vec<(usize, usize)> {
    let positions = trajectory.positions();
    let mut mask = vec![false; rows * positions.len()];
    for line in 1..positions.len() {
        if let (Some(y0), Some(y1)) = (positions[line - 1], positions[line]) {
            mark_segment(&mut mask, rows, (line - 1, y0), (line, y1));
        }
    }
    mask.iter()
        .enumerate()
        .filter(|&(_, &covered)| covered)
        .map(|(i, _)| (i / rows, i % rows))
        .collect()
}

/// Bresenham line between two trajectory vertices, marked into the
/// line-major coverage mask.
fn mark_segment(mask: &mut [bool], rows: usize, from: (usize, usize), to: (usize, usize)) {
    let (mut x, mut y) = (from.0 as i64, from.1 as i64);
    let (x1, y1) = (to.0 as i64, to.1 as i64);
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        mask[x as usize * rows + y as usize] = true;
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn darken(px: &mut Rgb<u8>) {
    for c in &mut px.0 {
        *c = (f32::from(*c) * (1.0 - TRACE_OPACITY)).round() as u8;
    }
}

/// Global (min, span) of the data; a flat or empty image maps to t = 0.
fn intensity_range(data: &[f32]) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in data {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    if min.is_finite() && max > min {
        (min, max - min)
    } else {
        (if min.is_finite() { min } else { 0.0 }, 1.0)
    }
}

/// Classic "jet" colour map (blue → cyan → green → yellow → red).
fn colormap_jet(t: f32) -> [u8; 3] {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };

    let r = if t < 0.375 {
        0.0
    } else if t < 0.625 {
        (t - 0.375) / 0.25
    } else {
        1.0
    };

    let g = if t < 0.125 {
        0.0
    } else if t < 0.375 {
        (t - 0.125) / 0.25
    } else if t < 0.625 {
        1.0
    } else if t < 0.875 {
        1.0 - (t - 0.625) / 0.25
    } else {
        0.0
    };

    let b = if t < 0.125 {
        0.5 + t / 0.125 * 0.5
    } else if t < 0.375 {
        1.0
    } else if t < 0.625 {
        1.0 - (t - 0.375) / 0.25
    } else {
        0.0
    };

    [to_u8(r), to_u8(g), to_u8(b)]
}

fn to_u8(x: f32) -> u8 {
    (x * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kymo(rows: usize, lines: usize, values: &[f32]) -> Kymograph<f32> {
        Kymograph::from_vec(rows, lines, values.to_vec()).unwrap()
    }

    #[test]
    fn jet_runs_blue_to_red() {
        let [r, _, b] = colormap_jet(0.0);
        assert!(b > r);
        let [r, _, b] = colormap_jet(1.0);
        assert!(r > b);
        assert_eq!(colormap_jet(0.0), [0, 0, 128]);
        assert_eq!(colormap_jet(1.0), [255, 0, 0]);
    }

    #[test]
    fn image_spans_the_full_map() {
        // Two lines of three rows, intensities 0..=5.
        let kymo = kymo(3, 2, &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        let img = render(&kymo, &Trajectory::new(vec![None, None]));
        assert_eq!(img.dimensions(), (2, 3));
        assert_eq!(*img.get_pixel(0, 0), Rgb(colormap_jet(0.0)));
        assert_eq!(*img.get_pixel(1, 2), Rgb(colormap_jet(1.0)));
    }

    #[test]
    fn flat_image_does_not_divide_by_zero() {
        let kymo = kymo(2, 2, &[7.0; 4]);
        let img = render(&kymo, &Trajectory::new(vec![None, None]));
        assert_eq!(*img.get_pixel(0, 0), Rgb(colormap_jet(0.0)));
    }

    #[test]
    fn trace_darkens_only_connected_lines() {
        let traj = Trajectory::new(vec![Some(1), Some(1), None, Some(1)]);
        let kymo = kymo(3, 4, &[1.0; 12]);
        let img = render(&kymo, &traj);

        let plain = Rgb(colormap_jet(0.0));
        // Lines 0 and 1 are connected.
        assert_ne!(*img.get_pixel(0, 1), plain);
        assert_ne!(*img.get_pixel(1, 1), plain);
        // The absent line and its isolated neighbour stay untouched.
        assert_eq!(*img.get_pixel(2, 1), plain);
        assert_eq!(*img.get_pixel(3, 1), plain);
    }

    #[test]
    fn shared_vertices_darken_once() {
        let traj = Trajectory::new(vec![Some(0), Some(2), Some(0)]);
        let pixels = trace_pixels(&traj, 3);
        let mut sorted = pixels.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(pixels.len(), sorted.len());
        // The middle vertex belongs to both segments but appears once.
        assert_eq!(pixels.iter().filter(|&&p| p == (1, 2)).count(), 1);
    }

    #[test]
    fn steep_segments_are_gapless() {
        let traj = Trajectory::new(vec![Some(0), Some(7)]);
        let pixels = trace_pixels(&traj, 8);
        // Every row between the endpoints is covered.
        for y in 0..=7 {
            assert!(pixels.iter().any(|&(_, py)| py == y), "row {y} missing");
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let traj = Trajectory::new(vec![Some(0), Some(3), Some(2)]);
        let kymo = kymo(4, 3, &[0.5, 0.1, 0.9, 0.3, 0.2, 0.8, 0.4, 0.6, 0.7, 0.0, 1.0, 0.5]);
        assert_eq!(render(&kymo, &traj), render(&kymo, &traj));
    }
}

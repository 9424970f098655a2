// src/aligner.rs

use crate::detection_models::Detection;
use glam::DVec2;
use log::debug;

/// Snapped coordinates stay within this bound so symbol offsets applied
/// later cannot overflow `i32`.
pub const COORD_LIMIT: i32 = 1 << 30;

/// Pulls nearby junctions onto shared vertical and horizontal lines.
///
/// Junctions are visited in order. The visited junction's coordinates as
/// they were before the pass are compared with every other junction's
/// current coordinates; each one whose x lies within `threshold` is moved
/// onto the visited junction's current x. Only when the x test fails is the
/// same test made on y, so a pair that is close on both axes is aligned on
/// x alone.
///
/// Because the comparison uses the pre-pass value while the assignment uses
/// the current one, chains link up: with x = 10, 50, 90 the middle junction
/// still reaches 90 after it has moved to 10, and pulls it along.
pub fn align_junctions(points: &mut [DVec2], threshold: f64) {
    let original = points.to_vec();

    for i in 0..points.len() {
        let mut align_x = Vec::new();
        let mut align_y = Vec::new();

        for (j, other) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            if (original[i].x - other.x).abs() < threshold {
                align_x.push(j);
            } else if (original[i].y - other.y).abs() < threshold {
                align_y.push(j);
            }
        }

        let anchor = points[i];
        for j in align_x {
            points[j].x = anchor.x;
        }
        for j in align_y {
            points[j].y = anchor.y;
        }
    }
}

/// Rounds `coord` down to a multiple of `grid`.
///
/// Uses floor semantics, so negative values move away from zero (`-5 -> -16`).
/// Results are clamped to `±COORD_LIMIT` and a NaN coordinate snaps to 0.
/// A non-positive `grid` is treated as 1.
pub fn snap(coord: f64, grid: i32) -> i32 {
    let grid = grid.max(1) as f64;
    let bound = (COORD_LIMIT as f64 / grid).floor() * grid;
    ((coord / grid).floor() * grid).clamp(-bound, bound) as i32
}

/// Aligns junction detections and snaps them onto the grid, keeping input order.
/// Coincident results are kept; wire synthesis discards them.
pub fn align_and_snap(junctions: &[Detection], threshold: f64, grid: i32) -> Vec<(i32, i32)> {
    let mut points: Vec<DVec2> = junctions
        .iter()
        .map(|j| DVec2::new(j.x_center, j.y_center))
        .collect();

    align_junctions(&mut points, threshold);

    let snapped: Vec<(i32, i32)> = points
        .iter()
        .map(|p| (snap(p.x, grid), snap(p.y, grid)))
        .collect();
    debug!("Aligned {} junctions onto a {}-unit grid", snapped.len(), grid);
    snapped
}

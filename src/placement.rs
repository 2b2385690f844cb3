//! Grid snapping for manually placed tables.

/// Spacing of the background grid that dropped tables align to.
pub const GRID_SIZE: f64 = 20.0;

/// Snap a drop position to the nearest point of the default grid.
pub fn snap_to_grid(x: f64, y: f64) -> (f64, f64) {
    snap_to_grid_with(GRID_SIZE, x, y)
}

/// Snap to a grid of the given size. Halfway points go to the larger grid
/// line. Non-positive grid sizes and non-finite coordinates pass through
/// unchanged.
pub fn snap_to_grid_with(grid: f64, x: f64, y: f64) -> (f64, f64) {
    (snap(grid, x), snap(grid, y))
}

fn snap(grid: f64, v: f64) -> f64 {
    if grid.is_nan() || grid <= 0.0 || !v.is_finite() {
        return v;
    }
    (v / grid + 0.5).floor() * grid
}

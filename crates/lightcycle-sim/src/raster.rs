use crate::CycleState;
use crate::collision::cell_of;
use crate::grid::CollisionGrid;
use crate::trail::{LineSegment, Trail};

/// What to do with each cell a segment passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Set,
    Clear,
}

fn apply(grid: &mut CollisionGrid, x: i32, y: i32, mark: Mark) {
    // Out-of-range cells are reported by the grid itself.
    let _ = match mark {
        Mark::Set => grid.set(x, y),
        Mark::Clear => grid.clear(x, y),
    };
}

/// Mark or clear every cell covered by `segment`, endpoints inclusive.
///
/// Walks from the lower to the upper corner one cell at a time; a
/// zero-length segment touches exactly one cell.
pub fn mark_trail_cells(grid: &mut CollisionGrid, segment: &LineSegment, mark: Mark) {
    let (sx, ex) = (cell_of(segment.sx), cell_of(segment.ex));
    let (sy, ey) = (cell_of(segment.sy), cell_of(segment.ey));
    let (mut x, x_end) = (sx.min(ex), sx.max(ex));
    let (mut y, y_end) = (sy.min(ey), sy.max(ey));
    let dx = i32::from(x != x_end);
    let dy = i32::from(y != y_end);

    if dx == 0 && dy == 0 {
        apply(grid, x, y, mark);
        return;
    }
    while x <= x_end && y <= y_end {
        apply(grid, x, y, mark);
        x += dx;
        y += dy;
    }
}

/// Apply `mark` to every committed segment and the live segment of `trail`.
pub fn mark_trail(grid: &mut CollisionGrid, trail: &Trail, mark: Mark) {
    for segment in trail.segments() {
        mark_trail_cells(grid, segment, mark);
    }
}

/// Remove one player's whole trail from the grid.
pub fn clear_player_trail(grid: &mut CollisionGrid, trail: &Trail) {
    mark_trail(grid, trail, Mark::Clear);
}

/// Re-mark the trails of every alive cycle. Restores cells shared with a
/// trail that was just cleared.
pub fn rasterize_all_trails(grid: &mut CollisionGrid, cycles: &[CycleState]) {
    for cycle in cycles.iter().filter(|c| c.is_alive()) {
        mark_trail(grid, &cycle.trail, Mark::Set);
    }
}

use crate::Direction;
use crate::grid::CollisionGrid;

/// Grid cell containing an arena coordinate.
///
/// Uses `floor`, so positions just below zero land in cell -1 (outside the
/// arena) instead of being truncated back into cell 0.
pub fn cell_of(v: f32) -> i32 {
    v.floor() as i32
}

/// Cell of `(x, y)`, held to at most one cell beyond each arena edge.
fn walk_cell(grid: &CollisionGrid, (x, y): (f32, f32)) -> (i32, i32) {
    let edge = grid.size();
    (cell_of(x).clamp(-1, edge), cell_of(y).clamp(-1, edge))
}

/// Number of unit steps along `direction` from cell `from` to cell `to`.
fn steps_between(from: (i32, i32), to: (i32, i32)) -> u32 {
    from.0.abs_diff(to.0) + from.1.abs_diff(to.1)
}

/// Walk from the cell of `from` toward the cell of `to` one cell at a time
/// along `direction` and return the first blocked cell, clamped into the
/// arena. The starting cell itself is not tested.
pub fn detect_collision(
    grid: &CollisionGrid,
    from: (f32, f32),
    to: (f32, f32),
    direction: Direction,
) -> Option<(i32, i32)> {
    let (mut x, mut y) = walk_cell(grid, from);
    let target = walk_cell(grid, to);
    let (dx, dy) = direction.step();

    for _ in 0..steps_between((x, y), target) {
        x += dx;
        y += dy;
        if grid.is_blocked(x, y) {
            let last = grid.size() - 1;
            return Some((x.clamp(0, last), y.clamp(0, last)));
        }
    }
    None
}

/// Mark every cell entered while moving from `from` to `to` along
/// `direction`. The starting cell is already part of the trail.
pub fn mark_path(grid: &mut CollisionGrid, from: (f32, f32), to: (f32, f32), direction: Direction) {
    let (mut x, mut y) = walk_cell(grid, from);
    let target = walk_cell(grid, to);
    let (dx, dy) = direction.step();

    for _ in 0..steps_between((x, y), target) {
        x += dx;
        y += dy;
        // Out-of-range cells are reported by the grid itself.
        let _ = grid.set(x, y);
    }
}

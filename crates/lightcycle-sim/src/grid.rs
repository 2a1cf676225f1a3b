use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Result of probing one arena cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Free,
    Occupied,
    /// The coordinate lies outside the arena.
    OutOfRange,
}

impl CellState {
    /// Occupied and out-of-range cells both stop a cycle.
    pub fn is_blocked(self) -> bool {
        self != CellState::Free
    }
}

/// Square bitmap over the arena, one bit per cell, 8 cells per byte,
/// row-major. Allocated once and only ever bulk-cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionGrid {
    size: i32,
    row_bytes: usize,
    bits: Vec<u8>,
}

impl CollisionGrid {
    pub fn new(size: u32) -> Self {
        let side = size as usize;
        let row_bytes = side.div_ceil(8);
        Self {
            size: size as i32,
            row_bytes,
            bits: vec![0; row_bytes * side],
        }
    }

    /// Side length in cells.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Bytes per row (`ceil(size / 8)`).
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        (0..self.size).contains(&x) && (0..self.size).contains(&y)
    }

    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let offset = x as usize / 8 + y as usize * self.row_bytes;
        let mask = 0x80u8 >> (x % 8);
        Some((offset, mask))
    }

    /// Mark a cell occupied. Out-of-range coordinates are logged and ignored.
    pub fn set(&mut self, x: i32, y: i32) -> Result<(), SimError> {
        let Some((offset, mask)) = self.locate(x, y) else {
            tracing::warn!(x, y, "set_cell out of range");
            return Err(SimError::OutOfRange { x, y });
        };
        self.bits[offset] |= mask;
        Ok(())
    }

    /// Mark a cell free. Out-of-range coordinates are logged and ignored.
    pub fn clear(&mut self, x: i32, y: i32) -> Result<(), SimError> {
        let Some((offset, mask)) = self.locate(x, y) else {
            tracing::warn!(x, y, "clear_cell out of range");
            return Err(SimError::OutOfRange { x, y });
        };
        self.bits[offset] &= !mask;
        Ok(())
    }

    pub fn test(&self, x: i32, y: i32) -> CellState {
        match self.locate(x, y) {
            None => CellState::OutOfRange,
            Some((offset, mask)) if self.bits[offset] & mask != 0 => CellState::Occupied,
            Some(_) => CellState::Free,
        }
    }

    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.test(x, y).is_blocked()
    }

    /// Zero every cell (round start).
    pub fn reset(&mut self) {
        self.bits.fill(0);
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }
}

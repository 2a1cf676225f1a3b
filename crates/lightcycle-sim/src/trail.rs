use serde::{Deserialize, Serialize};

/// One straight trail stretch in arena coordinates. The simulation only
/// ever produces axis-aligned segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub sx: f32,
    pub sy: f32,
    pub ex: f32,
    pub ey: f32,
}

impl LineSegment {
    /// A zero-length segment at `(x, y)`.
    pub fn point(x: f32, y: f32) -> Self {
        Self {
            sx: x,
            sy: y,
            ex: x,
            ey: y,
        }
    }

    pub fn start(&self) -> (f32, f32) {
        (self.sx, self.sy)
    }

    pub fn end(&self) -> (f32, f32) {
        (self.ex, self.ey)
    }

    pub fn length(&self) -> f32 {
        (self.ex - self.sx).abs() + (self.ey - self.sy).abs()
    }
}

/// Returned by [`Trail::pivot`] when no slot is left for a new segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailFull {
    pub capacity: usize,
}

/// Ordered trail history of one player.
///
/// Every segment but the last is committed; the last one is live and its
/// end point follows the cycle. The store holds at most `capacity`
/// segments; once full, further pivots are refused rather than dropping
/// history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trail {
    segments: Vec<LineSegment>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize, x: f32, y: f32) -> Self {
        let capacity = capacity.max(1);
        let mut segments = Vec::with_capacity(capacity.min(64));
        segments.push(LineSegment::point(x, y));
        Self { segments, capacity }
    }

    /// Rewind to a single zero-length live segment at `(x, y)`.
    pub fn reset(&mut self, x: f32, y: f32) {
        self.segments.clear();
        self.segments.push(LineSegment::point(x, y));
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Committed segments followed by the live one.
    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    pub fn committed(&self) -> &[LineSegment] {
        &self.segments[..self.segments.len() - 1]
    }

    pub fn committed_len(&self) -> usize {
        self.segments.len() - 1
    }

    pub fn live(&self) -> &LineSegment {
        // Never empty: every constructor and `reset` push a live segment.
        &self.segments[self.segments.len() - 1]
    }

    pub fn is_full(&self) -> bool {
        self.segments.len() >= self.capacity
    }

    /// Move the live segment's end point.
    pub fn extend_live(&mut self, x: f32, y: f32) {
        let last = self.segments.len() - 1;
        let live = &mut self.segments[last];
        live.ex = x;
        live.ey = y;
    }

    /// Commit the live segment at `(x, y)` and start a new zero-length live
    /// segment there.
    pub fn pivot(&mut self, x: f32, y: f32) -> Result<(), TrailFull> {
        if self.is_full() {
            return Err(TrailFull {
                capacity: self.capacity,
            });
        }
        self.extend_live(x, y);
        self.segments.push(LineSegment::point(x, y));
        Ok(())
    }
}

//! Hole geometry for a single lane
//!
//! A lane is a horizontal strip `[0, W]` punctured by holes. The lane is
//! toroidal: a hole whose span crosses either edge continues on the other
//! side. Every query first splits a hole into one or two non-wrapping
//! "cuts", then works with plain intervals:
//! - point queries test membership in any cut
//! - solid segments are `[0, W]` minus every cut (interval difference)

use serde::{Deserialize, Serialize};

use crate::wrap_x;

/// A horizontal gap in a lane, in lane-local coordinates.
///
/// `start` may sit outside `[0, W)` while the hole scrolls past an edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub start: f32,
    pub width: f32,
}

/// A closed horizontal interval `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f32,
    pub end: f32,
}

impl Segment {
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> f32 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        x >= self.start && x <= self.end
    }

    /// `self` minus `cut`, as zero, one or two pieces (left piece first)
    fn subtract(&self, cut: &Segment) -> [Option<Segment>; 2] {
        let overlap_start = self.start.max(cut.start);
        let overlap_end = self.end.min(cut.end);

        if overlap_start >= overlap_end {
            return [Some(*self), None];
        }

        let left = Segment::new(self.start, overlap_start);
        let right = Segment::new(overlap_end, self.end);
        [
            (!left.is_empty()).then_some(left),
            (!right.is_empty()).then_some(right),
        ]
    }
}

impl Hole {
    pub fn new(start: f32, width: f32) -> Self {
        Self { start, width }
    }

    #[inline]
    pub fn end(&self) -> f32 {
        self.start + self.width
    }

    /// Split the hole into non-wrapping intervals inside `[0, lane_width]`.
    ///
    /// The second cut is present only when the hole straddles an edge.
    pub fn cuts(&self, lane_width: f32) -> [Option<Segment>; 2] {
        let start = wrap_x(self.start, lane_width);
        let end = start + self.width.min(lane_width);

        if end <= lane_width {
            [Some(Segment::new(start, end)), None]
        } else {
            [
                Some(Segment::new(start, lane_width)),
                Some(Segment::new(0.0, end - lane_width)),
            ]
        }
    }
}

/// The set of holes punched through one lane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoleGeometry {
    lane_width: f32,
    holes: Vec<Hole>,
}

impl HoleGeometry {
    pub fn new(lane_width: f32) -> Self {
        Self {
            lane_width,
            holes: Vec::new(),
        }
    }

    pub fn with_holes(lane_width: f32, holes: Vec<Hole>) -> Self {
        Self { lane_width, holes }
    }

    #[inline]
    pub fn lane_width(&self) -> f32 {
        self.lane_width
    }

    pub fn holes(&self) -> &[Hole] {
        &self.holes
    }

    pub fn holes_mut(&mut self) -> &mut [Hole] {
        &mut self.holes
    }

    pub fn len(&self) -> usize {
        self.holes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holes.is_empty()
    }

    pub fn push(&mut self, hole: Hole) {
        self.holes.push(hole);
    }

    pub fn retain<F: FnMut(&Hole) -> bool>(&mut self, keep: F) {
        self.holes.retain(keep);
    }

    /// Is `x` over any hole? Edges count as inside.
    pub fn occupies_point(&self, x: f32) -> bool {
        let x = wrap_x(x, self.lane_width);
        self.hole_spans().any(|cut| cut.contains(x))
    }

    /// Every non-wrapping cut of every hole, in hole order
    pub fn hole_spans(&self) -> impl Iterator<Item = Segment> + '_ {
        self.holes
            .iter()
            .flat_map(|hole| hole.cuts(self.lane_width).into_iter().flatten())
    }

    /// Solid parts of the lane, ordered left to right.
    ///
    /// Starts from `[0, W]` and subtracts each cut of each hole in turn.
    /// Zero-length leftovers are dropped.
    pub fn solid_segments(&self) -> Vec<Segment> {
        let mut segments = vec![Segment::new(0.0, self.lane_width)];

        for cut in self.hole_spans() {
            segments = segments
                .iter()
                .flat_map(|segment| segment.subtract(&cut).into_iter().flatten())
                .collect();
        }

        segments
    }
}

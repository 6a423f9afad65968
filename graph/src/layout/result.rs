use serde::Serialize;

use crate::core::Point;

/// A finished lane polyline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    pub points: Vec<Point>,
    /// Palette index
    pub color: usize,
    pub is_merged: bool,
}

impl Path {
    pub(crate) fn new(color: usize, is_merged: bool) -> Self {
        Self {
            points: Vec::new(),
            color,
            is_merged,
        }
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }
}

/// Curved connector from a merge commit to the lane of one of its
/// secondary parents. Drawn as a quadratic curve through `control`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Link {
    pub start: Point,
    pub control: Point,
    pub end: Point,
    pub color: usize,
    pub is_merged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DotType {
    Default,
    /// The commit HEAD points at
    Head,
    Merge,
}

/// Node marker for one commit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dot {
    pub center: Point,
    pub color: usize,
    pub is_merged: bool,
    pub kind: DotType,
}

/// Geometry of the whole graph column
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphLayoutResult {
    pub paths: Vec<Path>,
    pub links: Vec<Link>,
    /// One per input commit, in input order
    pub dots: Vec<Dot>,
}

impl GraphLayoutResult {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.links.is_empty() && self.dots.is_empty()
    }
}

/// Per-row values the commit list needs next to the graph
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RowAnnotation {
    pub is_merged: bool,
    /// Horizontal space reserved for the graph in this row
    pub margin: f64,
    /// Color of the row's dot
    pub color: usize,
}

/// Everything a layout run produces. `rows[i]` belongs to the i-th input commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutOutput {
    pub graph: GraphLayoutResult,
    pub rows: Vec<RowAnnotation>,
}

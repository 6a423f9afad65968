use crate::core::Point;
use crate::layout::result::Path;

/// Working state of one open lane while rows are being laid out.
///
/// Points only ever move downwards: `add` drops any point that is not
/// strictly below the lowest point recorded so far, which keeps lanes that
/// pass the same row without moving from piling up zero-length segments.
#[derive(Debug, Clone)]
pub struct PathState {
    /// The commit this lane is heading for
    pub awaited: String,
    last: Point,
    end_y: f64,
    path: Path,
}

impl PathState {
    /// Open a lane that starts at `start`
    pub fn new(awaited: impl Into<String>, is_merged: bool, color: usize, start: Point) -> Self {
        let mut path = Path::new(color, is_merged);
        path.points.push(start);

        Self {
            awaited: awaited.into(),
            last: start,
            end_y: start.y,
            path,
        }
    }

    /// Open a lane that already runs from `start` to `to`
    pub fn with_segment(
        awaited: impl Into<String>,
        is_merged: bool,
        color: usize,
        start: Point,
        to: Point,
    ) -> Self {
        let mut lane = Self::new(awaited, is_merged, color, start);
        lane.add(to.x, to.y);
        lane.last = to;
        lane
    }

    pub fn last(&self) -> Point {
        self.last
    }

    pub fn color(&self) -> usize {
        self.path.color
    }

    pub fn is_merged(&self) -> bool {
        self.path.is_merged
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The lane has no commit in this row and is routed past it.
    pub fn pass(&mut self, x: f64, mut y: f64, half: f64) {
        if x > self.last.x {
            self.add(self.last.x, self.last.y);
            self.add(x, y - half);
        } else if x < self.last.x {
            self.add(self.last.x, y - half);
            y += half;
            self.add(x, y);
        }

        self.last = Point::new(x, y);
    }

    /// The lane has a commit in this row and carries on to its parent.
    pub fn goto(&mut self, x: f64, y: f64, half: f64) {
        if x > self.last.x {
            self.add(self.last.x, self.last.y);
            self.add(x, y - half);
        } else if x < self.last.x {
            // Bend from the previous row, unless the lane already sits half
            // a row low after swinging left.
            let mut min_y = y - half;
            if min_y > self.last.y {
                min_y -= half;
            }
            self.add(self.last.x, min_y);
            self.add(x, y);
        }

        self.last = Point::new(x, y);
    }

    /// The lane has a commit in this row and stops there.
    pub fn end(&mut self, x: f64, y: f64, half: f64) {
        if x > self.last.x {
            self.add(self.last.x, self.last.y);
            self.add(x, y - half);
        } else if x < self.last.x {
            self.add(self.last.x, y - half);
        }

        self.add_final(x, y);
        self.last = Point::new(x, y);
    }

    /// Close the current segment where the lane stands and continue with a
    /// merged segment of the same color. Returns the closed segment.
    pub fn split_merged(&mut self) -> Path {
        self.add(self.last.x, self.last.y);

        let mut next = Path::new(self.path.color, true);
        next.points.push(self.last);
        self.end_y = self.last.y;

        std::mem::replace(&mut self.path, next)
    }

    /// Hand over the path built so far
    pub fn into_path(self) -> Path {
        self.path
    }

    fn add(&mut self, x: f64, y: f64) {
        if self.end_y < y {
            self.path.points.push(Point::new(x, y));
            self.end_y = y;
        }
    }

    // The end point may share Y with the point before it, but may neither
    // climb back up nor repeat that point.
    fn add_final(&mut self, x: f64, y: f64) {
        let target = Point::new(x, y);
        if y < self.end_y || self.path.last() == Some(target) {
            return;
        }
        self.path.points.push(target);
        self.end_y = y;
    }
}

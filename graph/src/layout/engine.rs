use tracing::{debug, trace};

use crate::core::{Commit, Point};
use crate::layout::color::ColorPicker;
use crate::layout::config::{GraphMetrics, LayoutOptions};
use crate::layout::path::PathState;
use crate::layout::result::{
    Dot, DotType, GraphLayoutResult, LayoutOutput, Link, Path, RowAnnotation,
};

/// Converts a commit list in log order into lanes, links and dots.
///
/// Every call is independent: the open lanes and the color picker live only
/// for the duration of [`GraphLayoutEngine::layout`].
#[derive(Debug, Clone, Default)]
pub struct GraphLayoutEngine {
    options: LayoutOptions,
}

impl GraphLayoutEngine {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Lay out `commits`, which must be ordered children first.
    ///
    /// Never fails: unordered input, duplicate SHAs or parents that never
    /// show up produce odd-looking but well-formed geometry.
    pub fn layout(&self, commits: &[Commit]) -> LayoutOutput {
        let mut run = LayoutRun::new(&self.options, commits.len());

        for commit in commits {
            run.add_row(commit);
        }

        let output = run.finish();
        debug!(
            commits = commits.len(),
            paths = output.graph.paths.len(),
            links = output.graph.links.len(),
            "laid out commit graph"
        );
        output
    }
}

/// Working state of one layout call
struct LayoutRun {
    metrics: GraphMetrics,
    first_parent_only: bool,
    colors: ColorPicker,
    /// Open lanes, left to right
    unsolved: Vec<OpenLane>,
    /// Finished paths, indexed by creation order. A slot stays empty while
    /// its lane is still open.
    paths: Vec<Option<Path>>,
    links: Vec<Link>,
    dots: Vec<Dot>,
    rows: Vec<RowAnnotation>,
    offset_y: f64,
}

struct OpenLane {
    state: PathState,
    slot: usize,
}

impl LayoutRun {
    fn new(options: &LayoutOptions, capacity: usize) -> Self {
        Self {
            metrics: options.metrics,
            first_parent_only: options.first_parent_only,
            colors: ColorPicker::new(options.palette_size.get()),
            unsolved: Vec::new(),
            paths: Vec::new(),
            links: Vec::new(),
            dots: Vec::with_capacity(capacity),
            rows: Vec::with_capacity(capacity),
            offset_y: -options.metrics.half_height(),
        }
    }

    /// Register a new open lane; its path slot keeps creation order.
    fn open(&mut self, state: PathState) -> usize {
        trace!(awaited = %state.awaited, color = state.color(), "open lane");
        let slot = self.paths.len();
        self.paths.push(None);
        self.unsolved.push(OpenLane { state, slot });
        self.unsolved.len() - 1
    }

    fn retire(&mut self, lane: OpenLane) {
        self.paths[lane.slot] = Some(lane.state.into_path());
    }

    /// Close the lane's current segment and keep it going as a merged one.
    fn split_merged(&mut self, index: usize) {
        let closed = self.unsolved[index].state.split_merged();
        let old_slot = self.unsolved[index].slot;
        self.paths[old_slot] = Some(closed);

        trace!(awaited = %self.unsolved[index].state.awaited, "split lane into merged segment");
        self.unsolved[index].slot = self.paths.len();
        self.paths.push(None);
    }

    fn add_row(&mut self, commit: &Commit) {
        let unit_w = self.metrics.lane_width;
        let half_w = self.metrics.half_width();
        let half_h = self.metrics.half_height();

        self.offset_y += self.metrics.row_height;
        let offset_y = self.offset_y;

        let mut is_merged = commit.is_merged;
        let mut offset_x = self.metrics.x_origin - half_w;
        let previous_max_x = self
            .unsolved
            .last()
            .map(|lane| lane.state.last().x)
            .unwrap_or(offset_x + unit_w);

        // Major lane: (index, x, color)
        let mut major: Option<(usize, f64, usize)> = None;
        let mut ended: Vec<usize> = Vec::new();

        for (index, lane) in self.unsolved.iter_mut().enumerate() {
            let lane = &mut lane.state;
            if lane.awaited != commit.sha {
                offset_x += unit_w;
                lane.pass(offset_x, offset_y, half_h);
                continue;
            }

            match major {
                None => {
                    offset_x += unit_w;
                    major = Some((index, offset_x, lane.color()));

                    if let Some(parent) = commit.first_parent() {
                        lane.awaited = parent.to_string();
                        lane.goto(offset_x, offset_y, half_h);
                    } else {
                        lane.end(offset_x, offset_y, half_h);
                        ended.push(index);
                    }
                }
                Some((_, major_x, _)) => {
                    lane.end(major_x, offset_y, half_h);
                    ended.push(index);
                }
            }

            is_merged = is_merged || lane.is_merged();
        }

        // Apply removals after the scan, keeping the major index in step
        for &index in ended.iter().rev() {
            let lane = self.unsolved.remove(index);
            trace!(awaited = %lane.state.awaited, "close lane");
            self.colors.recycle(lane.state.color());
            self.retire(lane);

            if let Some((major_index, _, _)) = major.as_mut() {
                if index < *major_index {
                    *major_index -= 1;
                }
            }
        }

        // Lane carrying this commit onwards, if any
        let mut current: Option<usize> = None;
        match major {
            None => {
                offset_x += unit_w;
                if let Some(parent) = commit.first_parent() {
                    let color = self.colors.next();
                    let state =
                        PathState::new(parent, is_merged, color, Point::new(offset_x, offset_y));
                    current = Some(self.open(state));
                }
            }
            Some((index, _, _)) if !commit.is_root() => {
                current = Some(index);
                if is_merged && !self.unsolved[index].state.is_merged() {
                    self.split_merged(index);
                }
            }
            Some(_) => {}
        }

        let (dot_x, dot_color) = match (current, major) {
            (Some(index), _) => {
                let state = &self.unsolved[index].state;
                (state.last().x, state.color())
            }
            (None, Some((_, x, color))) => (x, color),
            (None, None) => (offset_x, 0),
        };
        let position = Point::new(dot_x, offset_y);

        let kind = if commit.is_current_head {
            DotType::Head
        } else if commit.is_merge() {
            DotType::Merge
        } else {
            DotType::Default
        };
        self.dots.push(Dot {
            center: position,
            color: dot_color,
            is_merged,
            kind,
        });

        if !self.first_parent_only {
            for parent in commit.parents.iter().skip(1) {
                let existing = self
                    .unsolved
                    .iter()
                    .position(|lane| lane.state.awaited == *parent);

                match existing {
                    Some(index) => {
                        if is_merged && !self.unsolved[index].state.is_merged() {
                            let lane = &mut self.unsolved[index].state;
                            let x = lane.last().x;
                            lane.goto(x, offset_y + half_h, half_h);
                            self.split_merged(index);
                        }

                        let lane = &self.unsolved[index].state;
                        let end = Point::new(lane.last().x, offset_y + half_h);
                        self.links.push(Link {
                            start: position,
                            control: Point::new(end.x, position.y),
                            end,
                            color: lane.color(),
                            is_merged,
                        });
                    }
                    None => {
                        offset_x += unit_w;
                        let color = self.colors.next();
                        let state = PathState::with_segment(
                            parent.as_str(),
                            is_merged,
                            color,
                            position,
                            Point::new(offset_x, position.y + half_h),
                        );
                        self.open(state);
                    }
                }
            }
        }

        self.rows.push(RowAnnotation {
            is_merged,
            margin: offset_x.max(previous_max_x) + half_w + self.metrics.horizontal_margin,
            color: dot_color,
        });
    }

    /// Close lanes whose commits never showed up (truncated history).
    fn close_open_lanes(&mut self) {
        let half_h = self.metrics.half_height();
        let end_y = (self.rows.len() as f64 - 0.5) * self.metrics.row_height;

        if !self.unsolved.is_empty() {
            debug!(open = self.unsolved.len(), "closing lanes at end of history");
        }

        let open = std::mem::take(&mut self.unsolved);
        for (index, mut lane) in open.into_iter().enumerate() {
            let points = &lane.state.path().points;
            let idle = points.len() == 1 && (points[0].y - end_y).abs() < 0.0001;
            if !idle {
                let x = (index as f64 + 0.5) * self.metrics.lane_width + self.metrics.x_origin;
                lane.state.end(x, end_y + half_h, half_h);
            }
            self.retire(lane);
        }
    }

    fn finish(mut self) -> LayoutOutput {
        self.close_open_lanes();

        LayoutOutput {
            graph: GraphLayoutResult {
                paths: self.paths.into_iter().flatten().collect(),
                links: self.links,
                dots: self.dots,
            },
            rows: self.rows,
        }
    }
}

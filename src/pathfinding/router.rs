//! A* pathfinding over a walk mask
//!
//! The mask is searched on a coarse grid of `stride × stride` pixel nodes.
//! A node is usable only if every pixel it covers is walkable, so a route
//! never passes through a footprint containing a wall pixel. The nodes
//! holding the start and end pixels may be partially blocked; a route
//! leaves or enters one only across an edge pixel that a flood from the
//! endpoint reaches inside that node. The endpoints themselves are the
//! first and last waypoints.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f64::consts::SQRT_2;

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::core::types::PixelPoint;
use crate::mask::WalkMask;
use crate::pathfinding::types::{CancelToken, RouteOutcome, RouterConfig, SearchStatus};
use crate::spatial::Grid;

const NO_PARENT: u32 = u32::MAX;

const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Node in the A* open set
#[derive(Debug, Clone, Copy)]
struct PathNode {
    index: usize,
    f_cost: OrderedFloat<f64>, // g_cost + heuristic
    h_cost: OrderedFloat<f64>,
    seq: u64,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap: lowest f, then lowest h, then oldest
        (other.f_cost, other.h_cost, other.seq).cmp(&(self.f_cost, self.h_cost, self.seq))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Node validity cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    Unknown,
    Open,
    Blocked,
}

/// A* router bound to one mask snapshot
pub struct GridRouter<'a> {
    mask: &'a WalkMask,
    config: RouterConfig,
}

impl<'a> GridRouter<'a> {
    pub fn new(mask: &'a WalkMask, config: RouterConfig) -> Self {
        Self { mask, config }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Search a route from `start` to `end`
    pub fn search(
        &self,
        start: PixelPoint,
        end: PixelPoint,
        cancel: Option<&CancelToken>,
    ) -> RouteOutcome {
        if !self.mask.is_walkable(start.x, start.y) {
            debug!("Route start {} is not walkable", start);
            return RouteOutcome::failed(SearchStatus::StartBlocked, 0);
        }
        if !self.mask.is_walkable(end.x, end.y) {
            debug!("Route end {} is not walkable", end);
            return RouteOutcome::failed(SearchStatus::EndBlocked, 0);
        }
        if start == end {
            return RouteOutcome::found(vec![start], 0);
        }

        let mut search = Search::new(self.mask, &self.config, start, end);
        let outcome = search.run(cancel);
        if !outcome.is_found() {
            debug!(
                "No route {} -> {}: {:?} after {} expansions",
                start, end, outcome.status, outcome.nodes_expanded
            );
        }
        outcome
    }
}

/// Per-search state over the coarse grid
struct Search<'a> {
    mask: &'a WalkMask,
    stride: i32,
    max_expanded: usize,
    allow_diagonal: bool,
    start: PixelPoint,
    end: PixelPoint,
    start_node: (i32, i32),
    end_node: (i32, i32),
    /// Pixels of the start node reachable from `start` without leaving it
    start_reach: Grid<bool>,
    /// Pixels of the end node reachable from `end` without leaving it
    end_reach: Grid<bool>,
    states: Grid<NodeState>,
    g_costs: Grid<f64>,
    parents: Grid<u32>,
    closed: Grid<bool>,
}

impl<'a> Search<'a> {
    fn new(mask: &'a WalkMask, config: &RouterConfig, start: PixelPoint, end: PixelPoint) -> Self {
        let stride = config.stride.max(1) as i32;
        let cols = (mask.width() as usize).div_ceil(stride as usize);
        let rows = (mask.height() as usize).div_ceil(stride as usize);
        let start_node = (start.x / stride, start.y / stride);
        let end_node = (end.x / stride, end.y / stride);

        Self {
            mask,
            stride,
            max_expanded: config.max_expanded_nodes,
            allow_diagonal: config.allow_diagonal,
            start,
            end,
            start_node,
            end_node,
            start_reach: footprint_reach(mask, stride, start_node, start),
            end_reach: footprint_reach(mask, stride, end_node, end),
            states: Grid::new(cols, rows, NodeState::Unknown),
            g_costs: Grid::new(cols, rows, f64::INFINITY),
            parents: Grid::new(cols, rows, NO_PARENT),
            closed: Grid::new(cols, rows, false),
        }
    }

    fn run(&mut self, cancel: Option<&CancelToken>) -> RouteOutcome {
        if self.start_node == self.end_node {
            if self.stride == 1 || self.usable(self.start_node, self.end.x, self.end.y) {
                return RouteOutcome::found(dedup(vec![self.start, self.end]), 0);
            }
            // Walled apart inside one node: only a full-resolution search can tell
            let fine = RouterConfig {
                stride: 1,
                max_expanded_nodes: self.max_expanded,
                allow_diagonal: self.allow_diagonal,
            };
            return Search::new(self.mask, &fine, self.start, self.end).run(cancel);
        }

        let start_index = self.index(self.start_node);
        let end_index = self.index(self.end_node);

        let mut open_set = BinaryHeap::new();
        let mut seq = 0u64;
        let mut nodes_expanded = 0usize;

        let h = self.heuristic(self.start_node);
        self.g_costs.as_mut_slice()[start_index] = 0.0;
        open_set.push(PathNode {
            index: start_index,
            f_cost: OrderedFloat(h),
            h_cost: OrderedFloat(h),
            seq,
        });

        while let Some(current) = open_set.pop() {
            if current.index == end_index {
                return RouteOutcome::found(self.reconstruct_path(end_index), nodes_expanded);
            }
            if self.closed.as_slice()[current.index] {
                continue;
            }
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return RouteOutcome::failed(SearchStatus::Cancelled, nodes_expanded);
            }
            if nodes_expanded >= self.max_expanded {
                return RouteOutcome::failed(SearchStatus::ExpansionLimit, nodes_expanded);
            }

            self.closed.as_mut_slice()[current.index] = true;
            nodes_expanded += 1;

            let node = self.coords(current.index);
            let current_g = self.g_costs.as_slice()[current.index];

            for (dx, dy, step) in moves(self.stride, self.allow_diagonal) {
                let neighbor = (node.0 + dx, node.1 + dy);
                if !self.can_step(node, neighbor) {
                    continue;
                }
                // No corner cutting: both orthogonal neighbours must be open
                if dx != 0 && dy != 0
                    && !(self.is_open((node.0 + dx, node.1)) && self.is_open((node.0, node.1 + dy)))
                {
                    continue;
                }

                let neighbor_index = self.index(neighbor);
                if self.closed.as_slice()[neighbor_index] {
                    continue;
                }

                let tentative_g = current_g + step;
                if tentative_g < self.g_costs.as_slice()[neighbor_index] {
                    self.g_costs.as_mut_slice()[neighbor_index] = tentative_g;
                    self.parents.as_mut_slice()[neighbor_index] = current.index as u32;

                    let h = self.heuristic(neighbor);
                    seq += 1;
                    open_set.push(PathNode {
                        index: neighbor_index,
                        f_cost: OrderedFloat(tentative_g + h),
                        h_cost: OrderedFloat(h),
                        seq,
                    });
                }
            }
        }

        RouteOutcome::failed(SearchStatus::Unreachable, nodes_expanded)
    }

    /// Octile distance with diagonals, Manhattan without, in pixels
    fn heuristic(&self, node: (i32, i32)) -> f64 {
        let dx = (node.0 - self.end_node.0).unsigned_abs() as f64;
        let dy = (node.1 - self.end_node.1).unsigned_abs() as f64;
        let unit = self.stride as f64;

        if self.allow_diagonal {
            let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
            unit * (hi - lo) + SQRT_2 * unit * lo
        } else {
            unit * (dx + dy)
        }
    }

    fn is_endpoint(&self, node: (i32, i32)) -> bool {
        node == self.start_node || node == self.end_node
    }

    /// Whether the search may move from `from` straight into `to`
    ///
    /// Endpoint nodes may be partially blocked, so a step touching one needs
    /// a walkable pixel pair across the shared edge (or corner).
    fn can_step(&mut self, from: (i32, i32), to: (i32, i32)) -> bool {
        if !self.states.in_bounds(to.0 as i64, to.1 as i64) {
            return false;
        }
        if !self.is_endpoint(to) && !self.is_open(to) {
            return false;
        }
        if !self.is_endpoint(from) && !self.is_endpoint(to) {
            return true;
        }

        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let (x0, y0, x1, y1) = footprint(self.mask, self.stride, from);
        let edge_x = if dx > 0 { x1 - 1 } else { x0 };
        let edge_y = if dy > 0 { y1 - 1 } else { y0 };
        let crosses = |x: i32, y: i32| self.usable(from, x, y) && self.usable(to, x + dx, y + dy);

        match (dx, dy) {
            (0, _) => (x0..x1).any(|x| crosses(x, edge_y)),
            (_, 0) => (y0..y1).any(|y| crosses(edge_x, y)),
            _ => crosses(edge_x, edge_y),
        }
    }

    /// Whether pixel `(x, y)` of `node` can carry a route through that node
    fn usable(&self, node: (i32, i32), x: i32, y: i32) -> bool {
        let reach = if node == self.start_node {
            &self.start_reach
        } else if node == self.end_node {
            &self.end_reach
        } else {
            return self.mask.is_walkable(x, y);
        };
        let local_x = x - node.0 * self.stride;
        let local_y = y - node.1 * self.stride;
        if local_x < 0 || local_y < 0 {
            return false;
        }
        reach
            .get(local_x as usize, local_y as usize)
            .copied()
            .unwrap_or(false)
    }

    fn is_open(&mut self, node: (i32, i32)) -> bool {
        if !self.states.in_bounds(node.0 as i64, node.1 as i64) {
            return false;
        }

        let index = self.index(node);
        match self.states.as_slice()[index] {
            NodeState::Open => true,
            NodeState::Blocked => false,
            NodeState::Unknown => {
                let open = self.footprint_walkable(node);
                self.states.as_mut_slice()[index] = if open {
                    NodeState::Open
                } else {
                    NodeState::Blocked
                };
                open
            }
        }
    }

    /// Every pixel of the node's footprint (clipped to the mask) is walkable
    fn footprint_walkable(&self, node: (i32, i32)) -> bool {
        let (x0, y0, x1, y1) = footprint(self.mask, self.stride, node);
        (y0..y1).all(|y| (x0..x1).all(|x| self.mask.is_walkable(x, y)))
    }

    fn waypoint(&self, node: (i32, i32)) -> PixelPoint {
        if node == self.start_node {
            self.start
        } else if node == self.end_node {
            self.end
        } else {
            PixelPoint::new(node.0 * self.stride, node.1 * self.stride)
        }
    }

    fn reconstruct_path(&self, end_index: usize) -> Vec<PixelPoint> {
        let mut path = Vec::new();
        let mut current = end_index;
        loop {
            path.push(self.waypoint(self.coords(current)));
            let parent = self.parents.as_slice()[current];
            if parent == NO_PARENT {
                break;
            }
            current = parent as usize;
        }
        path.reverse();
        dedup(path)
    }

    #[inline]
    fn index(&self, node: (i32, i32)) -> usize {
        self.states.index(node.0 as usize, node.1 as usize)
    }

    #[inline]
    fn coords(&self, index: usize) -> (i32, i32) {
        let width = self.states.width;
        ((index % width) as i32, (index / width) as i32)
    }
}

/// Neighbour offsets with their step costs in pixels
fn moves(stride: i32, allow_diagonal: bool) -> impl Iterator<Item = (i32, i32, f64)> {
    let orthogonal = stride as f64;
    let diagonal = SQRT_2 * orthogonal;
    let diagonals: &'static [(i32, i32)] = if allow_diagonal { &DIAGONAL } else { &[] };

    ORTHOGONAL
        .iter()
        .map(move |&(dx, dy)| (dx, dy, orthogonal))
        .chain(diagonals.iter().map(move |&(dx, dy)| (dx, dy, diagonal)))
}

/// Pixel span `(x0, y0, x1, y1)` of a node, clipped to the mask
fn footprint(mask: &WalkMask, stride: i32, node: (i32, i32)) -> (i32, i32, i32, i32) {
    let x0 = node.0 * stride;
    let y0 = node.1 * stride;
    let x1 = (x0 + stride).min(mask.width() as i32);
    let y1 = (y0 + stride).min(mask.height() as i32);
    (x0, y0, x1, y1)
}

/// 4-connected flood from `from` that never leaves the node's footprint
fn footprint_reach(mask: &WalkMask, stride: i32, node: (i32, i32), from: PixelPoint) -> Grid<bool> {
    let (x0, y0, x1, y1) = footprint(mask, stride, node);
    let width = (x1 - x0).max(0) as usize;
    let height = (y1 - y0).max(0) as usize;
    let mut reach = Grid::new(width, height, false);

    let mut stack = vec![(from.x, from.y)];
    while let Some((x, y)) = stack.pop() {
        if x < x0 || y < y0 || x >= x1 || y >= y1 || !mask.is_walkable(x, y) {
            continue;
        }
        let Some(cell) = reach.get_mut((x - x0) as usize, (y - y0) as usize) else {
            continue;
        };
        if *cell {
            continue;
        }
        *cell = true;
        stack.extend([(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]);
    }

    reach
}

/// Drop consecutive duplicate waypoints
fn dedup(mut path: Vec<PixelPoint>) -> Vec<PixelPoint> {
    path.dedup();
    path
}

/// Find a route over `mask`, or `None` if there is none within the limits
///
/// `stride` 0 is treated as 1.
pub fn find_path(
    mask: &WalkMask,
    start: PixelPoint,
    end: PixelPoint,
    stride: u32,
    max_expanded_nodes: usize,
    allow_diagonal: bool,
    cancel: Option<&CancelToken>,
) -> Option<Vec<PixelPoint>> {
    let config = RouterConfig {
        stride,
        max_expanded_nodes,
        allow_diagonal,
    };
    GridRouter::new(mask, config)
        .search(start, end, cancel)
        .into_path()
}

/// Total Euclidean length of a polyline in pixels
pub fn path_length(path: &[PixelPoint]) -> f64 {
    path.windows(2).map(|pair| pair[0].distance(&pair[1])).sum()
}

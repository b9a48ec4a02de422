//! A region quadtree over 2D points.
//!
//! The tree indexes particle positions by value; it holds no live references
//! to particles. The orchestrator rebuilds it from scratch every step and
//! discards it at the end of the step, so the structure carries no state
//! across frames. It is the natural foundation for a Barnes-Hut style force
//! approximation, but the force phase does not consume it; the build and
//! query surface below stands on its own.

/// A position stored in the spatial index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangular region: origin plus extent.
///
/// Containment is closed on all four edges, so a point exactly on a shared
/// quadrant boundary is accepted by more than one sibling region. Insertion
/// resolves the tie by trying quadrants in a fixed NE, NW, SE, SW order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Quad {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Returns true if the point lies inside the region, edges included.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Returns true if the two regions overlap, edges included.
    pub fn intersects(&self, other: &Quad) -> bool {
        self.x <= other.x + other.width
            && self.x + self.width >= other.x
            && self.y <= other.y + other.height
            && self.y + self.height >= other.y
    }

    /// Returns the square region the simulation culls and indexes over: the
    /// view enlarged `factor` times, centered on the view. Both axes are
    /// scaled by the view's width, so stray particles get the same slack in
    /// every direction before the cull removes them.
    pub fn overscanned(&self, factor: f64) -> Quad {
        let half = factor / 2.0;
        Quad {
            x: self.x - half * self.width,
            y: self.y - half * self.width,
            width: factor * self.width,
            height: factor * self.width,
        }
    }
}

/// A region quadtree node with bounded-capacity leaves.
///
/// A node stores points directly only while it has never exceeded
/// `capacity`; the first overflow subdivides it into four children of equal
/// area and all later insertions are delegated downward. Once subdivided, a
/// node never reverts to leaf form. Each child slot is exclusively owned and
/// stays `None` until subdivision.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadTree {
    pub boundary: Quad,
    pub capacity: usize,
    pub points: Vec<Point>,
    pub divided: bool,
    pub ne: Option<Box<QuadTree>>,
    pub nw: Option<Box<QuadTree>>,
    pub se: Option<Box<QuadTree>>,
    pub sw: Option<Box<QuadTree>>,
}

impl QuadTree {
    pub fn new(boundary: Quad, capacity: usize) -> Self {
        Self {
            boundary,
            capacity,
            points: Vec::new(),
            divided: false,
            ne: None,
            nw: None,
            se: None,
            sw: None,
        }
    }

    /// Builds a fresh tree over `boundary` from an iterator of points.
    ///
    /// Points outside the boundary are skipped; the caller is expected to
    /// have culled them already, but the tree does not assume it.
    pub fn build(boundary: Quad, capacity: usize, points: impl IntoIterator<Item = Point>) -> Self {
        let mut tree = QuadTree::new(boundary, capacity);
        for point in points {
            tree.insert(point);
        }
        tree
    }

    /// Inserts a point, returning false (and leaving the tree unchanged)
    /// if the point lies outside this node's region.
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody2d::particles::{Point, Quad, QuadTree};
    ///
    /// let mut tree = QuadTree::new(Quad::new(0.0, 0.0, 100.0, 100.0), 2);
    /// assert!(tree.insert(Point::new(10.0, 10.0)));
    /// assert!(!tree.insert(Point::new(-1.0, 10.0)));
    /// ```
    pub fn insert(&mut self, point: Point) -> bool {
        if !self.boundary.contains(point) {
            return false;
        }

        if self.points.len() < self.capacity {
            self.points.push(point);
            return true;
        }

        if !self.divided {
            self.subdivide();
        }

        // NE first: ties on shared quadrant boundaries resolve to NE.
        for child in [&mut self.ne, &mut self.nw, &mut self.se, &mut self.sw] {
            if let Some(node) = child {
                if node.insert(point) {
                    return true;
                }
            }
        }

        false
    }

    /// Splits this node's region into four equal quadrants meeting at its
    /// geometric center. Subdividing twice is a no-op.
    fn subdivide(&mut self) {
        if self.divided {
            return;
        }
        self.divided = true;

        let Quad { x, y, width, height } = self.boundary;
        let half_w = width / 2.0;
        let half_h = height / 2.0;

        // Screen coordinates: y grows downward, so north is the smaller y.
        self.ne = Some(Box::new(QuadTree::new(Quad::new(x + half_w, y, half_w, half_h), self.capacity)));
        self.nw = Some(Box::new(QuadTree::new(Quad::new(x, y, half_w, half_h), self.capacity)));
        self.se = Some(Box::new(QuadTree::new(Quad::new(x + half_w, y + half_h, half_w, half_h), self.capacity)));
        self.sw = Some(Box::new(QuadTree::new(Quad::new(x, y + half_h, half_w, half_h), self.capacity)));
    }

    /// Collects every stored point that falls inside `range` into `out`.
    pub fn query(&self, range: &Quad, out: &mut Vec<Point>) {
        if !self.boundary.intersects(range) {
            return;
        }
        for &point in &self.points {
            if range.contains(point) {
                out.push(point);
            }
        }
        for child in [&self.ne, &self.nw, &self.se, &self.sw] {
            if let Some(node) = child {
                node.query(range, out);
            }
        }
    }

    /// Collects the region of every node into `out`, for debug overlays.
    pub fn boundaries(&self, out: &mut Vec<Quad>) {
        out.push(self.boundary);
        for child in [&self.ne, &self.nw, &self.se, &self.sw] {
            if let Some(node) = child {
                node.boundaries(out);
            }
        }
    }

    /// Total number of points stored in this node and all descendants.
    pub fn len(&self) -> usize {
        let mut count = self.points.len();
        for child in [&self.ne, &self.nw, &self.se, &self.sw] {
            if let Some(node) = child {
                count += node.len();
            }
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

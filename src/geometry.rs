use bevy::math::Vec2;

/// Axis-aligned box. `min_y` is the top edge: y grows downward in pane units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Aabb {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self {
            min_x: center.x - hw,
            min_y: center.y - hh,
            max_x: center.x + hw,
            max_y: center.y + hh,
        }
    }

    /// Square region of a grid starting at `pos`.
    pub fn grid(pos: Vec2, size: f32) -> Self {
        Self::new(pos.x, pos.y, pos.x + size, pos.y + size)
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.min_x, self.min_y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.max_x, self.max_y)
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    pub fn area(&self) -> f32 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(
            self.min_x + delta.x,
            self.min_y + delta.y,
            self.max_x + delta.x,
            self.max_y + delta.y,
        )
    }

    /// Shrinks every edge inward by `amount`.
    pub fn shrunk(&self, amount: f32) -> Self {
        Self::new(
            self.min_x + amount,
            self.min_y + amount,
            self.max_x - amount,
            self.max_y - amount,
        )
    }

    /// Strict overlap: shared edges do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max_x > other.min_x
            && self.min_x < other.max_x
            && self.max_y > other.min_y
            && self.min_y < other.max_y
    }

    /// Closed test: boxes that share only an edge or corner still touch.
    pub fn touches(&self, other: &Aabb) -> bool {
        !(self.max_x < other.min_x
            || self.min_x > other.max_x
            || self.min_y > other.max_y
            || self.max_y < other.min_y)
    }

    pub fn contains(&self, other: &Aabb) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Half-open containment, matching grid cells `[min, max)`.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min_x && p.x < self.max_x && p.y >= self.min_y && p.y < self.max_y
    }

    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Aabb::new(
            self.min_x.max(other.min_x),
            self.min_y.max(other.min_y),
            self.max_x.min(other.max_x),
            self.max_y.min(other.max_y),
        ))
    }

    /// Applies `f` to the x edges and `g` to the y edges.
    pub fn map_edges(&self, f: impl Fn(f32) -> f32, g: impl Fn(f32) -> f32) -> Aabb {
        Aabb::new(f(self.min_x), g(self.min_y), f(self.max_x), g(self.max_y))
    }
}

/// Length of the overlap between segments `[a0, a1]` and `[b0, b1]`.
pub fn segment_overlap(a0: f32, a1: f32, b0: f32, b1: f32) -> f32 {
    (a1.min(b1) - a0.max(b0)).max(0.0)
}

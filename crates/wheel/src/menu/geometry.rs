use super::angle::{self, Arc, FULL_TURN};
use super::CENTROID_RADIUS_FACTOR;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Where the wheel sits on screen. Ring radii are `base_radius` scaled by the
/// inner/outer factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub center: Point,
    pub base_radius: f64,
    pub inner_radius_factor: f64,
    pub outer_radius_factor: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("A wheel needs at least 2 segments, got {0}")]
    TooFewSegments(usize),
    #[error("Gap of {gap}° leaves no room in a {span}° segment")]
    GapTooWide { gap: f64, span: f64 },
    #[error("Invalid ring radii: inner {inner}, outer {outer}")]
    InvalidRadii { inner: f64, outer: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub arc: Arc,
    pub centroid: Point,
}

/// The wheel's segments, computed once. Renderers read arcs and centroids
/// from here instead of recomputing angles.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentGeometry {
    segments: Vec<Segment>,
    span: f64,
    half_width: f64,
    center: Point,
    inner_radius: f64,
    outer_radius: f64,
}

impl SegmentGeometry {
    pub fn new(count: usize, gap: f64, layout: Layout) -> Result<Self, GeometryError> {
        if count < 2 {
            return Err(GeometryError::TooFewSegments(count));
        }

        let span = FULL_TURN / count as f64;
        if !gap.is_finite() || gap < 0.0 || gap >= span {
            return Err(GeometryError::GapTooWide { gap, span });
        }

        let inner = layout.base_radius * layout.inner_radius_factor;
        let outer = layout.base_radius * layout.outer_radius_factor;
        if !inner.is_finite() || !outer.is_finite() || inner < 0.0 || inner > outer {
            return Err(GeometryError::InvalidRadii { inner, outer });
        }

        let half_width = (span - gap) / 2.0;
        let segments = (0..count)
            .map(|index| {
                let mid = index as f64 * span;
                Segment {
                    index,
                    arc: Arc::new(mid - half_width, mid + half_width),
                    centroid: point_at(layout.center, mid, outer * CENTROID_RADIUS_FACTOR),
                }
            })
            .collect();

        Ok(Self {
            segments,
            span,
            half_width,
            center: layout.center,
            inner_radius: inner,
            outer_radius: outer,
        })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn span(&self) -> f64 {
        self.span
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    pub fn contains(&self, deg: f64, index: usize) -> bool {
        self.segment(index).is_some_and(|s| s.arc.contains(deg))
    }

    /// First segment whose arc holds `deg`, or `None` inside a gap.
    pub fn segment_at(&self, deg: f64) -> Option<usize> {
        self.segments
            .iter()
            .find(|s| s.arc.contains(deg))
            .map(|s| s.index)
    }

    /// The arc facing segment `index` across the center.
    pub fn opposite(&self, index: usize) -> Option<Arc> {
        self.segment(index).map(|s| s.arc.opposite())
    }

    pub fn centroid(&self, index: usize) -> Option<Point> {
        self.segment(index).map(|s| s.centroid)
    }

    /// Anchor for the option-cycle hint of a segment: where the horizontal
    /// line through its centroid meets a circle `margin` outside the ring, on
    /// the centroid's side. `None` when the intersection does not exist.
    pub fn cycle_hint_anchor(&self, index: usize, margin: f64) -> Option<Point> {
        let centroid = self.centroid(index)?;
        let radius = self.outer_radius + margin;
        let dy = centroid.y - self.center.y;
        let dx = (radius * radius - dy * dy).sqrt();

        if !dx.is_finite() || radius <= 0.0 {
            return None;
        }

        let side = if centroid.x < self.center.x { -1.0 } else { 1.0 };
        let anchor = Point::new(self.center.x + side * dx, centroid.y);
        (anchor.x.is_finite() && anchor.y.is_finite()).then_some(anchor)
    }
}

pub fn point_at(center: Point, deg: f64, radius: f64) -> Point {
    let (dx, dy) = angle::direction(deg);
    Point::new(center.x + dx * radius, center.y + dy * radius)
}

//! Integer plane geometry used for every blocking and transition test.
//!
//! All shapes are axis aligned. A [`Rect`] is the closed box spanned by its
//! origin and size; two rectangles overlap only when their interiors intersect,
//! so bodies resting flush against an edge are not considered colliding.

use serde::{Deserialize, Serialize};

use crate::MapId;

/// Coordinate axis of the plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal axis, growing to the right.
    X,
    /// Vertical axis, growing downwards.
    Y,
}

impl Axis {
    /// Both axes in canonical order.
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Returns the perpendicular axis.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// Point on the integer plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    /// The origin `(0, 0)`.
    pub const ORIGIN: Point = Point::new(0, 0);

    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Builds a point from a value on `axis` and a value on the other axis.
    #[must_use]
    pub const fn on_axes(axis: Axis, along: i32, across: i32) -> Self {
        match axis {
            Axis::X => Self::new(along, across),
            Axis::Y => Self::new(across, along),
        }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Coordinate along the provided axis.
    #[must_use]
    pub const fn coord(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Returns the point shifted by the provided displacement.
    #[must_use]
    pub const fn offset(self, displacement: Displacement) -> Self {
        Self::new(
            self.x.saturating_add(displacement.dx()),
            self.y.saturating_add(displacement.dy()),
        )
    }
}

/// Requested or corrected movement for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Displacement {
    dx: i32,
    dy: i32,
}

impl Displacement {
    /// Displacement that leaves a body where it is.
    pub const ZERO: Displacement = Displacement::new(0, 0);

    /// Creates a displacement from its components.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Vertical component.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }

    /// Component along the provided axis.
    #[must_use]
    pub const fn along(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.dx,
            Axis::Y => self.dy,
        }
    }

    /// Returns a copy with the component on `axis` replaced.
    #[must_use]
    pub const fn with_along(self, axis: Axis, value: i32) -> Self {
        match axis {
            Axis::X => Self::new(value, self.dy),
            Axis::Y => Self::new(self.dx, value),
        }
    }

    /// Reports whether the displacement moves nothing.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Width and height of a rectangle or body footprint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    width: i32,
    height: i32,
}

impl Extent {
    /// Creates an extent from explicit dimensions.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Horizontal dimension.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Vertical dimension.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Dimension along the provided axis.
    #[must_use]
    pub const fn along(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// Reports whether either dimension is negative.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.width < 0 || self.height < 0
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    origin: Point,
    size: Extent,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(origin: Point, size: Extent) -> Self {
        Self { origin, size }
    }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Dimensions of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Extent {
        self.size
    }

    /// Closed interval covered on `axis`, as `(low, high)`.
    #[must_use]
    pub const fn span(&self, axis: Axis) -> (i32, i32) {
        let low = self.origin.coord(axis);
        (low, low.saturating_add(self.size.along(axis)))
    }

    /// Centre of the rectangle, rounded towards the origin.
    #[must_use]
    pub const fn center(&self) -> Point {
        Point::new(
            self.origin.x.saturating_add(self.size.width / 2),
            self.origin.y.saturating_add(self.size.height / 2),
        )
    }

    /// A rectangle with zero or negative width or height cannot collide.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.size.width <= 0 || self.size.height <= 0
    }

    /// Returns the rectangle moved by the provided displacement.
    #[must_use]
    pub const fn translated(&self, displacement: Displacement) -> Self {
        Self::new(self.origin.offset(displacement), self.size)
    }

    /// Reports whether the interiors of both rectangles intersect on `axis`.
    #[must_use]
    pub const fn overlaps_on(&self, axis: Axis, other: &Rect) -> bool {
        let (low, high) = self.span(axis);
        let (other_low, other_high) = other.span(axis);
        low < other_high && other_low < high
    }

    /// Reports true two-dimensional overlap of the interiors.
    #[must_use]
    pub const fn overlaps(&self, other: &Rect) -> bool {
        self.overlaps_on(Axis::X, other) && self.overlaps_on(Axis::Y, other)
    }

    /// Reports whether the point lies inside or on the border.
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        let (left, right) = self.span(Axis::X);
        let (top, bottom) = self.span(Axis::Y);
        left <= point.x && point.x <= right && top <= point.y && point.y <= bottom
    }

    /// Corners in winding order: top-left, top-right, bottom-right, bottom-left.
    #[must_use]
    pub const fn corners(&self) -> [Point; 4] {
        let (left, right) = self.span(Axis::X);
        let (top, bottom) = self.span(Axis::Y);
        [
            Point::new(left, top),
            Point::new(right, top),
            Point::new(right, bottom),
            Point::new(left, bottom),
        ]
    }

    /// Boundary segments in winding order: top, right, bottom, left.
    #[must_use]
    pub const fn edges(&self) -> [Segment; 4] {
        let [top_left, top_right, bottom_right, bottom_left] = self.corners();
        [
            Segment::aligned(top_left, top_right, Axis::Y),
            Segment::aligned(top_right, bottom_right, Axis::X),
            Segment::aligned(bottom_right, bottom_left, Axis::Y),
            Segment::aligned(bottom_left, top_left, Axis::X),
        ]
    }
}

/// Errors raised when constructing geometry from configuration data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// The endpoints differ on both axes, so the segment would be diagonal.
    #[error("segment endpoints {a:?} and {b:?} are not axis aligned")]
    NotAxisAligned {
        /// First endpoint supplied.
        a: Point,
        /// Second endpoint supplied.
        b: Point,
    },
}

/// Horizontal or vertical line between two points.
///
/// Segments compare by geometry: the same line covered in either direction is
/// equal. Only the endpoints are persisted; decoding re-runs [`Segment::new`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(try_from = "Endpoints", into = "Endpoints")]
pub struct Segment {
    a: Point,
    b: Point,
    mid_axis: Axis,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct Endpoints {
    a: Point,
    b: Point,
}

impl TryFrom<Endpoints> for Segment {
    type Error = GeometryError;

    fn try_from(Endpoints { a, b }: Endpoints) -> Result<Self, Self::Error> {
        Self::new(a, b)
    }
}

impl From<Segment> for Endpoints {
    fn from(segment: Segment) -> Self {
        Self {
            a: segment.a,
            b: segment.b,
        }
    }
}

impl Segment {
    /// Connects two points that share a coordinate.
    ///
    /// When both coordinates match (a single point) the vertical coordinate is
    /// treated as the fixed one.
    pub fn new(a: Point, b: Point) -> Result<Self, GeometryError> {
        let mid_axis = if a.y == b.y {
            Axis::Y
        } else if a.x == b.x {
            Axis::X
        } else {
            return Err(GeometryError::NotAxisAligned { a, b });
        };
        Ok(Self::aligned(a, b, mid_axis))
    }

    const fn aligned(a: Point, b: Point, mid_axis: Axis) -> Self {
        Self { a, b, mid_axis }
    }

    /// First endpoint.
    #[must_use]
    pub const fn a(&self) -> Point {
        self.a
    }

    /// Second endpoint.
    #[must_use]
    pub const fn b(&self) -> Point {
        self.b
    }

    /// Axis whose coordinate is shared by both endpoints.
    #[must_use]
    pub const fn mid_axis(&self) -> Axis {
        self.mid_axis
    }

    /// The shared coordinate, e.g. `3` for `(1, 3)` and `(5, 3)`.
    #[must_use]
    pub const fn mid_value(&self) -> i32 {
        self.a.coord(self.mid_axis)
    }

    /// Axis along which the segment extends.
    #[must_use]
    pub const fn free_axis(&self) -> Axis {
        self.mid_axis.other()
    }

    /// Inclusive `(min, max)` range covered on the free axis.
    #[must_use]
    pub fn free_span(&self) -> (i32, i32) {
        let axis = self.free_axis();
        let (first, second) = (self.a.coord(axis), self.b.coord(axis));
        (first.min(second), first.max(second))
    }

    /// Reports whether the point lies on the closed segment.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        if point.coord(self.mid_axis) != self.mid_value() {
            return false;
        }
        let (low, high) = self.free_span();
        let free = point.coord(self.free_axis());
        low <= free && free <= high
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.mid_axis == other.mid_axis
            && self.mid_value() == other.mid_value()
            && self.free_span() == other.free_span()
    }
}

impl Eq for Segment {}

/// Segment that moves a body to another map instead of blocking it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    segment: Segment,
    destination: MapId,
}

impl Door {
    /// Creates a door between two axis-aligned points leading to `destination`.
    pub fn new(a: Point, b: Point, destination: MapId) -> Result<Self, GeometryError> {
        Ok(Self {
            segment: Segment::new(a, b)?,
            destination,
        })
    }

    /// Underlying boundary line.
    #[must_use]
    pub const fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Map entered when the door is crossed.
    #[must_use]
    pub const fn destination(&self) -> MapId {
        self.destination
    }

    /// Tests whether moving from `previous` to `point` crosses the door.
    ///
    /// `previous` must lie strictly on one side of the door line and `point` on
    /// the other side or exactly on it. The free-axis coordinate where the
    /// trajectory meets the line must fall within the door's span.
    #[must_use]
    pub fn crossing_test(&self, point: Point, previous: Point) -> bool {
        let axis = self.segment.mid_axis();
        let mid = self.segment.mid_value();
        let before = previous.coord(axis);
        let after = point.coord(axis);
        let crossed = (before < mid && after >= mid) || (before > mid && after <= mid);
        if !crossed {
            return false;
        }

        let free = self.segment.free_axis();
        let start = i64::from(previous.coord(free));
        let end = i64::from(point.coord(free));
        let travelled = i64::from(mid) - i64::from(before);
        let total = i64::from(after) - i64::from(before);
        let at_line = start + (end - start) * travelled / total;

        let (low, high) = self.segment.free_span();
        i64::from(low) <= at_line && at_line <= i64::from(high)
    }

    /// Like [`Door::crossing_test`], but also accepts a point that slides
    /// along the door line onto the segment.
    #[must_use]
    pub fn is_reached(&self, previous: Point, point: Point) -> bool {
        self.crossing_test(point, previous)
            || (self.segment.contains(point) && !self.segment.contains(previous))
    }

    /// Point of `body` tested against the door, given the footprint the body
    /// occupied before moving.
    ///
    /// On the door's fixed axis this is the edge that faced the door line
    /// before the move, or the centre if the body already straddled it. On
    /// the free axis it is the centre of `body`.
    #[must_use]
    pub fn probe(&self, before: &Rect, body: &Rect) -> Point {
        let axis = self.segment.mid_axis();
        let mid = self.segment.mid_value();
        let (low, high) = before.span(axis);
        let depth = body.size().along(axis);
        let offset = if high <= mid {
            depth
        } else if low >= mid {
            0
        } else {
            depth / 2
        };
        let along = body.origin().coord(axis).saturating_add(offset);
        Point::on_axes(axis, along, body.center().coord(axis.other()))
    }

    /// Reports whether a body occupying `before` and moving by `displacement`
    /// goes through the door.
    #[must_use]
    pub fn traversed_by(&self, before: &Rect, displacement: Displacement) -> bool {
        if displacement.is_zero() {
            return false;
        }
        let after = before.translated(displacement);
        self.is_reached(self.probe(before, before), self.probe(before, &after))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_door() -> Door {
        Door::new(Point::new(100, 50), Point::new(100, 150), MapId::new(2)).expect("aligned")
    }

    #[test]
    fn segment_reports_fixed_axis_and_value() {
        let horizontal = Segment::new(Point::new(1, 3), Point::new(5, 3)).expect("aligned");
        assert_eq!(horizontal.mid_axis(), Axis::Y);
        assert_eq!(horizontal.mid_value(), 3);
        assert_eq!(horizontal.free_span(), (1, 5));

        let vertical = Segment::new(Point::new(7, 9), Point::new(7, -2)).expect("aligned");
        assert_eq!(vertical.mid_axis(), Axis::X);
        assert_eq!(vertical.mid_value(), 7);
        assert_eq!(vertical.free_span(), (-2, 9));
    }

    #[test]
    fn center_saturates_at_extreme_coordinates() {
        let far = Rect::new(Point::new(i32::MAX - 1, 10), Extent::new(10, 20));
        assert_eq!(far.center(), Point::new(i32::MAX, 20));
    }

    #[test]
    fn decoding_validates_segment_endpoints() {
        let diagonal = bincode::serialize(&Endpoints {
            a: Point::new(0, 0),
            b: Point::new(4, 4),
        })
        .expect("endpoints encode");
        assert!(bincode::deserialize::<Segment>(&diagonal).is_err());
        assert!(bincode::deserialize::<Door>(&diagonal).is_err());

        let door = vertical_door();
        let decoded: Door =
            bincode::deserialize(&bincode::serialize(&door).expect("door encodes"))
                .expect("door decodes");
        assert_eq!(decoded, door);
        assert_eq!(decoded.segment().mid_axis(), Axis::X);
    }

    #[test]
    fn diagonal_segment_is_rejected() {
        let a = Point::new(0, 0);
        let b = Point::new(4, 4);
        assert_eq!(
            Segment::new(a, b),
            Err(GeometryError::NotAxisAligned { a, b })
        );
    }

    #[test]
    fn segments_compare_by_geometry() {
        let forward = Segment::new(Point::new(0, 10), Point::new(20, 10)).expect("aligned");
        let backward = Segment::new(Point::new(20, 10), Point::new(0, 10)).expect("aligned");
        assert_eq!(forward, backward);
    }

    #[test]
    fn rect_edges_follow_winding_order() {
        let rect = Rect::new(Point::new(100, 100), Extent::new(50, 20));
        let [top, right, bottom, left] = rect.edges();
        assert_eq!((top.mid_axis(), top.mid_value()), (Axis::Y, 100));
        assert_eq!((right.mid_axis(), right.mid_value()), (Axis::X, 150));
        assert_eq!((bottom.mid_axis(), bottom.mid_value()), (Axis::Y, 120));
        assert_eq!((left.mid_axis(), left.mid_value()), (Axis::X, 100));
        assert_eq!(rect.corners()[2], Point::new(150, 120));
    }

    #[test]
    fn touching_rectangles_do_not_overlap() {
        let wall = Rect::new(Point::new(100, 100), Extent::new(50, 50));
        let flush = Rect::new(Point::new(90, 120), Extent::new(10, 10));
        let inside = Rect::new(Point::new(91, 120), Extent::new(10, 10));
        assert!(!flush.overlaps(&wall));
        assert!(inside.overlaps(&wall));
    }

    #[test]
    fn crossing_within_span_is_detected() {
        let door = vertical_door();
        assert!(door.crossing_test(Point::new(105, 100), Point::new(90, 100)));
        assert!(door.crossing_test(Point::new(100, 100), Point::new(90, 100)));
        assert!(door.crossing_test(Point::new(90, 100), Point::new(120, 100)));
    }

    #[test]
    fn crossing_outside_span_is_ignored() {
        let door = vertical_door();
        assert!(!door.crossing_test(Point::new(105, 200), Point::new(90, 200)));
    }

    #[test]
    fn leaving_the_door_line_is_not_a_crossing() {
        let door = vertical_door();
        assert!(!door.crossing_test(Point::new(80, 100), Point::new(100, 100)));
    }

    #[test]
    fn diagonal_trajectory_uses_interpolated_crossing() {
        let door = vertical_door();
        // Meets x = 100 at y = 150, the end of the span.
        assert!(door.crossing_test(Point::new(110, 160), Point::new(90, 140)));
        // Meets x = 100 at y = 160, past the span.
        assert!(!door.crossing_test(Point::new(110, 170), Point::new(90, 150)));
    }

    #[test]
    fn sliding_onto_the_door_counts_as_reaching_it() {
        let door = vertical_door();
        assert!(door.is_reached(Point::new(100, 40), Point::new(100, 60)));
        assert!(!door.is_reached(Point::new(100, 60), Point::new(100, 70)));
    }

    #[test]
    fn footprint_probe_uses_the_edge_facing_the_door() {
        let door = vertical_door();
        let body = Rect::new(Point::new(80, 90), Extent::new(10, 10));
        assert!(door.traversed_by(&body, Displacement::new(10, 0)));
        assert!(!door.traversed_by(&body, Displacement::new(9, 0)));
        assert!(!door.traversed_by(&body, Displacement::new(-10, 0)));
    }

    #[test]
    fn point_body_matches_raw_crossing_test() {
        let door = vertical_door();
        let body = Rect::new(Point::new(90, 100), Extent::new(0, 0));
        assert!(door.traversed_by(&body, Displacement::new(15, 0)));
        let outside = Rect::new(Point::new(90, 200), Extent::new(0, 0));
        assert!(!door.traversed_by(&outside, Displacement::new(15, 0)));
    }
}

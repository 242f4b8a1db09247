use crate::series::{SeriesKey, SeriesResult};
use crate::topology::AdvancementEdge;
use crate::{AllianceNumber, Side};
use log::trace;
use std::collections::{BTreeMap, HashMap};

/// Horizontal distance from each anchor to its curve control point, in
/// container units (pixels for SVG, columns for a terminal).
pub const DEFAULT_CONTROL_OFFSET: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// Axis-aligned rectangle in the shared layout coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn left_center(&self) -> Point {
        Point::new(self.x, self.y + self.height / 2.0)
    }

    pub fn right_center(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// Measured boxes for one rendered card. Any box may be missing before layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CardGeometry {
    pub card: Option<BoundingBox>,
    pub red_row: Option<BoundingBox>,
    pub blue_row: Option<BoundingBox>,
}

impl CardGeometry {
    pub fn row(&self, side: Side) -> Option<BoundingBox> {
        match side {
            Side::Red => self.red_row,
            Side::Blue => self.blue_row,
        }
    }
}

/// Cubic Bézier segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicCurve {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl CubicCurve {
    /// Horizontal S-curve: both control points sit `offset` units inward
    /// horizontally from their anchors.
    pub fn s_curve(start: Point, end: Point, offset: f64) -> Self {
        Self {
            start,
            control1: start.offset(offset, 0.0),
            control2: end.offset(-offset, 0.0),
            end,
        }
    }

    pub fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
        Point::new(
            a * self.start.x + b * self.control1.x + c * self.control2.x + d * self.end.x,
            a * self.start.y + b * self.control1.y + c * self.control2.y + d * self.end.y,
        )
    }

    /// `steps + 1` evenly spaced points from start to end inclusive.
    pub fn sample(&self, steps: usize) -> Vec<Point> {
        let steps = steps.max(1);
        (0..=steps).map(|i| self.point_at(i as f64 / steps as f64)).collect()
    }

    /// SVG path data (`M … C …`).
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        )
    }
}

/// One connector line to draw between two cards.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorPath {
    pub from: SeriesKey,
    pub to: SeriesKey,
    /// Relative to the container origin.
    pub curve: CubicCurve,
    pub winning_side: Side,
    pub alliance: AllianceNumber,
}

/// Turns advancement edges plus measured card geometry into connector curves.
///
/// Holds only configuration, so repeated calls with the same inputs always
/// produce the same output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathProjector {
    control_offset: f64,
}

impl Default for PathProjector {
    fn default() -> Self {
        Self { control_offset: DEFAULT_CONTROL_OFFSET }
    }
}

impl PathProjector {
    pub fn new(control_offset: f64) -> Self {
        Self { control_offset }
    }

    pub fn control_offset(&self) -> f64 {
        self.control_offset
    }

    /// One path per edge whose source series is decided, whose winner has a
    /// known alliance, and whose source and destination cards are laid out.
    /// Every other edge is dropped without error; output keeps edge order.
    pub fn project(
        &self,
        edges: &[AdvancementEdge],
        results: &BTreeMap<SeriesKey, SeriesResult>,
        geometry: &HashMap<SeriesKey, CardGeometry>,
        container: BoundingBox,
    ) -> Vec<ConnectorPath> {
        edges
            .iter()
            .filter_map(|e| self.project_edge(e, results, geometry, container))
            .collect()
    }

    fn project_edge(
        &self,
        e: &AdvancementEdge,
        results: &BTreeMap<SeriesKey, SeriesResult>,
        geometry: &HashMap<SeriesKey, CardGeometry>,
        container: BoundingBox,
    ) -> Option<ConnectorPath> {
        let source = results.get(&e.from)?;
        let winning_side = source.winner()?;
        let alliance = source.side(winning_side).alliance?;

        let Some(start) = geometry
            .get(&e.from)
            .and_then(|g| g.row(winning_side).or(g.card))
            .map(|b| b.right_center())
        else {
            trace!("edge {}->{}: source not laid out", e.from, e.to);
            return None;
        };

        let dest_geometry = geometry.get(&e.to)?;
        let dest_row = results
            .get(&e.to)
            .and_then(|r| r.side_of(alliance))
            .and_then(|side| dest_geometry.row(side));
        let Some(end) = dest_row.or(dest_geometry.card).map(|b| b.left_center()) else {
            trace!("edge {}->{}: destination not laid out", e.from, e.to);
            return None;
        };

        let origin = (-container.x, -container.y);
        Some(ConnectorPath {
            from: e.from,
            to: e.to,
            curve: CubicCurve::s_curve(
                start.offset(origin.0, origin.1),
                end.offset(origin.0, origin.1),
                self.control_offset,
            ),
            winning_side,
            alliance,
        })
    }
}

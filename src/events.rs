use std::cmp::Ordering;

use geo::Coordinate;

use crate::{node::NodeKey, site::Site};

/// A sweep event of Fortune's algorithm.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Event<'a> {
    point: SweepPoint,
    kind: EventKind<'a>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum EventKind<'a> {
    /// The sweep line reaches a site.
    Site(&'a Site),
    /// An arc shrinks to zero width.
    Circle(CircleEvent<'a>),
}

/// A scheduled vanishing of `arc`.
///
/// The event stays valid only while the node under `arc` is the same
/// node (same `serial`) and is still flanked by the same sites.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CircleEvent<'a> {
    pub arc: NodeKey,
    pub serial: u64,
    /// Sites of the left, vanishing, and right arcs.
    pub sites: [&'a Site; 3],
    pub center: Coordinate<f64>,
}

impl<'a> Event<'a> {
    pub fn site(site: &'a Site) -> Self {
        Event {
            point: SweepPoint::from(site.position()),
            kind: EventKind::Site(site),
        }
    }

    /// A circle event firing at sweep height `y`.
    pub fn circle(y: f64, circle: CircleEvent<'a>) -> Self {
        Event {
            point: SweepPoint::from(Coordinate {
                x: circle.center.x,
                y,
            }),
            kind: EventKind::Circle(circle),
        }
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.point.0.y
    }

    #[inline]
    pub fn kind(&self) -> EventKind<'a> {
        self.kind
    }

    fn ty(&self) -> EventType {
        match self.kind {
            EventKind::Site(_) => EventType::Site,
            EventKind::Circle(_) => EventType::Circle,
        }
    }
}

/// Equality check for usage in ordered sets. Note that it ignores the
/// site or arc of the event.
impl<'a> PartialEq for Event<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// Assert total equality
impl<'a> Eq for Event<'a> {}

impl<'a> PartialOrd for Event<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordering for use with a max-heap (`BinaryHeap`): the event due
/// first in the sweep is the greatest. Sweep height decides first, then
/// the event type, then `x`.
impl<'a> Ord for Event<'a> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.point
            .cmp_height(&other.point)
            .then_with(|| self.ty().cmp(&other.ty()))
            .then_with(|| self.point.cmp(&other.point))
            .reverse()
    }
}

/// Event type to associate with event.
///
/// The ordering of the variants is important for the algorithm: at
/// equal height a site is inserted before any arc vanishes, so a site
/// landing on a vanishing arc sees the arc still in place.
#[derive(Debug, PartialOrd, Ord, PartialEq, Eq, Clone, Copy)]
enum EventType {
    Site,
    Circle,
}

/// Wraps a [`Coordinate`] to support ordering in sweep order.
///
/// The sweep runs top to bottom, so the ordering is by decreasing `y`
/// and then by increasing `x`. Implements `PartialOrd`, `Ord` and `Eq`
/// even though `Coordinate` doesn't implement these.
///
/// We must ensure that any sweep point only contains values that can be
/// consistently ordered.
#[derive(Debug, PartialEq, Clone, Copy)]
pub(crate) struct SweepPoint(Coordinate<f64>);

impl SweepPoint {
    /// Compare only the heights, in sweep order.
    fn cmp_height(&self, other: &Self) -> Ordering {
        other.0.y.partial_cmp(&self.0.y).unwrap()
    }
}

/// Implement sweep ordering by decreasing `y` and then increasing `x`.
impl PartialOrd for SweepPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match other.0.y.partial_cmp(&self.0.y) {
            Some(Ordering::Equal) => self.0.x.partial_cmp(&other.0.x),
            o => o,
        }
    }
}

/// Derive `Ord` from `PartialOrd` and expect to not fail.
impl Ord for SweepPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap()
    }
}

/// We derive `Eq` manually as `f64` is not `Eq`.
impl Eq for SweepPoint {}

/// Create from `Coordinate` while checking the components are finite.
impl From<Coordinate<f64>> for SweepPoint {
    fn from(pt: Coordinate<f64>) -> Self {
        assert!(
            pt.x.is_finite(),
            "sweep point requires a finite x-coordinate"
        );
        assert!(
            pt.y.is_finite(),
            "sweep point requires a finite y-coordinate"
        );
        SweepPoint(pt)
    }
}

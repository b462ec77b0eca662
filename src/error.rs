use thiserror::Error;

use crate::NodeKey;

/// Errors reported by the beach line and the sweep driver.
///
/// Every variant is a caller precondition violation: a bug in whatever
/// drives the sweep or renders it, never a property of the input
/// geometry. Degenerate but valid geometry (level sites, a site on the
/// sweep line, a site under a breakpoint) is handled without error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("sweep line at y = {sweep_y} lies above a site at y = {site_y}")]
    SweepAboveSite { sweep_y: f64, site_y: f64 },

    #[error("parabola of site at y = {site_y} degenerates on the sweep line")]
    DegenerateParabola { site_y: f64 },

    #[error("node {0:?} is not an arc")]
    NotAnArc(NodeKey),

    #[error("node {0:?} is not a breakpoint")]
    NotABreakpoint(NodeKey),

    #[error("node {0:?} is not in the beach line")]
    UnknownNode(NodeKey),

    #[error("arc {0:?} is an end of the beach line and cannot vanish")]
    BoundaryArc(NodeKey),

    #[error("arc {0:?} is flanked on both sides by the same site")]
    SameSiteFlanks(NodeKey),

    #[error("malformed beach line: {0}")]
    Malformed(String),

    #[error("site ({x}, {y}) has a non-finite coordinate")]
    NonFiniteSite { x: f64, y: f64 },

    #[error("sweep cannot move up from y = {current} to y = {requested}")]
    SweepReversed { current: f64, requested: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;

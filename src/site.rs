use std::fmt;

use geo::Coordinate;

use crate::error::{Error, Result};

/// Tolerance used when comparing coordinates for equality.
pub const EPSILON: f64 = 1e-3;

/// A Voronoi site.
///
/// Sites are owned by the caller and borrowed by the beach line; an arc
/// refers to its site for the arc's whole lifetime. Equality is by
/// identity, not by value: two sites with coincident coordinates are
/// still distinct sites, each growing its own cell.
pub struct Site {
    position: Coordinate<f64>,
}

impl Site {
    /// Create a site at `(x, y)`.
    ///
    /// Panics if either coordinate is not finite. Use
    /// [`try_new`](Self::try_new) to validate untrusted input.
    pub fn new(x: f64, y: f64) -> Self {
        Site::from(Coordinate { x, y })
    }

    pub fn try_new(x: f64, y: f64) -> Result<Self> {
        if x.is_finite() && y.is_finite() {
            Ok(Site {
                position: Coordinate { x, y },
            })
        } else {
            Err(Error::NonFiniteSite { x, y })
        }
    }

    #[inline]
    pub fn position(&self) -> Coordinate<f64> {
        self.position
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.position.y
    }
}

/// Create from `Coordinate` while checking the components are finite.
impl From<Coordinate<f64>> for Site {
    fn from(position: Coordinate<f64>) -> Self {
        assert!(
            position.x.is_finite(),
            "site requires a finite x-coordinate"
        );
        assert!(
            position.y.is_finite(),
            "site requires a finite y-coordinate"
        );
        Site { position }
    }
}

impl From<(f64, f64)> for Site {
    fn from((x, y): (f64, f64)) -> Self {
        Site::new(x, y)
    }
}

/// Identity equality.
impl PartialEq for Site {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Site {}

impl fmt::Debug for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Site")
            .field(&self.position.x)
            .field(&self.position.y)
            .finish()
    }
}

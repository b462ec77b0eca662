//! Stateless geometric predicates of the sweep.
//!
//! The sweep line moves downward, so every site a predicate is asked
//! about lies at or above `sweep_y`. The parabola of a site is the
//! locus of points equidistant from the site (focus) and the sweep line
//! (directrix).
use std::ops::Sub;

use geo::{
    kernels::{HasKernel, Kernel, Orientation},
    Coordinate,
};

use crate::{
    error::{Error, Result},
    site::{Site, EPSILON},
};

/// Coefficients of `y = a·x² + b·x + c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parabola {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Parabola {
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        (self.a * x + self.b) * x + self.c
    }

    /// Sample `count` evenly spaced points of the parabola over
    /// `[from, to]`, both ends included.
    ///
    /// Fewer than two samples yield just the end points that fit.
    pub fn sample(&self, from: f64, to: f64, count: usize) -> Vec<Coordinate<f64>> {
        let point = |x: f64| Coordinate { x, y: self.eval(x) };
        match count {
            0 => vec![],
            1 => vec![point(from)],
            _ => {
                let step = (to - from) / (count - 1) as f64;
                (0..count)
                    .map(|i| {
                        // Pin the last sample to `to` to avoid drift.
                        let x = if i + 1 == count { to } else { from + step * i as f64 };
                        point(x)
                    })
                    .collect()
            }
        }
    }

    /// Real roots of `a·x² + b·x + c = 0` in ascending order, for
    /// `a != 0`.
    ///
    /// A slightly negative discriminant is treated as zero: callers only
    /// ask for roots that exist, so a negative value is rounding noise.
    fn roots(&self) -> (f64, f64) {
        debug_assert!(self.a != 0., "roots of a degenerate quadratic");
        let disc = (self.b * self.b - 4. * self.a * self.c).max(0.);
        let sq = disc.sqrt();
        // Avoid cancellation between `-b` and `sqrt(disc)`.
        let q = -0.5 * (self.b + if self.b >= 0. { sq } else { -sq });
        if q == 0. {
            let x = -self.b / (2. * self.a);
            return (x, x);
        }
        let (r1, r2) = (q / self.a, self.c / q);
        if r1 <= r2 {
            (r1, r2)
        } else {
            (r2, r1)
        }
    }
}

impl Sub for Parabola {
    type Output = Parabola;

    fn sub(self, rhs: Self) -> Parabola {
        Parabola {
            a: self.a - rhs.a,
            b: self.b - rhs.b,
            c: self.c - rhs.c,
        }
    }
}

/// Require the sweep line to lie at or below `site`.
///
/// A non-finite sweep height is never at or below a site.
#[inline]
fn check_sweep_below(site: &Site, sweep_y: f64) -> Result<()> {
    if sweep_y <= site.y() {
        Ok(())
    } else {
        Err(Error::SweepAboveSite {
            sweep_y,
            site_y: site.y(),
        })
    }
}

/// Coefficients of the parabola with focus `site` and directrix
/// `y = sweep_y`.
///
/// Fails if the sweep line is above the site, or passes exactly
/// through it (the parabola degenerates to a vertical ray).
pub fn parabola_coefficients(site: &Site, sweep_y: f64) -> Result<Parabola> {
    check_sweep_below(site, sweep_y)?;
    let dy = site.y() - sweep_y;
    if dy == 0. {
        return Err(Error::DegenerateParabola { site_y: site.y() });
    }
    let (x, y) = (site.x(), site.y());
    Ok(Parabola {
        a: 1. / (2. * dy),
        b: -x / dy,
        c: (x * x + y * y - sweep_y * sweep_y) / (2. * dy),
    })
}

/// The x-coordinate of the breakpoint with the arc of `left` on its
/// left and the arc of `right` on its right, at sweep height `sweep_y`.
///
/// Two parabolas generally cross twice; the crossing returned is the
/// one with this left/right order of arcs. Degenerate configurations
/// are resolved with tolerance [`EPSILON`]:
///
/// 1. sites level with each other: the midpoint of their x values,
/// independent of the sweep height.
///
/// 2. the lower site on the sweep line: its parabola is a vertical ray
/// and the breakpoint is the lower site's x.
///
/// Fails if the sweep line is above either site.
pub fn breakpoint_x(left: &Site, right: &Site, sweep_y: f64) -> Result<f64> {
    let upper_is_left = left.y() >= right.y();
    let (upper, lower) = if upper_is_left {
        (left, right)
    } else {
        (right, left)
    };
    check_sweep_below(lower, sweep_y)?;

    if (upper.y() - lower.y()).abs() < EPSILON {
        return Ok((upper.x() + lower.x()) / 2.);
    }
    if (lower.y() - sweep_y).abs() < EPSILON {
        return Ok(lower.x());
    }

    // Both parabolas are proper here, and their leading coefficients
    // differ since the sites are not level.
    let diff = parabola_coefficients(upper, sweep_y)? - parabola_coefficients(lower, sweep_y)?;
    let (r1, r2) = diff.roots();

    // The lower parabola is the narrower one: it pokes through the
    // upper one between the two roots.
    Ok(if upper_is_left { r1 } else { r2 })
}

/// Whether the breakpoints on either side of the `middle` arc move
/// toward each other as the sweep line descends.
///
/// This holds exactly when the three sites make a clockwise turn;
/// collinear sites never converge.
pub fn converges(left: &Site, middle: &Site, right: &Site) -> bool {
    <f64 as HasKernel>::Ker::orient2d(left.position(), middle.position(), right.position())
        == Orientation::Clockwise
}

/// Center and radius of the circle through three points, or `None` if
/// they are collinear.
pub fn circumcircle(
    a: Coordinate<f64>,
    b: Coordinate<f64>,
    c: Coordinate<f64>,
) -> Option<(Coordinate<f64>, f64)> {
    // Work relative to `a` to keep the magnitudes small.
    let (bx, by) = (b.x - a.x, b.y - a.y);
    let (cx, cy) = (c.x - a.x, c.y - a.y);
    let d = 2. * (bx * cy - by * cx);
    if d == 0. || !d.is_finite() {
        return None;
    }
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (cy * b2 - by * c2) / d;
    let uy = (bx * c2 - cx * b2) / d;

    let center = Coordinate {
        x: a.x + ux,
        y: a.y + uy,
    };
    Some((center, ux.hypot(uy)))
}

/// The moment the `middle` arc between `left` and `right` vanishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Sweep height at which the arc shrinks to zero width.
    pub y: f64,
    /// Where the arc vanishes; a vertex of the Voronoi diagram.
    pub center: Coordinate<f64>,
}

/// Compute the circle event of the `middle` arc, if its breakpoints
/// converge.
pub fn circle_event(left: &Site, middle: &Site, right: &Site) -> Option<Circle> {
    if !converges(left, middle, right) {
        return None;
    }
    let (center, radius) = circumcircle(left.position(), middle.position(), right.position())?;
    Some(Circle {
        y: center.y - radius,
        center,
    })
}

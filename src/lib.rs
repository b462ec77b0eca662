//! The beach line of [Fortune's algorithm] for planar Voronoi
//! diagrams.
//!
//! 1. [Beach Line](#beach-line)
//! 1. [Sweep](#sweep)
//!
//! # Beach Line
//!
//! A horizontal sweep line moves downward across a set of sites. Every
//! point above it that is closer to some processed site than to the
//! sweep line is settled; the boundary of the settled region is the
//! beach line, a chain of parabolic arcs. Adjacent arcs meet at
//! breakpoints, which trace the edges of the Voronoi diagram as the
//! sweep advances.
//!
//! [`BeachLine`] keeps that chain as an ordered sequence of arc and
//! breakpoint nodes in an arena. It changes in just two ways:
//! [`insert_site`](BeachLine::insert_site) when the sweep reaches a
//! site, and [`delete_arc`](BeachLine::delete_arc) when an arc shrinks
//! to zero width. Positions are never stored: breakpoints and arcs are
//! evaluated at whatever sweep height a query names.
//!
//! ```rust
//! use beach_line::{BeachLine, Site};
//! let sites = [Site::new(0., 10.), Site::new(0., 6.)];
//! let mut line = BeachLine::new();
//! for site in &sites {
//!     line.insert_site(site).unwrap();
//! }
//! // The lower site's arc splits the upper one: [A, A|B, B, B|A, A]
//! assert_eq!(line.len(), 5);
//! assert_eq!(line.arcs().count(), 3);
//! ```
//!
//! # Sweep
//!
//! [`Sweep`] drives a beach line through the site and circle events of
//! a set of sites, and records the Voronoi vertices found on the way.
//! Events are handled one at a time with [`Sweep::next_event`] or up to
//! a sweep height with [`Sweep::advance_to`], so the beach line can be
//! inspected (or drawn) in between.
//!
//! ```rust
//! use beach_line::{Site, Sweep};
//! let sites = [Site::new(-5., 10.), Site::new(5., 10.), Site::new(0., 0.)];
//! let mut sweep = Sweep::new(&sites);
//! let vertices = sweep.run().unwrap();
//! assert_eq!(vertices.len(), 1);
//! assert_eq!(vertices[0].center.y, 6.25);
//! ```
//!
//! [Fortune's algorithm]: //en.wikipedia.org/wiki/Fortune%27s_algorithm
mod error;
pub use error::{Error, Result};

mod site;
pub use site::{Site, EPSILON};

pub mod predicates;
pub use predicates::Parabola;

mod node;
pub use node::{BeachNode, NodeKey, NodeKind};

mod beach_line;
pub use beach_line::{ArcSpan, BeachLine, Insertion, InsertionKind, Iter, Retirement};

mod events;

mod sweep;
pub use sweep::{Sweep, SweepEvent, VoronoiVertex};

#[cfg(test)]
#[path = "../benches/utils/random.rs"]
pub mod random;

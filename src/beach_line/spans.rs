use geo::Coordinate;

use super::BeachLine;
use crate::{
    error::{Error, Result},
    node::NodeKey,
    predicates::Parabola,
    site::Site,
};

/// The visible stretch of one arc at a given sweep height.
#[derive(Debug, Clone, Copy)]
pub struct ArcSpan<'a> {
    pub arc: NodeKey,
    pub site: &'a Site,
    /// x of the left breakpoint; `None` for the leftmost arc.
    pub left: Option<f64>,
    /// x of the right breakpoint; `None` for the rightmost arc.
    pub right: Option<f64>,
    /// `None` while the sweep line passes through the site.
    pub parabola: Option<Parabola>,
}

impl<'a> ArcSpan<'a> {
    /// Sample the arc as a polyline, clipping unbounded ends to
    /// `[min_x, max_x]`.
    ///
    /// An arc without a proper parabola yields no points.
    pub fn sample(&self, min_x: f64, max_x: f64, count: usize) -> Vec<Coordinate<f64>> {
        let parabola = match self.parabola {
            Some(p) => p,
            None => return vec![],
        };
        let from = self.left.unwrap_or(min_x).max(min_x);
        let to = self.right.unwrap_or(max_x).min(max_x);
        if from > to {
            return vec![];
        }
        parabola.sample(from, to, count)
    }
}

impl<'a> BeachLine<'a> {
    /// Describe every arc at sweep height `sweep_y`, from left to right.
    pub fn spans(&self, sweep_y: f64) -> Result<Vec<ArcSpan<'a>>> {
        let mut spans = Vec::with_capacity((self.len() + 1) / 2);
        for node in self.arcs() {
            let site = self.arc_site(node.key());
            let bound = |bp: Option<NodeKey>| {
                bp.map(|bp| self.at(bp).x_position(sweep_y)).transpose()
            };
            let parabola = match node.parabola(sweep_y) {
                Ok(p) => Some(p),
                Err(Error::DegenerateParabola { .. }) => None,
                Err(e) => return Err(e),
            };
            spans.push(ArcSpan {
                arc: node.key(),
                site,
                left: bound(node.left)?,
                right: bound(node.right)?,
                parabola,
            });
        }
        Ok(spans)
    }
}

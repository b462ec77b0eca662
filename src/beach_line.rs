use geo::Coordinate;
use log::{debug, trace};
use slab::Slab;

use crate::{
    error::{Error, Result},
    node::{BeachNode, NodeKey, NodeKind},
    predicates::Parabola,
    site::{Site, EPSILON},
};

mod insert;
pub use insert::{Insertion, InsertionKind, Retirement};

mod spans;
pub use spans::ArcSpan;

/// The beach line of a Fortune sweep.
///
/// An ordered sequence of alternating arcs and breakpoints, stored in a
/// slab arena and linked through neighbor keys. The sequence starts and
/// ends with an arc (or is empty). Sites are borrowed from the caller
/// and never copied.
///
/// The only mutations are [`insert_site`](Self::insert_site) and
/// [`delete_arc`](Self::delete_arc). The sweep height is not stored:
/// every query that depends on it takes it as an argument.
#[derive(Debug, Default)]
pub struct BeachLine<'a> {
    nodes: Slab<BeachNode<'a>>,
    leftmost: Option<NodeKey>,
    next_serial: u64,
}

impl<'a> BeachLine<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty beach line with room for the nodes of `sites`
    /// sites without circle events.
    pub fn with_capacity(sites: usize) -> Self {
        BeachLine {
            nodes: Slab::with_capacity(4 * sites),
            leftmost: None,
            next_serial: 0,
        }
    }

    /// Number of nodes (arcs and breakpoints).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The first node in sequence order; always an arc.
    #[inline]
    pub fn leftmost(&self) -> Option<NodeKey> {
        self.leftmost
    }

    #[inline]
    pub fn get(&self, key: NodeKey) -> Option<&BeachNode<'a>> {
        self.nodes.get(key.0)
    }

    /// Like [`get`](Self::get), but an unknown key is an error.
    pub fn node(&self, key: NodeKey) -> Result<&BeachNode<'a>> {
        self.get(key).ok_or(Error::UnknownNode(key))
    }

    #[inline]
    pub fn right_neighbor_of(&self, key: NodeKey) -> Option<NodeKey> {
        self.get(key).and_then(|n| n.right)
    }

    #[inline]
    pub fn left_neighbor_of(&self, key: NodeKey) -> Option<NodeKey> {
        self.get(key).and_then(|n| n.left)
    }

    /// The x-coordinate of breakpoint `key` at sweep height `sweep_y`.
    pub fn x_position(&self, key: NodeKey, sweep_y: f64) -> Result<f64> {
        self.node(key)?.x_position(sweep_y)
    }

    /// The parabola of arc `key` at sweep height `sweep_y`.
    pub fn parabola(&self, key: NodeKey, sweep_y: f64) -> Result<Parabola> {
        self.node(key)?.parabola(sweep_y)
    }

    /// Iterate over all nodes from left to right.
    pub fn iter(&self) -> Iter<'_, 'a> {
        Iter {
            line: self,
            next: self.leftmost,
        }
    }

    /// Iterate over the arcs from left to right.
    pub fn arcs(&self) -> impl Iterator<Item = &BeachNode<'a>> + '_ {
        self.iter().filter(|n| n.is_arc())
    }

    /// The arcs adjacent to `arc` on either side, if any.
    pub fn neighbor_arcs(&self, arc: NodeKey) -> (Option<NodeKey>, Option<NodeKey>) {
        let step = |bp: Option<NodeKey>, left: bool| {
            bp.and_then(|bp| self.get(bp))
                .and_then(|bp| if left { bp.left } else { bp.right })
        };
        match self.get(arc) {
            Some(node) => (step(node.left, true), step(node.right, false)),
            None => (None, None),
        }
    }

    /// Find the arc directly above `position`.
    ///
    /// Returns the arc whose interval, bounded by its breakpoints at
    /// sweep height `position.y`, contains `position.x`. Intervals are
    /// closed on the left: a position exactly on a breakpoint belongs to
    /// the arc on its right. Returns `None` if the beach line is empty.
    pub fn locate(&self, position: Coordinate<f64>) -> Result<Option<NodeKey>> {
        let mut arc = match self.leftmost {
            Some(arc) => arc,
            None => return Ok(None),
        };
        loop {
            let bp = match self.at(arc).right {
                Some(bp) => bp,
                None => break,
            };
            let x = self.at(bp).x_position(position.y)?;
            trace!("locate: breakpoint {bp:?} at x = {x}");
            if position.x < x {
                break;
            }
            arc = self
                .at(bp)
                .right
                .ok_or_else(|| malformed(format!("breakpoint {bp:?} has no right arc")))?;
        }
        Ok(Some(arc))
    }

    /// Remove an arc that has shrunk to zero width (a circle event).
    ///
    /// The arc and its two flanking breakpoints are replaced by a single
    /// breakpoint between the arcs that were its neighbors. Returns the
    /// key of the new breakpoint.
    ///
    /// Fails if `arc` is not an arc of this beach line, lies at either
    /// end of it, or is flanked on both sides by the same site (such an
    /// arc never vanishes).
    pub fn delete_arc(&mut self, arc: NodeKey) -> Result<NodeKey> {
        let node = self.node(arc)?;
        let site = node.site().ok_or(Error::NotAnArc(arc))?;
        let (left_bp, right_bp) = match (node.left, node.right) {
            (Some(l), Some(r)) => (l, r),
            _ => return Err(Error::BoundaryArc(arc)),
        };
        let (left_arc, right_arc) = match self.neighbor_arcs(arc) {
            (Some(l), Some(r)) => (l, r),
            _ => return Err(malformed(format!("breakpoints of {arc:?} lack outer arcs"))),
        };
        if self.arc_site(left_arc) == self.arc_site(right_arc) {
            return Err(Error::SameSiteFlanks(arc));
        }

        self.nodes.remove(left_bp.0);
        self.nodes.remove(arc.0);
        self.nodes.remove(right_bp.0);

        let bp = self.create_breakpoint(left_arc, right_arc);
        self.link(Some(left_arc), Some(bp));
        self.link(Some(bp), Some(right_arc));
        debug!("delete_arc: {arc:?} of {site:?}, merged into {bp:?}");
        Ok(bp)
    }

    /// Check the structural invariants and the order of breakpoints at
    /// sweep height `sweep_y`.
    ///
    /// Breakpoint x-positions must be non-decreasing from left to right,
    /// up to [`EPSILON`].
    pub fn validate(&self, sweep_y: f64) -> Result<()> {
        let mut prev: Option<&BeachNode<'a>> = None;
        let mut last_x = f64::NEG_INFINITY;
        let mut count = 0;

        for node in self.iter() {
            count += 1;
            if count > self.nodes.len() {
                return Err(malformed("neighbor links form a cycle".into()));
            }
            let key = node.key();
            if node.left != prev.map(|p| p.key()) {
                return Err(malformed(format!("{key:?} has an asymmetric left link")));
            }
            let expect_arc = count % 2 == 1;
            if node.is_arc() != expect_arc {
                return Err(malformed(format!("{key:?} breaks arc/breakpoint alternation")));
            }

            if let NodeKind::Breakpoint {
                left_arc,
                right_arc,
                left_site,
                right_site,
            } = node.kind
            {
                if Some(left_arc) != node.left || Some(right_arc) != node.right {
                    return Err(malformed(format!(
                        "{:?} is defined by {:?} and {:?} but sits between {:?} and {:?}",
                        key, left_arc, right_arc, node.left, node.right
                    )));
                }
                if self.get(left_arc).and_then(|n| n.site()) != Some(left_site)
                    || self.get(right_arc).and_then(|n| n.site()) != Some(right_site)
                {
                    return Err(malformed(format!("{key:?} caches stale sites")));
                }
                let x = node.x_position(sweep_y)?;
                if x < last_x - EPSILON {
                    return Err(malformed(format!(
                        "{key:?} at x = {x} lies left of its predecessor at x = {last_x}"
                    )));
                }
                last_x = last_x.max(x);
            }
            prev = Some(node);
        }

        if let Some(last) = prev {
            if !last.is_arc() {
                return Err(malformed(format!("{:?} ends the beach line", last.key())));
            }
        }
        if count != self.nodes.len() {
            return Err(malformed(format!(
                "{} of {} nodes are unreachable",
                self.nodes.len() - count,
                self.nodes.len()
            )));
        }
        Ok(())
    }

    /// Index into storage; `key` must be live.
    #[inline]
    fn at(&self, key: NodeKey) -> &BeachNode<'a> {
        &self.nodes[key.0]
    }

    /// The site of an arc; `key` must be a live arc.
    fn arc_site(&self, key: NodeKey) -> &'a Site {
        match self.at(key).kind {
            NodeKind::Arc { site } => site,
            NodeKind::Breakpoint { .. } => unreachable!("{:?} is not an arc", key),
        }
    }

    /// Store a new node and return its key.
    fn create(&mut self, kind: NodeKind<'a>) -> NodeKey {
        let serial = self.next_serial;
        self.next_serial += 1;
        let entry = self.nodes.vacant_entry();
        let key = NodeKey(entry.key());
        entry.insert(BeachNode::new(key, serial, kind));
        key
    }

    fn create_breakpoint(&mut self, left_arc: NodeKey, right_arc: NodeKey) -> NodeKey {
        let kind = self.breakpoint_kind(left_arc, right_arc);
        self.create(kind)
    }

    fn breakpoint_kind(&self, left_arc: NodeKey, right_arc: NodeKey) -> NodeKind<'a> {
        NodeKind::Breakpoint {
            left_arc,
            right_arc,
            left_site: self.arc_site(left_arc),
            right_site: self.arc_site(right_arc),
        }
    }

    /// Make `bp` the breakpoint between `left_arc` and `right_arc`.
    fn redefine_breakpoint(&mut self, bp: NodeKey, left_arc: NodeKey, right_arc: NodeKey) {
        let kind = self.breakpoint_kind(left_arc, right_arc);
        self.nodes[bp.0].kind = kind;
    }

    /// Make `left` and `right` adjacent. A `None` on the left makes
    /// `right` the leftmost node.
    fn link(&mut self, left: Option<NodeKey>, right: Option<NodeKey>) {
        match left {
            Some(l) => self.nodes[l.0].right = right,
            None => self.leftmost = right,
        }
        if let Some(r) = right {
            self.nodes[r.0].left = left;
        }
    }
}

/// Iterator over the nodes of a [`BeachLine`] in sequence order.
pub struct Iter<'l, 'a> {
    line: &'l BeachLine<'a>,
    next: Option<NodeKey>,
}

impl<'l, 'a> Iterator for Iter<'l, 'a> {
    type Item = &'l BeachNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.line.get(self.next?)?;
        self.next = node.right;
        Some(node)
    }
}

fn malformed(msg: String) -> Error {
    Error::Malformed(msg)
}

use std::fmt;

use crate::{
    error::{Error, Result},
    predicates::{breakpoint_x, parabola_coefficients, Parabola},
    site::Site,
};

/// Stable index of a node within a [`BeachLine`](crate::BeachLine).
///
/// A key stays valid until the node is removed from the beach line;
/// afterwards it may be reused for a new node.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeKey(pub(crate) usize);

impl NodeKey {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a beach-line node is.
#[derive(Debug, Clone, Copy)]
pub enum NodeKind<'a> {
    /// A segment of the parabola of `site`.
    Arc { site: &'a Site },
    /// The crossing of two adjacent arcs.
    ///
    /// The sites of the defining arcs are kept alongside their keys so
    /// the breakpoint can be evaluated on its own.
    Breakpoint {
        left_arc: NodeKey,
        right_arc: NodeKey,
        left_site: &'a Site,
        right_site: &'a Site,
    },
}

/// A node of the beach line: an arc or a breakpoint, linked to its
/// neighbors.
#[derive(Debug, Clone)]
pub struct BeachNode<'a> {
    key: NodeKey,
    serial: u64,
    pub(crate) kind: NodeKind<'a>,
    pub(crate) left: Option<NodeKey>,
    pub(crate) right: Option<NodeKey>,
}

impl<'a> BeachNode<'a> {
    pub(crate) fn new(key: NodeKey, serial: u64, kind: NodeKind<'a>) -> Self {
        BeachNode {
            key,
            serial,
            kind,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub fn key(&self) -> NodeKey {
        self.key
    }

    /// Creation order of this node within its beach line.
    ///
    /// Unlike keys, serials are never reused, so a serial tells a node
    /// apart from a later one stored under the same key.
    #[inline]
    pub fn serial(&self) -> u64 {
        self.serial
    }

    #[inline]
    pub fn kind(&self) -> &NodeKind<'a> {
        &self.kind
    }

    #[inline]
    pub fn is_arc(&self) -> bool {
        matches!(self.kind, NodeKind::Arc { .. })
    }

    #[inline]
    pub fn is_breakpoint(&self) -> bool {
        !self.is_arc()
    }

    /// The site of an arc, or `None` for a breakpoint.
    #[inline]
    pub fn site(&self) -> Option<&'a Site> {
        match self.kind {
            NodeKind::Arc { site } => Some(site),
            NodeKind::Breakpoint { .. } => None,
        }
    }

    /// The `(left, right)` arcs defining a breakpoint, or `None` for an
    /// arc.
    #[inline]
    pub fn defining_arcs(&self) -> Option<(NodeKey, NodeKey)> {
        match self.kind {
            NodeKind::Arc { .. } => None,
            NodeKind::Breakpoint {
                left_arc,
                right_arc,
                ..
            } => Some((left_arc, right_arc)),
        }
    }

    #[inline]
    pub fn left_neighbor(&self) -> Option<NodeKey> {
        self.left
    }

    #[inline]
    pub fn right_neighbor(&self) -> Option<NodeKey> {
        self.right
    }

    /// The x-coordinate of this breakpoint at sweep height `sweep_y`.
    ///
    /// Fails on an arc, or if the sweep line is above either defining
    /// site.
    pub fn x_position(&self, sweep_y: f64) -> Result<f64> {
        match self.kind {
            NodeKind::Breakpoint {
                left_site,
                right_site,
                ..
            } => breakpoint_x(left_site, right_site, sweep_y),
            NodeKind::Arc { .. } => Err(Error::NotABreakpoint(self.key)),
        }
    }

    /// The parabola this arc traces at sweep height `sweep_y`.
    ///
    /// Fails on a breakpoint, or if the sweep line is at or above the
    /// arc's site.
    pub fn parabola(&self, sweep_y: f64) -> Result<Parabola> {
        match self.kind {
            NodeKind::Arc { site } => parabola_coefficients(site, sweep_y),
            NodeKind::Breakpoint { .. } => Err(Error::NotAnArc(self.key)),
        }
    }
}

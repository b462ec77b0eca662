use log::debug;

use super::{malformed, BeachLine};
use crate::{
    error::{Error, Result},
    node::{NodeKey, NodeKind},
    predicates::converges,
    site::{Site, EPSILON},
};

/// Which case of [`BeachLine::insert_site`] applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionKind {
    /// The beach line was empty; the new arc is its only node.
    First,
    /// The site was level with the arc above it and was placed beside
    /// it.
    Sibling,
    /// The arc above the site was split around the new arc.
    Split,
}

/// An arc that vanished exactly where a new site landed, and was
/// removed before the site was inserted.
#[derive(Debug, Clone, Copy)]
pub struct Retirement<'a> {
    pub site: &'a Site,
    pub left_site: &'a Site,
    pub right_site: &'a Site,
    /// The breakpoint that replaced the arc.
    pub breakpoint: NodeKey,
}

/// Outcome of [`BeachLine::insert_site`].
#[derive(Debug, Clone, Copy)]
pub struct Insertion<'a> {
    /// The arc of the inserted site.
    pub arc: NodeKey,
    pub kind: InsertionKind,
    pub retired: Option<Retirement<'a>>,
}

impl<'a> BeachLine<'a> {
    /// Insert an arc for `site`, with the sweep line at `site.y()`.
    ///
    /// The new arc goes under the arc located above the site:
    ///
    /// 1. into an empty beach line as its sole node.
    ///
    /// 2. beside the arc above, if that arc's site is level with `site`
    /// (right of it if `site` lies further right, otherwise left). The
    /// beach line grows by two nodes.
    ///
    /// 3. otherwise in the middle of the arc above, which is split into
    /// two copies: `[A]` becomes `[A, A|B, B, B|A, A]`. The beach line
    /// grows by four nodes.
    ///
    /// If the site lands exactly where an arc is vanishing (both of its
    /// breakpoints meet above the site), that arc is deleted first and
    /// reported in [`Insertion::retired`].
    ///
    /// Sites must be inserted in order of non-increasing `y`; a site
    /// above an existing one fails with a precondition error.
    pub fn insert_site(&mut self, site: &'a Site) -> Result<Insertion<'a>> {
        let position = site.position();
        let mut above = match self.locate(position)? {
            Some(arc) => arc,
            None => {
                let arc = self.create(NodeKind::Arc { site });
                self.leftmost = Some(arc);
                debug!("insert_site: {site:?} starts the beach line as {arc:?}");
                return Ok(Insertion {
                    arc,
                    kind: InsertionKind::First,
                    retired: None,
                });
            }
        };

        let above_y = self.arc_site(above).y();
        if above_y + EPSILON <= site.y() {
            return Err(Error::SweepAboveSite {
                sweep_y: site.y(),
                site_y: above_y,
            });
        }

        let retired = match self.vanishing_arc_near(above, site)? {
            Some(arc) => {
                let (left_arc, right_arc) = self.neighbor_arcs(arc);
                let (left_arc, right_arc) = left_arc.zip(right_arc).ok_or_else(|| {
                    malformed(format!("vanishing arc {arc:?} lacks a neighbor"))
                })?;
                let retirement = Retirement {
                    site: self.arc_site(arc),
                    left_site: self.arc_site(left_arc),
                    right_site: self.arc_site(right_arc),
                    breakpoint: self.delete_arc(arc)?,
                };
                debug!("insert_site: {site:?} retired {arc:?} first");
                above = self
                    .locate(position)?
                    .ok_or_else(|| malformed("beach line emptied by retirement".into()))?;
                Some(retirement)
            }
            None => None,
        };

        let (arc, kind) = if (self.arc_site(above).y() - site.y()).abs() < EPSILON {
            (self.insert_beside(above, site), InsertionKind::Sibling)
        } else {
            (self.split_arc(above, site), InsertionKind::Split)
        };
        debug!("insert_site: {site:?} as {arc:?} ({kind:?} of {above:?})");
        Ok(Insertion { arc, kind, retired })
    }

    /// Find an arc at `above` or next to it that has shrunk to zero
    /// width right over `site`.
    fn vanishing_arc_near(&self, above: NodeKey, site: &Site) -> Result<Option<NodeKey>> {
        let (left, right) = self.neighbor_arcs(above);
        for &arc in [Some(above), left, right].iter().flatten() {
            if self.is_vanishing(arc, site)? {
                return Ok(Some(arc));
            }
        }
        Ok(None)
    }

    /// Whether both breakpoints of `arc` lie over `site` and are meeting
    /// there, with the sweep line at `site.y()`.
    fn is_vanishing(&self, arc: NodeKey, site: &Site) -> Result<bool> {
        let arc_site = self.arc_site(arc);
        // A fresh arc is a vertical ray, not a vanishing one.
        if (arc_site.y() - site.y()).abs() < EPSILON {
            return Ok(false);
        }
        let node = self.at(arc);
        let (left_bp, right_bp) = match (node.left, node.right) {
            (Some(l), Some(r)) => (l, r),
            _ => return Ok(false),
        };
        let (left_site, right_site) = match self.neighbor_arcs(arc) {
            (Some(l), Some(r)) => (self.arc_site(l), self.arc_site(r)),
            _ => return Ok(false),
        };
        if left_site == right_site || !converges(left_site, arc_site, right_site) {
            return Ok(false);
        }

        let near = |bp: NodeKey| -> Result<bool> {
            let x = self.at(bp).x_position(site.y())?;
            Ok((x - site.x()).abs() < EPSILON)
        };
        Ok(near(left_bp)? && near(right_bp)?)
    }

    /// Insert an arc for `site` next to the level arc `arc`.
    ///
    /// The breakpoint previously bounding `arc` on that side now bounds
    /// the new arc, and is redefined accordingly.
    fn insert_beside(&mut self, arc: NodeKey, site: &'a Site) -> NodeKey {
        let new_arc = self.create(NodeKind::Arc { site });
        if site.x() > self.arc_site(arc).x() {
            let outer = self.at(arc).right;
            let bp = self.create_breakpoint(arc, new_arc);
            self.link(Some(arc), Some(bp));
            self.link(Some(bp), Some(new_arc));
            self.link(Some(new_arc), outer);
            if let Some(outer) = outer {
                let right_arc = self.neighbor_arcs(new_arc).1;
                if let Some(right_arc) = right_arc {
                    self.redefine_breakpoint(outer, new_arc, right_arc);
                }
            }
        } else {
            let outer = self.at(arc).left;
            let bp = self.create_breakpoint(new_arc, arc);
            self.link(outer, Some(new_arc));
            self.link(Some(new_arc), Some(bp));
            self.link(Some(bp), Some(arc));
            if let Some(outer) = outer {
                let left_arc = self.neighbor_arcs(new_arc).0;
                if let Some(left_arc) = left_arc {
                    self.redefine_breakpoint(outer, left_arc, new_arc);
                }
            }
        }
        new_arc
    }

    /// Replace `arc` by two copies of itself around a new arc for
    /// `site`. Returns the new arc.
    fn split_arc(&mut self, arc: NodeKey, site: &'a Site) -> NodeKey {
        let old = self.nodes.remove(arc.0);
        let outer_site = match old.kind {
            NodeKind::Arc { site } => site,
            NodeKind::Breakpoint { .. } => unreachable!("split of breakpoint {:?}", arc),
        };

        let left_copy = self.create(NodeKind::Arc { site: outer_site });
        let middle = self.create(NodeKind::Arc { site });
        let right_copy = self.create(NodeKind::Arc { site: outer_site });
        let left_bp = self.create_breakpoint(left_copy, middle);
        let right_bp = self.create_breakpoint(middle, right_copy);

        self.link(old.left, Some(left_copy));
        self.link(Some(left_copy), Some(left_bp));
        self.link(Some(left_bp), Some(middle));
        self.link(Some(middle), Some(right_bp));
        self.link(Some(right_bp), Some(right_copy));
        self.link(Some(right_copy), old.right);

        // The outer breakpoints referred to the removed arc.
        if let Some(bp) = old.left {
            if let Some(left_arc) = self.at(bp).left {
                self.redefine_breakpoint(bp, left_arc, left_copy);
            }
        }
        if let Some(bp) = old.right {
            if let Some(right_arc) = self.at(bp).right {
                self.redefine_breakpoint(bp, right_copy, right_arc);
            }
        }
        middle
    }
}

use std::collections::BinaryHeap;

use geo::Coordinate;
use log::{debug, trace};
use smallvec::SmallVec;

use crate::{
    beach_line::{BeachLine, Insertion},
    error::{Error, Result},
    events::{CircleEvent, Event, EventKind},
    node::NodeKey,
    predicates::circle_event,
    site::{Site, EPSILON},
};

/// A vertex of the Voronoi diagram, found when an arc vanished.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoronoiVertex {
    /// Equidistant from the three sites whose cells meet here.
    pub center: Coordinate<f64>,
    /// Sweep height at which the vertex was found.
    pub y: f64,
}

/// What [`Sweep::next_event`] did.
#[derive(Debug, Clone, Copy)]
pub enum SweepEvent<'a> {
    /// A site was inserted into the beach line.
    Site {
        site: &'a Site,
        insertion: Insertion<'a>,
    },
    /// An arc vanished; its neighbors now meet at `breakpoint`.
    Circle {
        vertex: VoronoiVertex,
        breakpoint: NodeKey,
        /// Sites of the left, vanished, and right arcs.
        sites: [&'a Site; 3],
    },
}

/// Fortune's sweep over a set of sites.
///
/// Drives a [`BeachLine`] downward through the site and circle events of
/// the input, one event at a time. The beach line can be inspected
/// between any two events.
#[derive(Debug)]
pub struct Sweep<'a> {
    beach_line: BeachLine<'a>,
    events: BinaryHeap<Event<'a>>,
    sweep_y: Option<f64>,
    vertices: Vec<VoronoiVertex>,
}

impl<'a> Sweep<'a> {
    /// Queue a site event for every site.
    pub fn new<I: IntoIterator<Item = &'a Site>>(sites: I) -> Self {
        let iter = sites.into_iter();
        let size = {
            let (min_size, max_size) = iter.size_hint();
            max_size.unwrap_or(min_size)
        };
        let mut sweep = Sweep {
            beach_line: BeachLine::with_capacity(size),
            events: BinaryHeap::with_capacity(2 * size),
            sweep_y: None,
            vertices: vec![],
        };
        for site in iter {
            sweep.events.push(Event::site(site));
        }
        sweep
    }

    #[inline]
    pub fn beach_line(&self) -> &BeachLine<'a> {
        &self.beach_line
    }

    /// Current sweep height; `None` before the first event.
    #[inline]
    pub fn sweep_y(&self) -> Option<f64> {
        self.sweep_y
    }

    /// Voronoi vertices found so far, in sweep order.
    #[inline]
    pub fn vertices(&self) -> &[VoronoiVertex] {
        &self.vertices
    }

    /// Sweep height of the next pending event.
    ///
    /// The event may turn out to be stale and be skipped.
    pub fn peek_y(&self) -> Option<f64> {
        self.events.peek().map(|e| e.y())
    }

    /// Handle the next event in sweep order, skipping stale circle
    /// events. Returns `None` once all events are handled.
    pub fn next_event(&mut self) -> Option<Result<SweepEvent<'a>>> {
        self.drop_stale_events();
        let event = self.events.pop()?;
        Some(self.handle_event(event))
    }

    /// Handle every event at or above `y`, then move the sweep line to
    /// `y`. Returns the number of events handled.
    pub fn advance_to(&mut self, y: f64) -> Result<usize> {
        let current = self.sweep_y.unwrap_or(f64::INFINITY);
        if !(y <= current) {
            return Err(Error::SweepReversed {
                current,
                requested: y,
            });
        }

        let mut count = 0;
        loop {
            // A stale event above `y` must not let a live one below
            // through.
            self.drop_stale_events();
            if !self.peek_y().map_or(false, |next| next >= y) {
                break;
            }
            match self.next_event() {
                Some(handled) => {
                    handled?;
                    count += 1;
                }
                None => break,
            }
        }
        self.sweep_y = Some(y);
        Ok(count)
    }

    /// Handle all remaining events. Returns every vertex found.
    pub fn run(&mut self) -> Result<Vec<VoronoiVertex>> {
        while let Some(handled) = self.next_event() {
            handled?;
        }
        Ok(self.vertices.clone())
    }

    /// Discard stale circle events from the top of the queue.
    fn drop_stale_events(&mut self) {
        while let Some(event) = self.events.peek() {
            match event.kind() {
                EventKind::Circle(circle) if !self.is_live(&circle) => {
                    trace!("drop_stale_events: circle event of {:?}", circle.arc);
                    self.events.pop();
                }
                _ => break,
            }
        }
    }

    /// Handle a live event.
    fn handle_event(&mut self, event: Event<'a>) -> Result<SweepEvent<'a>> {
        self.sweep_y = Some(event.y());
        match event.kind() {
            EventKind::Site(site) => {
                trace!("handle_event: site {site:?}");
                self.handle_site(site)
            }
            EventKind::Circle(circle) => {
                trace!("handle_event: circle event of {:?}", circle.arc);
                self.handle_circle(event.y(), circle)
            }
        }
    }

    fn handle_site(&mut self, site: &'a Site) -> Result<SweepEvent<'a>> {
        let insertion = self.beach_line.insert_site(site)?;

        let mut arcs: SmallVec<[NodeKey; 5]> = SmallVec::new();
        arcs.push(insertion.arc);
        let (left, right) = self.beach_line.neighbor_arcs(insertion.arc);

        if let Some(retired) = insertion.retired {
            // The retired arc's neighbors may be one step further out.
            let vertex = circle_event(retired.left_site, retired.site, retired.right_site)
                .map(|circle| circle.center)
                .unwrap_or_else(|| site.position());
            self.record_vertex(vertex, site.y());
            arcs.extend(left.and_then(|l| self.beach_line.neighbor_arcs(l).0));
            arcs.extend(right.and_then(|r| self.beach_line.neighbor_arcs(r).1));
        }
        arcs.extend(left);
        arcs.extend(right);

        for arc in arcs {
            self.check_circle(arc);
        }
        Ok(SweepEvent::Site { site, insertion })
    }

    fn handle_circle(&mut self, y: f64, circle: CircleEvent<'a>) -> Result<SweepEvent<'a>> {
        let breakpoint = self.beach_line.delete_arc(circle.arc)?;
        let vertex = self.record_vertex(circle.center, y);

        let (left, right) = self
            .beach_line
            .node(breakpoint)?
            .defining_arcs()
            .ok_or(Error::NotABreakpoint(breakpoint))?;
        self.check_circle(left);
        self.check_circle(right);

        Ok(SweepEvent::Circle {
            vertex,
            breakpoint,
            sites: circle.sites,
        })
    }

    fn record_vertex(&mut self, center: Coordinate<f64>, y: f64) -> VoronoiVertex {
        let vertex = VoronoiVertex { center, y };
        debug!("vertex at ({}, {}), sweep at {y}", center.x, center.y);
        self.vertices.push(vertex);
        vertex
    }

    /// Whether a circle event still describes the beach line.
    fn is_live(&self, circle: &CircleEvent<'a>) -> bool {
        let line = &self.beach_line;
        let node = match line.get(circle.arc) {
            Some(node) if node.serial() == circle.serial => node,
            _ => return false,
        };
        let site_of =
            |arc: Option<NodeKey>| arc.and_then(|a| line.get(a)).and_then(|n| n.site());
        let (left, right) = line.neighbor_arcs(circle.arc);
        let [l, m, r] = circle.sites;
        node.site() == Some(m) && site_of(left) == Some(l) && site_of(right) == Some(r)
    }

    /// Schedule the vanishing of `arc`, if its breakpoints converge.
    fn check_circle(&mut self, arc: NodeKey) {
        let line = &self.beach_line;
        let node = match line.get(arc) {
            Some(node) => node,
            None => return,
        };
        let site_of = |arc: NodeKey| line.get(arc).and_then(|n| n.site());
        let sites = match (line.neighbor_arcs(arc), node.site()) {
            ((Some(l), Some(r)), Some(m)) => match (site_of(l), site_of(r)) {
                (Some(l), Some(r)) if l != r => [l, m, r],
                _ => return,
            },
            _ => return,
        };

        let circle = match circle_event(sites[0], sites[1], sites[2]) {
            Some(circle) => circle,
            None => return,
        };
        let mut y = circle.y;
        if let Some(sweep_y) = self.sweep_y {
            if y > sweep_y {
                if y - sweep_y >= EPSILON {
                    debug!("check_circle: {arc:?} vanishes above the sweep at y = {y}, skipped");
                    return;
                }
                y = sweep_y;
            }
        }

        debug!(
            "check_circle: {arc:?} vanishes at y = {y} around ({}, {})",
            circle.center.x, circle.center.y
        );
        self.events.push(Event::circle(
            y,
            CircleEvent {
                arc,
                serial: node.serial(),
                sites,
                center: circle.center,
            },
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        beach_line::{
            tests::{arc_sites, init_log, sites},
            InsertionKind,
        },
        random::uniform_sites,
    };
    use approx::assert_relative_eq;
    use geo::Rect;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_site_on_breakpoint_closes_arc() -> anyhow::Result<()> {
        init_log();
        let input = sites(&[(-5., 10.), (5., 10.), (0., 0.)]);
        let mut sweep = Sweep::new(&input);

        let vertices = sweep.run()?;
        assert_eq!(vertices.len(), 1);
        assert_relative_eq!(vertices[0].center.x, 0., epsilon = 1e-9);
        assert_relative_eq!(vertices[0].center.y, 6.25, epsilon = 1e-9);
        assert_relative_eq!(vertices[0].y, 0., epsilon = 1e-9);

        let line = sweep.beach_line();
        assert_eq!(line.len(), 5);
        assert_eq!(arc_sites(line), vec![(-5., 10.), (0., 0.), (5., 10.)]);
        line.validate(-10.)?;
        Ok(())
    }

    #[test]
    fn test_events_in_sweep_order() -> anyhow::Result<()> {
        init_log();
        let input = sites(&[(0., 0.), (5., 10.), (-5., 10.)]);
        let mut sweep = Sweep::new(&input);
        assert_eq!(sweep.sweep_y(), None);
        assert_eq!(sweep.peek_y(), Some(10.));

        let mut seen = vec![];
        while let Some(handled) = sweep.next_event() {
            seen.push(match handled? {
                SweepEvent::Site { site, insertion } => {
                    (site.x(), site.y(), Some(insertion.kind))
                }
                SweepEvent::Circle { vertex, sites, .. } => {
                    assert_eq!(sites[1], &input[1]);
                    (vertex.center.x, vertex.y, None)
                }
            });
        }
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], (-5., 10., Some(InsertionKind::First)));
        assert_eq!(seen[1], (5., 10., Some(InsertionKind::Sibling)));
        assert_eq!(seen[2], (0., 0., Some(InsertionKind::Split)));
        assert_eq!(seen[3].2, None);
        assert_eq!(sweep.peek_y(), None);
        Ok(())
    }

    #[test]
    fn test_site_under_vanishing_arc() -> anyhow::Result<()> {
        init_log();
        let vanish_y = -12. - 500f64.sqrt();
        let input = sites(&[(-4., 10.), (4., 10.), (10., 8.), (0., vanish_y)]);
        let mut sweep = Sweep::new(&input);

        // All four sites lie on one circle: every vertex found is its
        // center, however the tie is broken.
        let vertices = sweep.run()?;
        assert!(!vertices.is_empty());
        for vertex in &vertices {
            assert_relative_eq!(vertex.center.x, 0., epsilon = 1e-6);
            assert_relative_eq!(vertex.center.y, -12., epsilon = 1e-6);
        }

        let line = sweep.beach_line();
        assert!(line.arcs().any(|n| n.site() == Some(&input[3])));
        line.validate(vanish_y - 1.)?;
        Ok(())
    }

    #[test]
    fn test_stale_circle_event_is_skipped() -> anyhow::Result<()> {
        init_log();
        // (0, 2) splits the arc whose vanishing was scheduled for the
        // triple of the first three sites.
        let input = sites(&[(-4., 10.), (4., 10.), (10., 8.), (0., 2.)]);
        let mut sweep = Sweep::new(&input);
        for _ in 0..3 {
            sweep.next_event().unwrap()?;
        }
        assert_eq!(sweep.events.len(), 2);

        match sweep.next_event().unwrap()? {
            SweepEvent::Site { site, .. } => assert_eq!(site, &input[3]),
            other => panic!("unexpected {:?}", other),
        }
        sweep.run()?;
        assert!(sweep
            .vertices()
            .iter()
            .all(|v| (v.center.y + 12.).abs() > 1e-3));
        sweep.beach_line().validate(-1000.)?;
        Ok(())
    }

    #[test]
    fn test_advance_to() -> anyhow::Result<()> {
        init_log();
        let input = sites(&[(-5., 10.), (5., 10.), (0., 0.)]);
        let mut sweep = Sweep::new(&input);

        assert_eq!(sweep.advance_to(5.)?, 2);
        assert_eq!(sweep.sweep_y(), Some(5.));
        assert_eq!(sweep.beach_line().len(), 3);
        sweep.beach_line().validate(5.)?;

        assert_eq!(
            sweep.advance_to(6.),
            Err(Error::SweepReversed {
                current: 5.,
                requested: 6.
            })
        );
        assert!(sweep.advance_to(f64::NAN).is_err());

        // The site and then the arc it closes.
        assert_eq!(sweep.advance_to(0.)?, 2);
        assert_eq!(sweep.beach_line().len(), 5);
        assert_eq!(sweep.vertices().len(), 1);
        assert_eq!(sweep.advance_to(-100.)?, 0);
        Ok(())
    }

    #[test]
    fn test_advance_past_stale_event() -> anyhow::Result<()> {
        init_log();
        // (0, 2) makes the vanishing scheduled at y = -12 - sqrt(500)
        // stale; the next live event is the site at y = -100.
        let input = sites(&[(-4., 10.), (4., 10.), (10., 8.), (0., 2.), (100., -100.)]);
        let mut sweep = Sweep::new(&input);

        let mut target = 10.;
        while target >= -120. {
            sweep.advance_to(target)?;
            assert_eq!(sweep.sweep_y(), Some(target));
            for arc in sweep.beach_line().arcs() {
                let site = arc.site().unwrap();
                assert!(site.y() >= target, "{:?} below sweep at {}", site, target);
            }
            sweep.beach_line().validate(target)?;
            assert!(sweep.beach_line().spans(target).is_ok());
            target -= 1.;
        }
        assert!(sweep
            .beach_line()
            .arcs()
            .any(|n| n.site() == Some(&input[4])));
        Ok(())
    }

    #[test]
    fn test_random_sweeps() -> anyhow::Result<()> {
        init_log();
        let bounds = Rect::new([0., 0.], [1000., 1000.]);
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let input: Vec<Site> = uniform_sites(&mut rng, bounds, 60);
            let mut sweep = Sweep::new(&input);

            let mut last_y = f64::INFINITY;
            while let Some(handled) = sweep.next_event() {
                handled?;
                let sweep_y = sweep.sweep_y().unwrap();
                assert!(sweep_y <= last_y);
                last_y = sweep_y;
                sweep.beach_line().validate(sweep_y)?;
            }

            let n = input.len();
            let vertices = sweep.vertices();
            assert!(
                vertices.len() <= 2 * n - 5,
                "{} vertices for {} sites",
                vertices.len(),
                n
            );

            // Each split adds two arcs and each vanishing removes one.
            let line = sweep.beach_line();
            assert_eq!(line.arcs().count(), 2 * n - 1 - vertices.len());
            line.validate(last_y - 100.)?;

            // Every vertex is equidistant from the nearest sites.
            for vertex in vertices {
                let mut dists: Vec<_> = input
                    .iter()
                    .map(|s| (s.x() - vertex.center.x).hypot(s.y() - vertex.center.y))
                    .collect();
                dists.sort_by(|a, b| a.partial_cmp(b).unwrap());
                assert_relative_eq!(
                    dists[0],
                    dists[2],
                    epsilon = 1e-6,
                    max_relative = 1e-6
                );
                assert_relative_eq!(
                    vertex.y,
                    vertex.center.y - dists[0],
                    epsilon = 1e-6,
                    max_relative = 1e-6
                );
            }
        }
        Ok(())
    }
}

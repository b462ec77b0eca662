#![allow(dead_code)]

use beach_line::{BeachLine, Site, Sweep};

/// Run a full sweep; returns the number of vertices found.
pub fn count_vertices(sites: &[Site]) -> usize {
    Sweep::new(sites).run().unwrap().len()
}

/// Insert sites top to bottom without handling circle events; returns
/// the final beach line length.
pub fn insert_only(sites: &[Site]) -> usize {
    let mut sorted: Vec<_> = sites.iter().collect();
    sorted.sort_by(|a, b| b.y().partial_cmp(&a.y()).unwrap());

    let mut line = BeachLine::with_capacity(sites.len());
    for site in sorted {
        line.insert_site(site).unwrap();
    }
    line.len()
}

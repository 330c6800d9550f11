//! Directed cycle detection.
//!
//! Three-colour depth-first search driven by an explicit stack, so the scan
//! depth is bounded by heap rather than by the thread stack.

use std::collections::{BTreeMap, HashMap};

use gn_core::StationId;

use crate::network::{Edge, graph_stations};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not visited yet.
    White,
    /// On the current DFS path.
    Gray,
    /// Fully explored.
    Black,
}

/// True if following edges from any station can lead back to it.
///
/// Every station touching an edge is a root candidate, including
/// destination-only stations.
pub(crate) fn has_cycle(adjacency: &BTreeMap<StationId, Vec<Edge>>) -> bool {
    let stations = graph_stations(adjacency);
    let mut color: HashMap<StationId, Color> =
        stations.iter().map(|&s| (s, Color::White)).collect();

    for &root in &stations {
        if color.get(&root) != Some(&Color::White) {
            continue;
        }
        color.insert(root, Color::Gray);
        // (station, index of the next outgoing edge to examine)
        let mut stack: Vec<(StationId, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (station, next) = *frame;
            let successor = adjacency
                .get(&station)
                .and_then(|edges| edges.get(next))
                .map(|e| e.to);

            match successor {
                Some(to) => {
                    frame.1 += 1;
                    match color.get(&to).copied().unwrap_or(Color::White) {
                        Color::Gray => return true,
                        Color::White => {
                            color.insert(to, Color::Gray);
                            stack.push((to, 0));
                        }
                        Color::Black => {}
                    }
                }
                None => {
                    color.insert(station, Color::Black);
                    stack.pop();
                }
            }
        }
    }
    false
}

//! Property tests: random insertion sequences against brute-force oracles.

use std::collections::{BTreeMap, BTreeSet};

use gn_core::{PipeId, Real, StationId, Tolerances, nearly_equal};
use gn_graph::{GasNetwork, PipeSnapshot};
use proptest::prelude::*;

const STATIONS: u32 = 6;

/// Attempted connection: (from, to, capacity, length).
fn attempts() -> impl Strategy<Value = Vec<(u32, u32, u64, u32)>> {
    prop::collection::vec((1..=STATIONS, 1..=STATIONS, 0u64..50, 1u32..20), 0..25)
}

/// Replays every attempt with a fresh pipe; rejections are expected.
fn build(attempts: &[(u32, u32, u64, u32)]) -> GasNetwork {
    let mut net = GasNetwork::new();
    for (i, &(from, to, capacity, length)) in attempts.iter().enumerate() {
        let pipe = PipeId::new(i as u32 + 1);
        net.register_pipe(
            pipe,
            PipeSnapshot {
                capacity,
                weight: Real::from(length),
            },
        )
        .unwrap();
        let _ = net.add_connection(StationId::new(from), StationId::new(to), pipe);
    }
    net
}

/// Cost of every simple finite-weight path from `from` to `to`.
fn simple_paths(net: &GasNetwork, from: StationId, to: StationId) -> Vec<Real> {
    fn walk(
        net: &GasNetwork,
        at: StationId,
        to: StationId,
        seen: &mut BTreeSet<StationId>,
        cost: Real,
        out: &mut Vec<Real>,
    ) {
        if at == to {
            out.push(cost);
            return;
        }
        for edge in net.outgoing(at) {
            if edge.weight.is_finite() && seen.insert(edge.to) {
                walk(net, edge.to, to, seen, cost + edge.weight, out);
                seen.remove(&edge.to);
            }
        }
    }
    let mut out = Vec::new();
    let mut seen = BTreeSet::from([from]);
    walk(net, from, to, &mut seen, 0.0, &mut out);
    out
}

/// Smallest cut capacity over every source-side station subset.
fn min_cut(net: &GasNetwork, source: StationId, sink: StationId) -> u64 {
    let others: Vec<StationId> = net
        .stations()
        .into_iter()
        .filter(|&s| s != source && s != sink)
        .collect();
    let mut best = u64::MAX;
    for mask in 0u32..(1 << others.len()) {
        let mut side: BTreeSet<StationId> = BTreeSet::from([source]);
        for (bit, &s) in others.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                side.insert(s);
            }
        }
        let cut: u64 = net
            .edges()
            .filter(|e| side.contains(&e.from) && !side.contains(&e.to))
            .map(|e| e.capacity)
            .sum();
        best = best.min(cut);
    }
    best
}

proptest! {
    #[test]
    fn accepted_graph_is_acyclic(attempts in attempts()) {
        let net = build(&attempts);
        prop_assert!(!net.has_cycle());
    }

    #[test]
    fn rejected_insert_changes_nothing(attempts in attempts(), from in 1..=STATIONS, to in 1..=STATIONS) {
        let mut net = build(&attempts);
        // reuse an existing pipe half the time to exercise the in-use check
        let pipe = PipeId::new((from + to) % 3 + 1);
        let before = net.clone();
        if net.add_connection(StationId::new(from), StationId::new(to), pipe).is_err() {
            prop_assert_eq!(net, before);
        }
    }

    #[test]
    fn each_pipe_backs_at_most_one_edge(attempts in attempts()) {
        let net = build(&attempts);
        let mut uses: BTreeMap<PipeId, usize> = BTreeMap::new();
        for edge in net.edges() {
            *uses.entry(edge.pipe).or_default() += 1;
        }
        prop_assert!(uses.values().all(|&n| n == 1));
        prop_assert_eq!(uses.len(), net.connection_count());
    }

    #[test]
    fn topological_order_respects_edges(attempts in attempts()) {
        let net = build(&attempts);
        let order = net.topological_sort((1..=STATIONS).map(StationId::new)).unwrap();
        prop_assert_eq!(order.len(), STATIONS as usize);
        let position: BTreeMap<StationId, usize> =
            order.iter().enumerate().map(|(i, &s)| (s, i)).collect();
        for edge in net.edges() {
            prop_assert!(position[&edge.from] < position[&edge.to]);
        }
    }

    #[test]
    fn update_is_reflected_exactly(attempts in attempts(), capacity in 0u64..100, repaired in any::<bool>()) {
        let mut net = build(&attempts);
        let snapshot = PipeSnapshot {
            capacity,
            weight: if repaired { Real::INFINITY } else { 3.5 },
        };
        net.update_pipe_in_network(PipeId::new(1), snapshot).unwrap();
        for edge in net.edges().filter(|e| e.pipe == PipeId::new(1)) {
            prop_assert_eq!(edge.capacity, snapshot.capacity);
            prop_assert_eq!(edge.weight, snapshot.weight);
        }
    }

    #[test]
    fn shortest_path_is_optimal(attempts in attempts(), from in 1..=STATIONS, to in 1..=STATIONS) {
        let net = build(&attempts);
        let (source, sink) = (StationId::new(from), StationId::new(to));
        let stations = net.stations();
        prop_assume!(stations.contains(&source) && stations.contains(&sink));

        let best = simple_paths(&net, source, sink)
            .into_iter()
            .fold(Real::INFINITY, Real::min);
        match net.shortest_path(source, sink) {
            Ok(route) => {
                prop_assert!(nearly_equal(route.distance, best, Tolerances::default()));
                let walked: Real = route
                    .pipes
                    .iter()
                    .map(|&p| net.edge_for_pipe(p).map_or(Real::INFINITY, |e| e.weight))
                    .sum();
                prop_assert!(nearly_equal(walked, route.distance, Tolerances::default()));
            }
            Err(_) => prop_assert!(best.is_infinite()),
        }
    }

    #[test]
    fn max_flow_equals_min_cut(attempts in attempts(), from in 1..=STATIONS, to in 1..=STATIONS) {
        prop_assume!(from != to);
        let net = build(&attempts);
        let (source, sink) = (StationId::new(from), StationId::new(to));
        let stations = net.stations();
        prop_assume!(stations.contains(&source) && stations.contains(&sink));

        let flow = net.max_flow(source, sink).unwrap();
        prop_assert_eq!(flow.value, min_cut(&net, source, sink));
    }
}

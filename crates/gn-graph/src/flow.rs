//! Maximum flow (Edmonds–Karp) over a sparse residual graph.

use std::collections::{BTreeMap, HashMap, VecDeque};

use gn_core::{PipeId, StationId};
use tracing::{debug, warn};

use crate::error::{NetworkError, NetworkResult};
use crate::network::GasNetwork;

/// Result of a max-flow computation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaxFlow {
    pub value: u64,
    /// Flow carried by each pipe with a non-zero share.
    pub pipe_flows: BTreeMap<PipeId, u64>,
}

#[derive(Debug, Clone)]
struct Arc {
    to: usize,
    residual: u64,
    /// Index of the paired arc in the opposite direction.
    twin: usize,
}

/// Residual network with one forward arc per ordered station pair.
#[derive(Debug)]
struct Residual {
    arcs: Vec<Arc>,
    /// Outgoing arc indices per node.
    out: Vec<Vec<usize>>,
}

impl Residual {
    fn with_nodes(count: usize) -> Self {
        Self {
            arcs: Vec::new(),
            out: vec![Vec::new(); count],
        }
    }

    /// Add a forward arc and its zero-capacity twin; returns the forward index.
    fn add_arc(&mut self, from: usize, to: usize, capacity: u64) -> usize {
        let forward = self.arcs.len();
        let backward = forward + 1;
        self.arcs.push(Arc {
            to,
            residual: capacity,
            twin: backward,
        });
        self.arcs.push(Arc {
            to: from,
            residual: 0,
            twin: forward,
        });
        self.out[from].push(forward);
        self.out[to].push(backward);
        forward
    }

    /// Breadth-first search for a shortest augmenting path.
    ///
    /// Returns the arc that entered each node, or `None` once the sink is
    /// unreachable.
    fn augmenting_path(&self, source: usize, sink: usize) -> Option<Vec<Option<usize>>> {
        let mut via: Vec<Option<usize>> = vec![None; self.out.len()];
        let mut seen = vec![false; self.out.len()];
        let mut queue = VecDeque::from([source]);
        seen[source] = true;

        while let Some(node) = queue.pop_front() {
            for &arc_idx in &self.out[node] {
                let arc = &self.arcs[arc_idx];
                if arc.residual == 0 || seen[arc.to] {
                    continue;
                }
                seen[arc.to] = true;
                via[arc.to] = Some(arc_idx);
                if arc.to == sink {
                    return Some(via);
                }
                queue.push_back(arc.to);
            }
        }
        None
    }

    /// Arcs of the path ending at `sink`, walked backwards.
    fn path_arcs(&self, via: &[Option<usize>], source: usize, sink: usize) -> Vec<usize> {
        let mut arcs = Vec::new();
        let mut node = sink;
        while node != source {
            let Some(arc_idx) = via[node] else { break };
            arcs.push(arc_idx);
            node = self.arcs[self.arcs[arc_idx].twin].to;
        }
        arcs
    }
}

impl GasNetwork {
    /// Maximum flow from `source` to `sink` limited by edge capacities.
    ///
    /// Both endpoints must appear in the graph. `source == sink` carries no
    /// flow.
    pub fn max_flow(&self, source: StationId, sink: StationId) -> NetworkResult<MaxFlow> {
        let stations = self.stations();
        for endpoint in [source, sink] {
            if !stations.contains(&endpoint) {
                warn!(station = %endpoint, "max-flow endpoint not in network");
                return Err(NetworkError::EndpointNotFound { station: endpoint });
            }
        }
        if source == sink {
            return Ok(MaxFlow::default());
        }

        let index: HashMap<StationId, usize> =
            stations.iter().enumerate().map(|(i, &s)| (s, i)).collect();
        let mut residual = Residual::with_nodes(stations.len());

        // Parallel edges between one ordered pair share a single arc.
        let mut pair_arcs: HashMap<(usize, usize), usize> = HashMap::new();
        let mut arc_pipes: BTreeMap<usize, Vec<(PipeId, u64)>> = BTreeMap::new();
        for edge in self.edges() {
            let (from, to) = (index[&edge.from], index[&edge.to]);
            let arc_idx = match pair_arcs.get(&(from, to)) {
                Some(&arc_idx) => {
                    let arc = &mut residual.arcs[arc_idx];
                    arc.residual = arc.residual.saturating_add(edge.capacity);
                    arc_idx
                }
                None => {
                    let arc_idx = residual.add_arc(from, to, edge.capacity);
                    pair_arcs.insert((from, to), arc_idx);
                    arc_idx
                }
            };
            arc_pipes
                .entry(arc_idx)
                .or_default()
                .push((edge.pipe, edge.capacity));
        }
        let initial: BTreeMap<usize, u64> = arc_pipes
            .keys()
            .map(|&arc_idx| (arc_idx, residual.arcs[arc_idx].residual))
            .collect();

        let (s, t) = (index[&source], index[&sink]);
        let mut value: u64 = 0;
        let mut rounds = 0usize;
        while let Some(via) = residual.augmenting_path(s, t) {
            let path = residual.path_arcs(&via, s, t);
            let Some(push) = path.iter().map(|&a| residual.arcs[a].residual).min() else {
                break;
            };
            for &arc_idx in &path {
                let twin = residual.arcs[arc_idx].twin;
                residual.arcs[arc_idx].residual -= push;
                residual.arcs[twin].residual += push;
            }
            value = value.saturating_add(push);
            rounds += 1;
        }
        debug!(%source, %sink, value, rounds, "max flow computed");

        let mut pipe_flows = BTreeMap::new();
        for (arc_idx, pipes) in &arc_pipes {
            let mut carried = initial[arc_idx] - residual.arcs[*arc_idx].residual;
            for &(pipe, capacity) in pipes {
                let share = carried.min(capacity);
                if share > 0 {
                    pipe_flows.insert(pipe, share);
                }
                carried -= share;
            }
        }

        Ok(MaxFlow { value, pipe_flows })
    }
}

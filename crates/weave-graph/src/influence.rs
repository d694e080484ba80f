use std::collections::{HashSet, VecDeque};

use weave_utils::SmallStr;

use crate::edge::EdgeType;
use crate::graph::NeuralWeb;

const MAX_DEPTH: u32 = 3;
const PRUNE_THRESHOLD: f32 = 0.1;
const ATTENUATION: f32 = 0.8;

/// Depth-bounded breadth-first traversal from `source` along outgoing
/// `mentor`/`influencer` edges only. Influence starts at `1.0` and is
/// attenuated as `current * edge.strength * 0.8` at each hop; a branch
/// is pruned as soon as its influence drops strictly below `0.1`, and
/// each node is visited at most once (first-visit wins, so whichever
/// path reaches a node first determines its recorded influence). The
/// source itself is included in the result at `1.0`. `max_depth` bounds
/// how many hops past the source get explored: a node whose hop count
/// would reach `max_depth` is never inserted or queued.
pub fn influence_reach(web: &NeuralWeb, source: &str, max_depth: Option<u32>) -> Vec<(SmallStr, f32)> {
    let max_depth = max_depth.unwrap_or(MAX_DEPTH);
    let mut visited = HashSet::new();
    let mut reached = Vec::new();
    let mut queue = VecDeque::new();

    let source_id = SmallStr::from(source);
    visited.insert(source_id.clone());
    reached.push((source_id.clone(), 1.0f32));
    queue.push_back((source_id, 1.0f32, 0u32));

    while let Some((current_id, current_influence, depth)) = queue.pop_front() {
        for (neighbor_id, edge) in web.outgoing(&current_id) {
            if !matches!(edge.edge_type, EdgeType::Mentor | EdgeType::Influencer) {
                continue;
            }
            if visited.contains(neighbor_id) {
                continue;
            }

            let next_depth = depth + 1;
            if next_depth >= max_depth {
                continue;
            }

            let next_influence = current_influence * edge.strength * ATTENUATION;
            if next_influence < PRUNE_THRESHOLD {
                continue;
            }

            visited.insert(neighbor_id.clone());
            reached.push((neighbor_id.clone(), next_influence));
            queue.push_back((neighbor_id.clone(), next_influence, next_depth));
        }
    }

    reached
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::Genome;

    #[test]
    fn attenuates_and_prunes_a_chain() {
        let mut web = NeuralWeb::new();
        let a = Genome::random("A", "genesis");
        let b = Genome::random("B", "genesis");
        let c = Genome::random("C", "genesis");
        let d = Genome::random("D", "genesis");

        web.create_connection("A", "B", &a, &b, Some(EdgeType::Mentor));
        web.create_connection("B", "C", &b, &c, Some(EdgeType::Mentor));
        web.create_connection("C", "D", &c, &d, Some(EdgeType::Mentor));

        web.edge_mut("A", "B").unwrap().strength = 1.0;
        web.edge_mut("B", "C").unwrap().strength = 0.5;
        web.edge_mut("C", "D").unwrap().strength = 0.5;

        let reach: std::collections::HashMap<_, _> = influence_reach(&web, "A", None)
            .into_iter()
            .map(|(id, influence)| (id.to_string(), influence))
            .collect();

        assert!((reach["B"] - 0.8).abs() < 1e-6);
        assert!((reach["C"] - 0.32).abs() < 1e-6);
        assert!(!reach.contains_key("D"));
    }
}

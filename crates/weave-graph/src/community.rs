use std::collections::HashSet;

use weave_utils::SmallStr;

use crate::edge::EdgeType;
use crate::graph::NeuralWeb;

/// A connected component of size >= 2 found by [`detect_communities`],
/// numbered sequentially in detection order.
#[derive(Clone, Debug)]
pub struct Community {
    pub id: usize,
    pub members: Vec<SmallStr>,
}

/// Undirected DFS over edges with `strength > 0.5` and edge type other
/// than `enemy`, treating an edge as present if either direction
/// qualifies. Deterministic given the arena's stable insertion order,
/// which this function walks verbatim.
pub fn detect_communities(web: &NeuralWeb) -> Vec<Community> {
    let mut visited: HashSet<SmallStr> = HashSet::new();
    let mut communities = Vec::new();

    for agent_id in web.agent_ids() {
        if visited.contains(agent_id) {
            continue;
        }

        let mut stack = vec![agent_id.clone()];
        let mut members = Vec::new();

        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            members.push(current.clone());

            for (neighbor, edge) in web.outgoing(&current) {
                if qualifies(edge.edge_type, edge.strength) && !visited.contains(neighbor) {
                    stack.push(neighbor.clone());
                }
            }
            if let Some(incoming) = web.incoming_where(&current, qualifies) {
                for neighbor in incoming {
                    if !visited.contains(&neighbor) {
                        stack.push(neighbor);
                    }
                }
            }
        }

        if members.len() >= 2 {
            let id = communities.len();
            communities.push(Community { id, members });
        }
    }

    communities
}

fn qualifies(edge_type: EdgeType, strength: f32) -> bool {
    strength > 0.5 && !matches!(edge_type, EdgeType::Enemy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NeuralWeb;
    use weave_core::Genome;

    #[test]
    fn finds_a_strongly_connected_pair_and_excludes_singletons() {
        let mut web = NeuralWeb::new();
        let a = Genome::random("a", "genesis");
        let b = Genome::random("b", "genesis");
        let c = Genome::random("c", "genesis");

        web.create_connection("a", "b", &a, &b, Some(EdgeType::Friend));
        web.edge_mut("a", "b").unwrap().strength = 0.9;
        web.edge_mut("b", "a").unwrap().strength = 0.9;
        web.register_agent("c");
        let _ = c;

        let communities = detect_communities(&web);
        assert_eq!(communities.len(), 1);
        assert_eq!(communities[0].members.len(), 2);
    }

    #[test]
    fn enemy_edges_never_bind_a_community() {
        let mut web = NeuralWeb::new();
        let a = Genome::random("a", "genesis");
        let b = Genome::random("b", "genesis");
        web.create_connection("a", "b", &a, &b, Some(EdgeType::Enemy));
        web.edge_mut("a", "b").unwrap().strength = 0.9;
        web.edge_mut("b", "a").unwrap().strength = 0.9;

        assert!(detect_communities(&web).is_empty());
    }
}

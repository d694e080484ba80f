use serde::{Deserialize, Serialize};

use crate::community::detect_communities;
use crate::edge::EdgeType;
use crate::graph::NeuralWeb;

/// The five per-agent social metrics, recomputed as a pure function of
/// the graph at the end of every round. `influence_score` is the only
/// one not bounded to `[0,1]` by construction (it is a sum of edge
/// strengths, not a ratio).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SocialMetrics {
    pub centrality: f32,
    pub influence_score: f32,
    pub popularity: f32,
    pub trust_rating: f32,
    pub community_standing: f32,
}

pub fn metrics_of(web: &NeuralWeb, agent_id: &str) -> SocialMetrics {
    let outgoing: Vec<_> = web.outgoing(agent_id).collect();

    let centrality = if outgoing.is_empty() {
        0.0
    } else {
        outgoing.iter().map(|(_, edge)| edge.strength).sum::<f32>() / outgoing.len() as f32
    };

    let influence_score = outgoing
        .iter()
        .filter(|(_, edge)| matches!(edge.edge_type, EdgeType::Influencer | EdgeType::Mentor))
        .map(|(_, edge)| edge.strength)
        .sum::<f32>();

    let popularity = web.incoming_count(agent_id) as f32 / (web.agent_count().max(1) as f32);

    let total_interactions: u32 = outgoing.iter().map(|(_, edge)| edge.interaction_count).sum();
    let trust_rating = if total_interactions == 0 {
        0.0
    } else {
        outgoing
            .iter()
            .map(|(_, edge)| edge.interaction_count as f32 * edge.strength)
            .sum::<f32>()
            / total_interactions as f32
    };

    let communities = detect_communities(web);
    let community_standing = communities
        .iter()
        .filter(|c| c.members.iter().any(|m| m.as_str() == agent_id))
        .map(|c| c.members.len())
        .max()
        .map(|largest| largest as f32 / web.agent_count().max(1) as f32)
        .unwrap_or(0.0);

    SocialMetrics {
        centrality,
        influence_score,
        popularity,
        trust_rating,
        community_standing,
    }
}

/// Network-wide rollups: agent/edge counts, community counts, and
/// density — the supplemental network-level view alongside per-agent
/// `metrics_of`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkStatistics {
    pub agent_count: usize,
    pub edge_count: usize,
    pub community_count: usize,
    pub largest_community_size: usize,
    pub density: f32,
}

pub fn network_statistics(web: &NeuralWeb) -> NetworkStatistics {
    let agent_count = web.agent_count();
    let edge_count: usize = web.agent_ids().map(|id| web.outgoing(id).count()).sum();
    let communities = detect_communities(web);
    let largest_community_size = communities.iter().map(|c| c.members.len()).max().unwrap_or(0);

    let max_possible_edges = agent_count.saturating_mul(agent_count.saturating_sub(1));
    let density = if max_possible_edges == 0 {
        0.0
    } else {
        edge_count as f32 / max_possible_edges as f32
    };

    NetworkStatistics {
        agent_count,
        edge_count,
        community_count: communities.len(),
        largest_community_size,
        density,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::Genome;

    #[test]
    fn isolated_agent_has_zero_metrics() {
        let mut web = NeuralWeb::new();
        web.register_agent("lonely");
        let metrics = metrics_of(&web, "lonely");
        assert_eq!(metrics.centrality, 0.0);
        assert_eq!(metrics.influence_score, 0.0);
        assert_eq!(metrics.popularity, 0.0);
        assert_eq!(metrics.trust_rating, 0.0);
        assert_eq!(metrics.community_standing, 0.0);
    }

    #[test]
    fn popularity_reflects_incoming_edge_share() {
        let mut web = NeuralWeb::new();
        let a = Genome::random("a", "genesis");
        let b = Genome::random("b", "genesis");
        web.create_connection("a", "b", &a, &b, Some(EdgeType::Friend));
        let metrics = metrics_of(&web, "b");
        assert!((metrics.popularity - 0.5).abs() < 1e-6);
    }
}

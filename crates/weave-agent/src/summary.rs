use serde::{Deserialize, Serialize};
use weave_core::PersonalityArchetype;
use weave_graph::NeuralWeb;

use crate::agent::{DomainPerformance, SocialAgent};
use crate::goals::SocialGoal;

/// Read-only aggregates over an agent's position in the graph, derived
/// on demand rather than stored.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SocialPerformance {
    pub total_connections: usize,
    pub average_connection_strength: f32,
    pub connection_type_diversity: f32,
    pub influence_effectiveness: f32,
    pub social_resistance: f32,
}

pub fn evaluate_social_performance(agent: &SocialAgent, web: &NeuralWeb) -> SocialPerformance {
    let outgoing: Vec<_> = web.outgoing(agent.id()).collect();
    let total_connections = outgoing.len();

    let average_connection_strength = if outgoing.is_empty() {
        0.0
    } else {
        outgoing.iter().map(|(_, edge)| edge.strength).sum::<f32>() / outgoing.len() as f32
    };

    let distinct_types = outgoing
        .iter()
        .map(|(_, edge)| edge.edge_type)
        .collect::<std::collections::HashSet<_>>()
        .len();
    let connection_type_diversity = distinct_types as f32 / 7.0;

    let influence_effectiveness = if agent.influence_attempts == 0 {
        0.0
    } else {
        agent.influence_successes as f32 / agent.influence_attempts as f32
    };

    let influences_received = agent.influences_received.len().max(0) as f32;
    let social_resistance = (1.0 - agent.working_genes.ritual.influence_susceptibility)
        / (influences_received * 0.1).max(1.0);

    SocialPerformance {
        total_connections,
        average_connection_strength,
        connection_type_diversity,
        influence_effectiveness,
        social_resistance,
    }
}

/// A richer snapshot combining the derived performance aggregates with
/// identity and goal context, for reporting and dashboards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SocialSummary {
    pub agent_id: String,
    pub archetype: PersonalityArchetype,
    pub goals: Vec<SocialGoal>,
    pub performance: SocialPerformance,
    pub domain_bonuses: DomainPerformance,
}

pub fn get_social_summary(agent: &SocialAgent, web: &NeuralWeb) -> SocialSummary {
    SocialSummary {
        agent_id: agent.id().to_string(),
        archetype: agent.archetype(),
        goals: agent.goals.clone(),
        performance: evaluate_social_performance(agent, web),
        domain_bonuses: agent.performance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::Genome;

    #[test]
    fn isolated_agent_has_zero_derived_performance() {
        let genome = Genome::random("a", "genesis");
        let agent = SocialAgent::new(genome, "A");
        let web = NeuralWeb::new();
        let performance = evaluate_social_performance(&agent, &web);
        assert_eq!(performance.total_connections, 0);
        assert_eq!(performance.average_connection_strength, 0.0);
        assert_eq!(performance.influence_effectiveness, 0.0);
    }
}

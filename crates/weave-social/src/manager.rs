use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use weave_agent::{BoundedLog, SocialAgent};
use weave_core::{random_provider, Domain, DomainGenes, Genome};
use weave_graph::{detect_communities, metrics_of, NeuralWeb, SocialMetrics};
use weave_utils::SmallStr;

use crate::community::{evolve_communities, CommunityState};
use crate::event::{generate_event, SocialEvent, TransientBonus};
use crate::trends::{archetype_observation, edge_type_observation, Trends};

/// A snapshot of every agent's social metrics at the end of one round,
/// appended to a bounded history for trend reporting.
#[derive(Clone)]
pub struct RoundMetricsSnapshot {
    pub at: DateTime<Utc>,
    pub metrics: HashMap<SmallStr, SocialMetrics>,
}

/// Drives scheduled rounds over a shared [`NeuralWeb`] and cohort of
/// [`SocialAgent`]s: the six ordered phases of §4.5, social-event
/// generation and effect application, community lifecycle tracking, and
/// EMA trend accumulation.
pub struct SocialNetworkManager {
    pub web: NeuralWeb,
    pub communities: HashMap<SmallStr, CommunityState>,
    pub trends: Trends,
    pub events: BoundedLog<SocialEvent>,
    pub metrics_history: BoundedLog<RoundMetricsSnapshot>,
    bonuses: HashMap<SmallStr, Vec<TransientBonus>>,
    pub event_probability: f32,
    pub round_count: u64,
}

const DISCOVERY_ATTEMPTS_PER_ROUND: usize = 2;
const INFLUENCE_PHASE_THRESHOLD: f32 = 0.6;

impl SocialNetworkManager {
    pub fn new(event_probability: f32) -> Self {
        SocialNetworkManager {
            web: NeuralWeb::new(),
            communities: HashMap::new(),
            trends: Trends::default(),
            events: BoundedLog::new(),
            metrics_history: BoundedLog::new(),
            bonuses: HashMap::new(),
            event_probability,
            round_count: 0,
        }
    }

    /// The sum of currently active transient bonus amounts for `agent_id`
    /// in `domain`, for callers that want to fold social-event effects
    /// into a freshly gathered `PerformanceData` before scoring fitness.
    pub fn active_bonus(&self, agent_id: &str, domain: Domain) -> f32 {
        self.bonuses
            .get(agent_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|b| b.domain as u8 == domain as u8)
                    .map(|b| b.amount)
                    .sum()
            })
            .unwrap_or(0.0)
    }

    pub fn recent_events(&self, window: Duration) -> Vec<&SocialEvent> {
        let cutoff = Utc::now() - window;
        self.events.iter().filter(|e| e.occurred_at >= cutoff).collect()
    }

    /// Runs the six ordered phases of one round against `agents`,
    /// registering every agent in the graph first so isolated agents
    /// still appear in metrics and trend observations.
    pub fn run_round(&mut self, agents: &mut [SocialAgent]) {
        for agent in agents.iter() {
            self.web.register_agent(agent.id());
        }

        let cohort: Vec<Genome> = agents.iter().map(|a| a.genome.clone()).collect();

        // Phase 1: connection discovery.
        for agent in agents.iter_mut() {
            let probability = (0.3 * agent.working_genes.ritual.community_bonding
                + 0.2 * agent.working_genes.odyssey.experimentation)
                .clamp(0.0, 1.0);
            if !random_provider::bool(probability) {
                continue;
            }
            let candidates = agent.discover_candidates(&cohort, &self.web);
            for (target_id, _score) in candidates.into_iter().take(DISCOVERY_ATTEMPTS_PER_ROUND) {
                if let Some(target) = cohort.iter().find(|g| g.agent_id == target_id) {
                    agent.initiate_connection(target, &mut self.web);
                }
            }
        }

        // Phase 2: relationship maintenance.
        for agent in agents.iter_mut() {
            agent.maintain_relationships(&cohort, &mut self.web);
        }

        // Phase 3: influence. Acts on a scratch of working genes (never the
        // stored genome) so targets can be mutated without aliasing the
        // acting agent's own state, synced back into each agent afterward.
        let ids: Vec<SmallStr> = agents.iter().map(|a| SmallStr::from(a.id())).collect();
        let mut working: Vec<DomainGenes> = agents.iter().map(|a| a.working_genes.clone()).collect();
        for agent in agents.iter_mut() {
            if agent.working_genes.ritual.leadership_tendency <= INFLUENCE_PHASE_THRESHOLD {
                continue;
            }
            agent.influence_network(&ids, &mut working, &self.web);
        }
        for (agent, genes) in agents.iter_mut().zip(&working) {
            agent.working_genes.ritual.loyalty_factor = genes.ritual.loyalty_factor;
        }

        // Phase 4: social event.
        if random_provider::bool(self.event_probability) {
            let mut pending = Vec::new();
            if let Some(event) = generate_event(agents, &mut self.web, &mut pending) {
                tracing::info!(kind = ?event.kind, intensity = event.intensity, "social event occurred");
                self.events.push(event);
            }
            for (agent_id, bonus) in pending {
                self.bonuses.entry(agent_id).or_default().push(bonus);
            }
        }
        for entries in self.bonuses.values_mut() {
            for bonus in entries.iter_mut() {
                bonus.rounds_remaining = bonus.rounds_remaining.saturating_sub(1);
            }
            entries.retain(|b| b.rounds_remaining > 0);
        }
        self.bonuses.retain(|_, entries| !entries.is_empty());

        // Phase 5: community evolution.
        let post_influence_cohort: Vec<Genome> = agents.iter().map(|a| a.genome.clone()).collect();
        let detected = detect_communities(&self.web);
        evolve_communities(&mut self.communities, &detected, &post_influence_cohort, &self.web);

        // Phase 6: trend analysis.
        let edge_observation = edge_type_observation(&self.web);
        let archetypes: Vec<_> = agents.iter().map(|a| a.archetype()).collect();
        let archetype_obs = archetype_observation(&archetypes);

        let recent_hour_participants: std::collections::HashSet<&str> = self
            .recent_events(Duration::hours(1))
            .into_iter()
            .flat_map(|e| e.participants.iter().map(|id| id.as_str()))
            .collect();
        let activity_observation = if agents.is_empty() {
            0.0
        } else {
            recent_hour_participants.len() as f32 / agents.len() as f32
        };
        self.trends.update(&edge_observation, &archetype_obs, activity_observation);

        let metrics: HashMap<SmallStr, SocialMetrics> = agents
            .iter()
            .map(|a| (SmallStr::from(a.id()), metrics_of(&self.web, a.id())))
            .collect();
        self.metrics_history.push(RoundMetricsSnapshot { at: Utc::now(), metrics });

        self.round_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_round_registers_every_agent_and_advances_the_counter() {
        let mut manager = SocialNetworkManager::new(0.0);
        let mut agents: Vec<SocialAgent> = (0..5)
            .map(|i| SocialAgent::new(Genome::random(format!("agent-{i}"), "genesis"), format!("Agent {i}")))
            .collect();

        manager.run_round(&mut agents);

        assert_eq!(manager.web.agent_count(), 5);
        assert_eq!(manager.round_count, 1);
        assert_eq!(manager.metrics_history.len(), 1);
    }

    #[test]
    fn influence_phase_respects_the_round_level_leadership_gate() {
        let mut manager = SocialNetworkManager::new(0.0);
        let mut leader = Genome::random("leader", "genesis");
        leader.domains.ritual.leadership_tendency = 0.55;
        let mut follower = Genome::random("follower", "genesis");
        follower.domains.ritual.influence_susceptibility = 0.9;

        let mut agents = vec![
            SocialAgent::new(leader, "Leader"),
            SocialAgent::new(follower, "Follower"),
        ];
        manager
            .web
            .create_connection("leader", "follower", &agents[0].genome, &agents[1].genome, Some(weave_graph::EdgeType::Follower));

        manager.run_round(&mut agents);
        assert_eq!(agents[0].influence_attempts, 0);
    }
}

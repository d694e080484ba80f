use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use weave_core::{random_provider, DomainGenes, Genome, Identity, PersonalityArchetype};
use weave_graph::{genetic_compatibility, EdgeType, InteractionKind, NeuralWeb};
use weave_utils::SmallStr;

use crate::goals::{derive_goals, goal_complementarity, SocialGoal};
use crate::interaction::resolve_feedback_kind;
use crate::memory::{BoundedLog, InfluenceEntry, MemoryEntry};

/// Per-domain transient performance bonuses accumulated from successful
/// social interactions (mentoring, collaboration). Distinct from the
/// evolution engine's `FitnessVector`, which is derived from external
/// `PerformanceData`, not from social behaviour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainPerformance {
    pub limbo: f32,
    pub odyssey: f32,
    pub ritual: f32,
    pub engine: f32,
    pub logs: f32,
}

impl DomainPerformance {
    fn bump_ritual(&mut self, amount: f32) {
        self.ritual = (self.ritual + amount).clamp(0.0, 1.0);
    }
}

/// A single agent's wrapper around its immutable genome: identity,
/// goals, performance counters, bounded social memory and a mutable
/// working copy of its behavioural genes that social interaction may
/// nudge without ever touching the stored genome used for evolution.
pub struct SocialAgent {
    pub genome: Genome,
    pub identity: Identity,
    pub goals: Vec<SocialGoal>,
    pub working_genes: DomainGenes,
    pub performance: DomainPerformance,
    pub social_memory: BoundedLog<MemoryEntry>,
    pub influences_given: BoundedLog<InfluenceEntry>,
    pub influences_received: BoundedLog<InfluenceEntry>,
    pub relationship_preferences: HashMap<EdgeType, f32>,
    pub influence_attempts: u32,
    pub influence_successes: u32,
}

const DISCOVERY_THRESHOLD: f32 = 0.3;
const DISCOVERY_TOP_N: usize = 5;

impl SocialAgent {
    pub fn new(genome: Genome, display_name: impl Into<SmallStr>) -> Self {
        let identity = Identity::from_genome(&genome, display_name);
        let goals = derive_goals(&genome);
        let working_genes = genome.domains.clone();

        let mut relationship_preferences = HashMap::new();
        for edge_type in EdgeType::ALL {
            relationship_preferences.insert(edge_type, 0.5);
        }

        SocialAgent {
            genome,
            identity,
            goals,
            working_genes,
            performance: DomainPerformance::default(),
            social_memory: BoundedLog::new(),
            influences_given: BoundedLog::new(),
            influences_received: BoundedLog::new(),
            relationship_preferences,
            influence_attempts: 0,
            influence_successes: 0,
        }
    }

    pub fn id(&self) -> &str {
        self.genome.agent_id.as_str()
    }

    pub fn archetype(&self) -> PersonalityArchetype {
        self.identity.personality_archetype
    }

    /// Scores every other agent in `cohort` (skipping self and agents
    /// already connected to in `web`), returning up to the top 5 whose
    /// `interest_score` clears [`DISCOVERY_THRESHOLD`], sorted
    /// descending.
    pub fn discover_candidates(&self, cohort: &[Genome], web: &NeuralWeb) -> Vec<(SmallStr, f32)> {
        let mut scored: Vec<(SmallStr, f32)> = cohort
            .iter()
            .filter(|other| other.agent_id != self.genome.agent_id)
            .filter(|other| web.edge(self.id(), other.agent_id.as_str()).is_none())
            .map(|other| (other.agent_id.clone(), self.interest_score(other)))
            .filter(|(_, score)| *score > DISCOVERY_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(DISCOVERY_TOP_N);
        scored
    }

    fn interest_score(&self, other: &Genome) -> f32 {
        let compatibility = genetic_compatibility(&self.genome, other);
        let other_goals = derive_goals(other);
        let complementarity = goal_complementarity(&self.goals, &other_goals);
        let fitness_similarity = 1.0 - (self.genome.fitness.overall - other.fitness.overall).abs();
        let personality_affinity = personality_affinity(self.archetype(), Identity::from_genome(other, "").personality_archetype);

        let base = (compatibility + complementarity + fitness_similarity + personality_affinity) / 4.0;
        let noise = random_provider::range(-0.1f32..0.1f32) * self.working_genes.odyssey.experimentation;

        (base + noise).clamp(0.0, 1.0)
    }

    /// Creates the connection via the neural web and records the event
    /// in social memory.
    pub fn initiate_connection(&mut self, target: &Genome, web: &mut NeuralWeb) {
        let created = web.create_connection(self.id(), target.agent_id.as_str(), &self.genome, target, None);
        if let Some(edge_type) = created {
            self.social_memory.push(MemoryEntry {
                at: Utc::now(),
                peer_id: target.agent_id.clone(),
                description: SmallStr::from(format!("initiated {edge_type:?} connection")),
            });
        }
    }

    /// For each outgoing edge, independently attempt an interaction
    /// with probability `0.5 * edge.strength + 0.3 * community_bonding`.
    pub fn maintain_relationships(&mut self, cohort: &[Genome], web: &mut NeuralWeb) {
        let community_bonding = self.working_genes.ritual.community_bonding;
        let outgoing: Vec<(SmallStr, EdgeType)> = web
            .outgoing(self.id())
            .map(|(id, edge)| (id.clone(), edge.edge_type))
            .collect();

        for (target_id, edge_type) in outgoing {
            let edge_strength = web.edge(self.id(), target_id.as_str()).map(|e| e.strength).unwrap_or(0.0);
            let attempt_probability = (0.5 * edge_strength + 0.3 * community_bonding).clamp(0.0, 1.0);
            if !random_provider::bool(attempt_probability) {
                continue;
            }

            let Some(target) = cohort.iter().find(|g| g.agent_id.as_str() == target_id.as_str()) else {
                continue;
            };

            let flavor_kind = *random_provider::choose(edge_type.allowed_interactions());
            let compatibility = genetic_compatibility(&self.genome, target);
            let success_probability = (0.5 + compatibility * 0.4).clamp(0.0, 1.0);
            let success = random_provider::bool(success_probability);

            let feedback_kind = resolve_feedback_kind(flavor_kind, success);
            web.interact(self.id(), target_id.as_str(), feedback_kind);

            self.record_relationship_outcome(edge_type, success);
            self.process_interaction_result(edge_type, flavor_kind, edge_strength, &target_id, success);
        }
    }

    /// Only agents with `leadership_tendency > 0.5` act. For each
    /// outgoing `follower`/`friend` edge, with probability
    /// `0.3 * leadership_tendency`, attempt to influence the target:
    /// success iff `leadership * strength > influence_susceptibility *
    /// U[0.8, 1.2]`, in which case the target's `loyalty_factor`
    /// increases by 0.05 (clamped). Targets are looked up by id in
    /// `ids` and their *working* genes in `working` are mutated in
    /// place — the stored genome used for evolution is never touched by
    /// social drift.
    pub fn influence_network(&mut self, ids: &[SmallStr], working: &mut [DomainGenes], web: &NeuralWeb) {
        let leadership = self.working_genes.ritual.leadership_tendency;
        if leadership <= 0.5 {
            return;
        }

        let outgoing: Vec<(SmallStr, EdgeType, f32)> = web
            .outgoing(self.id())
            .filter(|(_, edge)| matches!(edge.edge_type, EdgeType::Follower | EdgeType::Friend))
            .map(|(id, edge)| (id.clone(), edge.edge_type, edge.strength))
            .collect();

        for (target_id, _edge_type, strength) in outgoing {
            if !random_provider::bool((0.3 * leadership).clamp(0.0, 1.0)) {
                continue;
            }

            self.influence_attempts += 1;

            let Some(index) = ids.iter().position(|id| id.as_str() == target_id.as_str()) else {
                continue;
            };
            let target_genes = &mut working[index];

            let resistance = target_genes.ritual.influence_susceptibility * random_provider::range(0.8f32..1.2f32);
            if leadership * strength > resistance {
                target_genes.ritual.loyalty_factor = (target_genes.ritual.loyalty_factor + 0.05).clamp(0.0, 1.0);
                self.influence_successes += 1;
                self.influences_given.push(InfluenceEntry {
                    peer_id: target_id,
                    at: Utc::now(),
                    strength,
                });
            }
        }
    }

    fn record_relationship_outcome(&mut self, edge_type: EdgeType, success: bool) {
        let delta = if success { 0.05 } else { -0.05 };
        let entry = self.relationship_preferences.entry(edge_type).or_insert(0.5);
        *entry = (*entry + delta).clamp(0.0, 1.0);
    }

    fn process_interaction_result(
        &mut self,
        edge_type: EdgeType,
        flavor_kind: InteractionKind,
        edge_strength: f32,
        peer_id: &SmallStr,
        success: bool,
    ) {
        if !success {
            return;
        }

        match edge_type {
            EdgeType::Mentor => {
                self.performance.bump_ritual(0.02);
                self.influences_received.push(InfluenceEntry {
                    peer_id: peer_id.clone(),
                    at: Utc::now(),
                    strength: edge_strength,
                });
            }
            EdgeType::Influencer => {
                let scaled = edge_strength * self.working_genes.ritual.influence_susceptibility;
                self.influences_received.push(InfluenceEntry {
                    peer_id: peer_id.clone(),
                    at: Utc::now(),
                    strength: scaled,
                });
                if scaled > 0.3 {
                    let sign = if random_provider::bool(0.5) { 1.0 } else { -1.0 };
                    let delta = sign * 0.03;
                    self.working_genes.ritual.community_bonding =
                        (self.working_genes.ritual.community_bonding + delta).clamp(0.0, 1.0);
                    self.working_genes.ritual.loyalty_factor =
                        (self.working_genes.ritual.loyalty_factor + delta).clamp(0.0, 1.0);
                }
            }
            EdgeType::Collaborator if matches!(flavor_kind, InteractionKind::Collaboration) => {
                self.performance.bump_ritual(edge_strength * 0.02);
            }
            _ => {}
        }

        self.social_memory.push(MemoryEntry {
            at: Utc::now(),
            peer_id: peer_id.clone(),
            description: SmallStr::from(format!("{flavor_kind:?}")),
        });
    }
}

/// A hand-authored affinity between personality archetypes: identical
/// archetypes share strong affinity; a handful of logically compatible
/// pairs (leader/follower, artist/adventurer, speculator/analyst as a
/// counterweight) are scored moderately-high; everything else is
/// neutral.
fn personality_affinity(a: PersonalityArchetype, b: PersonalityArchetype) -> f32 {
    use PersonalityArchetype::*;

    if a == b {
        return 0.9;
    }

    let complementary = matches!(
        (a, b),
        (CommunityLeader, LoyalFollower)
            | (LoyalFollower, CommunityLeader)
            | (InnovativeArtist, SocialAdventurer)
            | (SocialAdventurer, InnovativeArtist)
            | (BraveSpeculator, MethodicalAnalyst)
            | (MethodicalAnalyst, BraveSpeculator)
    );

    if complementary { 0.7 } else { 0.5 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goals_are_derived_once_and_survive_working_gene_drift() {
        let mut genome = Genome::random("agent-1", "genesis");
        genome.domains.ritual.leadership_tendency = 0.95;
        let mut agent = SocialAgent::new(genome, "Agent One");
        assert!(agent.goals.contains(&SocialGoal::BecomeLeader));

        agent.working_genes.ritual.leadership_tendency = 0.0;
        assert!(agent.goals.contains(&SocialGoal::BecomeLeader));
    }

    #[test]
    fn discover_candidates_excludes_self_and_already_connected() {
        let genome = Genome::random("a", "genesis");
        let agent = SocialAgent::new(genome.clone(), "A");
        let mut web = NeuralWeb::new();
        let b = Genome::random("b", "genesis");
        let c = Genome::random("c", "genesis");
        web.create_connection("a", "b", &genome, &b, Some(EdgeType::Friend));

        let cohort = vec![genome.clone(), b, c];
        let candidates = agent.discover_candidates(&cohort, &web);
        assert!(candidates.iter().all(|(id, _)| id.as_str() != "a" && id.as_str() != "b"));
    }

    #[test]
    fn influence_network_requires_leadership_above_half() {
        let mut genome = Genome::random("a", "genesis");
        genome.domains.ritual.leadership_tendency = 0.3;
        let working_genes = genome.domains.clone();
        let mut agent = SocialAgent::new(genome.clone(), "A");
        let ids = vec![SmallStr::from("a")];
        let mut working = vec![working_genes];
        let web = NeuralWeb::new();
        agent.influence_network(&ids, &mut working, &web);
        assert_eq!(agent.influence_attempts, 0);
    }
}

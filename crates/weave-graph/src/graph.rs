use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use weave_core::{random_provider, Genome};
use weave_utils::{Arena, ArenaKey, SmallStr};

use crate::compatibility::genetic_compatibility;
use crate::edge::{EdgeType, InteractionKind};

/// One directed edge: `source`'s view of its relationship with `target`.
/// The reciprocal edge (`target` -> `source`) is a distinct `Edge` value
/// with its own strength and history, evolving independently except at
/// creation time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub edge_type: EdgeType,
    pub strength: f32,
    pub last_interaction: Option<DateTime<Utc>>,
    pub interaction_count: u32,
    pub shared_experiences: Vec<InteractionKind>,
    pub influence_history: Vec<InfluenceEvent>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InfluenceEvent {
    pub kind: InteractionKind,
    pub at: DateTime<Utc>,
    pub delta: f32,
}

impl Edge {
    fn new(edge_type: EdgeType, strength: f32) -> Self {
        Edge {
            edge_type,
            strength,
            last_interaction: None,
            interaction_count: 0,
            shared_experiences: Vec::new(),
            influence_history: Vec::new(),
        }
    }
}

/// The typed, weighted, directional social graph between agents. Nodes
/// are registered into an arena keyed by stable `ArenaKey`s so the graph
/// can hold cycles without any node owning another; all mutation is
/// routed through this type's methods.
#[derive(Default)]
pub struct NeuralWeb {
    nodes: Arena<SmallStr>,
    index: HashMap<SmallStr, ArenaKey>,
    edges: HashMap<(ArenaKey, ArenaKey), Edge>,
}

impl NeuralWeb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `agent_id` if it is not already known. Idempotent.
    pub fn register_agent(&mut self, agent_id: &str) -> ArenaKey {
        if let Some(key) = self.index.get(agent_id) {
            return *key;
        }
        let key = self.nodes.insert(SmallStr::from(agent_id));
        self.index.insert(SmallStr::from(agent_id), key);
        key
    }

    pub fn node_key(&self, agent_id: &str) -> Option<ArenaKey> {
        self.index.get(agent_id).copied()
    }

    pub fn agent_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = &SmallStr> {
        self.nodes.values()
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&Edge> {
        let source = self.node_key(source)?;
        let target = self.node_key(target)?;
        self.edges.get(&(source, target))
    }

    pub fn edge_mut(&mut self, source: &str, target: &str) -> Option<&mut Edge> {
        let source = self.node_key(source)?;
        let target = self.node_key(target)?;
        self.edges.get_mut(&(source, target))
    }

    pub fn outgoing(&self, agent_id: &str) -> impl Iterator<Item = (&SmallStr, &Edge)> {
        let source = self.node_key(agent_id);
        self.edges.iter().filter_map(move |((s, t), edge)| {
            if Some(*s) == source {
                self.nodes.get(*t).map(|id| (id, edge))
            } else {
                None
            }
        })
    }

    pub fn incoming_count(&self, agent_id: &str) -> usize {
        let target = self.node_key(agent_id);
        self.edges.keys().filter(|(_, t)| Some(*t) == target).count()
    }

    /// Agent ids with an incoming edge into `agent_id` whose strength and
    /// type satisfy `predicate`, used by community detection to treat an
    /// edge as present if either direction qualifies.
    pub fn incoming_where(
        &self,
        agent_id: &str,
        predicate: impl Fn(EdgeType, f32) -> bool,
    ) -> Option<Vec<SmallStr>> {
        let target = self.node_key(agent_id)?;
        Some(
            self.edges
                .iter()
                .filter_map(|((s, t), edge)| {
                    if *t == target && predicate(edge.edge_type, edge.strength) {
                        self.nodes.get(*s).cloned()
                    } else {
                        None
                    }
                })
                .collect(),
        )
    }

    /// Creates a `source -> target` connection (and its reciprocal),
    /// inferring the edge type from compatibility and dominant traits
    /// when `edge_type` is `None`. Self-connections are rejected
    /// silently (`None`); an existing connection is returned unchanged
    /// (idempotent, per the duplicate-connection recovery policy).
    pub fn create_connection(
        &mut self,
        source_id: &str,
        target_id: &str,
        source_dna: &Genome,
        target_dna: &Genome,
        edge_type: Option<EdgeType>,
    ) -> Option<EdgeType> {
        if source_id == target_id {
            tracing::debug!(agent = source_id, "ignoring self-connection attempt");
            return None;
        }

        let source = self.register_agent(source_id);
        let target = self.register_agent(target_id);

        if let Some(existing) = self.edges.get(&(source, target)) {
            return Some(existing.edge_type);
        }

        let compatibility = genetic_compatibility(source_dna, target_dna);
        let edge_type = edge_type.unwrap_or_else(|| infer_edge_type(compatibility, source_dna, target_dna));

        let noise = random_provider::range(-0.1f32..0.1f32);
        let strength = (compatibility * edge_type.strength_modifier() + noise).clamp(0.0, 1.0);

        self.edges.insert((source, target), Edge::new(edge_type, strength));

        let reciprocal_type = edge_type.reciprocal();
        let reciprocal_noise = random_provider::range(-0.1f32..0.1f32);
        let reciprocal_strength =
            (compatibility * reciprocal_type.strength_modifier() + reciprocal_noise).clamp(0.0, 1.0);
        self.edges
            .entry((target, source))
            .or_insert_with(|| Edge::new(reciprocal_type, reciprocal_strength));

        Some(edge_type)
    }

    /// Logs an interaction on the named directed edge and adjusts its
    /// strength by `kind`'s fixed delta. Returns `false` (no-op) if the
    /// edge does not exist; the reciprocal edge is left untouched.
    pub fn interact(&mut self, source_id: &str, target_id: &str, kind: InteractionKind) -> bool {
        let Some(source) = self.node_key(source_id) else {
            return false;
        };
        let Some(target) = self.node_key(target_id) else {
            return false;
        };
        let Some(edge) = self.edges.get_mut(&(source, target)) else {
            return false;
        };

        let now = Utc::now();
        edge.last_interaction = Some(now);
        edge.interaction_count += 1;
        edge.shared_experiences.push(kind);

        let delta = kind.strength_delta();
        edge.strength = (edge.strength + delta).clamp(0.0, 1.0);
        edge.influence_history.push(InfluenceEvent { kind, at: now, delta });

        true
    }
}

/// The proxy chosen for the spec's undefined "competitiveness" trait in
/// the connection-type decision: `limbo.risk_tolerance`, the closest
/// existing trait to a willingness-to-compete signal.
fn competitiveness(genome: &Genome) -> f32 {
    genome.domains.limbo.risk_tolerance
}

fn infer_edge_type(compatibility: f32, source_dna: &Genome, target_dna: &Genome) -> EdgeType {
    if compatibility > 0.8 {
        if source_dna.domains.ritual.leadership_tendency > target_dna.domains.ritual.leadership_tendency {
            EdgeType::Mentor
        } else {
            EdgeType::Collaborator
        }
    } else if compatibility > 0.6 {
        EdgeType::Friend
    } else if compatibility > 0.4 {
        if competitiveness(source_dna) > 0.7 {
            EdgeType::Competitor
        } else {
            EdgeType::Follower
        }
    } else if random_provider::bool(0.3) {
        EdgeType::Enemy
    } else {
        EdgeType::Competitor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genome_with_traits(id: &str, risk_tolerance: f32, leadership_tendency: f32) -> Genome {
        let mut genome = Genome::random(id, "genesis");
        genome.domains.limbo.risk_tolerance = risk_tolerance;
        genome.domains.ritual.leadership_tendency = leadership_tendency;
        genome
    }

    #[test]
    fn self_connection_is_rejected_silently() {
        let mut web = NeuralWeb::new();
        let genome = Genome::random("a", "genesis");
        assert_eq!(web.create_connection("a", "a", &genome, &genome, None), None);
        assert_eq!(web.agent_count(), 0);
    }

    #[test]
    fn duplicate_connection_returns_existing_type_idempotently() {
        let mut web = NeuralWeb::new();
        let a = genome_with_traits("a", 0.2, 0.9);
        let b = genome_with_traits("b", 0.2, 0.1);
        let first = web.create_connection("a", "b", &a, &b, Some(EdgeType::Friend));
        let second = web.create_connection("a", "b", &a, &b, Some(EdgeType::Mentor));
        assert_eq!(first, second);
    }

    #[test]
    fn connection_creates_reciprocal_edge() {
        let mut web = NeuralWeb::new();
        let a = genome_with_traits("a", 0.2, 0.9);
        let b = genome_with_traits("b", 0.2, 0.1);
        web.create_connection("a", "b", &a, &b, Some(EdgeType::Mentor));
        let reciprocal = web.edge("b", "a").expect("reciprocal edge exists");
        assert_eq!(reciprocal.edge_type, EdgeType::Follower);
    }

    #[test]
    fn interact_updates_strength_and_history() {
        let mut web = NeuralWeb::new();
        let a = Genome::random("a", "genesis");
        let b = Genome::random("b", "genesis");
        web.create_connection("a", "b", &a, &b, Some(EdgeType::Friend));
        web.edge_mut("a", "b").unwrap().strength = 0.5;

        assert!(web.interact("a", "b", InteractionKind::Conflict));
        let edge = web.edge("a", "b").unwrap();
        assert!((edge.strength - 0.42).abs() < 1e-6);
        assert_eq!(edge.interaction_count, 1);

        assert!(web.interact("a", "b", InteractionKind::Conflict));
        let edge = web.edge("a", "b").unwrap();
        assert!((edge.strength - 0.34).abs() < 1e-6);
    }

    #[test]
    fn interact_on_missing_edge_is_a_no_op() {
        let mut web = NeuralWeb::new();
        assert!(!web.interact("ghost-a", "ghost-b", InteractionKind::Conflict));
    }
}

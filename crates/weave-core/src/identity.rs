use serde::{Deserialize, Serialize};
use weave_utils::SmallStr;

use crate::genome::Genome;

/// Opaque identity record produced by an external name generator from
/// `(agent_id, personality_archetype, genes)`. The core never mutates an
/// identity; it only reads `agent_id`, `personality_archetype` and the
/// display fields below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub agent_id: SmallStr,
    pub display_name: SmallStr,
    pub personality_archetype: PersonalityArchetype,
}

impl Identity {
    pub fn from_genome(genome: &Genome, display_name: impl Into<SmallStr>) -> Self {
        Identity {
            agent_id: genome.agent_id.clone(),
            display_name: display_name.into(),
            personality_archetype: PersonalityArchetype::score(genome),
        }
    }
}

/// The seven named personality archetypes, declared in the tie-break
/// order the argmax resolves to on a score tie.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonalityArchetype {
    BraveSpeculator,
    BargainHunter,
    InnovativeArtist,
    CommunityLeader,
    LoyalFollower,
    MethodicalAnalyst,
    SocialAdventurer,
}

impl PersonalityArchetype {
    pub const ALL: [PersonalityArchetype; 7] = [
        PersonalityArchetype::BraveSpeculator,
        PersonalityArchetype::BargainHunter,
        PersonalityArchetype::InnovativeArtist,
        PersonalityArchetype::CommunityLeader,
        PersonalityArchetype::LoyalFollower,
        PersonalityArchetype::MethodicalAnalyst,
        PersonalityArchetype::SocialAdventurer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PersonalityArchetype::BraveSpeculator => "Brave Speculator",
            PersonalityArchetype::BargainHunter => "Bargain Hunter",
            PersonalityArchetype::InnovativeArtist => "Innovative Artist",
            PersonalityArchetype::CommunityLeader => "Community Leader",
            PersonalityArchetype::LoyalFollower => "Loyal Follower",
            PersonalityArchetype::MethodicalAnalyst => "Methodical Analyst",
            PersonalityArchetype::SocialAdventurer => "Social Adventurer",
        }
    }

    /// Score this archetype from the weighted gene combination the
    /// originating design names for it (see the archetype table).
    fn score_for(self, genome: &Genome) -> f32 {
        let d = &genome.domains;
        match self {
            PersonalityArchetype::BraveSpeculator => d.limbo.risk_tolerance,
            PersonalityArchetype::BargainHunter => d.limbo.price_sensitivity,
            PersonalityArchetype::InnovativeArtist => d.odyssey.creativity_drive,
            PersonalityArchetype::CommunityLeader => {
                (d.ritual.community_bonding + d.ritual.leadership_tendency) / 2.0
            }
            PersonalityArchetype::LoyalFollower => d.ritual.influence_susceptibility,
            PersonalityArchetype::MethodicalAnalyst => {
                (d.engine.analytical_thinking + d.engine.pattern_recognition) / 2.0
            }
            PersonalityArchetype::SocialAdventurer => {
                (d.odyssey.experimentation + d.ritual.community_bonding) / 2.0
            }
        }
    }

    /// Scores all seven archetypes and returns the argmax, ties broken
    /// in the declared order of `ALL`.
    pub fn score(genome: &Genome) -> PersonalityArchetype {
        let mut best = PersonalityArchetype::ALL[0];
        let mut best_score = best.score_for(genome);
        for archetype in &PersonalityArchetype::ALL[1..] {
            let score = archetype.score_for(genome);
            if score > best_score {
                best = *archetype;
                best_score = score;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_break_in_declared_order() {
        let mut genome = Genome::random("agent-1", "genesis");
        // Flatten every trait that feeds a score to the same value so every
        // archetype ties; the first declared archetype must win.
        for (domain, trait_name, _) in genome.domains.numeric_traits() {
            genome.domains.set(domain, trait_name, 0.5);
        }
        assert_eq!(
            PersonalityArchetype::score(&genome),
            PersonalityArchetype::BraveSpeculator
        );
    }

    #[test]
    fn dominant_trait_wins() {
        let mut genome = Genome::random("agent-1", "genesis");
        for (domain, trait_name, _) in genome.domains.numeric_traits() {
            genome.domains.set(domain, trait_name, 0.1);
        }
        genome.domains.odyssey.creativity_drive = 0.99;
        assert_eq!(
            PersonalityArchetype::score(&genome),
            PersonalityArchetype::InnovativeArtist
        );
    }
}

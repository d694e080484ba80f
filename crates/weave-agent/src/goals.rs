use serde::{Deserialize, Serialize};
use weave_core::Genome;

/// A behavioural goal derived once, at agent creation, from the genome's
/// gene values. Goals never change afterward even if the working copy
/// of genes drifts during social interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocialGoal {
    BecomeLeader,
    BuildCommunity,
    MaintainIndependence,
    FormStrongBonds,
    InspireCreativity,
    InfluenceRiskTaking,
}

impl SocialGoal {
    pub const ALL: [SocialGoal; 6] = [
        SocialGoal::BecomeLeader,
        SocialGoal::BuildCommunity,
        SocialGoal::MaintainIndependence,
        SocialGoal::FormStrongBonds,
        SocialGoal::InspireCreativity,
        SocialGoal::InfluenceRiskTaking,
    ];
}

/// Derives the set of social goals a genome's gene values satisfy, per
/// the fixed six threshold rules.
pub fn derive_goals(genome: &Genome) -> Vec<SocialGoal> {
    let mut goals = Vec::new();
    let ritual = &genome.domains.ritual;
    let odyssey = &genome.domains.odyssey;
    let limbo = &genome.domains.limbo;

    if ritual.leadership_tendency > 0.7 {
        goals.push(SocialGoal::BecomeLeader);
    }
    if ritual.community_bonding > 0.7 {
        goals.push(SocialGoal::BuildCommunity);
    }
    if ritual.influence_susceptibility < 0.3 {
        goals.push(SocialGoal::MaintainIndependence);
    }
    if ritual.loyalty_factor > 0.8 {
        goals.push(SocialGoal::FormStrongBonds);
    }
    if odyssey.creativity_drive > 0.7 {
        goals.push(SocialGoal::InspireCreativity);
    }
    if limbo.risk_tolerance > 0.7 {
        goals.push(SocialGoal::InfluenceRiskTaking);
    }

    goals
}

/// The fraction of `other`'s goals that `self_goals` does not already
/// hold, i.e. how much the two agents' ambitions complement rather than
/// duplicate each other. `0.0` if `other` has no goals.
pub fn goal_complementarity(self_goals: &[SocialGoal], other_goals: &[SocialGoal]) -> f32 {
    if other_goals.is_empty() {
        return 0.0;
    }
    let distinct = other_goals.iter().filter(|g| !self_goals.contains(g)).count();
    distinct as f32 / other_goals.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_genome_yields_no_goals() {
        let mut genome = Genome::random("agent-1", "genesis");
        genome.domains.ritual.leadership_tendency = 0.5;
        genome.domains.ritual.community_bonding = 0.5;
        genome.domains.ritual.influence_susceptibility = 0.5;
        genome.domains.ritual.loyalty_factor = 0.5;
        genome.domains.odyssey.creativity_drive = 0.5;
        genome.domains.limbo.risk_tolerance = 0.5;
        assert!(derive_goals(&genome).is_empty());
    }

    #[test]
    fn high_leadership_yields_become_leader() {
        let mut genome = Genome::random("agent-1", "genesis");
        genome.domains.ritual.leadership_tendency = 0.95;
        assert!(derive_goals(&genome).contains(&SocialGoal::BecomeLeader));
    }

    #[test]
    fn complementarity_is_zero_for_identical_goal_sets() {
        let goals = vec![SocialGoal::BecomeLeader, SocialGoal::BuildCommunity];
        assert_eq!(goal_complementarity(&goals, &goals), 0.0);
    }

    #[test]
    fn complementarity_is_one_for_fully_disjoint_goal_sets() {
        let mine = vec![SocialGoal::BecomeLeader];
        let theirs = vec![SocialGoal::MaintainIndependence];
        assert_eq!(goal_complementarity(&mine, &theirs), 1.0);
    }
}

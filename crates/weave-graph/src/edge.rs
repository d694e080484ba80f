use serde::{Deserialize, Serialize};

/// The seven directed relationship types an edge in the neural web can
/// carry. Each type has a fixed initial-strength modifier and a fixed
/// set of interaction kinds that may be exchanged over it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    Mentor,
    Collaborator,
    Friend,
    Competitor,
    Influencer,
    Follower,
    Enemy,
}

impl EdgeType {
    pub const ALL: [EdgeType; 7] = [
        EdgeType::Mentor,
        EdgeType::Collaborator,
        EdgeType::Friend,
        EdgeType::Competitor,
        EdgeType::Influencer,
        EdgeType::Follower,
        EdgeType::Enemy,
    ];

    /// The multiplier applied to compatibility when an edge of this type
    /// is first created.
    pub fn strength_modifier(self) -> f32 {
        match self {
            EdgeType::Mentor => 0.8,
            EdgeType::Collaborator => 0.9,
            EdgeType::Friend => 0.7,
            EdgeType::Influencer => 0.6,
            EdgeType::Follower => 0.5,
            EdgeType::Competitor => 0.4,
            EdgeType::Enemy => 0.2,
        }
    }

    /// The type installed on the reciprocal edge when this type is
    /// created on the forward edge. Symmetric types reciprocate to
    /// themselves; asymmetric ones (mentor/influencer vs. follower) take
    /// the complementary role.
    pub fn reciprocal(self) -> EdgeType {
        match self {
            EdgeType::Mentor => EdgeType::Follower,
            EdgeType::Influencer => EdgeType::Follower,
            EdgeType::Follower => EdgeType::Mentor,
            EdgeType::Collaborator => EdgeType::Collaborator,
            EdgeType::Friend => EdgeType::Friend,
            EdgeType::Competitor => EdgeType::Competitor,
            EdgeType::Enemy => EdgeType::Enemy,
        }
    }

    /// The interaction kinds that may be drawn for an edge of this type.
    pub fn allowed_interactions(self) -> &'static [InteractionKind] {
        use InteractionKind::*;
        match self {
            EdgeType::Mentor => &[Mentoring, AdviceGiving, Guidance],
            EdgeType::Collaborator => &[Collaboration, InformationSharing, JointPlanning],
            EdgeType::Friend => &[CasualChat, EmotionalSupport, SharedActivity],
            EdgeType::Competitor => &[CompetitiveChallenge, PerformanceComparison, Rivalry],
            EdgeType::Influencer => &[InfluenceAttempt, TrendSharing, OpinionLeadership],
            EdgeType::Follower => &[SeekingGuidance, MimickingBehavior, ApprovalSeeking],
            EdgeType::Enemy => &[Conflict, Confrontation, Undermining],
        }
    }
}

/// The kinds of interaction an edge can carry, grouped by which edge
/// types permit them, plus the generic feedback/trade kinds used by the
/// strength-update table regardless of edge type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionKind {
    Mentoring,
    AdviceGiving,
    Guidance,
    Collaboration,
    InformationSharing,
    JointPlanning,
    CasualChat,
    EmotionalSupport,
    SharedActivity,
    CompetitiveChallenge,
    PerformanceComparison,
    Rivalry,
    InfluenceAttempt,
    TrendSharing,
    OpinionLeadership,
    SeekingGuidance,
    MimickingBehavior,
    ApprovalSeeking,
    Conflict,
    Confrontation,
    Undermining,
    PositiveFeedback,
    TradeSuccess,
    TradeFailure,
    NegativeFeedback,
    Other,
}

impl InteractionKind {
    /// The Δstrength applied when this kind is logged on a directed edge.
    pub fn strength_delta(self) -> f32 {
        match self {
            InteractionKind::PositiveFeedback => 0.05,
            InteractionKind::Collaboration => 0.03,
            InteractionKind::TradeSuccess => 0.02,
            InteractionKind::TradeFailure => -0.02,
            InteractionKind::NegativeFeedback => -0.05,
            InteractionKind::Conflict => -0.08,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reciprocal_of_reciprocal_is_itself_for_symmetric_types() {
        for edge_type in [
            EdgeType::Collaborator,
            EdgeType::Friend,
            EdgeType::Competitor,
            EdgeType::Enemy,
        ] {
            assert_eq!(edge_type.reciprocal().reciprocal(), edge_type);
        }
    }

    #[test]
    fn mentor_and_follower_are_complementary() {
        assert_eq!(EdgeType::Mentor.reciprocal(), EdgeType::Follower);
        assert_eq!(EdgeType::Follower.reciprocal(), EdgeType::Mentor);
    }

    #[test]
    fn every_edge_type_allows_exactly_three_kinds() {
        for edge_type in EdgeType::ALL {
            assert_eq!(edge_type.allowed_interactions().len(), 3);
        }
    }
}

use weave_graph::InteractionKind;

/// Maps a flavor kind drawn from an edge type's allowed-interactions
/// palette, plus the success/failure outcome of attempting it, onto the
/// smaller set of feedback kinds the neural web's strength-update table
/// actually recognizes. `collaboration` already appears in both
/// vocabularies and passes through unchanged; the enemy edge's
/// confrontational kinds always resolve to `conflict` regardless of
/// outcome, since a hostile exchange has no "successful" framing.
/// Everything else resolves to `positive_feedback` on success and
/// `negative_feedback` on failure.
pub fn resolve_feedback_kind(flavor_kind: InteractionKind, success: bool) -> InteractionKind {
    match flavor_kind {
        InteractionKind::Collaboration => InteractionKind::Collaboration,
        InteractionKind::Conflict | InteractionKind::Confrontation | InteractionKind::Undermining => {
            InteractionKind::Conflict
        }
        _ if success => InteractionKind::PositiveFeedback,
        _ => InteractionKind::NegativeFeedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaboration_passes_through() {
        assert_eq!(
            resolve_feedback_kind(InteractionKind::Collaboration, true),
            InteractionKind::Collaboration
        );
    }

    #[test]
    fn enemy_kinds_always_resolve_to_conflict() {
        assert_eq!(
            resolve_feedback_kind(InteractionKind::Confrontation, true),
            InteractionKind::Conflict
        );
        assert_eq!(
            resolve_feedback_kind(InteractionKind::Confrontation, false),
            InteractionKind::Conflict
        );
    }

    #[test]
    fn unmapped_kinds_follow_success() {
        assert_eq!(
            resolve_feedback_kind(InteractionKind::Mentoring, true),
            InteractionKind::PositiveFeedback
        );
        assert_eq!(
            resolve_feedback_kind(InteractionKind::Mentoring, false),
            InteractionKind::NegativeFeedback
        );
    }
}

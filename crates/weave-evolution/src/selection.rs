use weave_core::{random_provider, Genome};

/// Samples `tournament_size` distinct individuals uniformly from
/// `cohort` (without replacement within the tournament) and returns the
/// index of the one with maximum `overall` fitness. Ties keep the
/// first-sampled index.
///
/// Panics if `cohort` is empty or `tournament_size` exceeds the cohort
/// length; `SimulationConfig::validated` is expected to have already
/// ruled that configuration out before this is ever called.
pub fn tournament_select(cohort: &[Genome], tournament_size: usize) -> usize {
    assert!(!cohort.is_empty(), "cannot select from an empty cohort");
    assert!(
        tournament_size <= cohort.len(),
        "tournament_size cannot exceed cohort size"
    );

    let sampled = random_provider::sample_indices(0..cohort.len(), tournament_size);
    let mut best = sampled[0];
    for &index in &sampled[1..] {
        if cohort[index].fitness.overall > cohort[best].fitness.overall {
            best = index;
        }
    }
    best
}

/// Selects two parent indices for crossover via independent tournament
/// draws, resampling the second draw if it coincides with the first and
/// the cohort has more than one individual.
pub fn select_parents(cohort: &[Genome], tournament_size: usize) -> (usize, usize) {
    let first = tournament_select(cohort, tournament_size);
    if cohort.len() == 1 {
        return (first, first);
    }

    let mut second = tournament_select(cohort, tournament_size);
    while second == first {
        second = tournament_select(cohort, tournament_size);
    }
    (first, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cohort_with_overalls(overalls: &[f32]) -> Vec<Genome> {
        overalls
            .iter()
            .enumerate()
            .map(|(i, &overall)| {
                let mut genome = Genome::random(format!("agent-{i}"), "genesis");
                genome.fitness.overall = overall;
                genome
            })
            .collect()
    }

    #[test]
    fn tournament_of_whole_cohort_always_returns_the_max() {
        let cohort = cohort_with_overalls(&[0.1, 0.9, 0.3, 0.2]);
        for _ in 0..20 {
            let winner = tournament_select(&cohort, cohort.len());
            assert_eq!(winner, 1);
        }
    }

    #[test]
    fn select_parents_returns_distinct_indices_when_possible() {
        let cohort = cohort_with_overalls(&[0.1, 0.9, 0.3, 0.2]);
        for _ in 0..20 {
            let (a, b) = select_parents(&cohort, 3);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn single_individual_cohort_selects_itself_twice() {
        let cohort = cohort_with_overalls(&[0.5]);
        let (a, b) = select_parents(&cohort, 1);
        assert_eq!((a, b), (0, 0));
    }
}

use weave_core::{Genome, SimulationConfig};
use weave_utils::SmallStr;

use crate::crossover::crossover;
use crate::mutation::mutate;
use crate::selection::select_parents;

/// Advances one cohort to the next generation:
///
/// 1. Sort the cohort descending by `overall` fitness.
/// 2. Carry the top `floor(N * elite_ratio)` individuals forward unchanged.
/// 3. Fill the remainder by selecting two parents via tournament
///    selection, crossing them over, then mutating the child; child ids
///    follow `gen_{next_generation}_{index}`.
/// 4. The result always has exactly `N` individuals, where `N` is the
///    size of `cohort`.
///
/// `reproduction_threshold` is never consulted here — it is a purely
/// advisory gate for callers deciding whether an individual is fit to
/// reproduce at all, not a constraint on this algorithm.
pub fn evolve(cohort: &[Genome], config: &SimulationConfig) -> Vec<Genome> {
    let population_size = cohort.len();
    if population_size == 0 {
        tracing::warn!("evolve called on an empty cohort, returning empty");
        return Vec::new();
    }

    let mut sorted: Vec<&Genome> = cohort.iter().collect();
    sorted.sort_by(|a, b| b.fitness.overall.total_cmp(&a.fitness.overall));

    let elite_count = ((population_size as f32) * config.elite_ratio).floor() as usize;
    let elite_count = elite_count.min(population_size);

    let next_generation = cohort.iter().map(|g| g.generation).max().unwrap_or(0) + 1;

    let mut next_cohort: Vec<Genome> = sorted[..elite_count].iter().map(|g| (*g).clone()).collect();

    let mut index = elite_count;
    while next_cohort.len() < population_size {
        let (parent_one_idx, parent_two_idx) = select_parents(cohort, config.tournament_size);
        let child_id: SmallStr = format!("gen_{next_generation}_{index}").into();
        let child = crossover(
            &cohort[parent_one_idx],
            &cohort[parent_two_idx],
            child_id,
            config.crossover_rate,
        );
        let child = mutate(&child, config.mutation_rate);
        next_cohort.push(child);
        index += 1;
    }

    tracing::debug!(
        generation = next_generation,
        elite_count,
        population_size,
        "advanced cohort to next generation"
    );

    next_cohort
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
    fn preserves_cohort_size() {
        let cohort = cohort_with_overalls(&[0.9, 0.8, 0.1, 0.2]);
        let config = SimulationConfig {
            elite_ratio: 0.5,
            tournament_size: 3,
            ..SimulationConfig::default()
        };
        let next = evolve(&cohort, &config);
        assert_eq!(next.len(), cohort.len());
    }

    #[test]
    fn elite_ratio_half_keeps_top_two_unchanged() {
        let cohort = cohort_with_overalls(&[0.9, 0.8, 0.1, 0.2]);
        let config = SimulationConfig {
            elite_ratio: 0.5,
            tournament_size: 3,
            population_size: 4,
            ..SimulationConfig::default()
        };
        let next = evolve(&cohort, &config);

        assert_eq!(next[0].agent_id, cohort[0].agent_id);
        assert_eq!(next[0].fitness.overall, 0.9);
        assert_eq!(next[1].agent_id, cohort[1].agent_id);
        assert_eq!(next[1].fitness.overall, 0.8);

        for child in &next[2..] {
            assert_eq!(child.generation, 1);
            assert_eq!(child.parent_ids.len(), 2);
        }
    }

    #[test]
    fn generation_advances_past_the_oldest_parent() {
        let mut cohort = cohort_with_overalls(&[0.9, 0.8, 0.1, 0.2]);
        cohort[0].generation = 5;
        let config = SimulationConfig {
            elite_ratio: 0.0,
            tournament_size: 3,
            ..SimulationConfig::default()
        };
        let next = evolve(&cohort, &config);
        for child in &next {
            assert_eq!(child.generation, 6);
        }
    }
}

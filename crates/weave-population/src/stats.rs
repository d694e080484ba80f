use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use weave_core::{Domain, Genome, Statistic};

/// The four summary numbers of a single trait's distribution across a
/// cohort, dropping the higher moments `Statistic` also tracks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitDistribution {
    pub mean: f32,
    pub std_dev: f32,
    pub min: f32,
    pub max: f32,
}

impl From<&Statistic> for TraitDistribution {
    fn from(stat: &Statistic) -> Self {
        TraitDistribution {
            mean: stat.mean(),
            std_dev: if stat.count() > 1 { stat.std_dev() } else { 0.0 },
            min: stat.min(),
            max: stat.max(),
        }
    }
}

/// Snapshot of one generation's cohort: fitness distribution, per-domain
/// diversity (the mean of each domain's trait standard deviations),
/// per-trait distributions across all 24 traits, and the reproduction
/// potential (agents whose overall fitness already clears the
/// reproduction threshold).
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: u64,
    pub cohort_size: usize,
    pub fitness: Statistic,
    pub diversity_by_domain: HashMap<String, f32>,
    pub trait_distributions: HashMap<String, TraitDistribution>,
    pub reproduction_potential_count: usize,
    pub reproduction_potential_ratio: f32,
    pub mean_generation: f32,
    pub max_generation: u64,
}

pub fn compute_generation_stats(generation: u64, cohort: &[Genome], reproduction_threshold: f32) -> GenerationStats {
    let cohort_size = cohort.len();

    let fitness: Statistic = cohort.iter().map(|g| g.fitness.overall).collect();

    let mut trait_stats: HashMap<String, Statistic> = HashMap::new();
    for genome in cohort {
        for (domain, trait_name, value) in genome.domains.numeric_traits() {
            let key = format!("{}.{}", domain.name(), trait_name);
            trait_stats.entry(key).or_default().add(value);
        }
    }

    let trait_distributions: HashMap<String, TraitDistribution> = trait_stats
        .iter()
        .map(|(key, stat)| (key.clone(), TraitDistribution::from(stat)))
        .collect();

    let diversity_by_domain = Domain::ALL
        .iter()
        .map(|domain| {
            let prefix = format!("{}.", domain.name());
            let domain_std_devs: Vec<f32> = trait_distributions
                .iter()
                .filter(|(key, _)| key.starts_with(&prefix))
                .map(|(_, dist)| dist.std_dev)
                .collect();
            let mean_std_dev = if domain_std_devs.is_empty() {
                0.0
            } else {
                domain_std_devs.iter().sum::<f32>() / domain_std_devs.len() as f32
            };
            (domain.name().to_string(), mean_std_dev)
        })
        .collect();

    let reproduction_potential_count = cohort
        .iter()
        .filter(|g| g.fitness.can_reproduce(reproduction_threshold))
        .count();
    let reproduction_potential_ratio = if cohort_size == 0 {
        0.0
    } else {
        reproduction_potential_count as f32 / cohort_size as f32
    };

    let mean_generation = if cohort_size == 0 {
        0.0
    } else {
        cohort.iter().map(|g| g.generation as f32).sum::<f32>() / cohort_size as f32
    };
    let max_generation = cohort.iter().map(|g| g.generation).max().unwrap_or(0);

    GenerationStats {
        generation,
        cohort_size,
        fitness,
        diversity_by_domain,
        trait_distributions,
        reproduction_potential_count,
        reproduction_potential_ratio,
        mean_generation,
        max_generation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cohort_yields_zeroed_stats() {
        let stats = compute_generation_stats(0, &[], 0.7);
        assert_eq!(stats.cohort_size, 0);
        assert_eq!(stats.reproduction_potential_ratio, 0.0);
        assert_eq!(stats.max_generation, 0);
    }

    #[test]
    fn trait_distributions_cover_all_24_traits() {
        let cohort = vec![Genome::random("a", "genesis"), Genome::random("b", "genesis")];
        let stats = compute_generation_stats(0, &cohort, 0.7);
        assert_eq!(stats.trait_distributions.len(), 24);
        assert_eq!(stats.diversity_by_domain.len(), 5);
    }

    #[test]
    fn reproduction_potential_counts_high_fitness_agents() {
        let mut high = Genome::random("a", "genesis");
        high.fitness.overall = 0.9;
        let mut low = Genome::random("b", "genesis");
        low.fitness.overall = 0.2;
        let cohort = vec![high, low];
        let stats = compute_generation_stats(0, &cohort, 0.7);
        assert_eq!(stats.reproduction_potential_count, 1);
        assert_eq!(stats.reproduction_potential_ratio, 0.5);
    }
}

use serde::{Deserialize, Serialize};
use weave_error::{WeaveError, WeaveResult};

/// The nine configuration options the core recognizes, validated once at
/// construction. An out-of-range option is an `InvalidConfig`-class
/// failure (`ConfigError`), fatal at construction rather than recovered.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub population_size: usize,
    pub elite_ratio: f32,
    pub mutation_rate: f32,
    pub crossover_rate: f32,
    pub generation_cycles: u64,
    pub event_probability: f32,
    pub min_community_cohesion: f32,
    pub tournament_size: usize,
    pub reproduction_threshold: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            population_size: 50,
            elite_ratio: 0.2,
            mutation_rate: 0.1,
            crossover_rate: 0.7,
            generation_cycles: 100,
            event_probability: 0.1,
            min_community_cohesion: 0.3,
            tournament_size: 3,
            reproduction_threshold: 0.7,
        }
    }
}

impl SimulationConfig {
    pub fn validated(self) -> WeaveResult<Self> {
        fn unit(name: &str, value: f32) -> WeaveResult<()> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(WeaveError::ConfigError {
                    message: format!("{name} = {value} must be in [0,1]").into(),
                })
            }
        }

        unit("elite_ratio", self.elite_ratio)?;
        unit("mutation_rate", self.mutation_rate)?;
        unit("crossover_rate", self.crossover_rate)?;
        unit("event_probability", self.event_probability)?;
        unit("min_community_cohesion", self.min_community_cohesion)?;
        unit("reproduction_threshold", self.reproduction_threshold)?;

        if self.population_size == 0 {
            return Err(WeaveError::ConfigError {
                message: "population_size must be >= 1".into(),
            });
        }
        if self.generation_cycles == 0 {
            return Err(WeaveError::ConfigError {
                message: "generation_cycles must be >= 1".into(),
            });
        }
        if self.tournament_size == 0 {
            return Err(WeaveError::ConfigError {
                message: "tournament_size must be >= 1".into(),
            });
        }
        if self.tournament_size > self.population_size {
            return Err(WeaveError::ConfigError {
                message: format!(
                    "tournament_size ({}) cannot exceed population_size ({})",
                    self.tournament_size, self.population_size
                )
                .into(),
            });
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(SimulationConfig::default().validated().is_ok());
    }

    #[test]
    fn rejects_out_of_range_elite_ratio() {
        let config = SimulationConfig {
            elite_ratio: 1.5,
            ..SimulationConfig::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn rejects_zero_population() {
        let config = SimulationConfig {
            population_size: 0,
            ..SimulationConfig::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn rejects_tournament_larger_than_population() {
        let config = SimulationConfig {
            population_size: 2,
            tournament_size: 3,
            ..SimulationConfig::default()
        };
        assert!(config.validated().is_err());
    }
}

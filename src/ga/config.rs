//! Genetic algorithm parameters.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

/// Parameters for [`RouteOptimizer`](super::RouteOptimizer).
///
/// # Examples
///
/// ```
/// use u_shuttle::ga::TspConfig;
///
/// let config = TspConfig::default()
///     .with_population_size(60)
///     .with_generations(120)
///     .with_seed(7);
/// assert_eq!(config.population_size, 60);
/// assert_eq!(config.elite_count(), 3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TspConfig {
    /// Individuals per generation.
    pub population_size: usize,
    /// Number of generations to evolve.
    pub generations: usize,
    /// Probability of order crossover per child.
    pub crossover_rate: f64,
    /// Probability of inversion mutation per child.
    pub mutation_rate: f64,
    /// Fraction of the population copied unchanged into the next generation.
    pub elitism_rate: f64,
    /// Candidates per tournament (capped at the population size).
    pub tournament_size: usize,
    /// Fixed seed for reproducible runs; `None` draws a fresh one per run.
    pub seed: Option<u64>,
    /// Evaluate individuals on the rayon pool.
    pub parallel: bool,
}

impl Default for TspConfig {
    fn default() -> Self {
        Self {
            population_size: 250,
            generations: 500,
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            elitism_rate: 0.05,
            tournament_size: 3,
            seed: None,
            parallel: true,
        }
    }
}

impl TspConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the elitism fraction.
    pub fn with_elitism_rate(mut self, rate: f64) -> Self {
        self.elitism_rate = rate;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Number of elites carried per generation: `⌊population · elitism⌋`.
    pub fn elite_count(&self) -> usize {
        ((self.population_size as f64 * self.elitism_rate).floor() as usize)
            .min(self.population_size)
    }

    /// Checks that probabilities lie in `[0, 1]` and sizes are positive.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(RoutingError::invalid("population size must be positive"));
        }
        if self.tournament_size == 0 {
            return Err(RoutingError::invalid("tournament size must be positive"));
        }
        for (name, p) in [
            ("crossover rate", self.crossover_rate),
            ("mutation rate", self.mutation_rate),
            ("elitism rate", self.elitism_rate),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(RoutingError::invalid(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }
        Ok(())
    }
}

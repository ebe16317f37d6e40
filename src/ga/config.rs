//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use serde::{Deserialize, Serialize};

use crate::error::{SudokuError, SudokuResult};

/// Configuration for the Sudoku genetic algorithm.
///
/// # Defaults
///
/// ```
/// use sudoku_ga::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 200);
/// assert_eq!(config.max_generations, 2000);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use sudoku_ga::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(50)
///     .with_max_generations(300)
///     .with_mutation_rate(0.1)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
///
/// Builders store values as given; out-of-range values are reported by
/// [`validate`](Self::validate), which the runner calls before the first
/// generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Number of candidates in every generation.
    pub population_size: usize,

    /// Generation budget.
    pub max_generations: usize,

    /// Base probability of mutating an offspring (0.0–1.0), before
    /// stagnation boosts.
    pub mutation_rate: f64,

    /// Fraction of the population copied unchanged into the next generation
    /// (0.0–1.0). At least one elite is always kept.
    ///
    /// The same ratio sizes the elite head of the mating pool.
    pub elite_ratio: f64,

    /// Probability of applying block crossover to a pair of parents.
    ///
    /// When crossover is skipped both parents pass through unchanged.
    pub crossover_rate: f64,

    /// Generations without improvement after which the mutation rate is
    /// raised to [`boosted_mutation_rate`](Self::boosted_mutation_rate).
    ///
    /// Past twice this value the rate becomes
    /// [`severe_mutation_rate`](Self::severe_mutation_rate). A run that ends
    /// on its budget while past the threshold reports
    /// [`TerminationCause::Stagnation`](super::TerminationCause::Stagnation).
    pub stagnation_threshold: usize,

    /// Mutation rate once the stagnation threshold is exceeded.
    pub boosted_mutation_rate: f64,

    /// Mutation rate once twice the stagnation threshold is exceeded.
    pub severe_mutation_rate: f64,

    /// Whether to score candidates in parallel using rayon.
    ///
    /// Has no effect without the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked at the start of each generation; exceeding it ends the run
    /// with [`TerminationCause::Cancelled`](super::TerminationCause::Cancelled).
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 200,
            max_generations: 2000,
            mutation_rate: 0.05,
            elite_ratio: 0.1,
            crossover_rate: 0.9,
            stagnation_threshold: 500,
            boosted_mutation_rate: 0.5,
            severe_mutation_rate: 0.9,
            parallel: cfg!(feature = "parallel"),
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the base mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the elite ratio.
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the stagnation threshold.
    pub fn with_stagnation_threshold(mut self, generations: usize) -> Self {
        self.stagnation_threshold = generations;
        self
    }

    /// Sets the boosted and severe mutation rates used under stagnation.
    pub fn with_stagnation_rates(mut self, boosted: f64, severe: f64) -> Self {
        self.boosted_mutation_rate = boosted;
        self.severe_mutation_rate = severe;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Size of the mating pool parents are drawn from.
    pub fn pool_size(&self) -> usize {
        (self.population_size / 2).max(2)
    }

    /// Number of candidates copied verbatim into the next generation.
    pub fn elite_count(&self) -> usize {
        ((self.population_size as f64 * self.elite_ratio) as usize)
            .max(1)
            .min(self.population_size)
    }

    /// Mutation rate for a generation with the given stagnation counter.
    ///
    /// ```
    /// use sudoku_ga::ga::GaConfig;
    ///
    /// let config = GaConfig::default();
    /// assert_eq!(config.effective_mutation_rate(500), 0.05);
    /// assert_eq!(config.effective_mutation_rate(501), 0.5);
    /// assert_eq!(config.effective_mutation_rate(1001), 0.9);
    /// ```
    pub fn effective_mutation_rate(&self, stagnation: usize) -> f64 {
        if stagnation > self.stagnation_threshold.saturating_mul(2) {
            self.severe_mutation_rate
        } else if stagnation > self.stagnation_threshold {
            self.boosted_mutation_rate
        } else {
            self.mutation_rate
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// [`SudokuError::InvalidConfiguration`] naming the first offending
    /// parameter.
    pub fn validate(&self) -> SudokuResult<()> {
        if self.population_size == 0 {
            return Err(invalid("population_size must be at least 1"));
        }
        if self.max_generations == 0 {
            return Err(invalid("max_generations must be at least 1"));
        }
        for (name, value) in [
            ("mutation_rate", self.mutation_rate),
            ("elite_ratio", self.elite_ratio),
            ("crossover_rate", self.crossover_rate),
            ("boosted_mutation_rate", self.boosted_mutation_rate),
            ("severe_mutation_rate", self.severe_mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(&format!("{name} must be within [0, 1], got {value}")));
            }
        }
        if self.stagnation_threshold == 0 {
            return Err(invalid("stagnation_threshold must be at least 1"));
        }
        if self.time_limit_ms == Some(0) {
            return Err(invalid("time_limit_ms must be positive or None"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> SudokuError {
    SudokuError::InvalidConfiguration(msg.to_string())
}

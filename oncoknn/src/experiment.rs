// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::algorithms::KNN;
use crate::data::Dataset;
use crate::errors::ExperimentError;
use crate::metrics::{evaluate, ConfusionReport};
use crate::scalers::{scale, ScalingStrategy};
use crate::split::{split, Split};

/// What the runner does when one configuration fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Record the failure on that configuration's outcome and keep going.
    #[default]
    SkipAndContinue,
    /// Yield the failing outcome, then stop.
    AbortOnFirstError,
}

fn default_strategies() -> Vec<ScalingStrategy> {
    vec![ScalingStrategy::MinMax, ScalingStrategy::ZScore]
}

fn default_k_values() -> Vec<usize> {
    vec![3]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub holdout_size: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_strategies")]
    pub scaling_strategies: Vec<ScalingStrategy>,
    #[serde(default = "default_k_values")]
    pub k_values: Vec<usize>,
    #[serde(default)]
    pub error_policy: ErrorPolicy,
    #[serde(default)]
    pub parallel: bool,
}

impl ExperimentConfig {
    pub fn new(holdout_size: usize) -> Self {
        ExperimentConfig {
            holdout_size,
            seed: None,
            scaling_strategies: default_strategies(),
            k_values: default_k_values(),
            error_policy: ErrorPolicy::default(),
            parallel: false,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_strategies(mut self, strategies: Vec<ScalingStrategy>) -> Self {
        self.scaling_strategies = strategies;
        self
    }

    pub fn with_k_values(mut self, k_values: Vec<usize>) -> Self {
        self.k_values = k_values;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<(), ExperimentError> {
        if self.scaling_strategies.is_empty() {
            return Err(ExperimentError::EmptyConfiguration("scaling strategies"));
        }
        if self.k_values.is_empty() {
            return Err(ExperimentError::EmptyConfiguration("k values"));
        }
        Ok(())
    }
}

/// The result of one (strategy, k) configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub strategy: ScalingStrategy,
    pub k: usize,
    pub result: Result<ConfusionReport, ExperimentError>,
}

impl RunOutcome {
    pub fn accuracy(&self) -> Option<f64> {
        self.result.as_ref().ok().map(ConfusionReport::accuracy)
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// One-line report, e.g. `k=3, strategy=minmax: accuracy=0.9565`.
    pub fn summary(&self) -> String {
        match &self.result {
            Ok(report) => format!(
                "k={}, strategy={}: accuracy={:.4}",
                self.k,
                self.strategy,
                report.accuracy()
            ),
            Err(e) => format!("k={}, strategy={}: failed: {}", self.k, self.strategy, e),
        }
    }
}

/// Scaled train and test partitions for one strategy.
#[derive(Debug, Clone)]
struct Partitions {
    train: Dataset,
    test: Dataset,
}

/// A batch of KNN classification runs sharing one dataset and one train/test split.
#[derive(Debug, Clone)]
pub struct Experiment<'a> {
    dataset: &'a Dataset,
    split: Split,
    config: ExperimentConfig,
}

impl<'a> Experiment<'a> {
    /// Draws the split from the configured holdout size and seed.
    pub fn new(dataset: &'a Dataset, config: ExperimentConfig) -> Result<Self, ExperimentError> {
        config.validate()?;
        let split = split(dataset.n_samples(), config.holdout_size, config.seed)?;
        Self::with_split(dataset, split, config)
    }

    /// Uses an existing split, e.g. one shared with another experiment.
    pub fn with_split(
        dataset: &'a Dataset,
        split: Split,
        config: ExperimentConfig,
    ) -> Result<Self, ExperimentError> {
        config.validate()?;
        if split.n_samples() != dataset.n_samples() {
            return Err(ExperimentError::SplitMismatch {
                split: split.n_samples(),
                dataset: dataset.n_samples(),
            });
        }

        info!(
            "Experiment over {} samples (train={}, test={}): {} strategies x {} k values",
            dataset.n_samples(),
            split.train().len(),
            split.test().len(),
            config.scaling_strategies.len(),
            config.k_values.len()
        );
        Ok(Experiment { dataset, split, config })
    }

    pub fn split(&self) -> &Split {
        &self.split
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Lazily runs every configuration: strategies in the configured order, and for
    /// each strategy the k values in the configured order.
    pub fn runs(&self) -> Runs<'a> {
        self.clone().into_iter()
    }

    /// Runs every configuration on the rayon thread pool.
    ///
    /// The returned outcomes are in the same order, and obey the same error policy,
    /// as [`Experiment::runs`].
    pub fn run_parallel(&self) -> Vec<RunOutcome> {
        let partitions: Vec<_> = self
            .config
            .scaling_strategies
            .par_iter()
            .map(|&strategy| self.partition(strategy))
            .collect();

        let configurations: Vec<(usize, usize)> = (0..partitions.len())
            .flat_map(|s| self.config.k_values.iter().map(move |&k| (s, k)))
            .collect();

        let mut outcomes: Vec<RunOutcome> = configurations
            .into_par_iter()
            .map(|(s, k)| self.outcome(self.config.scaling_strategies[s], k, &partitions[s]))
            .collect();

        if self.config.error_policy == ErrorPolicy::AbortOnFirstError {
            if let Some(first_failure) = outcomes.iter().position(|o| !o.is_success()) {
                outcomes.truncate(first_failure + 1);
            }
        }
        outcomes
    }

    fn partition(&self, strategy: ScalingStrategy) -> Result<Partitions, ExperimentError> {
        let scaled = scale(self.dataset, strategy)?;
        Ok(Partitions {
            train: scaled.dataset().select(self.split.train()),
            test: scaled.dataset().select(self.split.test()),
        })
    }

    fn outcome(
        &self,
        strategy: ScalingStrategy,
        k: usize,
        partitions: &Result<Partitions, ExperimentError>,
    ) -> RunOutcome {
        let result = partitions.as_ref().map_err(Clone::clone).and_then(|p| self.classify(p, k));
        match &result {
            Ok(report) => {
                debug!("k={}, strategy={}: accuracy={:.4}", k, strategy, report.accuracy())
            }
            Err(e) => warn!("k={}, strategy={} failed: {}", k, strategy, e),
        }
        RunOutcome { strategy, k, result }
    }

    fn classify(
        &self,
        partitions: &Partitions,
        k: usize,
    ) -> Result<ConfusionReport, ExperimentError> {
        let mut model = KNN::new().k(k).parallel(self.config.parallel).build();
        model.fit(partitions.train.features(), partitions.train.labels())?;
        let predictions = model.predict(partitions.test.features())?;
        Ok(evaluate(partitions.test.labels(), &predictions)?)
    }
}

impl<'a> IntoIterator for Experiment<'a> {
    type Item = RunOutcome;
    type IntoIter = Runs<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Runs { experiment: self, strategy_index: 0, k_index: 0, partitions: None, done: false }
    }
}

/// Lazy iterator over the outcomes of an [`Experiment`].
///
/// Each strategy's dataset is scaled once, when its first configuration is reached.
pub struct Runs<'a> {
    experiment: Experiment<'a>,
    strategy_index: usize,
    k_index: usize,
    partitions: Option<Result<Partitions, ExperimentError>>,
    done: bool,
}

impl Iterator for Runs<'_> {
    type Item = RunOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let config = &self.experiment.config;

        if self.k_index == config.k_values.len() {
            self.strategy_index += 1;
            self.k_index = 0;
            self.partitions = None;
        }
        let strategy = *config.scaling_strategies.get(self.strategy_index)?;
        let k = config.k_values[self.k_index];
        self.k_index += 1;

        let experiment = &self.experiment;
        let partitions = self.partitions.get_or_insert_with(|| experiment.partition(strategy));
        let outcome = experiment.outcome(strategy, k, partitions);

        if !outcome.is_success() && config.error_policy == ErrorPolicy::AbortOnFirstError {
            self.done = true;
        }
        Some(outcome)
    }
}

/// Runs KNN classification over every combination of `strategies` and `k_values`,
/// sharing one split of `dataset` drawn from `holdout_size` and `seed`.
pub fn run<'a>(
    dataset: &'a Dataset,
    holdout_size: usize,
    seed: Option<u64>,
    strategies: &[ScalingStrategy],
    k_values: &[usize],
) -> Result<Runs<'a>, ExperimentError> {
    let mut config = ExperimentConfig::new(holdout_size)
        .with_strategies(strategies.to_vec())
        .with_k_values(k_values.to_vec());
    config.seed = seed;
    Ok(Experiment::new(dataset, config)?.into_iter())
}

/// The successful outcome with the highest accuracy; the earliest one wins ties.
pub fn best_outcome(outcomes: &[RunOutcome]) -> Option<&RunOutcome> {
    let mut best: Option<(&RunOutcome, f64)> = None;
    for outcome in outcomes {
        if let Some(accuracy) = outcome.accuracy() {
            if best.map_or(true, |(_, best_accuracy)| accuracy > best_accuracy) {
                best = Some((outcome, accuracy));
            }
        }
    }
    best.map(|(outcome, _)| outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Diagnosis::{Benign, Malignant};
    use crate::errors::ClassifierError;
    use ndarray::array;

    fn clustered_dataset() -> Dataset {
        let features = array![
            [1.0, 10.0],
            [1.2, 11.0],
            [0.8, 9.5],
            [1.1, 10.4],
            [5.0, 50.0],
            [5.2, 52.0],
            [4.9, 48.0],
            [5.1, 51.0],
        ];
        let labels = vec![Benign, Benign, Benign, Benign, Malignant, Malignant, Malignant, Malignant];
        Dataset::new(features, labels).unwrap()
    }

    #[test]
    fn runs_iterate_strategies_then_k_values() {
        let dataset = clustered_dataset();
        let config = ExperimentConfig::new(2)
            .with_seed(11)
            .with_strategies(vec![ScalingStrategy::ZScore, ScalingStrategy::MinMax])
            .with_k_values(vec![1, 3]);
        let order: Vec<_> = Experiment::new(&dataset, config)
            .unwrap()
            .runs()
            .map(|o| (o.strategy, o.k))
            .collect();

        assert_eq!(
            order,
            vec![
                (ScalingStrategy::ZScore, 1),
                (ScalingStrategy::ZScore, 3),
                (ScalingStrategy::MinMax, 1),
                (ScalingStrategy::MinMax, 3),
            ]
        );
    }

    #[test]
    fn failed_configuration_is_skipped_by_default() {
        let dataset = clustered_dataset();
        let config = ExperimentConfig::new(2).with_seed(5).with_k_values(vec![1, 0, 3]);
        let outcomes: Vec<_> = Experiment::new(&dataset, config).unwrap().runs().collect();

        assert_eq!(outcomes.len(), 6);
        assert!(matches!(
            outcomes[1].result,
            Err(ExperimentError::Classifier(ClassifierError::InvalidK { k: 0, n_train: 6 }))
        ));
        assert!(outcomes[2].is_success());
        assert_eq!(outcomes.iter().filter(|o| o.is_success()).count(), 4);
    }

    #[test]
    fn abort_policy_stops_after_first_failure() {
        let dataset = clustered_dataset();
        let config = ExperimentConfig::new(2)
            .with_seed(5)
            .with_k_values(vec![1, 99, 3])
            .with_error_policy(ErrorPolicy::AbortOnFirstError);
        let experiment = Experiment::new(&dataset, config).unwrap();

        let outcomes: Vec<_> = experiment.runs().collect();
        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[1].is_success());
        assert_eq!(experiment.run_parallel(), outcomes);
    }

    #[test]
    fn parallel_run_matches_lazy_run() {
        let dataset = clustered_dataset();
        let config = ExperimentConfig::new(3).with_seed(42).with_k_values(vec![1, 3, 5, 0]);
        let experiment = Experiment::new(&dataset, config).unwrap();

        let lazy: Vec<_> = experiment.runs().collect();
        assert_eq!(experiment.run_parallel(), lazy);
    }

    #[test]
    fn split_is_shared_across_configurations() {
        let dataset = clustered_dataset();
        let config = ExperimentConfig::new(2).with_seed(9).with_k_values(vec![1, 3]);
        let experiment = Experiment::new(&dataset, config.clone()).unwrap();
        let again = Experiment::new(&dataset, config).unwrap();

        assert_eq!(experiment.split(), again.split());
        for outcome in experiment.runs() {
            assert_eq!(outcome.result.unwrap().total(), 2);
        }
    }

    #[test]
    fn invalid_holdout_fails_the_experiment() {
        let dataset = clustered_dataset();
        let result = Experiment::new(&dataset, ExperimentConfig::new(8));
        assert!(matches!(result, Err(ExperimentError::Split(_))));
    }

    #[test]
    fn empty_configuration_is_rejected() {
        let dataset = clustered_dataset();
        let no_k = ExperimentConfig::new(2).with_k_values(vec![]);
        assert!(matches!(
            Experiment::new(&dataset, no_k),
            Err(ExperimentError::EmptyConfiguration("k values"))
        ));

        let no_strategies = ExperimentConfig::new(2).with_strategies(vec![]);
        assert!(matches!(
            Experiment::new(&dataset, no_strategies),
            Err(ExperimentError::EmptyConfiguration("scaling strategies"))
        ));
    }

    #[test]
    fn with_split_rejects_foreign_split() {
        let dataset = clustered_dataset();
        let foreign = split(20, 4, Some(1)).unwrap();
        let result = Experiment::with_split(&dataset, foreign, ExperimentConfig::new(4));
        assert!(matches!(result, Err(ExperimentError::SplitMismatch { split: 20, dataset: 8 })));
    }

    #[test]
    fn summary_lines() {
        let report = evaluate(&[Benign, Malignant], &[Benign, Malignant]).unwrap();
        let ok = RunOutcome { strategy: ScalingStrategy::MinMax, k: 3, result: Ok(report) };
        assert_eq!(ok.summary(), "k=3, strategy=minmax: accuracy=1.0000");

        let failed = RunOutcome {
            strategy: ScalingStrategy::ZScore,
            k: 0,
            result: Err(ClassifierError::InvalidK { k: 0, n_train: 4 }.into()),
        };
        assert!(failed.summary().starts_with("k=0, strategy=zscore: failed: "));
    }

    #[test]
    fn best_outcome_prefers_highest_then_earliest() {
        let perfect = evaluate(&[Benign, Malignant], &[Benign, Malignant]).unwrap();
        let half = evaluate(&[Benign, Malignant], &[Benign, Benign]).unwrap();
        let outcomes = vec![
            RunOutcome { strategy: ScalingStrategy::MinMax, k: 1, result: Ok(half) },
            RunOutcome { strategy: ScalingStrategy::MinMax, k: 3, result: Ok(perfect.clone()) },
            RunOutcome { strategy: ScalingStrategy::ZScore, k: 3, result: Ok(perfect) },
            RunOutcome {
                strategy: ScalingStrategy::ZScore,
                k: 0,
                result: Err(ClassifierError::InvalidK { k: 0, n_train: 4 }.into()),
            },
        ];

        let best = best_outcome(&outcomes).unwrap();
        assert_eq!((best.strategy, best.k), (ScalingStrategy::MinMax, 3));
        assert!(best_outcome(&outcomes[3..]).is_none());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: ExperimentConfig =
            serde_json::from_str(r#"{"holdout_size": 100, "k_values": [1, 5]}"#).unwrap();
        assert_eq!(config.holdout_size, 100);
        assert_eq!(config.seed, None);
        assert_eq!(config.k_values, vec![1, 5]);
        assert_eq!(config.scaling_strategies, default_strategies());
        assert_eq!(config.error_policy, ErrorPolicy::SkipAndContinue);

        let json = serde_json::to_string(&config.clone().with_seed(7)).unwrap();
        assert!(json.contains(r#""scaling_strategies":["minmax","zscore"]"#));
        assert!(json.contains(r#""error_policy":"skip_and_continue""#));
    }
}

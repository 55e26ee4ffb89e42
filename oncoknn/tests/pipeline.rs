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

//! End-to-end tests: load or build a dataset, run an experiment, check the reports.

use std::io::Write;

use oncoknn::data::{load_data, WdbcHeadersLoader};
use oncoknn::ndarray::{array, Axis};
use oncoknn::{
    run, scale, split, Dataset, Diagnosis, ErrorPolicy, Experiment, ExperimentConfig,
    ScalingStrategy,
};
use tempfile::NamedTempFile;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).filter_level(log::LevelFilter::Debug).try_init();
}

/// Six samples in two well separated clusters, labelled by cluster.
fn two_clusters() -> Dataset {
    let features = array![[1.0, 1.0], [1.2, 0.9], [0.9, 1.1], [8.0, 8.0], [8.3, 7.9], [7.8, 8.2]];
    let labels = vec![
        Diagnosis::Benign,
        Diagnosis::Benign,
        Diagnosis::Benign,
        Diagnosis::Malignant,
        Diagnosis::Malignant,
        Diagnosis::Malignant,
    ];
    Dataset::new(features, labels).unwrap()
}

#[test]
fn clustered_holdout_is_recovered_with_k3() {
    init_logging();
    let dataset = two_clusters();

    // Hold out one sample from each cluster so both classes keep two training rows.
    let held_out = (0..)
        .map(|seed| split(dataset.n_samples(), 2, Some(seed)).unwrap())
        .find(|s| {
            let labels: Vec<_> = s.test().iter().map(|&i| dataset.labels()[i]).collect();
            labels[0] != labels[1]
        })
        .unwrap();

    let config = ExperimentConfig::new(2).with_k_values(vec![3]);
    let experiment = Experiment::with_split(&dataset, held_out, config).unwrap();

    let outcomes: Vec<_> = experiment.runs().collect();
    assert_eq!(outcomes.len(), 2);
    for outcome in &outcomes {
        let report = outcome.result.as_ref().unwrap();
        assert_eq!(report.accuracy(), 1.0, "{}", outcome.summary());
        assert_eq!(report.count(Diagnosis::Benign, Diagnosis::Benign), 1);
        assert_eq!(report.count(Diagnosis::Malignant, Diagnosis::Malignant), 1);
    }
}

#[test]
fn run_yields_reproducible_reports_for_a_seed() {
    init_logging();
    let dataset = two_clusters();
    let strategies = [ScalingStrategy::MinMax, ScalingStrategy::ZScore];

    let first: Vec<_> = run(&dataset, 2, Some(42), &strategies, &[1, 3]).unwrap().collect();
    let second: Vec<_> = run(&dataset, 2, Some(42), &strategies, &[1, 3]).unwrap().collect();

    assert_eq!(first, second);
    let summaries: Vec<_> = first.iter().map(|o| o.summary()).collect();
    assert!(summaries[0].starts_with("k=1, strategy=minmax: accuracy="));
    assert!(summaries[3].starts_with("k=3, strategy=zscore: accuracy="));
}

#[test]
fn invalid_k_fails_only_its_configuration() {
    let dataset = two_clusters();
    let strategies = [ScalingStrategy::MinMax];

    let outcomes: Vec<_> = run(&dataset, 2, Some(1), &strategies, &[0, 1, 4, 9]).unwrap().collect();

    let succeeded: Vec<_> = outcomes.iter().map(|o| o.is_success()).collect();
    assert_eq!(succeeded, vec![false, true, true, false]);
}

#[test]
fn abort_policy_ends_the_run_at_the_first_failure() {
    let dataset = two_clusters();
    let config = ExperimentConfig::new(2)
        .with_seed(3)
        .with_k_values(vec![1, 9, 3])
        .with_error_policy(ErrorPolicy::AbortOnFirstError)
        .with_parallel(true);

    let outcomes: Vec<_> = Experiment::new(&dataset, config).unwrap().runs().collect();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[1].k, 9);
}

#[test]
fn scaling_statistics_include_held_out_rows() {
    let dataset = two_clusters();
    let scaled = scale(&dataset, ScalingStrategy::MinMax).unwrap();
    let s = split(dataset.n_samples(), 2, Some(8)).unwrap();

    // Train-only statistics would differ whenever a held-out row holds a column extreme.
    let column = dataset.features().column(0);
    let min = column.fold(f64::INFINITY, |a, &b| a.min(b));
    let max = column.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    for &i in s.test() {
        let expected = (dataset.features()[[i, 0]] - min) / (max - min);
        assert!((scaled.features()[[i, 0]] - expected).abs() < 1e-12);
    }
    assert_eq!(scaled.features().len_of(Axis(0)), dataset.n_samples());
}

#[test]
fn csv_file_to_reports() {
    init_logging();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "id,diagnosis,radius_mean,texture_mean,smoothness_mean").unwrap();
    let rows = [
        "1,B,12.1,14.2,0.081",
        "2,B,11.8,15.0,0.079",
        "3,B,12.5,13.9,0.085",
        "4,B,11.2,14.8,0.080",
        "5,B,12.9,15.3,0.083",
        "6,M,20.3,24.1,0.112",
        "7,M,19.8,23.5,0.109",
        "8,M,21.1,25.0,0.118",
        "9,M,20.6,22.9,0.115",
        "10,M,19.5,24.4,0.111",
    ];
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();

    let dataset = load_data::<WdbcHeadersLoader, _>(file.path()).unwrap();
    assert_eq!(dataset.n_features(), 3);

    let config = ExperimentConfig::new(2).with_seed(2024).with_k_values(vec![1, 3]);
    let outcomes = Experiment::new(&dataset, config).unwrap().run_parallel();

    assert_eq!(outcomes.len(), 4);
    for outcome in &outcomes {
        let report = outcome.result.as_ref().unwrap();
        assert_eq!(report.total(), 2);
        assert_eq!(report.accuracy(), 1.0, "{}", outcome.summary());
    }
}

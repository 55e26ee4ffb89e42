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

use std::fs::File;
use std::io::BufReader;

use log::info;
use oncoknn::{
    best_outcome,
    data::{load_data, WdbcHeadersLoader, WdbcLoader},
    Experiment, ExperimentConfig, ScalingStrategy,
};

const USAGE: &str = "usage: breast_cancer <data.csv> [config.json] [--no-headers]";

fn default_config() -> ExperimentConfig {
    ExperimentConfig::new(100)
        .with_seed(42)
        .with_strategies(vec![ScalingStrategy::MinMax, ScalingStrategy::ZScore])
        .with_k_values((1..=21).step_by(2).collect())
        .with_parallel(true)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut positional = Vec::new();
    let mut headers = true;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--no-headers" => headers = false,
            _ => positional.push(arg),
        }
    }
    let data_path = positional.first().ok_or(USAGE)?;

    let config: ExperimentConfig = match positional.get(1) {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => default_config(),
    };

    let dataset = if headers {
        load_data::<WdbcHeadersLoader, _>(data_path)?
    } else {
        load_data::<WdbcLoader, _>(data_path)?
    };
    info!("Loaded {} samples with {} features", dataset.n_samples(), dataset.n_features());

    let experiment = Experiment::new(&dataset, config)?;
    let outcomes: Vec<_> = if experiment.config().parallel {
        experiment.run_parallel()
    } else {
        experiment.runs().collect()
    };

    for outcome in &outcomes {
        println!("{}", outcome.summary());
    }

    match best_outcome(&outcomes) {
        Some(best) => {
            println!();
            println!("Best: k={}, strategy={}", best.k, best.strategy);
            if let Ok(report) = &best.result {
                println!("{}", report);
            }
        }
        None => println!("No configuration succeeded"),
    }

    Ok(())
}

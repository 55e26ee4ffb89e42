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

//! K-nearest-neighbor classification experiments for tumor measurements.
//!
//! A [`Dataset`] of labelled feature rows is normalized with a [`ScalingStrategy`],
//! split once into training and held-out rows, classified by majority vote of the
//! k nearest training rows, and scored with a [`ConfusionReport`]. An
//! [`Experiment`] repeats this for every combination of strategies and k values.

pub mod algorithms;
pub mod data;
pub mod distance;
pub mod errors;
pub mod experiment;
pub mod metrics;
pub mod scalers;
pub mod split;

pub use ndarray;

pub use algorithms::{classify, Neighbor, KNN};
pub use data::{load_data, DataLoader, Dataset, Diagnosis};
pub use distance::{euclidean, Distance, Euclidean};
pub use errors::{
    ClassifierError, DistanceError, EvaluationError, ExperimentError, ScalerError, SplitError,
};
pub use experiment::{best_outcome, run, ErrorPolicy, Experiment, ExperimentConfig, RunOutcome};
pub use metrics::{evaluate, ConfusionReport};
pub use scalers::{scale, ScaledDataset, Scaler, ScalingStrategy};
pub use split::{split, Split};

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

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScalerError {
    #[error("Input data is empty")]
    EmptyInput,

    #[error("Input data has no feature columns")]
    NoFeatures,

    #[error("Scaler has not been fitted")]
    NotFitted,

    #[error("Dimension mismatch: expected {expected} columns, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplitError {
    #[error("Invalid holdout size {holdout} for {n_samples} samples: expected 0 < holdout < n")]
    InvalidSize { holdout: usize, n_samples: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistanceError {
    #[error("Dimension mismatch: expected vector of length {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("Invalid k={k}: must satisfy 1 <= k <= {n_train}")]
    InvalidK { k: usize, n_train: usize },

    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Training set has {rows} rows but {labels} labels")]
    LabelCountMismatch { rows: usize, labels: usize },

    #[error("Model has not been fitted")]
    NotFitted,

    #[error(transparent)]
    Distance(#[from] DistanceError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("Length mismatch: {expected} actual labels but {actual} predictions")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Cannot evaluate an empty set of predictions")]
    EmptyInput,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExperimentError {
    #[error("Scaler error: {0}")]
    Scaler(#[from] ScalerError),

    #[error("Split error: {0}")]
    Split(#[from] SplitError),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("Experiment configuration has no {0} to run")]
    EmptyConfiguration(&'static str),

    #[error("Split covers {split} samples but the dataset has {dataset}")]
    SplitMismatch { split: usize, dataset: usize },
}

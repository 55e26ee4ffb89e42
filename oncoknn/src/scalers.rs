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

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::data::{Dataset, Diagnosis};
use crate::errors::ScalerError;

pub trait Scaler {
    fn fit(&mut self, x: &Array2<f64>) -> Result<(), ScalerError>;

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ScalerError>;

    fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ScalerError>;

    /// Columns whose fitted spread is zero. These transform to `0.0` for every row.
    fn degenerate_columns(&self) -> Vec<usize>;

    fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>, ScalerError> {
        self.fit(x)?;
        self.transform(x)
    }
}

fn check_fit_input(x: &Array2<f64>) -> Result<(), ScalerError> {
    if x.nrows() == 0 {
        return Err(ScalerError::EmptyInput);
    }
    if x.ncols() == 0 {
        return Err(ScalerError::NoFeatures);
    }
    Ok(())
}

fn check_width(expected: usize, x: &Array2<f64>) -> Result<(), ScalerError> {
    if x.ncols() != expected {
        return Err(ScalerError::DimensionMismatch { expected, actual: x.ncols() });
    }
    Ok(())
}

/// Centres and divides every column; columns with zero spread become all zeros.
fn shift_and_divide(x: &Array2<f64>, offset: &Array1<f64>, spread: &Array1<f64>) -> Array2<f64> {
    let mut out = x - offset;
    for (mut column, &s) in out.axis_iter_mut(Axis(1)).zip(spread.iter()) {
        if s == 0.0 {
            column.fill(0.0);
        } else {
            column.mapv_inplace(|v| v / s);
        }
    }
    out
}

fn zero_columns(spread: &Array1<f64>) -> Vec<usize> {
    spread.iter().enumerate().filter(|(_, s)| **s == 0.0).map(|(i, _)| i).collect()
}

/// Rescales each column to `[0, 1]` with `(x - min) / (max - min)`.
#[derive(Debug, Clone, Default)]
pub struct MinMaxScaler {
    min: Option<Array1<f64>>,
    range: Option<Array1<f64>>,
}

impl MinMaxScaler {
    pub fn new() -> Self {
        MinMaxScaler { min: None, range: None }
    }
}

impl Scaler for MinMaxScaler {
    fn fit(&mut self, x: &Array2<f64>) -> Result<(), ScalerError> {
        check_fit_input(x)?;
        let min = x.fold_axis(Axis(0), f64::INFINITY, |&acc, &v| acc.min(v));
        let max = x.fold_axis(Axis(0), f64::NEG_INFINITY, |&acc, &v| acc.max(v));
        self.range = Some(&max - &min);
        self.min = Some(min);
        Ok(())
    }

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ScalerError> {
        let min = self.min.as_ref().ok_or(ScalerError::NotFitted)?;
        let range = self.range.as_ref().ok_or(ScalerError::NotFitted)?;
        check_width(min.len(), x)?;
        Ok(shift_and_divide(x, min, range))
    }

    fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ScalerError> {
        let min = self.min.as_ref().ok_or(ScalerError::NotFitted)?;
        let range = self.range.as_ref().ok_or(ScalerError::NotFitted)?;
        check_width(min.len(), x)?;
        Ok(x * range + min)
    }

    fn degenerate_columns(&self) -> Vec<usize> {
        self.range.as_ref().map(zero_columns).unwrap_or_default()
    }
}

/// Standardizes each column with `(x - mean) / std`.
///
/// `ddof` is the delta degrees of freedom of the standard deviation: `1.0` (the
/// default) gives the sample standard deviation, `0.0` the population one.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    std: Option<Array1<f64>>,
    ddof: f64,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    pub fn new() -> Self {
        StandardScaler { mean: None, std: None, ddof: 1.0 }
    }

    pub fn with_ddof(mut self, ddof: f64) -> Self {
        self.ddof = ddof.max(0.0);
        self
    }
}

impl Scaler for StandardScaler {
    fn fit(&mut self, x: &Array2<f64>) -> Result<(), ScalerError> {
        check_fit_input(x)?;
        let mean = x.mean_axis(Axis(0)).ok_or(ScalerError::EmptyInput)?;
        // A single row has no sample spread; treat every column as degenerate.
        let mut std = if (x.nrows() as f64) > self.ddof {
            x.var_axis(Axis(0), self.ddof).mapv(f64::sqrt)
        } else {
            Array1::zeros(x.ncols())
        };
        // Rounding in the mean leaves a tiny spread on constant columns.
        for (s, column) in std.iter_mut().zip(x.axis_iter(Axis(1))) {
            if column.iter().all(|&v| v == column[0]) {
                *s = 0.0;
            }
        }
        self.mean = Some(mean);
        self.std = Some(std);
        Ok(())
    }

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ScalerError> {
        let mean = self.mean.as_ref().ok_or(ScalerError::NotFitted)?;
        let std = self.std.as_ref().ok_or(ScalerError::NotFitted)?;
        check_width(mean.len(), x)?;
        Ok(shift_and_divide(x, mean, std))
    }

    fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, ScalerError> {
        let mean = self.mean.as_ref().ok_or(ScalerError::NotFitted)?;
        let std = self.std.as_ref().ok_or(ScalerError::NotFitted)?;
        check_width(mean.len(), x)?;
        Ok(x * std + mean)
    }

    fn degenerate_columns(&self) -> Vec<usize> {
        self.std.as_ref().map(zero_columns).unwrap_or_default()
    }
}

/// The feature normalization applied before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingStrategy {
    MinMax,
    ZScore,
}

impl ScalingStrategy {
    pub fn name(self) -> &'static str {
        match self {
            ScalingStrategy::MinMax => "minmax",
            ScalingStrategy::ZScore => "zscore",
        }
    }

    pub fn scaler(self) -> Box<dyn Scaler + Send> {
        match self {
            ScalingStrategy::MinMax => Box::new(MinMaxScaler::new()),
            ScalingStrategy::ZScore => Box::new(StandardScaler::new()),
        }
    }
}

impl fmt::Display for ScalingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScalingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minmax" | "min-max" => Ok(ScalingStrategy::MinMax),
            "zscore" | "z-score" | "standard" => Ok(ScalingStrategy::ZScore),
            other => Err(format!("Unknown scaling strategy '{}'", other)),
        }
    }
}

/// A dataset whose feature columns were all transformed by one strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledDataset {
    dataset: Dataset,
    strategy: ScalingStrategy,
    degenerate_columns: Vec<usize>,
}

impl ScaledDataset {
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn features(&self) -> &Array2<f64> {
        self.dataset.features()
    }

    pub fn labels(&self) -> &[Diagnosis] {
        self.dataset.labels()
    }

    pub fn strategy(&self) -> ScalingStrategy {
        self.strategy
    }

    /// Columns that had zero range (min-max) or zero standard deviation (z-score)
    /// and were mapped to `0.0`.
    pub fn degenerate_columns(&self) -> &[usize] {
        &self.degenerate_columns
    }
}

/// Scales every feature column of `dataset` with `strategy`.
///
/// The statistics (min/max or mean/std) are computed over the whole dataset passed
/// in, before any train/test split, so held-out samples influence the scaling
/// parameters. Scale a training subset instead if that leak is unwanted.
///
/// A column with zero spread cannot be normalized and outputs `0.0` for every row.
pub fn scale(dataset: &Dataset, strategy: ScalingStrategy) -> Result<ScaledDataset, ScalerError> {
    let mut scaler = strategy.scaler();
    let features = scaler.fit_transform(dataset.features())?;
    let degenerate_columns = scaler.degenerate_columns();

    if !degenerate_columns.is_empty() {
        warn!(
            "{} scaling: columns {:?} have zero spread, mapped to 0.0",
            strategy, degenerate_columns
        );
    }
    debug!("Scaled {} x {} features with {}", features.nrows(), features.ncols(), strategy);

    Ok(ScaledDataset { dataset: dataset.with_features(features), strategy, degenerate_columns })
}

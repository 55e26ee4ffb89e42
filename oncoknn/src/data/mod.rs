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

pub mod csv;
pub mod error;

pub use csv::{WdbcHeadersLoader, WdbcLoader};
pub use error::{CsvError, DataError};

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

/// The two-valued class label of a tumor sample.
///
/// The derived ordering (`Benign < Malignant`) is the canonical label order used
/// by the classifier when a vote cannot be resolved by distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Diagnosis {
    Benign,
    Malignant,
}

impl Diagnosis {
    /// Both labels in canonical order.
    pub const ALL: [Diagnosis; 2] = [Diagnosis::Benign, Diagnosis::Malignant];

    /// Row/column position of the label in a contingency table.
    pub fn index(self) -> usize {
        match self {
            Diagnosis::Benign => 0,
            Diagnosis::Malignant => 1,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Diagnosis::Benign => "B",
            Diagnosis::Malignant => "M",
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for Diagnosis {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "b" | "benign" => Ok(Diagnosis::Benign),
            "m" | "malignant" => Ok(Diagnosis::Malignant),
            _ => Err(DataError::InvalidLabel(s.to_string())),
        }
    }
}

/// An in-memory table of samples: one feature row and one diagnosis per sample.
///
/// Construction guarantees at least one sample, at least one feature column,
/// one label per row and no missing (non-finite) feature values.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Array2<f64>,
    labels: Vec<Diagnosis>,
}

impl Dataset {
    pub fn new(features: Array2<f64>, labels: Vec<Diagnosis>) -> Result<Self, DataError> {
        if features.nrows() == 0 {
            return Err(DataError::EmptyDataset);
        }
        if features.ncols() == 0 {
            return Err(DataError::NoFeatures);
        }
        if features.nrows() != labels.len() {
            return Err(DataError::LabelCountMismatch {
                rows: features.nrows(),
                labels: labels.len(),
            });
        }
        if let Some(((row, column), _)) = features.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(DataError::NonFiniteValue { row, column });
        }

        Ok(Dataset { features, labels })
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    pub fn labels(&self) -> &[Diagnosis] {
        &self.labels
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Builds a new dataset from the given rows, in the given order.
    ///
    /// # Panics
    /// Panics if any index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select(Axis(0), indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Replaces the feature matrix, keeping the labels. Used by the scalers, which
    /// preserve the shape of their input.
    pub(crate) fn with_features(&self, features: Array2<f64>) -> Dataset {
        debug_assert_eq!(features.dim(), self.features.dim());
        Dataset { features, labels: self.labels.clone() }
    }
}

/// A trait for loading labelled tumor measurements from files.
///
/// Implementors read a file from a path and return a validated [`Dataset`]. The
/// sample identifier column present in the source file is dropped during loading.
pub trait DataLoader {
    fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Dataset, Self::Error>;

    type Error: std::error::Error + 'static;
}

/// Loads a dataset using a specified `DataLoader` implementation.
pub fn load_data<T: DataLoader, P: AsRef<std::path::Path>>(path: P) -> Result<Dataset, T::Error> {
    T::load(path)
}

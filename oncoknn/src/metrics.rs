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

use serde::Serialize;

use crate::data::Diagnosis;
use crate::errors::EvaluationError;

/// Contingency table of actual against predicted diagnoses, with accuracy.
///
/// `counts[actual][predicted]` is indexed by [`Diagnosis::index`]. Malignant is the
/// positive class for the derived rates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfusionReport {
    counts: [[usize; 2]; 2],
    total: usize,
    accuracy: f64,
}

impl ConfusionReport {
    pub fn count(&self, actual: Diagnosis, predicted: Diagnosis) -> usize {
        self.counts[actual.index()][predicted.index()]
    }

    pub fn counts(&self) -> [[usize; 2]; 2] {
        self.counts
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn correct(&self) -> usize {
        Diagnosis::ALL.iter().map(|&d| self.count(d, d)).sum()
    }

    /// Fraction of samples whose prediction matches the actual label, in `[0, 1]`.
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// True positive rate: malignant samples predicted malignant.
    pub fn sensitivity(&self) -> Option<f64> {
        let tp = self.count(Diagnosis::Malignant, Diagnosis::Malignant);
        ratio(tp, tp + self.count(Diagnosis::Malignant, Diagnosis::Benign))
    }

    /// True negative rate: benign samples predicted benign.
    pub fn specificity(&self) -> Option<f64> {
        let tn = self.count(Diagnosis::Benign, Diagnosis::Benign);
        ratio(tn, tn + self.count(Diagnosis::Benign, Diagnosis::Malignant))
    }

    /// Fraction of malignant predictions that are actually malignant.
    pub fn precision(&self) -> Option<f64> {
        let tp = self.count(Diagnosis::Malignant, Diagnosis::Malignant);
        ratio(tp, tp + self.count(Diagnosis::Benign, Diagnosis::Malignant))
    }
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}

impl fmt::Display for ConfusionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "actual \\ predicted {:>6} {:>6}", Diagnosis::Benign, Diagnosis::Malignant)?;
        for actual in Diagnosis::ALL {
            writeln!(
                f,
                "{:<18} {:>6} {:>6}",
                actual,
                self.count(actual, Diagnosis::Benign),
                self.count(actual, Diagnosis::Malignant)
            )?;
        }
        write!(f, "accuracy: {:.4} ({}/{})", self.accuracy, self.correct(), self.total)
    }
}

/// Cross-tabulates `actual` against `predicted` and computes accuracy.
pub fn evaluate(
    actual: &[Diagnosis],
    predicted: &[Diagnosis],
) -> Result<ConfusionReport, EvaluationError> {
    if actual.len() != predicted.len() {
        return Err(EvaluationError::LengthMismatch {
            expected: actual.len(),
            actual: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(EvaluationError::EmptyInput);
    }

    let mut counts = [[0usize; 2]; 2];
    for (&a, &p) in actual.iter().zip(predicted.iter()) {
        counts[a.index()][p.index()] += 1;
    }

    let total = actual.len();
    let correct = counts[0][0] + counts[1][1];
    Ok(ConfusionReport { counts, total, accuracy: correct as f64 / total as f64 })
}

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

use std::collections::BTreeMap;
use std::marker::PhantomData;

use log::debug;
use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;

use crate::distance::{Distance, Euclidean};
use crate::errors::{ClassifierError, DistanceError};

/// A training row ranked by its distance to a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

pub struct KNNBuilder<L> {
    k: usize,
    metric: Box<dyn Distance>,
    parallel: bool,
    _label: PhantomData<L>,
}

impl<L> KNNBuilder<L> {
    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn metric(mut self, metric: impl Distance + 'static) -> Self {
        self.metric = Box::new(metric);
        self
    }

    /// Classify test rows on the rayon thread pool. Output order is unchanged.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn build(self) -> KNN<L> {
        KNN {
            x_train: None,
            y_train: None,
            k: self.k,
            metric: self.metric,
            parallel: self.parallel,
        }
    }
}

/// K-nearest-neighbor majority-vote classifier.
///
/// Neighbors are ranked by ascending distance, with the training row index as the
/// secondary key, so equidistant rows at the k-th position are chosen in dataset
/// order. A tied vote goes to the tied label whose closest neighbor is nearest to
/// the query; if those distances are equal too, to the label that sorts first.
pub struct KNN<L> {
    x_train: Option<Array2<f64>>,
    y_train: Option<Vec<L>>,
    k: usize,
    metric: Box<dyn Distance>,
    parallel: bool,
}

impl<L> KNN<L>
where
    L: Copy + Ord + Send + Sync,
{
    pub fn new() -> KNNBuilder<L> {
        KNNBuilder { k: 3, metric: Box::new(Euclidean), parallel: false, _label: PhantomData }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &[L]) -> Result<(), ClassifierError> {
        if x.nrows() == 0 {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        if x.nrows() != y.len() {
            return Err(ClassifierError::LabelCountMismatch { rows: x.nrows(), labels: y.len() });
        }
        if self.k == 0 || self.k > x.nrows() {
            return Err(ClassifierError::InvalidK { k: self.k, n_train: x.nrows() });
        }

        debug!("KNN fitted on {} samples with k={}", x.nrows(), self.k);
        self.x_train = Some(x.clone());
        self.y_train = Some(y.to_vec());
        Ok(())
    }

    /// Ranks every training row by distance to `query`, nearest first.
    pub fn neighbors(&self, query: ArrayView1<f64>) -> Result<Vec<Neighbor>, ClassifierError> {
        let x_train = self.x_train.as_ref().ok_or(ClassifierError::NotFitted)?;
        let mut ranked = x_train
            .rows()
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                self.metric.distance(row, query).map(|distance| Neighbor { index, distance })
            })
            .collect::<Result<Vec<_>, _>>()?;

        ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.index.cmp(&b.index)));
        Ok(ranked)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<L>, ClassifierError> {
        let x_train = self.x_train.as_ref().ok_or(ClassifierError::NotFitted)?;
        if x.ncols() != x_train.ncols() {
            return Err(DistanceError::DimensionMismatch {
                expected: x_train.ncols(),
                actual: x.ncols(),
            }
            .into());
        }

        debug!("KNN predicting {} samples (parallel={})", x.nrows(), self.parallel);
        if self.parallel {
            (0..x.nrows()).into_par_iter().map(|i| self.predict_one(x.row(i))).collect()
        } else {
            x.rows().into_iter().map(|row| self.predict_one(row)).collect()
        }
    }

    fn predict_one(&self, query: ArrayView1<f64>) -> Result<L, ClassifierError> {
        let y_train = self.y_train.as_ref().ok_or(ClassifierError::NotFitted)?;
        let ranked = self.neighbors(query)?;
        majority_vote(&ranked[..self.k], y_train).ok_or(ClassifierError::EmptyTrainingSet)
    }
}

/// Picks the most frequent label among `nearest`, which must be ranked nearest first.
///
/// Ties on the count go to the label with the smallest nearest-neighbor distance,
/// then to the smallest label.
fn majority_vote<L: Copy + Ord>(nearest: &[Neighbor], labels: &[L]) -> Option<L> {
    // label -> (votes, distance of its closest neighbor)
    let mut tally: BTreeMap<L, (usize, f64)> = BTreeMap::new();
    for neighbor in nearest {
        let entry = tally.entry(labels[neighbor.index]).or_insert((0, neighbor.distance));
        entry.0 += 1;
    }

    tally
        .into_iter()
        .max_by(|(label_a, (votes_a, dist_a)), (label_b, (votes_b, dist_b))| {
            votes_a
                .cmp(votes_b)
                .then_with(|| dist_b.total_cmp(dist_a))
                .then_with(|| label_b.cmp(label_a))
        })
        .map(|(label, _)| label)
}

/// Classifies every row of `test` by majority vote of its `k` nearest rows in `train`
/// under Euclidean distance. Predictions are returned in test row order.
pub fn classify<L>(
    train: &Array2<f64>,
    train_labels: &[L],
    test: &Array2<f64>,
    k: usize,
) -> Result<Vec<L>, ClassifierError>
where
    L: Copy + Ord + Send + Sync,
{
    let mut model = KNN::new().k(k).build();
    model.fit(train, train_labels)?;
    model.predict(test)
}

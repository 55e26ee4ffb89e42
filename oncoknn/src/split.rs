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

use log::debug;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use crate::errors::SplitError;

/// A partition of sample indices into disjoint training and held-out sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    train: Vec<usize>,
    test: Vec<usize>,
}

impl Split {
    pub fn train(&self) -> &[usize] {
        &self.train
    }

    pub fn test(&self) -> &[usize] {
        &self.test
    }

    pub fn n_samples(&self) -> usize {
        self.train.len() + self.test.len()
    }
}

/// Randomly holds out `holdout_size` of the indices `0..n_samples`.
///
/// Test indices are kept in the order they were drawn; training indices keep their
/// ascending order. The same `seed` and `n_samples` always reproduce the same split.
/// `None` seeds from system entropy.
pub fn split(n_samples: usize, holdout_size: usize, seed: Option<u64>) -> Result<Split, SplitError> {
    if holdout_size == 0 || holdout_size >= n_samples {
        return Err(SplitError::InvalidSize { holdout: holdout_size, n_samples });
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let test = index::sample(&mut rng, n_samples, holdout_size).into_vec();

    let mut held_out = vec![false; n_samples];
    for &i in &test {
        held_out[i] = true;
    }
    let train: Vec<usize> = (0..n_samples).filter(|&i| !held_out[i]).collect();

    debug!("Split {} samples: train_size={}, test_size={}", n_samples, train.len(), test.len());
    Ok(Split { train, test })
}

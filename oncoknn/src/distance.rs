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

use ndarray::{ArrayView1, Zip};
use num_traits::Float;

use crate::errors::DistanceError;

/// A metric between two feature vectors of equal length.
pub trait Distance: Send + Sync {
    fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> Result<f64, DistanceError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl Distance for Euclidean {
    fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> Result<f64, DistanceError> {
        euclidean(a, b)
    }
}

/// Euclidean distance, `sqrt(sum((a_i - b_i)^2))`.
pub fn euclidean<T: Float>(a: ArrayView1<T>, b: ArrayView1<T>) -> Result<T, DistanceError> {
    if a.len() != b.len() {
        return Err(DistanceError::DimensionMismatch { expected: a.len(), actual: b.len() });
    }

    let squared_sum = Zip::from(a).and(b).fold(T::zero(), |acc, &a_i, &b_i| {
        let diff = a_i - b_i;
        acc + diff * diff
    });
    Ok(squared_sum.sqrt())
}

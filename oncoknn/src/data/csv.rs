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

use crate::data::{DataLoader, Dataset, DataError, Diagnosis};
use crate::data::error::CsvError;
use log::debug;
use ndarray::Array2;
use std::fs::File;
use std::path::Path;

/// Loads the Wisconsin diagnostic layout without a header row:
/// `id, diagnosis, feature_1, ..., feature_P`.
pub struct WdbcLoader;

/// Same layout as [`WdbcLoader`], with a header row.
pub struct WdbcHeadersLoader;

const DIAGNOSIS_COLUMN: usize = 1;
const FIRST_FEATURE_COLUMN: usize = 2;

fn load_wdbc_common<P: AsRef<Path>>(path: P, has_headers: bool) -> Result<Dataset, DataError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(CsvError::from)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut n_cols = None;
    let mut feature_data: Vec<f64> = Vec::new();
    let mut labels: Vec<Diagnosis> = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result.map_err(CsvError::from)?;
        let row = i + 1;

        let expected = *n_cols.get_or_insert(record.len());
        if record.len() != expected {
            return Err(
                CsvError::InconsistentColumns { row, actual: record.len(), expected }.into()
            );
        }
        if expected <= FIRST_FEATURE_COLUMN {
            return Err(CsvError::InsufficientColumns.into());
        }

        let diagnosis = &record[DIAGNOSIS_COLUMN];
        let label = diagnosis
            .parse::<Diagnosis>()
            .map_err(|_| CsvError::InvalidDiagnosis { value: diagnosis.to_string(), row })?;
        labels.push(label);

        for (column, value) in record.iter().enumerate().skip(FIRST_FEATURE_COLUMN) {
            if value.is_empty() || value == "NA" || value == "?" {
                return Err(CsvError::MissingValue { row, column }.into());
            }
            let parsed = value.parse::<f64>().map_err(|e| CsvError::InvalidNumeric {
                value: value.to_string(),
                row,
                column,
                source: e,
            })?;
            feature_data.push(parsed);
        }
    }

    let n_cols = n_cols.ok_or(CsvError::EmptyFile)?;
    let n_rows = labels.len();
    debug!(
        "Loaded {} samples with {} features from {:?}",
        n_rows,
        n_cols - FIRST_FEATURE_COLUMN,
        path
    );

    let features = Array2::from_shape_vec((n_rows, n_cols - FIRST_FEATURE_COLUMN), feature_data)
        .map_err(CsvError::from)?;
    Dataset::new(features, labels)
}

impl DataLoader for WdbcLoader {
    type Error = DataError;

    fn load<P: AsRef<Path>>(path: P) -> Result<Dataset, Self::Error> {
        load_wdbc_common(path, false)
    }
}

impl DataLoader for WdbcHeadersLoader {
    type Error = DataError;

    fn load<P: AsRef<Path>>(path: P) -> Result<Dataset, Self::Error> {
        load_wdbc_common(path, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::load_data;
    use ndarray::array;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes()).expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_load_no_headers() {
        let csv_content = "842302,M,17.99,10.38\n842517,B,20.57,17.77\n84300903,M,19.69,21.25\n";
        let temp_file = create_temp_csv(csv_content);

        let dataset = load_data::<WdbcLoader, _>(temp_file.path()).expect("Failed to load CSV");

        assert_eq!(dataset.features(), &array![[17.99, 10.38], [20.57, 17.77], [19.69, 21.25]]);
        assert_eq!(
            dataset.labels(),
            &[Diagnosis::Malignant, Diagnosis::Benign, Diagnosis::Malignant]
        );
    }

    #[test]
    fn test_load_with_headers() {
        let csv_content = "id,diagnosis,radius_mean\n1,B,12.5\n2,M,20.1\n";
        let temp_file = create_temp_csv(csv_content);

        let dataset =
            load_data::<WdbcHeadersLoader, _>(temp_file.path()).expect("Failed to load CSV");

        assert_eq!(dataset.n_samples(), 2);
        assert_eq!(dataset.n_features(), 1);
        assert_eq!(dataset.labels(), &[Diagnosis::Benign, Diagnosis::Malignant]);
    }

    #[test]
    fn test_load_empty_file() {
        let temp_file = create_temp_csv("");

        let result = load_data::<WdbcLoader, _>(temp_file.path());
        assert!(matches!(result, Err(DataError::Csv(CsvError::EmptyFile))));
    }

    #[test]
    fn test_load_without_feature_columns() {
        let temp_file = create_temp_csv("1,B\n2,M\n");

        let result = load_data::<WdbcLoader, _>(temp_file.path());
        assert!(matches!(result, Err(DataError::Csv(CsvError::InsufficientColumns))));
    }

    #[test]
    fn test_load_missing_value_is_rejected() {
        let temp_file = create_temp_csv("1,B,1.0,2.0\n2,M,,4.0\n");

        let result = load_data::<WdbcLoader, _>(temp_file.path());
        assert!(matches!(
            result,
            Err(DataError::Csv(CsvError::MissingValue { row: 2, column: 2 }))
        ));
    }

    #[test]
    fn test_load_invalid_diagnosis() {
        let temp_file = create_temp_csv("1,X,1.0\n");

        let result = load_data::<WdbcLoader, _>(temp_file.path());
        assert!(matches!(
            result,
            Err(DataError::Csv(CsvError::InvalidDiagnosis { value, row: 1 })) if value == "X"
        ));
    }

    #[test]
    fn test_load_invalid_numeric() {
        let temp_file = create_temp_csv("1,B,abc\n");

        let result = load_data::<WdbcLoader, _>(temp_file.path());
        assert!(matches!(
            result,
            Err(DataError::Csv(CsvError::InvalidNumeric { value, row: 1, column: 2, .. })) if value == "abc"
        ));
    }

    #[test]
    fn test_load_inconsistent_columns() {
        let temp_file = create_temp_csv("1,B,1.0,2.0\n2,M,3.0\n");

        let result = load_data::<WdbcLoader, _>(temp_file.path());
        assert!(matches!(
            result,
            Err(DataError::Csv(CsvError::InconsistentColumns { row: 2, actual: 3, expected: 4 }))
        ));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_data::<WdbcLoader, _>("nonexistent.csv");
        assert!(matches!(result, Err(DataError::Csv(CsvError::FileOpen(_)))));
    }
}

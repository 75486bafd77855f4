use std::path::Path;

use numeric_expr::{Dataset, DatasetError, Record};

use crate::util;

/// Target field of the built-in sample dataset.
pub(crate) const SAMPLE_TARGET: &str = "target";

/// Two-record table used when no dataset file is given.
pub(crate) fn sample_dataset() -> Result<Dataset, DatasetError> {
    let records: Vec<Record> = vec![
        [
            ("first", 1.0),
            ("second", 500.0),
            ("third", -12.0),
            (SAMPLE_TARGET, 17.0),
        ]
        .into_iter()
        .collect(),
        [
            ("first", 1024.0),
            ("second", -12.0),
            ("third", 45.0),
            (SAMPLE_TARGET, 125.0),
        ]
        .into_iter()
        .collect(),
    ];
    Dataset::new(SAMPLE_TARGET, records)
}

/// Reads a dataset JSON file, or falls back to [`sample_dataset`].
///
/// The file format is `{"target": "<field>", "records": [{"<field>": <number>, ...}, ...]}`.
pub(crate) fn load_dataset(path: Option<&Path>) -> anyhow::Result<Dataset> {
    let dataset = match path {
        Some(path) => util::read_json_file("dataset", path)?,
        None => sample_dataset()?,
    };
    eprintln!(
        "Dataset: {} records, target `{}`, inputs [{}]",
        dataset.records().len(),
        dataset.target(),
        dataset.inputs().join(", ")
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_dataset() {
        let dataset = sample_dataset().unwrap();
        assert_eq!(dataset.target(), "target");
        assert_eq!(dataset.records().len(), 2);
        assert_eq!(dataset.inputs(), ["first", "second", "third"]);
        assert_eq!(dataset.records()[1].get("target"), 125.0);
    }
}

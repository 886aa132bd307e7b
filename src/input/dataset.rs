//! JSON dataset files: inference samples and per-class support sets.
//!
//! A samples file holds the classifier's output for one test set; a
//! support file holds each class's prototype and training examples in
//! the same embedding space. Class labels may arrive as JSON strings or
//! numbers and are normalized to strings.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::input::InputError;
use crate::model::points::ClassSupportSet;
use crate::model::sample::{ConfidenceVector, InputRef, Label, LabelConfidence, Sample};

#[derive(Debug, Deserialize)]
pub struct SamplesFile {
    pub samples: Vec<SampleRecord>,
}

#[derive(Debug, Deserialize)]
pub struct SampleRecord {
    pub labels: Vec<LabelEntry>,
    pub ood: f64,
    pub coordinates: Vec<f64>,
    #[serde(default, deserialize_with = "opt_label_from_value")]
    pub true_label: Option<Label>,
}

#[derive(Debug, Deserialize)]
pub struct LabelEntry {
    #[serde(deserialize_with = "label_from_value")]
    pub label: Label,
    pub confidence: f64,
}

#[derive(Debug, Deserialize)]
pub struct SupportFile {
    pub labels: Vec<SupportRecord>,
}

#[derive(Debug, Deserialize)]
pub struct SupportRecord {
    #[serde(deserialize_with = "label_from_value")]
    pub label: Label,
    pub prototype: Vec<f64>,
    pub training_examples: Vec<TrainingExample>,
}

#[derive(Debug, Deserialize)]
pub struct TrainingExample {
    pub coordinates: Vec<f64>,
}

fn label_from_value<'de, D>(deserializer: D) -> Result<Label, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "label must be a string or number, got {other}"
        ))),
    }
}

fn opt_label_from_value<'de, D>(deserializer: D) -> Result<Option<Label>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "true_label must be a string, number or null, got {other}"
        ))),
    }
}

pub fn load_samples(path: &Path) -> Result<Vec<Sample>, InputError> {
    let text = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: SamplesFile = serde_json::from_str(&text).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    samples_from_records(file.samples, path)
}

fn samples_from_records(
    records: Vec<SampleRecord>,
    path: &Path,
) -> Result<Vec<Sample>, InputError> {
    let invalid = |reason: String| InputError::InvalidInput {
        path: path.to_path_buf(),
        reason,
    };

    let mut samples = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        if record.coordinates.is_empty() {
            return Err(invalid(format!("sample {index} has no coordinates")));
        }
        if record.coordinates.iter().any(|v| !v.is_finite()) {
            return Err(invalid(format!(
                "sample {index} has a non-finite coordinate"
            )));
        }
        let entries = record
            .labels
            .into_iter()
            .map(|e| LabelConfidence {
                label: e.label,
                confidence: e.confidence,
            })
            .collect();
        samples.push(Sample {
            confidences: ConfidenceVector::new(entries),
            ood_score: record.ood,
            coordinates: record.coordinates,
            true_label: record.true_label,
            input_ref: Some(InputRef {
                file: path.display().to_string(),
                index,
            }),
        });
    }
    Ok(samples)
}

pub fn load_support_sets(path: &Path) -> Result<BTreeMap<Label, ClassSupportSet>, InputError> {
    let text = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: SupportFile = serde_json::from_str(&text).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    support_sets_from_records(file.labels, path)
}

fn support_sets_from_records(
    records: Vec<SupportRecord>,
    path: &Path,
) -> Result<BTreeMap<Label, ClassSupportSet>, InputError> {
    let invalid = |reason: String| InputError::InvalidInput {
        path: path.to_path_buf(),
        reason,
    };

    let mut sets = BTreeMap::new();
    for record in records {
        let dims = record.prototype.len();
        if dims == 0 {
            return Err(invalid(format!(
                "class \"{}\" has an empty prototype",
                record.label
            )));
        }
        let mut support_examples = Vec::with_capacity(record.training_examples.len());
        for (i, example) in record.training_examples.into_iter().enumerate() {
            if example.coordinates.len() != dims {
                return Err(invalid(format!(
                    "class \"{}\" training example {i} has {} dims, prototype has {dims}",
                    record.label,
                    example.coordinates.len()
                )));
            }
            support_examples.push(example.coordinates);
        }
        let label = record.label.clone();
        let previous = sets.insert(
            record.label,
            ClassSupportSet {
                label: label.clone(),
                prototype: record.prototype,
                support_examples,
            },
        );
        if previous.is_some() {
            return Err(invalid(format!("duplicate class label \"{label}\"")));
        }
    }
    Ok(sets)
}

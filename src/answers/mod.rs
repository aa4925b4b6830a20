use crate::condition::AnswerValue;
use crate::error::DocumentError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;

/// Addresses one recorded answer: a question step, or one item of a form step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnswerKey {
    pub step: String,
    pub item: Option<String>,
}

impl AnswerKey {
    pub fn new(step: impl Into<String>, item: Option<&str>) -> Self {
        Self {
            step: step.into(),
            item: item.map(str::to_string),
        }
    }
}

/// A single answer as it appears in JSON answer files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedAnswer {
    pub step: String,
    #[serde(default)]
    pub item: Option<String>,
    pub value: AnswerValue,
}

/// The answers accumulated during one traversal of a flow.
///
/// Absent keys are a normal state: a step that was skipped or not yet reached simply has
/// no entry, and every equality test against it is false.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerSet {
    values: AHashMap<AnswerKey, AnswerValue>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the answer of a question step, replacing any previous value.
    pub fn record(&mut self, step: impl Into<String>, value: impl Into<AnswerValue>) -> &mut Self {
        self.values.insert(
            AnswerKey {
                step: step.into(),
                item: None,
            },
            value.into(),
        );
        self
    }

    /// Records the answer of a form item, replacing any previous value.
    pub fn record_item(
        &mut self,
        step: impl Into<String>,
        item: impl Into<String>,
        value: impl Into<AnswerValue>,
    ) -> &mut Self {
        self.values.insert(
            AnswerKey {
                step: step.into(),
                item: Some(item.into()),
            },
            value.into(),
        );
        self
    }

    /// Convenience for single-choice answers.
    pub fn record_choice(
        &mut self,
        step: impl Into<String>,
        choice: impl Into<String>,
    ) -> &mut Self {
        self.record(step, AnswerValue::Choice(choice.into()))
    }

    pub fn get(&self, step: &str, item: Option<&str>) -> Option<&AnswerValue> {
        self.values.get(&AnswerKey::new(step, item))
    }

    pub fn has_step(&self, step: &str) -> bool {
        self.values.keys().any(|k| k.step == step)
    }

    /// Removes every answer recorded for `step`, form items included.
    pub fn clear_step(&mut self, step: &str) {
        self.values.retain(|k, _| k.step != step);
    }

    /// Replaces all answers of `step` with the ones in `submitted` that belong to it.
    ///
    /// Answers in `submitted` that address other steps are ignored.
    pub fn replace_step(&mut self, step: &str, submitted: AnswerSet) {
        self.clear_step(step);
        self.values
            .extend(submitted.values.into_iter().filter(|(k, _)| k.step == step));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the answers in key order, for stable output.
    pub fn iter(&self) -> impl Iterator<Item = (&AnswerKey, &AnswerValue)> {
        let mut entries: Vec<_> = self.values.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    /// Parses a JSON list of `{ "step", "item", "value" }` records.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let records: Vec<RecordedAnswer> = serde_json::from_str(json)?;
        Ok(records.into_iter().collect())
    }

    /// Load recorded answers from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn to_records(&self) -> Vec<RecordedAnswer> {
        self.iter()
            .map(|(k, v)| RecordedAnswer {
                step: k.step.clone(),
                item: k.item.clone(),
                value: v.clone(),
            })
            .collect()
    }
}

impl FromIterator<RecordedAnswer> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = RecordedAnswer>>(iter: T) -> Self {
        let values = iter
            .into_iter()
            .map(|r| (AnswerKey { step: r.step, item: r.item }, r.value))
            .collect();
        Self { values }
    }
}

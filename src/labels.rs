//! Vocabulary-driven class resolution.
//!
//! Character-level acoustic models emit one class per vocabulary entry plus a
//! trailing CTC blank. Downstream code wants to talk about "the blank class"
//! or "the space class" by name; literal class indices baked into call sites
//! break silently the moment the vocabulary changes size, so lookups happen
//! here, once, at configuration time.

use crate::{Error, Result};

/// A model's output label set.
///
/// The score matrix for this model has `labels.len() + 1` classes: one per
/// label, with the blank appended last (the CTC convention).
#[derive(Debug, Clone)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn new(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of classes the scorer emits (vocabulary plus blank).
    pub fn num_classes(&self) -> usize {
        self.labels.len() + 1
    }

    /// Class index of the CTC blank (one past the vocabulary).
    pub fn blank(&self) -> usize {
        self.labels.len()
    }

    /// Class index of the space label, when the vocabulary has one.
    pub fn space(&self) -> Result<usize> {
        self.class(" ")
    }

    /// Resolve a label to its class index.
    ///
    /// Unknown labels fail here, at configuration time, rather than producing
    /// a scan over a class the model never emits.
    pub fn class(&self, label: &str) -> Result<usize> {
        self.labels
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| Error::UnknownLabel(label.to_owned()))
    }

    /// The label text for a class index (`"<blank>"` for the blank class).
    pub fn label(&self, class: usize) -> Option<&str> {
        if class == self.blank() {
            Some("<blank>")
        } else {
            self.labels.get(class).map(String::as_str)
        }
    }
}

//! Diarization manifest output.
//!
//! The external diarizer takes its work orders as JSON-lines: one object per
//! recording mapping the audio file to the RTTM we produced for it. The
//! schema is owned by that collaborator; we only make sure our side of the
//! hand-off serializes the fields it expects, nulls included.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::Result;

/// One diarization job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub audio_filepath: String,
    pub offset: f32,
    pub duration: Option<f32>,
    pub label: String,
    pub text: String,
    pub num_speakers: Option<u32>,
    pub rttm_filepath: Option<String>,
    pub uem_filepath: Option<String>,
}

impl ManifestEntry {
    /// A job description for diarizing one recording with a known speech
    /// RTTM, using the diarizer's conventional placeholder fields.
    pub fn for_diarization(audio_filepath: impl Into<String>, rttm_filepath: impl Into<String>) -> Self {
        Self {
            audio_filepath: audio_filepath.into(),
            offset: 0.0,
            duration: None,
            label: "infer".to_owned(),
            text: "-".to_owned(),
            num_speakers: None,
            rttm_filepath: Some(rttm_filepath.into()),
            uem_filepath: None,
        }
    }

    /// Serialize as one JSON line (no trailing newline).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Write entries as JSON-lines.
pub fn write_entries<W: Write>(mut w: W, entries: &[ManifestEntry]) -> Result<()> {
    for entry in entries {
        writeln!(w, "{}", entry.to_json()?)?;
    }
    Ok(())
}

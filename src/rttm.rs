//! RTTM (rich transcription time marked) read/write support.
//!
//! This is the hand-off format to the external diarization stage: one line
//! per speech segment,
//!
//! ```text
//! SPEAKER <uniq_id> 1 <start:.3f> <duration:.3f> <NA> <NA> <tag> <NA>
//! ```
//!
//! We both produce these files (from finalized speech labels) and consume
//! them (diarizer output comes back the same way, with speaker identities in
//! the tag column).

use std::io::{BufRead, Write};
use std::path::Path;

use tracing::debug;
use uuid::Uuid;

use crate::timing::SpeechLabel;
use crate::{Error, Result};

/// Write one RTTM line per label.
pub fn write_labels<W: Write>(mut w: W, uniq_id: &str, labels: &[SpeechLabel]) -> Result<()> {
    for label in labels {
        writeln!(
            w,
            "SPEAKER {uniq_id} 1 {:.3} {:.3} <NA> <NA> {} <NA>",
            label.start_seconds, label.duration_seconds, label.tag
        )?;
    }
    debug!(uniq_id, lines = labels.len(), "wrote RTTM");
    Ok(())
}

/// Parse an RTTM stream back into speech labels.
///
/// Blank lines are skipped. Anything else that doesn't parse is an error
/// naming the offending line; silently dropping lines here would corrupt the
/// timeline handed to the diarizer.
pub fn read_labels<R: BufRead>(r: R) -> Result<Vec<SpeechLabel>> {
    let mut labels = Vec::new();

    for (idx, line) in r.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        labels.push(parse_line(&line, idx + 1)?);
    }

    Ok(labels)
}

fn parse_line(line: &str, line_no: usize) -> Result<SpeechLabel> {
    let malformed = |reason: &str| Error::Rttm {
        line: line_no,
        reason: reason.to_owned(),
    };

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 9 {
        return Err(malformed("expected at least 9 fields"));
    }
    if fields[0] != "SPEAKER" {
        return Err(malformed("line does not start with SPEAKER"));
    }

    let start_seconds: f32 = fields[3]
        .parse()
        .map_err(|_| malformed("start time is not a number"))?;
    let duration_seconds: f32 = fields[4]
        .parse()
        .map_err(|_| malformed("duration is not a number"))?;

    Ok(SpeechLabel {
        start_seconds,
        duration_seconds,
        tag: fields[7].to_owned(),
    })
}

/// Recording identifier for RTTM and manifest lines.
///
/// We prefer the audio file's stem so the diarizer can correlate files by
/// eye; a session with no backing file gets a fresh UUID.
pub fn uniq_id(audio_path: Option<&Path>) -> String {
    audio_path
        .and_then(|p| p.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

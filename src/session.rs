//! High-level streaming session tying the core pieces together.
//!
//! A [`Session`] owns its rolling window, its configuration, and the decoded
//! class history for the current stream — there is no module-level mutable
//! state anywhere in this crate. The scorer is passed into each call instead
//! of being owned, so one loaded model can serve many sessions.
//!
//! Threading: a session is single-threaded by construction. Push and
//! finalize calls run to completion before the next begins; if the host is
//! multi-threaded, keep the single-writer discipline by feeding the session
//! through [`crate::feed`] rather than sharing it.

use tracing::{debug, trace};

use crate::Result;
use crate::ring::RollingBuffer;
use crate::score::{FrameScores, Scorer};
use crate::segmenter::{RunScan, complement};
use crate::timing::{SpeechLabel, TimeMap};

/// Session parameters, as plain values.
///
/// This struct represents *library-level configuration*, not CLI flags
/// directly. Frontends are responsible for mapping user input into this type
/// so the library stays reusable outside any particular host.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Samples per pushed frame.
    pub frame_len: usize,

    /// Context samples kept on either side of the current frame; the scorer
    /// window is `2 * overlap + frame_len` samples.
    pub overlap: usize,

    /// Run-length policy for the silence scan (target class, companion
    /// class, minimum width).
    pub run: RunScan,

    /// Frame-index to wall-clock conversion for emitted labels.
    pub time: TimeMap,

    /// Tag attached to emitted speech labels.
    pub speech_tag: String,
}

impl SessionConfig {
    pub fn window_len(&self) -> usize {
        2 * self.overlap + self.frame_len
    }
}

/// One streaming voice-activity session.
///
/// Lifecycle: created at stream start, mutated once per frame, finalized (or
/// reset) at stream end. The rolling window is owned exclusively by the
/// session; derived segments and labels are append-only snapshots.
pub struct Session {
    config: SessionConfig,
    buffer: RollingBuffer,

    // Greedy-decoded class index of every scored frame, in stream order.
    history: Vec<usize>,

    // Scratch silence frame, substituted when the caller has nothing to push.
    silence: Vec<f32>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let buffer = RollingBuffer::new(config.frame_len, config.overlap);
        let silence = vec![0.0; config.frame_len];
        Self {
            config,
            buffer,
            history: Vec::new(),
            silence,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Number of scorer frames decoded so far.
    pub fn frames_seen(&self) -> usize {
        self.history.len()
    }

    /// Push one frame, score the updated window, and record the decode.
    ///
    /// `None` stands in for a missing capture frame and is scored as
    /// silence. A frame longer than the configured frame length is an error;
    /// a scorer failure propagates unchanged.
    ///
    /// Returns the window's scores so callers can surface live per-frame
    /// decisions; the scores are not retained by the session.
    pub fn push_frame(
        &mut self,
        scorer: &mut dyn Scorer,
        frame: Option<&[f32]>,
    ) -> Result<FrameScores> {
        let frame = frame.unwrap_or(&self.silence);
        let window = self.buffer.push_frame(frame)?;
        let scores = scorer.score(window)?;

        let decoded = scores.decode_greedy();
        trace!(
            frames = decoded.len(),
            seen = self.history.len(),
            "scored window"
        );
        self.history.extend_from_slice(&decoded);

        Ok(scores)
    }

    /// Finalize the stream: scan the decoded history for silence runs and
    /// return the speech intervals between them, in wall-clock time.
    ///
    /// An empty history (nothing pushed, or an empty-output scorer) yields
    /// an empty label sequence.
    pub fn speech_labels(&self) -> Vec<SpeechLabel> {
        let runs = self.config.run.scan(&self.history);
        let speech = complement(&runs, self.history.len(), &self.config.speech_tag);
        debug!(
            frames = self.history.len(),
            silence_runs = runs.len(),
            speech_segments = speech.len(),
            "finalized session"
        );
        speech
            .iter()
            .map(|segment| self.config.time.label(segment))
            .collect()
    }

    /// Zero-fill the window and clear all derived state.
    pub fn reset(&mut self) {
        self.buffer.reset();
        self.history.clear();
    }
}

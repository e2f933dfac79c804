//! Frame-index ↔ wall-clock conversion.
//!
//! Scorer frames are spaced by the model's total downsampling factor times
//! the feature extractor's window stride. Both are architecture metadata, so
//! the conversion is derived rather than hardcoded: a model with a different
//! encoder geometry gets the right timeline for free.

use serde::Serialize;

use crate::segmenter::Segment;

/// Stride metadata for one encoder block.
///
/// A block repeated `repeat` times with per-layer stride `stride` contributes
/// `stride^repeat` to the model's total downsampling factor.
#[derive(Debug, Clone, Copy)]
pub struct EncoderBlock {
    pub stride: u32,
    pub repeat: u32,
}

/// Seconds of audio covered by one scorer frame.
///
/// This is the product of `stride^repeat` across encoder blocks, times the
/// feature extractor's window stride in seconds.
pub fn seconds_per_frame(blocks: &[EncoderBlock], window_stride_seconds: f32) -> f32 {
    let downsampling: u32 = blocks.iter().map(|b| b.stride.pow(b.repeat)).product();
    downsampling as f32 * window_stride_seconds
}

/// Affine map between frame indices and wall-clock seconds.
///
/// `time = (frame + offset_frames) * seconds_per_frame`, where the offset is
/// a calibration constant compensating the scorer's latency (the observed
/// default corresponds to −0.18 s).
#[derive(Debug, Clone, Copy)]
pub struct TimeMap {
    seconds_per_frame: f32,
    offset_frames: f32,
}

/// Default latency calibration in seconds.
pub const DEFAULT_OFFSET_SECONDS: f32 = -0.18;

impl TimeMap {
    pub fn new(seconds_per_frame: f32, offset_seconds: f32) -> Self {
        Self {
            seconds_per_frame,
            offset_frames: offset_seconds / seconds_per_frame,
        }
    }

    /// A map with the default −0.18 s latency calibration.
    pub fn with_default_offset(seconds_per_frame: f32) -> Self {
        Self::new(seconds_per_frame, DEFAULT_OFFSET_SECONDS)
    }

    pub fn seconds_per_frame(&self) -> f32 {
        self.seconds_per_frame
    }

    /// Wall-clock time of a frame index.
    pub fn time_at(&self, frame: usize) -> f32 {
        (frame as f32 + self.offset_frames) * self.seconds_per_frame
    }

    /// Inverse of [`TimeMap::time_at`], rounded to the nearest frame.
    pub fn frame_at(&self, seconds: f32) -> usize {
        let frame = seconds / self.seconds_per_frame - self.offset_frames;
        frame.round().max(0.0) as usize
    }

    /// Convert a frame-interval segment into a wall-clock speech label.
    ///
    /// The closed interval `[start, end]` covers through the end of its last
    /// frame, so the end time is taken at `end + 1`. Starts are clamped at
    /// zero: the calibration offset can push early segments negative, which
    /// no downstream consumer accepts.
    pub fn label(&self, segment: &Segment) -> SpeechLabel {
        let start = self.time_at(segment.start_frame).max(0.0);
        let end = self.time_at(segment.end_frame + 1).max(start);
        SpeechLabel {
            start_seconds: start,
            duration_seconds: end - start,
            tag: segment.label.clone(),
        }
    }
}

/// A segment in wall-clock time, tagged with `"speech"` or a speaker
/// identity. Append-only; produced once per finalized boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeechLabel {
    pub start_seconds: f32,
    pub duration_seconds: f32,
    pub tag: String,
}

impl SpeechLabel {
    pub fn end_seconds(&self) -> f32 {
        self.start_seconds + self.duration_seconds
    }
}

//! `hush` — a small, focused voice-activity segmentation library.
//!
//! This crate provides:
//! - A fixed-length rolling sample window for streaming scorers
//! - Greedy arg-max decoding of per-frame class scores
//! - Run-length segmentation of decoded class indices into labeled intervals
//! - Frame-index ↔ wall-clock conversion derived from model metadata
//! - RTTM and diarization-manifest output
//!
//! The crate stops at the `Scorer` trait on one side and the RTTM/manifest
//! hand-off on the other: model loading, neural inference, audio capture and
//! the downstream clustering diarizer are collaborators, not residents.
//!
//! The library is designed to be used by both CLI tools and long-running
//! services, with an emphasis on clarity, streaming input, and minimal
//! surprises.

// High-level API (most consumers should start here).
pub mod session;

// Streaming input plumbing (bounded SPSC frame channel + processing loop).
pub mod feed;

// Core scanning primitives.
pub mod ring;
pub mod segmenter;

// Scorer boundary and greedy decoding.
pub mod score;

// Vocabulary-driven class resolution.
pub mod labels;

// Frame-index to wall-clock conversion.
pub mod timing;

// Output surfaces consumed by the external diarization stage.
pub mod manifest;
pub mod rttm;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

mod error;

pub use error::{Error, Result};

//! Fixed-length rolling sample window for streaming scorers.
//!
//! Streaming scorers want context on both sides of the frame they are asked
//! to classify, so we keep a window of `2 * overlap + frame_len` samples and
//! slide it forward one frame at a time. The window is handed out as one
//! contiguous slice because that is the shape the scorer boundary consumes —
//! a true circular index would still have to materialize the window per push,
//! so we keep the flat layout and shift in place.

use crate::{Error, Result};

/// A fixed-length rolling window of f32 audio samples.
///
/// Invariants:
/// - The window length never changes after construction.
/// - The trailing `frame_len` samples always equal the most recently pushed
///   (zero-padded) frame.
pub struct RollingBuffer {
    window: Vec<f32>,
    frame_len: usize,
}

impl RollingBuffer {
    /// Create a zero-filled window of `2 * overlap + frame_len` samples.
    pub fn new(frame_len: usize, overlap: usize) -> Self {
        Self {
            window: vec![0.0; 2 * overlap + frame_len],
            frame_len,
        }
    }

    /// Samples per pushed frame.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Total window length (`2 * overlap + frame_len`).
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// The current window as one contiguous slice, oldest sample first.
    pub fn window(&self) -> &[f32] {
        &self.window
    }

    /// Push one frame and return the updated window.
    ///
    /// - A frame shorter than `frame_len` is zero-padded on the right.
    /// - A frame longer than `frame_len` is rejected with
    ///   [`Error::FrameTooLong`].
    ///
    /// The oldest `frame_len` samples are evicted from the front of the
    /// window; the frame lands in the trailing slots.
    pub fn push_frame(&mut self, frame: &[f32]) -> Result<&[f32]> {
        if frame.len() > self.frame_len {
            return Err(Error::FrameTooLong {
                got: frame.len(),
                expected: self.frame_len,
            });
        }

        let keep = self.window.len() - self.frame_len;
        self.window.copy_within(self.frame_len.., 0);

        let tail = &mut self.window[keep..];
        tail[..frame.len()].copy_from_slice(frame);
        tail[frame.len()..].fill(0.0);

        Ok(&self.window)
    }

    /// Zero-fill the window, discarding all history.
    pub fn reset(&mut self) {
        self.window.fill(0.0);
    }
}

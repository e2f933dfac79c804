//! Bounded frame plumbing between a capture thread and the session.
//!
//! Audio callbacks run on a driver-owned thread and must not block. Instead
//! of letting that thread touch the session directly, the capture side hands
//! frames into a bounded single-producer/single-consumer channel and a
//! dedicated loop drains it. Scoring latency then never stalls capture, and
//! the session keeps its single-writer discipline.
//!
//! Stop signal: dropping the sender. In-flight frames are drained to
//! completion rather than interrupted.

use std::sync::mpsc;

use anyhow::Result as AnyResult;
use tracing::{debug, warn};

use crate::Result;
use crate::score::Scorer;
use crate::session::Session;
use crate::timing::SpeechLabel;

/// Consumer callback for finalized speech labels.
///
/// Returning an error aborts the drive loop; the error propagates to the
/// caller of [`drive`].
pub trait LabelSink {
    fn on_label(&mut self, label: &SpeechLabel) -> AnyResult<()>;
}

/// Capture-side handle. Single producer: not `Clone`.
pub struct FrameSender {
    tx: mpsc::SyncSender<Vec<f32>>,
}

/// Processing-side handle.
pub struct FrameReceiver {
    rx: mpsc::Receiver<Vec<f32>>,
}

/// Create a bounded frame channel with room for `capacity` in-flight frames.
pub fn frame_channel(capacity: usize) -> (FrameSender, FrameReceiver) {
    let (tx, rx) = mpsc::sync_channel(capacity);
    (FrameSender { tx }, FrameReceiver { rx })
}

impl FrameSender {
    /// Send a frame, blocking while the queue is full.
    ///
    /// Fails only when the processing side has gone away.
    pub fn send(&self, frame: Vec<f32>) -> Result<()> {
        self.tx
            .send(frame)
            .map_err(|_| crate::Error::msg("frame receiver disconnected"))
    }

    /// Send a frame without ever blocking the caller.
    ///
    /// This is the variant for driver-owned callback threads. Returns
    /// `Ok(false)` when the queue is full and the frame was dropped; the
    /// session scores a silence frame's worth of nothing in its place, which
    /// is the same contract as a missing capture frame.
    pub fn try_send(&self, frame: Vec<f32>) -> Result<bool> {
        match self.tx.try_send(frame) {
            Ok(()) => Ok(true),
            Err(mpsc::TrySendError::Full(_)) => {
                warn!("frame queue full, dropping frame");
                Ok(false)
            }
            Err(mpsc::TrySendError::Disconnected(_)) => {
                Err(crate::Error::msg("frame receiver disconnected"))
            }
        }
    }
}

impl FrameReceiver {
    /// Receive the next frame, or `None` once the sender is dropped.
    pub fn recv(&self) -> Option<Vec<f32>> {
        self.rx.recv().ok()
    }
}

/// Drain `receiver` into `session` until the capture side hangs up, then
/// finalize and forward every speech label to `sink`.
///
/// Each frame is pushed and scored to completion before the next is taken;
/// there is no cancellation beyond the sender dropping.
pub fn drive(
    session: &mut Session,
    scorer: &mut dyn Scorer,
    receiver: FrameReceiver,
    sink: &mut dyn LabelSink,
) -> Result<()> {
    let mut frames = 0usize;
    while let Some(frame) = receiver.recv() {
        session.push_frame(scorer, Some(&frame))?;
        frames += 1;
    }
    debug!(frames, "capture side hung up, finalizing");

    for label in session.speech_labels() {
        sink.on_label(&label)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::thread;

    use anyhow::Result;

    use super::*;
    use crate::score::FrameScores;
    use crate::segmenter::RunScan;
    use crate::session::SessionConfig;
    use crate::timing::TimeMap;

    struct AmplitudeScorer;

    impl Scorer for AmplitudeScorer {
        fn score(&mut self, window: &[f32]) -> Result<FrameScores> {
            let peak = window.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
            let row = if peak > 0.1 {
                vec![1.0, 0.0]
            } else {
                vec![0.0, 1.0]
            };
            FrameScores::from_rows(&[row])
        }
    }

    struct CollectLabels(Vec<SpeechLabel>);

    impl LabelSink for CollectLabels {
        fn on_label(&mut self, label: &SpeechLabel) -> Result<()> {
            self.0.push(label.clone());
            Ok(())
        }
    }

    fn config() -> SessionConfig {
        SessionConfig {
            frame_len: 2,
            overlap: 0,
            run: RunScan {
                target_class: 1,
                companion_class: None,
                min_width_frames: 0,
                label: "silence".to_owned(),
            },
            time: TimeMap::new(1.0, 0.0),
            speech_tag: "speech".to_owned(),
        }
    }

    #[test]
    fn drains_capture_thread_and_emits_labels() -> Result<()> {
        let (tx, rx) = frame_channel(4);

        let producer = thread::spawn(move || {
            for _ in 0..2 {
                tx.send(vec![0.0, 0.0]).unwrap();
            }
            for _ in 0..3 {
                tx.send(vec![0.9, -0.9]).unwrap();
            }
            for _ in 0..2 {
                tx.send(vec![0.0, 0.0]).unwrap();
            }
            // Dropping the sender is the stop signal.
        });

        let mut session = Session::new(config());
        let mut sink = CollectLabels(Vec::new());
        drive(&mut session, &mut AmplitudeScorer, rx, &mut sink)?;
        producer.join().unwrap();

        assert_eq!(sink.0.len(), 1);
        let label = &sink.0[0];
        assert_eq!(label.tag, "speech");
        assert!((label.start_seconds - 2.0).abs() < 1e-5);
        assert!((label.end_seconds() - 5.0).abs() < 1e-5);
        Ok(())
    }

    #[test]
    fn try_send_drops_when_full_instead_of_blocking() -> Result<()> {
        let (tx, rx) = frame_channel(1);
        assert!(tx.try_send(vec![0.0])?);
        assert!(!tx.try_send(vec![0.0])?);

        drop(rx);
        assert!(tx.try_send(vec![0.0]).is_err());
        Ok(())
    }

    #[test]
    fn send_fails_after_receiver_drops() {
        let (tx, rx) = frame_channel(1);
        drop(rx);
        assert!(tx.send(vec![0.0]).is_err());
    }
}

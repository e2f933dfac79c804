//! Run-length segmentation of per-frame class indices.
//!
//! Given the greedy-decoded class sequence, we collect consecutive runs of a
//! target class (typically blank or space, our silence proxies) into closed
//! frame intervals, then drop runs too short to be a real pause. A tolerated
//! companion class may continue a run without being able to start one —
//! scanning for blanks, a stray space inside a pause should not split it.

use serde::Serialize;

/// A closed frame interval `[start_frame, end_frame]` tagged with its class
/// label. Collected in chronological order; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub start_frame: usize,
    pub end_frame: usize,
    pub label: String,
}

/// Run-length scan policy.
#[derive(Debug, Clone)]
pub struct RunScan {
    /// Class index whose runs we collect.
    pub target_class: usize,

    /// Class index tolerated *inside* a run without ending it. A companion
    /// frame never starts a run on its own.
    pub companion_class: Option<usize>,

    /// Runs with `end_frame - start_frame <= min_width_frames` are dropped.
    pub min_width_frames: usize,

    /// Label attached to emitted segments.
    pub label: String,
}

impl RunScan {
    /// Scan `classes` and return the ordered runs of the target class.
    ///
    /// An empty input, or one where the target class never appears, yields an
    /// empty result. A run still open at the end of the sequence is flushed
    /// as `[start, last_index]` rather than dropped.
    pub fn scan(&self, classes: &[usize]) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut run_start: Option<usize> = None;

        for (i, &class) in classes.iter().enumerate() {
            match run_start {
                None => {
                    if class == self.target_class {
                        run_start = Some(i);
                    }
                }
                Some(start) => {
                    if class == self.target_class || Some(class) == self.companion_class {
                        continue;
                    }
                    self.emit(&mut segments, start, i - 1);
                    run_start = None;
                }
            }
        }

        // Flush a trailing open run.
        if let Some(start) = run_start {
            self.emit(&mut segments, start, classes.len() - 1);
        }

        segments
    }

    fn emit(&self, segments: &mut Vec<Segment>, start: usize, end: usize) {
        if end - start <= self.min_width_frames {
            return;
        }
        segments.push(Segment {
            start_frame: start,
            end_frame: end,
            label: self.label.clone(),
        });
    }
}

/// Invert a scan: the gaps between `runs` over `[0, num_frames)`, re-tagged.
///
/// Scanning for silence runs and inverting gives the speech intervals, which
/// is what the diarization hand-off wants.
pub fn complement(runs: &[Segment], num_frames: usize, label: &str) -> Vec<Segment> {
    if num_frames == 0 {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut cursor = 0usize;

    for run in runs {
        if run.start_frame > cursor {
            out.push(Segment {
                start_frame: cursor,
                end_frame: run.start_frame - 1,
                label: label.to_owned(),
            });
        }
        cursor = cursor.max(run.end_frame + 1);
    }

    if cursor < num_frames {
        out.push(Segment {
            start_frame: cursor,
            end_frame: num_frames - 1,
            label: label.to_owned(),
        });
    }

    out
}

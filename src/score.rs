//! Scorer boundary and greedy decoding.
//!
//! The neural network lives on the other side of [`Scorer`]: we hand it a
//! full sample window and get back a frames × classes score matrix. Nothing
//! in this crate inspects the model itself; a scorer failure is opaque and
//! propagates to the caller unchanged.

use anyhow::{Result, ensure};

/// The boundary to the external acoustic model.
///
/// Implementations accept one fixed-length sample window and return
/// per-frame class scores for it. Scoring is deterministic for a given
/// window, so failures are surfaced immediately rather than retried.
pub trait Scorer {
    fn score(&mut self, window: &[f32]) -> Result<FrameScores>;
}

/// A frames × classes matrix of class probabilities (or raw logits).
///
/// Ephemeral by design: scores are decoded into class indices right away and
/// are not retained beyond the current push.
#[derive(Debug, Clone)]
pub struct FrameScores {
    num_classes: usize,
    data: Vec<f32>,
}

impl FrameScores {
    /// Build a score matrix from row-major data.
    ///
    /// `data.len()` must be a whole number of rows of `num_classes` entries.
    pub fn new(num_classes: usize, data: Vec<f32>) -> Result<Self> {
        ensure!(num_classes > 0, "score matrix needs at least one class");
        ensure!(
            data.len() % num_classes == 0,
            "score data length {} is not a multiple of {} classes",
            data.len(),
            num_classes
        );
        Ok(Self { num_classes, data })
    }

    /// Build a score matrix from per-frame rows.
    ///
    /// Every row must have the same length.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Self::new(1, Vec::new());
        };

        let num_classes = first.len();
        let mut data = Vec::with_capacity(rows.len() * num_classes);
        for row in rows {
            ensure!(
                row.len() == num_classes,
                "ragged score matrix: expected {} classes per frame, got {}",
                num_classes,
                row.len()
            );
            data.extend_from_slice(row);
        }
        Self::new(num_classes, data)
    }

    pub fn num_frames(&self) -> usize {
        self.data.len() / self.num_classes
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn frame(&self, i: usize) -> &[f32] {
        let start = i * self.num_classes;
        &self.data[start..start + self.num_classes]
    }

    /// Greedy decode: the arg-max class of every frame, in order.
    ///
    /// Ties resolve to the lowest class index. Quantized scorers do produce
    /// exact ties, so the tie-break is pinned down here rather than left to
    /// iteration order.
    pub fn decode_greedy(&self) -> Vec<usize> {
        (0..self.num_frames())
            .map(|i| argmax(self.frame(i)))
            .collect()
    }
}

/// Index of the largest value, lowest index winning ties.
fn argmax(row: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in row.iter().enumerate().skip(1) {
        if v > row[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_argmax_per_frame() -> Result<()> {
        let scores = FrameScores::from_rows(&[
            vec![0.1, 0.7, 0.2],
            vec![0.9, 0.05, 0.05],
            vec![0.0, 0.0, 1.0],
        ])?;
        assert_eq!(scores.num_frames(), 3);
        assert_eq!(scores.decode_greedy(), vec![1, 0, 2]);
        Ok(())
    }

    #[test]
    fn argmax_tie_resolves_to_lowest_index() -> Result<()> {
        let tied = FrameScores::from_rows(&[vec![0.5, 0.5, 0.0]])?;
        assert_eq!(tied.decode_greedy(), vec![0]);

        let tied_mid = FrameScores::from_rows(&[vec![0.1, 0.45, 0.45]])?;
        assert_eq!(tied_mid.decode_greedy(), vec![1]);
        Ok(())
    }

    #[test]
    fn rejects_ragged_rows() {
        assert!(FrameScores::from_rows(&[vec![0.5, 0.5], vec![0.25, 0.5, 0.25]]).is_err());
    }

    #[test]
    fn empty_scores_decode_to_empty() -> Result<()> {
        let scores = FrameScores::from_rows(&[])?;
        assert_eq!(scores.num_frames(), 0);
        assert!(scores.decode_greedy().is_empty());
        Ok(())
    }

    #[test]
    fn rejects_data_not_divisible_by_classes() {
        assert!(FrameScores::new(3, vec![0.0; 7]).is_err());
    }
}

//! Offline segmentation CLI.
//!
//! Takes a JSON dump of per-frame class scores (plus the model metadata
//! needed to interpret them), scans for silence runs, and writes the speech
//! intervals as an RTTM file and a diarization manifest.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use hush::labels::LabelSet;
use hush::manifest::{ManifestEntry, write_entries};
use hush::rttm::{uniq_id, write_labels};
use hush::score::FrameScores;
use hush::segmenter::{RunScan, complement};
use hush::timing::{DEFAULT_OFFSET_SECONDS, EncoderBlock, TimeMap, seconds_per_frame};

fn main() -> Result<()> {
    hush::logging::init();
    let params = Params::parse();

    let dump = read_dump(&params.scores_path)?;
    let labels = LabelSet::new(dump.labels.iter().cloned());

    let scores = FrameScores::from_rows(&dump.scores)
        .context("score dump does not form a rectangular matrix")?;
    anyhow::ensure!(
        scores.num_frames() == 0 || scores.num_classes() == labels.num_classes(),
        "score dump has {} classes but the vocabulary implies {}",
        scores.num_classes(),
        labels.num_classes()
    );
    let decoded = scores.decode_greedy();

    // Silence proxy: runs of blanks, tolerating interleaved spaces.
    let scan = RunScan {
        target_class: labels.blank(),
        companion_class: labels.space().ok(),
        min_width_frames: params.min_run_frames,
        label: "silence".to_owned(),
    };
    let runs = scan.scan(&decoded);
    let speech = complement(&runs, decoded.len(), "speech");

    let blocks: Vec<EncoderBlock> = dump
        .blocks
        .iter()
        .map(|b| EncoderBlock {
            stride: b.stride,
            repeat: b.repeat,
        })
        .collect();
    let time = TimeMap::new(
        seconds_per_frame(&blocks, dump.window_stride_seconds),
        params.offset_seconds,
    );
    let speech_labels: Vec<_> = speech.iter().map(|s| time.label(s)).collect();

    let id = uniq_id(params.audio_path.as_deref());

    let rttm_out = File::create(&params.rttm_path)
        .with_context(|| format!("failed to create {}", params.rttm_path.display()))?;
    write_labels(BufWriter::new(rttm_out), &id, &speech_labels)?;

    if let Some(manifest_path) = &params.manifest_path {
        let audio = params
            .audio_path
            .as_deref()
            .unwrap_or_else(|| Path::new(""))
            .display()
            .to_string();
        let entry = ManifestEntry::for_diarization(audio, params.rttm_path.display().to_string());
        let manifest_out = File::create(manifest_path)
            .with_context(|| format!("failed to create {}", manifest_path.display()))?;
        write_entries(BufWriter::new(manifest_out), &[entry])?;
    }

    Ok(())
}

/// Offline score dump: the model's vocabulary and stride metadata alongside
/// the per-frame class scores.
#[derive(Debug, Deserialize)]
struct ScoreDump {
    labels: Vec<String>,
    window_stride_seconds: f32,
    blocks: Vec<BlockMeta>,
    scores: Vec<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
struct BlockMeta {
    stride: u32,
    repeat: u32,
}

fn read_dump(path: &Path) -> Result<ScoreDump> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse score dump {}", path.display()))
}

#[derive(Parser, Debug)]
#[command(name = "hush")]
#[command(about = "Silence-run segmentation over per-frame class scores")]
struct Params {
    /// JSON score dump produced by the scoring stage.
    #[arg(short = 's', long = "scores")]
    scores_path: PathBuf,

    /// RTTM output path.
    #[arg(short = 'r', long = "rttm")]
    rttm_path: PathBuf,

    /// Diarization manifest output path (JSON lines).
    #[arg(long = "manifest")]
    manifest_path: Option<PathBuf>,

    /// Audio file the scores came from (used for the RTTM uniq id and the
    /// manifest's audio_filepath).
    #[arg(short = 'a', long = "audio")]
    audio_path: Option<PathBuf>,

    /// Drop silence runs of this width (in frames) or narrower.
    #[arg(long = "min-run-frames", default_value_t = 20)]
    min_run_frames: usize,

    /// Latency calibration applied to emitted times, in seconds.
    #[arg(long = "offset-seconds", default_value_t = DEFAULT_OFFSET_SECONDS)]
    offset_seconds: f32,
}

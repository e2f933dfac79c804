use std::io::{BufReader, Seek, SeekFrom, Write};
use std::thread;

use anyhow::Result;

use hush::feed::{LabelSink, drive, frame_channel};
use hush::labels::LabelSet;
use hush::manifest::ManifestEntry;
use hush::rttm;
use hush::score::{FrameScores, Scorer};
use hush::segmenter::RunScan;
use hush::session::{Session, SessionConfig};
use hush::timing::{EncoderBlock, SpeechLabel, TimeMap, seconds_per_frame};

/// A stand-in for the acoustic model: scores each window as one frame,
/// voting "speech" when the window carries energy and "blank" otherwise,
/// over a character-level vocabulary.
struct EnergyScorer {
    num_classes: usize,
    speech_class: usize,
    blank_class: usize,
}

impl EnergyScorer {
    fn new(labels: &LabelSet) -> Result<Self> {
        Ok(Self {
            num_classes: labels.num_classes(),
            speech_class: labels.class("a")?,
            blank_class: labels.blank(),
        })
    }
}

impl Scorer for EnergyScorer {
    fn score(&mut self, window: &[f32]) -> Result<FrameScores> {
        let energy: f32 = window.iter().map(|s| s * s).sum::<f32>() / window.len() as f32;
        let mut row = vec![0.0; self.num_classes];
        if energy > 0.01 {
            row[self.speech_class] = 1.0;
        } else {
            row[self.blank_class] = 1.0;
        }
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

fn char_vocab() -> LabelSet {
    let mut labels: Vec<String> = (b'a'..=b'z').map(|c| (c as char).to_string()).collect();
    labels.push("'".to_owned());
    labels.push(" ".to_owned());
    LabelSet::new(labels)
}

fn session_config(labels: &LabelSet, seconds_per_frame: f32) -> SessionConfig {
    SessionConfig {
        frame_len: 160,
        overlap: 160,
        run: RunScan {
            target_class: labels.blank(),
            companion_class: labels.space().ok(),
            min_width_frames: 1,
            label: "silence".to_owned(),
        },
        time: TimeMap::new(seconds_per_frame, 0.0),
        speech_tag: "speech".to_owned(),
    }
}

#[test]
fn streams_frames_into_an_rttm_hand_off() -> Result<()> {
    let labels = char_vocab();
    let spf = seconds_per_frame(&[EncoderBlock { stride: 2, repeat: 1 }], 0.01);
    let mut session = Session::new(session_config(&labels, spf));
    let mut scorer = EnergyScorer::new(&labels)?;

    let (tx, rx) = frame_channel(8);
    let producer = thread::spawn(move || {
        let quiet = vec![0.0f32; 160];
        let loud: Vec<f32> = (0..160).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();

        for _ in 0..5 {
            tx.send(quiet.clone()).unwrap();
        }
        for _ in 0..10 {
            tx.send(loud.clone()).unwrap();
        }
        for _ in 0..5 {
            tx.send(quiet.clone()).unwrap();
        }
    });

    let mut sink = CollectLabels(Vec::new());
    drive(&mut session, &mut scorer, rx, &mut sink)?;
    producer.join().unwrap();

    assert_eq!(session.frames_seen(), 20);
    assert_eq!(sink.0.len(), 1);

    let label = &sink.0[0];
    assert_eq!(label.tag, "speech");
    // The overlap keeps loud samples in the window for two pushes past the
    // burst, so speech spans frames 5..=16 at 0.02 s per frame.
    assert!((label.start_seconds - 0.10).abs() < 1e-5);
    assert!((label.end_seconds() - 0.34).abs() < 1e-5);

    // Hand the result off the way the diarizer consumes it: RTTM + manifest.
    let mut rttm_file = tempfile::NamedTempFile::new()?;
    let id = rttm::uniq_id(Some(std::path::Path::new("/data/meeting_0.wav")));
    rttm::write_labels(&mut rttm_file, &id, &sink.0)?;

    rttm_file.seek(SeekFrom::Start(0))?;
    let parsed = rttm::read_labels(BufReader::new(rttm_file.as_file()))?;
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].tag, "speech");
    assert!((parsed[0].start_seconds - 0.10).abs() < 1e-3);

    let mut manifest = Vec::new();
    let entry = ManifestEntry::for_diarization("/data/meeting_0.wav", "/data/meeting_0.rttm");
    writeln!(manifest, "{}", entry.to_json()?)?;
    let line = String::from_utf8(manifest)?;
    assert!(line.contains("\"label\":\"infer\""));
    assert!(line.contains("\"rttm_filepath\":\"/data/meeting_0.rttm\""));

    Ok(())
}

#[test]
fn a_reset_session_forgets_the_previous_stream() -> Result<()> {
    let labels = char_vocab();
    let mut session = Session::new(session_config(&labels, 0.02));
    let mut scorer = EnergyScorer::new(&labels)?;

    let loud = vec![0.5f32; 160];
    for _ in 0..6 {
        session.push_frame(&mut scorer, Some(&loud))?;
    }
    assert!(!session.speech_labels().is_empty());

    session.reset();
    assert_eq!(session.frames_seen(), 0);

    for _ in 0..6 {
        session.push_frame(&mut scorer, None)?;
    }
    assert!(session.speech_labels().is_empty());
    Ok(())
}

#[test]
fn silence_only_streams_produce_an_empty_rttm() -> Result<()> {
    let labels = char_vocab();
    let mut session = Session::new(session_config(&labels, 0.02));
    let mut scorer = EnergyScorer::new(&labels)?;

    for _ in 0..8 {
        session.push_frame(&mut scorer, None)?;
    }

    let speech = session.speech_labels();
    assert!(speech.is_empty());

    let mut out = Vec::new();
    rttm::write_labels(&mut out, "empty", &speech)?;
    assert!(out.is_empty());
    Ok(())
}

//! Hand-landmark detection boundary.
//!
//! The landmark model itself runs out of process. [`SubprocessDetector`] spawns it
//! and talks a small line protocol over its stdin/stdout:
//!
//! 1. On startup the process prints a single `READY` line.
//! 2. Per frame we write a little-endian header (`u32` width, `u32` height,
//!    `u32` channels = 3, `u64` timestamp in ms) followed by the raw RGB bytes.
//! 3. The process answers with one JSON line:
//!    `{"hands": [{"handedness": "Right", "score": 0.93, "landmarks": [{"x":..,"y":..,"z":..}, ...]}], "error": null}`
//!
//! Only the first hand with at least `min_score` and exactly 21 landmarks is used.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use image::RgbImage;
use serde::Deserialize;

use crate::error::Error;
use crate::types::{HandPose, LANDMARK_COUNT, Landmark};

/// Anything that can find (at most) one hand in a frame.
pub trait HandDetector {
    /// `timestamp_ms` must never go backwards between calls.
    fn detect(&mut self, frame: &RgbImage, timestamp_ms: u64) -> Result<Option<HandPose>, Error>;
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: Option<String>,
    #[serde(default = "full_score")]
    score: f32,
    landmarks: Vec<Landmark>,
}

fn full_score() -> f32 {
    1.0
}

#[derive(Deserialize, Debug)]
struct DetectionJson {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// The wire half of the protocol, independent of how the process was started.
pub struct LandmarkLink<R, W> {
    reader: R,
    writer: W,
    min_score: f32,
    line: String,
}

impl<R: BufRead, W: Write> LandmarkLink<R, W> {
    pub fn new(reader: R, writer: W, min_score: f32) -> Self {
        Self { reader, writer, min_score, line: String::new() }
    }

    /// Block until the remote side says `READY`.
    pub fn handshake(&mut self) -> Result<(), Error> {
        self.line.clear();
        self.reader.read_line(&mut self.line)?;
        if self.line.trim() != "READY" {
            return Err(Error::Detector(format!(
                "landmark process did not signal ready, got: {:?}",
                self.line.trim()
            )));
        }
        Ok(())
    }

    fn send_frame(&mut self, frame: &RgbImage, timestamp_ms: u64) -> Result<(), Error> {
        let (w, h) = frame.dimensions();
        self.writer.write_all(&w.to_le_bytes())?;
        self.writer.write_all(&h.to_le_bytes())?;
        self.writer.write_all(&3u32.to_le_bytes())?;
        self.writer.write_all(&timestamp_ms.to_le_bytes())?;
        self.writer.write_all(frame.as_raw())?;
        self.writer.flush()?;
        Ok(())
    }

    fn read_result(&mut self) -> Result<Option<HandPose>, Error> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Err(Error::Detector("landmark process closed its output".into()));
        }
        let result: DetectionJson = serde_json::from_str(self.line.trim())?;

        if let Some(error) = result.error {
            log::warn!("Landmark process error: {}", error);
            return Ok(None);
        }

        for hand in result.hands {
            if hand.score < self.min_score {
                continue;
            }
            match HandPose::from_slice(&hand.landmarks) {
                Some(pose) => {
                    log::trace!(
                        "Hand {:?} score={:.2} index_tip=({:.3},{:.3})",
                        hand.handedness,
                        hand.score,
                        pose.landmarks[8].x,
                        pose.landmarks[8].y
                    );
                    return Ok(Some(pose));
                }
                None => log::warn!(
                    "Dropping hand with {} landmarks (expected {})",
                    hand.landmarks.len(),
                    LANDMARK_COUNT
                ),
            }
        }
        Ok(None)
    }
}

impl<R: BufRead, W: Write> HandDetector for LandmarkLink<R, W> {
    fn detect(&mut self, frame: &RgbImage, timestamp_ms: u64) -> Result<Option<HandPose>, Error> {
        self.send_frame(frame, timestamp_ms)?;
        self.read_result()
    }
}

/// Landmark model running as a child process.
pub struct SubprocessDetector {
    process: Child,
    link: LandmarkLink<BufReader<ChildStdout>, ChildStdin>,
}

impl SubprocessDetector {
    /// `command` is split on whitespace: program first, then its arguments.
    pub fn spawn(command: &str, min_score: f32) -> Result<Self, Error> {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::Detector("empty detector command".into()))?;

        log::info!("Starting landmark process: {}", command);
        let mut process = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Detector(format!("spawn {program}: {e}")))?;

        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| Error::Detector("no stdout on landmark process".into()))?;
        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| Error::Detector("no stdin on landmark process".into()))?;

        let mut link = LandmarkLink::new(BufReader::new(stdout), stdin, min_score);
        if let Err(e) = link.handshake() {
            let _ = process.kill();
            return Err(e);
        }
        log::info!("Landmark process ready");
        Ok(Self { process, link })
    }
}

impl HandDetector for SubprocessDetector {
    fn detect(&mut self, frame: &RgbImage, timestamp_ms: u64) -> Result<Option<HandPose>, Error> {
        self.link.detect(frame, timestamp_ms)
    }
}

impl Drop for SubprocessDetector {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

/// Runs the inner detector only every `every`-th frame and hands back the previous
/// pose in between.
pub struct Throttled<D> {
    inner: D,
    every: u32,
    frame: u64,
    last: Option<HandPose>,
}

impl<D: HandDetector> Throttled<D> {
    pub fn new(inner: D, every: u32) -> Self {
        Self { inner, every: every.max(1), frame: 0, last: None }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: HandDetector> HandDetector for Throttled<D> {
    fn detect(&mut self, frame: &RgbImage, timestamp_ms: u64) -> Result<Option<HandPose>, Error> {
        if self.frame % self.every as u64 == 0 {
            self.last = self.inner.detect(frame, timestamp_ms)?;
        }
        self.frame += 1;
        Ok(self.last.clone())
    }
}

/// Runs `detector` on one frame, but treats an unparseable reply as "no hand" for that
/// frame. A closed pipe or an I/O failure is still an error.
pub fn detect_or_skip<D: HandDetector>(
    detector: &mut D,
    frame: &RgbImage,
    timestamp_ms: u64,
) -> Result<Option<HandPose>, Error> {
    match detector.detect(frame, timestamp_ms) {
        Err(Error::DetectorProtocol(e)) => {
            log::warn!("Skipping frame at {timestamp_ms} ms: bad landmark reply ({e})");
            Ok(None)
        }
        other => other,
    }
}

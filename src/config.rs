// Command line (clap) + optional TOML settings file (serde).
// Every setting has a default, so an empty or missing file is fine.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::error::Error;
use crate::types::{Color, Rect};

/// Draw on your webcam feed with hand gestures.
///
/// One finger moves the cursor, two fingers draw, three fingers erase.
/// Point at SAVE / CLEAR / COLOR with your index finger to press them.
#[derive(Parser, Debug)]
#[command(name = "gesture-whiteboard", version)]
pub struct Cli {
    /// Camera device index (0 = default webcam).
    #[arg(long, default_value_t = 0)]
    pub camera: u32,

    /// Requested capture width; the device may pick the closest it supports.
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Requested capture height.
    #[arg(long, default_value_t = 960)]
    pub height: u32,

    /// Landmark process to spawn, e.g. "python3 hand_detect.py models/hand_landmarker.task".
    #[arg(long, value_name = "COMMAND")]
    pub detector: String,

    /// Run the detector every N frames and reuse the last pose in between.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub detect_every: u32,

    /// Where saved drawings go.
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// TOML settings file (smoothing, brush sizes, buttons, palette...).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// The three on-screen hot zones.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Buttons {
    pub save: Rect,
    pub clear: Rect,
    pub color: Rect,
}

impl Default for Buttons {
    fn default() -> Self {
        Self {
            save: Rect::new(20, 20, 100, 50),
            clear: Rect::new(140, 20, 100, 50),
            color: Rect::new(260, 20, 100, 50),
        }
    }
}

/// Tunables for the gesture state machine and the canvas.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Weight of the previous position, in [0, 1). Higher = smoother but laggier.
    pub smoothing_factor: f32,
    /// Forget the smoothed position when the hand leaves the frame.
    pub reset_smoothing_on_loss: bool,
    pub line_thickness: u32,
    pub erase_radius: u32,
    /// Frames a button stays disabled after it fires.
    pub cooldown_frames: u32,
    pub history_capacity: usize,
    /// Minimum frame gap between two post-stroke snapshots.
    pub snapshot_debounce_frames: u64,
    pub palette: Vec<Color>,
    pub buttons: Buttons,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.6,
            reset_smoothing_on_loss: true,
            line_thickness: 12,
            erase_radius: 20,
            cooldown_frames: 30,
            history_capacity: 10,
            snapshot_debounce_frames: 5,
            palette: vec![
                [255, 0, 255], // magenta
                [0, 255, 0],   // green
                [0, 0, 255],   // blue
                [255, 0, 0],   // red
                [0, 255, 255], // cyan
            ],
            buttons: Buttons::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub frame_weight: f32,
    pub canvas_weight: f32,
    /// Mirror the camera image so moving your hand right moves the cursor right.
    pub mirror: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { frame_weight: 0.7, canvas_weight: 0.3, mirror: true }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub controller: ControllerConfig,
    pub display: DisplayConfig,
}

impl Settings {
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| Error::ConfigRead { path: path.to_path_buf(), source })?;
        let settings = Self::from_toml(&text)?;
        log::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Defaults when no file is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        let c = &self.controller;
        if !(0.0..1.0).contains(&c.smoothing_factor) {
            return Err(Error::ConfigInvalid(format!(
                "smoothing_factor must be in [0, 1), got {}",
                c.smoothing_factor
            )));
        }
        if c.line_thickness == 0 || c.erase_radius == 0 {
            return Err(Error::ConfigInvalid("line_thickness and erase_radius must be positive".into()));
        }
        if c.history_capacity == 0 {
            return Err(Error::ConfigInvalid("history_capacity must be at least 1".into()));
        }
        if c.palette.is_empty() {
            return Err(Error::ConfigInvalid("palette needs at least one color".into()));
        }
        for (name, r) in [("save", c.buttons.save), ("clear", c.buttons.clear), ("color", c.buttons.color)] {
            if r.width <= 0 || r.height <= 0 {
                return Err(Error::ConfigInvalid(format!("button {name} has an empty rectangle")));
            }
        }
        let d = &self.display;
        if d.frame_weight < 0.0 || d.canvas_weight < 0.0 {
            return Err(Error::ConfigInvalid("blend weights cannot be negative".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let s = Settings::from_toml("").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.controller.smoothing_factor, 0.6);
        assert_eq!(s.controller.cooldown_frames, 30);
        assert_eq!(s.controller.history_capacity, 10);
        assert_eq!(s.controller.buttons.clear, Rect::new(140, 20, 100, 50));
    }

    #[test]
    fn partial_override() {
        let s = Settings::from_toml(
            r#"
            [controller]
            smoothing_factor = 0.3
            palette = [[1, 2, 3]]

            [controller.buttons.save]
            x = 500
            y = 10
            width = 80
            height = 40

            [display]
            mirror = false
            "#,
        )
        .unwrap();
        assert_eq!(s.controller.smoothing_factor, 0.3);
        assert_eq!(s.controller.palette, vec![[1, 2, 3]]);
        assert_eq!(s.controller.buttons.save, Rect::new(500, 10, 80, 40));
        assert_eq!(s.controller.buttons.clear, Buttons::default().clear);
        assert_eq!(s.controller.line_thickness, 12);
        assert!(!s.display.mirror);
        assert_eq!(s.display.frame_weight, 0.7);
    }

    #[test]
    fn rejects_out_of_range_smoothing() {
        let err = Settings::from_toml("[controller]\nsmoothing_factor = 1.0\n").unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid(_)));
    }

    #[test]
    fn rejects_empty_palette() {
        let err = Settings::from_toml("[controller]\npalette = []\n").unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid(_)));
    }

    #[test]
    fn rejects_bad_toml() {
        let err = Settings::from_toml("[controller\n").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Settings::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn cli_parses() {
        let cli = Cli::try_parse_from([
            "gesture-whiteboard",
            "--detector",
            "python3 hand_detect.py",
            "--detect-every",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.detect_every, 2);
        assert_eq!(cli.width, 1280);
        assert!(Cli::try_parse_from(["gesture-whiteboard", "--detector", "x", "--detect-every", "0"]).is_err());
    }
}

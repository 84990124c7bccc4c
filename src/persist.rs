// Writes the canvas to disk as a flat PNG.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::RgbImage;

use crate::error::Error;

/// `my_drawing_<unix seconds>.png`
pub fn drawing_file_name(unix_secs: u64) -> String {
    format!("my_drawing_{unix_secs}.png")
}

pub fn save_canvas_at(dir: &Path, canvas: &RgbImage, unix_secs: u64) -> Result<PathBuf, Error> {
    let path = dir.join(drawing_file_name(unix_secs));
    canvas
        .save(&path)
        .map_err(|source| Error::Save { path: path.clone(), source })?;
    Ok(path)
}

/// Save with the current wall-clock time in the file name.
pub fn save_canvas(dir: &Path, canvas: &RgbImage) -> Result<PathBuf, Error> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    save_canvas_at(dir, canvas, now)
}

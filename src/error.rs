// One error enum for the whole app.
// Every variant states *where* things went wrong; the gesture core itself never fails.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed

    #[error("Detector error: {0}")]
    Detector(String), // Spawning or talking to the landmark process failed
    #[error("Detector I/O error: {0}")]
    DetectorIo(#[from] std::io::Error),
    #[error("Detector sent malformed JSON: {0}")]
    DetectorProtocol(#[from] serde_json::Error),

    #[error("Could not save canvas to {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Could not read settings {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not parse settings: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("Invalid setting: {0}")]
    ConfigInvalid(String),
}

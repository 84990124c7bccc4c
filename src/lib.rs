//! Draw on a live camera feed with hand gestures.
//!
//! A landmark detector gives 21 keypoints per frame; [`fingers`] turns them into
//! raised/folded fingers, [`gesture`] matches those against the move/draw/erase
//! templates, and [`controller::GestureController`] drives the [`canvas`] from
//! the result, with smoothing, button cooldowns and snapshot history.

#[cfg(feature = "live")]
pub mod camera;
pub mod canvas;
pub mod compose;
pub mod config;
pub mod controller;
pub mod detector;
pub mod draw;
pub mod error;
pub mod fingers;
pub mod gesture;
pub mod persist;
pub mod smoothing;
pub mod types;

pub use controller::{ButtonAction, DrawState, FrameReport, GestureController};
pub use error::Error;

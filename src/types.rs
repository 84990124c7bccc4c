// Core types shared by the gesture pipeline, the canvas and the window.

use serde::Deserialize;

/// What the window shows; one u32 per pixel.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }
}

/// Pixel position on the frame/canvas. May lie outside the frame; drawing clips.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, used for the on-screen buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Edges count as inside.
    pub fn contains(&self, p: Point) -> bool {
        self.x <= p.x && p.x <= self.x + self.width && self.y <= p.y && p.y <= self.y + self.height
    }
}

/// An RGB color as stored in the canvas.
pub type Color = [u8; 3];

#[inline]
pub fn pack_rgb(c: Color) -> u32 {
    ((c[0] as u32) << 16) | ((c[1] as u32) << 8) | c[2] as u32
}

pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices of the 21-point hand topology the detector emits.
pub mod landmarks {
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_PIP: usize = 14;
    pub const RING_TIP: usize = 16;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_TIP: usize = 20;
}

/// One keypoint, x/y normalized to [0,1] of the frame. z is carried but unused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

/// A single detected hand. The array length makes a short pose unrepresentable.
#[derive(Clone, Debug, PartialEq)]
pub struct HandPose {
    pub landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandPose {
    /// Returns None unless exactly 21 landmarks are given.
    pub fn from_slice(points: &[Landmark]) -> Option<Self> {
        let landmarks: [Landmark; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(Self { landmarks })
    }

    #[inline]
    pub fn get(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }

    /// Index fingertip scaled to pixel coordinates (truncated).
    pub fn index_tip_px(&self, width: u32, height: u32) -> Point {
        let tip = self.landmarks[landmarks::INDEX_TIP];
        Point::new((tip.x * width as f32) as i32, (tip.y * height as f32) as i32)
    }
}

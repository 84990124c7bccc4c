// Opens the camera and hands out RGB frames, mirrored so the view behaves like a mirror:
// move your hand right and the cursor moves right.
// Visual expectation: when main.rs calls `next_frame()`, you get the next camera
// image, already flipped, ready for the detector and for blending.

use crate::error::Error;

use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

use image::{RgbImage, imageops};

// A small wrapper around nokhwa::Camera so our main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
    mirror: bool,
}

impl CameraCapture {
    /// Open camera `index` near the requested resolution (falls back if not exact).
    /// On success nothing is shown yet; we just hold an open stream.
    pub fn new(index: u32, width: u32, height: u32, mirror: bool) -> Result<Self, Error> {
        // 1) Choose the device (0 = default webcam).
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,                // target FPS
        );

        // 2) Ask for RGB frames, closest match to what we asked for.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        // 3) Create the camera (fails if no such device exists).
        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        // 4) Start streaming frames.
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // 5) The actual stream might choose a slightly different resolution.
        let actual = cam.resolution();
        log::info!(
            "Camera {} streaming at {}x{} (asked for {}x{})",
            index,
            actual.width(),
            actual.height(),
            width,
            height
        );

        Ok(Self {
            cam,
            width: actual.width(),
            height: actual.height(),
            mirror,
        })
    }

    /// Grab one frame (blocks until the camera has one) and decode it to RGB.
    /// What you'll see: once main.rs presents it, the live image advances by one frame.
    pub fn next_frame(&mut self) -> Result<RgbImage, Error> {
        // 1) Pull a frame from the camera.
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        // 2) Decode to RGB (handles the various raw formats).
        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        // 3) Rebuild from raw bytes so we don't depend on nokhwa's `image` version.
        let (w, h) = decoded.dimensions();
        let mut rgb_img = RgbImage::from_raw(w, h, decoded.into_raw())
            .ok_or_else(|| Error::CameraFrame(format!("Short RGB buffer for {w}x{h}")))?;

        // 4) Mirror. Visual: raise your right hand and it shows up on the right.
        if self.mirror {
            imageops::flip_horizontal_in_place(&mut rgb_img);
        }
        Ok(rgb_img)
    }

    /// Report the actual resolution the camera is delivering.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

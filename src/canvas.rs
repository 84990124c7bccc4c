// The persistent drawing surface and its snapshot history.
// Nothing outside this module writes canvas pixels.

use std::collections::VecDeque;

use image::{Rgb, RgbImage};

use crate::types::{Color, Point};

pub const BLACK: Color = [0, 0, 0];

/// Owns the canvas raster plus a bounded FIFO of full snapshots for undo.
pub struct CanvasEngine {
    canvas: RgbImage,
    history: VecDeque<RgbImage>,
    capacity: usize,
}

/// A fresh all-black canvas.
pub fn create_canvas(width: u32, height: u32) -> RgbImage {
    RgbImage::new(width, height)
}

impl CanvasEngine {
    pub fn new(width: u32, height: u32, capacity: usize) -> Self {
        Self {
            canvas: create_canvas(width, height),
            history: VecDeque::with_capacity(capacity.max(1) + 1),
            capacity: capacity.max(1),
        }
    }

    pub fn canvas(&self) -> &RgbImage {
        &self.canvas
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> impl Iterator<Item = &RgbImage> {
        self.history.iter()
    }

    /// Anti-aliased, round-capped segment. Does nothing without a `from` point, so a
    /// missing previous point can never produce a line from nowhere.
    pub fn draw_line(&mut self, from: Option<Point>, to: Point, color: Color, thickness: u32) {
        let Some(from) = from else { return };
        stroke_capsule(&mut self.canvas, from, to, thickness as f32 * 0.5, color);
    }

    /// Black square of side `2 * radius` centered on `center`, clipped to the canvas.
    pub fn erase_area(&mut self, center: Point, radius: u32) {
        let (w, h) = self.canvas.dimensions();
        let r = radius as i64;
        let x0 = (center.x as i64 - r).clamp(0, w as i64) as u32;
        let x1 = (center.x as i64 + r).clamp(0, w as i64) as u32;
        let y0 = (center.y as i64 - r).clamp(0, h as i64) as u32;
        let y1 = (center.y as i64 + r).clamp(0, h as i64) as u32;
        for y in y0..y1 {
            for x in x0..x1 {
                self.canvas.put_pixel(x, y, Rgb(BLACK));
            }
        }
    }

    /// Deep copy into history; the oldest snapshot goes when over capacity.
    pub fn snapshot(&mut self) {
        self.history.push_back(self.canvas.clone());
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }

    /// Snapshot the current drawing, then start over on a blank canvas of the same size.
    pub fn clear(&mut self) {
        self.snapshot();
        let (w, h) = self.canvas.dimensions();
        self.canvas = create_canvas(w, h);
    }

    /// Step back to the newest snapshot that differs from what is on screen.
    /// Snapshots equal to the screen are dropped; the restored one stays in history
    /// so a later undo can come back to it. Returns false when there is nothing to go back to.
    pub fn undo(&mut self) -> bool {
        while self.history.back().is_some_and(|snap| *snap == self.canvas) {
            self.history.pop_back();
        }
        match self.history.back() {
            Some(snap) => {
                self.canvas = snap.clone();
                true
            }
            None => false,
        }
    }
}

/// Distance-field rasterizer: coverage falls off over one pixel at the edge.
fn stroke_capsule(img: &mut RgbImage, a: Point, b: Point, radius: f32, color: Color) {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 || radius <= 0.0 {
        return;
    }
    let (ax, ay) = (a.x as f32, a.y as f32);
    let (bx, by) = (b.x as f32, b.y as f32);
    let pad = radius + 1.0;

    let min_x = (ax.min(bx) - pad).floor().max(0.0) as u32;
    let min_y = (ay.min(by) - pad).floor().max(0.0) as u32;
    let max_x = (ax.max(bx) + pad).ceil().min(w as f32 - 1.0);
    let max_y = (ay.max(by) + pad).ceil().min(h as f32 - 1.0);
    if max_x < 0.0 || max_y < 0.0 {
        return;
    }
    let (max_x, max_y) = (max_x as u32, max_y as u32);

    let (dx, dy) = (bx - ax, by - ay);
    let len2 = dx * dx + dy * dy;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (px, py) = (x as f32, y as f32);
            // Project onto the segment, clamp to the end caps.
            let t = if len2 > 0.0 {
                (((px - ax) * dx + (py - ay) * dy) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let (cx, cy) = (ax + dx * t, ay + dy * t);
            let d = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
            let cover = (radius + 0.5 - d).clamp(0.0, 1.0);
            if cover <= 0.0 {
                continue;
            }
            let dst = img.get_pixel_mut(x, y);
            for c in 0..3 {
                let mixed = dst[c] as f32 * (1.0 - cover) + color[c] as f32 * cover;
                dst[c] = mixed.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the camera image with the canvas blended on top.
// 2) Filled and outlined rectangles for the buttons and the eraser box.
// 3) A crosshair that follows the smoothed fingertip.
// 4) A tiny 5x7 bitmap font (scalable) for button labels and the HUD.

use crate::types::{FrameBuffer, Rect};

#[cfg(feature = "live")]
pub use window::Drawer;

#[cfg(feature = "live")]
mod window {
    use crate::error::Error;
    use crate::types::FrameBuffer;
    use minifb::{Key, KeyRepeat, Window, WindowOptions};

    pub struct Drawer {
        window: Window, // the on-screen window you see
    }

    impl Drawer {
        /// Create a resizable window sized to the camera feed.
        /// Visual: a new empty window appears with your chosen title.
        pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
            let options = WindowOptions { resize: true, ..WindowOptions::default() };
            let window = Window::new(title, width, height, options)
                .map_err(|e| Error::WindowInit(e.to_string()))?;
            Ok(Self { window })
        }

        /// Push the pixels for this frame to the screen.
        /// Visual: the window immediately shows the blended camera + canvas image.
        pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
            self.window
                .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
                .map_err(|e| Error::WindowUpdate(e.to_string()))?;
            Ok(())
        }

        /// Returns false when the user closes the window (so we can stop the loop).
        pub fn is_open(&self) -> bool {
            self.window.is_open()
        }

        /// True while ESC or Q is held down (we exit when this is pressed).
        pub fn quit_pressed(&self) -> bool {
            self.window.is_key_down(Key::Escape) || self.window.is_key_down(Key::Q)
        }

        /// Z, once per key press.
        /// Visual: the canvas jumps back to its previous snapshot.
        pub fn undo_pressed_once(&self) -> bool {
            self.window.is_key_pressed(Key::Z, KeyRepeat::No)
        }

        /// C, once per key press (shares the CLEAR button's cooldown).
        pub fn clear_pressed_once(&self) -> bool {
            self.window.is_key_pressed(Key::C, KeyRepeat::No)
        }

        /// S, once per key press (shares the SAVE button's cooldown).
        pub fn save_pressed_once(&self) -> bool {
            self.window.is_key_pressed(Key::S, KeyRepeat::No)
        }
    }
}

/* ---------- Software drawing: pixels, lines, rectangles, crosshair ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
/// Visual: the exact pixel at (x,y) changes color.
#[inline]
pub fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
/// Visual: a straight 1-pixel line appears on top of the camera image.
pub fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Solid rectangle, inclusive of its right/bottom edge like the button hot zones.
/// Visual: the SAVE / CLEAR / COLOR buttons.
pub fn fill_rect(fb: &mut FrameBuffer, r: Rect, color: u32) {
    let x0 = r.x.max(0);
    let y0 = r.y.max(0);
    let x1 = (r.x + r.width).min(fb.width as i32 - 1);
    let y1 = (r.y + r.height).min(fb.height as i32 - 1);
    for y in y0..=y1 {
        for x in x0..=x1 {
            fb.pixels[y as usize * fb.width + x as usize] = color;
        }
    }
}

/// Rectangle outline `thickness` pixels wide, drawn inward.
/// Visual: the red box around the fingertip while erasing.
pub fn stroke_rect(fb: &mut FrameBuffer, r: Rect, thickness: i32, color: u32) {
    let (x1, y1) = (r.x + r.width, r.y + r.height);
    for t in 0..thickness.max(1) {
        draw_line(fb, r.x + t, r.y + t, x1 - t, r.y + t, color);
        draw_line(fb, r.x + t, y1 - t, x1 - t, y1 - t, color);
        draw_line(fb, r.x + t, r.y + t, r.x + t, y1 - t, color);
        draw_line(fb, x1 - t, r.y + t, x1 - t, y1 - t, color);
    }
}

/// Draw a small crosshair centered at (cx,cy), with a gap in the middle.
/// Visual: a "+" shape follows your index fingertip.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    draw_line(fb, cx - size, cy, cx - 2, cy, color);
    draw_line(fb, cx + 2, cy, cx + size, cy, color);
    draw_line(fb, cx, cy - size, cx, cy - 2, color);
    draw_line(fb, cx, cy + 2, cx, cy + size, color);
    put_pixel(fb, cx, cy, color);
}

/* ---------- 5x7 bitmap font (ASCII subset for labels and HUD) ---------- */

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),

        _ => None,
    }
}

/// Scaled block for one glyph pixel.
fn put_block(fb: &mut FrameBuffer, x: i32, y: i32, scale: i32, color: u32) {
    for dy in 0..scale {
        for dx in 0..scale {
            put_pixel(fb, x + dx, y + dy, color);
        }
    }
}

/// Draw a single 5x7 character at (x,y), each font pixel `scale` screen pixels wide,
/// with a 1-block black shadow for contrast.
/// Visual: a glyph that stays readable on both bright video and black canvas.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32, scale: i32) {
    let Some(rows) = glyph5x7(ch) else { return };
    for (pass_offset, pass_color) in [(scale, 0x00000000), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    let px = x + rx * scale + pass_offset;
                    let py = y + ry as i32 * scale + pass_offset;
                    put_block(fb, px, py, scale, pass_color);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs; each glyph advances 6 font pixels.
/// Visual: button labels at scale 2, DRAW/ERASE at scale 3, the HUD at scale 1.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32, scale: i32) {
    let scale = scale.max(1);
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color, scale);
        x += 6 * scale;
    }
}

/// Screen width of `text` at `scale`.
pub fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * 6 * scale.max(1)
}

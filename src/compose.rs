// Builds what you see: camera frame and canvas blended together, then the buttons,
// the active mode, the eraser box and the fingertip crosshair on top.

use image::RgbImage;

use crate::controller::{ButtonAction, DrawState, FrameReport, GestureController};
use crate::draw::{draw_crosshair, draw_text_5x7, fill_rect, stroke_rect, text_width};
use crate::error::Error;
use crate::types::{FrameBuffer, Rect, pack_rgb};

const WHITE: u32 = 0x00_FF_FF_FF;
const GREEN: u32 = 0x00_00_FF_00;
const RED: u32 = 0x00_FF_00_00;
const YELLOW: u32 = 0x00_FF_CC_33;
const GREY: u32 = 0x00_60_60_60;

/// Weighted sum per channel, rounded and saturated: `frame * fw + canvas * cw`.
pub fn blend_weighted(
    screen: &mut FrameBuffer,
    frame: &RgbImage,
    canvas: &RgbImage,
    frame_weight: f32,
    canvas_weight: f32,
) -> Result<(), Error> {
    if frame.dimensions() != canvas.dimensions() {
        return Err(Error::CameraFrame(format!(
            "blend: frame {:?} vs canvas {:?}",
            frame.dimensions(),
            canvas.dimensions()
        )));
    }
    let (w, h) = frame.dimensions();
    if screen.width != w as usize || screen.height != h as usize {
        return Err(Error::CameraFrame("blend: screen dimension mismatch".into()));
    }

    for ((dst, f), c) in screen.pixels.iter_mut().zip(frame.pixels()).zip(canvas.pixels()) {
        let mix = |i: usize| {
            (f.0[i] as f32 * frame_weight + c.0[i] as f32 * canvas_weight)
                .round()
                .clamp(0.0, 255.0) as u32
        };
        *dst = (mix(0) << 16) | (mix(1) << 8) | mix(2);
    }
    Ok(())
}

fn button_fill(action: ButtonAction, controller: &GestureController) -> u32 {
    match action {
        ButtonAction::Save => GREEN,
        ButtonAction::Clear => RED,
        ButtonAction::NextColor => pack_rgb(controller.color()),
    }
}

/// Buttons, labels, mode text, eraser box and cursor.
pub fn draw_overlay(
    screen: &mut FrameBuffer,
    controller: &GestureController,
    report: &FrameReport,
    hud: &str,
) {
    for action in ButtonAction::ALL {
        let r = controller.button_rect(action);
        // Greyed out while cooling down.
        let fill = if controller.cooldown(action).ready() { button_fill(action, controller) } else { GREY };
        fill_rect(screen, r, fill);
        let label = action.label();
        let tx = r.x + (r.width - text_width(label, 2)) / 2;
        let ty = r.y + (r.height - 14) / 2;
        draw_text_5x7(screen, tx, ty, label, WHITE, 2);

        // Frames left before it can fire again, tucked in the bottom-right corner.
        let left = controller.cooldown(action).remaining();
        if left > 0 {
            let n = left.to_string();
            draw_text_5x7(screen, r.x + r.width - text_width(&n, 1) - 3, r.y + r.height - 10, &n, WHITE, 1);
        }
    }

    let below_buttons = ButtonAction::ALL
        .iter()
        .map(|&a| {
            let r = controller.button_rect(a);
            r.y + r.height
        })
        .max()
        .unwrap_or(0)
        + 16;

    match (report.state, report.cursor) {
        (DrawState::Drawing, _) => draw_text_5x7(screen, 20, below_buttons, "DRAW", GREEN, 3),
        (DrawState::Erasing, Some(c)) => {
            let r = controller.config().erase_radius as i32 + 5;
            stroke_rect(screen, Rect::new(c.x - r, c.y - r, 2 * r, 2 * r), 2, RED);
            draw_text_5x7(screen, 20, below_buttons, "ERASE", RED, 3);
        }
        (DrawState::Erasing, None) => draw_text_5x7(screen, 20, below_buttons, "ERASE", RED, 3),
        (DrawState::Idle, _) => {}
    }

    if let Some(c) = report.cursor {
        draw_crosshair(screen, c.x, c.y, 12, YELLOW);
    }

    let hud_y = screen.height as i32 - 16;
    draw_text_5x7(screen, 8, hud_y, hud, WHITE, 1);

    // Raw finger reading, handy when a gesture won't register.
    if let Some(f) = report.fingers {
        let text = format!("UP: {f}");
        let x = screen.width as i32 - text_width(&text, 1) - 8;
        draw_text_5x7(screen, x, hud_y, &text, WHITE, 1);
    }
}

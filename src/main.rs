// What you SEE:
// • Live (mirrored) camera with your drawing blended on top.
// • Index finger up: move the cursor. Index + middle: draw. Index + middle + ring: erase.
// • Point at SAVE / CLEAR / COLOR with your index finger to press them.
// • Keys: S save, C clear, Z undo, Q or ESC quit.

use std::time::{Duration, Instant};

use clap::Parser;

use gesture_whiteboard::camera::CameraCapture;
use gesture_whiteboard::compose::{blend_weighted, draw_overlay};
use gesture_whiteboard::config::{Cli, Settings};
use gesture_whiteboard::detector::{SubprocessDetector, Throttled, detect_or_skip};
use gesture_whiteboard::draw::Drawer;
use gesture_whiteboard::persist;
use gesture_whiteboard::types::FrameBuffer;
use gesture_whiteboard::{ButtonAction, Error, GestureController};

/// Hands scored below this by the landmark model are ignored.
const MIN_HAND_SCORE: f32 = 0.5;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = Settings::load_or_default(cli.config.as_deref())?;

    /* --- Camera + window + detector ---
       Visual: window opens with the live (mirrored) camera feed. */
    let mut cam = CameraCapture::new(cli.camera, cli.width, cli.height, settings.display.mirror)?;
    let (w, h) = cam.resolution();
    let mut drawer = Drawer::new("Gesture Whiteboard", w as usize, h as usize)?;
    let mut detector = Throttled::new(
        SubprocessDetector::spawn(&cli.detector, MIN_HAND_SCORE)?,
        cli.detect_every,
    );

    /* --- Screen buffer ---
       Visual: this is the image you actually see each frame. */
    let mut screen = FrameBuffer::new(w as usize, h as usize);

    /* --- Whiteboard ---
       Created on the first frame, at that frame's size.
       Visual: whatever you draw lives here and is blended over the video. */
    let mut whiteboard: Option<GestureController> = None;

    /* --- HUD / FPS ---
       Visual: small text at the bottom shows FPS and whether a hand is seen. */
    let started = Instant::now();
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    log::info!("Press Q or ESC to quit");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.quit_pressed() {
        let now = Instant::now();

        // 1) Grab a frame. A failed read ends the session.
        let frame = match cam.next_frame() {
            Ok(f) => f,
            Err(e) => {
                log::error!("{e}; stopping");
                break;
            }
        };
        let (fw, fh) = frame.dimensions();

        let controller = whiteboard
            .get_or_insert_with(|| GestureController::new(fw, fh, settings.controller.clone()));
        if controller.engine().dimensions() != (fw, fh) {
            log::warn!("Skipping {fw}x{fh} frame; canvas is {:?}", controller.engine().dimensions());
            continue;
        }
        if screen.width != fw as usize || screen.height != fh as usize {
            screen = FrameBuffer::new(fw as usize, fh as usize);
        }

        // 2) Find the hand and run the gesture state machine.
        //    Visual: the crosshair follows your fingertip; strokes appear while drawing.
        let timestamp_ms = started.elapsed().as_millis() as u64;
        let pose = detect_or_skip(&mut detector, &frame, timestamp_ms)?;
        let mut report = controller.tick(pose.as_ref());

        // 3) Keyboard shortcuts share the buttons' cooldowns.
        if drawer.undo_pressed_once() {
            controller.undo();
        }
        if drawer.clear_pressed_once() && controller.press(ButtonAction::Clear) {
            report.actions.push(ButtonAction::Clear);
        }
        if drawer.save_pressed_once() && controller.press(ButtonAction::Save) {
            report.actions.push(ButtonAction::Save);
        }
        report.state = controller.state();

        if report.actions.contains(&ButtonAction::Save) {
            match persist::save_canvas(&cli.output_dir, controller.engine().canvas()) {
                Ok(path) => log::info!("Saved: {}", path.display()),
                Err(e) => log::warn!("{e}"),
            }
        }

        // 4) Compose and present.
        //    Visual: 70% camera + 30% canvas, then buttons, mode text and cursor on top.
        blend_weighted(
            &mut screen,
            &frame,
            controller.engine().canvas(),
            settings.display.frame_weight,
            settings.display.canvas_weight,
        )?;
        let hand = if pose.is_some() { "" } else { " | NO HAND" };
        let hud = format!("{}{}", hud_fps_text, hand);
        draw_overlay(&mut screen, controller, &report, &hud);
        drawer.present(&screen)?;

        // 5) FPS counter (log + HUD once per second)
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            log::debug!("FPS: {:.1}", fps);
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    log::info!("Bye");
    Ok(())
}

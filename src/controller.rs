// Per-frame gesture state machine: pose in, canvas mutations and button actions out.
//
// One `tick` per video frame. Everything that survives between frames (smoothing,
// pen state, cooldowns, the canvas) lives on the controller instance.

use crate::canvas::CanvasEngine;
use crate::config::ControllerConfig;
use crate::fingers::{self, FingerVector, INDEX};
use crate::gesture::{self, Gesture};
use crate::smoothing::PositionSmoother;
use crate::types::{Color, HandPose, Point, Rect};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawState {
    #[default]
    Idle,
    Drawing,
    Erasing,
}

/// What the canvas should do for one dispatched gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Stop the stroke; next draw starts fresh.
    LiftPen,
    /// Continue the stroke. `seed` starts it at the cursor so no line jumps in.
    Stroke { seed: bool },
    Erase,
}

/// The whole gesture table in one place.
pub fn transition(state: DrawState, gesture: Gesture) -> (DrawState, Effect) {
    match (state, gesture) {
        (_, Gesture::Move) => (DrawState::Idle, Effect::LiftPen),
        (DrawState::Drawing, Gesture::Draw) => (DrawState::Drawing, Effect::Stroke { seed: false }),
        (DrawState::Idle | DrawState::Erasing, Gesture::Draw) => {
            (DrawState::Drawing, Effect::Stroke { seed: true })
        }
        (_, Gesture::Erase) => (DrawState::Erasing, Effect::Erase),
    }
}

/// Discrete actions, each behind its own cooldown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    /// The caller writes the canvas to disk.
    Save,
    Clear,
    NextColor,
}

impl ButtonAction {
    pub const ALL: [ButtonAction; 3] = [ButtonAction::Save, ButtonAction::Clear, ButtonAction::NextColor];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Save => "SAVE",
            Self::Clear => "CLEAR",
            Self::NextColor => "COLOR",
        }
    }
}

/// Frame-counted hold-off.
#[derive(Clone, Copy, Debug)]
pub struct Cooldown {
    remaining: u32,
    hold: u32,
}

impl Cooldown {
    pub fn new(hold: u32) -> Self {
        Self { remaining: 0, hold }
    }

    #[inline]
    pub fn ready(&self) -> bool {
        self.remaining == 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Fires only when ready, then holds off.
    pub fn try_fire(&mut self) -> bool {
        if !self.ready() {
            return false;
        }
        self.remaining = self.hold;
        true
    }

    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

/// What happened this frame; the main loop renders and persists from this.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub fingers: Option<FingerVector>,
    pub gesture: Option<Gesture>,
    pub state: DrawState,
    pub cursor: Option<Point>,
    pub actions: Vec<ButtonAction>,
    pub snapshot_taken: bool,
}

pub struct GestureController {
    config: ControllerConfig,
    engine: CanvasEngine,
    smoother: PositionSmoother,
    state: DrawState,
    prev_point: Option<Point>,
    cursor: Option<Point>,
    save_cooldown: Cooldown,
    clear_cooldown: Cooldown,
    color_cooldown: Cooldown,
    color_index: usize,
    frame: u64,
    last_snapshot_frame: u64,
}

impl GestureController {
    /// Creates the blank canvas at the frame size and records it as the first snapshot.
    pub fn new(width: u32, height: u32, config: ControllerConfig) -> Self {
        let mut engine = CanvasEngine::new(width, height, config.history_capacity);
        engine.snapshot();
        let hold = config.cooldown_frames;
        let smoother = PositionSmoother::new(config.smoothing_factor);
        log::debug!(
            "Canvas {}x{}, smoothing {:.2}, cooldown {} frames, history {}",
            width,
            height,
            smoother.factor(),
            hold,
            config.history_capacity
        );
        Self {
            smoother,
            engine,
            state: DrawState::Idle,
            prev_point: None,
            cursor: None,
            save_cooldown: Cooldown::new(hold),
            clear_cooldown: Cooldown::new(hold),
            color_cooldown: Cooldown::new(hold),
            color_index: 0,
            frame: 0,
            last_snapshot_frame: 0,
            config,
        }
    }

    pub fn engine(&self) -> &CanvasEngine {
        &self.engine
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn prev_point(&self) -> Option<Point> {
        self.prev_point
    }

    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn color(&self) -> Color {
        // Palette is validated non-empty; fall back to magenta for a hand-built config.
        self.config.palette.get(self.color_index).copied().unwrap_or([255, 0, 255])
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn cooldown(&self, action: ButtonAction) -> &Cooldown {
        match action {
            ButtonAction::Save => &self.save_cooldown,
            ButtonAction::Clear => &self.clear_cooldown,
            ButtonAction::NextColor => &self.color_cooldown,
        }
    }

    pub fn button_rect(&self, action: ButtonAction) -> Rect {
        let b = &self.config.buttons;
        match action {
            ButtonAction::Save => b.save,
            ButtonAction::Clear => b.clear,
            ButtonAction::NextColor => b.color,
        }
    }

    /// Advance one frame. `None` means no hand this frame: the pen state is kept,
    /// only the cooldowns move.
    pub fn tick(&mut self, pose: Option<&HandPose>) -> FrameReport {
        let mut report = FrameReport::default();

        match pose {
            Some(hand) => self.on_hand(hand, &mut report),
            None => {
                if self.config.reset_smoothing_on_loss {
                    self.smoother.reset();
                }
                self.cursor = None;
            }
        }

        self.save_cooldown.tick();
        self.clear_cooldown.tick();
        self.color_cooldown.tick();
        self.frame += 1;

        report.state = self.state;
        report.cursor = self.cursor;
        report
    }

    fn on_hand(&mut self, hand: &HandPose, report: &mut FrameReport) {
        let fingers = fingers::fingers_up(hand);
        let (w, h) = self.engine.dimensions();
        let cursor = self.smoother.update(hand.index_tip_px(w, h));
        self.cursor = Some(cursor);
        report.fingers = Some(fingers);

        if fingers.is_up(INDEX) {
            for action in ButtonAction::ALL {
                if self.button_rect(action).contains(cursor) && self.press(action) {
                    report.actions.push(action);
                }
            }
        }

        let Some(gesture) = gesture::classify(&fingers) else { return };
        report.gesture = Some(gesture);

        let (next, effect) = transition(self.state, gesture);
        if next != self.state {
            log::debug!("{:?} -> {:?} ({})", self.state, next, gesture.as_str());
        }
        self.state = next;

        let acted = self.apply(effect, cursor);
        if acted && self.frame - self.last_snapshot_frame > self.config.snapshot_debounce_frames {
            self.engine.snapshot();
            self.last_snapshot_frame = self.frame;
            report.snapshot_taken = true;
        }
    }

    /// Returns true when the canvas changed.
    fn apply(&mut self, effect: Effect, cursor: Point) -> bool {
        match effect {
            Effect::LiftPen => {
                self.prev_point = None;
                false
            }
            Effect::Stroke { seed } => {
                if seed {
                    self.prev_point = Some(cursor);
                }
                let color = self.color();
                self.engine.draw_line(self.prev_point, cursor, color, self.config.line_thickness);
                self.prev_point = Some(cursor);
                true
            }
            Effect::Erase => {
                self.engine.erase_area(cursor, self.config.erase_radius);
                self.prev_point = None;
                true
            }
        }
    }

    /// Fire a discrete action if its cooldown allows. Hot zones and keyboard
    /// shortcuts both come through here. Returns whether it fired.
    pub fn press(&mut self, action: ButtonAction) -> bool {
        let fired = match action {
            ButtonAction::Save => self.save_cooldown.try_fire(),
            ButtonAction::Clear => self.clear_cooldown.try_fire(),
            ButtonAction::NextColor => self.color_cooldown.try_fire(),
        };
        if !fired {
            return false;
        }
        match action {
            ButtonAction::Save => {}
            ButtonAction::Clear => {
                self.engine.clear();
                self.state = DrawState::Idle;
                self.prev_point = None;
                log::info!("Canvas cleared");
            }
            ButtonAction::NextColor => {
                self.color_index = (self.color_index + 1) % self.config.palette.len().max(1);
                log::info!("Color -> {:?}", self.color());
            }
        }
        true
    }

    /// Roll the canvas back one snapshot and lift the pen.
    pub fn undo(&mut self) -> bool {
        let changed = self.engine.undo();
        if changed {
            self.state = DrawState::Idle;
            self.prev_point = None;
            log::info!("Undo ({} snapshots left)", self.engine.history_len());
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{BLACK, create_canvas};
    use crate::fingers::tests::pose_with;

    const W: u32 = 640;
    const H: u32 = 480;

    const MOVE: [bool; 5] = [false, true, false, false, false];
    const DRAW: [bool; 5] = [false, true, true, false, false];
    const ERASE: [bool; 5] = [false, true, true, true, false];
    const FIST: [bool; 5] = [false, false, false, false, false];

    fn controller() -> GestureController {
        let config = ControllerConfig { smoothing_factor: 0.0, ..ControllerConfig::default() };
        GestureController::new(W, H, config)
    }

    /// Pose with the index tip at pixel (x, y) on a 640x480 frame.
    fn at(up: [bool; 5], x: i32, y: i32) -> HandPose {
        // Aim at the pixel center so truncation lands on (x, y).
        pose_with(up, (x as f32 + 0.5) / W as f32, (y as f32 + 0.5) / H as f32)
    }

    fn lit(c: &GestureController) -> usize {
        c.engine().canvas().pixels().filter(|p| p.0 != BLACK).count()
    }

    #[test]
    fn transition_table() {
        use DrawState::*;
        for s in [Idle, Drawing, Erasing] {
            assert_eq!(transition(s, Gesture::Move), (Idle, Effect::LiftPen));
            assert_eq!(transition(s, Gesture::Erase), (Erasing, Effect::Erase));
        }
        assert_eq!(transition(Idle, Gesture::Draw), (Drawing, Effect::Stroke { seed: true }));
        assert_eq!(transition(Erasing, Gesture::Draw), (Drawing, Effect::Stroke { seed: true }));
        assert_eq!(transition(Drawing, Gesture::Draw), (Drawing, Effect::Stroke { seed: false }));
    }

    #[test]
    fn cooldown_counts_down() {
        let mut cd = Cooldown::new(3);
        assert!(cd.try_fire());
        assert!(!cd.try_fire());
        cd.tick();
        cd.tick();
        assert!(!cd.ready());
        cd.tick();
        assert!(cd.ready());
        cd.tick();
        assert_eq!(cd.remaining(), 0);
    }

    #[test]
    fn starts_idle_with_blank_snapshot() {
        let c = controller();
        assert_eq!(c.state(), DrawState::Idle);
        assert_eq!(c.engine().history_len(), 1);
        assert_eq!(c.engine().dimensions(), (W, H));
        assert_eq!(lit(&c), 0);
    }

    #[test]
    fn thumb_plus_two_fingers_draws() {
        let mut c = controller();
        let r = c.tick(Some(&at([true, true, true, false, false], 300, 300)));
        assert_eq!(r.gesture, Some(Gesture::Draw));
        assert_eq!(r.state, DrawState::Drawing);
        assert!(lit(&c) > 0);
        assert_eq!(c.prev_point(), Some(Point::new(300, 300)));
    }

    #[test]
    fn stroke_connects_consecutive_frames() {
        let mut c = controller();
        c.tick(Some(&at(DRAW, 300, 300)));
        c.tick(Some(&at(DRAW, 400, 300)));
        let canvas = c.engine().canvas();
        assert_ne!(canvas.get_pixel(350, 300).0, BLACK);
        assert_eq!(canvas.get_pixel(350, 300).0, c.color());
    }

    #[test]
    fn move_lifts_pen_so_no_jump_line() {
        let mut c = controller();
        c.tick(Some(&at(DRAW, 100, 300)));
        let r = c.tick(Some(&at(MOVE, 300, 300)));
        assert_eq!(r.gesture, Some(Gesture::Move));
        assert_eq!(r.state, DrawState::Idle);
        assert_eq!(c.prev_point(), None);

        c.tick(Some(&at(DRAW, 500, 300)));
        assert_eq!(c.engine().canvas().get_pixel(300, 300).0, BLACK);
        assert_ne!(c.engine().canvas().get_pixel(500, 300).0, BLACK);
    }

    #[test]
    fn erase_zeroes_square_at_cursor() {
        let mut c = controller();
        for y in (180..=300).step_by(4) {
            c.tick(Some(&at(MOVE, 100, y)));
            c.tick(Some(&at(DRAW, 100, y)));
            c.tick(Some(&at(DRAW, 500, y)));
        }
        assert_ne!(c.engine().canvas().get_pixel(300, 240).0, BLACK);

        let r = c.tick(Some(&at(ERASE, 300, 240)));
        assert_eq!(r.gesture, Some(Gesture::Erase));
        assert_eq!(r.state, DrawState::Erasing);
        assert_eq!(c.prev_point(), None);
        let canvas = c.engine().canvas();
        for y in 220..260 {
            for x in 280..320 {
                assert_eq!(canvas.get_pixel(x, y).0, BLACK);
            }
        }
        assert_ne!(canvas.get_pixel(270, 240).0, BLACK);
        assert_ne!(canvas.get_pixel(330, 240).0, BLACK);
    }

    #[test]
    fn unknown_pose_keeps_state() {
        let mut c = controller();
        c.tick(Some(&at(DRAW, 300, 300)));
        let r = c.tick(Some(&at(FIST, 320, 300)));
        assert_eq!(r.gesture, None);
        assert_eq!(r.state, DrawState::Drawing);
        assert_eq!(c.prev_point(), Some(Point::new(300, 300)));
    }

    #[test]
    fn missing_hand_only_ticks_cooldowns() {
        let mut c = controller();
        c.tick(Some(&at(DRAW, 300, 300)));
        let before = c.engine().canvas().clone();
        let r = c.tick(None);
        assert_eq!(r.state, DrawState::Drawing);
        assert_eq!(r.cursor, None);
        assert_eq!(r.gesture, None);
        assert_eq!(c.prev_point(), Some(Point::new(300, 300)));
        assert_eq!(c.engine().canvas(), &before);
    }

    #[test]
    fn smoothing_resets_when_hand_lost() {
        let config = ControllerConfig { smoothing_factor: 0.6, ..ControllerConfig::default() };
        let mut c = GestureController::new(W, H, config);
        c.tick(Some(&at(MOVE, 600, 400)));
        c.tick(None);
        let r = c.tick(Some(&at(MOVE, 400, 200)));
        assert_eq!(r.cursor, Some(Point::new(400, 200)));
    }

    #[test]
    fn smoothing_carries_over_when_reset_disabled() {
        let config = ControllerConfig {
            smoothing_factor: 0.6,
            reset_smoothing_on_loss: false,
            ..ControllerConfig::default()
        };
        let mut c = GestureController::new(W, H, config);
        c.tick(Some(&at(MOVE, 600, 400)));
        c.tick(None);
        let r = c.tick(Some(&at(MOVE, 400, 200)));
        // 600*0.6 + 400*0.4, 400*0.6 + 200*0.4
        assert_eq!(r.cursor, Some(Point::new(520, 320)));
    }

    #[test]
    fn save_button_is_cooldown_gated() {
        let mut c = controller();
        let on_save = at(MOVE, 60, 40);
        let mut fired_at = Vec::new();
        for frame in 0..70 {
            let r = c.tick(Some(&on_save));
            if r.actions.contains(&ButtonAction::Save) {
                fired_at.push(frame);
            }
        }
        assert_eq!(fired_at, vec![0, 30, 60]);
    }

    #[test]
    fn button_needs_index_finger() {
        let mut c = controller();
        let r = c.tick(Some(&at([true, false, true, false, false], 60, 40)));
        assert!(r.actions.is_empty());
    }

    #[test]
    fn clear_button_resets_canvas_and_state() {
        let mut c = controller();
        c.tick(Some(&at(DRAW, 300, 300)));
        for _ in 0..6 {
            c.tick(None);
        }
        c.tick(Some(&at(DRAW, 400, 300)));
        let drawn = c.engine().canvas().clone();
        let before = c.engine().history_len();

        let r = c.tick(Some(&at(MOVE, 190, 45)));
        assert_eq!(r.actions, vec![ButtonAction::Clear]);
        assert_eq!(r.state, DrawState::Idle);
        assert_eq!(c.prev_point(), None);
        assert_eq!(c.engine().canvas(), &create_canvas(W, H));
        assert_eq!(c.engine().history_len(), before + 1);
        assert_eq!(c.engine().history().last(), Some(&drawn));
    }

    #[test]
    fn color_button_cycles_palette() {
        let mut c = controller();
        let first = c.color();
        let r = c.tick(Some(&at(MOVE, 300, 40)));
        assert_eq!(r.actions, vec![ButtonAction::NextColor]);
        assert_ne!(c.color(), first);
        assert_eq!(c.color(), c.config().palette[1]);
    }

    #[test]
    fn history_snapshots_are_debounced() {
        let mut c = controller();
        let mut snaps = Vec::new();
        for frame in 0..20 {
            let r = c.tick(Some(&at(DRAW, 100 + frame * 10, 300)));
            if r.snapshot_taken {
                snaps.push(frame);
            }
        }
        assert_eq!(snaps, vec![6, 12, 18]);
        assert_eq!(c.engine().history_len(), 4);
    }

    #[test]
    fn history_never_exceeds_capacity() {
        let mut c = controller();
        for frame in 0..400 {
            c.tick(Some(&at(DRAW, 100 + (frame % 40) * 10, 300)));
            assert!(c.engine().history_len() <= 10);
        }
        assert_eq!(c.engine().history_len(), 10);
    }

    #[test]
    fn undo_rolls_back_and_lifts_pen() {
        let mut c = controller();
        for _ in 0..6 {
            c.tick(None);
        }
        let r = c.tick(Some(&at(DRAW, 300, 300)));
        assert!(r.snapshot_taken);
        assert!(c.undo());
        assert_eq!(lit(&c), 0);
        assert_eq!(c.state(), DrawState::Idle);
        assert_eq!(c.prev_point(), None);
    }
}

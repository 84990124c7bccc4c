// First-order low-pass on the fingertip position to hide detector jitter.
// Higher factor = steadier cursor but more lag.

use crate::types::Point;

#[derive(Clone, Debug)]
pub struct PositionSmoother {
    factor: f32,
    // Kept unrounded so a steady input converges exactly.
    last: Option<(f32, f32)>,
}

impl PositionSmoother {
    /// `factor` is the weight of the previous value, in [0, 1).
    pub fn new(factor: f32) -> Self {
        Self { factor: factor.clamp(0.0, 0.999), last: None }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Blend `raw` into the running value and return it rounded to pixels.
    /// The first sample after `new`/`reset` passes through unchanged.
    pub fn update(&mut self, raw: Point) -> Point {
        let (rx, ry) = (raw.x as f32, raw.y as f32);
        let next = match self.last {
            Some((px, py)) => {
                let a = self.factor;
                (px * a + rx * (1.0 - a), py * a + ry * (1.0 - a))
            }
            None => (rx, ry),
        };
        self.last = Some(next);
        Point::new(next.0.round() as i32, next.1.round() as i32)
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

}

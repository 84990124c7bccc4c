// Which fingers are raised? Turns one hand pose into five booleans.
//
// Assumes an upright, palm-facing hand in a mirrored camera view. No correction
// for rotation or tilt, and the left/right guess is recomputed every call (it can
// flicker when the index and pinky tips line up vertically).

use crate::types::{HandPose, landmarks};

pub const THUMB: usize = 0;
pub const INDEX: usize = 1;
pub const MIDDLE: usize = 2;
pub const RING: usize = 3;
pub const PINKY: usize = 4;

/// Extended/not-extended per finger: thumb, index, middle, ring, pinky.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FingerVector(pub [bool; 5]);

impl FingerVector {
    #[inline]
    pub fn is_up(&self, finger: usize) -> bool {
        self.0[finger]
    }
}

/// `1` per raised finger, thumb first: index + middle reads `01100`.
impl std::fmt::Display for FingerVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for up in self.0 {
            f.write_str(if up { "1" } else { "0" })?;
        }
        Ok(())
    }
}

const TIPS: [usize; 4] = [
    landmarks::INDEX_TIP,
    landmarks::MIDDLE_TIP,
    landmarks::RING_TIP,
    landmarks::PINKY_TIP,
];
const PIPS: [usize; 4] = [
    landmarks::INDEX_PIP,
    landmarks::MIDDLE_PIP,
    landmarks::RING_PIP,
    landmarks::PINKY_PIP,
];

/// Orientation proxy: pinky tip to the right of the index tip reads as a right hand.
pub fn is_right_oriented(hand: &HandPose) -> bool {
    hand.get(landmarks::PINKY_TIP).x > hand.get(landmarks::INDEX_TIP).x
}

pub fn fingers_up(hand: &HandPose) -> FingerVector {
    let mut up = [false; 5];

    let tip = hand.get(landmarks::THUMB_TIP).x;
    let ip = hand.get(landmarks::THUMB_IP).x;
    up[THUMB] = if is_right_oriented(hand) { tip > ip } else { tip < ip };

    // Smaller y is higher on screen.
    for (i, (&t, &p)) in TIPS.iter().zip(PIPS.iter()).enumerate() {
        up[INDEX + i] = hand.get(t).y < hand.get(p).y;
    }

    FingerVector(up)
}

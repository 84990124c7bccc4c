// Gesture templates: a pattern over the five fingers with "don't care" slots.
// Classification walks the templates in a fixed priority order and stops at the
// first exact match.

use crate::fingers::FingerVector;

/// One slot of a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Up,
    Down,
    Any,
}

impl Slot {
    #[inline]
    fn accepts(self, up: bool) -> bool {
        match self {
            Slot::Up => up,
            Slot::Down => !up,
            Slot::Any => true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// Index only: hover without drawing.
    Move,
    /// Index + middle.
    Draw,
    /// Index + middle + ring.
    Erase,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Draw => "draw",
            Self::Erase => "erase",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureTemplate {
    pub gesture: Gesture,
    pub slots: [Slot; 5],
}

use Slot::{Any, Down, Up};

/// Priority order matters: the first match wins.
pub const TEMPLATES: [GestureTemplate; 3] = [
    GestureTemplate { gesture: Gesture::Move, slots: [Any, Up, Down, Down, Down] },
    GestureTemplate { gesture: Gesture::Draw, slots: [Any, Up, Up, Down, Down] },
    GestureTemplate { gesture: Gesture::Erase, slots: [Any, Up, Up, Up, Down] },
];

/// Exact equality on every slot that isn't `Any`.
pub fn matches(fingers: &FingerVector, template: &GestureTemplate) -> bool {
    template
        .slots
        .iter()
        .zip(fingers.0.iter())
        .all(|(slot, &up)| slot.accepts(up))
}

pub fn classify_with(fingers: &FingerVector, templates: &[GestureTemplate]) -> Option<Gesture> {
    templates.iter().find(|t| matches(fingers, t)).map(|t| t.gesture)
}

pub fn classify(fingers: &FingerVector) -> Option<Gesture> {
    classify_with(fingers, &TEMPLATES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_vectors() -> impl Iterator<Item = FingerVector> {
        (0u8..32).map(|bits| FingerVector(std::array::from_fn(|i| bits & (1 << i) != 0)))
    }

    fn all_templates() -> impl Iterator<Item = [Slot; 5]> {
        (0..243u32).map(|mut n| {
            std::array::from_fn(|_| {
                let s = [Up, Down, Any][(n % 3) as usize];
                n /= 3;
                s
            })
        })
    }

    #[test]
    fn wildcard_never_breaks_a_match() {
        for slots in all_templates() {
            let t = GestureTemplate { gesture: Gesture::Move, slots };
            for v in all_vectors() {
                for i in 0..5 {
                    let mut loosened = t;
                    loosened.slots[i] = Any;
                    if matches(&v, &t) {
                        assert!(matches(&v, &loosened));
                    }
                }
            }
        }
    }

    #[test]
    fn match_iff_every_fixed_slot_agrees() {
        for slots in all_templates() {
            let t = GestureTemplate { gesture: Gesture::Draw, slots };
            for v in all_vectors() {
                let expected = (0..5).all(|i| match slots[i] {
                    Any => true,
                    Up => v.0[i],
                    Down => !v.0[i],
                });
                assert_eq!(matches(&v, &t), expected);
            }
        }
    }

    #[test]
    fn classifies_the_three_gestures() {
        let v = |a| FingerVector(a);
        assert_eq!(classify(&v([false, true, false, false, false])), Some(Gesture::Move));
        assert_eq!(classify(&v([true, true, false, false, false])), Some(Gesture::Move));
        assert_eq!(classify(&v([true, true, true, false, false])), Some(Gesture::Draw));
        assert_eq!(classify(&v([false, true, true, true, false])), Some(Gesture::Erase));
        assert_eq!(classify(&v([false, false, false, false, false])), None);
        assert_eq!(classify(&v([true, true, true, true, true])), None);
        assert_eq!(classify(&v([false, false, true, false, false])), None);
    }

    #[test]
    fn first_template_wins_on_overlap() {
        let broad = GestureTemplate { gesture: Gesture::Erase, slots: [Any, Up, Any, Any, Any] };
        let order = [broad, TEMPLATES[1]];
        let two = FingerVector([false, true, true, false, false]);
        assert_eq!(classify_with(&two, &order), Some(Gesture::Erase));
        let reversed = [TEMPLATES[1], broad];
        assert_eq!(classify_with(&two, &reversed), Some(Gesture::Draw));
    }
}

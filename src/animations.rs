//! Warning lamp blink timing.
//!
//! Every dial owns a [`BlinkPhase`] counter that advances once per draw call,
//! whether or not anything was redrawn. While a warning is active the face
//! alternates between the warning and the normal variant:
//!
//! ```text
//! tick:  0  1  2  3  4 | 5  6  7  8  9  10 | 0 ...
//! face:  W  W  W  W  W | N  N  N  N  N  N  |
//! ```
//!
//! The counter resets once it exceeds [`BLINK_LAST_TICK`], giving a period of
//! 11 draws (220 ms at 50 FPS), lit for 5 and dark for 6.

/// Highest tick value before the counter wraps to zero.
pub const BLINK_LAST_TICK: u8 = 10;

/// Ticks `0..BLINK_LIT_TICKS` show the warning face.
pub const BLINK_LIT_TICKS: u8 = 5;

/// Draw calls per blink cycle.
pub const BLINK_PERIOD: usize = BLINK_LAST_TICK as usize + 1;

const _: () = assert!(BLINK_LIT_TICKS <= BLINK_LAST_TICK);

/// Which face variant to show this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceVariant {
    Normal,
    Warning,
}

/// Per-dial blink counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlinkPhase {
    tick: u8,
}

impl BlinkPhase {
    pub const fn new() -> Self { Self { tick: 0 } }

    #[inline]
    pub const fn tick(&self) -> u8 { self.tick }

    /// Whether the lamp is in the lit part of the cycle.
    #[inline]
    pub const fn is_lit(&self) -> bool { self.tick < BLINK_LIT_TICKS }

    /// Face to show given the current warning state.
    #[inline]
    pub const fn face(&self, warning: bool) -> FaceVariant {
        if warning && self.is_lit() { FaceVariant::Warning } else { FaceVariant::Normal }
    }

    /// Step to the next draw. Wraps after exceeding [`BLINK_LAST_TICK`].
    #[inline]
    pub const fn advance(&mut self) {
        self.tick += 1;
        if self.tick > BLINK_LAST_TICK {
            self.tick = 0;
        }
    }
}

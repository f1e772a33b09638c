//! Redraw tracking for a single dial.
//!
//! A dial is drawn by blitting its face image and stroking the needle
//! triangle on top. Most frames nothing changes, so [`GaugeRenderState`]
//! decides how much work each frame needs:
//!
//! | Condition | Recompute needle | Blit face + needle |
//! |-----------|------------------|--------------------|
//! | First frame | yes | yes |
//! | Display value moved | yes | yes |
//! | Warning active | no | yes (lamp blinks) |
//! | Otherwise | no | no |
//!
//! "Moved" means `advance()` changed the display value this frame. The needle
//! is recomputed after the move, so the painted frame always shows the value
//! the gauge now holds.

/// What a dial has to do this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedrawPlan {
    /// Needle triangle must be recomputed from the current angle.
    pub needle: bool,
    /// Face and needle must be painted.
    pub paint: bool,
}

/// Tracks per-dial render state across frames.
pub struct GaugeRenderState {
    /// Whether this is the first frame (need full redraw).
    first_frame: bool,

    /// Frames painted since startup.
    paints: u64,
}

impl GaugeRenderState {
    pub const fn new() -> Self { Self { first_frame: true, paints: 0 } }

    #[cfg(test)]
    const fn is_first_frame(&self) -> bool { self.first_frame }

    /// Work needed this frame.
    ///
    /// `moved` is whether `advance()` changed the display value; `warning` is
    /// the fresh warning flag.
    pub const fn plan(&self, moved: bool, warning: bool) -> RedrawPlan {
        RedrawPlan { needle: moved || self.first_frame, paint: moved || warning || self.first_frame }
    }

    /// Record that the dial was painted this frame.
    #[inline]
    pub const fn mark_painted(&mut self) { self.paints += 1; }

    #[inline]
    pub const fn paints(&self) -> u64 { self.paints }

    /// Call at end of frame to reset per-frame state.
    pub const fn end_frame(&mut self) { self.first_frame = false; }
}

impl Default for GaugeRenderState {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================

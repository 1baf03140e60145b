pub mod cover;
pub mod crossfade;
pub mod displacement;

use raylib::prelude::*;

use crate::engine::{Compositor, Frame};
pub use crossfade::CrossfadeCompositor;
pub use displacement::DisplacementCompositor;

/// The compositor picked at startup.
pub enum SlideCompositor {
    Displacement(DisplacementCompositor),
    Crossfade(CrossfadeCompositor),
}

impl SlideCompositor {
    /// Follows the window size; both variants cover-fit against it.
    pub fn resize(&mut self, width: f32, height: f32) {
        match self {
            SlideCompositor::Displacement(c) => c.resize(width, height),
            SlideCompositor::Crossfade(c) => c.resize(width, height),
        }
    }
}

impl<D: RaylibDraw> Compositor<Texture2D, D> for SlideCompositor {
    fn composite(&mut self, d: &mut D, frame: &Frame<'_, Texture2D>) {
        match self {
            SlideCompositor::Displacement(c) => c.composite(d, frame),
            SlideCompositor::Crossfade(c) => c.composite(d, frame),
        }
    }
}

use raylib::prelude::*;

use crate::engine::{Compositor, Frame};
use crate::render::cover::{cover_source_rect, smoothstep};

/// Plain opacity crossfade, each image cover-fitted to the window. Used by
/// the hero slider and whenever the displacement shader is unavailable.
pub struct CrossfadeCompositor {
    resolution: Vector2,
}

impl CrossfadeCompositor {
    pub fn new(width: f32, height: f32) -> Self {
        Self { resolution: Vector2::new(width, height) }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.resolution = Vector2::new(width, height);
    }

    fn draw_cover<D: RaylibDraw>(&self, d: &mut D, texture: &Texture2D, alpha: f32) {
        let source = cover_source_rect(
            texture.width() as f32,
            texture.height() as f32,
            self.resolution.x,
            self.resolution.y,
        );
        d.draw_texture_pro(
            texture,
            source,
            Rectangle::new(0.0, 0.0, self.resolution.x, self.resolution.y),
            Vector2::new(0.0, 0.0),
            0.0,
            Color::new(255, 255, 255, (alpha.clamp(0.0, 1.0) * 255.0) as u8),
        );
    }
}

/// Opacity of the incoming image, eased like a CSS opacity transition.
pub fn next_alpha(progress: f32) -> f32 {
    smoothstep(0.0, 1.0, progress)
}

impl<D: RaylibDraw> Compositor<Texture2D, D> for CrossfadeCompositor {
    fn composite(&mut self, d: &mut D, frame: &Frame<'_, Texture2D>) {
        self.draw_cover(d, frame.current, 1.0);
        if frame.progress > 0.0 {
            self.draw_cover(d, frame.next, next_alpha(frame.progress));
        }
    }
}

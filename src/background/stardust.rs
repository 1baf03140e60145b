use rand::Rng;
use raylib::prelude::*;
use tokio::sync::watch;
use tracing::debug;

use crate::background::{FRAME_RATE_BASIS, PerspectiveCamera};
use crate::theme::ThemeMode;

const PARTICLE_COUNT: usize = 500;
const PARTICLE_SIZE: f32 = 0.06;
const OPACITY: f32 = 0.8;
const SPIN_PER_FRAME: f32 = 0.0007;

/// Soft white dust slowly turning behind the hero slider. Recolors itself
/// when the theme changes.
pub struct Stardust {
    points: Vec<[f32; 3]>,
    rotation: f32,
    bob: f32,
    clock: f32,
    color: Color,
    camera: PerspectiveCamera,
    theme: watch::Receiver<ThemeMode>,
}

impl Stardust {
    pub fn new(mut theme: watch::Receiver<ThemeMode>) -> Self {
        let mut rng = rand::rng();
        let points = (0..PARTICLE_COUNT)
            .map(|_| {
                [
                    (rng.random::<f32>() - 0.5) * 20.0,
                    (rng.random::<f32>() - 0.2) * 10.0,
                    -(rng.random::<f32>() * 10.0 + 2.0),
                ]
            })
            .collect();
        let color = theme.borrow_and_update().palette().stardust;

        Self {
            points,
            rotation: 0.0,
            bob: 0.0,
            clock: 0.0,
            color,
            camera: PerspectiveCamera { fov_y_degrees: 60.0, z: 4.5, near: 0.1 },
            theme,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.clock += dt;
        self.rotation += SPIN_PER_FRAME * dt * FRAME_RATE_BASIS;
        self.bob = (self.clock * 0.6).sin() * 0.3;

        if self.theme.has_changed().unwrap_or(false) {
            let mode = *self.theme.borrow_and_update();
            self.color = mode.palette().stardust;
            debug!("Stardust recolored for {:?}", mode);
        }
    }

    /// World position of a particle after the group spin and bob.
    fn placed(&self, p: [f32; 3]) -> [f32; 3] {
        let (sin, cos) = self.rotation.sin_cos();
        [p[0] * cos - p[1] * sin, p[0] * sin + p[1] * cos + self.bob, p[2]]
    }

    pub fn draw<D: RaylibDraw>(&self, d: &mut D, width: f32, height: f32) {
        let color = Color::new(self.color.r, self.color.g, self.color.b, (OPACITY * 255.0) as u8);
        for p in &self.points {
            if let Some(s) = self.camera.project(self.placed(*p), width, height) {
                let radius = (PARTICLE_SIZE * s.scale * 0.5).max(0.5);
                d.draw_circle_v(Vector2::new(s.x, s.y), radius, color);
            }
        }
    }

    #[cfg(test)]
    pub fn color(&self) -> Color {
        self.color
    }
}

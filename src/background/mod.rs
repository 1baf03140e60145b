//! Decorative particle fields drawn behind the slideshow.

pub mod ink;
pub mod stardust;

use raylib::prelude::*;

pub use ink::InkField;
pub use stardust::Stardust;

/// Per-frame animation constants were tuned at 60 fps.
pub const FRAME_RATE_BASIS: f32 = 60.0;

/// Pinhole camera on the z axis looking towards -z.
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveCamera {
    pub fov_y_degrees: f32,
    pub z: f32,
    pub near: f32,
}

/// A world point mapped to the screen, `scale` is pixels per world unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl PerspectiveCamera {
    pub fn project(&self, point: [f32; 3], width: f32, height: f32) -> Option<Projected> {
        let depth = self.z - point[2];
        if depth <= self.near {
            return None;
        }
        let focal = (height * 0.5) / (self.fov_y_degrees.to_radians() * 0.5).tan();
        let scale = focal / depth;
        Some(Projected {
            x: width * 0.5 + point[0] * scale,
            y: height * 0.5 - point[1] * scale,
            scale,
        })
    }

    /// Screen point back onto the plane `z = plane_z`.
    pub fn unproject(&self, x: f32, y: f32, width: f32, height: f32, plane_z: f32) -> [f32; 3] {
        let depth = (self.z - plane_z).max(self.near);
        let focal = (height * 0.5) / (self.fov_y_degrees.to_radians() * 0.5).tan();
        let scale = focal / depth;
        [(x - width * 0.5) / scale, (height * 0.5 - y) / scale, plane_z]
    }
}

pub enum Backdrop {
    None,
    Stardust(Stardust),
    Ink(InkField),
}

impl Backdrop {
    pub fn update(&mut self, dt: f32) {
        match self {
            Backdrop::None => {}
            Backdrop::Stardust(s) => s.update(dt),
            Backdrop::Ink(i) => i.update(dt),
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if let Backdrop::Ink(i) = self {
            i.pointer_moved(x, y, width, height);
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if let Backdrop::Ink(i) = self {
            i.spawn_ripple(x, y);
        }
    }

    pub fn draw<D: RaylibDraw>(&self, d: &mut D, width: f32, height: f32) {
        match self {
            Backdrop::None => {}
            Backdrop::Stardust(s) => s.draw(d, width, height),
            Backdrop::Ink(i) => i.draw(d, width, height),
        }
    }
}

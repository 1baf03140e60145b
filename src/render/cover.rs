//! CPU statements of the math the displacement shader runs per pixel, plus
//! the cover-fit rectangle the crossfade compositor draws with.

use raylib::prelude::Rectangle;

/// Remaps a canvas UV so that an image of size `img` covers a canvas of
/// size `canvas` without distortion, cropping the overflowing axis.
pub fn cover_uv(uv: (f32, f32), img: (f32, f32), canvas: (f32, f32)) -> (f32, f32) {
    let (mut u, mut v) = uv;
    let r_img = img.0 / img.1;
    let r_canvas = canvas.0 / canvas.1;
    if r_img > r_canvas {
        // Wider than the canvas: crop left and right
        u = (u - 0.5) * (r_canvas / r_img) + 0.5;
    } else {
        v = (v - 0.5) * (r_img / r_canvas) + 0.5;
    }
    (u, v)
}

/// Source rectangle, in texture pixels, of a cover-fitted image.
pub fn cover_source_rect(img_w: f32, img_h: f32, canvas_w: f32, canvas_h: f32) -> Rectangle {
    if img_w <= 0.0 || img_h <= 0.0 || canvas_w <= 0.0 || canvas_h <= 0.0 {
        return Rectangle::new(0.0, 0.0, img_w.max(0.0), img_h.max(0.0));
    }
    let (u0, v0) = cover_uv((0.0, 0.0), (img_w, img_h), (canvas_w, canvas_h));
    let (u1, v1) = cover_uv((1.0, 1.0), (img_w, img_h), (canvas_w, canvas_h));
    Rectangle::new(u0 * img_w, v0 * img_h, (u1 - u0) * img_w, (v1 - v0) * img_h)
}

pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn hash(x: f32, y: f32) -> f32 {
    fract(1e4 * (17.0 * x + 0.1 * y).sin() * (0.1 + (13.0 * y + x).sin().abs()))
}

/// Smooth value noise in [0, 1].
pub fn value_noise(x: f32, y: f32) -> f32 {
    let (ix, iy) = (x.floor(), y.floor());
    let (fx, fy) = (x - ix, y - iy);
    let a = hash(ix, iy);
    let b = hash(ix + 1.0, iy);
    let c = hash(ix, iy + 1.0);
    let d = hash(ix + 1.0, iy + 1.0);
    let ux = fx * fx * (3.0 - 2.0 * fx);
    let uy = fy * fy * (3.0 - 2.0 * fy);
    a + (b - a) * ux + (c - a) * uy * (1.0 - ux) + (d - b) * ux * uy
}

/// How far the next image has replaced the current one at `uv`.
#[cfg(test)]
pub fn transition_mask(uv: (f32, f32), progress: f32, time: f32) -> f32 {
    let n = value_noise(uv.0 * 6.0 + time * 0.05, uv.1 * 6.0 + time * 0.05);
    smoothstep(0.25, 0.75, progress + (n - 0.5) * 0.35)
}

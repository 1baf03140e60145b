use std::f32::consts::{PI, TAU};

use rand::Rng;
use raylib::prelude::*;
use tokio::sync::watch;

use crate::background::{FRAME_RATE_BASIS, PerspectiveCamera};
use crate::render::cover::value_noise;
use crate::theme::{Palette, ThemeMode};

const PARTICLE_COUNT: usize = 2500;
const SPARKLE_COUNT: usize = 600;
const GLYPH_COUNT: usize = 120;
const WRAP_Y: f32 = 65.0;
const PARALLAX_EASE: f32 = 0.05;
const RIPPLE_BASE_RADIUS: f32 = 6.0;

const MAX_LINKS: usize = 60;
const LINK_DISTANCE: f32 = 22.0;
const RIBBON_COUNT: usize = 160;
const POEM_OPACITY: f32 = 0.28;
const POEM_WRAP_X: f32 = 70.0;
const TRAIL_SPAWN_CHANCE: f32 = 0.6;

pub const GLYPHS: &[&str] = &[
    "क", "ख", "ग", "घ", "च", "ज", "ट", "ठ", "ड", "ढ", "त", "थ", "द", "ध", "न", "प",
    "फ", "ब", "भ", "म", "य", "र", "ल", "व", "श", "ष", "स", "ह", "क्ष", "त्र", "ज्ञ",
];

pub const POEM_LINES: &[&str] = &[
    "शब्दों की सुरभि",
    "भावों की नदी",
    "यादें झीनी रे",
    "मैं हिंदुस्तान हूँ",
    "वेदना के फूल",
];

struct Glyph {
    text: &'static str,
    position: [f32; 3],
    size: f32,
    opacity: f32,
    speed: f32,
    offset: f32,
}

struct Sparkle {
    position: [f32; 3],
    phase: f32,
}

struct RibbonDot {
    u: f32,
    size: f32,
}

struct PoemLine {
    text: &'static str,
    position: [f32; 3],
    height: f32,
    vx: f32,
    offset: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub x: f32,
    pub y: f32,
    pub life: f32,
}

impl Ripple {
    pub fn radius(&self) -> f32 {
        RIPPLE_BASE_RADIUS * (1.0 + self.life * 40.0)
    }

    pub fn opacity(&self) -> f32 {
        (0.8 - self.life).max(0.0)
    }
}

/// A glyph left behind by the pointer, rising while it fades.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailGlyph {
    pub text: &'static str,
    pub position: [f32; 3],
    pub size: f32,
    pub vy: f32,
    pub life: f32,
}

impl TrailGlyph {
    pub fn opacity(&self) -> f32 {
        (0.9 - self.life * 1.2).max(0.0)
    }
}

/// Point on the wavy path the calligraphy ribbon follows, `u` in [0, 1].
pub fn curve_at(u: f32, t: f32) -> [f32; 3] {
    [
        (u - 0.5) * 130.0,
        10.0 * (u * PI * 3.0 + (t * 0.5).sin() * 0.6).sin(),
        8.0 * (u * PI * 2.0 + (t * 0.4).cos() * 0.4).cos(),
    ]
}

pub fn ribbon_opacity(u: f32) -> f32 {
    0.3 + 0.7 * (u * PI).sin()
}

pub fn link_opacity(t: f32) -> f32 {
    0.12 + 0.08 * (0.5 + 0.5 * (t * 1.6).sin())
}

fn rotate_x(p: [f32; 3], angle: f32) -> [f32; 3] {
    let (sin, cos) = angle.sin_cos();
    [p[0], p[1] * cos - p[2] * sin, p[1] * sin + p[2] * cos]
}

fn rotate_y(p: [f32; 3], angle: f32) -> [f32; 3] {
    let (sin, cos) = angle.sin_cos();
    [p[0] * cos + p[2] * sin, p[1], -p[0] * sin + p[2] * cos]
}

fn distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
}

fn random_glyph(rng: &mut impl Rng) -> &'static str {
    GLYPHS[rng.random_range(0..GLYPHS.len())]
}

/// Ink-in-water field: drifting particles, twinkling sparkles, floating
/// Devanagari glyphs joined by constellation lines, a calligraphy ribbon,
/// drifting poem lines, pointer parallax, a pointer glyph trail and click
/// ripples.
pub struct InkField {
    particles: Vec<[f32; 3]>,
    sparkles: Vec<Sparkle>,
    glyphs: Vec<Glyph>,
    links: Vec<(usize, usize)>,
    ribbon: Vec<RibbonDot>,
    poems: Vec<PoemLine>,
    trail: Vec<TrailGlyph>,
    ripples: Vec<Ripple>,
    font: Option<Font>,

    clock: f32,
    // (horizontal, vertical) tilt; eased for the glyphs, raw target for the
    // ribbon and poem lines
    parallax: (f32, f32),
    parallax_target: (f32, f32),

    palette: Palette,
    camera: PerspectiveCamera,
    theme: watch::Receiver<ThemeMode>,
}

impl InkField {
    pub fn new(mut theme: watch::Receiver<ThemeMode>, font: Option<Font>) -> Self {
        let mut rng = rand::rng();

        let particles = (0..PARTICLE_COUNT)
            .map(|_| {
                [
                    rng.random_range(-100.0..100.0),
                    rng.random_range(-60.0..60.0),
                    rng.random_range(-40.0..40.0),
                ]
            })
            .collect();

        let sparkles = (0..SPARKLE_COUNT)
            .map(|_| {
                let position = [
                    rng.random_range(-70.0..70.0),
                    rng.random_range(-40.0..40.0),
                    rng.random_range(-12.0..12.0),
                ];
                // Coherent phases so neighbouring sparkles twinkle together
                let phase = value_noise(position[0] * 0.1, position[1] * 0.1) * TAU;
                Sparkle { position, phase }
            })
            .collect();

        let glyphs = (0..GLYPH_COUNT)
            .map(|_| Glyph {
                text: random_glyph(&mut rng),
                position: [
                    rng.random_range(-60.0..60.0),
                    rng.random_range(-35.0..35.0),
                    rng.random_range(-20.0..20.0),
                ],
                size: rng.random_range(4.0..10.0),
                opacity: rng.random_range(0.35..0.8),
                speed: rng.random_range(0.1..0.6),
                offset: rng.random::<f32>() * TAU,
            })
            .collect();

        let ribbon = (0..RIBBON_COUNT)
            .map(|i| RibbonDot { u: i as f32 / RIBBON_COUNT as f32, size: rng.random_range(0.6..1.4) })
            .collect();

        let poems = POEM_LINES
            .iter()
            .map(|&text| PoemLine {
                text,
                position: [
                    rng.random_range(-50.0..50.0),
                    rng.random_range(-20.0..20.0),
                    rng.random_range(-10.0..5.0),
                ],
                height: rng.random_range(14.0..22.0),
                vx: rng.random_range(0.06..0.12),
                offset: rng.random::<f32>() * TAU,
            })
            .collect();

        let palette = theme.borrow_and_update().palette();

        Self {
            particles,
            sparkles,
            glyphs,
            links: Vec::with_capacity(MAX_LINKS),
            ribbon,
            poems,
            trail: Vec::new(),
            ripples: Vec::new(),
            font,
            clock: 0.0,
            parallax: (0.0, 0.0),
            parallax_target: (0.0, 0.0),
            palette,
            camera: PerspectiveCamera { fov_y_degrees: 55.0, z: 60.0, near: 0.1 },
            theme,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.clock += dt;
        let t = self.clock;
        let frames = dt * FRAME_RATE_BASIS;

        if self.theme.has_changed().unwrap_or(false) {
            self.palette = self.theme.borrow_and_update().palette();
        }

        for p in self.particles.iter_mut() {
            p[1] += (t * 0.3 + p[0] * 0.02 + p[2] * 0.015).sin() * 0.03 * frames;
            if p[1] > WRAP_Y {
                p[1] = -WRAP_Y;
            }
            if p[1] < -WRAP_Y {
                p[1] = WRAP_Y;
            }
        }

        for g in self.glyphs.iter_mut() {
            g.position[1] += (t * g.speed + g.offset).sin() * 0.02 * frames;
            g.position[0] += (t * g.speed * 0.6 + g.offset).cos() * 0.01 * frames;
        }

        let ease = (PARALLAX_EASE * frames).min(1.0);
        self.parallax.0 += (self.parallax_target.0 - self.parallax.0) * ease;
        self.parallax.1 += (self.parallax_target.1 - self.parallax.1) * ease;

        // Random nearby pairs, re-rolled every frame
        let mut rng = rand::rng();
        self.links.clear();
        for _ in 0..MAX_LINKS {
            let a = rng.random_range(0..self.glyphs.len());
            let b = rng.random_range(0..self.glyphs.len());
            if a != b && distance(self.glyphs[a].position, self.glyphs[b].position) < LINK_DISTANCE {
                self.links.push((a, b));
            }
        }

        for line in self.poems.iter_mut() {
            line.position[0] += line.vx * frames;
            line.position[1] += (t * 0.5 + line.offset).sin() * 0.02 * frames;
            if line.position[0] > POEM_WRAP_X {
                line.position[0] = -POEM_WRAP_X;
            }
        }

        for r in self.ripples.iter_mut() {
            r.life += 0.02 * frames;
        }
        self.ripples.retain(|r| r.opacity() > 0.01);

        let shrink = 0.997f32.powf(frames);
        for g in self.trail.iter_mut() {
            g.life += 0.02 * frames;
            g.position[1] += g.vy * frames;
            g.size *= shrink;
        }
        self.trail.retain(|g| g.opacity() > 0.02);
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.parallax_target = ((x / width - 0.5) * 0.3, (y / height - 0.5) * 0.2);
        if rand::rng().random::<f32>() < TRAIL_SPAWN_CHANCE {
            self.spawn_trail(x, y, width, height);
        }
    }

    pub fn spawn_trail(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let mut rng = rand::rng();
        let plane_z = rng.random_range(-5.0..5.0);
        self.trail.push(TrailGlyph {
            text: random_glyph(&mut rng),
            position: self.camera.unproject(x, y, width, height, plane_z),
            size: rng.random_range(1.2..2.2),
            vy: rng.random_range(0.02..0.06),
            life: 0.0,
        });
    }

    pub fn spawn_ripple(&mut self, x: f32, y: f32) {
        self.ripples.push(Ripple { x, y, life: 0.0 });
    }

    /// Tilts a glyph-layer point by the eased parallax.
    fn tilted(&self, p: [f32; 3]) -> [f32; 3] {
        rotate_y(rotate_x(p, self.parallax.1), self.parallax.0)
    }

    fn faded(color: Color, opacity: f32) -> Color {
        Color::new(color.r, color.g, color.b, (opacity.clamp(0.0, 1.0) * 255.0) as u8)
    }

    fn draw_glyph<D: RaylibDraw>(&self, d: &mut D, text: &str, center: Vector2, size: f32, color: Color) {
        match &self.font {
            Some(font) => {
                let origin = Vector2::new(center.x - size * 0.5, center.y - size * 0.5);
                d.draw_text_ex(font, text, origin, size, 0.0, color);
            }
            // No Devanagari coverage, keep the motion with plain dots
            None => d.draw_circle_v(center, size * 0.15, color),
        }
    }

    pub fn draw<D: RaylibDraw>(&self, d: &mut D, width: f32, height: f32) {
        let t = self.clock;

        let ink = Self::faded(self.palette.ink, 0.75);
        for p in &self.particles {
            if let Some(s) = self.camera.project(*p, width, height) {
                d.draw_circle_v(Vector2::new(s.x, s.y), (0.8 * s.scale).max(0.5), ink);
            }
        }

        let twinkle = 0.8 + (t * 4.0).sin() * 0.25;
        let sparkle_tilt = (t * 0.05).sin() * 0.05;
        for sparkle in &self.sparkles {
            let (sin, cos) = sparkle_tilt.sin_cos();
            let [x, y, z] = sparkle.position;
            if let Some(s) = self.camera.project([x * cos - y * sin, x * sin + y * cos, z], width, height) {
                let opacity = 0.6 + 0.3 * (t * 2.0 + sparkle.phase).sin();
                d.draw_circle_v(Vector2::new(s.x, s.y), (twinkle * 0.5 * s.scale).max(0.5), Self::faded(Color::WHITE, opacity));
            }
        }

        let link_color = Self::faded(self.palette.accent, link_opacity(t));
        for &(a, b) in &self.links {
            let pa = self.camera.project(self.tilted(self.glyphs[a].position), width, height);
            let pb = self.camera.project(self.tilted(self.glyphs[b].position), width, height);
            if let (Some(pa), Some(pb)) = (pa, pb) {
                d.draw_line_v(Vector2::new(pa.x, pa.y), Vector2::new(pb.x, pb.y), link_color);
            }
        }

        for g in &self.glyphs {
            let Some(s) = self.camera.project(self.tilted(g.position), width, height) else {
                continue;
            };
            let color = Self::faded(self.palette.accent, g.opacity);
            self.draw_glyph(d, g.text, Vector2::new(s.x, s.y), g.size * s.scale, color);
        }

        let ribbon_turn = self.parallax_target.0 * 1.5;
        for dot in &self.ribbon {
            let u = (dot.u + t * 0.05) % 1.0;
            if let Some(s) = self.camera.project(rotate_y(curve_at(u, t), ribbon_turn), width, height) {
                let color = Self::faded(Color::new(255, 209, 102, 255), ribbon_opacity(u) * 0.7);
                d.draw_circle_v(Vector2::new(s.x, s.y), (dot.size * 0.5 * s.scale).max(0.5), color);
            }
        }

        let poem_turn = self.parallax_target.1 * 0.6;
        for line in &self.poems {
            let Some(s) = self.camera.project(rotate_x(line.position, poem_turn), width, height) else {
                continue;
            };
            let line_height = line.height * s.scale;
            let text_size = line_height * 0.4;
            let text_width = match &self.font {
                Some(font) => font.measure_text(line.text, text_size, 0.0).x,
                None => line_height * 3.0,
            };
            let veil = Rectangle::new(s.x - text_width * 0.5 - 16.0, s.y - line_height * 0.5, text_width + 32.0, line_height);
            d.draw_rectangle_rec(veil, Self::faded(Color::BLACK, 0.12 * POEM_OPACITY));
            if let Some(font) = &self.font {
                let origin = Vector2::new(s.x - text_width * 0.5, s.y - text_size * 0.5);
                d.draw_text_ex(font, line.text, origin, text_size, 0.0, Self::faded(self.palette.accent, POEM_OPACITY));
            }
        }

        for g in &self.trail {
            if let Some(s) = self.camera.project(g.position, width, height) {
                let color = Self::faded(self.palette.ink, g.opacity());
                self.draw_glyph(d, g.text, Vector2::new(s.x, s.y), g.size * s.scale, color);
            }
        }

        for r in &self.ripples {
            d.draw_circle_lines(r.x as i32, r.y as i32, r.radius(), Self::faded(self.palette.ink, r.opacity()));
        }
    }
}

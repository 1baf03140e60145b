use raylib::prelude::*;
use tracing::info;

use crate::engine::{Compositor, Frame};
use crate::error::RenderError;

// Current image is bound as texture0 by the quad draw, the next one as an
// extra sampler. Both are cover-fitted from their native sizes.
const FRAGMENT_SHADER: &str = r#"
#version 330

in vec2 fragTexCoord;
in vec4 fragColor;

uniform sampler2D texture0;
uniform sampler2D nextTexture;
uniform vec2 currentSize;
uniform vec2 nextSize;
uniform vec2 resolution;
uniform float progress;
uniform float time;

out vec4 finalColor;

float hash(vec2 p) {
    return fract(1e4 * sin(17.0 * p.x + 0.1 * p.y) * (0.1 + abs(sin(13.0 * p.y + p.x))));
}

float noise(vec2 x) {
    vec2 i = floor(x);
    vec2 f = fract(x);
    float a = hash(i);
    float b = hash(i + vec2(1.0, 0.0));
    float c = hash(i + vec2(0.0, 1.0));
    float d = hash(i + vec2(1.0, 1.0));
    vec2 u = f * f * (3.0 - 2.0 * f);
    return mix(a, b, u.x) + (c - a) * u.y * (1.0 - u.x) + (d - b) * u.x * u.y;
}

vec2 coverUV(vec2 uv, vec2 img, vec2 canvas) {
    float rImg = img.x / img.y;
    float rCanvas = canvas.x / canvas.y;
    if (rImg > rCanvas) {
        uv.x = (uv.x - 0.5) * (rCanvas / rImg) + 0.5;
    } else {
        uv.y = (uv.y - 0.5) * (rImg / rCanvas) + 0.5;
    }
    return clamp(uv, 0.0, 1.0);
}

void main() {
    vec2 uv = fragTexCoord;
    vec2 dir = normalize(vec2(0.86, 0.5));
    float n = noise(uv * 6.0 + time * 0.05);
    float swirl = noise(uv * 2.0 + time * 0.1);
    float disp = progress * 0.35;

    vec2 uv1 = uv + (n - 0.5) * disp * dir + (swirl - 0.5) * 0.05 * (1.0 - progress);
    vec2 uv2 = uv - (n - 0.5) * (0.35 - disp) * dir - (swirl - 0.5) * 0.05 * progress;

    uv1 = coverUV(uv1, currentSize, resolution);
    uv2 = coverUV(uv2, nextSize, resolution);

    float mask = smoothstep(0.25, 0.75, progress + (n - 0.5) * 0.35);
    vec4 c1 = texture(texture0, uv1);
    vec4 c2 = texture(nextTexture, uv2);
    finalColor = mix(c1, c2, mask) * fragColor;
}
"#;

struct Locations {
    next_texture: i32,
    current_size: i32,
    next_size: i32,
    resolution: i32,
    progress: i32,
    time: i32,
}

/// Noise displacement crossfade between two images, run as a fragment
/// shader over a full-window quad.
pub struct DisplacementCompositor {
    shader: Shader,
    locs: Locations,
    resolution: Vector2,
}

impl DisplacementCompositor {
    pub fn new(rl: &mut RaylibHandle, thread: &RaylibThread, width: f32, height: f32) -> Result<Self, RenderError> {
        let shader = rl.load_shader_from_memory(thread, None, Some(FRAGMENT_SHADER));

        // A failed compile leaves raylib's default shader, which has none of these
        let location = |name: &'static str| match shader.get_shader_location(name) {
            loc if loc < 0 => Err(RenderError::Shader(name)),
            loc => Ok(loc),
        };
        let locs = Locations {
            next_texture: location("nextTexture")?,
            current_size: location("currentSize")?,
            next_size: location("nextSize")?,
            resolution: location("resolution")?,
            progress: location("progress")?,
            time: location("time")?,
        };
        info!("Displacement shader ready");

        Ok(Self { shader, locs, resolution: Vector2::new(width, height) })
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.resolution = Vector2::new(width, height);
    }
}

fn texture_size(texture: &Texture2D) -> Vector2 {
    Vector2::new(texture.width() as f32, texture.height() as f32)
}

impl<D: RaylibDraw> Compositor<Texture2D, D> for DisplacementCompositor {
    fn composite(&mut self, d: &mut D, frame: &Frame<'_, Texture2D>) {
        let current_size = texture_size(frame.current);
        self.shader.set_shader_value(self.locs.current_size, current_size);
        self.shader.set_shader_value(self.locs.next_size, texture_size(frame.next));
        self.shader.set_shader_value(self.locs.resolution, self.resolution);
        self.shader.set_shader_value(self.locs.progress, frame.progress);
        self.shader.set_shader_value(self.locs.time, frame.time);

        let raw_shader: raylib::ffi::Shader = *self.shader.as_ref();
        let raw_next: raylib::ffi::Texture2D = *frame.next.as_ref();
        let next_loc = self.locs.next_texture;
        let dest = Rectangle::new(0.0, 0.0, self.resolution.x, self.resolution.y);

        let mut s = d.begin_shader_mode(&mut self.shader);
        // SAFETY: both handles stay alive for the whole draw, and the sampler
        // must be registered after the shader mode has flushed the batch.
        unsafe {
            raylib::ffi::SetShaderValueTexture(raw_shader, next_loc, raw_next);
        }
        s.draw_texture_pro(
            frame.current,
            Rectangle::new(0.0, 0.0, current_size.x, current_size.y),
            dest,
            Vector2::new(0.0, 0.0),
            0.0,
            Color::WHITE,
        );
    }
}

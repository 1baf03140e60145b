//! On-screen chrome: the menu drawer and the gallery hint.

use std::collections::BTreeSet;
use std::ffi::CString;
use std::path::Path;

use raylib::prelude::*;
use tracing::{debug, warn};

use crate::background::ink::{GLYPHS, POEM_LINES};
use crate::constants::GALLERY_HINT;
use crate::slideshow::Mode;
use crate::theme::Palette;

const TOGGLE_SIZE: f32 = 44.0;
const TOGGLE_MARGIN: f32 = 16.0;
const DRAWER_WIDTH: f32 = 260.0;
const ITEM_HEIGHT: f32 = 48.0;
const ITEM_FONT_SIZE: i32 = 22;
const HINT_FONT_SIZE: f32 = 26.0;
const HINT_FALLBACK: &str = "Click or Left/Right to change picture";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Next,
    Previous,
    ToggleTheme,
    Quit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [MenuAction::Next, MenuAction::Previous, MenuAction::ToggleTheme, MenuAction::Quit];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Next => "Next",
            MenuAction::Previous => "Previous",
            MenuAction::ToggleTheme => "Toggle theme",
            MenuAction::Quit => "Quit",
        }
    }
}

/// What the menu did with a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Action(MenuAction),
    /// The menu used the click (toggle, close, drawer background).
    Consumed,
    /// Not the menu's business, the slideshow gets it.
    Passthrough,
}

/// Toggle button in the top-right corner, drawer sliding in from the right.
pub fn menu_layout(screen_width: f32, screen_height: f32) -> (Rectangle, Rectangle) {
    let toggle = Rectangle::new(screen_width - TOGGLE_SIZE - TOGGLE_MARGIN, TOGGLE_MARGIN, TOGGLE_SIZE, TOGGLE_SIZE);
    let drawer = Rectangle::new(screen_width - DRAWER_WIDTH, 0.0, DRAWER_WIDTH, screen_height);
    (toggle, drawer)
}

fn contains(rect: &Rectangle, (x, y): (f32, f32)) -> bool {
    x >= rect.x && x <= rect.x + rect.width && y >= rect.y && y <= rect.y + rect.height
}

/// Menu state bound to its two hit areas. Built with `init`, torn down with
/// `dispose`; after that it no longer claims any input.
#[derive(Debug)]
pub struct MenuController {
    toggle: Rectangle,
    drawer: Rectangle,
    open: bool,
    attached: bool,
}

impl MenuController {
    pub fn init(toggle: Rectangle, drawer: Rectangle) -> Self {
        debug!("Menu attached");
        Self { toggle, drawer, open: false, attached: true }
    }

    pub fn relayout(&mut self, toggle: Rectangle, drawer: Rectangle) {
        self.toggle = toggle;
        self.drawer = drawer;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        if self.attached {
            self.open = true;
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Returns true when Escape closed the drawer.
    pub fn handle_escape(&mut self) -> bool {
        if self.attached && self.open {
            self.close();
            return true;
        }
        false
    }

    fn item_rect(&self, index: usize) -> Rectangle {
        Rectangle::new(
            self.drawer.x,
            self.drawer.y + TOGGLE_MARGIN * 2.0 + TOGGLE_SIZE + index as f32 * ITEM_HEIGHT,
            self.drawer.width,
            ITEM_HEIGHT,
        )
    }

    pub fn handle_click(&mut self, point: (f32, f32)) -> ClickOutcome {
        if !self.attached {
            return ClickOutcome::Passthrough;
        }
        if contains(&self.toggle, point) {
            self.toggle();
            return ClickOutcome::Consumed;
        }
        if !self.open {
            return ClickOutcome::Passthrough;
        }
        if !contains(&self.drawer, point) {
            self.close();
            return ClickOutcome::Consumed;
        }

        let hit = MenuAction::ALL.iter().enumerate().find(|(i, _)| contains(&self.item_rect(*i), point));
        match hit {
            Some((_, action)) => {
                self.close();
                ClickOutcome::Action(*action)
            }
            None => ClickOutcome::Consumed,
        }
    }

    pub fn dispose(&mut self) {
        self.close();
        self.attached = false;
        debug!("Menu detached");
    }

    pub fn draw<D: RaylibDraw>(&self, d: &mut D, palette: &Palette) {
        if !self.attached {
            return;
        }

        if self.open {
            d.draw_rectangle_rec(self.drawer, palette.overlay);
            for (i, action) in MenuAction::ALL.iter().enumerate() {
                let r = self.item_rect(i);
                d.draw_text(
                    action.label(),
                    (r.x + 24.0) as i32,
                    (r.y + (ITEM_HEIGHT - ITEM_FONT_SIZE as f32) * 0.5) as i32,
                    ITEM_FONT_SIZE,
                    palette.text,
                );
            }
        }

        // Hamburger, three bars
        let t = self.toggle;
        d.draw_rectangle_rounded(t, 0.3, 6, palette.overlay);
        for bar in 0..3 {
            let y = t.y + 13.0 + bar as f32 * 8.0;
            d.draw_rectangle_rec(Rectangle::new(t.x + 11.0, y, t.width - 22.0, 3.0), palette.accent);
        }
    }
}

/// The "click / arrows to change picture" line at the bottom of the gallery.
pub struct HintOverlay {
    font: Option<Font>,
    // Width of the ASCII line in raylib's default font, measured up front
    fallback_width: f32,
}

impl HintOverlay {
    pub fn new(font: Option<Font>, fallback_width: f32) -> Self {
        Self { font, fallback_width }
    }

    /// Shown as soon as one image is on screen, hidden under the open menu.
    pub fn shown_for(mode: Mode, menu_open: bool) -> bool {
        mode != Mode::Fallback && !menu_open
    }

    /// Measures the ASCII line with the default font.
    pub fn measure_fallback(rl: &RaylibHandle) -> f32 {
        rl.measure_text(HINT_FALLBACK, HINT_FONT_SIZE as i32) as f32
    }

    /// The text shown, the Devanagari line needs a font that covers it.
    pub fn text(&self) -> &'static str {
        if self.font.is_some() { GALLERY_HINT } else { HINT_FALLBACK }
    }

    /// Top-left corner of the ASCII line, centred near the bottom edge.
    fn fallback_origin(&self, width: f32, height: f32) -> Vector2 {
        Vector2::new((width - self.fallback_width) * 0.5, height - HINT_FONT_SIZE - 24.0)
    }

    pub fn draw<D: RaylibDraw>(&self, d: &mut D, width: f32, height: f32, palette: &Palette) {
        let text = self.text();
        match &self.font {
            Some(font) => {
                let size = font.measure_text(text, HINT_FONT_SIZE, 1.0);
                let position = Vector2::new((width - size.x) * 0.5, height - size.y - 24.0);
                d.draw_rectangle_rec(
                    Rectangle::new(position.x - 12.0, position.y - 6.0, size.x + 24.0, size.y + 12.0),
                    palette.overlay,
                );
                d.draw_text_ex(font, text, position, HINT_FONT_SIZE, 1.0, palette.text);
            }
            None => {
                let origin = self.fallback_origin(width, height);
                d.draw_rectangle_rec(
                    Rectangle::new(origin.x - 12.0, origin.y - 6.0, self.fallback_width + 24.0, HINT_FONT_SIZE + 12.0),
                    palette.overlay,
                );
                d.draw_text(text, origin.x as i32, origin.y as i32, HINT_FONT_SIZE as i32, palette.text);
            }
        }
    }
}

/// Masonry of placeholder tiles shown while there is nothing to cycle.
pub fn fallback_tiles(width: f32, height: f32) -> Vec<Rectangle> {
    const COLUMNS: usize = 4;
    const GAP: f32 = 16.0;
    // Repeating tile heights as a fraction of the column width
    const ASPECTS: [f32; 5] = [1.3, 0.8, 1.0, 1.5, 0.7];

    let column_width = (width - GAP * (COLUMNS as f32 + 1.0)) / COLUMNS as f32;
    if column_width <= 0.0 {
        return Vec::new();
    }

    let mut tiles = Vec::new();
    for column in 0..COLUMNS {
        let x = GAP + column as f32 * (column_width + GAP);
        let mut y = GAP;
        let mut i = column;
        loop {
            let h = column_width * ASPECTS[i % ASPECTS.len()];
            if y + h > height - GAP {
                break;
            }
            tiles.push(Rectangle::new(x, y, column_width, h));
            y += h + GAP;
            i += 1;
        }
    }
    tiles
}

pub fn draw_fallback_grid<D: RaylibDraw>(d: &mut D, width: f32, height: f32, palette: &Palette) {
    let tile = Color::new(palette.text.r, palette.text.g, palette.text.b, 28);
    for r in fallback_tiles(width, height) {
        d.draw_rectangle_rounded(r, 0.08, 8, tile);
    }
}

/// Every character the glyph font has to rasterize: the floating letters,
/// the poem lines, the hint and plain ASCII for everything else.
pub fn glyph_charset() -> String {
    let mut chars: BTreeSet<char> = (' '..='~').collect();
    chars.extend(GLYPHS.iter().flat_map(|g| g.chars()));
    chars.extend(POEM_LINES.iter().flat_map(|l| l.chars()));
    chars.extend(GALLERY_HINT.chars());
    chars.into_iter().collect()
}

/// One entry per character, which is what raylib counts, not UTF-8 bytes.
pub fn glyph_codepoints() -> Vec<i32> {
    glyph_charset().chars().map(|c| c as i32).collect()
}

/// Loads a Devanagari capable font, `None` keeps the ASCII fallbacks.
pub fn load_glyph_font(_rl: &mut RaylibHandle, _thread: &RaylibThread, path: Option<&Path>, size: i32) -> Option<Font> {
    let path = path?;
    let Some(file) = path.to_str() else {
        warn!("Font path is not valid UTF-8: {}", path.display());
        return None;
    };
    let c_file = match CString::new(file) {
        Ok(c) => c,
        Err(e) => {
            warn!("Font path {} is not usable: {}", file, e);
            return None;
        }
    };

    let mut codepoints = glyph_codepoints();
    // SAFETY: the window exists (we hold the handle on its thread), the path
    // and codepoint buffer outlive the call, and the count matches the buffer.
    let raw = unsafe {
        raylib::ffi::LoadFontEx(c_file.as_ptr(), size, codepoints.as_mut_ptr(), codepoints.len() as i32)
    };

    // On failure raylib hands back its default font, which must not be unloaded
    let default_id = unsafe { raylib::ffi::GetFontDefault() }.texture.id;
    if raw.glyphs.is_null() || raw.texture.id == 0 || raw.texture.id == default_id {
        warn!("Could not load font {}", file);
        return None;
    }
    debug!("Loaded {} glyphs from {}", raw.glyphCount, file);

    // SAFETY: freshly loaded, owned by nobody else
    Some(unsafe { Font::from_raw(raw) })
}

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::constants::{GALLERY_FALLBACK, GALLERY_MANIFEST, HERO_FALLBACK, HERO_MANIFEST, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::slideshow::Timing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShowMode {
    /// Shader displacement gallery, slow cadence
    Gallery,
    /// Crossfade hero slider, fast cadence
    Hero,
}

impl ShowMode {
    pub fn timing(self) -> Timing {
        match self {
            ShowMode::Gallery => Timing::GALLERY,
            ShowMode::Hero => Timing::HERO,
        }
    }

    pub fn default_manifest(self) -> &'static str {
        match self {
            ShowMode::Gallery => GALLERY_MANIFEST,
            ShowMode::Hero => HERO_MANIFEST,
        }
    }

    pub fn fallback(self) -> &'static [&'static str] {
        match self {
            ShowMode::Gallery => GALLERY_FALLBACK,
            ShowMode::Hero => HERO_FALLBACK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackgroundKind {
    Stardust,
    Ink,
    None,
}

#[derive(Parser, Debug)]
#[command(name = "shader-gallery")]
#[command(about = "Full-window image slideshow with shader transitions and particle backgrounds")]
pub struct Args {
    /// Directory that relative image paths and manifests resolve against
    #[arg(long)]
    pub site_root: Option<PathBuf>,

    /// Inline JSON array of image paths, used before any manifest
    #[arg(long)]
    pub images: Option<String>,

    /// Manifest path (relative to the site root) or http(s) URL
    #[arg(long)]
    pub manifest: Option<String>,

    #[arg(long, value_enum, default_value_t = ShowMode::Gallery)]
    pub mode: ShowMode,

    /// Defaults to stardust in hero mode and ink in gallery mode
    #[arg(long, value_enum)]
    pub background: Option<BackgroundKind>,

    /// TTF/OTF font with Devanagari coverage
    #[arg(long)]
    pub glyph_font: Option<PathBuf>,

    /// Where settings.toml lives
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    #[arg(long, default_value_t = WINDOW_WIDTH)]
    pub width: i32,

    #[arg(long, default_value_t = WINDOW_HEIGHT)]
    pub height: i32,
}

impl Args {
    pub fn background(&self) -> BackgroundKind {
        self.background.unwrap_or(match self.mode {
            ShowMode::Gallery => BackgroundKind::Ink,
            ShowMode::Hero => BackgroundKind::Stardust,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_gallery_with_ink() {
        let args = Args::parse_from(["shader-gallery"]);
        assert_eq!(args.mode, ShowMode::Gallery);
        assert_eq!(args.background(), BackgroundKind::Ink);
        assert_eq!(args.mode.default_manifest(), GALLERY_MANIFEST);
        assert_eq!((args.width, args.height), (WINDOW_WIDTH, WINDOW_HEIGHT));
    }

    #[test]
    fn hero_mode_uses_stardust_and_fast_timing() {
        let args = Args::parse_from(["shader-gallery", "--mode", "hero"]);
        assert_eq!(args.background(), BackgroundKind::Stardust);
        assert_eq!(args.mode.timing(), Timing::HERO);
        assert_eq!(args.mode.fallback(), HERO_FALLBACK);
    }

    #[test]
    fn explicit_background_wins() {
        let args = Args::parse_from(["shader-gallery", "--background", "none", "--images", "[\"a.jpg\"]"]);
        assert_eq!(args.background(), BackgroundKind::None);
        assert_eq!(args.images.as_deref(), Some("[\"a.jpg\"]"));
    }
}

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use raylib::prelude::*;
use tracing::{debug, info, warn};

mod background;
mod cli;
mod config;
mod constants;
mod controls;
mod engine;
mod error;
mod render;
mod slideshow;
mod sources;
mod texture_loader;
mod theme;
mod ui;

use crate::background::{Backdrop, InkField, Stardust};
use crate::cli::{Args, BackgroundKind, ShowMode};
use crate::constants::FPS;
use crate::controls::{Command, Controls, InputSnapshot};
use crate::render::{CrossfadeCompositor, DisplacementCompositor, SlideCompositor};
use crate::slideshow::{Mode, SlideshowEngine};
use crate::sources::{HttpManifestFetcher, SourceResolver};
use crate::texture_loader::RaylibImageLoader;
use crate::theme::{ThemeMode, ThemeSignal};
use crate::ui::{ClickOutcome, HintOverlay, MenuAction, MenuController};

const GLYPH_FONT_SIZE: i32 = 64;
const HINT_FONT_SIZE: i32 = 32;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // --- Settings ---
    let settings_path = match config::settings_path(args.config_dir.as_deref()) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!("Settings will not be saved: {}", e);
            None
        }
    };
    let settings = settings_path.as_deref().map(config::load_or_default).unwrap_or_default();

    let site_root = args
        .site_root
        .clone()
        .or_else(|| settings.gallery.site_root.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let glyph_font = args.glyph_font.clone().or_else(|| settings.gallery.glyph_font.clone());
    let inline = args.images.clone().or_else(|| settings.gallery.images.clone());
    let manifest = args
        .manifest
        .clone()
        .or_else(|| settings.gallery.manifest.clone())
        .unwrap_or_else(|| args.mode.default_manifest().to_string());

    let theme = ThemeSignal::new(ThemeMode::initial(settings.general.theme), settings_path);

    // --- Resolve image list before the window opens ---
    let fetcher = HttpManifestFetcher::new(&site_root)?;
    let sources = SourceResolver::new(inline, Some(manifest), args.mode.fallback()).resolve(&fetcher);
    info!("Site root: {}, {} image source(s)", site_root.display(), sources.len());

    let (mut rl, thread) = raylib::init()
        .size(args.width, args.height)
        .title("Shader Gallery")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);
    // Escape closes the menu, Q quits
    rl.set_exit_key(None);

    // --- Load Slides ---
    let mut engine = {
        let mut loader = RaylibImageLoader::new(&mut rl, &thread, &site_root);
        SlideshowEngine::start(&sources, &mut loader, args.mode.timing())
    };
    if engine.mode() == Mode::Static {
        info!("Only {} slide loaded, showing it without transitions", engine.len());
    }

    let mut size = (rl.get_screen_width() as f32, rl.get_screen_height() as f32);

    let mut compositor = match args.mode {
        ShowMode::Hero => SlideCompositor::Crossfade(CrossfadeCompositor::new(size.0, size.1)),
        ShowMode::Gallery => match DisplacementCompositor::new(&mut rl, &thread, size.0, size.1) {
            Ok(c) => SlideCompositor::Displacement(c),
            Err(e) => {
                warn!("{}, using a plain crossfade", e);
                SlideCompositor::Crossfade(CrossfadeCompositor::new(size.0, size.1))
            }
        },
    };

    let mut backdrop = match args.background() {
        BackgroundKind::Stardust => Backdrop::Stardust(Stardust::new(theme.subscribe())),
        BackgroundKind::Ink => {
            let font = ui::load_glyph_font(&mut rl, &thread, glyph_font.as_deref(), GLYPH_FONT_SIZE);
            Backdrop::Ink(InkField::new(theme.subscribe(), font))
        }
        BackgroundKind::None => Backdrop::None,
    };

    let hint = (args.mode == ShowMode::Gallery).then(|| {
        let fallback_width = HintOverlay::measure_fallback(&rl);
        let font = ui::load_glyph_font(&mut rl, &thread, glyph_font.as_deref(), HINT_FONT_SIZE);
        HintOverlay::new(font, fallback_width)
    });

    let (toggle, drawer) = ui::menu_layout(size.0, size.1);
    let mut menu = MenuController::init(toggle, drawer);
    let mut controls = Controls::new();

    // --- Main Loop ---
    'running: while !rl.window_should_close() {
        let dt = rl.get_frame_time();

        let screen = (rl.get_screen_width() as f32, rl.get_screen_height() as f32);
        if screen != size {
            size = screen;
            compositor.resize(size.0, size.1);
            let (toggle, drawer) = ui::menu_layout(size.0, size.1);
            menu.relayout(toggle, drawer);
        }

        // --- Input ---
        let input = InputSnapshot::capture(&rl);
        for command in controls.map(&input) {
            let action = match command {
                Command::SkipForward => Some(MenuAction::Next),
                Command::SkipBackward => Some(MenuAction::Previous),
                Command::ToggleTheme => Some(MenuAction::ToggleTheme),
                Command::Quit => Some(MenuAction::Quit),
                Command::ToggleMenu => {
                    menu.toggle();
                    None
                }
                Command::CloseMenu => {
                    menu.handle_escape();
                    None
                }
                Command::PointerMoved(x, y) => {
                    backdrop.pointer_moved(x, y, size.0, size.1);
                    None
                }
                Command::PointerDown(x, y) => {
                    backdrop.pointer_down(x, y);
                    None
                }
                Command::Click(x, y) => match menu.handle_click((x, y)) {
                    ClickOutcome::Action(action) => Some(action),
                    ClickOutcome::Consumed => None,
                    ClickOutcome::Passthrough => Some(MenuAction::Next),
                },
            };

            match action {
                Some(MenuAction::Next) => {
                    engine.skip_forward();
                    debug!("Skip forward from slide {} of {}", engine.current_index() + 1, engine.len());
                }
                Some(MenuAction::Previous) => {
                    engine.skip_backward();
                    debug!("Skip back to slide {} of {}", engine.current_index() + 1, engine.len());
                }
                Some(MenuAction::ToggleTheme) => {
                    theme.toggle();
                }
                Some(MenuAction::Quit) => break 'running,
                None => {}
            }
        }

        // --- Update ---
        engine.advance(Duration::from_secs_f32(dt));
        backdrop.update(dt);

        // --- Draw ---
        let palette = theme.current().palette();
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(palette.background);

        engine.render(&mut compositor, &mut d);
        if engine.shows_fallback() {
            ui::draw_fallback_grid(&mut d, size.0, size.1, &palette);
        }

        // Particles float above the pictures
        backdrop.draw(&mut d, size.0, size.1);

        if let Some(hint) = &hint {
            if HintOverlay::shown_for(engine.mode(), menu.is_open()) {
                hint.draw(&mut d, size.0, size.1, &palette);
            }
        }
        menu.draw(&mut d, &palette);
    } // End main loop

    menu.dispose();
    info!("Slideshow closed");
    Ok(())
}

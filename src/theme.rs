//! Light/dark theme, persisted between runs and broadcast to anything that
//! recolors itself (the particle backgrounds, the overlays).

use std::path::PathBuf;

use raylib::prelude::Color;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    /// Dark only when the system says so.
    pub fn system() -> ThemeMode {
        match dark_light::detect() {
            Ok(dark_light::Mode::Dark) => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }

    pub fn initial(stored: Option<ThemeMode>) -> ThemeMode {
        stored.unwrap_or_else(ThemeMode::system)
    }

    pub fn toggled(self) -> ThemeMode {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            ThemeMode::Light => Palette {
                background: Color::new(246, 241, 234, 255),
                text: Color::new(34, 26, 22, 255),
                stardust: Color::new(176, 120, 72, 255),
                ink: Color::new(214, 96, 40, 255),
                accent: Color::new(255, 0, 119, 255),
                overlay: Color::new(255, 255, 255, 200),
            },
            ThemeMode::Dark => Palette {
                background: Color::new(12, 10, 18, 255),
                text: Color::new(238, 232, 226, 255),
                stardust: Color::new(255, 255, 255, 255),
                ink: Color::new(255, 143, 75, 255),
                accent: Color::new(255, 90, 168, 255),
                overlay: Color::new(0, 0, 0, 170),
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub stardust: Color,
    pub ink: Color,
    pub accent: Color,
    pub overlay: Color,
}

/// Process-wide "theme changed" notification. Observers hold a receiver
/// and check `has_changed()` once per frame.
pub struct ThemeSignal {
    sender: watch::Sender<ThemeMode>,
    settings_path: Option<PathBuf>,
}

impl ThemeSignal {
    pub fn new(initial: ThemeMode, settings_path: Option<PathBuf>) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender, settings_path }
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeMode> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> ThemeMode {
        *self.sender.borrow()
    }

    /// Publishes `mode` and remembers it for the next run.
    pub fn set(&self, mode: ThemeMode) {
        self.sender.send_replace(mode);
        info!("Theme switched to {:?}", mode);
        self.persist(mode);
    }

    pub fn toggle(&self) -> ThemeMode {
        let mode = self.current().toggled();
        self.set(mode);
        mode
    }

    fn persist(&self, mode: ThemeMode) {
        let Some(path) = &self.settings_path else {
            return;
        };
        let mut settings = config::load_or_default(path);
        settings.general.theme = Some(mode);
        if let Err(e) = config::save_to_path(&settings, path) {
            warn!("Could not save theme preference: {}", e);
        }
    }
}

use raylib::prelude::*;

use crate::constants::SWIPE_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SkipForward,
    SkipBackward,
    ToggleTheme,
    ToggleMenu,
    CloseMenu,
    Quit,
    /// Primary button pressed and released without a swipe.
    Click(f32, f32),
    /// Pointer moved, for parallax.
    PointerMoved(f32, f32),
    /// Primary button went down, for ripples.
    PointerDown(f32, f32),
}

/// The input state of one frame, captured up front so that mapping it to
/// commands stays a pure function.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputSnapshot {
    pub right: bool,
    pub left: bool,
    pub space: bool,
    pub theme: bool,
    pub menu: bool,
    pub escape: bool,
    pub quit: bool,
    pub pointer: (f32, f32),
    pub pointer_moved: bool,
    pub pressed: bool,
    pub released: bool,
}

impl InputSnapshot {
    pub fn capture(rl: &RaylibHandle) -> Self {
        let pointer = rl.get_mouse_position();
        let delta = rl.get_mouse_delta();
        Self {
            right: rl.is_key_pressed(KeyboardKey::KEY_RIGHT),
            left: rl.is_key_pressed(KeyboardKey::KEY_LEFT),
            space: rl.is_key_pressed(KeyboardKey::KEY_SPACE),
            theme: rl.is_key_pressed(KeyboardKey::KEY_T),
            menu: rl.is_key_pressed(KeyboardKey::KEY_M),
            escape: rl.is_key_pressed(KeyboardKey::KEY_ESCAPE),
            quit: rl.is_key_pressed(KeyboardKey::KEY_Q),
            pointer: (pointer.x, pointer.y),
            pointer_moved: delta.x != 0.0 || delta.y != 0.0,
            pressed: rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT),
            released: rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT),
        }
    }
}

/// Keyboard and pointer mapping. Remembers where a press started so a
/// horizontal drag can be told apart from a click.
#[derive(Debug, Default)]
pub struct Controls {
    press_origin: Option<(f32, f32)>,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(&mut self, input: &InputSnapshot) -> Vec<Command> {
        let mut commands = Vec::new();

        if input.right || input.space {
            commands.push(Command::SkipForward);
        }
        if input.left {
            commands.push(Command::SkipBackward);
        }
        if input.theme {
            commands.push(Command::ToggleTheme);
        }
        if input.menu {
            commands.push(Command::ToggleMenu);
        }
        if input.escape {
            commands.push(Command::CloseMenu);
        }
        if input.quit {
            commands.push(Command::Quit);
        }

        let (x, y) = input.pointer;
        if input.pointer_moved {
            commands.push(Command::PointerMoved(x, y));
        }
        if input.pressed {
            self.press_origin = Some((x, y));
            commands.push(Command::PointerDown(x, y));
        }
        if input.released {
            if let Some((x0, _)) = self.press_origin.take() {
                let dx = x - x0;
                if dx.abs() > SWIPE_THRESHOLD {
                    // Dragging right reveals the previous image
                    commands.push(if dx > 0.0 { Command::SkipBackward } else { Command::SkipForward });
                } else {
                    commands.push(Command::Click(x, y));
                }
            }
        }

        commands
    }
}

//! The party overlay: a music toggle and the birthday message

use imgui::{Condition, StyleColor, WindowFlags};

const MARGIN: f32 = 16.0;
const MESSAGE_SCALE: f32 = 2.5;
const MESSAGE_COLOR: [f32; 4] = [0.89, 0.19, 0.42, 1.0];

/// What the overlay needs to know this frame
#[derive(Debug, Clone, Copy)]
pub struct OverlayState<'a> {
    pub message: &'a str,
    pub message_visible: bool,
    pub music_playing: bool,
}

/// User requests raised by the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    ToggleMusic,
}

pub fn music_button_label(music_playing: bool) -> &'static str {
    if music_playing {
        "Pause Music"
    } else {
        "Play Music"
    }
}

/// Builds the overlay and reports a click on the music button
pub fn party_overlay(ui: &imgui::Ui, state: &OverlayState<'_>) -> Option<OverlayAction> {
    let mut action = None;
    let [width, height] = ui.io().display_size;

    ui.window("Music")
        .position([MARGIN, MARGIN], Condition::Always)
        .flags(
            WindowFlags::NO_DECORATION
                | WindowFlags::ALWAYS_AUTO_RESIZE
                | WindowFlags::NO_MOVE
                | WindowFlags::NO_SAVED_SETTINGS,
        )
        .build(|| {
            if ui.button(music_button_label(state.music_playing)) {
                action = Some(OverlayAction::ToggleMusic);
            }
        });

    if state.message_visible {
        ui.window("Message")
            .position([width * 0.5, height * 0.5], Condition::Always)
            .position_pivot([0.5, 0.5])
            .bg_alpha(0.0)
            .flags(
                WindowFlags::NO_DECORATION
                    | WindowFlags::ALWAYS_AUTO_RESIZE
                    | WindowFlags::NO_MOVE
                    | WindowFlags::NO_INPUTS
                    | WindowFlags::NO_SAVED_SETTINGS,
            )
            .build(|| {
                ui.set_window_font_scale(MESSAGE_SCALE);
                let _color = ui.push_style_color(StyleColor::Text, MESSAGE_COLOR);
                ui.text(state.message);
            });
    }

    action
}

use ratatui::style::Color;

use crate::{constants::COLORS, timer::TimerPhase};

pub(super) fn phase_color(phase: TimerPhase) -> Color {
    match phase {
        TimerPhase::Idle => Color::Gray,
        TimerPhase::Running => COLORS[0],
        TimerPhase::Paused => Color::Rgb(255, 153, 0),
    }
}

pub(super) fn phase_label(phase: TimerPhase) -> &'static str {
    match phase {
        TimerPhase::Idle => "ready",
        TimerPhase::Running => "focus",
        TimerPhase::Paused => "paused",
    }
}

pub(super) fn color_for_index(index: usize) -> Color {
    COLORS[index % COLORS.len()]
}

pub(super) fn text_color_for_bg(bg_color: Color) -> Color {
    if let Color::Rgb(r, g, b) = bg_color {
        let brightness = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
        if brightness > 128 {
            Color::Black
        } else {
            Color::White
        }
    } else {
        Color::White
    }
}

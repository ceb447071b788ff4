//! Styling helpers for the interactive UI

use super::messages::MessageType;
use ratatui::style::{Color, Style};

/// Colour band for a completion fraction
pub fn progress_color(value: f64) -> Color {
    if value >= 0.9 {
        Color::Green
    } else if value >= 0.5 {
        Color::Cyan
    } else if value >= 0.2 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Gauges cannot draw outside 0..=1; weights summing above 1 can exceed it
pub fn gauge_ratio(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Get style for message type
pub fn get_message_style(message_type: MessageType) -> Style {
    match message_type {
        MessageType::Info => Style::default().fg(Color::Cyan),
        MessageType::Warning => Style::default().fg(Color::Yellow),
        MessageType::Error => Style::default().fg(Color::Red),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge_ratio_clamps() {
        assert_eq!(gauge_ratio(0.38), 0.38);
        assert_eq!(gauge_ratio(1.02), 1.0);
        assert_eq!(gauge_ratio(-0.1), 0.0);
        assert_eq!(gauge_ratio(f64::NAN), 0.0);
    }

    #[test]
    fn test_progress_color_bands() {
        assert_eq!(progress_color(1.0), Color::Green);
        assert_eq!(progress_color(0.5), Color::Cyan);
        assert_eq!(progress_color(0.38), Color::Yellow);
        assert_eq!(progress_color(0.0), Color::Red);
    }
}

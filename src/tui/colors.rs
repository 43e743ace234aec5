use ratatui::style::Color;

pub const ACCENT: Color = Color::Cyan;
pub const STATUS_BG: Color = Color::Rgb(0, 95, 135);
pub const PANEL_BG: Color = Color::Rgb(40, 40, 50);

pub fn color_for_genre(id: u32) -> Color {
    match id {
        1 => Color::LightGreen,
        2 => Color::Red,
        3 => Color::Yellow,
        4 => Color::Magenta,
        5 => Color::LightMagenta,
        6 => Color::LightBlue,
        7 => Color::Cyan,
        8 => Color::LightRed,
        9 => Color::Green,
        _ => Color::Gray,
    }
}

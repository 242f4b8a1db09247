use playoff_engine::Side;
use tui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThemeColor {
    Red,
    Blue,
    Accent,
    Dim,
    Selected,
    Eliminated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Theme {
    #[default]
    Dark,
}

pub fn resolve(color: ThemeColor, _theme: Theme) -> Style {
    match color {
        ThemeColor::Red => Style::default().fg(Color::Rgb(237, 28, 36)),
        ThemeColor::Blue => Style::default().fg(Color::Rgb(0, 102, 179)),
        ThemeColor::Accent => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ThemeColor::Dim => Style::default().fg(Color::Indexed(240)),
        ThemeColor::Selected => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ThemeColor::Eliminated => Style::default().fg(Color::DarkGray),
    }
}

pub fn side_color(side: Side) -> ThemeColor {
    match side {
        Side::Red => ThemeColor::Red,
        Side::Blue => ThemeColor::Blue,
    }
}

pub fn side_style(side: Side, theme: Theme) -> Style {
    resolve(side_color(side), theme)
}

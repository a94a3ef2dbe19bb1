//! 明暗主题

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// 一套配色
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub secondary: Color,
    pub accent: Color,
    pub muted: Color,
    pub link: Color,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: Color::Rgb(18, 20, 26),
                text: Color::Rgb(230, 230, 235),
                secondary: Color::Rgb(170, 175, 190),
                accent: Color::Cyan,
                muted: Color::DarkGray,
                link: Color::LightBlue,
            },
            Theme::Light => Palette {
                background: Color::Rgb(250, 249, 246),
                text: Color::Rgb(30, 30, 35),
                secondary: Color::Rgb(90, 95, 110),
                accent: Color::Blue,
                muted: Color::Gray,
                link: Color::Blue,
            },
        }
    }
}

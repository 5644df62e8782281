use ratatui::style::{Color, Modifier, Style};

use crate::models::Sphere;

/// Colors used by every render function. The app owns one and passes it down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Palette {
    pub(crate) header_bg: Color,
    pub(crate) header_fg: Color,
    pub(crate) accent: Color,
    pub(crate) green: Color,
    pub(crate) red: Color,
    pub(crate) yellow: Color,
    pub(crate) orange: Color,
    pub(crate) surface: Color,
    pub(crate) text: Color,
    pub(crate) text_dim: Color,
    pub(crate) overlay: Color,
    pub(crate) command_bg: Color,
    /// Series colors for categories, cycled by index.
    pub(crate) series: [Color; 8],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            header_bg: Color::Rgb(30, 30, 46),
            header_fg: Color::Rgb(205, 214, 244),
            accent: Color::Rgb(137, 180, 250),
            green: Color::Rgb(166, 227, 161),
            red: Color::Rgb(243, 139, 168),
            yellow: Color::Rgb(249, 226, 175),
            orange: Color::Rgb(250, 179, 135),
            surface: Color::Rgb(49, 50, 68),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(127, 132, 156),
            overlay: Color::Rgb(69, 71, 90),
            command_bg: Color::Rgb(24, 24, 37),
            series: [
                Color::Rgb(137, 180, 250),
                Color::Rgb(250, 179, 135),
                Color::Rgb(166, 227, 161),
                Color::Rgb(203, 166, 247),
                Color::Rgb(249, 226, 175),
                Color::Rgb(148, 226, 213),
                Color::Rgb(243, 139, 168),
                Color::Rgb(180, 190, 254),
            ],
        }
    }
}

impl Palette {
    pub(crate) fn sphere_color(&self, sphere: &Sphere) -> Color {
        match sphere {
            Sphere::National => self.accent,
            Sphere::State => self.orange,
            Sphere::Municipal => self.green,
            Sphere::District => self.series[3],
            Sphere::Uninformed => self.text_dim,
            Sphere::Other(_) => self.yellow,
        }
    }

    pub(crate) fn series_color(&self, index: usize) -> Color {
        self.series[index % self.series.len()]
    }

    pub(crate) fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn selected_style(&self) -> Style {
        Style::default().fg(self.header_bg).bg(self.accent)
    }

    pub(crate) fn normal_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub(crate) fn dim_style(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub(crate) fn good_style(&self) -> Style {
        Style::default().fg(self.green)
    }

    pub(crate) fn bad_style(&self) -> Style {
        Style::default().fg(self.red)
    }

    pub(crate) fn alt_row_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }

    pub(crate) fn command_bar_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.command_bg)
    }

    pub(crate) fn status_bar_style(&self) -> Style {
        Style::default().fg(self.text_dim).bg(self.surface)
    }

    pub(crate) fn border_style(&self) -> Style {
        Style::default().fg(self.overlay)
    }

    pub(crate) fn title_style(&self) -> Style {
        Style::default()
            .fg(self.text_dim)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn section_style(&self) -> Style {
        Style::default()
            .fg(self.yellow)
            .add_modifier(Modifier::BOLD)
    }
}

use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    board_display::*, cell_display::*, pair_display::*, session_display::*,
    session_stats_display::*,
};

mod board_display;
mod cell_display;
mod pair_display;
mod session_display;
mod session_stats_display;

mod color {
    use ratatui::style::Color;

    pub const RED: Color = Color::Rgb(255, 48, 48);
    pub const GREEN: Color = Color::Rgb(0, 220, 0);
    pub const BLUE: Color = Color::Rgb(48, 96, 255);
    pub const YELLOW: Color = Color::Rgb(255, 230, 0);
    pub const PURPLE: Color = Color::Rgb(176, 64, 255);
    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use puyo_engine::PuyoColor;
    use ratatui::style::{Color, Modifier, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = bg_only(color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);

    pub const fn color_of(puyo: PuyoColor) -> Color {
        match puyo {
            PuyoColor::Red => color::RED,
            PuyoColor::Green => color::GREEN,
            PuyoColor::Blue => color::BLUE,
            PuyoColor::Yellow => color::YELLOW,
            PuyoColor::Purple => color::PURPLE,
        }
    }

    pub const fn puyo(puyo: PuyoColor) -> Style {
        bg_only(color_of(puyo))
    }

    /// Cells about to be cleared.
    pub const fn marked(puyo: PuyoColor) -> Style {
        fg_bg(color::WHITE, color_of(puyo)).add_modifier(Modifier::BOLD)
    }

    pub const fn ghost(puyo: PuyoColor) -> Style {
        fg_bg(color_of(puyo), color::BLACK)
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}

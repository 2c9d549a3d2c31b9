use puyo_engine::ColorPair;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::CellDisplay;

/// Preview of a pair in spawn orientation: sub cell above main cell.
#[derive(Debug)]
pub struct PairDisplay<'a> {
    pair: ColorPair,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PairDisplay<'a> {
    pub fn new(pair: ColorPair) -> Self {
        Self { pair, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        3 * CellDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * CellDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PairDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let pair_area = area.centered(
            Constraint::Length(CellDisplay::width()),
            Constraint::Length(2 * CellDisplay::height()),
        );
        let [sub_area, main_area] = pair_area.layout(&Layout::vertical([
            Constraint::Length(CellDisplay::height()),
            Constraint::Length(CellDisplay::height()),
        ]));

        CellDisplay::puyo(self.pair.sub).render(sub_area, buf);
        CellDisplay::puyo(self.pair.main).render(main_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use puyo_engine::PuyoColor;
    use ratatui::style::Color;

    use super::*;
    use crate::ui::widgets::style;

    #[test]
    fn test_sub_drawn_above_main() {
        let display = PairDisplay::new(ColorPair::new(PuyoColor::Red, PuyoColor::Blue));
        let area = Rect::new(0, 0, display.width(), display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);

        assert_eq!(buf[(2, 0)].bg, style::color_of(PuyoColor::Blue));
        assert_eq!(buf[(3, 0)].bg, style::color_of(PuyoColor::Blue));
        assert_eq!(buf[(2, 1)].bg, style::color_of(PuyoColor::Red));
        assert_eq!(buf[(0, 1)].bg, Color::Reset);
    }
}

use std::iter;

use puyo_engine::{BOARD_WIDTH, Board, FallingPair, HIDDEN_ROWS, PuyoColor, VISIBLE_HEIGHT};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::CellDisplay;

/// The visible part of the board with the falling pair and its ghost on top.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    ghost: Option<FallingPair>,
    falling_pair: Option<FallingPair>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            ghost: None,
            falling_pair: None,
            block: None,
        }
    }

    pub fn ghost(self, pair: Option<FallingPair>) -> Self {
        Self {
            ghost: pair,
            ..self
        }
    }

    pub fn falling_pair(self, pair: Option<FallingPair>) -> Self {
        Self {
            falling_pair: pair,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        BOARD_WIDTH as u16 * CellDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        VISIBLE_HEIGHT as u16 * CellDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }

    fn cell_displays(&self) -> Vec<[CellDisplay; BOARD_WIDTH]> {
        let mut grid = self
            .board
            .visible_rows()
            .map(|row| row.map(|cell| CellDisplay::from_cell(cell, true)))
            .collect::<Vec<_>>();

        let mut overlay = |pair: FallingPair, make: fn(PuyoColor) -> CellDisplay| {
            for cell in pair.cells() {
                let Some((x, y)) = cell.position().to_index() else {
                    continue;
                };
                if y >= HIDDEN_ROWS {
                    grid[y - HIDDEN_ROWS][x] = make(cell.color());
                }
            }
        };
        if let Some(ghost) = self.ghost {
            overlay(ghost, CellDisplay::ghost);
        }
        if let Some(pair) = self.falling_pair {
            overlay(pair, CellDisplay::puyo);
        }
        grid
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..BOARD_WIDTH).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints =
            (0..VISIBLE_HEIGHT).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<VISIBLE_HEIGHT>(&vertical)
            .into_iter()
            .map(|row| row.layout::<BOARD_WIDTH>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.cell_displays()) {
            for (grid_cell, cell_display) in iter::zip(grid_row, row) {
                cell_display.render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use puyo_engine::ColorPair;

    use super::*;

    #[test]
    fn test_size_without_block() {
        let board = Board::EMPTY;
        let display = BoardDisplay::new(&board);
        assert_eq!(display.width(), 12);
        assert_eq!(display.height(), 12);
    }

    #[test]
    fn test_ghost_shown_below_hidden_pair() {
        let board = Board::EMPTY;
        let pair = FallingPair::spawn(ColorPair::new(PuyoColor::Red, PuyoColor::Blue));
        let display = BoardDisplay::new(&board)
            .ghost(Some(pair.dropped(&board)))
            .falling_pair(Some(pair));

        let mut buf = Buffer::empty(Rect::new(0, 0, display.width(), display.height()));
        Widget::render(&display, buf.area, &mut buf);

        let row = |y: u16| {
            (0..buf.area.width)
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
        };
        // a freshly spawned pair is still in the hidden row
        assert_eq!(row(0), " . . . . . .");
        assert_eq!(row(10), " . .[] . . .");
        assert_eq!(row(11), " . .[] . . .");
    }
}

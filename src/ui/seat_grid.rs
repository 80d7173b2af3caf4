use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::round::Round;

/// Terminal columns taken by one seat
pub const CELL_WIDTH: u16 = 4;

/// Placement of the seat grid, shared by drawing and mouse hit testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatGridLayout {
    pub bounds: Rect,
    pub origin_x: u16,
    pub origin_y: u16,
    pub columns: u16,
    pub rows: u16,
    pub total_seats: u32,
}

impl SeatGridLayout {
    /// Center a `columns`-wide grid of `total_seats` inside `area`
    pub fn new(area: Rect, total_seats: u32, columns: u16) -> Self {
        let columns = columns.max(1);
        let rows = total_seats.div_ceil(columns as u32).min(u16::MAX as u32) as u16;
        let width = columns.saturating_mul(CELL_WIDTH);

        Self {
            bounds: area,
            origin_x: area.x + area.width.saturating_sub(width) / 2,
            origin_y: area.y + area.height.saturating_sub(rows) / 2,
            columns,
            rows,
            total_seats,
        }
    }

    /// Screen cell of `seat`, or `None` when it falls outside the visible area
    pub fn cell_rect(&self, seat: u32) -> Option<Rect> {
        if seat == 0 || seat > self.total_seats {
            return None;
        }
        let index = seat - 1;
        let col = (index % self.columns as u32) as u16;
        let row = (index / self.columns as u32) as u16;

        let x = self
            .origin_x
            .checked_add(col.checked_mul(CELL_WIDTH)?)?;
        let y = self.origin_y.checked_add(row)?;

        let fits = x + CELL_WIDTH <= self.bounds.right() && y < self.bounds.bottom();
        fits.then(|| Rect::new(x, y, CELL_WIDTH, 1))
    }

    /// Seat drawn at terminal position (`column`, `row`)
    pub fn seat_at(&self, column: u16, row: u16) -> Option<u32> {
        if column < self.origin_x || row < self.origin_y {
            return None;
        }
        if column >= self.bounds.right() || row >= self.bounds.bottom() {
            return None;
        }

        let col = (column - self.origin_x) / CELL_WIDTH;
        let grid_row = row - self.origin_y;
        if col >= self.columns || grid_row >= self.rows {
            return None;
        }

        let seat = grid_row as u32 * self.columns as u32 + col as u32 + 1;
        // clipped cells are not drawn, so they cannot be clicked either
        self.cell_rect(seat).map(|_| seat)
    }
}

/// Seat map for a running round
pub struct SeatGrid<'a> {
    pub round: &'a Round,
    pub layout: SeatGridLayout,
    pub cursor: u32,
}

impl Widget for SeatGrid<'_> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let taken_style = Style::default().fg(Color::DarkGray);
        let open_style = bold.fg(Color::Green);
        let correct_style = bold.fg(Color::Black).bg(Color::Green);
        let wrong_style = bold.fg(Color::White).bg(Color::Red);

        for seat in 1..=self.layout.total_seats {
            let Some(cell) = self.layout.cell_rect(seat) else {
                continue;
            };

            let (label, mut style) = if !self.round.is_available(seat) {
                ("X".to_string(), taken_style)
            } else if self.round.selected == Some(seat) {
                let style = if seat == self.round.target {
                    correct_style
                } else {
                    wrong_style
                };
                (seat.to_string(), style)
            } else {
                (seat.to_string(), open_style)
            };

            if seat == self.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }

            buf.set_string(cell.x, cell.y, format!("{label:>3}"), style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn layout() -> SeatGridLayout {
        SeatGridLayout::new(Rect::new(0, 0, 80, 20), 150, 15)
    }

    #[test]
    fn grid_is_centered() {
        let l = layout();
        assert_eq!(l.rows, 10);
        assert_eq!(l.origin_x, 10);
        assert_eq!(l.origin_y, 5);
    }

    #[test]
    fn cell_and_hit_test_agree() {
        let l = layout();
        for seat in [1, 15, 16, 77, 150] {
            let cell = l.cell_rect(seat).expect("visible seat");
            assert_eq!(l.seat_at(cell.x, cell.y), Some(seat));
            assert_eq!(l.seat_at(cell.x + CELL_WIDTH - 1, cell.y), Some(seat));
        }
        assert_eq!(l.cell_rect(0), None);
        assert_eq!(l.cell_rect(151), None);
    }

    #[test]
    fn clicks_outside_grid_miss() {
        let l = layout();
        assert_eq!(l.seat_at(0, 0), None);
        assert_eq!(l.seat_at(l.origin_x + 15 * CELL_WIDTH, l.origin_y), None);
        assert_eq!(l.seat_at(l.origin_x, l.origin_y + 10), None);
    }

    #[test]
    fn clipped_cells_cannot_be_clicked() {
        // 15 columns need 60 cells; only 12 whole seats fit in 50
        let l = SeatGridLayout::new(Rect::new(0, 0, 50, 20), 150, 15);
        assert_eq!(l.origin_x, 0);

        assert_eq!(l.seat_at(44, l.origin_y), Some(12));
        assert_eq!(l.cell_rect(13), None);
        assert_eq!(l.seat_at(48, l.origin_y), None);
        assert_eq!(l.seat_at(49, l.origin_y), None);
    }

    #[test]
    fn partial_last_row() {
        let l = SeatGridLayout::new(Rect::new(0, 0, 80, 20), 20, 15);
        assert_eq!(l.rows, 2);
        let last = l.cell_rect(20).unwrap();
        assert_eq!(l.seat_at(last.x + CELL_WIDTH, last.y), None);
    }

    #[test]
    fn renders_open_and_taken_seats() {
        let round = Round {
            target: 1,
            available: vec![1, 2],
            selected: Some(1),
            started_at: Instant::now(),
        };
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        let l = layout();
        SeatGrid {
            round: &round,
            layout: l,
            cursor: 2,
        }
        .render(area, &mut buf);

        let row: String = (0..80)
            .map(|x| buf[(x, l.origin_y)].symbol().to_string())
            .collect();
        assert!(row.contains("  1   2   X   X"));
    }
}

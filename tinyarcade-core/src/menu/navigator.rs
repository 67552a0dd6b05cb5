//! Grid menu cursor
//!
//! Items are laid out row-major in a grid with a fixed column count. The
//! cursor never wraps: up and down move by a whole row and are refused at
//! the top and bottom, left and right move by one and are refused at the
//! row edges.

use super::items::MenuItem;
use crate::color::Color;
use crate::config::MenuConfig;
use crate::input::{InputSampler, Line};
use crate::traits::{AssetStore, Canvas, CanvasExt};

/// Result of handling one poll's input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuEvent {
    /// Nothing changed
    Idle,
    /// Cursor moved; the grid needs redrawing
    Moved,
    /// The item under the cursor was activated
    Activated(MenuItem),
}

/// Cursor over a fixed list of items
#[derive(Debug, Clone)]
pub struct MenuNavigator<'a> {
    items: &'a [MenuItem],
    columns: usize,
    selected: usize,
}

impl<'a> MenuNavigator<'a> {
    /// Cursor on the first item
    pub fn new(items: &'a [MenuItem], columns: usize) -> Self {
        Self {
            items,
            columns: columns.max(1),
            selected: 0,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&MenuItem> {
        self.items.get(self.selected)
    }

    pub fn items(&self) -> &[MenuItem] {
        self.items
    }

    /// Move the cursor one cell; returns `true` if it moved
    ///
    /// Non-direction lines are ignored.
    pub fn move_cursor(&mut self, direction: Line) -> bool {
        let count = self.items.len();
        let column = self.selected % self.columns;

        let target = match direction {
            Line::Up if self.selected >= self.columns => self.selected - self.columns,
            Line::Down if self.selected + self.columns < count => self.selected + self.columns,
            Line::Left if column != 0 => self.selected - 1,
            Line::Right if column + 1 < self.columns && self.selected + 1 < count => {
                self.selected + 1
            }
            _ => return false,
        };

        self.selected = target;
        true
    }

    /// Apply this poll's presses
    ///
    /// Directions are applied first, so an activation in the same poll
    /// selects the item the cursor ended on.
    pub fn handle(&mut self, input: &InputSampler) -> MenuEvent {
        let mut moved = false;
        for line in [Line::Up, Line::Down, Line::Left, Line::Right] {
            if input.debounced_edge(line) {
                moved |= self.move_cursor(line);
            }
        }

        if input.debounced_edge(Line::Select) {
            if let Some(item) = self.selected_item() {
                return MenuEvent::Activated(*item);
            }
        }

        if moved {
            MenuEvent::Moved
        } else {
            MenuEvent::Idle
        }
    }

    /// Draw the grid: icons, cursor outline, labels
    pub fn render<C, A>(&self, canvas: &mut C, assets: &A, layout: &MenuConfig)
    where
        C: Canvas + ?Sized,
        A: AssetStore + ?Sized,
    {
        let cell = i32::from(layout.cell_size);
        let inset = i32::from(layout.cell_size.saturating_sub(layout.icon_size) / 2);

        canvas.clear(Color::WHITE);
        for (i, item) in self.items.iter().enumerate() {
            let x = (i % self.columns) as i32 * cell;
            let y = (i / self.columns) as i32 * cell;

            match item.icon {
                Some(icon) => {
                    canvas.draw_asset_or_placeholder(
                        assets,
                        icon,
                        x + inset,
                        y + inset,
                        layout.icon_size,
                        layout.icon_size,
                    );
                }
                None => {
                    let size = i32::from(layout.icon_size);
                    canvas.draw_placeholder(x + inset, y + inset, size, size);
                }
            }

            if i == self.selected {
                canvas.draw_rect(x, y, cell, cell, Color::RED);
            }
            canvas.draw_text(item.label, x + 10, y + cell - 15, Color::BLUE);
        }
    }
}

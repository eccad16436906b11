//! Tab bar renderer
//!
//! Draws the tab strip as one row of ` label ` cells separated by `│`, and
//! the tab context menu on top of it. Only tab chrome is drawn here; session
//! content belongs to the sessions themselves.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    style::{ResetColor, SetBackgroundColor, SetForegroundColor},
};
use unicode_width::UnicodeWidthStr;

use crate::config::ColorScheme;
use crate::wm::TabInfo;
use super::context_menu::ContextMenu;

const SEPARATOR: &str = "│";

/// Renders tab chrome with a color scheme
pub struct TabBarRenderer {
    pub color_scheme: ColorScheme,
}

impl Default for TabBarRenderer {
    fn default() -> Self {
        Self::new(ColorScheme::default())
    }
}

impl TabBarRenderer {
    pub fn new(color_scheme: ColorScheme) -> Self {
        Self { color_scheme }
    }

    /// Column ranges `[start, end)` of each tab cell. Columns are `usize`
    /// since a long strip runs far past any terminal width.
    fn spans(tabs: &[TabInfo]) -> Vec<(usize, usize)> {
        let mut spans = Vec::with_capacity(tabs.len());
        let mut col = 0usize;
        for tab in tabs {
            let width = tab.label.width() + 2;
            spans.push((col, col + width));
            col += width + SEPARATOR.width();
        }
        spans
    }

    /// Index of the tab under column `col`, if any
    pub fn tab_at(tabs: &[TabInfo], col: u16) -> Option<usize> {
        let col = col as usize;
        Self::spans(tabs)
            .iter()
            .position(|&(start, end)| col >= start && col < end)
    }

    /// First column of tab `index`; `None` past the end of the strip or
    /// beyond the last addressable column
    pub fn tab_column(tabs: &[TabInfo], index: usize) -> Option<u16> {
        Self::spans(tabs)
            .get(index)
            .and_then(|&(start, _)| u16::try_from(start).ok())
    }

    /// Draw the tab bar on `row`, `width` columns wide
    pub fn render<W: Write>(&self, out: &mut W, tabs: &[TabInfo], row: u16, width: u16) -> io::Result<()> {
        let cs = &self.color_scheme;

        execute!(out, MoveTo(0, row))?;
        execute!(out,
            SetBackgroundColor(cs.tab_bar_bg.to_crossterm()),
            SetForegroundColor(cs.tab_bar_fg.to_crossterm())
        )?;
        write!(out, "{:width$}", "", width = width as usize)?;
        execute!(out, MoveTo(0, row))?;

        self.draw_cells(out, tabs)
    }

    /// Draw the tab bar at the cursor, padded to `width` columns
    pub fn render_line<W: Write>(&self, out: &mut W, tabs: &[TabInfo], width: u16) -> io::Result<()> {
        let cs = &self.color_scheme;
        let used = Self::spans(tabs).last().map_or(0, |&(_, end)| end);

        execute!(out,
            SetBackgroundColor(cs.tab_bar_bg.to_crossterm()),
            SetForegroundColor(cs.tab_bar_fg.to_crossterm())
        )?;
        self.draw_cells(out, tabs)?;
        execute!(out,
            SetBackgroundColor(cs.tab_bar_bg.to_crossterm()),
            SetForegroundColor(cs.tab_bar_fg.to_crossterm())
        )?;
        write!(out, "{:pad$}", "", pad = (width as usize).saturating_sub(used))?;
        execute!(out, ResetColor)?;
        out.flush()
    }

    fn draw_cells<W: Write>(&self, out: &mut W, tabs: &[TabInfo]) -> io::Result<()> {
        let cs = &self.color_scheme;

        for (i, tab) in tabs.iter().enumerate() {
            if tab.selected {
                execute!(out,
                    SetBackgroundColor(cs.tab_active_bg.to_crossterm()),
                    SetForegroundColor(cs.tab_active_fg.to_crossterm())
                )?;
            } else {
                execute!(out,
                    SetBackgroundColor(cs.tab_inactive_bg.to_crossterm()),
                    SetForegroundColor(cs.tab_inactive_fg.to_crossterm())
                )?;
            }
            write!(out, " {} ", tab.label)?;

            if i < tabs.len() - 1 {
                execute!(out,
                    SetBackgroundColor(cs.tab_bar_bg.to_crossterm()),
                    SetForegroundColor(cs.tab_bar_fg.to_crossterm())
                )?;
                write!(out, "{}", SEPARATOR)?;
            }
        }

        execute!(out, ResetColor)?;
        out.flush()
    }

    /// Draw the context menu at its clamped position
    pub fn render_context_menu<W: Write>(&self, out: &mut W, menu: &ContextMenu) -> io::Result<()> {
        let cs = &self.color_scheme;
        let content_width = menu.content_width() as usize;
        let (_, height) = menu.dimensions();
        let (x, y) = (menu.x, menu.y);

        let menu_bg = cs.menu_bg.to_crossterm();
        let menu_fg = cs.menu_fg.to_crossterm();
        let selected_bg = cs.tab_active_bg.to_crossterm();
        let selected_fg = cs.tab_active_fg.to_crossterm();

        execute!(out, SetBackgroundColor(menu_bg), SetForegroundColor(menu_fg))?;

        execute!(out, MoveTo(x, y))?;
        write!(out, "┌{}┐", "─".repeat(content_width))?;

        for (i, item) in menu.items.iter().enumerate() {
            execute!(out, MoveTo(x, y + 1 + i as u16))?;
            execute!(out, SetBackgroundColor(menu_bg), SetForegroundColor(menu_fg))?;
            write!(out, "│")?;

            if i == menu.selected {
                execute!(out, SetBackgroundColor(selected_bg), SetForegroundColor(selected_fg))?;
            }
            let text = item.display_text();
            let padding = content_width.saturating_sub(text.width());
            write!(out, "{}{:padding$}", text, "", padding = padding)?;

            execute!(out, SetBackgroundColor(menu_bg), SetForegroundColor(menu_fg))?;
            write!(out, "│")?;
        }

        execute!(out, MoveTo(x, y + height - 1))?;
        write!(out, "└{}┘", "─".repeat(content_width))?;

        execute!(out, ResetColor)?;
        out.flush()
    }
}

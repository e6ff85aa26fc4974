use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use autoboard_core::Phase;

use crate::app::App;
use crate::theme::Theme;

const RANK_WIDTH: usize = 4;
const SCORE_WIDTH: usize = 8;

pub struct BoardWidget;

impl BoardWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App, index: usize, theme: &Theme) {
        let Some(panel) = app.panels.get(index) else {
            return;
        };
        let is_focused = app.focused == Some(index);
        let is_hovered = app.hovered == Some(index);

        let border_style = if is_focused {
            Style::default().fg(theme.accent)
        } else if is_hovered {
            Style::default().fg(theme.info)
        } else {
            Style::default().fg(theme.grey0)
        };

        let indicator = if app.is_paused(index) {
            " ⏸"
        } else {
            match app.phase(index) {
                Some(Phase::BottomPause) | Some(Phase::TopPause) => " ·",
                _ => "",
            }
        };
        let title = format!(" {} ({}){} ", panel.difficulty, panel.row_count(), indicator);

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(theme.bg0));

        let inner = block.inner(area);
        // One line for the column header
        let body_rows = inner.height.saturating_sub(1);
        panel.set_layout(area, body_rows);

        let width = inner.width as usize;
        let class_width = width.saturating_sub(RANK_WIDTH + SCORE_WIDTH + 2);

        let header_style = Style::default()
            .fg(theme.grey2)
            .add_modifier(Modifier::BOLD);
        let mut lines = vec![Line::from(Span::styled(
            format!(
                "{:>rw$} {} {:>sw$}",
                "#",
                fit_width("Class", class_width),
                "Score",
                rw = RANK_WIDTH,
                sw = SCORE_WIDTH
            ),
            header_style,
        ))];

        let rows = panel.rows();
        if rows.is_empty() {
            lines.push(Line::from(Span::styled(
                "No records",
                Style::default().fg(theme.grey0),
            )));
        } else {
            let first = panel.first_visible_row();
            for (rank, row) in rows
                .iter()
                .enumerate()
                .skip(first)
                .take(body_rows as usize)
            {
                let rank_style = match rank {
                    0 => Style::default().fg(theme.yellow),
                    1 | 2 => Style::default().fg(theme.orange),
                    _ => Style::default().fg(theme.grey2),
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{:>w$}", rank + 1, w = RANK_WIDTH), rank_style),
                    Span::raw(" "),
                    Span::styled(
                        fit_width(&row.class_text(), class_width),
                        Style::default().fg(theme.fg0),
                    ),
                    Span::raw(" "),
                    Span::styled(
                        format!("{:>w$}", fit_width(&row.score_text(), SCORE_WIDTH).trim_end(), w = SCORE_WIDTH),
                        Style::default().fg(theme.success),
                    ),
                ]));
            }
        }

        let paragraph = Paragraph::new(lines).block(block);
        frame.render_widget(paragraph, area);
    }
}

/// Truncate or pad `text` to exactly `width` terminal columns
pub fn fit_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        let mut out = text.to_string();
        out.push_str(&" ".repeat(width - text.width()));
        return out;
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

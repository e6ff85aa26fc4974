use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::theme::Theme;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
        let (status_text, status_style) = if let Some(error) = &app.error {
            (
                format!(" Failed to load leaderboard: {}", error),
                Style::default().fg(theme.bg0).bg(theme.error),
            )
        } else if let Some(msg) = &app.status_message {
            (format!(" {}", msg), Style::default().fg(theme.fg0).bg(theme.bg2))
        } else {
            (
                format!(" {}", Self::summary(app)),
                Style::default().fg(theme.fg0).bg(theme.bg2),
            )
        };

        let help_hint = " q:quit tab:focus p:pause r:refresh ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, status_style),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(
                help_hint,
                Style::default().fg(theme.grey2).bg(theme.bg2),
            ),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }

    /// Default status line: refresh state and last update time
    pub fn summary(app: &App) -> String {
        let updated = match &app.last_updated {
            Some(time) => format!("Updated {}", time.format("%H:%M:%S")),
            None => "Waiting for data".to_string(),
        };
        let refreshing = if app.is_refreshing { " | Refreshing..." } else { "" };
        let hidden = if app.visible { "" } else { " | Paused (unfocused)" };
        format!("{}{}{}", updated, refreshing, hidden)
    }
}

#[cfg(test)]
mod tests {
    use autoboard_core::AppConfig;

    use super::*;

    #[test]
    fn test_summary_before_data() {
        let app = App::new(AppConfig::default());
        assert_eq!(StatusBarWidget::summary(&app), "Waiting for data");
    }

    #[test]
    fn test_summary_flags() {
        let mut app = App::new(AppConfig::default());
        app.is_refreshing = true;
        app.set_visible(false);
        assert_eq!(
            StatusBarWidget::summary(&app),
            "Waiting for data | Refreshing... | Paused (unfocused)"
        );
    }
}

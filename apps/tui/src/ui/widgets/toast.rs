use crate::app::{App, Severity};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const MAX_VISIBLE: usize = 4;
const TOAST_HEIGHT: u16 = 3;

pub const fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Info => Style::new().fg(Color::Cyan),
        Severity::Success => Style::new().fg(Color::Green),
        Severity::Error => Style::new().fg(Color::Red),
    }
}

/// Stack the newest toasts in the bottom-right corner, newest closest to
/// the edge. Each toast is an independent element.
pub fn render_toasts(app: &App, f: &mut Frame<'_>) {
    let area = f.area();
    if area.height < TOAST_HEIGHT + 2 {
        return;
    }

    for (slot, toast) in app.toasts.iter().rev().take(MAX_VISIBLE).enumerate() {
        let width = (toast.message.chars().count() as u16 + 4)
            .min(area.width.saturating_sub(4))
            .max(12);
        let offset = (slot as u16 + 1) * TOAST_HEIGHT;
        if offset + 1 > area.height {
            break;
        }

        let rect = Rect {
            x: area.right().saturating_sub(width + 2),
            y: area.bottom().saturating_sub(offset + 1),
            width,
            height: TOAST_HEIGHT,
        };

        let style = severity_style(toast.severity);
        let paragraph = Paragraph::new(toast.message.clone())
            .style(style)
            .block(Block::default().borders(Borders::ALL).border_style(style));

        f.render_widget(Clear, rect);
        f.render_widget(paragraph, rect);
    }
}

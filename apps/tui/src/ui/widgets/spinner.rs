use crate::app::App;
use crate::ui::widgets::popup::centered_fixed_rect;
use ratatui::layout::Margin;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, WhichUse, BRAILLE_SIX};

/// The single shared modal loading indicator. Rendered only while an async
/// operation is in flight; last `set_loading` call decides the message.
pub fn render_loading(app: &mut App, f: &mut Frame<'_>) {
    let Some(message) = app.loading.clone() else {
        return;
    };

    let area = f.area();
    let width = (message.chars().count() as u16 + 8).max(24).min(area.width);
    let rect = centered_fixed_rect(width, 3, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Clear, rect);
    f.render_widget(block, rect);

    let inner = rect.inner(Margin::new(2, 1));
    let throbber = Throbber::default()
        .label(message)
        .style(Style::default().fg(Color::White))
        .throbber_style(Style::default().fg(Color::Cyan))
        .throbber_set(BRAILLE_SIX)
        .use_type(WhichUse::Spin);

    f.render_stateful_widget(throbber, inner, &mut app.throbber);
}

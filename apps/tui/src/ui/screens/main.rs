use crate::app::{App, InputState, Section};
use crate::domain::{distance_km, nearest_spot, Spot};
use crate::ui::widgets::popup::{centered_fixed_rect, centered_rect};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_main(app: &App, f: &mut Frame<'_>) {
    let main_layout = build_main_layout(f);

    if app.show_help {
        let area = f.area();
        render_help_popup(f, area);
        return;
    }

    render_title_section(app, f, main_layout[0]);
    render_content_section(app, f, main_layout[1]);
    render_shortcuts(f, main_layout[2]);

    if app.input_state == InputState::EnteringCrewName {
        render_crew_input_popup(app, f);
    }
}

fn build_main_layout(f: &Frame<'_>) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title area
            Constraint::Min(10),   // Dashboard regions
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(2, 1)))
        .to_vec()
}

fn section_border(app: &App, section: Section) -> Style {
    if app.focus == section {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_title_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title_block = Block::default()
        .title("== ShoreSquad ==")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(title_block, area);

    let inner = area.inner(Margin::new(1, 1));
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(inner);

    let tagline = Paragraph::new(TextLine::from(vec![
        Span::styled(
            "Rally your crew ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "for the next beach cleanup",
            Style::default().fg(Color::Gray),
        ),
    ]))
    .alignment(Alignment::Left);
    f.render_widget(tagline, chunks[0]);

    let location_line = app.user_location.as_ref().map_or_else(
        || {
            TextLine::from(Span::styled(
                "Location: off (press l to enable)",
                Style::default().fg(Color::Gray),
            ))
        },
        |location| {
            TextLine::from(Span::styled(
                format!(
                    "Location: {:.4}, {:.4}",
                    location.latitude, location.longitude
                ),
                Style::default().fg(Color::Green),
            ))
        },
    );
    f.render_widget(
        Paragraph::new(location_line).alignment(Alignment::Right),
        chunks[1],
    );
}

fn render_content_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(9), Constraint::Min(8)])
        .split(columns[0]);

    render_map_panel(app, f, left[0]);
    render_crews_panel(app, f, left[1]);
    render_weather_panel(app, f, columns[1]);
}

fn render_map_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Cleanup Spots ")
        .title_style(Style::default().fg(Color::Green))
        .borders(Borders::ALL)
        .border_style(section_border(app, Section::Map));

    let mut lines = vec![spot_selector_line(app), TextLine::from("")];
    lines.extend(spot_detail_lines(app));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

// One selectable tab per spot; only the selected spot's panel is shown.
fn spot_selector_line(app: &App) -> TextLine<'static> {
    let mut spans = Vec::new();
    for (index, spot) in Spot::ALL.iter().enumerate() {
        let style = if *spot == app.selected_spot {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} {} ", index + 1, spot.label()), style));
        spans.push(Span::raw(" "));
    }
    TextLine::from(spans)
}

fn spot_detail_lines(app: &App) -> Vec<TextLine<'static>> {
    let spot = app.selected_spot;
    let info = spot.info();
    let label_style = Style::default().fg(Color::Gray);
    let value_style = Style::default().fg(Color::Yellow);

    let mut lines = vec![
        TextLine::from(Span::styled(
            info.name,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(vec![
            Span::styled("Difficulty: ", label_style),
            Span::styled(info.difficulty, value_style),
        ]),
        TextLine::from(Span::styled(info.description, label_style)),
        TextLine::from(vec![
            Span::styled("Coordinates: ", label_style),
            Span::styled(format!("{:.4}, {:.4}", info.lat, info.lng), value_style),
        ]),
    ];

    if let Some(location) = &app.user_location {
        let km = distance_km(spot, location);
        let (nearest, _) = nearest_spot(Some(location));
        let mut spans = vec![
            Span::styled("Distance: ", label_style),
            Span::styled(format!("{km:.1} km"), value_style),
        ];
        if nearest == spot {
            spans.push(Span::styled(
                "  (nearest to you)",
                Style::default().fg(Color::Green),
            ));
        }
        lines.push(TextLine::from(spans));
    }

    lines
}

fn render_weather_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" 24-Hour Forecast ")
        .title_style(Style::default().fg(Color::Green))
        .borders(Borders::ALL)
        .border_style(section_border(app, Section::Weather));

    let lines = app.forecast.as_ref().map_or_else(
        || {
            vec![
                TextLine::from(""),
                TextLine::from(Span::styled(
                    "No forecast loaded yet.",
                    Style::default().fg(Color::Gray),
                )),
                TextLine::from(""),
                TextLine::from(Span::styled(
                    "Press l to enable location and load the forecast,",
                    Style::default().fg(Color::Gray),
                )),
                TextLine::from(Span::styled(
                    "or w to load the forecast on its own.",
                    Style::default().fg(Color::Gray),
                )),
            ]
        },
        forecast_lines,
    );

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

// Full replace on every call: the whole region is rebuilt from the view.
fn forecast_lines(view: &crate::weather::ForecastView) -> Vec<TextLine<'static>> {
    let mut lines = vec![
        TextLine::from(Span::styled(
            view.header.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
    ];

    for entry in &view.entries {
        lines.push(TextLine::from(vec![
            Span::styled(
                format!("{:<6}", entry.label),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(format!("{}  ", entry.icon)),
            Span::styled(
                format!("{:<24}", entry.condition),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!("{:>3}% humidity", entry.humidity),
                Style::default().fg(Color::Gray),
            ),
        ]));
    }

    if view.is_fallback() {
        lines.push(TextLine::from(""));
        lines.push(TextLine::from(Span::styled(
            "Live forecast unavailable - showing demo data.",
            Style::default().fg(Color::Magenta),
        )));
    }

    lines
}

fn render_crews_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!(" Your Crews ({}) ", app.registry.len()))
        .title_style(Style::default().fg(Color::Green))
        .borders(Borders::ALL)
        .border_style(section_border(app, Section::Crews));

    let mut lines = Vec::new();

    if app.registry.is_empty() {
        lines.push(TextLine::from(""));
        lines.push(TextLine::from(Span::styled(
            "No crews yet - press c to create one",
            Style::default().fg(Color::Gray),
        )));
    } else {
        for (index, crew) in app.registry.crews().iter().enumerate() {
            let selected = app.focus == Section::Crews && index == app.selected_crew_index;
            let marker = if selected { "> " } else { "  " };
            let name_style = if selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(TextLine::from(vec![
                Span::styled(marker.to_string(), name_style),
                Span::styled(crew.name.clone(), name_style),
                Span::styled(
                    format!(
                        "  {} member(s) | {:.0} kg collected",
                        crew.members.len(),
                        crew.trash_collected
                    ),
                    Style::default().fg(Color::Gray),
                ),
            ]));
        }
    }

    if !app.events.is_empty() {
        lines.push(TextLine::from(""));
        lines.push(TextLine::from(Span::styled(
            "Upcoming cleanups:",
            Style::default().fg(Color::Gray),
        )));
        for event in &app.events {
            lines.push(TextLine::from(Span::styled(
                format!("- {} @ {} on {}", event.title, event.spot, event.scheduled_for),
                Style::default().fg(Color::Gray),
            )));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let hint = Paragraph::new(Span::styled(
        "l locate | w forecast | c new crew | g get started | 1-4/arrows spots | Tab focus | F1 help | q quit",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(hint, area);
}

fn render_crew_input_popup(app: &App, f: &mut Frame<'_>) {
    let rect = centered_fixed_rect(44, 5, f.area());

    let block = Block::default()
        .title(" New Crew ")
        .title_style(Style::default().fg(Color::Cyan))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines = vec![
        TextLine::from(vec![
            Span::styled("Name: ", Style::default().fg(Color::Gray)),
            Span::styled(
                app.current_input.clone(),
                Style::default().fg(Color::White),
            ),
            Span::styled("_", Style::default().fg(Color::Cyan)),
        ]),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Enter to create, Esc to cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(Text::from(lines)).block(block),
        rect,
    );
}

fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let rect = centered_rect(60, 70, area);

    let block = Block::default()
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let key_style = Style::default().fg(Color::Yellow);
    let text_style = Style::default().fg(Color::White);
    let entries: &[(&str, &str)] = &[
        ("l", "Enable location, then load the 24-hour forecast"),
        ("w", "Load the 24-hour forecast without location"),
        ("c", "Create a new crew"),
        ("g", "Get started (jump to the cleanup spots)"),
        ("1-4", "Show a cleanup spot's map panel"),
        ("Left/Right", "Cycle through cleanup spots"),
        ("Tab/Shift-Tab", "Move focus between regions"),
        ("Up/Down", "Select a crew (when crews have focus)"),
        ("F1 or ?", "Toggle this help"),
        ("q", "Quit"),
    ];

    let mut lines = vec![TextLine::from("")];
    for (key, description) in entries {
        lines.push(TextLine::from(vec![
            Span::styled(format!("  {key:<14}"), key_style),
            Span::styled((*description).to_string(), text_style),
        ]));
    }

    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: true }),
        rect,
    );
}

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    // Title / header
    let header = Paragraph::new("harita – district choropleth")
        .block(Block::default().borders(Borders::ALL).title("Harita"));
    frame.render_widget(header, *header_area);

    // Main screen
    match app.screen {
        Screen::SourceSelect => draw_source_select(frame, app, *content_area),
        Screen::MapView => draw_map_view(frame, app, *content_area),
        Screen::UploadForm => draw_upload_form(frame, app, *content_area),
    }

    // Status bar
    let nav_hint = match app.screen {
        Screen::SourceSelect => "↑/↓ move · Enter/Space select source · q/Ctrl-C quit",
        Screen::MapView => "u upload data · r refresh · Left/Esc back · q/Ctrl-C quit",
        Screen::UploadForm => {
            "↑/↓ pick district · type CSV path · Enter submit · Left/Esc back · Ctrl-C quit"
        }
    };

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text.to_owned())
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_source_select(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items = app
        .sources
        .iter()
        .enumerate()
        .map(|(idx, (_id, name))| {
            let prefix = if idx == app.source_list_index {
                "> "
            } else {
                "  "
            };
            ListItem::new(format!("{prefix}{name}"))
        })
        .collect::<Vec<ListItem<'_>>>();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Select boundary source (↑/↓, Enter)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.sources.is_empty() {
        state.select(Some(app.source_list_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_map_view(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let source_name = app
        .service
        .active_source()
        .map_or_else(|| "<no source>".to_owned(), |meta| meta.name);

    let Some(layer) = app.surface.layer() else {
        let paragraph = Paragraph::new("No layer rendered yet. Press r to refresh.")
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Map – {source_name}")),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    };

    let items = layer
        .features
        .iter()
        .map(|feature| {
            let name = feature.name.as_deref().unwrap_or("(adsız)");
            let swatch = Span::styled("■ ", Style::default().fg(hex_to_color(&feature.fill_color)));
            let line = Line::from(vec![
                swatch,
                Span::raw(format!("{name}  ")),
                Span::styled(
                    feature.fill_color.clone(),
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ]);
            ListItem::new(line)
        })
        .collect::<Vec<ListItem<'_>>>();

    let title = format!("Map – {source_name} ({} districts)", layer.features.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn draw_upload_form(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // district list
            Constraint::Length(3), // file path input
            Constraint::Length(3), // last result
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [districts_area, input_area, result_area] = chunks else {
        return;
    };

    let attributes = app.service.attribute_map();
    let items = if app.selection.is_empty() {
        vec![ListItem::new(
            "No districts resolved yet. Refresh the map first.",
        )]
    } else {
        app.selection
            .iter()
            .map(|district| {
                let color = attributes.color_for(district);
                let line = Line::from(vec![
                    Span::styled("■ ", Style::default().fg(hex_to_color(color))),
                    Span::raw(district.clone()),
                ]);
                ListItem::new(line)
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Target district (↑/↓)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.selection.is_empty() {
        state.select(Some(app.district_list_index));
    }
    frame.render_stateful_widget(list, *districts_area, &mut state);

    let input = Paragraph::new(app.file_input.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Measurement CSV path (Enter to submit)"),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(input, *input_area);

    let result = Paragraph::new(app.upload_status.as_deref().unwrap_or(""))
        .block(Block::default().borders(Borders::ALL).title("Last upload"))
        .wrap(Wrap { trim: true });
    frame.render_widget(result, *result_area);
}

/// Parse a `#rrggbb` string into a terminal color, gray when unreadable.
fn hex_to_color(hex: &str) -> Color {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return Color::Gray;
    }

    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    };

    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(red), Some(green), Some(blue)) => Color::Rgb(red, green, blue),
        _ => Color::Gray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_become_rgb() {
        assert_eq!(hex_to_color("#ff0000"), Color::Rgb(255, 0, 0));
        assert_eq!(hex_to_color("0000FF"), Color::Rgb(0, 0, 255));
    }

    #[test]
    fn unreadable_colors_fall_back_to_gray() {
        assert_eq!(hex_to_color("kırmızı"), Color::Gray);
        assert_eq!(hex_to_color("#ff00"), Color::Gray);
    }
}

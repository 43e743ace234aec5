use crate::tui::app::{App, LayoutRefs};
use crate::tui::colors;
use crate::tui::dialog::DetailsDialog;
use crate::widget::LoadState;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

const PLACEHOLDER: &str = "Type to search...";
const CLOSE_LABEL: &str = " [ Close ] ";

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Length(3), // Search bar
            Constraint::Min(1),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let mut layout = LayoutRefs {
        root: chunks[1],
        ..LayoutRefs::default()
    };

    draw_title_bar(frame, chunks[0]);
    draw_search_bar(frame, app, chunks[1]);
    draw_body(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    if app.widget.is_visible() {
        let dropdown = dropdown_area(chunks[1], chunks[2], app.widget.result_rows().len());
        layout.rows = draw_dropdown(frame, app, dropdown);
        layout.root = layout.root.union(dropdown);
    }

    if let Some(dialog) = &app.dialog {
        layout.close_button = Some(draw_details_dialog(frame, dialog, area));
    } else {
        // Border (1) + padding (1)
        let cursor_x = chunks[1].x + 2 + app.search.cursor_column(app.widget.query());
        let cursor_x = cursor_x.min(chunks[1].right().saturating_sub(2));
        frame.set_cursor_position(Position::new(cursor_x, chunks[1].y + 1));
    }

    app.layout = layout;
}

fn draw_title_bar(frame: &mut Frame, area: Rect) {
    let title = format!(" PodSearch v{} ", crate::VERSION);
    let line = Line::from(vec![Span::styled(
        format!("{:width$}", title, width = area.width as usize),
        Style::default()
            .fg(Color::White)
            .bg(colors::PANEL_BG)
            .add_modifier(Modifier::BOLD),
    )]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.dialog.is_none() {
        Style::default().fg(colors::ACCENT)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Search ");

    let query = app.widget.query();
    let paragraph = if query.is_empty() {
        Paragraph::new(format!(" {}", PLACEHOLDER)).style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(format!(" {}", query)).style(Style::default().fg(Color::White))
    };

    frame.render_widget(paragraph.block(block), area);
}

fn draw_body(frame: &mut Frame, app: &App, area: Rect) {
    let text = match app.widget.load_state() {
        LoadState::Loading => format!(" Loading shows from {} ...", app.endpoint),
        LoadState::Ready { shows } => format!(" {} shows indexed. Start typing to search.", shows),
        LoadState::Failed { message, .. } => format!(" Search unavailable: {}", message),
    };
    let style = match app.widget.load_state() {
        LoadState::Failed { .. } => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::DarkGray),
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

/// Dropdown rectangle directly under the search bar
fn dropdown_area(search: Rect, body: Rect, rows: usize) -> Rect {
    // At least one line for the empty-result message, plus borders.
    let wanted = rows.max(1) as u16 + 2;
    let height = wanted.min(body.height);
    Rect::new(search.x, body.y, search.width, height)
}

/// Draw the open dropdown and return the screen rectangle of each visible row
fn draw_dropdown(frame: &mut Frame, app: &App, area: Rect) -> Vec<(Rect, usize)> {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
        .border_style(Style::default().fg(colors::ACCENT));
    let inner = block.inner(area);

    let results = app.widget.results();
    if results.is_empty() {
        let paragraph = Paragraph::new(" No matching shows")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return Vec::new();
    }

    let items: Vec<ListItem> = results
        .iter()
        .map(|show| {
            let mut spans = vec![Span::raw(format!(" {}", show.title))];
            if let Some(&genre) = show.genres.first() {
                spans.push(Span::styled(
                    format!("  {}", crate::show::genre_name(genre)),
                    Style::default().fg(colors::color_for_genre(genre)),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .fg(Color::Black)
            .bg(colors::ACCENT)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default().with_selected(app.widget.highlighted());
    frame.render_stateful_widget(list, area, &mut state);

    let offset = state.offset();
    let visible = (inner.height as usize).min(results.len().saturating_sub(offset));
    (0..visible)
        .map(|i| {
            (
                Rect::new(inner.x, inner.y + i as u16, inner.width, 1),
                offset + i,
            )
        })
        .collect()
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = match app.widget.load_state() {
        LoadState::Loading => " \u{23F3} Loading catalog...".to_string(),
        LoadState::Ready { .. } if app.widget.is_visible() => {
            format!(" {} results", app.widget.result_rows().len())
        }
        LoadState::Ready { shows } => format!(" {} shows", shows),
        LoadState::Failed { message, .. } => format!(" Error: {}", message),
    };

    let right_text = if app.dialog.is_some() {
        " \u{2191}\u{2193}:Scroll  Esc:Close  Ctrl+Q:Quit "
    } else {
        " \u{2191}\u{2193}:Move  Enter:Open  Esc:Hide/Clear  Ctrl+Q:Quit "
    };

    let available_width = area.width as usize;
    let left_len = left_text.chars().count();
    let right_len = right_text.chars().count();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left_text, "", right_text, padding = padding)
    } else {
        format!("{:width$}", left_text, width = available_width)
    };

    let bg = match app.widget.load_state() {
        LoadState::Failed { .. } => Color::Red,
        _ => colors::STATUS_BG,
    };
    let status = Paragraph::new(status_str).style(Style::default().fg(Color::White).bg(bg));
    frame.render_widget(status, area);
}

/// Helper to create a centered popup area
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Draw the details dialog and return the close button rectangle
fn draw_details_dialog(frame: &mut Frame, dialog: &DetailsDialog, area: Rect) -> Rect {
    let width = 70.min(area.width.saturating_sub(4));
    let height = 20.min(area.height.saturating_sub(2));
    let popup_area = centered_rect(width, height, area);

    frame.render_widget(Clear, popup_area);

    let title = format!(" {} ", dialog.show.title);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::ACCENT))
        .title(title)
        .title_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let fields = dialog.fields();
    let label_w = fields.iter().map(|(l, _)| l.len()).max().unwrap_or(0);

    let mut lines: Vec<Line> = fields
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(
                    format!("{:>width$}: ", label, width = label_w),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(value, Style::default().fg(Color::White)),
            ])
        })
        .collect();

    if let Some(description) = &dialog.show.description {
        lines.push(Line::raw(""));
        lines.push(Line::raw(description.clone()));
    }

    let body_area = Rect::new(
        inner.x + 1,
        inner.y,
        inner.width.saturating_sub(2),
        inner.height.saturating_sub(1),
    );
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .scroll((dialog.scroll, 0)),
        body_area,
    );

    let button_w = CLOSE_LABEL.len() as u16;
    let button = Rect::new(
        inner.x + inner.width.saturating_sub(button_w) / 2,
        inner.bottom().saturating_sub(1),
        button_w.min(inner.width),
        1,
    );
    frame.render_widget(
        Paragraph::new(CLOSE_LABEL).style(
            Style::default()
                .fg(Color::Black)
                .bg(colors::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        button,
    );
    button
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BgMessage;
    use crate::{AppConfig, Show};
    use ratatui::backend::TestBackend;
    use std::time::{Duration, Instant};

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn app_with(shows: Vec<Show>) -> App {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut app = App::with_receiver(&AppConfig::default(), rx);
        tx.send(BgMessage::CatalogLoaded(shows)).unwrap();
        app.process_messages();
        app
    }

    #[test]
    fn test_dropdown_rows_recorded() {
        let mut app = app_with(vec![Show::new("1", "The Daily"), Show::new("2", "Daily Wire")]);
        let t0 = Instant::now();
        app.widget.handle_input("Dail", t0);
        app.widget.tick(t0 + Duration::from_millis(100));

        let screen = render(&mut app);
        assert!(screen.contains("The Daily"));
        assert!(screen.contains("Daily Wire"));
        assert_eq!(app.layout.rows.len(), 2);
        assert_eq!(app.layout.rows[1].1, 1);
        assert!(app.layout.root.contains(app.layout.rows[0].0.as_position()));
    }

    #[test]
    fn test_empty_dropdown_message() {
        let mut app = app_with(vec![Show::new("1", "The Daily")]);
        let t0 = Instant::now();
        app.widget.handle_input("zzz", t0);
        app.widget.tick(t0 + Duration::from_millis(100));

        let screen = render(&mut app);
        assert!(screen.contains("No matching shows"));
        assert!(app.layout.rows.is_empty());
    }

    #[test]
    fn test_failed_state_visible() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut app = App::with_receiver(&AppConfig::default(), rx);
        tx.send(BgMessage::CatalogFailed(crate::PodSearchError::Fetch { status: 500 }))
            .unwrap();
        app.process_messages();

        let screen = render(&mut app);
        assert!(screen.contains("HTTP 500"));
    }

    #[test]
    fn test_placeholder_when_empty() {
        let mut app = app_with(vec![]);
        let screen = render(&mut app);
        assert!(screen.contains(PLACEHOLDER));
        assert!(app.layout.close_button.is_none());
    }
}

use std::time::Instant;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::board::ListId;
use crate::config::Theme;
use crate::render::{Affordance, CardView, ListView};

use super::app::{AppState, DeleteConfirmState, HistoryState, StatusKind};
use super::editor::{EditorFieldId, EditorKind, EditorState};

const CARD_PREFIX_WIDTH: usize = 2;

#[derive(Clone, Copy)]
struct Palette {
    text: Color,
    muted: Color,
    accent: Color,
    border: Color,
    selected_bg: Color,
    drop_target: Color,
    info: Color,
    error: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            text: Color::Rgb(234, 236, 239),
            muted: Color::Rgb(118, 124, 130),
            accent: Color::Rgb(122, 170, 255),
            border: Color::Rgb(92, 126, 166),
            selected_bg: Color::Rgb(52, 56, 60),
            drop_target: Color::Rgb(126, 210, 146),
            info: Color::Rgb(244, 200, 98),
            error: Color::Rgb(255, 107, 107),
        },
        Theme::Light => Palette {
            text: Color::Rgb(33, 37, 41),
            muted: Color::Rgb(108, 117, 125),
            accent: Color::Rgb(13, 110, 253),
            border: Color::Rgb(173, 181, 189),
            selected_bg: Color::Rgb(222, 226, 230),
            drop_target: Color::Rgb(25, 135, 84),
            info: Color::Rgb(176, 120, 0),
            error: Color::Rgb(220, 53, 69),
        },
    }
}

pub fn render(frame: &mut Frame, app: &AppState, now: Instant) {
    let area = frame.size();
    let colors = palette(app.theme);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ]
            .as_ref(),
        )
        .split(chunks[0]);
    for (list, column) in app.view.lists.iter().zip(columns.iter()) {
        render_column(frame, app, list, *column, colors);
    }

    render_footer(frame, app, chunks[1], colors, now);

    if let Some(editor) = app.editor.as_ref() {
        render_editor_modal(frame, area, editor, colors);
    }
    if let Some(history) = app.history.as_ref() {
        render_history_modal(frame, area, history, colors);
    }
    if let Some(state) = app.delete_confirm.as_ref() {
        render_delete_confirm_modal(frame, area, state, colors);
    }
}

fn render_column(frame: &mut Frame, app: &AppState, list: &ListView, area: Rect, colors: Palette) {
    let focused = list.id == app.cursor.list && !app.drag.is_dragging();
    let hovered = app.drag.hovered() == Some(list.id);

    let border_style = if hovered {
        Style::default()
            .fg(colors.drop_target)
            .add_modifier(Modifier::BOLD)
    } else if focused {
        Style::default().fg(colors.accent)
    } else {
        Style::default().fg(colors.border)
    };
    let title = if hovered {
        format!(" {} ({}) - drop here ", list.title, list.cards.len())
    } else {
        format!(" {} ({}) ", list.title, list.cards.len())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(title, border_style));

    let inner_height = area.height.saturating_sub(2) as usize;
    let inner_width = area.width.saturating_sub(2) as usize;
    let selected = (list.id == app.cursor.list).then_some(app.cursor.card);
    let (start, end) = list_window(list.cards.len(), selected, inner_height);

    let mut lines: Vec<Line<'static>> = Vec::new();
    if list.cards.is_empty() {
        lines.push(Line::from(Span::styled(
            "(empty)",
            Style::default().fg(colors.muted),
        )));
    }
    for (index, card) in list.cards.iter().enumerate().take(end).skip(start) {
        let is_selected = selected == Some(index);
        let is_dragged = app.drag.dragged_task() == Some(card.task_id.as_str());
        lines.push(render_card(card, is_selected, is_dragged, focused, inner_width, colors));
    }

    let widget = Paragraph::new(lines).block(block);
    frame.render_widget(widget, area);
}

fn render_card(
    card: &CardView,
    selected: bool,
    dragged: bool,
    focused: bool,
    width: usize,
    colors: Palette,
) -> Line<'static> {
    let prefix = if dragged { "» " } else { "  " };
    let hints = if selected && focused {
        affordance_hints(&card.affordances)
    } else {
        String::new()
    };
    let text_width = width
        .saturating_sub(CARD_PREFIX_WIDTH)
        .saturating_sub(hints.chars().count());

    let mut text_style = Style::default().fg(colors.text);
    if dragged {
        text_style = text_style.fg(colors.drop_target).add_modifier(Modifier::ITALIC);
    }
    if selected {
        text_style = text_style.bg(colors.selected_bg).add_modifier(Modifier::BOLD);
    }

    let mut spans = vec![
        Span::styled(prefix, Style::default().fg(colors.drop_target)),
        Span::styled(pad_text(&truncate_text(&card.text, text_width), text_width), text_style),
    ];
    if !hints.is_empty() {
        spans.push(Span::styled(hints, Style::default().fg(colors.muted)));
    }
    Line::from(spans)
}

fn affordance_hints(affordances: &[Affordance]) -> String {
    affordances
        .iter()
        .map(|affordance| match affordance {
            Affordance::History => " H",
            Affordance::Delete => " d",
            Affordance::Edit => " e",
        })
        .collect()
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect, colors: Palette, now: Instant) {
    let hint_span = Span::styled(app.footer_hint(), Style::default().fg(colors.muted));
    let line = if let Some((status, kind)) = app.status_line(now) {
        let status_style = match kind {
            StatusKind::Error => Style::default()
                .fg(colors.error)
                .add_modifier(Modifier::BOLD),
            StatusKind::Info => Style::default()
                .fg(colors.info)
                .add_modifier(Modifier::BOLD),
        };
        Line::from(vec![
            hint_span,
            Span::raw("  |  "),
            Span::styled(status, status_style),
        ])
    } else {
        Line::from(hint_span)
    };
    let counts_line = Line::from(Span::styled(
        app.analytics.summary(),
        Style::default().fg(colors.accent),
    ));
    let widget = Paragraph::new(vec![line, counts_line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(colors.border)),
        );
    frame.render_widget(widget, area);
}

fn render_editor_modal(frame: &mut Frame, area: Rect, editor: &EditorState, colors: Palette) {
    let content_width = area.width.saturating_sub(8).min(64);
    let height = match editor.kind() {
        EditorKind::NewTask => 6,
        EditorKind::EditTask => 4,
    };
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let value_width = (content_width as usize).saturating_sub(10);
    let text_active = editor.active() == EditorFieldId::Text;
    let mut text_spans = vec![Span::styled("Text  ", Style::default().fg(colors.muted))];
    text_spans.extend(value_with_caret_spans(
        editor.text(),
        value_width,
        text_active,
        Style::default().fg(colors.text),
    ));
    let mut lines = vec![Line::from(text_spans)];

    if editor.kind() == EditorKind::NewTask {
        lines.push(Line::from(""));
        let mut list_spans = vec![Span::styled("List  ", Style::default().fg(colors.muted))];
        for list in ListId::ALL {
            let mut style = Style::default().fg(colors.muted);
            if list == editor.list() {
                style = style.fg(colors.accent).add_modifier(Modifier::BOLD);
                if editor.active() == EditorFieldId::List {
                    style = style.add_modifier(Modifier::REVERSED);
                }
            }
            list_spans.push(Span::styled(format!(" {} ", list.title()), style));
        }
        lines.push(Line::from(list_spans));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.accent))
            .title(editor.title()),
    );
    frame.render_widget(widget, modal);
}

fn render_history_modal(frame: &mut Frame, area: Rect, state: &HistoryState, colors: Palette) {
    let content_width = area.width.saturating_sub(8).min(72);
    let entries = state.lines.len().max(1) as u16;
    let height = (entries + 4).min(area.height.saturating_sub(4));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let inner_width = (content_width as usize).saturating_sub(2);
    let rows = (modal.height as usize).saturating_sub(4);
    let (start, end) = history_window(state.lines.len(), rows, state.scroll);
    let mut lines: Vec<Line<'static>> = vec![
        Line::from(Span::styled(
            truncate_text(&state.text, inner_width),
            Style::default()
                .fg(colors.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if state.lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "no history",
            Style::default().fg(colors.muted),
        )));
    }
    for entry in &state.lines[start..end] {
        lines.push(Line::from(Span::styled(
            truncate_text(entry, inner_width),
            Style::default().fg(colors.text),
        )));
    }

    let title = if end - start < state.lines.len() {
        format!(
            "History {} ({}-{} of {})",
            state.task_id,
            start + 1,
            end,
            state.lines.len()
        )
    } else {
        format!("History {}", state.task_id)
    };
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.accent))
            .title(title),
    );
    frame.render_widget(widget, modal);
}

fn render_delete_confirm_modal(
    frame: &mut Frame,
    area: Rect,
    state: &DeleteConfirmState,
    colors: Palette,
) {
    let content_width = area.width.saturating_sub(8).min(64);
    let height = 8u16.min(area.height.saturating_sub(4));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let text_width = (content_width as usize).saturating_sub(10);
    let lines: Vec<Line<'static>> = vec![
        Line::from(Span::styled(
            "Delete task?",
            Style::default()
                .fg(colors.error)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Task: ", Style::default().fg(colors.muted)),
            Span::styled(
                truncate_text(&state.text, text_width),
                Style::default().fg(colors.text),
            ),
        ]),
        Line::from(Span::styled(
            "Its history goes with it.",
            Style::default().fg(colors.info),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "y confirm  esc cancel",
            Style::default().fg(colors.muted),
        )),
    ];

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Delete Task"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

/// Tail of `value` that fits `width`, with a block caret at the end.
fn value_with_caret_spans(
    value: &str,
    width: usize,
    active: bool,
    style: Style,
) -> Vec<Span<'static>> {
    if width == 0 {
        return vec![Span::raw("")];
    }
    let chars: Vec<char> = value.chars().collect();
    let available = if active { width.saturating_sub(1) } else { width };
    let start = chars.len().saturating_sub(available);
    let text: String = chars[start..].iter().collect();

    let mut spans = Vec::new();
    if !text.is_empty() {
        spans.push(Span::styled(text, style));
    }
    if active {
        spans.push(Span::styled(
            " ".to_string(),
            style.add_modifier(Modifier::REVERSED),
        ));
    }
    spans
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn list_window(total: usize, selected: Option<usize>, height: usize) -> (usize, usize) {
    if total == 0 || height == 0 {
        return (0, 0);
    }
    if total <= height {
        return (0, total);
    }
    let selected = selected.unwrap_or(0);
    let mut start = selected.saturating_sub(height / 2);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

/// Entries shown when `rows` fit and the view sits `scroll` entries above
/// the newest one.
fn history_window(total: usize, rows: usize, scroll: usize) -> (usize, usize) {
    if total == 0 || rows == 0 {
        return (0, 0);
    }
    let end = total - scroll.min(total.saturating_sub(rows));
    (end.saturating_sub(rows), end)
}

fn pad_text(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    format!("{value}{}", " ".repeat(width - len))
}

fn truncate_text(value: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return chars[..max].iter().collect();
    }
    let mut out: String = chars[..(max - 3)].iter().collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::CARD_AFFORDANCES;

    #[test]
    fn list_window_keeps_selection_visible() {
        assert_eq!(list_window(0, None, 5), (0, 0));
        assert_eq!(list_window(3, Some(2), 5), (0, 3));
        assert_eq!(list_window(10, Some(9), 4), (6, 10));
        assert_eq!(list_window(10, Some(5), 4), (3, 7));
    }

    #[test]
    fn history_window_starts_at_newest_entries() {
        assert_eq!(history_window(0, 5, 0), (0, 0));
        assert_eq!(history_window(3, 5, 0), (0, 3));
        assert_eq!(history_window(3, 5, 2), (0, 3));
        assert_eq!(history_window(40, 10, 0), (30, 40));
        assert_eq!(history_window(40, 10, 5), (25, 35));
        assert_eq!(history_window(40, 10, 99), (0, 10));
    }

    #[test]
    fn truncate_text_marks_cut() {
        assert_eq!(truncate_text("Buy oat milk", 8), "Buy o...");
        assert_eq!(truncate_text("short", 8), "short");
        assert_eq!(truncate_text("abc", 0), "");
    }

    #[test]
    fn affordance_hints_follow_card_order() {
        assert_eq!(affordance_hints(&CARD_AFFORDANCES), " H d e");
    }

    #[test]
    fn caret_shows_tail_of_long_text() {
        let spans = value_with_caret_spans("abcdefgh", 4, true, Style::default());
        assert_eq!(spans[0].content, "fgh");
        assert_eq!(spans[1].content, " ");
    }
}

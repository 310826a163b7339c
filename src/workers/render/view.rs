use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::{
    features::scope::{
        dialog::ChangeConfirmDialog,
        selector::{InputFocus, ScopeSelector, SelectorState},
    },
    notification::NotificationSeverity,
    scope::ScopeQuery,
};

use super::action::RenderState;

const KEY_HINTS: &str = "s:select  enter:open  o:overview  esc:dismiss  q:quit";

/// Popup area as percentages of the parent area.
struct PopupChunkSize {
    width: u16,
    height: u16,
}

impl PopupChunkSize {
    fn chunk(&self, parent: Rect) -> Rect {
        let margin_y = (100 - self.height) / 2;
        let margin_x = (100 - self.width) / 2;

        let chunk = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(margin_y),
                Constraint::Percentage(self.height),
                Constraint::Percentage(margin_y),
            ])
            .split(parent);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(margin_x),
                Constraint::Percentage(self.width),
                Constraint::Percentage(margin_x),
            ])
            .split(chunk[1])[1]
    }
}

pub fn draw(f: &mut Frame, state: &RenderState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, chunks[0], state);
    draw_body(f, chunks[1], state);
    draw_status(f, chunks[2], state);

    if state.selector.is_opened() {
        draw_selector(f, chunks[1], &state.selector);
    }

    if let Some(dialog) = state.selector.dialog() {
        draw_dialog(f, f.area(), dialog);
    }
}

fn draw_header(f: &mut Frame, chunk: Rect, state: &RenderState) {
    let selector = &state.selector;

    let line = Line::from(vec![
        Span::styled(
            format!("{}: ", selector.kind().title()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            selector.format(state.ctx.scope.current()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(
            state.ctx.router.url().to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let block = Block::default().borders(Borders::ALL).title("kubescope");

    f.render_widget(Paragraph::new(line).block(block), chunk);
}

fn draw_body(f: &mut Frame, chunk: Rect, state: &RenderState) {
    let selector = &state.selector;
    let query = ScopeQuery::from_selection(state.ctx.scope.current());

    let items: Vec<ListItem> = selector
        .scopes()
        .iter()
        .map(|scope| {
            if query.matches(scope) {
                ListItem::new(format!("* {}", scope)).style(Style::default().fg(Color::Green))
            } else {
                ListItem::new(format!("  {}", scope))
            }
        })
        .collect();

    let mut title = format!("{}s", selector.kind().title());
    if let SelectorState::FetchingList { .. } = selector.state() {
        title.push_str(" (loading)");
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut list_state = ListState::default().with_selected(Some(state.body_cursor()));

    f.render_stateful_widget(list, chunk, &mut list_state);
}

fn draw_status(f: &mut Frame, chunk: Rect, state: &RenderState) {
    let line = match state.ctx.notifications.latest() {
        Some(n) => {
            let color = match n.severity {
                NotificationSeverity::Info => Color::Reset,
                NotificationSeverity::Warning => Color::Yellow,
                NotificationSeverity::Error => Color::Red,
            };

            Line::styled(format!("[{}] {}", n.severity, n.message), Style::default().fg(color))
        }
        None => Line::styled(KEY_HINTS, Style::default().fg(Color::DarkGray)),
    };

    f.render_widget(Paragraph::new(line), chunk);
}

fn draw_selector(f: &mut Frame, parent: Rect, selector: &ScopeSelector) {
    let chunk = PopupChunkSize {
        width: 60,
        height: 80,
    }
    .chunk(parent);

    f.render_widget(Clear, chunk);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Select {}", selector.kind().title().to_lowercase()));

    let inner = block.inner(chunk);
    f.render_widget(block, chunk);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let cursor = if selector.focus() == InputFocus::Focused {
        "_"
    } else {
        ""
    };

    f.render_widget(
        Paragraph::new(format!("> {}{}", selector.input(), cursor)),
        chunks[0],
    );

    let items: Vec<ListItem> = selector
        .filtered_scopes()
        .iter()
        .map(|scope| ListItem::new(selector.format(scope)))
        .collect();

    let list = List::new(items).highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut list_state = ListState::default().with_selected(Some(selector.cursor()));

    f.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn draw_dialog(f: &mut Frame, parent: Rect, dialog: &ChangeConfirmDialog) {
    let chunk = PopupChunkSize {
        width: 50,
        height: 30,
    }
    .chunk(parent);

    f.render_widget(Clear, chunk);

    let paragraph = Paragraph::new(dialog.message())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(dialog.title()));

    f.render_widget(paragraph, chunk);
}

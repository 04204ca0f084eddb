use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};
use tui_dispatch::{EventKind, EventOutcome, RenderContext};

use crate::action::Action;
use crate::extract::HEADER_TEXT;
use crate::highlight::{TaggedEntry, Tier};
use crate::roster::{Side, MATCHUP_CAPACITY, TEAM_CAPACITY};
use crate::state::{AppState, FormKind, FormState, Overlay, Pane, Screen, StatusKind};

const BG_BASE: Color = Color::Rgb(20, 22, 28);
const BG_PANEL: Color = Color::Rgb(30, 33, 40);
const TEXT_MAIN: Color = Color::Rgb(228, 230, 236);
const TEXT_DIM: Color = Color::Rgb(150, 154, 166);
const BORDER: Color = Color::Rgb(70, 76, 92);
const BORDER_FOCUS: Color = Color::Rgb(126, 200, 180);
const ACCENT_GREEN: Color = Color::Rgb(104, 204, 120);
const ACCENT_BLUE: Color = Color::Rgb(110, 160, 230);
const ACCENT_RED: Color = Color::Rgb(214, 96, 96);

// Tier row colours
const TIER_DIRECT_BG: Color = Color::Rgb(120, 40, 44);
const TIER_CONFLICT_BG: Color = Color::Rgb(112, 92, 30);
const CROSS_FLAG_FG: Color = Color::Rgb(200, 170, 230);

const MATCHUP_HEADER: [&str; 8] = ["Dex", "Type2", "Type1", "P1", "P2", "Type1", "Type2", "Dex"];

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, _ctx: RenderContext) {
    render_app(frame, area, state);
}

/// Draw the whole application; `render` without the runtime context.
pub fn render_app(frame: &mut Frame, area: Rect, state: &AppState) {
    frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, layout[0], state);
    match state.screen {
        Screen::Teams => render_teams(frame, layout[1], state),
        Screen::Contacts => render_contacts(frame, layout[1], state),
    }
    render_status(frame, layout[2], state);
    render_hints(frame, layout[3], state);

    match &state.overlay {
        Overlay::None => {}
        Overlay::Form(form) => render_form(frame, area, form),
        Overlay::Confirm(kind) => render_confirm(frame, area, kind.prompt()),
        Overlay::Search => render_search(frame, area, &state.contact_query),
    }
}

fn panel_block(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused { BORDER_FOCUS } else { BORDER }))
        .style(Style::default().bg(BG_PANEL))
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let screen = match state.screen {
        Screen::Teams => "Teams",
        Screen::Contacts => "Contacts",
    };
    let line = Line::from(vec![
        Span::styled(
            "LYNLOCKE",
            Style::default().fg(BORDER_FOCUS).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {screen}  "), Style::default().fg(TEXT_DIM)),
        Span::styled("Rule mode: ", Style::default().fg(TEXT_DIM)),
        Span::styled(
            state.session.mode.label(),
            Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(BORDER));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_teams(frame: &mut Frame, area: Rect, state: &AppState) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .split(area);

    render_team(frame, panes[0], state, Side::A);
    render_matchups(frame, panes[1], state);
    render_team(frame, panes[2], state, Side::B);
}

fn tier_style(tagged: &TaggedEntry) -> Style {
    match tagged.tier {
        Tier::DirectMatch => Style::default().fg(TEXT_MAIN).bg(TIER_DIRECT_BG),
        Tier::TypeConflict => Style::default().fg(TEXT_MAIN).bg(TIER_CONFLICT_BG),
        Tier::Neutral if tagged.cross_flag => Style::default()
            .fg(CROSS_FLAG_FG)
            .add_modifier(Modifier::ITALIC),
        Tier::Neutral => Style::default().fg(TEXT_MAIN),
    }
}

fn dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn render_team(frame: &mut Frame, area: Rect, state: &AppState, side: Side) {
    let pane = match side {
        Side::A => Pane::TeamA,
        Side::B => Pane::TeamB,
    };
    let focused = state.screen == Screen::Teams && state.focus == pane;
    let team = state.view.team(side);
    let title = format!("{} ({}/{})", side.label(), team.len(), TEAM_CAPACITY);

    let header = Row::new(
        std::iter::once(Cell::from(" "))
            .chain(HEADER_TEXT.split(" | ").map(Cell::from)),
    )
    .style(Style::default().fg(TEXT_DIM).add_modifier(Modifier::BOLD));

    let selected = state.selected(side);
    let rows = team.iter().enumerate().map(|(index, tagged)| {
        let is_selected = selected == Some(tagged.entry.dex_num.as_str());
        let marker = match (is_selected, tagged.cross_flag) {
            (true, _) => "●",
            (false, true) => "~",
            (false, false) => " ",
        };
        let mut style = tier_style(tagged);
        if is_selected {
            style = style.add_modifier(Modifier::BOLD);
        }
        if focused && index == state.cursor(pane) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Row::new(vec![
            Cell::from(marker),
            Cell::from(tagged.entry.name.clone()),
            Cell::from(tagged.entry.type1.clone()),
            Cell::from(dash(&tagged.entry.type2).to_string()),
            Cell::from(tagged.entry.dex_num.clone()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(1),
        Constraint::Min(8),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(4),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(panel_block(&title, focused));
    frame.render_widget(table, area);
}

fn render_matchups(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.screen == Screen::Teams && state.focus == Pane::Matchups;
    let title = format!(
        "Matchups ({}/{})",
        state.session.matchups.len(),
        MATCHUP_CAPACITY
    );

    let header = Row::new(
        std::iter::once(Cell::from(" ")).chain(MATCHUP_HEADER.iter().map(|h| Cell::from(*h))),
    )
    .style(Style::default().fg(TEXT_DIM).add_modifier(Modifier::BOLD));

    let rows = state
        .session
        .matchups
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let is_selected = state.selected_matchups.contains(&index);
            let mut style = Style::default().fg(TEXT_MAIN);
            if is_selected {
                style = style.add_modifier(Modifier::BOLD);
            }
            if focused && index == state.cursor_matchups {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let marker = if is_selected { "●" } else { " " };
            Row::new(
                std::iter::once(Cell::from(marker))
                    .chain(record.display_cells().into_iter().map(Cell::from)),
            )
            .style(style)
        });

    let widths = [
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Min(6),
        Constraint::Min(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(4),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(panel_block(&title, focused));
    frame.render_widget(table, area);
}

fn render_contacts(frame: &mut Frame, area: Rect, state: &AppState) {
    let visible = state.visible_contacts();
    let title = if state.contact_query.is_empty() {
        format!("Contacts ({})", state.contacts.len())
    } else {
        format!(
            "Contacts - \"{}\" ({} of {})",
            state.contact_query,
            visible.len(),
            state.contacts.len()
        )
    };

    if visible.is_empty() {
        let message = if state.contacts.is_empty() {
            "No contacts yet. Press a to add one."
        } else {
            "No contacts match the search."
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(TEXT_DIM))
            .alignment(Alignment::Center)
            .block(panel_block(&title, true));
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(["Name", "Email", "Phone", "Notes"])
        .style(Style::default().fg(TEXT_DIM).add_modifier(Modifier::BOLD));
    let rows = visible.iter().enumerate().map(|(index, contact)| {
        let mut style = Style::default().fg(TEXT_MAIN);
        if index == state.contact_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Row::new(vec![
            contact.name.clone(),
            contact.email.clone(),
            contact.phone.clone(),
            contact.notes.clone(),
        ])
        .style(style)
    });
    let widths = [
        Constraint::Percentage(25),
        Constraint::Percentage(30),
        Constraint::Percentage(20),
        Constraint::Percentage(25),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(panel_block(&title, true));
    frame.render_widget(table, area);
}

fn render_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(status) = &state.status else {
        return;
    };
    let color = match status.kind {
        StatusKind::Success => ACCENT_GREEN,
        StatusKind::Info => ACCENT_BLUE,
        StatusKind::Error => ACCENT_RED,
    };
    let paragraph = Paragraph::new(Span::styled(
        status.text.clone(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_hints(frame: &mut Frame, area: Rect, state: &AppState) {
    let hints = match (&state.overlay, state.screen) {
        (Overlay::Form(_), _) => "Tab/↑↓ field  Enter submit  Esc cancel",
        (Overlay::Confirm(_), _) => "Enter/y confirm  Esc/n cancel",
        (Overlay::Search, _) => "type to filter  Enter/Esc done",
        (Overlay::None, Screen::Teams) => {
            "Tab pane  ↑↓ move  Space select  n add  m matchup  x unmatch  d delete  t mode  s save  l load  c contacts  q quit"
        }
        (Overlay::None, Screen::Contacts) => {
            "a add  e edit  d delete  / search  r all  X clear  Esc back  q quit"
        }
    };
    let paragraph = Paragraph::new(Span::styled(hints, Style::default().fg(TEXT_DIM)))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn modal(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'_>>, width: u16) {
    let height = lines.len() as u16 + 2;
    let rect = centered_rect(width, height, area);
    frame.render_widget(Clear, rect);
    let paragraph = Paragraph::new(Text::from(lines))
        .block(panel_block(title, true))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, rect);
}

fn render_form(frame: &mut Frame, area: Rect, form: &FormState) {
    let mut lines = Vec::with_capacity(form.fields.len() + 2);
    for (index, field) in form.fields.iter().enumerate() {
        let active = index == form.active;
        let label_style = if active {
            Style::default().fg(BORDER_FOCUS).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_DIM)
        };
        let cursor = if active { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("{:>15}: ", field.label), label_style),
            Span::styled(format!("{}{cursor}", field.value), Style::default().fg(TEXT_MAIN)),
        ]));
    }
    if let FormKind::Player { .. } = form.kind {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "←/→ switch team",
            Style::default().fg(TEXT_DIM),
        )));
    }
    modal(frame, area, &form.title(), lines, 52);
}

fn render_confirm(frame: &mut Frame, area: Rect, prompt: &str) {
    let lines = vec![
        Line::from(Span::styled(prompt, Style::default().fg(TEXT_MAIN))),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] yes   [Esc] no",
            Style::default().fg(TEXT_DIM),
        )),
    ];
    modal(frame, area, "Confirm", lines, 48);
}

fn render_search(frame: &mut Frame, area: Rect, query: &str) {
    let lines = vec![Line::from(vec![
        Span::styled("Search: ", Style::default().fg(TEXT_DIM)),
        Span::styled(format!("{query}_"), Style::default().fg(TEXT_MAIN)),
    ])];
    modal(frame, area, "Search contacts", lines, 44);
}

pub fn handle_event(event: &EventKind, state: &AppState) -> EventOutcome<Action> {
    match event {
        EventKind::Resize(width, height) => {
            EventOutcome::action(Action::UiTerminalResize(*width, *height)).with_render()
        }
        EventKind::Key(key) => match key_action(*key, state) {
            Some(action) => EventOutcome::action(action).with_render(),
            None => EventOutcome::ignored(),
        },
        _ => EventOutcome::ignored(),
    }
}

/// Map a key press to an action for the current screen and overlay.
pub fn key_action(key: KeyEvent, state: &AppState) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match &state.overlay {
        Overlay::Form(form) => form_key(key, form),
        Overlay::Confirm(_) => match key.code {
            KeyCode::Enter | KeyCode::Char('y') => Some(Action::ConfirmAccept),
            KeyCode::Esc | KeyCode::Char('n') => Some(Action::ConfirmCancel),
            _ => None,
        },
        Overlay::Search => match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(Action::ContactSearchClose),
            KeyCode::Backspace => Some(Action::ContactSearchBackspace),
            KeyCode::Char(c) => Some(Action::ContactSearchInput(c)),
            _ => None,
        },
        Overlay::None => match state.screen {
            Screen::Teams => teams_key(key, state),
            Screen::Contacts => contacts_key(key),
        },
    }
}

fn form_key(key: KeyEvent, form: &FormState) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::FormClose),
        KeyCode::Enter => Some(Action::FormSubmit),
        KeyCode::Tab | KeyCode::Down => Some(Action::FormFocusNext),
        KeyCode::BackTab | KeyCode::Up => Some(Action::FormFocusPrev),
        KeyCode::Backspace => Some(Action::FormBackspace),
        KeyCode::Left | KeyCode::Right if matches!(form.kind, FormKind::Player { .. }) => {
            Some(Action::FormToggleSide)
        }
        KeyCode::Char(c) => Some(Action::FormInput(c)),
        _ => None,
    }
}

fn teams_key(key: KeyEvent, state: &AppState) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Tab => Action::FocusNext,
        KeyCode::BackTab => Action::FocusPrev,
        KeyCode::Up | KeyCode::Char('k') => Action::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => Action::CursorDown,
        KeyCode::Char(' ') | KeyCode::Enter => Action::RowSelect,
        KeyCode::Char('n') => Action::PlayerFormOpen(state.focus.side().unwrap_or(Side::A)),
        KeyCode::Char('m') => Action::MatchupAdd,
        KeyCode::Char('x') => Action::MatchupRemoveSelected,
        KeyCode::Char('d') => Action::DeleteRequest,
        KeyCode::Char('t') => Action::ModeToggle,
        KeyCode::Char('s') => Action::SaveTeams,
        KeyCode::Char('l') => Action::LoadTeams,
        KeyCode::Char('c') => Action::ScreenShow(Screen::Contacts),
        KeyCode::Esc => Action::SelectionClear,
        _ => return None,
    };
    Some(action)
}

fn contacts_key(key: KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc => Action::ScreenShow(Screen::Teams),
        KeyCode::Up | KeyCode::Char('k') => Action::ContactCursorUp,
        KeyCode::Down | KeyCode::Char('j') => Action::ContactCursorDown,
        KeyCode::Char('a') => Action::ContactFormOpen { editing: false },
        KeyCode::Char('e') | KeyCode::Enter => Action::ContactFormOpen { editing: true },
        KeyCode::Char('d') => Action::ContactDelete,
        KeyCode::Char('/') => Action::ContactSearchOpen,
        KeyCode::Char('r') => Action::ContactsShowAll,
        KeyCode::Char('X') => Action::ContactsClearAll,
        _ => return None,
    };
    Some(action)
}

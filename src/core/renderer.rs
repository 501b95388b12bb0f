/// Terminal drawing of a session view
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::core::display::{CueKind, CueTarget, Slot};
use crate::core::game::Phase;
use crate::core::session::View;

pub fn render(frame: &mut Frame, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title + score
            Constraint::Length(3), // Word row
            Constraint::Min(3),    // Definition
            Constraint::Length(3), // Input
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    render_title(frame, chunks[0], view);
    render_word(frame, chunks[1], view);

    let definition = Paragraph::new(view.board.definition())
        .block(Block::default().borders(Borders::ALL).title(" Definition "))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White));
    frame.render_widget(definition, chunks[2]);

    render_input(frame, chunks[3], view);

    let footer = Paragraph::new(status_line(view))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(footer, chunks[4]);
}

fn render_title(frame: &mut Frame, area: Rect, view: &View) {
    let style = match view.board.cue(CueTarget::Title) {
        Some(CueKind::Error) => Style::default().fg(Color::White).bg(Color::Red),
        Some(CueKind::Success) => Style::default().fg(Color::Black).bg(Color::Green),
        None => Style::default().fg(Color::Cyan),
    };
    let title = Paragraph::new(format!("WORD REVEAL   score {}   round {}", view.board.score(), view.round))
        .block(Block::default().borders(Borders::ALL))
        .style(style.add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, area);
}

fn render_word(frame: &mut Frame, area: Rect, view: &View) {
    let mut spans = Vec::with_capacity(view.board.slots().len() * 2);
    for (i, slot) in view.board.slots().iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = match slot {
            Slot::Letter(_) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            Slot::Mask(_) => Style::default().fg(Color::DarkGray),
        };
        spans.push(Span::styled(slot.glyph().to_string(), style));
    }

    let word = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Word "))
        .alignment(Alignment::Center);
    frame.render_widget(word, area);
}

fn render_input(frame: &mut Frame, area: Rect, view: &View) {
    let border = match view.board.cue(CueTarget::Input) {
        Some(CueKind::Error) => Style::default().fg(Color::Red),
        Some(CueKind::Success) => Style::default().fg(Color::Green),
        None => Style::default(),
    };
    let input = Paragraph::new(view.input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Guess "),
    );
    frame.render_widget(input, area);

    // inside the border, after the typed text
    let x = area.x + 1 + view.input.char_len().min(area.width.saturating_sub(3) as usize) as u16;
    frame.set_cursor_position((x, area.y + 1));
}

fn status_line(view: &View) -> String {
    let mut parts = vec!["Enter: guess".to_string(), "Esc: quit".to_string()];
    match (view.phase, view.next_reveal_in) {
        (Phase::Revealing, Some(left)) => parts.push(format!("next letter in {}s", left.as_secs() + 1)),
        (Phase::AwaitingFinalGuess, _) => parts.push("no more hints".to_string()),
        _ => {}
    }
    if let Some(word) = view.last_word {
        parts.push(format!("last: {word}"));
    }
    parts.join(" | ")
}

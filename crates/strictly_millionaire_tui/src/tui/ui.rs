//! Stateless rendering of the quiz screens.

use super::app::App;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use strictly_millionaire::{
    Answer, AudiencePoll, EndReason, LifelineKind, Phase, Prize, SessionView,
};
use strum::IntoEnumIterator;

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(12),   // Body
            Constraint::Length(3), // Status
        ])
        .split(area);

    let title = Paragraph::new("Strictly Millionaire")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    match app.view() {
        Some(view) if view.phase.in_round() => draw_round(frame, chunks[1], view),
        Some(view) if view.phase.is_terminal() => draw_end(frame, chunks[1], view),
        view => draw_menu(frame, chunks[1], view),
    }

    draw_status(frame, chunks[2], app);
}

fn draw_menu(frame: &mut Frame, area: Rect, view: Option<&SessionView>) {
    let mut lines = vec![
        Line::from(""),
        Line::from("Answer every question to win the top prize."),
        Line::from(""),
    ];
    if let Some(view) = view {
        lines.push(Line::from(format!(
            "{} questions, {} seconds each",
            view.question_count, view.time_budget
        )));
        if let Some(top) = view.prizes.last() {
            lines.push(Line::from(format!("Top prize: {}", format_prize(*top))));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Press Enter to play, q to exit",
        Style::default().fg(Color::Yellow),
    )));

    let menu = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Menu"));
    frame.render_widget(menu, area);
}

fn draw_round(frame: &mut Frame, area: Rect, view: &SessionView) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(26)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Question
            Constraint::Length(6), // Answers
            Constraint::Min(4),    // Lifelines
        ])
        .split(columns[0]);

    draw_question(frame, left[0], view);
    draw_answers(frame, left[1], view);
    draw_lifelines(frame, left[2], view);
    draw_ladder(frame, columns[1], view);
}

fn draw_question(frame: &mut Frame, area: Rect, view: &SessionView) {
    let Some(question) = &view.question else {
        return;
    };
    let title = format!(
        "Question {} of {} for {}",
        view.question_index + 1,
        view.question_count,
        format_prize(view.current_prize)
    );
    let paragraph = Paragraph::new(question.prompt.as_str())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

fn draw_answers(frame: &mut Frame, area: Rect, view: &SessionView) {
    let Some(question) = &view.question else {
        return;
    };
    let lines: Vec<Line> = Answer::iter()
        .map(|answer| {
            let text = if view.is_eliminated(answer) {
                String::new()
            } else {
                question.answer_text(answer).to_string()
            };
            Line::from(Span::styled(
                format!("{}: {}", answer, text),
                answer_style(view, answer),
            ))
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Answers"));
    frame.render_widget(paragraph, area);
}

fn answer_style(view: &SessionView, answer: Answer) -> Style {
    if view.is_eliminated(answer) {
        return Style::default().fg(Color::DarkGray);
    }
    if view.correct == Some(answer) {
        return Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    }
    if view.selected == Some(answer) {
        return Style::default().fg(Color::Black).bg(Color::Yellow);
    }
    Style::default()
}

fn draw_lifelines(frame: &mut Frame, area: Rect, view: &SessionView) {
    let mut spans = Vec::new();
    for (key, kind) in LifelineKind::iter().enumerate() {
        let style = if view.lifeline_available(kind) {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
        };
        spans.push(Span::styled(format!("[{}] {}", key + 1, kind), style));
        spans.push(Span::raw("  "));
    }

    let mut lines = vec![Line::from(spans)];
    if let Some(friend) = view.friend_suggestion {
        lines.push(Line::from(format!("Friend: \"I'd go with {}\"", friend)));
    }
    if let Some(poll) = &view.audience {
        lines.extend(poll_lines(poll));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Lifelines"));
    frame.render_widget(paragraph, area);
}

fn poll_lines(poll: &AudiencePoll) -> Vec<Line<'static>> {
    const WIDTH: f64 = 20.0;
    Answer::iter()
        .map(|answer| {
            let percentage = poll.percentage(answer);
            let bar = "#".repeat((percentage / 100.0 * WIDTH).round() as usize);
            Line::from(vec![
                Span::raw(format!("{} ", answer)),
                Span::styled(format!("{:<20}", bar), Style::default().fg(Color::Magenta)),
                Span::raw(format!(" {:>3.0}%", percentage)),
            ])
        })
        .collect()
}

fn draw_ladder(frame: &mut Frame, area: Rect, view: &SessionView) {
    let lines: Vec<Line> = view
        .prizes
        .iter()
        .take(view.question_count)
        .enumerate()
        .rev()
        .map(|(index, prize)| {
            let marker = if index == view.question_index { ">" } else { " " };
            let style = if index == view.question_index {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else if view.safe_havens.contains(prize) {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if index < view.question_index {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::from(Span::styled(
                format!("{}{:>2} {:>12}", marker, index + 1, format_prize(*prize)),
                style,
            ))
        })
        .collect();

    let title = match view.prizes.last() {
        Some(top) => format!("Ladder (top {})", format_prize(*top)),
        None => "Ladder".to_string(),
    };
    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

fn draw_end(frame: &mut Frame, area: Rect, view: &SessionView) {
    let (headline, color) = match view.phase {
        Phase::Won => ("Millionaire!", Color::Green),
        _ => ("Game over", Color::Red),
    };
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            headline,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if let Some(outcome) = view.outcome {
        let reason = match outcome.reason {
            EndReason::WrongAnswer => "Wrong answer.",
            EndReason::TimeExpired => "Time ran out.",
            EndReason::Quit => "You walked away.",
            EndReason::Won => "You answered every question.",
        };
        lines.push(Line::from(reason));
        lines.push(Line::from(format!(
            "Questions answered: {}",
            outcome.questions_answered
        )));
        lines.push(Line::from(format!("You take home {}", format_prize(outcome.prize))));
    }
    if let (Some(question), Some(correct)) = (&view.question, view.correct) {
        if view.phase == Phase::GameOver {
            lines.push(Line::from(""));
            lines.push(Line::from(format!(
                "The answer was {}: {}",
                correct,
                question.answer_text(correct)
            )));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Enter for the menu, q to exit",
        Style::default().fg(Color::Yellow),
    )));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let text = if app.confirming_quit() {
        let keep = app.view().map(|v| v.guaranteed_prize).unwrap_or(0);
        format!("Walk away with {}? (y/n)", format_prize(keep))
    } else {
        let mut parts = Vec::new();
        if let Some(view) = app.view().filter(|v| v.phase.in_round()) {
            let clock = if view.paused { "paused" } else { "" };
            parts.push(format!("{:>2}s {}", view.time_remaining, clock).trim_end().to_string());
        }
        if let Some(notice) = app.notice() {
            parts.push(notice.to_string());
        }
        if app.phase() == Phase::Playing {
            parts.push("a-d answer  1-3 lifeline  p pause  r reveal  x walk away".to_string());
        }
        parts.join("  |  ")
    };

    let status = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}

/// Formats a prize with thousands separators.
pub fn format_prize(prize: Prize) -> String {
    let digits = prize.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_prize() {
        assert_eq!(format_prize(0), "0");
        assert_eq!(format_prize(500), "500");
        assert_eq!(format_prize(1000), "1,000");
        assert_eq!(format_prize(32000), "32,000");
        assert_eq!(format_prize(1_000_000), "1,000,000");
    }
}

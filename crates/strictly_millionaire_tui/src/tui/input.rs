//! Key bindings.

use crate::driver::Command;
use crossterm::event::KeyCode;
use strictly_millionaire::{Answer, LifelineKind, Phase};

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Forward a command to the driver.
    Send(Command),
    /// Ask the player to confirm walking away.
    AskQuit,
    /// Player confirmed walking away.
    ConfirmQuit,
    /// Player changed their mind.
    CancelQuit,
    /// Leave the program.
    Exit,
}

/// Maps a key to an action for the given phase.
///
/// While a quit confirmation is open only `y`, `n` and `Esc` do anything.
pub fn action_for(phase: Phase, confirming_quit: bool, key: KeyCode) -> Option<Action> {
    if confirming_quit {
        return match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ConfirmQuit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::CancelQuit),
            _ => None,
        };
    }

    if key == KeyCode::Char('q') {
        return Some(Action::Exit);
    }

    match (phase, key) {
        (Phase::Menu, KeyCode::Enter) => Some(Action::Send(Command::Start)),
        (Phase::Playing, KeyCode::Char(c)) => playing_key(c),
        (Phase::GameOver | Phase::Won, KeyCode::Enter) => Some(Action::Send(Command::ReturnToMenu)),
        _ => None,
    }
}

fn playing_key(c: char) -> Option<Action> {
    if let Some(answer) = Answer::from_letter(c) {
        return Some(Action::Send(Command::Select(answer)));
    }
    let command = match c {
        '1' => Command::Lifeline(LifelineKind::FiftyFifty),
        '2' => Command::Lifeline(LifelineKind::PhoneAFriend),
        '3' => Command::Lifeline(LifelineKind::AskTheAudience),
        'p' => Command::TogglePause,
        'r' => Command::Reveal,
        'x' => return Some(Action::AskQuit),
        _ => return None,
    };
    Some(Action::Send(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_starts_from_menu() {
        assert_eq!(
            action_for(Phase::Menu, false, KeyCode::Enter),
            Some(Action::Send(Command::Start))
        );
    }

    #[test]
    fn test_letters_select_answers_case_insensitive() {
        assert_eq!(
            action_for(Phase::Playing, false, KeyCode::Char('c')),
            Some(Action::Send(Command::Select(Answer::C)))
        );
        assert_eq!(
            action_for(Phase::Playing, false, KeyCode::Char('A')),
            Some(Action::Send(Command::Select(Answer::A)))
        );
    }

    #[test]
    fn test_answers_ignored_outside_playing() {
        assert_eq!(action_for(Phase::Answered, false, KeyCode::Char('a')), None);
        assert_eq!(action_for(Phase::Menu, false, KeyCode::Char('b')), None);
    }

    #[test]
    fn test_digits_play_lifelines() {
        assert_eq!(
            action_for(Phase::Playing, false, KeyCode::Char('1')),
            Some(Action::Send(Command::Lifeline(LifelineKind::FiftyFifty)))
        );
        assert_eq!(
            action_for(Phase::Playing, false, KeyCode::Char('3')),
            Some(Action::Send(Command::Lifeline(LifelineKind::AskTheAudience)))
        );
    }

    #[test]
    fn test_quit_needs_confirmation() {
        assert_eq!(
            action_for(Phase::Playing, false, KeyCode::Char('x')),
            Some(Action::AskQuit)
        );
        assert_eq!(
            action_for(Phase::Playing, true, KeyCode::Char('y')),
            Some(Action::ConfirmQuit)
        );
        assert_eq!(
            action_for(Phase::Playing, true, KeyCode::Esc),
            Some(Action::CancelQuit)
        );
        assert_eq!(action_for(Phase::Playing, true, KeyCode::Char('a')), None);
    }

    #[test]
    fn test_enter_leaves_end_screens() {
        for phase in [Phase::GameOver, Phase::Won] {
            assert_eq!(
                action_for(phase, false, KeyCode::Enter),
                Some(Action::Send(Command::ReturnToMenu))
            );
        }
    }

    #[test]
    fn test_q_exits_anywhere() {
        assert_eq!(action_for(Phase::Answered, false, KeyCode::Char('q')), Some(Action::Exit));
    }
}

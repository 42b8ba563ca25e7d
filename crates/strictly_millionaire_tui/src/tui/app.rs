//! Application state for the quiz screen.

use super::input::{self, Action};
use crate::driver::{Command, DriverEvent};
use crossterm::event::KeyCode;
use strictly_millionaire::{Cue, LifelineResult, Phase, SessionView};
use tracing::debug;

/// Main application state.
///
/// Holds only what the driver last reported plus a little local UI state.
#[derive(Debug, Default)]
pub struct App {
    view: Option<SessionView>,
    notice: Option<String>,
    last_cue: Option<Cue>,
    confirming_quit: bool,
    exit: bool,
}

impl App {
    /// Creates an app waiting for its first snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest session snapshot.
    pub fn view(&self) -> Option<&SessionView> {
        self.view.as_ref()
    }

    /// Phase of the latest snapshot.
    pub fn phase(&self) -> Phase {
        self.view.as_ref().map(|v| v.phase).unwrap_or_default()
    }

    /// One-line message for the status bar.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Most recent presentation cue.
    pub fn last_cue(&self) -> Option<Cue> {
        self.last_cue
    }

    /// Whether the walk-away prompt is open.
    pub fn confirming_quit(&self) -> bool {
        self.confirming_quit
    }

    /// Whether the player asked to leave.
    pub fn should_exit(&self) -> bool {
        self.exit
    }

    /// Applies an event from the driver.
    pub fn handle_event(&mut self, event: DriverEvent) {
        debug!(?event, "Handling driver event");
        match event {
            DriverEvent::Changed(view) => {
                if view.phase != Phase::Playing {
                    self.confirming_quit = false;
                }
                self.view = Some(view);
            }
            DriverEvent::Cue(cue) => {
                self.last_cue = Some(cue);
                let message = match cue {
                    Cue::Correct => Some("Correct!"),
                    Cue::Wrong => Some("Wrong!"),
                    Cue::Win => Some("You won the top prize!"),
                    Cue::Select => Some("Final answer..."),
                    Cue::Lifeline => None,
                };
                if let Some(message) = message {
                    self.notice = Some(message.to_string());
                }
            }
            DriverEvent::Lifeline(result) => {
                self.notice = Some(describe_lifeline(&result));
            }
            DriverEvent::Ignored(ignored) => {
                self.notice = Some(ignored.to_string());
            }
            DriverEvent::Failed(message) => {
                self.notice = Some(format!("Error: {}", message));
            }
        }
    }

    /// Handles a key press, returning the command to send, if any.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<Command> {
        match input::action_for(self.phase(), self.confirming_quit, key)? {
            Action::Send(command) => {
                self.notice = None;
                Some(command)
            }
            Action::AskQuit => {
                self.confirming_quit = true;
                None
            }
            Action::ConfirmQuit => {
                self.confirming_quit = false;
                Some(Command::Quit)
            }
            Action::CancelQuit => {
                self.confirming_quit = false;
                None
            }
            Action::Exit => {
                self.exit = true;
                None
            }
        }
    }
}

fn describe_lifeline(result: &LifelineResult) -> String {
    match result {
        LifelineResult::FiftyFifty([first, second]) => {
            format!("50:50 removed {} and {}", first, second)
        }
        LifelineResult::PhoneAFriend(answer) => format!("Your friend thinks it's {}", answer),
        LifelineResult::AskTheAudience(poll) => {
            format!("The audience favours {}", poll.leader())
        }
    }
}

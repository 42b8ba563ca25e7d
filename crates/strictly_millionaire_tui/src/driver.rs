//! Async actor that owns a [`GameSession`] and drives its clock.
//!
//! Commands arrive on one channel, timer messages from the [`Scheduler`] on
//! another, and everything the presentation needs leaves as
//! [`DriverEvent`]s. The session is only ever touched from the actor task.

use crate::scheduler::{Scheduler, Timer};
use rand::Rng;
use rand::rngs::StdRng;
use strictly_millionaire::{
    Answer, Cue, GameSession, Ignored, LifelineKind, LifelineResult, SessionView, StartError,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Player intents sent to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a new game from the menu.
    Start,
    /// Lock in an answer.
    Select(Answer),
    /// Play a lifeline.
    Lifeline(LifelineKind),
    /// Walk away with the guaranteed prize.
    Quit,
    /// Pause the clock if running, resume it if paused.
    TogglePause,
    /// Reveal the correct answer and pause.
    Reveal,
    /// Leave the end screen.
    ReturnToMenu,
    /// Stop the driver.
    Shutdown,
}

/// What the driver reports to the presentation.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverEvent {
    /// Fresh snapshot after a change.
    Changed(SessionView),
    /// Sound or effect hint.
    Cue(Cue),
    /// Result of a lifeline the player just used.
    Lifeline(LifelineResult),
    /// A command had no effect.
    Ignored(Ignored),
    /// A command failed outright.
    Failed(String),
}

/// Sending half for commands.
#[derive(Debug, Clone)]
pub struct DriverHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl DriverHandle {
    /// Sends a command. Returns `false` once the driver has stopped.
    pub fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }
}

/// The session actor.
pub struct Driver<R = StdRng> {
    session: GameSession<R>,
    scheduler: Scheduler,
    timers: mpsc::UnboundedReceiver<Timer>,
    events: mpsc::UnboundedSender<DriverEvent>,
}

impl<R> std::fmt::Debug for Driver<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("session", &self.session)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl<R: Rng + Send + 'static> Driver<R> {
    /// Wraps a session, forwarding its notifications to `events`.
    pub fn new(mut session: GameSession<R>, events: mpsc::UnboundedSender<DriverEvent>) -> Self {
        let changed = events.clone();
        session.on_session_changed(move |view| {
            let _ = changed.send(DriverEvent::Changed(view.clone()));
        });
        let cues = events.clone();
        session.on_cue(move |cue| {
            let _ = cues.send(DriverEvent::Cue(cue));
        });

        let (timer_tx, timers) = mpsc::unbounded_channel();
        Self {
            session,
            scheduler: Scheduler::new(timer_tx),
            timers,
            events,
        }
    }

    /// Spawns the actor onto the runtime.
    ///
    /// Returns the command handle, the event stream and the task handle.
    pub fn spawn(
        session: GameSession<R>,
    ) -> (
        DriverHandle,
        mpsc::UnboundedReceiver<DriverEvent>,
        JoinHandle<()>,
    ) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let driver = Self::new(session, event_tx);
        let task = tokio::spawn(driver.run(command_rx));
        (
            DriverHandle {
                commands: command_tx,
            },
            event_rx,
            task,
        )
    }

    /// Processes commands and timer messages until shutdown.
    #[instrument(skip_all)]
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        info!("Driver started");
        let _ = self.events.send(DriverEvent::Changed(self.session.view()));

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    None | Some(Command::Shutdown) => break,
                    Some(command) => self.handle_command(command),
                },
                Some(timer) = self.timers.recv() => self.handle_timer(timer),
            }
            self.scheduler.sync(&self.session);
        }

        self.scheduler.cancel_all();
        info!("Driver stopped");
    }

    #[instrument(skip(self), fields(phase = %self.session.phase()))]
    fn handle_command(&mut self, command: Command) {
        debug!("Handling command");
        let result = match command {
            Command::Start => match self.session.start() {
                Ok(_) => Ok(()),
                Err(StartError::Ignored(ignored)) => Err(ignored),
                Err(StartError::Quiz(e)) => {
                    error!(error = %e, "Could not start game");
                    let _ = self.events.send(DriverEvent::Failed(e.to_string()));
                    Ok(())
                }
            },
            Command::Select(answer) => self.session.select_answer(answer).map(|_| ()),
            Command::Lifeline(kind) => self.session.use_lifeline(kind).map(|result| {
                let _ = self.events.send(DriverEvent::Lifeline(result));
            }),
            Command::Quit => self.session.quit().map(|_| ()),
            Command::TogglePause => {
                if self.session.is_paused() {
                    self.session.resume()
                } else {
                    self.session.pause()
                }
            }
            Command::Reveal => self.session.reveal(),
            Command::ReturnToMenu => self.session.return_to_menu().map(|_| ()),
            Command::Shutdown => Ok(()),
        };

        if let Err(ignored) = result {
            debug!(%ignored, "Command ignored");
            let _ = self.events.send(DriverEvent::Ignored(ignored));
        }
    }

    fn handle_timer(&mut self, timer: Timer) {
        let result = match timer {
            Timer::Tick(generation) => self.session.tick(generation).map(|_| ()),
            Timer::Resolve(generation) => self.session.resolve(generation).map(|_| ()),
        };
        match result {
            Ok(()) => {}
            Err(Ignored::Stale { current, received }) => {
                debug!(%current, %received, "Dropped stale timer message");
            }
            Err(Ignored::TimerPaused) => debug!("Dropped tick queued before pause"),
            Err(ignored) => warn!(%ignored, ?timer, "Timer message ignored"),
        }
    }
}

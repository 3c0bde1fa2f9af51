//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`InputState`]: input line editing
//! - [`Session`]: chat session state machine
//! - [`Driver`]: Platform-specific I/O

use shhh_client::{Session, SessionAction};
use shhh_core::env::Environment;

use crate::{AppEvent, Driver, InputState, UserIntent, View};

/// Generic runtime that orchestrates input, Session and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment for time and local identifiers
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    session: Session<E>,
    input: InputState,
}

impl<D, E> Runtime<D, E>
where
    D: Driver<Instant = E::Instant>,
    E: Environment,
{
    /// Create a runtime around an existing session.
    pub fn new(driver: D, session: Session<E>) -> Self {
        Self { driver, session, input: InputState::new() }
    }

    /// Session being driven.
    pub fn session(&self) -> &Session<E> {
        &self.session
    }

    /// Input line.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Run the main event loop until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.render()?;

        while !self.step().await? {}

        self.shutdown().await
    }

    /// Process one cycle of the event loop.
    ///
    /// Waits for one event (or until the pending send is due), feeds it to
    /// the session, ticks the session and executes the resulting actions.
    /// Returns `true` if the user asked to quit.
    pub async fn step(&mut self) -> Result<bool, D::Error> {
        let timeout = self.session.send_due_in(self.driver.now());

        let mut actions = Vec::new();
        let mut redraw = false;
        match self.driver.next_event(timeout).await? {
            Some(AppEvent::Key(key)) => {
                let intents = self.input.handle_key(key);
                redraw = true;
                if self.handle_intents(intents, &mut actions) {
                    return Ok(true);
                }
            },
            Some(AppEvent::Intent(intent)) => {
                if self.handle_intents([intent], &mut actions) {
                    return Ok(true);
                }
            },
            Some(AppEvent::Session(event)) => actions.extend(self.session.handle(event)),
            None => {},
        }

        let now = self.driver.now();
        actions.extend(self.session.tick(now));

        self.process_actions(actions, redraw).await?;
        Ok(false)
    }

    /// Tear the session down and stop the driver.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails while closing the connection.
    pub async fn shutdown(&mut self) -> Result<(), D::Error> {
        let actions = self.session.shutdown();
        for action in actions {
            self.driver.execute(action).await?;
        }

        self.driver.stop().await;
        tracing::debug!("runtime stopped");
        Ok(())
    }

    /// Feed intents to the session. Returns `true` on quit; intents after a
    /// quit are not processed.
    fn handle_intents(
        &mut self,
        intents: impl IntoIterator<Item = UserIntent>,
        actions: &mut Vec<SessionAction>,
    ) -> bool {
        for intent in intents {
            match intent.into_session_event() {
                Some(event) => actions.extend(self.session.handle(event)),
                None => return true,
            }
        }
        false
    }

    /// Execute session actions. Renders once if any of them changed state.
    async fn process_actions(
        &mut self,
        actions: Vec<SessionAction>,
        mut redraw: bool,
    ) -> Result<(), D::Error> {
        for action in actions {
            match action {
                SessionAction::StateChanged => redraw = true,
                SessionAction::CreateRoom { .. } | SessionAction::Connection(_) => {
                    self.driver.execute(action).await?;
                },
            }
        }

        if redraw {
            self.render()?;
        }
        Ok(())
    }

    fn render(&mut self) -> Result<(), D::Error> {
        let view = View::new(&self.session, &self.input);
        self.driver.render(&view)
    }
}

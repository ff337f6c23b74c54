//! Command/reconciliation gate.
//!
//! After a user command the provider keeps reporting the old state for a
//! short while. The gate holds snapshots off while a command settles so that
//! the optimistic local state is not overwritten by a stale reading.
//!
//! ```text
//! Idle --command--> Pending --settle delay--> Idle
//! Idle --seek--> Debouncing --debounce--> Pending --settle delay--> Idle
//!                    ^   |
//!                    +---+ further seek restarts the debounce timer
//! ```
//!
//! Timers are plain deadlines. The owner sleeps until [`CommandGate::next_deadline`]
//! and then calls [`CommandGate::poll`].

use std::{fmt, time::Duration};

use tokio::time::Instant;
use tracing::debug;

use crate::services::media::TransportCommand;

/// Externally visible gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    /// Snapshots are merged
    #[default]
    Idle,
    /// A seek gesture is being coalesced
    Debouncing,
    /// A command was dispatched and is settling
    Pending,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Debouncing => f.write_str("debouncing"),
            Self::Pending => f.write_str("pending"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingCommand {
    command: TransportCommand,
    settles_at: Instant,
}

#[derive(Debug, Clone, Copy)]
struct SeekDebounce {
    position_ms: u64,
    fires_at: Instant,
}

/// Serializes user commands against the snapshot stream.
#[derive(Debug, Clone)]
pub struct CommandGate {
    settle_delay: Duration,
    seek_debounce: Duration,
    pending: Option<PendingCommand>,
    debounce: Option<SeekDebounce>,
}

impl CommandGate {
    /// Creates an idle gate.
    pub fn new(settle_delay: Duration, seek_debounce: Duration) -> Self {
        Self {
            settle_delay,
            seek_debounce,
            pending: None,
            debounce: None,
        }
    }

    /// Current state. A running debounce takes precedence over a settling command.
    pub fn state(&self) -> GateState {
        if self.debounce.is_some() {
            GateState::Debouncing
        } else if self.pending.is_some() {
            GateState::Pending
        } else {
            GateState::Idle
        }
    }

    /// Whether incoming snapshots may be merged right now.
    pub fn accepts_snapshots(&self) -> bool {
        self.state() == GateState::Idle
    }

    /// The command currently settling, if any.
    pub fn pending_command(&self) -> Option<TransportCommand> {
        self.pending.map(|pending| pending.command)
    }

    /// Mark `command` as dispatched at `now`.
    ///
    /// Returns `false` when the same command is already settling; the
    /// caller must not dispatch it again. A different command replaces the
    /// pending one and restarts the settle delay.
    pub fn begin_command(&mut self, command: TransportCommand, now: Instant) -> bool {
        if self.pending_command() == Some(command) {
            debug!(%command, "Suppressing duplicate command while pending");
            return false;
        }

        self.pending = Some(PendingCommand {
            command,
            settles_at: now + self.settle_delay,
        });
        debug!(%command, "Gate pending");
        true
    }

    /// Clear the pending command.
    pub fn end_command(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(command = %pending.command, "Gate settled");
        }
    }

    /// Record seek input. Any running debounce is cancelled and restarted
    /// with the new position.
    pub fn seek_input(&mut self, position_ms: u64, now: Instant) {
        self.debounce = Some(SeekDebounce {
            position_ms,
            fires_at: now + self.seek_debounce,
        });
    }

    /// Cancel a running seek debounce, returning its position.
    pub fn cancel_debounce(&mut self) -> Option<u64> {
        self.debounce.take().map(|debounce| debounce.position_ms)
    }

    /// Earliest instant at which [`poll`](Self::poll) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let settle = self.pending.map(|pending| pending.settles_at);
        let fire = self.debounce.map(|debounce| debounce.fires_at);

        match (settle, fire) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Run elapsed timer transitions.
    ///
    /// Returns a seek command to dispatch when the debounce window elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<TransportCommand> {
        if self
            .pending
            .is_some_and(|pending| pending.settles_at <= now)
        {
            self.end_command();
        }

        let fired = self
            .debounce
            .is_some_and(|debounce| debounce.fires_at <= now);
        if !fired {
            return None;
        }

        let position_ms = self.cancel_debounce()?;
        let command = TransportCommand::Seek(position_ms);
        self.begin_command(command, now).then_some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTLE: Duration = Duration::from_millis(500);
    const DEBOUNCE: Duration = Duration::from_millis(300);

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn gate() -> CommandGate {
        CommandGate::new(SETTLE, DEBOUNCE)
    }

    #[test]
    fn command_settles_after_delay() {
        let t0 = Instant::now();
        let mut gate = gate();

        assert!(gate.begin_command(TransportCommand::Pause, t0));
        assert_eq!(gate.state(), GateState::Pending);
        assert!(!gate.accepts_snapshots());
        assert_eq!(gate.next_deadline(), Some(t0 + SETTLE));

        assert_eq!(gate.poll(t0 + ms(499)), None);
        assert_eq!(gate.state(), GateState::Pending);

        assert_eq!(gate.poll(t0 + SETTLE), None);
        assert_eq!(gate.state(), GateState::Idle);
        assert_eq!(gate.next_deadline(), None);
    }

    #[test]
    fn duplicate_command_is_suppressed() {
        let t0 = Instant::now();
        let mut gate = gate();

        assert!(gate.begin_command(TransportCommand::Next, t0));
        assert!(!gate.begin_command(TransportCommand::Next, t0 + ms(100)));
        assert_eq!(gate.next_deadline(), Some(t0 + SETTLE));
    }

    #[test]
    fn different_command_restarts_settle_delay() {
        let t0 = Instant::now();
        let mut gate = gate();

        gate.begin_command(TransportCommand::Play, t0);
        assert!(gate.begin_command(TransportCommand::Pause, t0 + ms(200)));

        assert_eq!(gate.pending_command(), Some(TransportCommand::Pause));
        assert_eq!(gate.next_deadline(), Some(t0 + ms(700)));
    }

    #[test]
    fn command_allowed_again_after_settling() {
        let t0 = Instant::now();
        let mut gate = gate();

        gate.begin_command(TransportCommand::Next, t0);
        gate.poll(t0 + SETTLE);

        assert!(gate.begin_command(TransportCommand::Next, t0 + SETTLE));
    }

    #[test]
    fn seek_inputs_coalesce_to_last_position() {
        let t0 = Instant::now();
        let mut gate = gate();

        gate.seek_input(10_000, t0);
        gate.seek_input(20_000, t0 + ms(100));
        gate.seek_input(30_000, t0 + ms(250));
        assert_eq!(gate.state(), GateState::Debouncing);
        assert!(!gate.accepts_snapshots());

        assert_eq!(gate.poll(t0 + ms(400)), None);
        assert_eq!(gate.next_deadline(), Some(t0 + ms(550)));

        assert_eq!(
            gate.poll(t0 + ms(550)),
            Some(TransportCommand::Seek(30_000))
        );
        assert_eq!(gate.state(), GateState::Pending);
        assert_eq!(gate.next_deadline(), Some(t0 + ms(1_050)));

        assert_eq!(gate.poll(t0 + ms(1_050)), None);
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn cancelled_debounce_never_fires() {
        let t0 = Instant::now();
        let mut gate = gate();

        gate.seek_input(5_000, t0);
        assert_eq!(gate.cancel_debounce(), Some(5_000));

        assert_eq!(gate.poll(t0 + ms(1_000)), None);
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn debounce_takes_precedence_over_pending() {
        let t0 = Instant::now();
        let mut gate = gate();

        gate.begin_command(TransportCommand::Play, t0);
        gate.seek_input(1_000, t0 + ms(10));

        assert_eq!(gate.state(), GateState::Debouncing);
        assert_eq!(gate.next_deadline(), Some(t0 + ms(310)));

        assert_eq!(gate.poll(t0 + ms(310)), Some(TransportCommand::Seek(1_000)));
        assert_eq!(gate.pending_command(), Some(TransportCommand::Seek(1_000)));
    }

    #[test]
    fn repeated_identical_seek_while_settling_is_suppressed() {
        let t0 = Instant::now();
        let mut gate = gate();

        gate.seek_input(1_000, t0);
        assert!(gate.poll(t0 + DEBOUNCE).is_some());

        gate.seek_input(1_000, t0 + ms(320));
        assert_eq!(gate.poll(t0 + ms(620)), None);
        assert_eq!(gate.state(), GateState::Pending);
    }
}

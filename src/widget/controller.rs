use std::{future, sync::Arc, time::Duration};

use async_stream::stream;
use futures::{Stream, StreamExt, stream::BoxStream};
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
    time::{Instant, Interval, MissedTickBehavior, interval, sleep_until},
};
use tracing::{debug, info, instrument, warn};

use super::{CommandGate, EstimatorState, GateState, PositionEstimator, WidgetEvent};
use crate::{
    config::WidgetConfig,
    services::{
        common::Property,
        media::{
            ArtworkRef, MediaError, MediaProvider, MediaState, PlaybackSnapshot, TrackMetadata,
            TransportCommand, UserTransport, Volume,
        },
    },
};

const EVENT_CAPACITY: usize = 64;

/// Input from the presentation layer.
#[derive(Debug, Clone, Copy)]
enum UserInput {
    Seek(u64),
    Transport(UserTransport),
    Volume(f64),
    Shutdown,
}

/// Result of a provider call running in its own task.
#[derive(Debug)]
enum Completion {
    Snapshot(Result<Option<MediaState>, MediaError>),
    Artwork {
        generation: u64,
        result: Result<Option<ArtworkRef>, MediaError>,
    },
    Command {
        command: TransportCommand,
        result: Result<(), MediaError>,
    },
    VolumeRead(Result<Volume, MediaError>),
    VolumeWritten(Result<(), MediaError>),
}

/// All mutable playback state, owned by the controller task.
#[derive(Debug)]
pub struct PlayerState {
    /// Position estimator
    pub estimator: PositionEstimator,
    /// Command/reconciliation gate
    pub gate: CommandGate,
    /// Text of the last merged snapshot
    pub metadata: Option<TrackMetadata>,
    /// Artwork of the current track
    pub artwork: Option<ArtworkRef>,
    /// Last known volume
    pub volume: Option<Volume>,
    track_generation: u64,
    volume_touched: bool,
}

impl PlayerState {
    /// Startup state for the given configuration.
    pub fn new(config: &WidgetConfig, now: Instant) -> Self {
        Self {
            estimator: PositionEstimator::new(config.resync_threshold_ms, now),
            gate: CommandGate::new(config.settle_delay(), config.seek_debounce()),
            metadata: None,
            artwork: None,
            volume: None,
            track_generation: 0,
            volume_touched: false,
        }
    }
}

/// Read-only views published by the controller.
#[derive(Clone)]
struct Published {
    estimator: Property<EstimatorState>,
    metadata: Property<Option<TrackMetadata>>,
    artwork: Property<Option<ArtworkRef>>,
    volume: Property<Option<Volume>>,
    gate: Property<GateState>,
}

/// Presentation-side handle to a running controller.
///
/// Reads never touch controller state directly; inputs are queued to the
/// controller task and return immediately.
#[derive(Clone)]
pub struct WidgetHandle {
    inputs: mpsc::UnboundedSender<UserInput>,
    published: Published,
    events: broadcast::Sender<WidgetEvent>,
}

impl WidgetHandle {
    /// Live playback position in milliseconds.
    pub fn current_estimate_ms(&self) -> u64 {
        self.estimate_at(Instant::now())
    }

    /// Playback position at `now` in milliseconds.
    pub fn estimate_at(&self, now: Instant) -> u64 {
        self.published.estimator.with(|state| state.estimate_at(now))
    }

    /// Track length in milliseconds, 0 when unknown.
    pub fn current_duration_ms(&self) -> u64 {
        self.published.estimator.with(|state| state.duration_ms)
    }

    /// Position as a fraction of the track, `None` when length is unknown.
    pub fn current_progress(&self) -> Option<f64> {
        let now = Instant::now();
        self.published.estimator.with(|state| {
            (state.duration_ms > 0)
                .then(|| state.estimate_at(now) as f64 / state.duration_ms as f64)
        })
    }

    /// Whether the estimate is advancing.
    pub fn is_playing(&self) -> bool {
        self.published.estimator.with(|state| state.is_playing)
    }

    /// Title, artist and album of the current track.
    pub fn current_track_metadata(&self) -> Option<TrackMetadata> {
        self.published.metadata.get()
    }

    /// Artwork of the current track.
    pub fn current_artwork_ref(&self) -> Option<ArtworkRef> {
        self.published.artwork.get()
    }

    /// Last known volume.
    pub fn current_volume(&self) -> Option<Volume> {
        self.published.volume.get()
    }

    /// Current gate state.
    pub fn gate_state(&self) -> GateState {
        self.published.gate.get()
    }

    /// Snapshot of the estimator state.
    pub fn estimator_state(&self) -> EstimatorState {
        self.published.estimator.get()
    }

    /// Stream of discrete widget events.
    ///
    /// Ends when the controller stops.
    pub fn events(&self) -> impl Stream<Item = WidgetEvent> + Send + 'static {
        let mut rx = self.events.subscribe();

        stream! {
            loop {
                match rx.recv().await {
                    Ok(event) => yield event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Widget event consumer lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    /// Seek gesture input. Repeated input is coalesced.
    pub fn user_seek(&self, position_ms: u64) {
        self.send(UserInput::Seek(position_ms));
    }

    /// Transport button input.
    pub fn user_transport(&self, transport: UserTransport) {
        self.send(UserInput::Transport(transport));
    }

    /// Volume drag input, clamped to `0.0..=1.0`.
    pub fn user_volume(&self, level: f64) {
        self.send(UserInput::Volume(level));
    }

    /// Ask the controller task to stop.
    pub fn shutdown(&self) {
        self.send(UserInput::Shutdown);
    }

    /// Whether the controller task is still running.
    pub fn is_running(&self) -> bool {
        !self.inputs.is_closed()
    }

    fn send(&self, input: UserInput) {
        if self.inputs.send(input).is_err() {
            debug!(?input, "Controller stopped, dropping input");
        }
    }
}

/// Drives a [`MediaProvider`] and keeps [`PlayerState`] reconciled.
///
/// Runs as a single task: snapshot merging, user input and gate timers
/// never interleave. Provider calls run in spawned tasks and report back
/// through a channel.
pub struct NowPlayingController<P: MediaProvider> {
    provider: Arc<P>,
    config: WidgetConfig,
    state: PlayerState,
    published: Published,
    events: broadcast::Sender<WidgetEvent>,
    completions: mpsc::UnboundedSender<Completion>,
    poll_in_flight: bool,
}

impl<P: MediaProvider> NowPlayingController<P> {
    /// Start a controller for `provider`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(provider: Arc<P>, config: WidgetConfig) -> (WidgetHandle, JoinHandle<()>) {
        let state = PlayerState::new(&config, Instant::now());
        let published = Published {
            estimator: Property::new(state.estimator.state().clone()),
            metadata: Property::new(None),
            artwork: Property::new(None),
            volume: Property::new(None),
            gate: Property::new(GateState::Idle),
        };
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (inputs_tx, inputs_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        let controller = Self {
            provider,
            config,
            state,
            published: published.clone(),
            events: events.clone(),
            completions: completions_tx,
            poll_in_flight: false,
        };

        let task = tokio::spawn(controller.run(inputs_rx, completions_rx));

        let handle = WidgetHandle {
            inputs: inputs_tx,
            published,
            events,
        };

        (handle, task)
    }

    #[instrument(skip_all)]
    async fn run(
        mut self,
        mut inputs: mpsc::UnboundedReceiver<UserInput>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        info!("Now playing controller started");

        let mut push = if self.config.prefer_push {
            self.provider.updates()
        } else {
            None
        };

        let mut poll = if push.is_some() {
            info!("Using provider push updates");
            poll_timer(self.config.push_poll_interval())
        } else {
            poll_timer(self.config.poll_interval())
        };

        self.request_snapshot();
        self.request_volume();

        loop {
            let deadline = self.state.gate.next_deadline();
            let polling = !self.poll_in_flight;

            tokio::select! {
                input = inputs.recv() => match input {
                    Some(UserInput::Shutdown) | None => break,
                    Some(input) => self.handle_input(input),
                },
                Some(completion) = completions.recv() => self.handle_completion(completion),
                update = next_update(&mut push), if push.is_some() => match update {
                    Some(state) => self.merge_state(Some(state)),
                    None => {
                        info!("Push updates ended, falling back to polling");
                        push = None;
                        poll = poll_timer(self.config.poll_interval());
                    }
                },
                _ = poll.tick(), if polling => self.request_snapshot(),
                _ = gate_timer(deadline) => self.handle_gate_timers(),
            }
        }

        info!("Now playing controller stopped");
    }

    fn handle_input(&mut self, input: UserInput) {
        let now = Instant::now();

        match input {
            UserInput::Seek(position_ms) => {
                self.state.estimator.apply_user_seek(position_ms, now);
                self.state.gate.seek_input(position_ms, now);
                debug!(position_ms, "Seek input");
            }
            UserInput::Transport(transport) => {
                let command = transport.resolve(self.state.estimator.is_playing());
                if !self.state.gate.begin_command(command, now) {
                    return;
                }

                let playing = match command {
                    TransportCommand::Play => Some(true),
                    TransportCommand::Pause => Some(false),
                    _ => None,
                };
                if let Some(playing) = playing {
                    if self.state.estimator.apply_user_transport(playing, now) {
                        self.emit(WidgetEvent::PlayStateChanged { playing });
                    }
                }

                self.dispatch(command);
            }
            UserInput::Volume(level) => {
                let volume = Volume::new(level);
                self.state.volume_touched = true;
                if self.state.volume != Some(volume) {
                    self.state.volume = Some(volume);
                    self.emit(WidgetEvent::VolumeChanged(volume));
                }

                let provider = Arc::clone(&self.provider);
                let completions = self.completions.clone();
                tokio::spawn(async move {
                    let result = provider.set_volume(volume).await;
                    let _ = completions.send(Completion::VolumeWritten(result));
                });
            }
            UserInput::Shutdown => {}
        }

        self.publish();
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Snapshot(result) => {
                self.poll_in_flight = false;
                match result {
                    Ok(state) => self.merge_state(state),
                    Err(e) => warn!(error = %e, "Failed to read media state"),
                }
            }
            Completion::Artwork { generation, result } => {
                self.merge_artwork(generation, result);
            }
            Completion::Command { command, result } => match result {
                Ok(()) => debug!(%command, "Provider applied command"),
                Err(e) => warn!(%command, error = %e, "Provider command failed"),
            },
            Completion::VolumeRead(result) => match result {
                Ok(volume) if !self.state.volume_touched => {
                    self.state.volume = Some(volume);
                    self.emit(WidgetEvent::VolumeChanged(volume));
                    self.publish();
                }
                Ok(_) => debug!("Ignoring volume read, user already set one"),
                Err(e) => debug!(error = %e, "Failed to read volume"),
            },
            Completion::VolumeWritten(result) => {
                if let Err(e) = result {
                    warn!(error = %e, "Failed to set volume");
                }
            }
        }
    }

    fn handle_gate_timers(&mut self) {
        let was_gated = !self.state.gate.accepts_snapshots();

        if let Some(command) = self.state.gate.poll(Instant::now()) {
            self.dispatch(command);
        }

        // Readings dropped while gated are gone; fetch the settled state.
        if was_gated && self.state.gate.accepts_snapshots() {
            debug!("Gate reopened, requesting snapshot");
            self.request_snapshot();
        }

        self.publish();
    }

    /// Merge a provider reading, unless the gate is holding snapshots off.
    fn merge_state(&mut self, state: Option<MediaState>) {
        let Some(state) = state else {
            debug!("No media player available");
            return;
        };

        let Some(snapshot) = PlaybackSnapshot::from_state(&state) else {
            debug!(source = %state.source_app, "Ignoring snapshot without metadata");
            return;
        };

        if !self.state.gate.accepts_snapshots() {
            debug!(gate = %self.state.gate.state(), "Dropping snapshot while gated");
            return;
        }

        let reconciliation = self.state.estimator.reconcile(&snapshot, Instant::now());

        let metadata = state.metadata.as_ref().map(TrackMetadata::from);
        self.state.metadata = metadata.clone();

        if reconciliation.track_changed {
            info!(title = %snapshot.title, artist = %snapshot.artist, "Track changed");
            self.state.track_generation += 1;
            self.emit(WidgetEvent::TrackChanged(metadata.unwrap_or_default()));
            self.request_artwork();
        }

        if reconciliation.play_state_changed {
            self.emit(WidgetEvent::PlayStateChanged {
                playing: snapshot.is_playing,
            });
        }

        self.publish();
    }

    fn merge_artwork(&mut self, generation: u64, result: Result<Option<ArtworkRef>, MediaError>) {
        if generation != self.state.track_generation {
            debug!("Discarding artwork for a previous track");
            return;
        }

        match result {
            Ok(artwork) => {
                if self.state.artwork != artwork {
                    self.state.artwork = artwork.clone();
                    self.emit(WidgetEvent::ArtworkChanged(artwork));
                    self.publish();
                }
            }
            Err(e) => warn!(error = %e, "Failed to load artwork"),
        }
    }

    fn request_snapshot(&mut self) {
        self.poll_in_flight = true;

        let provider = Arc::clone(&self.provider);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = provider.media_state().await;
            let _ = completions.send(Completion::Snapshot(result));
        });
    }

    fn request_artwork(&self) {
        let generation = self.state.track_generation;
        let provider = Arc::clone(&self.provider);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = provider.artwork().await;
            let _ = completions.send(Completion::Artwork { generation, result });
        });
    }

    fn request_volume(&self) {
        let provider = Arc::clone(&self.provider);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = provider.volume().await;
            let _ = completions.send(Completion::VolumeRead(result));
        });
    }

    fn dispatch(&self, command: TransportCommand) {
        debug!(%command, "Dispatching command");

        let provider = Arc::clone(&self.provider);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = provider.execute(command).await;
            let _ = completions.send(Completion::Command { command, result });
        });
    }

    fn emit(&self, event: WidgetEvent) {
        let _ = self.events.send(event);
    }

    fn publish(&self) {
        self.published
            .estimator
            .set(self.state.estimator.state().clone());
        self.published.metadata.set(self.state.metadata.clone());
        self.published.artwork.set(self.state.artwork.clone());
        self.published.volume.set(self.state.volume);
        self.published.gate.set(self.state.gate.state());
    }
}

fn poll_timer(period: Duration) -> Interval {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

async fn next_update(push: &mut Option<BoxStream<'static, MediaState>>) -> Option<MediaState> {
    match push {
        Some(updates) => updates.next().await,
        None => future::pending().await,
    }
}

async fn gate_timer(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}

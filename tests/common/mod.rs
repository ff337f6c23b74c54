//! In-memory media provider shared by the integration tests.

#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use futures::{StreamExt, stream::BoxStream};
use nowplaying::{
    config::WidgetConfig,
    services::media::{
        ArtworkRef, MediaError, MediaMetadata, MediaProvider, MediaState, PlaybackState,
        TransportCommand, Volume,
    },
    widget::{NowPlayingController, WidgetHandle},
};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_stream::wrappers::UnboundedReceiverStream;

pub const DURATION_MS: u64 = 200_000;

/// Records every call and answers from fixed state.
#[derive(Default)]
pub struct FakeProvider {
    pub state: Mutex<Option<MediaState>>,
    pub commands: Mutex<Vec<TransportCommand>>,
    pub volumes: Mutex<Vec<Volume>>,
    pub artwork_calls: AtomicUsize,
    pub fail_commands: AtomicBool,
    push: Mutex<Option<mpsc::UnboundedReceiver<MediaState>>>,
}

impl FakeProvider {
    /// Provider with a push channel; the sender feeds updates.
    pub fn with_push() -> (Arc<Self>, mpsc::UnboundedSender<MediaState>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let provider = Self {
            push: Mutex::new(Some(rx)),
            ..Self::default()
        };
        (Arc::new(provider), tx)
    }

    pub fn commands(&self) -> Vec<TransportCommand> {
        self.commands.lock().unwrap().clone()
    }

    pub fn set_state(&self, state: Option<MediaState>) {
        *self.state.lock().unwrap() = state;
    }

    fn record(&self, command: TransportCommand) -> Result<(), MediaError> {
        self.commands.lock().unwrap().push(command);

        if self.fail_commands.load(Ordering::SeqCst) {
            return Err(MediaError::ControlFailed("player went away".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MediaProvider for FakeProvider {
    async fn media_state(&self) -> Result<Option<MediaState>, MediaError> {
        Ok(self.state.lock().unwrap().clone())
    }

    async fn artwork(&self) -> Result<Option<ArtworkRef>, MediaError> {
        let call = self.artwork_calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Some(ArtworkRef(format!("data:image/png;base64,{call}"))))
    }

    async fn play(&self) -> Result<(), MediaError> {
        self.record(TransportCommand::Play)
    }

    async fn pause(&self) -> Result<(), MediaError> {
        self.record(TransportCommand::Pause)
    }

    async fn previous(&self) -> Result<(), MediaError> {
        self.record(TransportCommand::Previous)
    }

    async fn next(&self) -> Result<(), MediaError> {
        self.record(TransportCommand::Next)
    }

    async fn rewind(&self) -> Result<(), MediaError> {
        self.record(TransportCommand::Rewind)
    }

    async fn fast_forward(&self) -> Result<(), MediaError> {
        self.record(TransportCommand::FastForward)
    }

    async fn seek(&self, position_ms: u64) -> Result<(), MediaError> {
        self.record(TransportCommand::Seek(position_ms))
    }

    async fn volume(&self) -> Result<Volume, MediaError> {
        Ok(Volume::new(0.4))
    }

    async fn set_volume(&self, volume: Volume) -> Result<(), MediaError> {
        self.volumes.lock().unwrap().push(volume);
        Ok(())
    }

    fn updates(&self) -> Option<BoxStream<'static, MediaState>> {
        let rx = self.push.lock().unwrap().take()?;
        Some(UnboundedReceiverStream::new(rx).boxed())
    }
}

pub fn media_state(title: &str, position_ms: u64, playing: bool) -> MediaState {
    MediaState {
        source_app: "org.mpris.MediaPlayer2.fake".to_string(),
        state: if playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        },
        metadata: Some(MediaMetadata {
            title: title.to_string(),
            artist: "Artist".to_string(),
            album: None,
            artwork_url: None,
            duration_ms: Some(DURATION_MS),
            position_ms: Some(position_ms),
        }),
    }
}

pub fn spawn(provider: Arc<FakeProvider>) -> (WidgetHandle, JoinHandle<()>) {
    NowPlayingController::spawn(provider, WidgetConfig::default())
}

/// Let spawned tasks run without moving the paused clock.
pub async fn flush() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

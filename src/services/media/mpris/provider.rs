use std::{path::Path, sync::Arc};

use async_stream::stream;
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use futures::{StreamExt, stream::BoxStream};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use zbus::{
    Connection, MatchRule, MessageStream, fdo, message::Type as MessageType, proxy::CacheProperties,
    zvariant::ObjectPath,
};

use super::{
    MPRIS_BUS_PREFIX, MPRIS_OBJECT_PATH, MediaPlayer2PlayerProxy, PriorityStack,
    metadata::{parse_metadata, track_id},
    micros_to_ms, ms_to_micros,
};
use crate::{
    config::ProviderConfig,
    services::media::{
        ArtworkRef, MediaError, MediaProvider, MediaState, PlaybackState, PlayerId, Volume,
    },
};

const UPDATE_QUEUE: usize = 64;
const PLAYER_INTERFACE: &str = "org.mpris.MediaPlayer2.Player";

struct Inner {
    connection: Connection,
    config: ProviderConfig,
    priority: Mutex<PriorityStack>,
}

/// Media provider backed by MPRIS players on the session bus.
///
/// Follows whichever player most recently started playing.
#[derive(Clone)]
pub struct MprisProvider {
    inner: Arc<Inner>,
}

impl MprisProvider {
    /// Connect to the D-Bus session bus.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::InitializationFailed` if the connection fails
    #[instrument(skip(config))]
    pub async fn connect(config: ProviderConfig) -> Result<Self, MediaError> {
        let connection = Connection::session().await.map_err(|e| {
            MediaError::InitializationFailed(format!("D-Bus connection failed: {e}"))
        })?;

        info!("Connected to session bus for MPRIS");

        Ok(Self {
            inner: Arc::new(Inner {
                connection,
                config,
                priority: Mutex::new(PriorityStack::new()),
            }),
        })
    }

    /// Whether a bus name matches one of the configured ignore patterns.
    pub fn should_ignore_player(&self, bus_name: &str) -> bool {
        self.inner
            .config
            .ignored_players
            .iter()
            .any(|pattern| bus_name.contains(pattern.as_str()))
    }

    async fn player_proxy(
        &self,
        player_id: &PlayerId,
    ) -> Result<MediaPlayer2PlayerProxy<'static>, MediaError> {
        let proxy = MediaPlayer2PlayerProxy::builder(&self.inner.connection)
            .destination(player_id.bus_name().to_string())?
            .cache_properties(CacheProperties::No)
            .build()
            .await?;
        Ok(proxy)
    }

    async fn discover_players(&self) -> Result<Vec<PlayerId>, MediaError> {
        let dbus_proxy = fdo::DBusProxy::new(&self.inner.connection).await?;
        let names = dbus_proxy.list_names().await?;

        Ok(names
            .iter()
            .map(|name| name.as_str())
            .filter(|name| name.starts_with(MPRIS_BUS_PREFIX))
            .filter(|name| !self.should_ignore_player(name))
            .map(PlayerId::from_bus_name)
            .collect())
    }

    /// Pick the player to follow and return a proxy for it.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::NoActivePlayer` if no player is on the bus
    pub async fn active_player(
        &self,
    ) -> Result<(PlayerId, MediaPlayer2PlayerProxy<'static>), MediaError> {
        let mut observed = Vec::new();
        let mut proxies = Vec::new();

        for player_id in self.discover_players().await? {
            let proxy = match self.player_proxy(&player_id).await {
                Ok(proxy) => proxy,
                Err(e) => {
                    debug!(player = %player_id, error = %e, "Skipping unreachable player");
                    continue;
                }
            };
            let playing = matches!(
                proxy.playback_status().await.as_deref(),
                Ok("Playing")
            );
            observed.push((player_id.clone(), playing));
            proxies.push((player_id, proxy));
        }

        let current = {
            let mut priority = self.inner.priority.lock().await;
            priority.observe(&observed);
            priority.current().cloned()
        };

        let current = current.ok_or(MediaError::NoActivePlayer)?;
        proxies
            .into_iter()
            .find(|(id, _)| *id == current)
            .ok_or(MediaError::PlayerNotFound(current))
    }

    async fn control<F, Fut>(&self, action: &str, call: F) -> Result<(), MediaError>
    where
        F: FnOnce(MediaPlayer2PlayerProxy<'static>) -> Fut,
        Fut: Future<Output = zbus::Result<()>>,
    {
        let (_, proxy) = self.active_player().await?;
        call(proxy)
            .await
            .map_err(|e| MediaError::ControlFailed(format!("{action} failed: {e}")))
    }

    async fn seek_relative(&self, offset_ms: i64) -> Result<(), MediaError> {
        let offset_micros = offset_ms.saturating_mul(1_000);
        self.control("Seek", |proxy| async move { proxy.seek(offset_micros).await })
            .await
    }

    fn skip_step_ms(&self) -> i64 {
        i64::try_from(self.inner.config.skip_step_ms).unwrap_or(i64::MAX)
    }
}

/// Stream of `member` signals from `interface` on the MPRIS object path.
async fn subscribe(
    connection: &Connection,
    interface: &'static str,
    member: &'static str,
) -> zbus::Result<MessageStream> {
    let rule = MatchRule::builder()
        .msg_type(MessageType::Signal)
        .interface(interface)?
        .member(member)?
        .path(MPRIS_OBJECT_PATH)?
        .build();

    MessageStream::for_match_rule(rule, connection, Some(UPDATE_QUEUE)).await
}

/// Guess an image MIME type from a file extension.
fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "image/jpeg",
    }
}

/// Inline local artwork as a `data:` URI; pass remote URLs through.
async fn resolve_artwork(url: &str) -> Result<Option<ArtworkRef>, MediaError> {
    let Some(file_path) = url.strip_prefix("file://") else {
        return Ok(Some(ArtworkRef(url.to_string())));
    };

    let file_path = urlencoding::decode(file_path)
        .map_err(|e| MediaError::ArtworkUnavailable(format!("{file_path}: {e}")))?;
    let path = Path::new(&*file_path);
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| MediaError::ArtworkUnavailable(format!("{}: {e}", path.display())))?;

    if bytes.is_empty() {
        return Ok(None);
    }

    Ok(Some(ArtworkRef(format!(
        "data:{};base64,{}",
        mime_for(path),
        BASE64.encode(bytes)
    ))))
}

#[async_trait]
impl MediaProvider for MprisProvider {
    async fn media_state(&self) -> Result<Option<MediaState>, MediaError> {
        let (player_id, proxy) = match self.active_player().await {
            Ok(active) => active,
            Err(MediaError::NoActivePlayer) => return Ok(None),
            Err(e) => return Err(e),
        };

        let status = proxy.playback_status().await?;
        let metadata = match proxy.metadata().await {
            Ok(map) => {
                let mut metadata = parse_metadata(&map);
                metadata.position_ms = proxy.position().await.ok().map(micros_to_ms);
                Some(metadata)
            }
            Err(e) => {
                debug!(player = %player_id, error = %e, "Player exposes no metadata");
                None
            }
        };

        Ok(Some(MediaState {
            source_app: player_id.bus_name().to_string(),
            state: PlaybackState::from(status.as_str()),
            metadata,
        }))
    }

    async fn artwork(&self) -> Result<Option<ArtworkRef>, MediaError> {
        let (_, proxy) = match self.active_player().await {
            Ok(active) => active,
            Err(MediaError::NoActivePlayer) => return Ok(None),
            Err(e) => return Err(e),
        };

        let metadata = parse_metadata(&proxy.metadata().await?);
        match metadata.artwork_url {
            Some(url) => resolve_artwork(&url).await,
            None => Ok(None),
        }
    }

    async fn play(&self) -> Result<(), MediaError> {
        self.control("Play", |proxy| async move { proxy.play().await })
            .await
    }

    async fn pause(&self) -> Result<(), MediaError> {
        self.control("Pause", |proxy| async move { proxy.pause().await })
            .await
    }

    async fn previous(&self) -> Result<(), MediaError> {
        self.control("Previous", |proxy| async move { proxy.previous().await })
            .await
    }

    async fn next(&self) -> Result<(), MediaError> {
        self.control("Next", |proxy| async move { proxy.next().await })
            .await
    }

    async fn rewind(&self) -> Result<(), MediaError> {
        self.seek_relative(-self.skip_step_ms()).await
    }

    async fn fast_forward(&self) -> Result<(), MediaError> {
        self.seek_relative(self.skip_step_ms()).await
    }

    async fn seek(&self, position_ms: u64) -> Result<(), MediaError> {
        let (_, proxy) = self.active_player().await?;
        let map = proxy.metadata().await?;
        let track_path = track_id(&map).ok_or_else(|| {
            MediaError::ControlFailed("Seek failed: current track has no id".to_string())
        })?;
        let track_object_path = ObjectPath::try_from(track_path.as_str())
            .map_err(|e| MediaError::ControlFailed(format!("Invalid track ID: {e}")))?;

        proxy
            .set_position(&track_object_path, ms_to_micros(position_ms))
            .await
            .map_err(|e| MediaError::ControlFailed(format!("Set position failed: {e}")))
    }

    async fn volume(&self) -> Result<Volume, MediaError> {
        let (_, proxy) = self.active_player().await?;
        Ok(Volume::new(proxy.volume().await?))
    }

    async fn set_volume(&self, volume: Volume) -> Result<(), MediaError> {
        let level = *volume;
        self.control("Set volume", |proxy| async move {
            proxy.set_volume(level).await
        })
        .await
    }

    fn updates(&self) -> Option<BoxStream<'static, MediaState>> {
        let provider = self.clone();

        let updates = stream! {
            let connection = &provider.inner.connection;
            let subscriptions = futures::try_join!(
                subscribe(connection, "org.freedesktop.DBus.Properties", "PropertiesChanged"),
                subscribe(connection, PLAYER_INTERFACE, "Seeked"),
            );

            let mut signals = match subscriptions {
                Ok((changes, seeks)) => futures::stream::select(changes, seeks).boxed(),
                Err(e) => {
                    warn!(error = %e, "Failed to subscribe to MPRIS signals");
                    return;
                }
            };

            info!("Subscribed to MPRIS property changes and seeks");

            while let Some(signal) = signals.next().await {
                if signal.is_err() {
                    continue;
                }

                match provider.media_state().await {
                    Ok(Some(state)) => yield state,
                    Ok(None) => {}
                    Err(e) => debug!(error = %e, "Failed to read state after property change"),
                }
            }

            debug!("MPRIS property change stream ended");
        };

        Some(updates.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for(Path::new("/tmp/cover.PNG")), "image/png");
        assert_eq!(mime_for(Path::new("/tmp/cover")), "image/jpeg");
    }

    #[tokio::test]
    async fn remote_artwork_passes_through() {
        let artwork = resolve_artwork("https://example.org/a.jpg").await.unwrap();
        assert_eq!(
            artwork,
            Some(ArtworkRef("https://example.org/a.jpg".to_string()))
        );
    }

    #[tokio::test]
    async fn local_artwork_becomes_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let artwork = resolve_artwork(&format!("file://{}", path.display()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(artwork.as_str(), "data:image/png;base64,AQID");
    }

    #[tokio::test]
    async fn local_artwork_path_is_percent_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let album = dir.path().join("My Music");
        std::fs::create_dir(&album).unwrap();
        std::fs::write(album.join("cover art.png"), [1u8, 2, 3]).unwrap();

        let url = format!(
            "file://{}/My%20Music/cover%20art.png",
            dir.path().display()
        );
        let artwork = resolve_artwork(&url).await.unwrap().unwrap();

        assert_eq!(artwork.as_str(), "data:image/png;base64,AQID");
    }

    #[tokio::test]
    async fn empty_local_artwork_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.jpg");
        std::fs::write(&path, b"").unwrap();

        let artwork = resolve_artwork(&format!("file://{}", path.display()))
            .await
            .unwrap();

        assert_eq!(artwork, None);
    }

    #[tokio::test]
    async fn missing_local_artwork_is_an_error() {
        let result = resolve_artwork("file:///definitely/not/here.png").await;
        assert!(matches!(result, Err(MediaError::ArtworkUnavailable(_))));
    }
}

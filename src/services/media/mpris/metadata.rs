use std::collections::HashMap;

use zbus::zvariant::{ObjectPath, OwnedValue};

use super::micros_to_ms;
use crate::services::media::MediaMetadata;

/// Raw MPRIS metadata dictionary.
pub(crate) type MetadataMap = HashMap<String, OwnedValue>;

fn string_value(value: &OwnedValue) -> Option<String> {
    if let Ok(s) = value.downcast_ref::<String>() {
        Some(s)
    } else if let Ok(s) = value.downcast_ref::<&str>() {
        Some(s.to_string())
    } else {
        None
    }
}

/// `xesam:artist` is a string list; some players send a plain string.
fn artists_value(value: &OwnedValue) -> Option<String> {
    if let Ok(array) = <&zbus::zvariant::Array>::try_from(value) {
        let artists: Vec<String> = array
            .iter()
            .filter_map(|artist| {
                if let Ok(s) = artist.downcast_ref::<String>() {
                    Some(s)
                } else if let Ok(s) = artist.downcast_ref::<&str>() {
                    Some(s.to_string())
                } else {
                    None
                }
            })
            .collect();

        if artists.is_empty() {
            None
        } else {
            Some(artists.join(", "))
        }
    } else {
        string_value(value)
    }
}

/// `mpris:length` is specified as x (i64) but u64 is common in the wild.
fn length_value(value: &OwnedValue) -> Option<u64> {
    if let Ok(micros) = value.downcast_ref::<i64>() {
        return (micros > 0).then(|| micros_to_ms(micros));
    }
    if let Ok(micros) = value.downcast_ref::<u64>() {
        return (micros > 0).then_some(micros / 1_000);
    }
    None
}

/// Parse an MPRIS metadata map. Position is read separately.
pub(crate) fn parse_metadata(metadata: &MetadataMap) -> MediaMetadata {
    let mut track = MediaMetadata::default();

    if let Some(title) = metadata.get("xesam:title").and_then(string_value) {
        track.title = title;
    }

    if let Some(artist) = metadata.get("xesam:artist").and_then(artists_value) {
        track.artist = artist;
    }

    track.album = metadata
        .get("xesam:album")
        .and_then(string_value)
        .filter(|album| !album.is_empty());

    track.artwork_url = metadata
        .get("mpris:artUrl")
        .and_then(string_value)
        .filter(|url| !url.is_empty());

    track.duration_ms = metadata.get("mpris:length").and_then(length_value);

    track
}

/// The `mpris:trackid` object path, needed for absolute seeks.
pub(crate) fn track_id(metadata: &MetadataMap) -> Option<String> {
    let value = metadata.get("mpris:trackid")?;

    if let Ok(path) = value.downcast_ref::<ObjectPath>() {
        return Some(path.to_string());
    }
    string_value(value)
}

#[cfg(test)]
mod tests {
    use zbus::zvariant::{Array, Value};

    use super::*;

    fn owned(value: Value<'_>) -> OwnedValue {
        value.try_into().unwrap()
    }

    #[test]
    fn parses_standard_fields() {
        let mut map = MetadataMap::new();
        map.insert("xesam:title".into(), owned(Value::from("Song")));
        map.insert(
            "xesam:artist".into(),
            owned(Value::from(Array::from(vec!["One", "Two"]))),
        );
        map.insert("xesam:album".into(), owned(Value::from("Record")));
        map.insert("mpris:length".into(), owned(Value::from(215_000_000i64)));

        let parsed = parse_metadata(&map);

        assert_eq!(parsed.title, "Song");
        assert_eq!(parsed.artist, "One, Two");
        assert_eq!(parsed.album.as_deref(), Some("Record"));
        assert_eq!(parsed.duration_ms, Some(215_000));
        assert_eq!(parsed.position_ms, None);
    }

    #[test]
    fn accepts_unsigned_length_and_plain_artist() {
        let mut map = MetadataMap::new();
        map.insert("xesam:artist".into(), owned(Value::from("Solo")));
        map.insert("mpris:length".into(), owned(Value::from(3_000_000u64)));

        let parsed = parse_metadata(&map);

        assert_eq!(parsed.artist, "Solo");
        assert_eq!(parsed.duration_ms, Some(3_000));
    }

    #[test]
    fn empty_art_url_is_absent() {
        let mut map = MetadataMap::new();
        map.insert("mpris:artUrl".into(), owned(Value::from("")));

        assert_eq!(parse_metadata(&map).artwork_url, None);
    }

    #[test]
    fn reads_object_path_track_id() {
        let mut map = MetadataMap::new();
        let path = ObjectPath::try_from("/org/mpris/MediaPlayer2/Track/7").unwrap();
        map.insert("mpris:trackid".into(), owned(Value::from(path)));

        assert_eq!(
            track_id(&map).as_deref(),
            Some("/org/mpris/MediaPlayer2/Track/7")
        );
    }
}

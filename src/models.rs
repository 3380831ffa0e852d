//! Catalog data models

use serde::Serialize;
use std::collections::BTreeMap;

/// Offset added to radio channel and group ids so they never collide with TV ids
pub const RADIO_ID_OFFSET: i32 = 1_000_000;

/// Unique id used when the provider gave no usable channel number
pub const INVALID_UNIQUE_ID: i32 = -1;

/// Channel as loaded from the provider catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Channel {
    /// Host-facing id: channel number, offset for radio
    pub unique_id: i32,
    pub channel_number: i32,
    pub name: String,
    pub stream_url: String,
    /// Final logo path after logo resolution
    pub logo_path: String,
    pub tag_id: String,
    /// Name with spaces replaced by underscores
    pub tag_name: String,
    /// Logo reference exactly as the provider sent it
    pub tag_logo: String,
    /// Per-channel EPG shift in minutes
    pub time_shift: i32,
    pub radio: bool,
    pub encryption_system: i32,
    /// Extra scalar attributes the provider attached to the channel
    pub properties: BTreeMap<String, String>,
}

/// Channel group with membership as indices into the channel list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChannelGroup {
    pub id: i32,
    pub name: String,
    pub radio: bool,
    pub members: Vec<usize>,
}

/// A single programme from the EPG feed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EpgEntry {
    /// Sequential per fetch, starting at 1
    pub broadcast_id: i32,
    pub start: i64,
    pub end: i64,
    pub title: String,
    pub plot: String,
    pub plot_outline: String,
    /// Free-text genre label
    pub genre: String,
    pub icon_path: String,
}

/// EPG container for one channel, keyed by the channel number string
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EpgChannel {
    pub id: String,
    pub name: String,
    pub radio: bool,
    pub entries: Vec<EpgEntry>,
}

impl EpgChannel {
    pub fn for_channel(channel: &Channel) -> Self {
        Self {
            id: channel.channel_number.to_string(),
            name: channel.name.clone(),
            radio: channel.radio,
            entries: Vec::new(),
        }
    }
}

/// Apply the radio namespace offset to a provider id
pub fn namespaced_id(id: i32, radio: bool) -> i32 {
    if radio {
        id + RADIO_ID_OFFSET
    } else {
        id
    }
}

/// Derive the tag name used for EPG matching
pub fn tag_name_for(name: &str) -> String {
    name.replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced_id() {
        assert_eq!(namespaced_id(7, false), 7);
        assert_eq!(namespaced_id(7, true), 1_000_007);
    }

    #[test]
    fn test_tag_name_for() {
        assert_eq!(tag_name_for("Das Erste HD"), "Das_Erste_HD");
        assert_eq!(tag_name_for("ZDF"), "ZDF");
    }

    #[test]
    fn test_epg_channel_for_channel() {
        let channel = Channel {
            channel_number: 42,
            name: "Arte".to_string(),
            radio: true,
            ..Default::default()
        };
        let epg = EpgChannel::for_channel(&channel);
        assert_eq!(epg.id, "42");
        assert_eq!(epg.name, "Arte");
        assert!(epg.radio);
        assert!(epg.entries.is_empty());
    }
}

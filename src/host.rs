//! Host-facing transfer records
//!
//! The host owns buffering of everything we hand it. Records are emitted one
//! at a time through [`HostSink::emit`], with string fields already cut down
//! to the host's fixed buffer sizes.

use crate::models::{Channel, ChannelGroup, EpgEntry};
use serde::Serialize;

/// Size of the host's fixed string buffers, terminator included
pub const HOST_STRING_LENGTH: usize = 1024;

/// Receiver for records produced by host queries
pub trait HostSink {
    fn emit(&mut self, transfer: Transfer);
}

impl HostSink for Vec<Transfer> {
    fn emit(&mut self, transfer: Transfer) {
        self.push(transfer);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transfer {
    Channel(PvrChannel),
    ChannelGroup(PvrChannelGroup),
    ChannelGroupMember(PvrChannelGroupMember),
    EpgTag(EpgTag),
    TriggerChannelUpdate,
    TriggerChannelGroupsUpdate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PvrChannel {
    pub unique_id: i32,
    pub is_radio: bool,
    pub channel_number: i32,
    pub channel_name: String,
    pub encryption_system: i32,
    pub icon_path: String,
    pub is_hidden: bool,
}

impl From<&Channel> for PvrChannel {
    fn from(channel: &Channel) -> Self {
        Self {
            unique_id: channel.unique_id,
            is_radio: channel.radio,
            channel_number: channel.channel_number,
            channel_name: host_string(&channel.name),
            encryption_system: channel.encryption_system,
            icon_path: host_string(&channel.logo_path),
            is_hidden: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PvrChannelGroup {
    pub group_name: String,
    pub is_radio: bool,
    /// Not supported, always 0
    pub position: u32,
}

impl From<&ChannelGroup> for PvrChannelGroup {
    fn from(group: &ChannelGroup) -> Self {
        Self {
            group_name: host_string(&group.name),
            is_radio: group.radio,
            position: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PvrChannelGroupMember {
    pub group_name: String,
    pub channel_unique_id: i32,
    pub channel_number: i32,
}

impl PvrChannelGroupMember {
    pub fn new(group_name: &str, channel: &Channel) -> Self {
        Self {
            group_name: host_string(group_name),
            channel_unique_id: channel.unique_id,
            channel_number: channel.channel_number,
        }
    }
}

/// Genre reporting; the provider feed only carries free text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Genre {
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpgTag {
    pub broadcast_id: i32,
    pub unique_channel_id: i32,
    pub title: String,
    pub start_time: i64,
    pub end_time: i64,
    pub plot_outline: String,
    pub plot: String,
    pub icon_path: String,
    pub genre: Genre,
    pub original_title: Option<String>,
    pub cast: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub year: i32,
    pub imdb_number: Option<String>,
    pub parental_rating: i32,
    pub star_rating: i32,
    pub notify: bool,
    pub series_number: i32,
    pub episode_number: i32,
    pub episode_part_number: i32,
    pub episode_name: Option<String>,
}

impl EpgTag {
    /// Build a tag from an entry whose times are already shifted
    pub fn new(entry: &EpgEntry, unique_channel_id: i32) -> Self {
        Self {
            broadcast_id: entry.broadcast_id,
            unique_channel_id,
            title: entry.title.clone(),
            start_time: entry.start,
            end_time: entry.end,
            plot_outline: entry.plot_outline.clone(),
            plot: entry.plot.clone(),
            icon_path: entry.icon_path.clone(),
            genre: Genre::Text(entry.genre.clone()),
            original_title: None,
            cast: None,
            director: None,
            writer: None,
            year: 0,
            imdb_number: None,
            parental_rating: 0,
            star_rating: 0,
            notify: false,
            series_number: 0,
            episode_number: 0,
            episode_part_number: 0,
            episode_name: None,
        }
    }
}

/// Truncate to fit a fixed host buffer without splitting a character
pub fn host_string(value: &str) -> String {
    truncate_bytes(value, HOST_STRING_LENGTH - 1).to_string()
}

fn truncate_bytes(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }

    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_string_short_values_untouched() {
        assert_eq!(host_string("Das Erste"), "Das Erste");
    }

    #[test]
    fn test_host_string_truncates() {
        let long = "a".repeat(2000);
        assert_eq!(host_string(&long).len(), HOST_STRING_LENGTH - 1);
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        // 'ä' is two bytes; a cut at 3 bytes would split the second one
        assert_eq!(truncate_bytes("ääb", 3), "ä");
        assert_eq!(truncate_bytes("ääb", 4), "ää");
    }

    #[test]
    fn test_channel_record() {
        let channel = Channel {
            unique_id: 1_000_003,
            channel_number: 3,
            name: "x".repeat(1500),
            logo_path: "/srv/logos/x.png".to_string(),
            radio: true,
            ..Default::default()
        };
        let record = PvrChannel::from(&channel);
        assert_eq!(record.unique_id, 1_000_003);
        assert!(record.is_radio);
        assert_eq!(record.channel_name.len(), 1023);
        assert_eq!(record.icon_path, "/srv/logos/x.png");
        assert!(!record.is_hidden);
    }

    #[test]
    fn test_epg_tag_rich_fields_absent() {
        let entry = EpgEntry {
            broadcast_id: 4,
            start: 100,
            end: 200,
            title: "Tatort".to_string(),
            genre: "Krimi".to_string(),
            ..Default::default()
        };
        let tag = EpgTag::new(&entry, 12);
        assert_eq!(tag.unique_channel_id, 12);
        assert_eq!(tag.genre, Genre::Text("Krimi".to_string()));
        assert!(tag.cast.is_none() && tag.director.is_none() && tag.episode_name.is_none());
        assert_eq!((tag.year, tag.series_number, tag.episode_number), (0, 0, 0));
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<Transfer> = Vec::new();
        sink.emit(Transfer::TriggerChannelUpdate);
        assert_eq!(sink, vec![Transfer::TriggerChannelUpdate]);
    }
}

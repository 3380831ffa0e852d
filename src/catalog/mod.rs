//! In-memory catalog: channels, groups and their EPG containers
//!
//! Lookups are linear scans; catalogs are tens to a few hundred channels.

mod loader;
mod logos;

pub use loader::{parse_catalog, CatalogLoader};
pub use logos::{apply_channel_logos, path_combine, resolve_logo};

use crate::models::{tag_name_for, Channel, ChannelGroup, EpgChannel};

/// One generation of catalog data. Group membership indices are only
/// valid against the `channels` of the same generation.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub channels: Vec<Channel>,
    pub groups: Vec<ChannelGroup>,
    pub epg: Vec<EpgChannel>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.channels.clear();
        self.groups.clear();
        self.epg.clear();
    }

    /// Recreate one empty EPG container per channel
    pub fn rebuild_epg_channels(&mut self) {
        self.epg = self.channels.iter().map(EpgChannel::for_channel).collect();
    }

    pub fn channels(&self, radio: bool) -> impl Iterator<Item = &Channel> {
        self.channels.iter().filter(move |c| c.radio == radio)
    }

    pub fn groups(&self, radio: bool) -> impl Iterator<Item = &ChannelGroup> {
        self.groups.iter().filter(move |g| g.radio == radio)
    }

    pub fn channel(&self, unique_id: i32) -> Option<&Channel> {
        self.channels.iter().find(|c| c.unique_id == unique_id)
    }

    /// Find a channel by tag id, tag name or display name.
    ///
    /// Channels are scanned once and each is tested against every key in that
    /// order, so an earlier channel matching a later key wins over a later
    /// channel matching the tag id. Name keys are skipped when `name` is empty.
    pub fn find_channel(&self, tag_id: &str, name: &str) -> Option<&Channel> {
        let tag_name = tag_name_for(name);

        self.channels.iter().find(|c| {
            if !tag_id.is_empty() && c.tag_id == tag_id {
                return true;
            }
            !name.is_empty() && (c.tag_name == tag_name || c.name == name)
        })
    }

    pub fn find_group(&self, name: &str, radio: bool) -> Option<&ChannelGroup> {
        self.groups.iter().find(|g| g.name == name && g.radio == radio)
    }

    pub fn find_group_by_id(&self, id: i32) -> Option<&ChannelGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Index of the EPG container keyed by `id` (case-insensitive)
    pub fn find_epg(&self, id: &str, radio: bool) -> Option<usize> {
        self.epg
            .iter()
            .position(|e| e.radio == radio && e.id.eq_ignore_ascii_case(id))
    }

    /// Index of the EPG container matching a channel by tag id, tag name or
    /// display name, testing every key per container in a single scan
    pub fn find_epg_for_channel(&self, channel: &Channel) -> Option<usize> {
        self.epg.iter().position(|e| {
            if e.radio != channel.radio {
                return false;
            }
            if !channel.tag_id.is_empty() && e.id == channel.tag_id {
                return true;
            }
            tag_name_for(&e.name) == channel.tag_name
                || e.name == channel.tag_name
                || e.name == channel.name
        })
    }

    /// EPG container used for a channel: number key first, then the name chain
    pub fn epg_index_for(&self, channel: &Channel) -> Option<usize> {
        self.find_epg(&channel.channel_number.to_string(), channel.radio)
            .or_else(|| self.find_epg_for_channel(channel))
    }
}

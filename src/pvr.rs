//! PVR backend state and the host query entry points
//!
//! All catalog data sits behind one lock. Reloads hold it exclusively for
//! their whole duration, so readers see either the old or the new
//! generation and never a half-built one.

use crate::api::Fetcher;
use crate::catalog::{Catalog, CatalogLoader};
use crate::config::Settings;
use crate::epg::{shift_window, EpgLoader};
use crate::error::Result;
use crate::host::{
    EpgTag, HostSink, PvrChannel, PvrChannelGroup, PvrChannelGroupMember, Transfer,
};
use crate::models::{Channel, ChannelGroup};
use parking_lot::RwLock;
use std::sync::Arc;

pub struct PvrData {
    settings: Settings,
    fetcher: Arc<dyn Fetcher>,
    catalog: RwLock<Catalog>,
}

impl PvrData {
    /// Create the backend and perform the initial catalog load.
    /// A failed load is logged and leaves the catalog empty.
    pub fn new(settings: Settings, fetcher: Arc<dyn Fetcher>) -> Self {
        let data = Self {
            settings,
            fetcher,
            catalog: RwLock::new(Catalog::new()),
        };

        match data.load_playlist() {
            Ok(catalog) => *data.catalog.write() = catalog,
            Err(e) => log::error!("Cannot load channels - {}", e),
        }

        data
    }

    /// Build a complete catalog generation: TV, then radio when configured
    fn load_playlist(&self) -> Result<Catalog> {
        let loader = CatalogLoader::new(self.fetcher.as_ref(), &self.settings.logo_path);
        let mut catalog = Catalog::new();

        loader.load(&mut catalog, &self.settings.rest_url, false)?;
        if !self.settings.radio_rest_url.is_empty() {
            loader.load(&mut catalog, &self.settings.radio_rest_url, true)?;
        }

        catalog.rebuild_epg_channels();
        log::info!("Loaded {} channels.", catalog.channels.len());
        Ok(catalog)
    }

    /// Reload the catalog. The previous generation stays in place when the
    /// load fails. Emits the host update triggers on success.
    pub fn reload_playlist(&self, sink: &mut dyn HostSink) -> bool {
        {
            let mut catalog = self.catalog.write();
            match self.load_playlist() {
                Ok(fresh) => *catalog = fresh,
                Err(e) => {
                    log::error!("Cannot reload channels - {}", e);
                    return false;
                }
            }
        }

        sink.emit(Transfer::TriggerChannelGroupsUpdate);
        sink.emit(Transfer::TriggerChannelUpdate);
        true
    }

    pub fn channels_amount(&self) -> usize {
        self.catalog.read().channels.len()
    }

    pub fn channel_groups_amount(&self) -> usize {
        self.catalog.read().groups.len()
    }

    pub fn get_channels(&self, sink: &mut dyn HostSink, radio: bool) {
        let records: Vec<PvrChannel> = self
            .catalog
            .read()
            .channels(radio)
            .map(PvrChannel::from)
            .collect();

        for record in records {
            sink.emit(Transfer::Channel(record));
        }
    }

    /// Channel with its stream URL, for playback
    pub fn get_channel(&self, unique_id: i32) -> Option<Channel> {
        self.catalog.read().channel(unique_id).cloned()
    }

    pub fn find_channel(&self, tag_id: &str, name: &str) -> Option<Channel> {
        self.catalog.read().find_channel(tag_id, name).cloned()
    }

    pub fn find_group(&self, name: &str, radio: bool) -> Option<ChannelGroup> {
        self.catalog.read().find_group(name, radio).cloned()
    }

    pub fn get_channel_groups(&self, sink: &mut dyn HostSink, radio: bool) {
        let records: Vec<PvrChannelGroup> = self
            .catalog
            .read()
            .groups(radio)
            .map(PvrChannelGroup::from)
            .collect();

        for record in records {
            sink.emit(Transfer::ChannelGroup(record));
        }
    }

    pub fn get_channel_group_members(
        &self,
        sink: &mut dyn HostSink,
        group_name: &str,
        radio: bool,
    ) {
        let records: Vec<PvrChannelGroupMember> = {
            let catalog = self.catalog.read();
            let Some(group) = catalog.find_group(group_name, radio) else {
                return;
            };

            group
                .members
                .iter()
                .filter_map(|&index| catalog.channels.get(index))
                .map(|channel| PvrChannelGroupMember::new(group_name, channel))
                .collect()
        };

        for record in records {
            sink.emit(Transfer::ChannelGroupMember(record));
        }
    }

    /// Refetch a channel's programmes for `[start, end)` and emit the shifted
    /// entries. Unknown channels emit nothing. Returns the number of tags emitted.
    pub fn get_epg_for_channel(
        &self,
        sink: &mut dyn HostSink,
        unique_id: i32,
        start: i64,
        end: i64,
    ) -> usize {
        let (channel, entries) = {
            let mut catalog = self.catalog.write();

            let Some(channel) = catalog.channel(unique_id).cloned() else {
                return 0;
            };
            let Some(index) = catalog.epg_index_for(&channel) else {
                log::warn!("Cannot find epg channel for {}", channel.name);
                return 0;
            };

            catalog.epg[index].entries.clear();

            let loader =
                EpgLoader::new(self.fetcher.as_ref(), self.settings.epg_url(channel.radio));
            let loaded =
                loader.load(&mut catalog, channel.channel_number, channel.radio, start, end);
            if let Err(e) = loaded {
                log::error!("Cannot load epg - {}", e);
            }

            let shift = self.settings.effective_shift(channel.time_shift);
            let entries = shift_window(&catalog.epg[index].entries, shift, start, end);
            (channel, entries)
        };

        for entry in &entries {
            sink.emit(Transfer::EpgTag(EpgTag::new(entry, channel.unique_id)));
        }

        entries.len()
    }
}

#[cfg(test)]
#[path = "pvr_tests.rs"]
mod tests;

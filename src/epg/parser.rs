//! EPG window loader for the provider's per-channel programme list
//! Requests one channel/time window and appends the parsed programmes
//! to that channel's EPG container.

use crate::api::{epg_window_url, Fetcher};
use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::models::EpgEntry;
use serde_json::{Map, Value};

pub struct EpgLoader<'a> {
    fetcher: &'a dyn Fetcher,
    base_url: &'a str,
}

impl<'a> EpgLoader<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, base_url: &'a str) -> Self {
        Self { fetcher, base_url }
    }

    /// Fetch programmes for `[start, end]` and append them to the channel's
    /// EPG container. Returns the number of entries added.
    pub fn load(
        &self,
        catalog: &mut Catalog,
        channel_number: i32,
        radio: bool,
        start: i64,
        end: i64,
    ) -> Result<usize> {
        if catalog.epg.is_empty() {
            return Err(Error::EpgNotLoaded);
        }

        let url = epg_window_url(self.base_url, channel_number, start, end);
        let body = self.fetcher.fetch(&url)?;
        let entries = parse_epg(&body)?;

        let key = channel_number.to_string();
        let index = catalog
            .find_epg(&key, radio)
            .ok_or(Error::EpgChannelNotFound(key))?;

        let count = entries.len();
        catalog.epg[index].entries.extend(entries);

        log::info!("EPG loaded: {} entries for channel {}", count, channel_number);
        Ok(count)
    }
}

/// Parse a programme list. Broadcast ids restart at 1 for every call.
pub fn parse_epg(body: &str) -> Result<Vec<EpgEntry>> {
    let doc: Value = serde_json::from_str(body)?;
    let events = doc.as_array().ok_or(Error::InvalidFormat("array"))?;

    let mut entries = Vec::with_capacity(events.len());
    for event in events {
        let Some(obj) = event.as_object() else {
            log::warn!("EPG event format is wrong - skip event: {}", event);
            continue;
        };

        entries.push(EpgEntry {
            broadcast_id: entries.len() as i32 + 1,
            start: time_field(obj, "programStartTime"),
            end: time_field(obj, "programEndTime"),
            title: str_field(obj, "programTitle"),
            plot: str_field(obj, "programDescLong"),
            plot_outline: String::new(),
            genre: str_field(obj, "categories"),
            icon_path: String::new(),
        });
    }

    Ok(entries)
}

fn time_field(obj: &Map<String, Value>, field: &str) -> i64 {
    obj.get(field).and_then(|v| v.as_i64()).unwrap_or(0)
}

fn str_field(obj: &Map<String, Value>, field: &str) -> String {
    obj.get(field)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

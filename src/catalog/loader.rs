//! Catalog loader for the provider's channel/group JSON document

use super::logos::apply_channel_logos;
use super::Catalog;
use crate::api::Fetcher;
use crate::error::{Error, Result};
use crate::models::{namespaced_id, tag_name_for, Channel, ChannelGroup, INVALID_UNIQUE_ID};
use serde_json::{Map, Value};

/// Channel fields consumed into typed columns, everything else lands in `properties`
const CHANNEL_FIELDS: [&str; 7] = [
    "channel_number",
    "name",
    "url",
    "logo",
    "group",
    "tvg_id",
    "tvg_shift",
];

pub struct CatalogLoader<'a> {
    fetcher: &'a dyn Fetcher,
    logo_path: &'a str,
}

impl<'a> CatalogLoader<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, logo_path: &'a str) -> Self {
        Self { fetcher, logo_path }
    }

    /// Fetch one catalog variant and append it to `catalog`.
    ///
    /// On error `catalog` may hold nothing new from this call, but callers
    /// should still treat it as invalid and discard it.
    pub fn load(&self, catalog: &mut Catalog, url: &str, radio: bool) -> Result<usize> {
        let body = self.fetcher.fetch(url)?;
        let count = parse_catalog(catalog, &body, radio)?;
        apply_channel_logos(&mut catalog.channels, self.logo_path);
        Ok(count)
    }
}

/// Parse a catalog document and append its groups and channels.
///
/// Top-level shape is validated before anything is appended. Returns the
/// number of channels added.
pub fn parse_catalog(catalog: &mut Catalog, body: &str, radio: bool) -> Result<usize> {
    let doc: Value = serde_json::from_str(body)?;
    let root = doc.as_object().ok_or(Error::InvalidFormat("object"))?;

    let groups = required_array(root, "groups")?;
    let channels = required_array(root, "channels")?;

    if channels.is_empty() {
        return Err(Error::EmptyCatalog);
    }

    for g in groups {
        match parse_group(g, radio) {
            Some(group) => catalog.groups.push(group),
            None => log::warn!("Group format is wrong - skip group: {}", g),
        }
    }

    let mut added = 0;
    for c in channels {
        let Some(obj) = c.as_object() else {
            log::warn!("Channel format is wrong - skip channel: {}", c);
            continue;
        };

        let channel = parse_channel(obj, radio);
        let index = catalog.channels.len();

        if let Some(group_id) = int_field(obj, "group") {
            let group_id = namespaced_id(group_id, radio);
            match catalog.groups.iter_mut().find(|g| g.id == group_id) {
                Some(group) => group.members.push(index),
                None => {
                    log::debug!("Channel {} references unknown group {}", channel.name, group_id)
                }
            }
        }

        catalog.channels.push(channel);
        added += 1;
    }

    if added == 0 {
        return Err(Error::EmptyCatalog);
    }

    Ok(added)
}

fn required_array<'v>(root: &'v Map<String, Value>, field: &'static str) -> Result<&'v Vec<Value>> {
    root.get(field)
        .ok_or(Error::MissingField(field))?
        .as_array()
        .ok_or(Error::NotAnArray(field))
}

fn parse_group(value: &Value, radio: bool) -> Option<ChannelGroup> {
    let id = value.get("id").and_then(as_int)?;
    let name = value.get("name").and_then(|v| v.as_str())?;

    Some(ChannelGroup {
        id: namespaced_id(id, radio),
        name: name.to_string(),
        radio,
        members: Vec::new(),
    })
}

fn parse_channel(obj: &Map<String, Value>, radio: bool) -> Channel {
    let number = int_field(obj, "channel_number");
    let name = str_field(obj, "name");
    let logo = str_field(obj, "logo");

    let properties = obj
        .iter()
        .filter(|(key, _)| !CHANNEL_FIELDS.contains(&key.as_str()))
        .filter_map(|(key, value)| scalar_to_string(value).map(|v| (key.clone(), v)))
        .collect();

    Channel {
        unique_id: number.map_or(INVALID_UNIQUE_ID, |n| namespaced_id(n, radio)),
        channel_number: number.unwrap_or(0),
        tag_name: tag_name_for(&name),
        name,
        stream_url: str_field(obj, "url"),
        logo_path: logo.clone(),
        tag_logo: logo,
        tag_id: str_field(obj, "tvg_id"),
        time_shift: int_field(obj, "tvg_shift").unwrap_or(0),
        radio,
        encryption_system: 0,
        properties,
    }
}

fn as_int(value: &Value) -> Option<i32> {
    value.as_i64().and_then(|v| i32::try_from(v).ok())
}

fn int_field(obj: &Map<String, Value>, field: &str) -> Option<i32> {
    obj.get(field).and_then(as_int)
}

fn str_field(obj: &Map<String, Value>, field: &str) -> String {
    obj.get(field)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

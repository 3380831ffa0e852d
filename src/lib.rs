//! PVR backend for IPTV providers exposing a JSON channel catalog and a
//! per-channel EPG endpoint.

pub mod api;
pub mod catalog;
pub mod config;
pub mod epg;
pub mod error;
pub mod host;
pub mod models;
pub mod pvr;

pub use api::{Fetcher, RestClient};
pub use config::Settings;
pub use error::{Error, Result};
pub use host::{HostSink, Transfer};
pub use pvr::PvrData;

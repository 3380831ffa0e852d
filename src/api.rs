//! REST client for the provider's catalog and EPG endpoints

use crate::config::Settings;
use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use std::io::Read;
use std::time::Duration;

/// Anything that can turn a URL into a response body
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String>;
}

pub struct RestClient {
    agent: ureq::Agent,
    user_agent: String,
}

impl RestClient {
    pub fn new(user_agent: &str, connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(read_timeout_secs)))
            .timeout_connect(Some(Duration::from_secs(connect_timeout_secs)))
            .max_idle_connections(4)
            .max_idle_connections_per_host(2)
            .build()
            .new_agent();

        Self {
            agent,
            user_agent: user_agent.to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            &settings.user_agent,
            settings.connect_timeout_secs,
            settings.read_timeout_secs,
        )
    }
}

impl Fetcher for RestClient {
    fn fetch(&self, url: &str) -> Result<String> {
        let url = url.trim();
        log::debug!("GET {}", url);

        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(format!("HTTP error: {}", status)));
        }

        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| Error::Http(format!("Read failed: {}", e)))?;

        decode_body(body)
    }
}

/// Turn raw response bytes into text, inflating gzip payloads
pub(crate) fn decode_body(body: Vec<u8>) -> Result<String> {
    // gzip magic bytes
    if body.len() >= 2 && body[0] == 0x1f && body[1] == 0x8b {
        let mut text = String::new();
        GzDecoder::new(body.as_slice()).read_to_string(&mut text)?;
        return Ok(text);
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Build the EPG request URL for one channel and time window
pub fn epg_window_url(base: &str, channel_number: i32, start: i64, end: i64) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!(
        "{}{}channel_number={}&start_time={}&end_time={}",
        base.trim(),
        separator,
        channel_number,
        start,
        end
    )
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// In-memory fetcher keyed by URL, counting requests
    #[derive(Default)]
    pub struct StaticFetcher {
        bodies: Mutex<HashMap<String, String>>,
        requests: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(self, url: &str, body: &str) -> Self {
            self.set(url, body);
            self
        }

        pub fn set(&self, url: &str, body: &str) {
            self.bodies.lock().insert(url.to_string(), body.to_string());
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().clone()
        }
    }

    impl Fetcher for StaticFetcher {
        fn fetch(&self, url: &str) -> Result<String> {
            self.requests.lock().push(url.to_string());
            self.bodies
                .lock()
                .get(url)
                .cloned()
                .ok_or_else(|| Error::Http(format!("HTTP error: 404 Not Found ({})", url)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_epg_window_url() {
        assert_eq!(
            epg_window_url("http://tv.local/epg", 5, 100, 200),
            "http://tv.local/epg?channel_number=5&start_time=100&end_time=200"
        );
        assert_eq!(
            epg_window_url("http://tv.local/epg?token=abc", 5, 100, 200),
            "http://tv.local/epg?token=abc&channel_number=5&start_time=100&end_time=200"
        );
    }

    #[test]
    fn test_decode_plain_body() {
        let text = decode_body(br#"{"groups":[]}"#.to_vec()).unwrap();
        assert_eq!(text, r#"{"groups":[]}"#);
    }

    #[test]
    fn test_decode_gzip_body() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"[1,2,3]").unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(decode_body(compressed).unwrap(), "[1,2,3]");
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlerConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_page_buffer")]
    pub page_buffer: usize,

    #[serde(default = "default_concurrent_downloads")]
    pub concurrent_downloads: usize,

    #[serde(default = "default_retry_times")]
    pub retry_times: usize,

    #[serde(default = "default_retry_http_codes")]
    pub retry_http_codes: Vec<u16>,

    /// Per request timeout, in seconds
    #[serde(default = "default_download_timeout")]
    pub download_timeout: f32,

    #[serde(default = "default_on_dl_error")]
    pub on_dl_error: OnError,

    #[serde(default = "default_on_scrap_error")]
    pub on_scrap_error: OnError,

    #[serde(default = "default_handle_sigint")]
    pub handle_sigint: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            page_buffer: default_page_buffer(),
            concurrent_downloads: default_concurrent_downloads(),
            retry_times: default_retry_times(),
            retry_http_codes: default_retry_http_codes(),
            download_timeout: default_download_timeout(),
            on_dl_error: default_on_dl_error(),
            on_scrap_error: default_on_scrap_error(),
            handle_sigint: default_handle_sigint(),
        }
    }
}

impl CrawlerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f32(self.download_timeout.max(0.))
    }

    pub fn should_retry(&self, status: u16) -> bool {
        self.retry_http_codes.contains(&status)
    }
}

fn default_user_agent() -> String {
    String::from("Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0")
}

fn default_page_buffer() -> usize {
    10_000
}

fn default_concurrent_downloads() -> usize {
    16
}

fn default_retry_times() -> usize {
    2
}

fn default_retry_http_codes() -> Vec<u16> {
    vec![500, 502, 503, 504, 522, 524, 408, 429]
}

fn default_download_timeout() -> f32 {
    180.
}

fn default_on_dl_error() -> OnError {
    OnError::SkipAndLog
}

fn default_on_scrap_error() -> OnError {
    OnError::SkipAndLog
}

fn default_handle_sigint() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ArgEnum))]
pub enum OnError {
    Fail,
    SkipAndLog,
}

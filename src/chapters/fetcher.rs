//! Watch-page chapter fetcher
//!
//! YouTube does not expose chapter markers through a public endpoint; they
//! live as timestamp lines in the video description. The description itself
//! is embedded in the watch page as part of the player-response JSON.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use super::{Chapter, ChapterParser, ChapterSource};
use crate::config::FetchConfig;
use std::time::Duration;

const WATCH_URL: &str = "https://www.youtube.com/watch";
const DESCRIPTION_KEY: &str = "\"shortDescription\":\"";

/// Fetches chapters by scraping the watch-page description
#[derive(Debug, Clone)]
pub struct YouTubeChapterFetcher {
    client: Client,
    parser: ChapterParser,
}

impl YouTubeChapterFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            parser: ChapterParser::new(),
        }
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String> {
        let url = Url::parse_with_params(WATCH_URL, &[("v", video_id)])?;
        debug!("Fetching watch page: {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "watch page request for {} failed with {}",
                video_id,
                response.status()
            ));
        }

        Ok(response.text().await?)
    }

    /// Pull the video description out of the player-response JSON embedded in
    /// one of the page's script tags.
    fn extract_description(html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("script").ok()?;

        for script in document.select(&selector) {
            let text = script.text().collect::<String>();
            if let Some(description) = Self::description_from_script(&text) {
                return Some(description);
            }
        }

        None
    }

    fn description_from_script(script: &str) -> Option<String> {
        let start = script.find(DESCRIPTION_KEY)? + DESCRIPTION_KEY.len();
        let tail = &script[start..];

        // Walk to the closing quote, honoring backslash escapes.
        let mut end = None;
        let mut escaped = false;
        for (index, ch) in tail.char_indices() {
            match ch {
                '\\' if !escaped => escaped = true,
                '"' if !escaped => {
                    end = Some(index);
                    break;
                }
                _ => escaped = false,
            }
        }

        let raw = &tail[..end?];
        // The slice is a JSON string body; let serde undo the escapes.
        serde_json::from_str::<String>(&format!("\"{}\"", raw)).ok()
    }
}

#[async_trait]
impl ChapterSource for YouTubeChapterFetcher {
    async fn fetch_chapters(&self, video_id: &str) -> Result<Vec<Chapter>> {
        let html = self.fetch_watch_page(video_id).await?;

        let description = match Self::extract_description(&html) {
            Some(description) => description,
            None => {
                warn!("⚠️ No description found on watch page for {}", video_id);
                return Ok(Vec::new());
            }
        };

        let chapters = self.parser.parse_description(&description);
        if chapters.is_empty() {
            info!("📭 No chapter markers in description for {}", video_id);
        } else {
            info!("📚 Found {} chapters for {}", chapters.len(), video_id);
        }

        Ok(chapters)
    }
}

//! Client for the third-party Twitter/X replies endpoint.
//!
//! One GET per call, keyed by `tweetId`, authenticated with an `X-API-Key`
//! header. Transport failures degrade to an empty reply list; malformed
//! content and file errors are returned to the caller.
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use replyfetch_common::{ReplyFetchError, Result};
use replyfetch_config::EndpointConfig;
use replyfetch_http::{Auth, HttpClient, HttpError, HttpResponse, RequestOpts};
use serde_json::Value;

use crate::twitter::extract::extract_replies;
use crate::twitter::types::{FetchResult, ReplyRecord};

pub const DEFAULT_MAX_REPLIES: u32 = 100;

const API_KEY_HEADER: &str = "X-API-Key";
const POST_ID_PARAM: &str = "tweetId";

#[derive(Clone, Debug)]
pub struct RepliesApi {
    http: HttpClient,
    config: EndpointConfig,
}

impl RepliesApi {
    pub fn new(config: EndpointConfig) -> Result<Self> {
        let http = HttpClient::new()
            .map_err(|e| ReplyFetchError::Config(format!("HttpClient init failed: {e}")))?
            .with_timeout(config.timeout());
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Fetch the replies to `post_id`.
    ///
    /// `max_replies` is advisory: it defaults to [`DEFAULT_MAX_REPLIES`] and is
    /// only logged, the upstream page size decides how many replies come back.
    pub async fn fetch_replies(
        &self,
        post_id: &str,
        max_replies: Option<u32>,
    ) -> Result<Vec<ReplyRecord>> {
        if post_id.is_empty() {
            return Err(ReplyFetchError::InvalidPostId);
        }
        let max_replies = max_replies.unwrap_or(DEFAULT_MAX_REPLIES);
        tracing::info!(post_id, max_replies, "Starting to fetch replies");

        // Any error here means no response arrived; body decoding happens below.
        let resp = match self.request_replies(post_id).await {
            Ok(resp) => resp,
            Err(err) => {
                tracing::error!(post_id, error = ?err, "API request failed for post {post_id}: {err}");
                return Ok(Vec::new());
            }
        };

        tracing::info!(post_id, status = %resp.status, "Response status");
        tracing::info!(post_id, body = %resp.text(), "Response content");

        let body: Value = resp
            .json()
            .map_err(|e| ReplyFetchError::Content(e.to_string()))?;

        match extract_replies(&body)? {
            Some(replies) => {
                tracing::info!(
                    post_id,
                    count = replies.len(),
                    "Successfully fetched {} replies for post {post_id}",
                    replies.len()
                );
                Ok(replies)
            }
            None => {
                tracing::info!(post_id, "No replies found for post {post_id}");
                Ok(Vec::new())
            }
        }
    }

    /// [`fetch_replies`](Self::fetch_replies) stamped with the local fetch time.
    pub async fn fetch_with_metadata(
        &self,
        post_id: &str,
        max_replies: Option<u32>,
    ) -> Result<FetchResult> {
        let replies = self.fetch_replies(post_id, max_replies).await?;
        Ok(FetchResult::new(post_id, replies, Local::now()))
    }

    /// Fetch and write the result as indented JSON, returning the path used.
    ///
    /// Without `filename` the file is named
    /// `replies_to_<post_id>_<YYYYmmdd_HHMMSS>.json` inside the configured
    /// output directory. The write is not atomic.
    pub async fn save_to_file(
        &self,
        post_id: &str,
        filename: Option<&Path>,
        max_replies: Option<u32>,
    ) -> Result<PathBuf> {
        let path = match filename {
            Some(p) => p.to_path_buf(),
            None => self.default_output_path(post_id, Local::now()),
        };

        let result = self.fetch_with_metadata(post_id, max_replies).await?;
        let bytes = result.to_pretty_json()?;
        std::fs::write(&path, bytes).map_err(|source| ReplyFetchError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!(path = %path.display(), "Replies saved to file");
        Ok(path)
    }

    fn default_output_path(&self, post_id: &str, now: DateTime<Local>) -> PathBuf {
        let name = format!("replies_to_{post_id}_{}.json", now.format("%Y%m%d_%H%M%S"));
        match &self.config.output_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    async fn request_replies(&self, post_id: &str) -> std::result::Result<HttpResponse, HttpError> {
        let auth = Auth::header(API_KEY_HEADER, &self.config.api_key)?;
        self.http
            .get(
                &self.config.api_url,
                RequestOpts {
                    timeout: Some(self.config.timeout()),
                    auth: Some(auth),
                    query: Some(vec![(POST_ID_PARAM, post_id.into())]),
                    ..Default::default()
                },
            )
            .await
    }
}

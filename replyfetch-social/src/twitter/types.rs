use chrono::{DateTime, Local, SecondsFormat};
use replyfetch_common::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

// ==============================
// Wire models (upstream response)
// ==============================

/// One element of the upstream `tweets` array.
///
/// Only `id` and `text` are strict. The optional fields take what they can
/// use and treat any other shape as absent: numbers are kept as text for
/// `author_id`/`created_at`, and counts accept integral floats and numeric
/// strings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReply {
    pub id: WireId,
    pub text: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub author_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_author")]
    pub author: Option<RawAuthor>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,

    #[serde(default, deserialize_with = "lenient_count")]
    pub likes_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub retweets_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub replies_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAuthor {
    #[serde(default, deserialize_with = "lenient_text")]
    pub username: Option<String>,
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_author<'de, D>(deserializer: D) -> std::result::Result<Option<RawAuthor>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawAuthor::deserialize(Value::deserialize(deserializer)?).ok())
}

fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Reply ids show up as strings or bare numbers depending on the upstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(u64),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Text(s) => s,
            WireId::Number(n) => n.to_string(),
        }
    }
}

// ==============================
// Normalized output
// ==============================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyMetrics {
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
}

/// A reply flattened into the stable output shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRecord {
    pub reply_id: String,
    pub author_id: Option<String>,
    pub author_username: Option<String>,
    pub text: String,
    pub created_at: Option<String>,
    pub metrics: ReplyMetrics,
}

impl From<RawReply> for ReplyRecord {
    fn from(raw: RawReply) -> Self {
        Self {
            reply_id: raw.id.into(),
            author_id: raw.author_id,
            author_username: raw.author.and_then(|a| a.username),
            text: raw.text,
            created_at: raw.created_at,
            metrics: ReplyMetrics {
                likes: raw.likes_count.unwrap_or(0),
                retweets: raw.retweets_count.unwrap_or(0),
                replies: raw.replies_count.unwrap_or(0),
            },
        }
    }
}

/// Replies plus metadata about the fetch that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResult {
    #[serde(alias = "tweet_id")]
    pub post_id: String,
    pub total_replies_fetched: usize,
    /// RFC 3339 local time with microsecond precision.
    pub fetch_timestamp: String,
    pub replies: Vec<ReplyRecord>,
}

impl FetchResult {
    /// `total_replies_fetched` always mirrors `replies.len()`.
    ///
    /// ```
    /// use chrono::Local;
    /// use replyfetch_social::twitter::FetchResult;
    ///
    /// let result = FetchResult::new("123", Vec::new(), Local::now());
    /// assert_eq!(result.total_replies_fetched, 0);
    /// assert!(chrono::DateTime::parse_from_rfc3339(&result.fetch_timestamp).is_ok());
    /// ```
    pub fn new(post_id: &str, replies: Vec<ReplyRecord>, fetched_at: DateTime<Local>) -> Self {
        Self {
            post_id: post_id.to_string(),
            total_replies_fetched: replies.len(),
            fetch_timestamp: fetched_at.to_rfc3339_opts(SecondsFormat::Micros, false),
            replies,
        }
    }

    /// JSON with 4-space indentation, the on-disk format.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut ser)?;
        Ok(buf)
    }
}

use replyfetch_common::{ReplyFetchError, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::twitter::types::{RawReply, ReplyRecord};

/// Map an upstream body into reply records, preserving upstream order.
///
/// Returns `Ok(None)` when the body has no `tweets` array at all. A single
/// element missing `id` or `text` fails the whole batch; odd shapes in the
/// optional fields only blank those fields.
///
/// ```
/// use replyfetch_social::twitter::extract_replies;
/// use serde_json::json;
///
/// let body = json!({ "tweets": [{ "id": "1", "text": "first" }] });
/// let replies = extract_replies(&body).unwrap().unwrap();
/// assert_eq!(replies[0].text, "first");
///
/// assert!(extract_replies(&json!({ "tweets": "nope" })).unwrap().is_none());
/// ```
pub fn extract_replies(body: &Value) -> Result<Option<Vec<ReplyRecord>>> {
    let Some(tweets) = body.get("tweets").and_then(Value::as_array) else {
        return Ok(None);
    };

    tweets
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            RawReply::deserialize(raw)
                .map(ReplyRecord::from)
                .map_err(|e| ReplyFetchError::MalformedReply {
                    index,
                    message: e.to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

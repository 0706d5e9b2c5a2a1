//! Client for a Firestore-style REST document collection.
//!
//! Only listing is supported: every document of a collection is fetched
//! (following pagination) and its typed field values are flattened to plain
//! JSON.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::RemoteError;
use crate::language::WordPair;

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";
pub const DEFAULT_COLLECTION: &str = "translations";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const PAGE_SIZE: u32 = 300;

/// A document with its id and plain JSON fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    /// Interpret the document as a word pair, if it has `source`/`target` or
    /// `fr`/`en` string fields.
    pub fn to_word_pair(&self) -> Option<WordPair> {
        let field = |names: [&str; 2]| {
            names
                .iter()
                .find_map(|name| self.fields.get(*name).and_then(Value::as_str))
        };
        let source = field(["source", "fr"])?;
        let target = field(["target", "en"])?;
        Some(WordPair::new(source, target))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

/// Remote document store for one project.
pub struct DocumentStore {
    base_url: String,
    project_id: String,
    client: reqwest::Client,
}

impl DocumentStore {
    pub fn new(base_url: &str, project_id: &str) -> Result<Self, RemoteError> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            client,
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}",
            self.base_url, self.project_id, collection
        )
    }

    /// Fetch every document in `collection`.
    #[instrument(skip(self), fields(project = %self.project_id))]
    pub async fn fetch_collection(&self, collection: &str) -> Result<Vec<Document>, RemoteError> {
        let url = self.collection_url(collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    RemoteError::Network(format!("timed out after {DEFAULT_TIMEOUT_SECS}s"))
                } else {
                    RemoteError::Network(e.to_string())
                }
            })?;

            let status = response.status().as_u16();
            if status >= 400 {
                let body = response.text().await.unwrap_or_default();
                return Err(RemoteError::Api {
                    status,
                    message: body,
                });
            }

            let page: ListResponse = response
                .json()
                .await
                .map_err(|e| RemoteError::Decode(e.to_string()))?;
            debug!(count = page.documents.len(), "fetched page");

            documents.extend(page.documents.into_iter().map(|raw| Document {
                id: raw
                    .name
                    .rsplit('/')
                    .next()
                    .unwrap_or(raw.name.as_str())
                    .to_string(),
                fields: raw
                    .fields
                    .into_iter()
                    .map(|(k, v)| (k, flatten_value(v)))
                    .collect(),
            }));

            match page.next_page_token {
                Some(token) if !token.is_empty() => {
                    // a server handing back the same token would loop forever
                    if page_token.as_deref() == Some(token.as_str()) {
                        warn!(token = %token, "page token repeated, stopping");
                        break;
                    }
                    page_token = Some(token);
                }
                _ => break,
            }
        }

        Ok(documents)
    }
}

/// Turn a typed value (`{"stringValue": "chat"}`, `{"mapValue": {...}}`, ...)
/// into plain JSON.
fn flatten_value(value: Value) -> Value {
    let Value::Object(mut typed) = value else {
        return value;
    };
    if typed.len() != 1 {
        return Value::Object(typed);
    }
    let Some(kind) = typed.keys().next().cloned() else {
        return Value::Object(typed);
    };
    let inner = typed.remove(&kind).unwrap_or(Value::Null);

    match kind.as_str() {
        "nullValue" => Value::Null,
        "integerValue" => match &inner {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(inner),
            _ => inner,
        },
        "stringValue" | "booleanValue" | "doubleValue" | "timestampValue"
        | "referenceValue" | "bytesValue" | "geoPointValue" => inner,
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().cloned().map(flatten_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(
            inner
                .get("fields")
                .and_then(Value::as_object)
                .map(|fields| {
                    fields
                        .iter()
                        .map(|(k, v)| (k.clone(), flatten_value(v.clone())))
                        .collect()
                })
                .unwrap_or_default(),
        ),
        _ => {
            typed.insert(kind, inner);
            Value::Object(typed)
        }
    }
}

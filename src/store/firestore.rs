use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use log::info;
use serde_json::{Map, Value, json};

use crate::quiz::persistence::{DocumentStore, Principal};
use crate::store::schema::{Document, FieldValue};

const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";

/// Cloud Firestore over its REST API. Requests are authorized with the
/// signed-in user's ID token.
pub struct FirestoreStore {
    project_id: String,
    client: reqwest::blocking::Client,
}

impl FirestoreStore {
    pub fn new(project_id: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            project_id: project_id.to_string(),
            client,
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{FIRESTORE_BASE}/projects/{}/databases/(default)/documents/{}",
            self.project_id,
            collection.trim_matches('/')
        )
    }
}

/// Firestore's typed value encoding.
fn encode_document(document: &Document) -> Value {
    let fields: Map<String, Value> = document
        .iter()
        .map(|(key, value)| {
            let encoded = match value {
                FieldValue::Integer(n) => json!({ "integerValue": n.to_string() }),
                FieldValue::Timestamp(t) => json!({ "timestampValue": t.to_rfc3339() }),
                FieldValue::String(s) => json!({ "stringValue": s }),
            };
            (key.clone(), encoded)
        })
        .collect();
    json!({ "fields": fields })
}

impl DocumentStore for FirestoreStore {
    fn add_document(
        &self,
        principal: &Principal,
        collection: &str,
        document: &Document,
    ) -> Result<String> {
        let token = principal
            .id_token
            .as_deref()
            .ok_or_else(|| anyhow!("an ID token is required to write to Firestore"))?;

        let response = self
            .client
            .post(self.collection_url(collection))
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .body(encode_document(document).to_string())
            .send()
            .context("Firestore request failed")?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            bail!("Firestore rejected the write ({status}): {body}");
        }

        let created: Value = serde_json::from_str(&body)?;
        let name = created
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("Firestore response has no document name"))?;
        let id = name.rsplit('/').next().unwrap_or(name).to_string();
        info!("stored document {id} in {collection}");
        Ok(id)
    }
}

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use rand::Rng;

use crate::quiz::persistence::{DocumentStore, Principal};
use crate::store::json_store::write_atomic;
use crate::store::schema::Document;

/// Document store on the local filesystem: one JSON file per document,
/// nested directories per collection path segment.
pub struct FileDocumentStore {
    root: PathBuf,
}

impl FileDocumentStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        collection
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root.clone(), |dir, segment| {
                dir.join(sanitize_segment(segment))
            })
    }
}

impl DocumentStore for FileDocumentStore {
    fn add_document(
        &self,
        _principal: &Principal,
        collection: &str,
        document: &Document,
    ) -> Result<String> {
        let dir = self.collection_dir(collection);
        fs::create_dir_all(&dir)?;

        let mut rng = rand::thread_rng();
        let (id, path) = loop {
            let suffix: u32 = rng.gen_range(0..0x10000);
            let id = format!("{}-{suffix:04x}", Utc::now().format("%Y%m%dT%H%M%S%.3f"));
            let path = dir.join(format!("{id}.json"));
            if !path.exists() {
                break (id, path);
            }
        };
        write_atomic(&path, &serde_json::to_string_pretty(document)?)?;
        Ok(id)
    }
}

fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

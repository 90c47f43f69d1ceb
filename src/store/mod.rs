pub mod documents;
#[cfg(feature = "network")]
pub mod firestore;
pub mod json_store;
pub mod schema;

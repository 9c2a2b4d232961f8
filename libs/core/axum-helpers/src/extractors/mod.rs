//! Extractors whose rejections render through the response envelope.
//!
//! Axum's stock `Json` and `Query` reject with plain-text bodies; these wrap
//! them so malformed requests still get `{error, data: null, success: false}`.

pub mod envelope_json;
pub mod envelope_query;

pub use envelope_json::EnvelopeJson;
pub use envelope_query::EnvelopeQuery;

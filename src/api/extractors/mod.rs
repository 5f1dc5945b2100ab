//! Custom request extractors.

mod client_info;
mod validated_json;

pub use validated_json::ValidatedJson;

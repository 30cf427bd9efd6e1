//! REST API layer: DTOs, handlers, router and the validated JSON extractor.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod validated_json;

pub use router::create_api_router;
pub use validated_json::ValidatedJson;

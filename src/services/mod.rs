//! Services layer
//!
//! The read model that turns content store queries into page documents,
//! and the serializers it uses.

pub mod read_model;
pub mod serialize;

pub use read_model::{ReadModelError, ReadModelService};
pub use serialize::{serialize_post, serialize_post_detail, serialize_tag, teaser};

//! BinML is a compact binary tree-document format: nested named elements
//! carrying typed attributes, delimited by start/end marker bytes.

mod attribute;

pub use attribute::Attribute;
pub use attribute::AttributeError;
pub use attribute::DateTime;
pub use attribute::Value;
pub use attribute::ValueKind;

mod element;

pub use element::Document;
pub use element::Element;
pub use element::LookupError;

pub mod serializers;

pub use serializers::Serializer;
pub use serializers::deserialize;
pub use serializers::serialize;

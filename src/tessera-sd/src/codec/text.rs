//! The text form.
//!
//! Values are written as an XML document with a single `<llsd>` root
//! element. Every kind has its own element named after
//! [`Kind::name`](crate::Kind::name); maps alternate `<key>` elements
//! with values, and binary data is base64 encoded.

mod de;
pub use de::decode;

mod ser;
pub use ser::encode;

const ROOT: &str = "llsd";

const DOCUMENT_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

const BASE64_ENCODING: &str = "base64";

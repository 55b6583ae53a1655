//! Deterministic JSON for the session file.
//!
//! Keys are sorted, indentation is two spaces and the file ends with a
//! newline, so successive writes diff cleanly.

mod json;

pub use json::{SerializationError, SessionDocument, decode_document, encode_document};

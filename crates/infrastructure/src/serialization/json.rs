//! Codec for the session document: a flat JSON object of string slots.

use std::collections::BTreeMap;

use serde_json::ser::{PrettyFormatter, Serializer};

/// Slots of the session file, ordered by key.
pub type SessionDocument = BTreeMap<String, String>;

/// Errors raised by the session document codec.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// The document could not be written.
    #[error("could not encode session document: {0}")]
    Encode(serde_json::Error),

    /// The bytes are not a flat object of strings.
    #[error("could not decode session document: {0}")]
    Decode(serde_json::Error),
}

/// Encodes the document with two-space indentation and a trailing newline.
///
/// # Errors
///
/// Returns `SerializationError::Encode` if serialization fails.
pub fn encode_document(document: &SessionDocument) -> Result<Vec<u8>, SerializationError> {
    let mut buffer = Vec::with_capacity(256);
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"  "));
    serde::Serialize::serialize(document, &mut serializer).map_err(SerializationError::Encode)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Decodes a document. Blank input is an empty document.
///
/// # Errors
///
/// Returns `SerializationError::Decode` for anything but an object whose
/// values are all strings.
pub fn decode_document(bytes: &[u8]) -> Result<SessionDocument, SerializationError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(SessionDocument::new());
    }
    serde_json::from_slice(bytes).map_err(SerializationError::Decode)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_layout_is_sorted_and_indented() {
        let mut document = SessionDocument::new();
        document.insert("tokenExpiry".into(), "2026-01-01T00:00:00.000Z".into());
        document.insert("authToken".into(), "a.b.c".into());

        let text = String::from_utf8(encode_document(&document).unwrap()).unwrap();
        assert_eq!(
            text,
            "{\n  \"authToken\": \"a.b.c\",\n  \"tokenExpiry\": \"2026-01-01T00:00:00.000Z\"\n}\n"
        );
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert!(decode_document(b"").unwrap().is_empty());
        assert!(decode_document(b" \n").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_garbage_and_non_string_values() {
        assert!(matches!(decode_document(b"{oops"), Err(SerializationError::Decode(_))));
        assert!(matches!(
            decode_document(br#"{"authToken": 1}"#),
            Err(SerializationError::Decode(_))
        ));
        assert!(matches!(decode_document(b"[]"), Err(SerializationError::Decode(_))));
    }
}

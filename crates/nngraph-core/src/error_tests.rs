//! Tests for error messages and name validation.

use crate::error::{validate_graph_name, validate_name, Error, VertexKey};

#[test]
fn test_vertex_key_display() {
    assert_eq!(VertexKey::from("A").to_string(), "'A'");
    assert_eq!(VertexKey::from(4_u32).to_string(), "#4");
}

#[test]
fn test_unknown_vertex_message() {
    let err = Error::UnknownVertex("sample".into());
    assert_eq!(err.to_string(), "Unknown vertex: 'sample'");
}

#[test]
fn test_edge_already_exists_message() {
    let err = Error::EdgeAlreadyExists { from: 1, to: 2 };
    assert_eq!(err.to_string(), "Edge already exists: #1 -> #2");
}

#[test]
fn test_index_gap_message_names_both_entries() {
    let err = Error::NonConsecutiveIndices {
        previous: Some("B".to_string()),
        next: "C".to_string(),
        index: 3,
    };
    assert_eq!(
        err.to_string(),
        "Non-consecutive vertex indices for: B and C (index 3)"
    );
}

#[test]
fn test_index_gap_message_at_start() {
    let err = Error::NonConsecutiveIndices {
        previous: None,
        next: "A".to_string(),
        index: 1,
    };
    assert!(err.to_string().contains("must start at 0"));
}

#[test]
fn test_io_error_converts() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: Error = io.into();
    assert!(matches!(err, Error::Io(_)));
    assert!(err.to_string().contains("gone"));
}

#[test]
fn test_slot_space_message() {
    assert!(Error::SlotSpaceExhausted.to_string().contains("4294967296"));
}

#[test]
fn test_validate_name() {
    assert!(validate_name("A").is_ok());
    assert!(validate_name("with space").is_ok());
    assert!(validate_name("").is_err());
    assert!(validate_name("a\tb").is_err());
    assert!(validate_name("a\nb").is_err());
}

#[test]
fn test_validate_graph_name() {
    assert!(validate_graph_name("").is_ok());
    assert!(validate_graph_name("tabs\tare\tfine").is_ok());
    assert!(validate_graph_name("two\nlines").is_err());
    assert!(validate_graph_name("cr\r").is_err());
}

//! Event record wire-format tests through the public API.

use chrono::{DateTime, TimeZone, Utc};
use splunk_dispatch_client::{ClientError, ErrorKind, EventRecord, EventStreamWriter, decode_events};

#[test]
fn test_done_marker_without_time() {
    let record = EventRecord::new("hello")
        .done(true)
        .unbroken(false)
        .stanza("stanza1");
    let encoded = record.encode();

    assert!(encoded.contains("<data>hello</data>"));
    assert!(!encoded.contains("<time"));
    assert_eq!(encoded.matches("<done/>").count(), 1);
    assert!(encoded.contains("unbroken=\"0\""));
    assert!(encoded.contains("stanza=\"stanza1\""));
}

#[test]
fn test_absent_fields_are_omitted() {
    let encoded = EventRecord::default().encode();
    assert_eq!(encoded, "<event unbroken=\"0\"></event>");
    for element in ["<data", "<source", "<sourcetype", "<index", "<host", "<time", "<done", "stanza="] {
        assert!(!encoded.contains(element), "{element} should be omitted");
    }
}

#[test]
fn test_time_is_whole_epoch_seconds() {
    let time: DateTime<Utc> = Utc.with_ymd_and_hms(1970, 1, 1, 0, 1, 40).unwrap()
        + chrono::Duration::milliseconds(999);
    let encoded = EventRecord::new("x").time(time).encode();
    assert!(encoded.contains("<time>100</time>"));
}

#[test]
fn test_unbroken_stream_round_trip() {
    let template = EventRecord::default()
        .source("stdin")
        .source_type("multiline")
        .index("main")
        .host("edge-1")
        .stanza("cli://encode")
        .time(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    let fragments = EventRecord::unbroken_chunks(&template, ["line 1\n", "line 2\n", "line 3"]);

    let mut writer = EventStreamWriter::new(Vec::new()).unwrap();
    for fragment in &fragments {
        writer.write(fragment).unwrap();
    }
    let xml = String::from_utf8(writer.finish().unwrap()).unwrap();

    assert_eq!(xml.matches("<time>").count(), 1);
    assert_eq!(xml.matches("<done/>").count(), 1);
    assert_eq!(xml.matches("unbroken=\"1\"").count(), 3);

    let decoded = decode_events(&xml).unwrap();
    assert_eq!(decoded, fragments);
}

#[test]
fn test_malformed_record_is_a_format_error() {
    let err = EventRecord::decode("<event unbroken=\"2\"/>").unwrap_err();
    assert!(matches!(err, ClientError::EventFormat(_)));
    assert_eq!(err.kind(), ErrorKind::Format);
}

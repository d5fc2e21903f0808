//! Property-based tests for the event record codec.
//!
//! # Invariants
//! - No `<time>` element without a time; with one, the value is the floored
//!   epoch second
//! - `<done/>` appears exactly once when done, never otherwise
//! - `unbroken` is always present as "0" or "1"
//! - Decoding an encoded record yields the record with time floored

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use splunk_dispatch_client::EventRecord;

fn text() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[ -~]{0,24}")
}

fn instant() -> impl Strategy<Value = Option<DateTime<Utc>>> {
    prop::option::of(
        (-4_000_000_000i64..4_000_000_000i64, 0u32..1_000_000_000u32)
            .prop_map(|(secs, nanos)| DateTime::from_timestamp(secs, nanos).unwrap()),
    )
}

prop_compose! {
    fn record()(
        data in text(),
        source in text(),
        source_type in text(),
        index in text(),
        host in text(),
        time in instant(),
        done in any::<bool>(),
        unbroken in any::<bool>(),
        stanza in text(),
    ) -> EventRecord {
        EventRecord { data, source, source_type, index, host, time, done, unbroken, stanza }
    }
}

proptest! {
    #[test]
    fn prop_time_present_iff_set_and_floored(record in record()) {
        let encoded = record.encode();
        match record.time {
            None => prop_assert!(!encoded.contains("<time>")),
            Some(time) => {
                let expected = time.timestamp_nanos_opt()
                    .map(|n| n.div_euclid(1_000_000_000))
                    .unwrap_or_else(|| time.timestamp());
                let element = format!("<time>{}</time>", expected);
                prop_assert!(encoded.contains(&element), "{} missing from {}", element, encoded);
            }
        }
    }

    #[test]
    fn prop_done_marker_matches_flag(record in record()) {
        let encoded = record.encode();
        let expected = if record.done { 1 } else { 0 };
        prop_assert_eq!(encoded.matches("<done/>").count(), expected);
    }

    #[test]
    fn prop_unbroken_always_present(record in record()) {
        let encoded = record.encode();
        let attr = if record.unbroken { "unbroken=\"1\"" } else { "unbroken=\"0\"" };
        let prefix = format!("<event {attr}");
        prop_assert!(encoded.starts_with(&prefix), "encoded: {}", encoded);
    }

    #[test]
    fn prop_decode_inverts_encode(record in record()) {
        let decoded = EventRecord::decode(&record.encode()).unwrap();
        let mut expected = record.clone();
        expected.time = record
            .time
            .map(|t| DateTime::from_timestamp(t.timestamp(), 0).unwrap());
        prop_assert_eq!(decoded, expected);
    }
}

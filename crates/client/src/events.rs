//! Event records for streamed ingestion.
//!
//! # What this module handles:
//! - Encoding an [`EventRecord`] as one `<event>` element
//! - Decoding `<event>` elements back, for inspection and tests
//! - The `<stream>` envelope written to an ingestion pipe ([`EventStreamWriter`])
//! - Splitting one logical event into unbroken fragments
//!
//! # Wire rules
//! - `unbroken` is always written, as `"1"` or `"0"`.
//! - `stanza` is written as an attribute only when set.
//! - `data`, `source`, `sourcetype`, `index` and `host` are written only when set.
//! - `time` is written only when set, as whole seconds since the Unix epoch,
//!   truncated toward negative infinity. No sentinel is ever written.
//! - `<done/>` is written only when `done` is true.

use std::borrow::Cow;
use std::io::Write;

use chrono::{DateTime, Utc};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// One record on an ingestion stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub data: Option<String>,
    pub source: Option<String>,
    pub source_type: Option<String>,
    pub index: Option<String>,
    pub host: Option<String>,
    /// Event time; when absent the indexer assigns one or continues the
    /// previous unbroken fragment's time.
    pub time: Option<DateTime<Utc>>,
    /// Marks the last fragment of an unbroken event.
    pub done: bool,
    /// True when this record is a fragment of a larger event.
    pub unbroken: bool,
    /// Input stanza that produced the event.
    pub stanza: Option<String>,
}

impl EventRecord {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::default()
        }
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn source_type(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = Some(source_type.into());
        self
    }

    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn stanza(mut self, stanza: impl Into<String>) -> Self {
        self.stanza = Some(stanza.into());
        self
    }

    pub fn done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    pub fn unbroken(mut self, unbroken: bool) -> Self {
        self.unbroken = unbroken;
        self
    }

    /// Encoded `time` value, if any.
    pub fn epoch_seconds(&self) -> Option<i64> {
        // `timestamp()` floors: sub-second nanos are always non-negative.
        self.time.map(|t| t.timestamp())
    }

    /// Encode as a single `<event>` element.
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(128);
        out.push_str("<event unbroken=\"");
        out.push_str(if self.unbroken { "1" } else { "0" });
        out.push('"');
        if let Some(stanza) = &self.stanza {
            out.push_str(" stanza=\"");
            out.push_str(&escape(stanza.as_str()));
            out.push('"');
        }
        out.push('>');

        let fields: [(&str, Option<&str>); 5] = [
            ("data", self.data.as_deref()),
            ("source", self.source.as_deref()),
            ("sourcetype", self.source_type.as_deref()),
            ("index", self.index.as_deref()),
            ("host", self.host.as_deref()),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                push_element(&mut out, name, &escape(value));
            }
        }
        if let Some(secs) = self.epoch_seconds() {
            push_element(&mut out, "time", &secs.to_string());
        }
        if self.done {
            out.push_str("<done/>");
        }

        out.push_str("</event>");
        out
    }

    /// Decode a single `<event>` element.
    ///
    /// # Errors
    ///
    /// [`ClientError::EventFormat`] for malformed XML, unknown elements,
    /// a missing or invalid `unbroken` attribute, or an unparseable `time`.
    pub fn decode(xml: &str) -> Result<EventRecord> {
        let mut events = decode_events(xml)?;
        match events.len() {
            1 => Ok(events.remove(0)),
            n => Err(ClientError::EventFormat(format!(
                "expected exactly one <event>, found {}",
                n
            ))),
        }
    }

    /// Split one logical event into unbroken fragments.
    ///
    /// Every fragment copies `template`'s metadata and has `unbroken=true`.
    /// Only the first carries `time`; only the last carries `done=true`.
    pub fn unbroken_chunks<I, S>(template: &EventRecord, chunks: I) -> Vec<EventRecord>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fragments: Vec<EventRecord> = chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| EventRecord {
                data: Some(chunk.into()),
                time: if i == 0 { template.time } else { None },
                done: false,
                unbroken: true,
                ..template.clone()
            })
            .collect();
        if let Some(last) = fragments.last_mut() {
            last.done = true;
        }
        fragments
    }
}

fn push_element(out: &mut String, name: &str, value: &str) {
    out.push('<');
    out.push_str(name);
    out.push('>');
    out.push_str(value);
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn format_err(reader: &Reader<&[u8]>, message: impl std::fmt::Display) -> ClientError {
    ClientError::EventFormat(format!("{} at byte {}", message, reader.buffer_position()))
}

/// Decode every `<event>` in `xml`, inside a `<stream>` envelope or bare.
pub fn decode_events(xml: &str) -> Result<Vec<EventRecord>> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut buf = Vec::new();
    let mut records = Vec::new();
    let mut current: Option<EventRecord> = None;
    let mut field: Option<String> = None;
    let mut text = String::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| format_err(&reader, e))?;
        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match (name.as_str(), current.is_some(), field.is_some()) {
                    ("stream", false, _) => {}
                    ("event", false, _) => current = Some(start_event(&reader, &e)?),
                    (_, true, false) => {
                        field = Some(name);
                        text.clear();
                    }
                    _ => return Err(format_err(&reader, format!("unexpected <{}>", name))),
                }
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match (name.as_str(), current.as_mut(), field.is_some()) {
                    ("done", Some(record), false) => record.done = true,
                    ("event", None, _) => records.push(start_event(&reader, &e)?),
                    ("stream", None, _) => {}
                    (_, Some(record), false) => {
                        apply_field(&reader, record, &name, "")?;
                    }
                    _ => return Err(format_err(&reader, format!("unexpected <{}/>", name))),
                }
            }
            Event::Text(t) => {
                let value = t.unescape().map_err(|e| format_err(&reader, e))?;
                if field.is_some() {
                    text.push_str(&value);
                } else if !value.trim().is_empty() {
                    return Err(format_err(&reader, "text outside a field element"));
                }
            }
            Event::CData(c) => {
                if field.is_none() {
                    return Err(format_err(&reader, "CDATA outside a field element"));
                }
                text.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if let Some(open) = field.take() {
                    if let Some(record) = current.as_mut() {
                        apply_field(&reader, record, &open, &text)?;
                    }
                } else if name == "event" {
                    if let Some(record) = current.take() {
                        records.push(record);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if current.is_some() {
        return Err(ClientError::EventFormat("unterminated <event>".to_string()));
    }
    Ok(records)
}

fn start_event(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<EventRecord> {
    let mut record = EventRecord::default();
    let mut saw_unbroken = false;

    for attr in start.attributes() {
        let attr = attr.map_err(|e| format_err(reader, e))?;
        let value = attr.unescape_value().map_err(|e| format_err(reader, e))?;
        match attr.key.local_name().as_ref() {
            b"unbroken" => {
                record.unbroken = match value.as_ref() {
                    "1" => true,
                    "0" => false,
                    other => {
                        return Err(format_err(
                            reader,
                            format!("unbroken must be \"0\" or \"1\", got {:?}", other),
                        ));
                    }
                };
                saw_unbroken = true;
            }
            b"stanza" => record.stanza = Some(value.into_owned()),
            _ => {}
        }
    }

    if !saw_unbroken {
        return Err(format_err(reader, "<event> without unbroken attribute"));
    }
    Ok(record)
}

fn apply_field(
    reader: &Reader<&[u8]>,
    record: &mut EventRecord,
    name: &str,
    value: &str,
) -> Result<()> {
    let owned = || Some(value.to_string());
    match name {
        "data" => record.data = owned(),
        "source" => record.source = owned(),
        "sourcetype" => record.source_type = owned(),
        "index" => record.index = owned(),
        "host" => record.host = owned(),
        "time" => record.time = Some(parse_time(value).map_err(|m| format_err(reader, m))?),
        "done" => record.done = true,
        other => return Err(format_err(reader, format!("unknown element <{}>", other))),
    }
    Ok(())
}

/// Parse decimal epoch seconds, flooring any fractional part.
///
/// The digits are handled as text, so `1700000000.99999999` floors to
/// `1700000000` instead of rounding up through a float. Negative values
/// with a nonzero fraction floor toward negative infinity.
pub fn parse_epoch_seconds(value: &str) -> std::result::Result<i64, String> {
    let value = value.trim();
    let invalid = || format!("invalid epoch seconds {:?}", value);

    let (negative, unsigned) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| format!("epoch seconds out of range: {}", value))?
    };
    let has_fraction = fraction.bytes().any(|b| b != b'0');

    Ok(match (negative, has_fraction) {
        (false, _) => whole,
        (true, false) => -whole,
        (true, true) => -whole - 1,
    })
}

fn parse_time(value: &str) -> std::result::Result<DateTime<Utc>, Cow<'static, str>> {
    let secs = parse_epoch_seconds(value).map_err(Cow::Owned)?;
    DateTime::from_timestamp(secs, 0).ok_or(Cow::Borrowed("time out of range"))
}

/// Writes records inside a `<stream>` envelope.
///
/// The opening tag is written on construction; call [`Self::finish`] to close
/// the envelope and get the writer back.
#[derive(Debug)]
pub struct EventStreamWriter<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> EventStreamWriter<W> {
    pub fn new(mut out: W) -> Result<Self> {
        out.write_all(b"<stream>")?;
        Ok(Self { out, written: 0 })
    }

    pub fn write(&mut self, record: &EventRecord) -> Result<()> {
        self.out.write_all(record.encode().as_bytes())?;
        self.written += 1;
        Ok(())
    }

    /// Records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.write_all(b"</stream>")?;
        self.out.flush()?;
        Ok(self.out)
    }
}

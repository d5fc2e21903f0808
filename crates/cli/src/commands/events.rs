//! Events command implementation.
//!
//! Encodes lines of text as `<event>` records inside a `<stream>` envelope on
//! stdout, the format a scripted input writes to its ingestion pipe.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use splunk_dispatch_client::{EventRecord, EventStreamWriter, parse_epoch_seconds};
use tracing::debug;

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// Encode events; one event per DATA argument, or per stdin line when none are given
    Encode {
        /// Event payloads
        data: Vec<String>,

        /// Source field
        #[arg(long)]
        source: Option<String>,

        /// Sourcetype field
        #[arg(long)]
        sourcetype: Option<String>,

        /// Target index
        #[arg(long)]
        index: Option<String>,

        /// Host field
        #[arg(long)]
        host: Option<String>,

        /// Input stanza attribute
        #[arg(long)]
        stanza: Option<String>,

        /// Event time as epoch seconds (fractions are floored)
        #[arg(long, allow_hyphen_values = true, value_parser = parse_epoch)]
        time: Option<DateTime<Utc>>,

        /// Emit all payloads as fragments of one unbroken event
        #[arg(long)]
        unbroken: bool,

        /// Mark every event as the end of its stream
        #[arg(long, conflicts_with = "unbroken")]
        done: bool,
    },
}

fn parse_epoch(raw: &str) -> Result<DateTime<Utc>, String> {
    let seconds =
        parse_epoch_seconds(raw).map_err(|_| format!("expected epoch seconds, got '{raw}'"))?;
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| format!("epoch seconds out of range: {raw}"))
}

pub fn run(command: EventsCommand) -> Result<()> {
    match command {
        EventsCommand::Encode {
            data,
            source,
            sourcetype,
            index,
            host,
            stanza,
            time,
            unbroken,
            done,
        } => {
            let payloads = if data.is_empty() {
                read_lines(io::stdin().lock())?
            } else {
                data
            };
            if payloads.is_empty() {
                bail!("no event data: pass DATA arguments or pipe lines on stdin");
            }

            let mut template = EventRecord::default().done(done);
            if let Some(source) = source {
                template = template.source(source);
            }
            if let Some(sourcetype) = sourcetype {
                template = template.source_type(sourcetype);
            }
            if let Some(index) = index {
                template = template.index(index);
            }
            if let Some(host) = host {
                template = template.host(host);
            }
            if let Some(stanza) = stanza {
                template = template.stanza(stanza);
            }
            if let Some(time) = time {
                template = template.time(time);
            }

            let records: Vec<EventRecord> = if unbroken {
                EventRecord::unbroken_chunks(&template, payloads)
            } else {
                payloads
                    .into_iter()
                    .map(|payload| EventRecord {
                        data: Some(payload),
                        ..template.clone()
                    })
                    .collect()
            };

            let stdout = io::stdout().lock();
            let written = write_stream(stdout, &records)?;
            debug!(events = written, unbroken, "Encoded event stream");
        }
    }

    Ok(())
}

fn read_lines<R: BufRead>(reader: R) -> Result<Vec<String>> {
    reader
        .lines()
        .collect::<io::Result<Vec<_>>>()
        .context("Failed to read event data from stdin")
}

fn write_stream<W: Write>(out: W, records: &[EventRecord]) -> Result<usize> {
    let mut writer = EventStreamWriter::new(out).context("Failed to open event stream")?;
    for record in records {
        writer.write(record).context("Failed to write event")?;
    }
    let written = writer.written();
    let mut out = writer.finish().context("Failed to close event stream")?;
    out.write_all(b"\n").context("Failed to close event stream")?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_epoch_floors_fractions() {
        assert_eq!(parse_epoch("1700000000.9").unwrap().timestamp(), 1_700_000_000);
        assert_eq!(parse_epoch("-1.5").unwrap().timestamp(), -2);
        assert!(parse_epoch("yesterday").is_err());
        assert!(parse_epoch("NaN").is_err());
        assert_eq!(
            parse_epoch("1700000000.99999999").unwrap().timestamp(),
            1_700_000_000
        );
    }

    #[test]
    fn test_write_stream_wraps_records() {
        let records = vec![EventRecord::new("one"), EventRecord::new("two")];
        let mut buf = Vec::new();
        let written = write_stream(&mut buf, &records).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(written, 2);
        assert!(text.starts_with("<stream><event"));
        assert!(text.ends_with("</stream>\n"));
        assert_eq!(text.matches("<event ").count(), 2);
    }

    #[test]
    fn test_read_lines_keeps_blank_lines() {
        let lines = read_lines(io::Cursor::new("a\n\nb\n")).unwrap();
        assert_eq!(lines, vec!["a", "", "b"]);
    }
}

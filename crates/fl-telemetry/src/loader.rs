//! File readers.
//!
//! Every reader follows the same row policy: a data row whose required fields
//! do not parse is skipped (logged at `trace` level, totals at `debug`/`warn`)
//! and reading continues.  Truncated traces from crashed simulator runs still
//! yield a best-effort result.  Only I/O failures abort a read.
//!
//! Each function has a `_reader` twin that accepts any `Read` source, which is
//! what the tests use (`std::io::Cursor`).

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use tracing::{debug, trace, warn};

use fl_core::{AgentIndex, Step};

use crate::{LossEvent, Run, SummaryRecord, TelemetryError, TelemetryResult, TraceRow};

/// Columns the summary header must name.  Extra columns are ignored.
const SUMMARY_COLUMNS: [&str; 6] = ["step", "alive", "mean_v", "std_v", "mean_gap", "std_gap"];

const SUMMARY_DELIMITER: u8 = b';';
const TRACE_DELIMITER:   u8 = b';';

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SummaryCsvRecord {
    step:     u64,
    alive:    u32,
    mean_v:   f64,
    std_v:    f64,
    mean_gap: f64,
    std_gap:  f64,
}

impl From<SummaryCsvRecord> for SummaryRecord {
    fn from(r: SummaryCsvRecord) -> Self {
        SummaryRecord {
            step:     Step(r.step),
            alive:    r.alive,
            mean_v:   r.mean_v,
            std_v:    r.std_v,
            mean_gap: r.mean_gap,
            std_gap:  r.std_gap,
        }
    }
}

// ── Summary ───────────────────────────────────────────────────────────────────

/// Load the per-step summary of one run.
///
/// The file is required: a missing file, a header lacking one of the six
/// summary columns, or a file without a single usable row are all errors.
pub fn read_summary(path: &Path) -> TelemetryResult<Run> {
    let file = open(path)?;
    let run = read_summary_reader(file)?;
    debug!(path = %path.display(), records = run.len(), "loaded summary");
    Ok(run)
}

/// Like [`read_summary`] but accepts any `Read` source.
pub fn read_summary_reader<R: Read>(reader: R) -> TelemetryResult<Run> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(SUMMARY_DELIMITER)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(TelemetryError::EmptySummary);
    }
    if let Some(missing) = SUMMARY_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(TelemetryError::MissingColumn(*missing));
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for result in rdr.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                trace!(error = %e, "skipping unreadable summary row");
                skipped += 1;
                continue;
            }
        };
        match row.deserialize::<SummaryCsvRecord>(Some(&headers)) {
            Ok(r) => records.push(SummaryRecord::from(r)),
            Err(e) => {
                trace!(line = line_of(&row), error = %e, "skipping malformed summary row");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, kept = records.len(), "summary rows skipped");
    }
    if records.is_empty() {
        return Err(TelemetryError::EmptySummary);
    }
    Ok(Run::from_records(records))
}

// ── Loss schedule ─────────────────────────────────────────────────────────────

/// Load the authoritative loss schedule.
///
/// A schedule that does not exist means "no induced losses" and yields an
/// empty vector.  Rows are returned in file order; the schedule is not
/// required to be sorted.
pub fn read_loss_schedule(path: &Path) -> TelemetryResult<Vec<LossEvent>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no loss schedule; assuming zero losses");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(TelemetryError::Io { path: path.to_path_buf(), source });
        }
    };
    let events = read_loss_schedule_reader(file)?;
    debug!(path = %path.display(), events = events.len(), "loaded loss schedule");
    Ok(events)
}

/// Like [`read_loss_schedule`] but accepts any `Read` source.
///
/// The delimiter is `;` if the header line contains one, otherwise `,`.
pub fn read_loss_schedule_reader<R: Read>(reader: R) -> TelemetryResult<Vec<LossEvent>> {
    let mut buffered = BufReader::new(reader);
    let mut header = String::new();
    let read = buffered
        .read_line(&mut header)
        .map_err(|e| TelemetryError::Read(e.into()))?;
    if read == 0 {
        return Ok(Vec::new());
    }
    let delimiter = if header.contains(';') { b';' } else { b',' };

    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(buffered);

    let mut events = Vec::new();
    let mut skipped = 0usize;
    for result in rdr.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        match parse_loss(&row) {
            Some(event) => events.push(event),
            None => {
                trace!(line = line_of(&row), "skipping malformed loss row");
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        debug!(skipped, kept = events.len(), "loss schedule rows skipped");
    }
    Ok(events)
}

fn parse_loss(row: &StringRecord) -> Option<LossEvent> {
    if row.len() < 2 {
        return None;
    }
    Some(LossEvent {
        step:  Step(row.get(0)?.parse().ok()?),
        agent: AgentIndex(row.get(1)?.parse().ok()?),
    })
}

// ── Trace ─────────────────────────────────────────────────────────────────────

/// Open the per-agent trace for streaming.
///
/// The header is consumed lazily on the first `next()`.  Rows are yielded in
/// file order and only one record is buffered at a time.
pub fn read_trace(path: &Path) -> TelemetryResult<TraceRows<File>> {
    Ok(read_trace_reader(open(path)?))
}

/// Like [`read_trace`] but accepts any `Read` source.
pub fn read_trace_reader<R: Read>(reader: R) -> TraceRows<R> {
    let rdr = ReaderBuilder::new()
        .delimiter(TRACE_DELIMITER)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    TraceRows {
        rdr,
        record:     StringRecord::new(),
        skipped:    0,
        last_error: None,
        done:       false,
    }
}

/// Streaming iterator over the valid rows of a trace file.
///
/// Malformed rows are skipped.  An I/O error ends the iteration; it is stored
/// rather than yielded so consumers can take plain `TraceRow`s.  Check
/// [`take_error`][Self::take_error] once iteration finishes.
pub struct TraceRows<R: Read> {
    rdr:        csv::Reader<R>,
    record:     StringRecord,
    skipped:    usize,
    last_error: Option<TelemetryError>,
    done:       bool,
}

impl<R: Read> TraceRows<R> {
    /// Number of rows skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Take the I/O error that ended iteration early, if any.
    pub fn take_error(&mut self) -> Option<TelemetryError> {
        self.last_error.take()
    }
}

impl<R: Read> Iterator for TraceRows<R> {
    type Item = TraceRow;

    fn next(&mut self) -> Option<TraceRow> {
        while !self.done {
            match self.rdr.read_record(&mut self.record) {
                Ok(false) => {
                    self.done = true;
                    if self.skipped > 0 {
                        debug!(skipped = self.skipped, "trace rows skipped");
                    }
                }
                Ok(true) => match parse_trace(&self.record) {
                    Some(row) => return Some(row),
                    None => {
                        trace!(line = line_of(&self.record), "skipping malformed trace row");
                        self.skipped += 1;
                    }
                },
                Err(e) if e.is_io_error() => {
                    self.done = true;
                    self.last_error = Some(e.into());
                }
                Err(_) => self.skipped += 1,
            }
        }
        None
    }
}

fn parse_trace(row: &StringRecord) -> Option<TraceRow> {
    if row.len() < 3 {
        return None;
    }
    Some(TraceRow {
        step:  Step(row.get(0)?.parse().ok()?),
        agent: AgentIndex(row.get(1)?.parse().ok()?),
        alive: row.get(2)?.parse().ok()?,
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn open(path: &Path) -> TelemetryResult<File> {
    File::open(path).map_err(|source| TelemetryError::Io { path: path.to_path_buf(), source })
}

fn line_of(row: &StringRecord) -> u64 {
    row.position().map_or(0, |p| p.line())
}

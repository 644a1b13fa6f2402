//! src/source/lines.rs
//!
//! Line-oriented numeric source: one sample row per text line.
//!
//! Each line is split on whitespace, commas and semicolons. Tokens that do
//! not parse as numbers are treated as labels and ignored, so both
//! `1.0, 2.5` and `Received: MSG 9 RSSI -94.5` yield numeric rows. A row
//! with the wrong number of values is skipped. Every value column becomes one
//! y-series of a single subplot; x is the running row counter.
//!
//! Reads never block past the reader's own timeout: a timed-out read means
//! "no new rows this tick" and any partial line is kept for the next tick.
//! Bytes are decoded lossily, so line noise only costs the line it lands in.

use std::io::{self, BufRead, BufReader, ErrorKind};
use std::time::Duration;

use serialport::SerialPort;

use super::ring::RingSeries;
use super::{DataSource, Fetch, SubplotData};
use crate::engine::{Series, SourceError};

/// Upper bound on rows consumed per tick unless configured otherwise.
pub const DEFAULT_LINES_PER_TICK: usize = 64;

pub struct LineSource<R> {
    reader: R,
    columns: usize,
    x: RingSeries,
    ys: Vec<RingSeries>,
    pending: Vec<u8>,
    lines_per_tick: usize,
    rows: u64,
    skipped: u64,
    eof: bool,
}

impl<R: BufRead> LineSource<R> {
    /// Read rows of `columns` values, keeping `capacity` samples per series.
    pub fn new(reader: R, columns: usize, capacity: usize) -> Self {
        Self {
            reader,
            columns,
            x: RingSeries::new(capacity),
            ys: (0..columns).map(|_| RingSeries::new(capacity)).collect(),
            pending: Vec::new(),
            lines_per_tick: DEFAULT_LINES_PER_TICK,
            rows: 0,
            skipped: 0,
            eof: false,
        }
    }

    pub fn with_lines_per_tick(mut self, lines: usize) -> Self {
        self.lines_per_tick = lines.max(1);
        self
    }

    /// Rows accepted so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Lines rejected because they did not carry `columns` values.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    fn read_available(&mut self) -> io::Result<()> {
        for _ in 0..self.lines_per_tick {
            match self.reader.read_until(b'\n', &mut self.pending) {
                Ok(0) => {
                    self.eof = true;
                    if !self.pending.is_empty() {
                        let line = std::mem::take(&mut self.pending);
                        self.ingest(&line);
                    }
                    break;
                }
                Ok(_) => {
                    if self.pending.ends_with(b"\n") {
                        let line = std::mem::take(&mut self.pending);
                        self.ingest(&line);
                    }
                }
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn ingest(&mut self, line: &[u8]) {
        let line = String::from_utf8_lossy(line);
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }
        match parse_columns(trimmed) {
            Some(values) if values.len() == self.columns => {
                self.x.push(self.rows as f64);
                for (series, value) in self.ys.iter_mut().zip(values) {
                    series.push(value);
                }
                self.rows += 1;
            }
            _ => {
                self.skipped += 1;
                tracing::warn!(line = trimmed, expected = self.columns, "skipping malformed line");
            }
        }
    }
}

impl<R: BufRead> DataSource for LineSource<R> {
    fn sample(&mut self, _tick: u64) -> Result<Fetch<'_>, SourceError> {
        if self.eof {
            return Ok(Fetch::Exhausted);
        }
        self.read_available()?;
        let ys = self.ys.iter().map(|s| s as &dyn Series).collect();
        Ok(Fetch::Ready(vec![SubplotData::new(&self.x, ys)]))
    }
}

/// Numeric values of one line, or `None` when it holds no numbers at all.
pub fn parse_columns(line: &str) -> Option<Vec<f64>> {
    let values: Vec<f64> = line
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter_map(|token| token.parse::<f64>().ok())
        .collect();
    if values.is_empty() { None } else { Some(values) }
}

/// Open a serial device as a line source.
pub fn open_serial(
    port: &str,
    baud_rate: u32,
    timeout: Duration,
    columns: usize,
    capacity: usize,
) -> serialport::Result<LineSource<BufReader<Box<dyn SerialPort>>>> {
    let device = serialport::new(port, baud_rate).timeout(timeout).open()?;
    tracing::info!(port, baud_rate, "serial port opened");
    Ok(LineSource::new(BufReader::new(device), columns, capacity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn ready_lengths(source: &mut LineSource<impl BufRead>, tick: u64) -> Option<(usize, Vec<usize>)> {
        match source.sample(tick).unwrap() {
            Fetch::Ready(subplots) => Some((
                subplots[0].x.len(),
                subplots[0].ys.iter().map(|y| y.len()).collect(),
            )),
            Fetch::Exhausted => None,
        }
    }

    #[test]
    fn parses_plain_and_labelled_lines() {
        assert_eq!(parse_columns("1.5, 2,3"), Some(vec![1.5, 2.0, 3.0]));
        assert_eq!(parse_columns("Received: MSG 9 RSSI -94.5"), Some(vec![9.0, -94.5]));
        assert_eq!(parse_columns("ACK sent back automatically."), None);
    }

    #[test]
    fn reads_rows_then_exhausts() {
        let input = "1 10\n2 20\nnoise\n3 30";
        let mut source = LineSource::new(Cursor::new(input), 2, 16);
        assert_eq!(ready_lengths(&mut source, 0), Some((3, vec![3, 3])));
        assert_eq!(source.skipped(), 1);
        assert_eq!(ready_lengths(&mut source, 1), None);
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let input: &[u8] = b"1\n\xff\xfe garbage\n2\n3\n";
        let mut source = LineSource::new(Cursor::new(input), 1, 16);
        assert_eq!(ready_lengths(&mut source, 0), Some((3, vec![3])));
        assert_eq!(source.skipped(), 1);
        assert_eq!(source.ys[0].iter().copied().collect::<Vec<f64>>(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn lines_per_tick_bounds_each_read() {
        let input = "1\n2\n3\n4\n";
        let mut source = LineSource::new(Cursor::new(input), 1, 16).with_lines_per_tick(2);
        assert_eq!(ready_lengths(&mut source, 0), Some((2, vec![2])));
        assert_eq!(ready_lengths(&mut source, 1), Some((4, vec![4])));
        assert_eq!(ready_lengths(&mut source, 2), Some((4, vec![4])));
        assert_eq!(ready_lengths(&mut source, 3), None);
    }

    /// Hands out its chunks one read at a time, timing out between them.
    struct Chunked {
        chunks: Vec<&'static str>,
        next: usize,
        timed_out: bool,
    }

    impl Read for Chunked {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.timed_out && self.next > 0 && self.next < self.chunks.len() {
                self.timed_out = true;
                return Err(io::Error::new(ErrorKind::TimedOut, "no data"));
            }
            self.timed_out = false;
            let Some(chunk) = self.chunks.get(self.next) else {
                return Ok(0);
            };
            self.next += 1;
            buf[..chunk.len()].copy_from_slice(chunk.as_bytes());
            Ok(chunk.len())
        }
    }

    #[test]
    fn partial_lines_survive_timeouts() {
        let reader = Chunked {
            chunks: vec!["4", "2\n7", "\n"],
            next: 0,
            timed_out: false,
        };
        let mut source = LineSource::new(BufReader::new(reader), 1, 16);
        assert_eq!(ready_lengths(&mut source, 0), Some((0, vec![0])));
        assert_eq!(ready_lengths(&mut source, 1), Some((1, vec![1])));
        assert_eq!(ready_lengths(&mut source, 2), Some((2, vec![2])));
        assert_eq!(source.rows(), 2);
        assert_eq!(source.ys[0].iter().copied().collect::<Vec<f64>>(), vec![42.0, 7.0]);
    }
}

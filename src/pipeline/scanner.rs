//! Per-file scan: read lines as bytes, decode best-effort, extract, insert into the shared set.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::utils::config::{CANCEL_CHECK_INTERVAL, LINE_BUF_CAPACITY};
use crate::{FileErrorKind, FileOutcome};

use super::context::PipelineContext;

/// Decode a line, dropping invalid UTF-8 sequences instead of failing or substituting.
pub fn decode_line(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// Strip one trailing `\n` or `\r\n`.
fn trim_line_ending(mut bytes: &[u8]) -> &[u8] {
    if let Some(rest) = bytes.strip_suffix(b"\n") {
        bytes = rest;
        if let Some(rest) = bytes.strip_suffix(b"\r") {
            bytes = rest;
        }
    }
    bytes
}

fn cancelled(path: &Path, lines: usize) -> FileOutcome {
    FileOutcome::failure(
        path,
        FileErrorKind::Cancelled,
        format!("stopped after {lines} lines"),
    )
}

/// Scan one file. Never panics into the caller and never retries: any open or read
/// error ends this file and comes back as a failure outcome. Identifiers inserted
/// before a mid-file error stay in the set.
pub fn scan_file(path: &Path, ctx: &PipelineContext<'_>) -> FileOutcome {
    if ctx.stop.should_stop() {
        return cancelled(path, 0);
    }
    match File::open(path) {
        Ok(file) => scan_lines(path, BufReader::new(file), ctx),
        Err(e) => FileOutcome::failure(path, FileErrorKind::from(&e), e.to_string()),
    }
}

/// Line loop over an open reader. The stop condition is polled every
/// [`CANCEL_CHECK_INTERVAL`] lines.
fn scan_lines<R: BufRead>(path: &Path, mut reader: R, ctx: &PipelineContext<'_>) -> FileOutcome {
    let mut buf = Vec::with_capacity(LINE_BUF_CAPACITY);
    let mut lines = 0_usize;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                return FileOutcome::failure(path, FileErrorKind::from(&e), e.to_string());
            }
        }
        let line = decode_line(trim_line_ending(&buf));
        ctx.identifiers.extend(ctx.extractor.extract(&line));
        lines += 1;

        if lines.is_multiple_of(CANCEL_CHECK_INTERVAL) && ctx.stop.should_stop() {
            return cancelled(path, lines);
        }
    }

    FileOutcome::Success {
        path: path.to_path_buf(),
        lines_processed: lines,
    }
}

//! Streaming line annotator
//!
//! Every hex token in a line that is a key of the symbol table gets a
//! ` | <token> -> <symbol>` suffix, left to right:
//!
//! ```text
//! PC=40081004 LR=40080ff0 fault
//! PC=40081004 LR=40080ff0 fault | 40081004 -> do_fault+3 | 40080ff0 -> el1_sync+12
//! ```
//!
//! Lines are handled as raw bytes, so non-UTF-8 log output passes through
//! untouched. Each line is written and flushed before the next one is read.

use std::io::{self, BufRead, Write};

use crate::hex::hex_tokens;
use crate::symbolization::SymbolTable;

/// Counters reported after a stream has been annotated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotateStats {
    pub lines: usize,
    pub annotated_lines: usize,
    pub annotations: usize,
}

/// Annotates lines against a finished, read-only symbol table
#[derive(Debug, Clone, Copy)]
pub struct Annotator<'t> {
    table: &'t SymbolTable,
}

impl<'t> Annotator<'t> {
    #[must_use]
    pub fn new(table: &'t SymbolTable) -> Self {
        Self { table }
    }

    /// Return `line` with its annotations appended. `line` must not contain
    /// its terminator.
    #[must_use]
    pub fn annotate_line(&self, line: &[u8]) -> Vec<u8> {
        let mut out = line.to_vec();
        self.push_annotations(line, &mut out);
        out
    }

    /// [`Self::annotate_line`] for text that is known to be UTF-8.
    #[must_use]
    pub fn annotate_str(&self, line: &str) -> String {
        String::from_utf8_lossy(&self.annotate_line(line.as_bytes())).into_owned()
    }

    /// Append ` | token -> symbol` for every resolvable token of `line` to
    /// `out`, returning how many were appended.
    fn push_annotations(&self, line: &[u8], out: &mut Vec<u8>) -> usize {
        let mut hits = 0;
        for token in hex_tokens(line) {
            // Tokens are ASCII hex digits.
            let Ok(token) = std::str::from_utf8(token) else {
                continue;
            };
            if let Some(entry) = self.table.get(token) {
                out.extend_from_slice(format!(" | {token} -> {entry}").as_bytes());
                hits += 1;
            }
        }
        hits
    }

    /// Copy `reader` to `writer` line by line, annotating each line.
    ///
    /// Line terminators (`\n`, `\r\n`, or none on the final line) are kept and
    /// annotations are placed before them. The writer is flushed after every
    /// line, so output keeps up with a live log.
    ///
    /// # Errors
    /// Returns the first I/O error from either side.
    pub fn annotate_stream<R, W>(&self, mut reader: R, mut writer: W) -> io::Result<AnnotateStats>
    where
        R: BufRead,
        W: Write,
    {
        let mut stats = AnnotateStats::default();
        let mut line = Vec::new();
        let mut out = Vec::new();

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }

            let (body, terminator) = split_terminator(&line);
            out.clear();
            out.extend_from_slice(body);
            let hits = self.push_annotations(body, &mut out);
            out.extend_from_slice(terminator);

            writer.write_all(&out)?;
            writer.flush()?;

            stats.lines += 1;
            stats.annotations += hits;
            if hits > 0 {
                stats.annotated_lines += 1;
            }
        }

        Ok(stats)
    }
}

/// Split a line read with `read_until(b'\n')` into its content and its
/// terminator.
fn split_terminator(line: &[u8]) -> (&[u8], &[u8]) {
    let body_len = if line.ends_with(b"\r\n") {
        line.len() - 2
    } else if line.ends_with(b"\n") {
        line.len() - 1
    } else {
        line.len()
    };
    line.split_at(body_len)
}

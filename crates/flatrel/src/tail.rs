//! Backward byte-scan for the final record of a delimited file.
//!
//! Locates the last record by reading fixed-size blocks from the end of the
//! file toward its start, so an unconditioned `last` never scans the whole
//! file. The record separator is assumed to be a single `\n` byte.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use crate::error::Result;

/// Block size for the backward scan, capped at the file size.
const BLOCK_SIZE: u64 = 1024;

/// Reads the final record of `file` without a forward scan.
///
/// Walks backward one block at a time, searching each block (excluding its
/// very last byte, which skips a possible trailing record terminator) for
/// the most recent `\n`. The final record starts just past that separator
/// and runs to end-of-file, with the trailing terminator stripped.
///
/// Returns `Ok(None)` when the scan underflows the start of the file —
/// an empty or header-only file has no complete record to find, and the
/// caller falls back to a full forward scan.
pub(crate) fn read_last_record(file: &mut File) -> Result<Option<String>> {
    let len = file.seek(SeekFrom::End(0))?;
    if len == 0 {
        return Ok(None);
    }

    let block = BLOCK_SIZE.min(len);
    let mut buf = vec![0u8; block as usize];
    let mut window_end = len;

    loop {
        if window_end < block {
            // Fewer than one full record ahead of the window.
            return Ok(None);
        }
        let window_start = window_end - block;
        file.seek(SeekFrom::Start(window_start))?;
        file.read_exact(&mut buf)?;

        if let Some(i) = buf[..buf.len() - 1].iter().rposition(|&b| b == b'\n') {
            let record_start = window_start + i as u64 + 1;
            file.seek(SeekFrom::Start(record_start))?;
            let mut line = String::new();
            file.read_to_string(&mut line)?;
            return Ok(Some(chomp(line)));
        }

        window_end = window_start;
    }
}

/// Strips one trailing record terminator (`\n` or `\r\n`).
fn chomp(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

//! Split a corpus into chunks whose boundaries never fall inside a token.
//!
//! A naive boundary sits `target` bytes after the previous one. It is kept
//! when either neighbouring byte is a separator; otherwise it moves forward
//! to the next separator or to end-of-file. The next chunk starts exactly
//! where the previous one ended, so the plan always partitions
//! `[0, file_size)`.

use std::io::{self, ErrorKind, Read, Seek, SeekFrom};
use std::num::NonZeroU64;

use tally_types::{Chunk, is_separator};

const SNAP_BUF: usize = 8 * 1024;

/// Plan chunks over an in-memory buffer.
pub fn plan_bytes(data: &[u8], target: NonZeroU64) -> Vec<Chunk> {
    let planned: Result<_, std::convert::Infallible> =
        plan_with(data.len() as u64, target, |boundary| {
            Ok(snap_in_slice(data, boundary as usize) as u64)
        });
    match planned {
        Ok(chunks) => chunks,
        Err(never) => match never {},
    }
}

/// Plan chunks over a seekable source of `file_size` bytes, reading only the
/// bytes around each boundary.
pub fn plan<R: Read + Seek>(
    source: &mut R,
    file_size: u64,
    target: NonZeroU64,
) -> io::Result<Vec<Chunk>> {
    plan_with(file_size, target, |boundary| {
        snap_in_reader(&mut *source, boundary, file_size)
    })
}

fn plan_with<E>(
    file_size: u64,
    target: NonZeroU64,
    mut snap: impl FnMut(u64) -> Result<u64, E>,
) -> Result<Vec<Chunk>, E> {
    let estimate = usize::try_from(file_size / target.get()).unwrap_or(0);
    let mut chunks = Vec::with_capacity(estimate.saturating_add(1));
    let mut start = 0u64;
    while start < file_size {
        let naive = start.saturating_add(target.get()).min(file_size);
        let end = if naive < file_size { snap(naive)? } else { file_size };
        chunks.push(Chunk {
            index: chunks.len(),
            start,
            end,
        });
        start = end;
    }
    Ok(chunks)
}

// `boundary` is interior: 0 < boundary < data.len().
fn snap_in_slice(data: &[u8], boundary: usize) -> usize {
    if is_separator(data[boundary - 1]) || is_separator(data[boundary]) {
        return boundary;
    }
    data[boundary..]
        .iter()
        .position(|&b| is_separator(b))
        .map_or(data.len(), |offset| boundary + offset)
}

fn snap_in_reader<R: Read + Seek>(
    source: &mut R,
    boundary: u64,
    file_size: u64,
) -> io::Result<u64> {
    let first = boundary - 1;
    source.seek(SeekFrom::Start(first))?;
    let mut limited = source.by_ref().take(file_size - first);
    let mut buf = [0u8; SNAP_BUF];
    let mut pos = first;
    loop {
        let n = match limited.read(&mut buf) {
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        if n == 0 {
            return Ok(file_size);
        }
        for &byte in &buf[..n] {
            if is_separator(byte) {
                return Ok(pos.max(boundary));
            }
            pos += 1;
        }
    }
}

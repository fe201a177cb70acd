use std::fmt;
use std::fs::File;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Take};
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use tally_types::Chunk;

use crate::error::ScanError;
use crate::planner;

/// How workers get at the bytes of their chunk.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ReadMode {
    /// Each worker opens the file, seeks to its range and reads it in slabs.
    #[default]
    Stream,
    /// Map the corpus once and let workers slice the shared mapping.
    Mmap,
}

impl fmt::Display for ReadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReadMode::Stream => "stream",
            ReadMode::Mmap => "mmap",
        })
    }
}

/// Source of one chunk's bytes, as handed to a worker.
pub enum ChunkBytes<'a> {
    /// The chunk's range of the shared mapping.
    Mapped(&'a [u8]),
    /// A file positioned at the chunk start and limited to its length.
    Stream(Take<File>),
}

enum Backing {
    Stream,
    Mmap(Mmap),
}

/// Read-only handle on the corpus file shared by every worker of a run.
pub struct Corpus {
    path: PathBuf,
    size: u64,
    backing: Backing,
}

impl Corpus {
    pub fn open(path: impl AsRef<Path>, mode: ReadMode) -> Result<Self, ScanError> {
        let path = path.as_ref().to_path_buf();
        let unreadable = |source: io::Error| ScanError::SourceUnreadable {
            origin: path.display().to_string(),
            source,
        };

        let file = File::open(&path).map_err(unreadable)?;
        let meta = file.metadata().map_err(unreadable)?;
        if !meta.is_file() {
            return Err(unreadable(io::Error::new(
                ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }
        let size = meta.len();

        // Zero-length mappings are rejected by some platforms; an empty corpus
        // has nothing to read either way.
        let backing = match mode {
            ReadMode::Mmap if size > 0 => {
                let map = unsafe { Mmap::map(&file) }.map_err(unreadable)?;
                Backing::Mmap(map)
            }
            _ => Backing::Stream,
        };

        Ok(Self {
            path,
            size,
            backing,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn mode(&self) -> ReadMode {
        match self.backing {
            Backing::Stream => ReadMode::Stream,
            Backing::Mmap(_) => ReadMode::Mmap,
        }
    }

    /// Boundary-safe chunk plan for this corpus.
    pub fn plan(&self, target: NonZeroU64) -> Result<Vec<Chunk>, ScanError> {
        match &self.backing {
            Backing::Mmap(map) => Ok(planner::plan_bytes(map, target)),
            Backing::Stream => {
                let mut file = File::open(&self.path).map_err(|source| self.unreadable(source))?;
                planner::plan(&mut file, self.size, target).map_err(|source| self.unreadable(source))
            }
        }
    }

    /// Open the byte range of `chunk`. A mapped range that no longer fits the
    /// mapping is an `UnexpectedEof`; a stream may still come up short and
    /// callers check how much they read.
    pub fn open_chunk(&self, chunk: Chunk) -> io::Result<ChunkBytes<'_>> {
        match &self.backing {
            Backing::Mmap(map) => {
                let (start, end) = (chunk.start as usize, chunk.end as usize);
                map.get(start..end)
                    .map(ChunkBytes::Mapped)
                    .ok_or_else(|| io::Error::new(ErrorKind::UnexpectedEof, "chunk past end of map"))
            }
            Backing::Stream => {
                let mut file = File::open(&self.path)?;
                file.seek(SeekFrom::Start(chunk.start))?;
                Ok(ChunkBytes::Stream(file.take(chunk.len())))
            }
        }
    }

    fn unreadable(&self, source: io::Error) -> ScanError {
        ScanError::SourceUnreadable {
            origin: self.path.display().to_string(),
            source,
        }
    }
}

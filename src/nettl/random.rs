use std::cmp;
use std::io::{Read, Seek, SeekFrom};
use tracing::trace;

use crate::error::NettlError;
use crate::nettl::frame::Frame;
use crate::nettl::header::Generation;
use crate::nettl::reader::{read_record, EofPolicy};

/// Random-access reader over nettl data
///
/// Reads single records at absolute offsets, typically offsets previously returned by
/// [`FrameReader::position`](crate::traits::FrameReader::position) before a call to `next`.
/// The stream must be distinct from the one used by the sequential reader, since both
/// move their read position.
///
/// ```rust
/// use nettl_parser::*;
/// use std::io::Cursor;
///
/// # let data = vec![0u8; 0x80];
/// let mut random = NettlRandomReader::new(Cursor::new(data), Generation::HpUx11);
/// // there is no record at the data offset: this is a short read
/// assert!(matches!(random.read_at(0x80), Err(NettlError::ShortRead)));
/// ```
pub struct NettlRandomReader<R>
where
    R: Read + Seek,
{
    reader: R,
    generation: Generation,
    buffer: Vec<u8>,
}

impl<R> NettlRandomReader<R>
where
    R: Read + Seek,
{
    pub fn new(reader: R, generation: Generation) -> NettlRandomReader<R> {
        NettlRandomReader {
            reader,
            generation,
            buffer: Vec::new(),
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Read the record starting at `offset`
    ///
    /// Since a record is expected at `offset`, reaching the end of the stream is always a
    /// `ShortRead` error.
    pub fn read_at(&mut self, offset: u64) -> Result<Frame, NettlError> {
        self.reader.seek(SeekFrom::Start(offset))?;
        self.buffer.clear();
        let mut at_eof = false;
        loop {
            let res = read_record(
                &self.buffer,
                self.generation,
                at_eof,
                EofPolicy::ShortRead,
                |_| (),
            );
            match res {
                Ok(frame) => {
                    trace!(offset, subsystem = %frame.header.subsystem, "read record at offset");
                    return Ok(frame);
                }
                Err(NettlError::Incomplete(needed)) => {
                    let needed = cmp::max(needed, 1);
                    let sz = (&mut self.reader)
                        .take(needed as u64)
                        .read_to_end(&mut self.buffer)?;
                    at_eof = sz < needed;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Closes the reader, and returns the underlying stream
    pub fn into_inner(self) -> R {
        self.reader
    }
}

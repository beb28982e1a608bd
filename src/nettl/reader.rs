use circular::Buffer;
use nom::Offset;
use std::cmp;
use std::io::{self, Read, Seek};
use tracing::{debug, trace, warn};

use crate::error::NettlError;
use crate::linktype::Encapsulation;
use crate::nettl::frame::{parse_frame_data, Frame};
use crate::nettl::header::{parse_nettl_header, Generation, NettlHeader, NETTL_DATA_OFFSET};
use crate::nettl::random::NettlRandomReader;
use crate::nettl::record::{parse_record_header, RecordHeader};
use crate::traits::FrameReader;

/// Outcome of a read ending exactly at a record boundary
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EofPolicy {
    /// The stream is over (`NettlError::Eof`)
    EndOfStream,
    /// A record was expected (`NettlError::ShortRead`)
    ShortRead,
}

/// Decode one record (header and frame data) from the start of `i`
///
/// `at_eof` tells whether `i` holds everything left in the stream. If not, a record that does
/// not fit is reported as `Incomplete`, and the caller should read more data and call again.
/// Otherwise, it is `ShortRead`, or the outcome chosen by `eof` if `i` is empty.
///
/// `on_header` is called once the record header is decoded, before the frame data is read. It
/// can be called again for the same record if the data is incomplete.
pub(crate) fn read_record<F>(
    i: &[u8],
    generation: Generation,
    at_eof: bool,
    eof: EofPolicy,
    mut on_header: F,
) -> Result<Frame, NettlError>
where
    F: FnMut(&RecordHeader),
{
    let res = parse_record_header(i, generation).and_then(|(rem, header)| {
        on_header(&header);
        parse_frame_data(rem, header)
    });
    match res {
        Ok((_, frame)) => Ok(frame),
        Err(nom::Err::Incomplete(needed)) => {
            if !at_eof {
                Err(NettlError::from(nom::Err::Incomplete(needed)))
            } else if i.is_empty() && eof == EofPolicy::EndOfStream {
                Err(NettlError::Eof)
            } else {
                Err(NettlError::ShortRead)
            }
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e),
    }
}

fn track_encapsulation(encapsulation: &mut Encapsulation, header: &RecordHeader) {
    let previous = *encapsulation;
    encapsulation.update(header.link_type);
    if previous != *encapsulation {
        debug!(
            from = %previous,
            to = %encapsulation,
            subsystem = %header.subsystem,
            "file encapsulation changed"
        );
    }
}

/// Read from `reader`, retrying if interrupted
fn read_some<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            r => return r,
        }
    }
}

/// Sequential reader over nettl data (streaming version)
///
/// ## nettl Reader
///
/// This reader is a streaming parser based on a circular buffer, which means memory usage is
/// bounded by the largest record, and that it can be used to parse huge files or streams.
/// It creates an abstraction over any input providing the `Read` trait, and refills or grows
/// the buffer as needed so that each call to `next` returns a complete frame.
///
/// The file header is read when the reader is created. Then, each call to `next` returns the
/// next frame, or `NettlError::Eof` at the end of the stream. On any error, the position is
/// not changed and the record bytes stay buffered: calling `next` again retries the same record
/// (for ex. after the file has grown).
///
/// The reader also tracks the file-wide [`Encapsulation`].
///
/// ## Example
///
/// ```rust
/// use nettl_parser::*;
/// use nettl_parser::traits::FrameReader;
///
/// # let data = [0x54, 0x52, 0x00, 0x64, 0, 0, 0, 0, 0, 0, 0, 0x80];
/// # let mut data = data.to_vec();
/// # data.resize(0x80, 0);
/// # let input = &data[..];
/// let mut reader = NettlReader::new(65536, input).expect("NettlReader");
/// let mut num_frames = 0;
/// loop {
///     match reader.next() {
///         Ok(frame) => {
///             println!("got frame, link type {}", frame.link_type());
///             num_frames += 1;
///         }
///         Err(NettlError::Eof) => break,
///         Err(e) => panic!("error while reading: {:?}", e),
///     }
/// }
/// println!("num_frames: {}", num_frames);
/// println!("encapsulation: {}", reader.encapsulation());
/// ```
pub struct NettlReader<R>
where
    R: Read,
{
    header: NettlHeader,
    reader: R,
    buffer: Buffer,
    offset: u64,
    reader_exhausted: bool,
    encapsulation: Encapsulation,
}

impl<R> NettlReader<R>
where
    R: Read,
{
    /// Creates a new `NettlReader<R>` with the provided buffer capacity.
    ///
    /// The capacity is raised to at least the size of the file header. Records larger than the
    /// buffer make it grow.
    pub fn new(capacity: usize, reader: R) -> Result<NettlReader<R>, NettlError> {
        let buffer = Buffer::with_capacity(cmp::max(capacity, NETTL_DATA_OFFSET));
        Self::from_buffer(buffer, reader)
    }

    /// Creates a new `NettlReader<R>` using the provided `Buffer`.
    pub fn from_buffer(mut buffer: Buffer, mut reader: R) -> Result<NettlReader<R>, NettlError> {
        if buffer.capacity() < NETTL_DATA_OFFSET {
            buffer.grow(NETTL_DATA_OFFSET);
        }
        let mut reader_exhausted = false;
        while buffer.available_data() < NETTL_DATA_OFFSET {
            let sz = read_some(&mut reader, buffer.space())?;
            if sz == 0 {
                reader_exhausted = true;
                break;
            }
            buffer.fill(sz);
        }
        let data = buffer.data();
        let (rem, header) = parse_nettl_header(data).map_err(NettlError::from)?;
        let header_len = data.offset(rem);
        buffer.consume(header_len);
        debug!(
            magic = ?header.magic,
            generation = ?header.generation,
            "nettl header recognized"
        );
        Ok(NettlReader {
            header,
            reader,
            buffer,
            offset: NETTL_DATA_OFFSET as u64,
            reader_exhausted,
            encapsulation: Encapsulation::Unknown,
        })
    }

    pub fn header(&self) -> &NettlHeader {
        &self.header
    }

    pub fn generation(&self) -> Generation {
        self.header.generation
    }

    /// File-wide encapsulation of the records whose header was decoded so far
    ///
    /// A record is accounted for as soon as its header is decoded, even if reading its data
    /// then fails (for ex. with `ShortRead`).
    pub fn encapsulation(&self) -> Encapsulation {
        self.encapsulation
    }

    /// Creates a random-access reader for the same file, over another stream handle
    ///
    /// `stream` must give access to the same data as this reader. Its position is independent
    /// from the position of this reader.
    pub fn random_access<S>(&self, stream: S) -> NettlRandomReader<S>
    where
        S: Read + Seek,
    {
        NettlRandomReader::new(stream, self.header.generation)
    }

    /// Closes the reader, and returns the underlying stream
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Read at least one more byte, growing the buffer if `needed` bytes do not fit
    fn refill(&mut self, needed: usize) -> Result<(), NettlError> {
        self.buffer.shift();
        let needed = cmp::max(needed, 1);
        if self.buffer.available_space() < needed {
            // grow by doubling, so that allocation follows the data actually read
            let capacity = self.buffer.capacity();
            let target = self.buffer.available_data() + needed;
            let new_size = cmp::min(target, capacity.saturating_mul(2));
            trace!(capacity, new_size, "growing buffer");
            self.buffer.grow(new_size);
        }
        let sz = read_some(&mut self.reader, self.buffer.space())?;
        self.reader_exhausted = sz == 0;
        self.buffer.fill(sz);
        Ok(())
    }
}

impl<R> FrameReader for NettlReader<R>
where
    R: Read,
{
    fn next(&mut self) -> Result<Frame, NettlError> {
        // check for new data, even if a previous read hit the end of the stream
        self.reader_exhausted = false;
        loop {
            let encapsulation = &mut self.encapsulation;
            let res = read_record(
                self.buffer.data(),
                self.header.generation,
                self.reader_exhausted,
                EofPolicy::EndOfStream,
                |header| track_encapsulation(encapsulation, header),
            );
            match res {
                Ok(frame) => {
                    trace!(
                        offset = self.offset,
                        subsystem = %frame.header.subsystem,
                        caplen = frame.header.caplen,
                        origlen = frame.header.origlen,
                        "read record"
                    );
                    self.buffer.consume(frame.record_len);
                    self.offset += frame.record_len as u64;
                    return Ok(frame);
                }
                Err(NettlError::Incomplete(needed)) => self.refill(needed)?,
                Err(NettlError::Eof) => return Err(NettlError::Eof),
                Err(e) => {
                    warn!(offset = self.offset, error = %e, "could not read record");
                    return Err(e);
                }
            }
        }
    }

    fn position(&self) -> u64 {
        self.offset
    }
}

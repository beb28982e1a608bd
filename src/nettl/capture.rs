use nom::IResult;
use std::fmt;

use crate::capture::Capture;
use crate::error::NettlError;
use crate::linktype::Encapsulation;
use crate::nettl::frame::Frame;
use crate::nettl::header::{parse_nettl_header, NettlHeader};
use crate::nettl::reader::{read_record, EofPolicy};

/// Generic interface for nettl file access (requires data to be loaded into memory)
///
/// ```rust
/// use nettl_parser::*;
///
/// # let mut buffer = vec![0x54, 0x52, 0x00, 0x64, 0, 0, 0, 0, 0, 0, 0, 0x80];
/// # buffer.resize(0x80, 0);
/// match NettlCapture::from_file(&buffer) {
///     Ok(capture) => {
///         println!("encapsulation: {}", capture.get_datalink());
///         for frame in capture.iter() {
///             println!("frame: {} bytes", frame.caplen());
///         }
///     }
///     Err(e) => println!("not a valid nettl file: {}", e),
/// }
/// ```
pub struct NettlCapture {
    pub header: NettlHeader,
    pub encapsulation: Encapsulation,
    pub frames: Vec<Frame>,
}

impl NettlCapture {
    pub fn from_file(i: &[u8]) -> Result<NettlCapture, NettlError> {
        match parse_nettl(i) {
            Ok((_, capture)) => Ok(capture),
            Err(e) => Err(NettlError::from(e)),
        }
    }
}

impl fmt::Debug for NettlCapture {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        writeln!(
            f,
            "NettlCapture: {:?}, {} frames, encapsulation {}",
            self.header.generation,
            self.frames.len(),
            self.encapsulation
        )
    }
}

impl Capture for NettlCapture {
    fn get_datalink(&self) -> Encapsulation {
        self.encapsulation
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Frame> + 'a> {
        Box::new(self.frames.iter())
    }
}

/// Parse the entire file
///
/// Note: this requires the file to be fully loaded to memory. Parsing stops with an error at
/// the first record that cannot be decoded.
pub fn parse_nettl(i: &[u8]) -> IResult<&[u8], NettlCapture, NettlError> {
    let (mut i, header) = parse_nettl_header(i)?;
    let mut encapsulation = Encapsulation::Unknown;
    let mut frames = Vec::new();
    loop {
        let res = read_record(i, header.generation, true, EofPolicy::EndOfStream, |hdr| {
            encapsulation.update(hdr.link_type)
        });
        match res {
            Ok(frame) => {
                i = &i[frame.record_len..];
                frames.push(frame);
            }
            Err(NettlError::Eof) => break,
            Err(e) => return Err(nom::Err::Failure(e)),
        }
    }
    let capture = NettlCapture {
        header,
        encapsulation,
        frames,
    };
    Ok((i, capture))
}

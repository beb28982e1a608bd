//! # nettl parser
//!
//! This crate contains parsers for the capture trace files written by the HP-UX `nettl`
//! facility.
//!
//! A nettl file is a sequence of records coming from several subsystems (IP layer, network
//! cards, X.25, ...), each with its own header layout and padding quirks. The parsers decode
//! them into [`Frame`]s carrying the timestamp, the captured and original lengths, the
//! [`LinkType`] and the frame data, for use by protocol dissectors. Frame contents are not
//! interpreted.
//!
//! Malformed or truncated input is always reported as an error (see [`NettlError`]); the
//! parsers use only safe code.
//!
//! # Example: streaming parser
//!
//! The following code shows how to read the frames of a file, using a
//! [`NettlReader`](struct.NettlReader.html) streaming parser, and how to read a frame again
//! using its offset.
//!
//! ```rust,no_run
//! use nettl_parser::*;
//! use nettl_parser::traits::FrameReader;
//! use std::fs::File;
//!
//! # let path = "trace.TRC0";
//! let file = File::open(path).unwrap();
//! let mut reader = NettlReader::new(65536, file).expect("NettlReader");
//! let mut offsets = Vec::new();
//! loop {
//!     let offset = reader.position();
//!     match reader.next() {
//!         Ok(frame) => {
//!             println!("{} bytes of {}", frame.caplen(), frame.link_type());
//!             offsets.push(offset);
//!         }
//!         Err(NettlError::Eof) => break,
//!         Err(e) => panic!("error while reading: {:?}", e),
//!     }
//! }
//! let mut random = reader.random_access(File::open(path).unwrap());
//! for offset in offsets {
//!     let _frame = random.read_at(offset).expect("read_at");
//! }
//! ```
//!
//! If the file is already loaded to memory, use [`NettlCapture`](struct.NettlCapture.html).

mod capture;
mod error;
mod linktype;
pub use capture::*;
pub use error::*;
pub use linktype::*;

pub mod nettl;
pub use nettl::*;

pub mod traits;

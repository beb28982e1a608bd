//! HP-UX nettl capture format
//!
//! nettl traces start with a 128-byte file header, identified by a 12-byte magic number, and
//! followed by a sequence of records. Each record has a header whose layout depends on the
//! subsystem which produced it, followed by the captured frame.
//!
//! There are 3 main ways of reading a nettl file:
//!
//! - [`NettlReader`] reads frames sequentially from any `Read` input, using a circular buffer
//! - [`NettlRandomReader`] reads the record at a given offset, from a `Read + Seek` input
//! - [`NettlCapture`] parses a whole file loaded to memory (see [`parse_nettl`])
//!
//! The lower-level parsers [`parse_nettl_header`], [`parse_record_header`] and
//! [`parse_frame_data`] work on byte slices and return `Incomplete` when more data is needed.

mod capture;
mod frame;
mod header;
mod random;
mod reader;
mod record;
mod subsystem;

pub use capture::*;
pub use frame::*;
pub use header::*;
pub use random::*;
pub use reader::{EofPolicy, NettlReader};
pub use record::*;
pub use subsystem::Subsystem;

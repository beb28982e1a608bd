//! Common traits for nettl readers

use crate::error::NettlError;
use crate::nettl::Frame;

/// Iterator-like interface over the frames of a capture
///
/// Contrary to `Iterator`, `next` returns a `Result`: the end of the stream is signaled by
/// `Err(NettlError::Eof)`, and other errors are fatal to the current read. Use
/// [`frames`](FrameReader::frames) to get a standard iterator.
pub trait FrameReader {
    /// Read the next frame
    fn next(&mut self) -> Result<Frame, NettlError>;

    /// Absolute offset of the next record in the stream
    fn position(&self) -> u64;

    /// Returns an iterator over the remaining frames
    ///
    /// The iterator ends after `Eof`, or after the first error, which is returned.
    fn frames(&mut self) -> Frames<'_, Self>
    where
        Self: Sized,
    {
        Frames {
            reader: self,
            done: false,
        }
    }
}

/// Iterator over the frames of a [`FrameReader`]
pub struct Frames<'a, T> {
    reader: &'a mut T,
    done: bool,
}

impl<'a, T: FrameReader> Iterator for Frames<'a, T> {
    type Item = Result<Frame, NettlError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next() {
            Ok(frame) => Some(Ok(frame)),
            Err(NettlError::Eof) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

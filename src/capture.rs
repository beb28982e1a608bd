use crate::linktype::Encapsulation;
use crate::nettl::Frame;

/// Generic interface for nettl file access
pub trait Capture {
    /// File-wide encapsulation
    fn get_datalink(&self) -> Encapsulation;

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Frame> + 'a>;
}

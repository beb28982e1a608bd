use nom::IResult;
use std::io;

use crate::error::NettlError;

/// Magic number of traces written by HP-UX 9
pub const NETTL_MAGIC_HPUX9: [u8; 12] = [
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x07, 0xD0, 0x00,
];
/// Magic number of traces written by HP-UX 10 and later
pub const NETTL_MAGIC_HPUX10: [u8; 12] = [
    0x54, 0x52, 0x00, 0x64, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80,
];

/// Offset of the 2-byte OS version marker
pub const NETTL_VERSION_OFFSET: usize = 0x63;
/// Offset of the first record
pub const NETTL_DATA_OFFSET: usize = 0x80;

/// Which magic number the file starts with
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NettlMagic {
    HpUx9,
    HpUx10,
}

/// Record header generation
///
/// Traces written by HP-UX 11 have record headers 4 bytes longer than the ones written by
/// HP-UX 9 and 10.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Generation {
    Legacy,
    HpUx11,
}

impl Generation {
    /// Number of extra bytes following the fixed record header
    pub const fn extra_header_len(self) -> usize {
        match self {
            Generation::Legacy => 0,
            Generation::HpUx11 => 4,
        }
    }
}

/// nettl file header
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NettlHeader {
    pub magic: NettlMagic,
    /// Raw OS version marker (`"11"` for HP-UX 11)
    pub os_version: [u8; 2],
    pub generation: Generation,
}

impl NettlHeader {
    pub const fn size(&self) -> usize {
        NETTL_DATA_OFFSET
    }

    pub fn is_hpux11(&self) -> bool {
        self.generation == Generation::HpUx11
    }
}

/// Read the nettl file header
///
/// The input must hold the whole file header (`NETTL_DATA_OFFSET` bytes), or the whole file if
/// it is shorter: a file that ends after the version marker is valid and contains no records.
///
/// An empty input, an input that does not start with a nettl magic, or that ends before the
/// version marker, is rejected with `HeaderNotRecognized`. An input that ends inside the magic
/// is an I/O error (unexpected EOF).
pub fn parse_nettl_header(i: &[u8]) -> IResult<&[u8], NettlHeader, NettlError> {
    if i.is_empty() {
        return Err(nom::Err::Error(NettlError::HeaderNotRecognized));
    }
    if i.len() < NETTL_MAGIC_HPUX9.len() {
        let e = io::Error::new(io::ErrorKind::UnexpectedEof, "truncated nettl magic");
        return Err(nom::Err::Failure(NettlError::Io(e)));
    }
    let magic = match &i[..12] {
        m if m == &NETTL_MAGIC_HPUX9[..] => NettlMagic::HpUx9,
        m if m == &NETTL_MAGIC_HPUX10[..] => NettlMagic::HpUx10,
        _ => return Err(nom::Err::Error(NettlError::HeaderNotRecognized)),
    };
    if i.len() < NETTL_VERSION_OFFSET + 2 {
        return Err(nom::Err::Error(NettlError::HeaderNotRecognized));
    }
    let os_version = [i[NETTL_VERSION_OFFSET], i[NETTL_VERSION_OFFSET + 1]];
    let generation = if &os_version == b"11" {
        Generation::HpUx11
    } else {
        Generation::Legacy
    };
    let header = NettlHeader {
        magic,
        os_version,
        generation,
    };
    let rem = &i[i.len().min(NETTL_DATA_OFFSET)..];
    Ok((rem, header))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_header(magic: &[u8; 12], version: &[u8; 2]) -> Vec<u8> {
        let mut v = vec![0; NETTL_DATA_OFFSET];
        v[..12].copy_from_slice(magic);
        // HP-UX release string, as written by nettl ("B.11.00")
        v[NETTL_VERSION_OFFSET - 2..NETTL_VERSION_OFFSET].copy_from_slice(b"B.");
        v[NETTL_VERSION_OFFSET..NETTL_VERSION_OFFSET + 2].copy_from_slice(version);
        v
    }

    #[test]
    fn test_parse_nettl_header_hpux11() {
        let mut data = file_header(&NETTL_MAGIC_HPUX10, b"11");
        data.extend_from_slice(&[1, 2, 3]);
        let (rem, hdr) = parse_nettl_header(&data).expect("header parsing failed");
        assert_eq!(rem, &[1, 2, 3]);
        assert_eq!(hdr.magic, NettlMagic::HpUx10);
        assert_eq!(hdr.generation, Generation::HpUx11);
        assert!(hdr.is_hpux11());
        assert_eq!(hdr.size(), 0x80);
    }

    #[test]
    fn test_parse_nettl_header_hpux9() {
        let data = file_header(&NETTL_MAGIC_HPUX9, b"09");
        let (rem, hdr) = parse_nettl_header(&data).expect("header parsing failed");
        assert!(rem.is_empty());
        assert_eq!(hdr.magic, NettlMagic::HpUx9);
        assert_eq!(hdr.generation, Generation::Legacy);
        assert_eq!(&hdr.os_version, b"09");
    }

    #[test]
    fn test_parse_nettl_header_not_recognized() {
        let mut data = file_header(&NETTL_MAGIC_HPUX10, b"11");
        data[11] = 0x81;
        let res = parse_nettl_header(&data);
        assert!(matches!(
            res,
            Err(nom::Err::Error(NettlError::HeaderNotRecognized))
        ));
        let res = parse_nettl_header(&[]);
        assert!(matches!(
            res,
            Err(nom::Err::Error(NettlError::HeaderNotRecognized))
        ));
    }

    #[test]
    fn test_parse_nettl_header_truncated() {
        let data = file_header(&NETTL_MAGIC_HPUX10, b"11");
        let res = parse_nettl_header(&data[..5]);
        assert!(matches!(res, Err(nom::Err::Failure(NettlError::Io(_)))));
        // magic present, but no version marker
        let res = parse_nettl_header(&data[..0x40]);
        assert!(matches!(
            res,
            Err(nom::Err::Error(NettlError::HeaderNotRecognized))
        ));
        // version marker present, no data
        let (rem, hdr) = parse_nettl_header(&data[..0x70]).expect("header parsing failed");
        assert!(rem.is_empty());
        assert_eq!(hdr.generation, Generation::HpUx11);
    }
}

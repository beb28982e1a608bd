use nom::bytes::streaming::take;
use nom::IResult;

use crate::error::NettlError;
use crate::linktype::LinkType;
use crate::nettl::record::{strip_padding, RecordHeader};

/// SAP value announcing a SNAP header
pub const SNAP_SAP: u8 = 0xAA;

// FC, destination, source, DSAP and SSAP
const FDDI_MAC_LLC_LEN: usize = 15;
const FDDI_DSAP_OFFSET: usize = 13;
// undocumented bytes following the SAPs of inbound SNAP frames
const FDDI_SNAP_GAP_LEN: usize = 3;

/// A decoded nettl record: normalized header and frame data
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    pub header: RecordHeader,
    /// Frame data, exactly `header.caplen` bytes
    pub data: Vec<u8>,
    /// Number of bytes used by the record in the file
    pub record_len: usize,
}

impl Frame {
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
    #[inline]
    pub fn link_type(&self) -> LinkType {
        self.header.link_type
    }
    #[inline]
    pub fn caplen(&self) -> u32 {
        self.header.caplen
    }
    #[inline]
    pub fn origlen(&self) -> u32 {
        self.header.origlen
    }
    /// See [`RecordHeader::ts`]
    #[inline]
    pub fn ts(&self) -> (u32, u32, u64) {
        self.header.ts()
    }
}

/// Read the frame data following a record header
///
/// The data is normally `caplen` bytes, returned unmodified.
///
/// Inbound HP-PB FDDI frames are reconstructed: the first 15 bytes (frame control, addresses and
/// SAPs) are read, and if the DSAP announces a SNAP header, the 3 following bytes are not part of
/// the frame and are skipped. The record still uses `caplen` bytes in the file, but the returned
/// frame is 3 bytes shorter and its header lengths are adjusted accordingly. A frame left with a
/// zero length is rejected with `ZeroLength`.
pub fn parse_frame_data(i: &[u8], header: RecordHeader) -> IResult<&[u8], Frame, NettlError> {
    let caplen = header.caplen as usize;
    let record_len = header
        .header_len
        .checked_add(caplen)
        .ok_or(nom::Err::Failure(NettlError::ShortRead))?;
    if !header.fddi_reconstruction {
        let (i, data) = take(caplen)(i)?;
        let frame = Frame {
            header,
            data: data.to_vec(),
            record_len,
        };
        return Ok((i, frame));
    }
    strip_padding("captured", header.caplen, FDDI_MAC_LLC_LEN)?;
    let (i, mac) = take(FDDI_MAC_LLC_LEN)(i)?;
    let mut header = header;
    let (i, rest) = if mac[FDDI_DSAP_OFFSET] == SNAP_SAP {
        let skipped = FDDI_MAC_LLC_LEN + FDDI_SNAP_GAP_LEN;
        strip_padding("captured", header.caplen, skipped)?;
        header.caplen = strip_padding("captured", header.caplen, FDDI_SNAP_GAP_LEN)?;
        header.origlen = strip_padding("original", header.origlen, FDDI_SNAP_GAP_LEN)?;
        if header.caplen == 0 || header.origlen == 0 {
            return Err(nom::Err::Failure(NettlError::ZeroLength));
        }
        let (i, _) = take(FDDI_SNAP_GAP_LEN)(i)?;
        take(caplen - skipped)(i)?
    } else {
        take(caplen - FDDI_MAC_LLC_LEN)(i)?
    };
    let mut data = Vec::with_capacity(mac.len() + rest.len());
    data.extend_from_slice(mac);
    data.extend_from_slice(rest);
    let frame = Frame {
        header,
        data,
        record_len,
    };
    Ok((i, frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nettl::header::Generation;
    use crate::nettl::record::parse_record_header;
    use crate::nettl::record::tests::{lan_ip_record, DRIVER_RECORD_HDR};
    use crate::nettl::record::NETTL_HDR_PDUIN;
    use hex_literal::hex;

    // FDDI MAC + LLC header of an inbound SNAP frame, followed by the 3 gap bytes
    const FDDI_SNAP_MAC: &[u8] = &hex!(
        "
50 00 00 0c 07 ac 01 08 00 20 1a 2b 3c aa aa 03
00 00"
    );

    fn header_for(record: &[u8]) -> RecordHeader {
        let (_, hdr) =
            parse_record_header(record, Generation::Legacy).expect("header parsing failed");
        hdr
    }

    #[test]
    fn test_parse_frame_data() {
        let (_, hdr) = parse_record_header(DRIVER_RECORD_HDR, Generation::HpUx11)
            .expect("header parsing failed");
        let payload: Vec<u8> = (0..0x5c).collect();
        let mut data = payload.clone();
        data.push(0xff);
        let (rem, frame) = parse_frame_data(&data, hdr).expect("frame parsing failed");
        assert_eq!(rem, &[0xff]);
        assert_eq!(frame.data(), &payload[..]);
        assert_eq!(frame.link_type(), LinkType::Ethernet);
        assert_eq!(frame.record_len, 92 + 0x5c);
    }

    #[test]
    fn test_parse_frame_data_short() {
        let hdr = header_for(&lan_ip_record(9, 0x10, 40, 40));
        let data = [0u8; 39];
        let res = parse_frame_data(&data, hdr);
        assert!(matches!(res, Err(nom::Err::Incomplete(_))));
    }

    #[test]
    fn test_fddi_reconstruction_snap() {
        let hdr = header_for(&lan_ip_record(95, NETTL_HDR_PDUIN, 40, 40));
        let mut data = FDDI_SNAP_MAC.to_vec();
        data.extend_from_slice(&[0x5a; 40 - 18]);
        assert_eq!(data.len(), 40);
        let (rem, frame) = parse_frame_data(&data, hdr).expect("frame parsing failed");
        assert!(rem.is_empty());
        assert_eq!(frame.data().len(), 37);
        assert_eq!(frame.caplen(), 37);
        assert_eq!(frame.origlen(), 37);
        assert_eq!(&frame.data()[..15], &FDDI_SNAP_MAC[..15]);
        assert!(frame.data()[15..].iter().all(|&b| b == 0x5a));
        assert_eq!(frame.record_len, 64 + 40);
    }

    #[test]
    fn test_fddi_reconstruction_no_snap() {
        let hdr = header_for(&lan_ip_record(95, NETTL_HDR_PDUIN, 40, 40));
        let mut data = FDDI_SNAP_MAC[..15].to_vec();
        data[13] = 0x42;
        data.extend_from_slice(&[0x5a; 25]);
        let (rem, frame) = parse_frame_data(&data, hdr).expect("frame parsing failed");
        assert!(rem.is_empty());
        assert_eq!(frame.data(), &data[..]);
        assert_eq!(frame.caplen(), 40);
    }

    #[test]
    fn test_fddi_reconstruction_short() {
        let hdr = header_for(&lan_ip_record(95, NETTL_HDR_PDUIN, 40, 40));
        let res = parse_frame_data(&FDDI_SNAP_MAC[..10], hdr.clone());
        assert!(matches!(res, Err(nom::Err::Incomplete(_))));
        let res = parse_frame_data(&FDDI_SNAP_MAC[..16], hdr.clone());
        assert!(matches!(res, Err(nom::Err::Incomplete(_))));
        let mut data = FDDI_SNAP_MAC.to_vec();
        data.extend_from_slice(&[0; 21]);
        let res = parse_frame_data(&data, hdr);
        assert!(matches!(res, Err(nom::Err::Incomplete(_))));
    }

    #[test]
    fn test_fddi_reconstruction_underflow() {
        let hdr = header_for(&lan_ip_record(95, NETTL_HDR_PDUIN, 10, 10));
        let res = parse_frame_data(FDDI_SNAP_MAC, hdr);
        assert!(matches!(
            res,
            Err(nom::Err::Failure(NettlError::LengthUnderflow { .. }))
        ));
        let hdr = header_for(&lan_ip_record(95, NETTL_HDR_PDUIN, 16, 16));
        let res = parse_frame_data(FDDI_SNAP_MAC, hdr);
        assert!(matches!(
            res,
            Err(nom::Err::Failure(NettlError::LengthUnderflow { .. }))
        ));
    }

    #[test]
    fn test_fddi_reconstruction_zero_length() {
        // original length covers only the SNAP gap
        let hdr = header_for(&lan_ip_record(95, NETTL_HDR_PDUIN, 40, 3));
        let mut data = FDDI_SNAP_MAC.to_vec();
        data.extend_from_slice(&[0x5a; 40 - 18]);
        let res = parse_frame_data(&data, hdr);
        assert!(matches!(res, Err(nom::Err::Failure(NettlError::ZeroLength))));
        // MAC and LLC header only
        let hdr = header_for(&lan_ip_record(95, NETTL_HDR_PDUIN, 18, 3));
        let res = parse_frame_data(FDDI_SNAP_MAC, hdr);
        assert!(matches!(res, Err(nom::Err::Failure(NettlError::ZeroLength))));
    }

    #[test]
    fn test_parse_frame_data_huge_caplen() {
        let hdr = header_for(&lan_ip_record(9, 0x10, u32::MAX, u32::MAX));
        let res = parse_frame_data(&[0x45; 20], hdr);
        // more data needed on 64-bit targets, record too large for memory on 32-bit ones
        assert!(matches!(
            res,
            Err(nom::Err::Incomplete(_)) | Err(nom::Err::Failure(NettlError::ShortRead))
        ));
    }
}

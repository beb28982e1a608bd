//! nettl record headers
//!
//! Each record starts with a 4-byte prefix, whose last byte is the subsystem code. The
//! subsystem selects one of three fixed header layouts, all using big-endian integers:
//!
//! - LAN/IP (`NS_LS_IP` and most network cards), 60 bytes
//! - the same LAN/IP header followed by a 24-byte Ethernet driver sub-header (`NS_LS_DRIVER`)
//! - X.25 LAPB (`SX25L2`), 84 bytes
//!
//! HP-UX 11 adds 4 bytes after the LAN/IP or LAPB header. Some cards then insert padding before
//! the frame data, which is included in the declared lengths and must be removed.

use nom::bytes::streaming::take;
use nom::number::streaming::{be_u16, be_u32, be_u8};
use nom::{IResult, Needed, Offset};

use crate::error::NettlError;
use crate::linktype::LinkType;
use crate::nettl::header::Generation;
use crate::nettl::subsystem::{PadQuirk, RecordLayout, Subsystem};

pub const RECORD_PREFIX_LEN: usize = 4;
pub const LAN_IP_HDR_LEN: usize = 60;
pub const DRIVER_ETH_HDR_LEN: usize = 24;
pub const LAPB_HDR_LEN: usize = 84;

/// Record type of an inbound PDU
pub const NETTL_HDR_PDUIN: u8 = 0x20;
/// LAPB flag: frame was sent by the DCE
pub const NETTL_FROM_DCE: u8 = 0x20;

const HPPB_FDDI_PROBE_LEN: usize = 9;
const FDDI_CARD_PAD_LEN: usize = 3;
const LOOPBACK_PAD_LEN: usize = 26;

/// Link-specific information attached to a frame
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PseudoHeader {
    None,
    /// Frame check sequence is never present in nettl Ethernet frames
    Ethernet { fcs_len: u8 },
    Lapb { from_dce: bool },
}

/// Normalized nettl record header
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordHeader {
    pub subsystem: Subsystem,
    pub link_type: LinkType,
    /// The number of bytes of frame data stored in the file
    pub caplen: u32,
    /// The length of the frame as it appeared on the network
    pub origlen: u32,
    pub ts_sec: u32,
    pub ts_usec: u32,
    pub pseudo_header: PseudoHeader,
    /// Inbound HP-PB FDDI frame, whose data must be reconstructed (see
    /// [`parse_frame_data`](crate::nettl::parse_frame_data))
    pub fddi_reconstruction: bool,
    /// Number of bytes of the record before the frame data (prefix, header and padding)
    pub header_len: usize,
}

impl RecordHeader {
    /// The date and time when this frame was captured.
    /// Returns the seconds, fractional part value and unit (in number per second)
    pub fn ts(&self) -> (u32, u32, u64) {
        (self.ts_sec, self.ts_usec, MICROS_PER_SEC)
    }

    /// Returns true if the frame was cut by the capture
    pub fn truncated(&self) -> bool {
        self.caplen < self.origlen
    }
}

pub const MICROS_PER_SEC: u64 = 1_000_000;

struct LanIpHeader {
    rectype: u8,
    caplen: u32,
    origlen: u32,
    ts_sec: u32,
    ts_usec: u32,
}

struct DriverEthHeader {
    caplen: u16,
    origlen: u16,
}

struct LapbHeader {
    flags: u8,
    caplen: u16,
    origlen: u16,
    ts_sec: u32,
    ts_usec: u32,
}

#[inline]
fn need(i: &[u8], len: usize) -> Result<(), nom::Err<NettlError>> {
    if i.len() < len {
        Err(nom::Err::Incomplete(Needed::new(len - i.len())))
    } else {
        Ok(())
    }
}

fn parse_lan_ip_header(i: &[u8]) -> IResult<&[u8], LanIpHeader, NettlError> {
    need(i, LAN_IP_HDR_LEN)?;
    let (i, _) = take(8usize)(i)?;
    let (i, rectype) = be_u8(i)?;
    let (i, _) = take(19usize)(i)?;
    let (i, caplen) = be_u32(i)?;
    let (i, origlen) = be_u32(i)?;
    let (i, ts_sec) = be_u32(i)?;
    let (i, ts_usec) = be_u32(i)?;
    let (i, _) = take(16usize)(i)?;
    let hdr = LanIpHeader {
        rectype,
        caplen,
        origlen,
        ts_sec,
        ts_usec,
    };
    Ok((i, hdr))
}

// The driver sub-header also has a timestamp, a few microseconds later than the one of the
// LAN/IP header. The latter is used for the frame.
fn parse_driver_eth_header(i: &[u8]) -> IResult<&[u8], DriverEthHeader, NettlError> {
    need(i, DRIVER_ETH_HDR_LEN)?;
    let (i, _) = take(4usize)(i)?;
    let (i, caplen) = be_u16(i)?;
    let (i, origlen) = be_u16(i)?;
    let (i, _) = take(16usize)(i)?;
    Ok((i, DriverEthHeader { caplen, origlen }))
}

fn parse_lapb_header(i: &[u8]) -> IResult<&[u8], LapbHeader, NettlError> {
    need(i, LAPB_HDR_LEN)?;
    let (i, _) = take(8usize)(i)?;
    let (i, flags) = be_u8(i)?;
    let (i, _) = take(55usize)(i)?;
    let (i, caplen) = be_u16(i)?;
    let (i, origlen) = be_u16(i)?;
    let (i, _) = take(4usize)(i)?;
    let (i, ts_sec) = be_u32(i)?;
    let (i, ts_usec) = be_u32(i)?;
    let (i, _) = take(4usize)(i)?;
    let hdr = LapbHeader {
        flags,
        caplen,
        origlen,
        ts_sec,
        ts_usec,
    };
    Ok((i, hdr))
}

fn skip_generation_field(i: &[u8], generation: Generation) -> IResult<&[u8], (), NettlError> {
    let (i, _) = take(generation.extra_header_len())(i)?;
    Ok((i, ()))
}

/// Remove `pad` bytes of padding from a declared length
pub(crate) fn strip_padding(
    field: &'static str,
    length: u32,
    pad: usize,
) -> Result<u32, nom::Err<NettlError>> {
    let adjust = pad as u32;
    length.checked_sub(adjust).ok_or(nom::Err::Failure(NettlError::LengthUnderflow {
        field,
        length,
        adjust,
    }))
}

/// Lengths of a frame after removal of `pad` bytes of padding
fn padded_lengths(hdr: &LanIpHeader, pad: usize) -> Result<(u32, u32), nom::Err<NettlError>> {
    let caplen = strip_padding("captured", hdr.caplen, pad)?;
    let origlen = strip_padding("original", hdr.origlen, pad)?;
    Ok((caplen, origlen))
}

fn parse_lan_ip_record(
    i: &[u8],
    generation: Generation,
    subsystem: Subsystem,
    link_type: LinkType,
    quirk: PadQuirk,
) -> IResult<&[u8], RecordHeader, NettlError> {
    let (i, hdr) = parse_lan_ip_header(i)?;
    let (i, _) = skip_generation_field(i, generation)?;
    let mut fddi_reconstruction = false;
    let (i, (caplen, origlen)) = match quirk {
        PadQuirk::None => (i, (hdr.caplen, hdr.origlen)),
        // inbound frames are missing bytes after the SAPs, see parse_frame_data
        PadQuirk::HppbFddi if hdr.rectype == NETTL_HDR_PDUIN => {
            fddi_reconstruction = true;
            (i, (hdr.caplen, hdr.origlen))
        }
        PadQuirk::HppbFddi => {
            // outbound frames have variable padding, its size is the last probe byte
            let (i, probe) = take(HPPB_FDDI_PROBE_LEN)(i)?;
            let pad_len = probe[HPPB_FDDI_PROBE_LEN - 1] as usize;
            let (i, _) = take(pad_len)(i)?;
            (i, padded_lengths(&hdr, HPPB_FDDI_PROBE_LEN + pad_len)?)
        }
        PadQuirk::FddiCard => {
            let (i, _) = take(FDDI_CARD_PAD_LEN)(i)?;
            (i, padded_lengths(&hdr, FDDI_CARD_PAD_LEN)?)
        }
        PadQuirk::Loopback => {
            let (i, _) = take(LOOPBACK_PAD_LEN)(i)?;
            (i, padded_lengths(&hdr, LOOPBACK_PAD_LEN)?)
        }
    };
    let pseudo_header = match link_type {
        LinkType::Ethernet => PseudoHeader::Ethernet { fcs_len: 0 },
        _ => PseudoHeader::None,
    };
    let header = RecordHeader {
        subsystem,
        link_type,
        caplen,
        origlen,
        ts_sec: hdr.ts_sec,
        ts_usec: hdr.ts_usec,
        pseudo_header,
        fddi_reconstruction,
        header_len: 0,
    };
    Ok((i, header))
}

fn parse_driver_record(
    i: &[u8],
    generation: Generation,
    subsystem: Subsystem,
) -> IResult<&[u8], RecordHeader, NettlError> {
    let (i, hdr) = parse_lan_ip_header(i)?;
    let (i, _) = skip_generation_field(i, generation)?;
    // nothing tells which kind of card wrote the record, all known ones are Ethernet
    let (i, drv) = parse_driver_eth_header(i)?;
    let header = RecordHeader {
        subsystem,
        link_type: LinkType::Ethernet,
        caplen: u32::from(drv.caplen),
        origlen: u32::from(drv.origlen),
        ts_sec: hdr.ts_sec,
        ts_usec: hdr.ts_usec,
        pseudo_header: PseudoHeader::Ethernet { fcs_len: 0 },
        fddi_reconstruction: false,
        header_len: 0,
    };
    Ok((i, header))
}

fn parse_lapb_record(
    i: &[u8],
    generation: Generation,
    subsystem: Subsystem,
) -> IResult<&[u8], RecordHeader, NettlError> {
    let (i, hdr) = parse_lapb_header(i)?;
    let (i, _) = skip_generation_field(i, generation)?;
    let header = RecordHeader {
        subsystem,
        link_type: LinkType::Lapb,
        caplen: u32::from(hdr.caplen),
        origlen: u32::from(hdr.origlen),
        ts_sec: hdr.ts_sec,
        ts_usec: hdr.ts_usec,
        pseudo_header: PseudoHeader::Lapb {
            from_dce: hdr.flags & NETTL_FROM_DCE != 0,
        },
        fddi_reconstruction: false,
        header_len: 0,
    };
    Ok((i, header))
}

/// Read a nettl record header
///
/// Reads the record prefix, the header selected by the subsystem code, the HP-UX 11 extra
/// field and any card-specific padding. Returns the remaining input, starting at the frame
/// data.
///
/// Errors:
/// - `Incomplete` if more input is needed
/// - `UnsupportedEncapsulation(code)` for an unknown subsystem code
/// - `LengthUnderflow` if the declared lengths are shorter than the padding
/// - `ZeroLength` if the frame is empty after padding removal
pub fn parse_record_header(
    i: &[u8],
    generation: Generation,
) -> IResult<&[u8], RecordHeader, NettlError> {
    let start = i;
    let (i, prefix) = take(RECORD_PREFIX_LEN)(i)?;
    let subsystem = Subsystem(prefix[RECORD_PREFIX_LEN - 1]);
    let layout = subsystem
        .layout()
        .ok_or(nom::Err::Failure(NettlError::UnsupportedEncapsulation(
            subsystem.0,
        )))?;
    let (i, mut header) = match layout {
        RecordLayout::LanIp(link_type, quirk) => {
            parse_lan_ip_record(i, generation, subsystem, link_type, quirk)?
        }
        RecordLayout::Driver => parse_driver_record(i, generation, subsystem)?,
        RecordLayout::Lapb => parse_lapb_record(i, generation, subsystem)?,
    };
    if header.caplen == 0 || header.origlen == 0 {
        return Err(nom::Err::Failure(NettlError::ZeroLength));
    }
    header.header_len = start.offset(i);
    Ok((i, header))
}

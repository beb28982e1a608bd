//! Builder for synthetic nettl traces

#![allow(dead_code)]

use nettl_parser::{
    NETTL_DATA_OFFSET, NETTL_MAGIC_HPUX10, NETTL_MAGIC_HPUX9, NETTL_VERSION_OFFSET,
};

pub const TS_SEC: u32 = 0x3ce3_7619;
pub const TS_USEC: u32 = 0x0006_3463;

pub struct TraceBuilder {
    data: Vec<u8>,
    hpux11: bool,
}

impl TraceBuilder {
    pub fn new(magic: &[u8; 12], version: &[u8; 2]) -> TraceBuilder {
        let mut data = vec![0; NETTL_DATA_OFFSET];
        data[..12].copy_from_slice(magic);
        data[NETTL_VERSION_OFFSET - 2..NETTL_VERSION_OFFSET].copy_from_slice(b"B.");
        data[NETTL_VERSION_OFFSET..NETTL_VERSION_OFFSET + 2].copy_from_slice(version);
        TraceBuilder {
            data,
            hpux11: version == b"11",
        }
    }

    pub fn hpux9() -> TraceBuilder {
        TraceBuilder::new(&NETTL_MAGIC_HPUX9, b"09")
    }

    pub fn hpux10() -> TraceBuilder {
        TraceBuilder::new(&NETTL_MAGIC_HPUX10, b"10")
    }

    pub fn hpux11() -> TraceBuilder {
        TraceBuilder::new(&NETTL_MAGIC_HPUX10, b"11")
    }

    /// Offset of the next record
    pub fn offset(&self) -> u64 {
        self.data.len() as u64
    }

    fn generation_field(&mut self) {
        if self.hpux11 {
            self.data.extend_from_slice(&[0xee; 4]);
        }
    }

    fn lan_ip_header(&mut self, code: u8, rectype: u8, caplen: u32, origlen: u32) {
        self.data.extend_from_slice(&[0x00, 0x44, 0x00, code]);
        let mut hdr = [0u8; 60];
        hdr[8] = rectype;
        hdr[28..32].copy_from_slice(&caplen.to_be_bytes());
        hdr[32..36].copy_from_slice(&origlen.to_be_bytes());
        hdr[36..40].copy_from_slice(&TS_SEC.to_be_bytes());
        hdr[40..44].copy_from_slice(&TS_USEC.to_be_bytes());
        self.data.extend_from_slice(&hdr);
        self.generation_field();
    }

    /// Append a LAN/IP family record, with explicit declared lengths
    ///
    /// `padding` is written between the header and the payload, and is not added to the
    /// declared lengths.
    pub fn lan_ip_raw(
        &mut self,
        code: u8,
        rectype: u8,
        caplen: u32,
        origlen: u32,
        padding: &[u8],
        payload: &[u8],
    ) -> &mut Self {
        self.lan_ip_header(code, rectype, caplen, origlen);
        self.data.extend_from_slice(padding);
        self.data.extend_from_slice(payload);
        self
    }

    /// Append a LAN/IP family record, padding included in the declared lengths
    pub fn lan_ip(&mut self, code: u8, rectype: u8, padding: &[u8], payload: &[u8]) -> &mut Self {
        let len = (padding.len() + payload.len()) as u32;
        self.lan_ip_raw(code, rectype, len, len, padding, payload)
    }

    /// Append an NS_LS_DRIVER record
    pub fn driver(&mut self, payload: &[u8]) -> &mut Self {
        let len = payload.len() as u16;
        self.lan_ip_header(11, 0x20, u32::from(len) + 24, u32::from(len) + 24);
        let mut drv = [0u8; 24];
        drv[4..6].copy_from_slice(&len.to_be_bytes());
        drv[6..8].copy_from_slice(&len.to_be_bytes());
        drv[12..16].copy_from_slice(&TS_SEC.to_be_bytes());
        drv[16..20].copy_from_slice(&(TS_USEC + 7).to_be_bytes());
        self.data.extend_from_slice(&drv);
        self.data.extend_from_slice(payload);
        self
    }

    /// Append an SX25L2 record
    pub fn lapb(&mut self, flags: u8, payload: &[u8]) -> &mut Self {
        let len = payload.len() as u16;
        self.data.extend_from_slice(&[0x00, 0x44, 0x00, 34]);
        let mut hdr = [0u8; 84];
        hdr[8] = flags;
        hdr[64..66].copy_from_slice(&len.to_be_bytes());
        hdr[66..68].copy_from_slice(&len.to_be_bytes());
        hdr[72..76].copy_from_slice(&TS_SEC.to_be_bytes());
        hdr[76..80].copy_from_slice(&TS_USEC.to_be_bytes());
        self.data.extend_from_slice(&hdr);
        self.generation_field();
        self.data.extend_from_slice(payload);
        self
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        self.data.clone()
    }
}

/// Payload of `len` bytes, with a recognizable pattern
pub fn payload(len: usize, seed: u8) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_add(seed)).collect()
}

use rusticata_macros::newtype_enum;

use crate::linktype::LinkType;

/// nettl subsystem code
///
/// The last byte of each record prefix identifies the HP-UX subsystem (protocol layer or
/// network card driver) which produced the record. It selects both the layout of the record
/// header and the link type of the frame.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Subsystem(pub u8);

newtype_enum! {
impl display Subsystem {
    NS_LS_LOOPBACK = 2,
    NS_LS_TCP = 6,
    NS_LS_UDP = 8,
    NS_LS_IP = 9,
    NS_LS_DRIVER = 11,
    NS_LS_ICMP = 23,

    TOKEN = 31,
    SX25L2 = 34,

    HPPB_FDDI = 95,

    LAN100 = 164,
    EISA100BT = 172,
    BASE100 = 173,
    EISA_FDDI = 174,
    PCI_FDDI = 176,
    HSC_FDDI = 177,
    GSC100BT = 178,
    PCI100BT = 179,
    SPP100BT = 180,
    GELAN = 185,
    PCI_TR = 187,
    HP_APAPORT = 189,
    HP_APALACP = 190,
    BTLAN = 210,
    INTL100 = 233,
    NS_LS_IPV6 = 244,
    NS_LS_ICMPV6 = 245,
    IGELAN = 252,
    IETHER = 253,
}
}

/// Card-specific padding found after a LAN/IP record header
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PadQuirk {
    None,
    /// HP-PB FDDI: inbound frames need reconstruction, outbound ones carry variable padding
    HppbFddi,
    /// EISA, PCI and HSC FDDI: 3 bytes of padding
    FddiCard,
    /// Loopback: 26 bytes of padding
    Loopback,
}

/// Record header layout selected by a subsystem code
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RecordLayout {
    LanIp(LinkType, PadQuirk),
    /// LAN/IP header followed by an Ethernet driver sub-header
    Driver,
    Lapb,
}

impl Subsystem {
    /// Link type of the frames recorded by this subsystem, or `None` if the code is unsupported
    pub fn link_type(self) -> Option<LinkType> {
        self.layout().map(|layout| match layout {
            RecordLayout::LanIp(link_type, _) => link_type,
            RecordLayout::Driver => LinkType::Ethernet,
            RecordLayout::Lapb => LinkType::Lapb,
        })
    }

    pub fn is_supported(self) -> bool {
        self.layout().is_some()
    }

    pub(crate) fn layout(self) -> Option<RecordLayout> {
        let layout = match self {
            Subsystem::NS_LS_LOOPBACK => RecordLayout::LanIp(LinkType::RawIp, PadQuirk::Loopback),
            Subsystem::NS_LS_IP
            | Subsystem::NS_LS_TCP
            | Subsystem::NS_LS_UDP
            | Subsystem::NS_LS_IPV6 => RecordLayout::LanIp(LinkType::RawIp, PadQuirk::None),
            Subsystem::NS_LS_ICMP => RecordLayout::LanIp(LinkType::RawIcmp, PadQuirk::None),
            Subsystem::NS_LS_ICMPV6 => RecordLayout::LanIp(LinkType::RawIcmpv6, PadQuirk::None),
            Subsystem::HPPB_FDDI => RecordLayout::LanIp(LinkType::Fddi, PadQuirk::HppbFddi),
            Subsystem::EISA_FDDI | Subsystem::PCI_FDDI | Subsystem::HSC_FDDI => {
                RecordLayout::LanIp(LinkType::Fddi, PadQuirk::FddiCard)
            }
            Subsystem::TOKEN | Subsystem::PCI_TR => {
                RecordLayout::LanIp(LinkType::TokenRing, PadQuirk::None)
            }
            Subsystem::LAN100
            | Subsystem::EISA100BT
            | Subsystem::BASE100
            | Subsystem::GSC100BT
            | Subsystem::PCI100BT
            | Subsystem::SPP100BT
            | Subsystem::GELAN
            | Subsystem::BTLAN
            | Subsystem::INTL100
            | Subsystem::IGELAN
            | Subsystem::IETHER
            | Subsystem::HP_APAPORT
            | Subsystem::HP_APALACP => RecordLayout::LanIp(LinkType::Ethernet, PadQuirk::None),
            Subsystem::NS_LS_DRIVER => RecordLayout::Driver,
            Subsystem::SX25L2 => RecordLayout::Lapb,
            _ => return None,
        };
        Some(layout)
    }
}

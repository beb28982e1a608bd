use std::fmt;

/// Link-layer encapsulation of a nettl frame
///
/// Derived from the subsystem code of each record. The frame data starts with the header
/// of this layer (or directly with the IP/ICMP header for the raw types).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LinkType {
    RawIp,
    RawIcmp,
    RawIcmpv6,
    Fddi,
    TokenRing,
    Ethernet,
    /// X.25 LAPB, without FCS
    Lapb,
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            LinkType::RawIp => "RAW_IP",
            LinkType::RawIcmp => "RAW_ICMP",
            LinkType::RawIcmpv6 => "RAW_ICMPV6",
            LinkType::Fddi => "FDDI",
            LinkType::TokenRing => "TOKEN_RING",
            LinkType::Ethernet => "ETHERNET",
            LinkType::Lapb => "LAPB",
        };
        f.write_str(s)
    }
}

/// File-wide encapsulation, as observed so far
///
/// Starts as `Unknown`, becomes `Single` with the first frame, and degrades to `Mixed` as soon
/// as a frame with another link type is seen. `Mixed` is final.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Encapsulation {
    #[default]
    Unknown,
    Single(LinkType),
    Mixed,
}

impl Encapsulation {
    /// Account for one more frame of type `link_type`
    pub fn update(&mut self, link_type: LinkType) {
        *self = match *self {
            Encapsulation::Unknown => Encapsulation::Single(link_type),
            Encapsulation::Single(current) if current == link_type => {
                Encapsulation::Single(current)
            }
            Encapsulation::Single(_) | Encapsulation::Mixed => Encapsulation::Mixed,
        };
    }

    /// The link type shared by all frames, if there is exactly one
    pub fn link_type(&self) -> Option<LinkType> {
        match self {
            Encapsulation::Single(link_type) => Some(*link_type),
            _ => None,
        }
    }

    pub fn is_mixed(&self) -> bool {
        *self == Encapsulation::Mixed
    }
}

impl fmt::Display for Encapsulation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Encapsulation::Unknown => f.write_str("UNKNOWN"),
            Encapsulation::Single(link_type) => write!(f, "{}", link_type),
            Encapsulation::Mixed => f.write_str("PER_PACKET"),
        }
    }
}

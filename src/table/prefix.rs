//! IPv4 prefix and address parsing.
//!
//! # Responsibilities
//! - Parse CIDR text (`a.b.c.d/len`, `a.b.c.d/m.m.m.m`, bare `a.b.c.d`)
//! - Parse dotted-quad addresses
//! - Expose prefixes as bit paths for trie traversal
//!
//! # Design Decisions
//! - Host bits are masked off rather than rejected (`10.1.2.3/8` == `10.0.0.0/8`)
//! - Anything containing `:` is treated as the wrong address family
//! - Canonical text form is `network/len`; it is the route identity

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::TableError;

/// Number of bits in an IPv4 address (maximum trie depth).
pub const ADDRESS_BITS: u8 = 32;

/// An IPv4 network prefix with host bits cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Ipv4Prefix {
    network: u32,
    len: u8,
}

impl Ipv4Prefix {
    /// Build a prefix, masking any host bits beyond `len`.
    ///
    /// Returns `None` if `len` exceeds 32.
    pub fn new(addr: Ipv4Addr, len: u8) -> Option<Self> {
        if len > ADDRESS_BITS {
            return None;
        }
        Some(Self {
            network: u32::from(addr) & mask(len),
            len,
        })
    }

    /// Network address of the prefix.
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.network)
    }

    /// Prefix length in bits.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u8 {
        self.len
    }

    /// Bit at `depth` (0 = most significant) of the network address.
    pub fn bit(&self, depth: u8) -> usize {
        address_bit(self.network, depth)
    }

    /// Returns true if `addr` falls inside this prefix.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        u32::from(addr) & mask(self.len) == self.network
    }
}

impl FromStr for Ipv4Prefix {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(':') {
            return Err(TableError::prefix(s, "only IPv4 prefixes are supported"));
        }

        let (addr_text, len_text) = match s.split_once('/') {
            Some((addr, len)) => (addr, Some(len)),
            None => (s, None),
        };

        let addr = Ipv4Addr::from_str(addr_text)
            .map_err(|_| TableError::prefix(s, "network address is not dotted IPv4"))?;

        let len = match len_text {
            None => ADDRESS_BITS,
            Some(text) if text.contains('.') => {
                let netmask = Ipv4Addr::from_str(text)
                    .map_err(|_| TableError::prefix(s, "netmask is not dotted IPv4"))?;
                netmask_len(netmask)
                    .ok_or_else(|| TableError::prefix(s, "netmask is not contiguous"))?
            }
            Some(text) => parse_len(text)
                .ok_or_else(|| TableError::prefix(s, "prefix length must be 0-32"))?,
        };

        Self::new(addr, len).ok_or_else(|| TableError::prefix(s, "prefix length must be 0-32"))
    }
}

impl fmt::Display for Ipv4Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.len)
    }
}

impl From<Ipv4Prefix> for String {
    fn from(prefix: Ipv4Prefix) -> Self {
        prefix.to_string()
    }
}

impl TryFrom<String> for Ipv4Prefix {
    type Error = TableError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Parse a dotted-quad IPv4 address.
pub fn parse_address(s: &str) -> Result<Ipv4Addr, TableError> {
    if s.contains(':') {
        return Err(TableError::address(s, "only IPv4 addresses are supported"));
    }
    Ipv4Addr::from_str(s).map_err(|_| TableError::address(s, "not a dotted IPv4 address"))
}

/// Bit at `depth` (0 = most significant) of a raw address.
pub(crate) fn address_bit(value: u32, depth: u8) -> usize {
    ((value >> (ADDRESS_BITS - 1 - depth)) & 1) as usize
}

fn mask(len: u8) -> u32 {
    match len {
        0 => 0,
        n => u32::MAX << (ADDRESS_BITS - n),
    }
}

// Decimal digits only: rejects "+8", " 8" and the like that u8::from_str would
// partly accept.
fn parse_len(text: &str) -> Option<u8> {
    if text.is_empty() || text.len() > 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn netmask_len(netmask: Ipv4Addr) -> Option<u8> {
    let value = u32::from(netmask);
    let len = value.leading_ones() as u8;
    (mask(len) == value).then_some(len)
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Value Objects with Validation Invariants
//!
//! Addresses, VLANs and autonomous-system numbers as reported by the design
//! model. Each value validates on construction and on deserialization, so a
//! record that made it into a snapshot carries well-formed values.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use thiserror::Error;

/// Network validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("Invalid prefix length: {0} (must be 0-32 for IPv4, 0-128 for IPv6)")]
    InvalidPrefixLength(u8),

    #[error("Expected an IPv4 address, got {0}")]
    NotIpv4(String),

    #[error("Invalid VLAN ID: {0} (must be 1-4094)")]
    InvalidVlanId(u16),

    #[error("Invalid ASN: {0}")]
    InvalidAsn(String),
}

/// IP Address with CIDR notation value object
///
/// Represents an IPv4 or IPv6 address with optional prefix length.
/// Invariants:
/// - Valid IP address format
/// - Prefix length within valid range
/// - Canonical representation
///
/// # Examples
///
/// ```rust
/// use edge_peering::domain::IpAddressWithCidr;
///
/// let ip = IpAddressWithCidr::new("10.0.0.1/24").unwrap();
/// assert_eq!(ip.address().to_string(), "10.0.0.1");
/// assert_eq!(ip.prefix_length(), Some(24));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IpAddressWithCidr {
    address: IpAddr,
    prefix_length: Option<u8>,
}

impl IpAddressWithCidr {
    /// Parse `address[/prefix]`
    pub fn new(cidr: impl AsRef<str>) -> Result<Self, NetworkError> {
        let cidr = cidr.as_ref().trim();

        match cidr.split_once('/') {
            Some((addr_str, prefix_str)) => {
                let address = IpAddr::from_str(addr_str)
                    .map_err(|_| NetworkError::InvalidIpAddress(addr_str.to_string()))?;
                let prefix_length = prefix_str
                    .parse::<u8>()
                    .map_err(|_| NetworkError::InvalidCidr(cidr.to_string()))?;

                Self::from_parts(address, Some(prefix_length))
            }
            None => {
                let address = IpAddr::from_str(cidr)
                    .map_err(|_| NetworkError::InvalidIpAddress(cidr.to_string()))?;

                Ok(Self {
                    address,
                    prefix_length: None,
                })
            }
        }
    }

    /// Create from separate address and prefix
    pub fn from_parts(address: IpAddr, prefix_length: Option<u8>) -> Result<Self, NetworkError> {
        if let Some(prefix) = prefix_length {
            let max_prefix = match address {
                IpAddr::V4(_) => 32,
                IpAddr::V6(_) => 128,
            };

            if prefix > max_prefix {
                return Err(NetworkError::InvalidPrefixLength(prefix));
            }
        }

        Ok(Self {
            address,
            prefix_length,
        })
    }

    pub fn address(&self) -> IpAddr {
        self.address
    }

    pub fn prefix_length(&self) -> Option<u8> {
        self.prefix_length
    }

    pub fn is_ipv4(&self) -> bool {
        matches!(self.address, IpAddr::V4(_))
    }

    /// The bare IPv4 address, with the prefix length stripped
    pub fn ipv4(&self) -> Result<Ipv4Addr, NetworkError> {
        match self.address {
            IpAddr::V4(v4) => Ok(v4),
            IpAddr::V6(_) => Err(NetworkError::NotIpv4(self.as_cidr())),
        }
    }

    /// Get as CIDR notation string
    pub fn as_cidr(&self) -> String {
        match self.prefix_length {
            Some(prefix) => format!("{}/{}", self.address, prefix),
            None => self.address.to_string(),
        }
    }
}

impl fmt::Display for IpAddressWithCidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_cidr())
    }
}

impl FromStr for IpAddressWithCidr {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// VLAN ID value object (IEEE 802.1Q, 1-4094)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct VlanId(u16);

impl VlanId {
    pub const MIN: u16 = 1;
    pub const MAX: u16 = 4094;

    pub fn new(id: u16) -> Result<Self, NetworkError> {
        if !(Self::MIN..=Self::MAX).contains(&id) {
            return Err(NetworkError::InvalidVlanId(id));
        }

        Ok(Self(id))
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for VlanId {
    type Error = NetworkError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VlanId> for u16 {
    fn from(vlan: VlanId) -> Self {
        vlan.0
    }
}

/// BGP autonomous-system number
///
/// The design model reports ASNs as JSON numbers in device config contexts
/// and as decimal strings on graph `domain` nodes; both forms deserialize.
/// Serialization is always numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Asn(u32);

impl Asn {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Asn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Asn {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl FromStr for Asn {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| NetworkError::InvalidAsn(s.to_string()))
    }
}

impl TryFrom<&serde_json::Value> for Asn {
    type Error = NetworkError;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Number(n) => n
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .map(Self)
                .ok_or_else(|| NetworkError::InvalidAsn(n.to_string())),
            serde_json::Value::String(s) => s.parse(),
            other => Err(NetworkError::InvalidAsn(other.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Asn {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Asn::try_from(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_address_cidr() {
        let ip = IpAddressWithCidr::new("10.0.0.1/24").unwrap();
        assert_eq!(ip.address().to_string(), "10.0.0.1");
        assert_eq!(ip.prefix_length(), Some(24));
        assert!(ip.is_ipv4());
        assert_eq!(ip.ipv4().unwrap(), Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(ip.as_cidr(), "10.0.0.1/24");
    }

    #[test]
    fn test_ip_address_without_cidr() {
        let ip = IpAddressWithCidr::new("192.168.1.10").unwrap();
        assert_eq!(ip.prefix_length(), None);
        assert_eq!(ip.as_cidr(), "192.168.1.10");
    }

    #[test]
    fn test_ipv6_is_not_ipv4() {
        let ip = IpAddressWithCidr::new("2001:db8::1/64").unwrap();
        assert!(!ip.is_ipv4());
        assert!(matches!(ip.ipv4(), Err(NetworkError::NotIpv4(_))));
    }

    #[test]
    fn test_invalid_ip() {
        assert!(IpAddressWithCidr::new("999.999.999.999").is_err());
        assert!(IpAddressWithCidr::new("10.0.0.1/33").is_err());
        assert!(IpAddressWithCidr::new("10.0.0.1/abc").is_err());
    }

    #[test]
    fn test_vlan_id() {
        assert!(VlanId::new(100).is_ok());
        assert!(VlanId::new(0).is_err());
        assert!(VlanId::new(4095).is_err());
    }

    #[test]
    fn test_vlan_id_deserialization_validates() {
        let vlan: VlanId = serde_json::from_str("100").unwrap();
        assert_eq!(vlan.value(), 100);
        assert!(serde_json::from_str::<VlanId>("4095").is_err());
    }

    #[test]
    fn test_asn_accepts_number_and_string() {
        let from_number: Asn = serde_json::from_str("65001").unwrap();
        let from_string: Asn = serde_json::from_str("\"65001\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(serde_json::to_string(&from_string).unwrap(), "65001");

        assert!(serde_json::from_str::<Asn>("\"not-an-asn\"").is_err());
        assert!(serde_json::from_str::<Asn>("null").is_err());
        assert!(serde_json::from_str::<Asn>("4294967296").is_err());
    }
}

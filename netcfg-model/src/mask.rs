//! Subnet mask and CIDR prefix conversions.
//!
//! Every helper here is total: malformed input yields an empty string rather
//! than an error, and callers substitute their own default.

use std::net::Ipv4Addr;

/// Convert a dotted-decimal subnet mask into a CIDR prefix length.
///
/// Input that already carries a `/N` suffix returns the suffix unchanged.
/// Returns `""` when the mask does not have exactly four numeric octets in
/// `0..=255`.
///
/// The prefix is the total number of set bits; contiguity is not checked, so
/// `255.0.255.0` yields `"16"`. Use [`mask_is_contiguous`] when that matters.
pub fn mask_to_prefix(mask: &str) -> String {
    let mask = mask.trim();
    if mask.is_empty() {
        return String::new();
    }
    if mask.contains('/') {
        return mask.split('/').nth(1).unwrap_or("").trim().to_string();
    }
    match parse_octets(mask) {
        Some(octets) => octets
            .iter()
            .map(|o| o.count_ones())
            .sum::<u32>()
            .to_string(),
        None => String::new(),
    }
}

/// Build a dotted-decimal mask from the `/N` suffix of a CIDR string.
///
/// Returns `""` when there is no `/`, the suffix is not a number, or it lies
/// outside `0..=32`.
pub fn mask_from_cidr(cidr: &str) -> String {
    match cidr_bits(cidr).and_then(prefix_mask) {
        Some(mask) => Ipv4Addr::from(mask).to_string(),
        None => String::new(),
    }
}

/// Build an inverse (wildcard) mask from the `/N` suffix of a CIDR string,
/// as used by IOS access lists (`/24` → `0.0.0.255`).
pub fn wildcard_from_cidr(cidr: &str) -> String {
    match cidr_bits(cidr).and_then(prefix_mask) {
        Some(mask) => Ipv4Addr::from(!mask).to_string(),
        None => String::new(),
    }
}

/// True when `mask` is a well-formed dotted mask whose set bits are all
/// leading (`255.255.240.0` yes, `255.0.255.0` no).
pub fn mask_is_contiguous(mask: &str) -> bool {
    let Some(octets) = parse_octets(mask.trim()) else {
        return false;
    };
    let bits = u32::from_be_bytes(octets);
    bits.leading_ones() == bits.count_ones()
}

/// Return the 32-bit mask for a prefix length.
///
/// A shift by 32 overflows `u32`, so `/0` is handled explicitly.
fn prefix_mask(bits: u32) -> Option<u32> {
    match bits {
        0 => Some(0),
        1..=32 => Some(u32::MAX << (32 - bits)),
        _ => None,
    }
}

fn cidr_bits(cidr: &str) -> Option<u32> {
    let (_, suffix) = cidr.trim().split_once('/')?;
    suffix.trim().parse::<u32>().ok()
}

fn parse_octets(mask: &str) -> Option<[u8; 4]> {
    let parts = mask.split('.').collect::<Vec<_>>();
    if parts.len() != 4 {
        return None;
    }
    let mut out = [0u8; 4];
    for (slot, part) in out.iter_mut().zip(parts) {
        let part = part.trim();
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse::<u8>().ok()?;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_common_masks() {
        assert_eq!(mask_to_prefix("255.255.255.0"), "24");
        assert_eq!(mask_to_prefix("255.255.255.252"), "30");
        assert_eq!(mask_to_prefix("0.0.0.0"), "0");
        assert_eq!(mask_to_prefix("255.255.255.255"), "32");
    }

    #[test]
    fn cidr_input_returns_suffix() {
        assert_eq!(mask_to_prefix("10.0.0.0/24"), "24");
        assert_eq!(mask_to_prefix("/16"), "16");
    }

    #[test]
    fn malformed_masks_yield_empty() {
        assert_eq!(mask_to_prefix(""), "");
        assert_eq!(mask_to_prefix("255.255.0"), "");
        assert_eq!(mask_to_prefix("255.255.x.0"), "");
        assert_eq!(mask_to_prefix("255.255.256.0"), "");
        assert_eq!(mask_to_prefix("255.255..0"), "");
    }

    #[test]
    fn non_contiguous_mask_still_counts_bits() {
        assert_eq!(mask_to_prefix("255.0.255.0"), "16");
        assert!(!mask_is_contiguous("255.0.255.0"));
        assert!(mask_is_contiguous("255.255.240.0"));
        assert!(mask_is_contiguous("0.0.0.0"));
    }

    #[test]
    fn builds_mask_from_cidr() {
        assert_eq!(mask_from_cidr("10.0.0.0/24"), "255.255.255.0");
        assert_eq!(mask_from_cidr("10.0.0.0/9"), "255.128.0.0");
        assert_eq!(mask_from_cidr("0.0.0.0/0"), "0.0.0.0");
        assert_eq!(mask_from_cidr("10.0.0.1/32"), "255.255.255.255");
    }

    #[test]
    fn bad_cidr_yields_empty() {
        assert_eq!(mask_from_cidr("10.0.0.0"), "");
        assert_eq!(mask_from_cidr("10.0.0.0/abc"), "");
        assert_eq!(mask_from_cidr("10.0.0.0/33"), "");
    }

    #[test]
    fn prefix_survives_round_trip() {
        for bits in 1..=32u32 {
            let mask = mask_from_cidr(&format!("10.0.0.0/{bits}"));
            assert_eq!(mask_to_prefix(&mask), bits.to_string(), "prefix /{bits}");
        }
    }

    #[test]
    fn wildcard_is_inverse_mask() {
        assert_eq!(wildcard_from_cidr("10.0.100.0/24"), "0.0.0.255");
        assert_eq!(wildcard_from_cidr("10.0.0.0/0"), "255.255.255.255");
        assert_eq!(wildcard_from_cidr("nope"), "");
    }
}

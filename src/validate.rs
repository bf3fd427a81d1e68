//! Syntactic checks on the address about to be published.

use crate::config::{Ipv6Validation, RecordType};
use std::net::Ipv6Addr;

/// Check that `ip` looks like an address for `record_type`.
///
/// `A` requires a dotted quad with every group in `0..=255`. For `AAAA` the
/// lenient mode only checks the character set (hex digits and colons), so
/// strings such as `:::`, `1:2` or even `abcdef` pass. [`Ipv6Validation::Strict`]
/// requires a parseable IPv6 address.
pub fn is_valid(ip: &str, record_type: RecordType, mode: Ipv6Validation) -> bool {
    match record_type {
        RecordType::A => is_dotted_quad(ip),
        RecordType::Aaaa => match mode {
            Ipv6Validation::Lenient => is_hex_colon(ip),
            Ipv6Validation::Strict => ip.parse::<Ipv6Addr>().is_ok(),
        },
    }
}

fn is_dotted_quad(ip: &str) -> bool {
    let groups: Vec<&str> = ip.split('.').collect();
    groups.len() == 4 && groups.iter().all(|group| is_octet(group))
}

fn is_octet(group: &str) -> bool {
    (1..=3).contains(&group.len())
        && group.bytes().all(|b| b.is_ascii_digit())
        && group.parse::<u16>().is_ok_and(|n| n <= 255)
}

fn is_hex_colon(ip: &str) -> bool {
    !ip.is_empty() && ip.chars().all(|c| c.is_ascii_hexdigit() || c == ':')
}

#[cfg(test)]
mod tests {
    use super::*;

    const LENIENT: Ipv6Validation = Ipv6Validation::Lenient;
    const STRICT: Ipv6Validation = Ipv6Validation::Strict;

    const IN_RANGE: [u16; 12] = [0, 1, 9, 10, 99, 100, 199, 200, 249, 250, 254, 255];
    const OUT_OF_RANGE: [u16; 4] = [256, 300, 500, 999];

    #[test]
    fn test_in_range_quads_are_valid() {
        for a in IN_RANGE {
            for b in IN_RANGE {
                for c in IN_RANGE {
                    for d in IN_RANGE {
                        let ip = format!("{a}.{b}.{c}.{d}");
                        assert!(is_valid(&ip, RecordType::A, LENIENT), "{ip}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_any_group_over_255_is_invalid() {
        for bad in OUT_OF_RANGE {
            for ok in [0, 128, 255] {
                for position in 0..4 {
                    let mut groups = [ok; 4];
                    groups[position] = bad;
                    let ip = format!("{}.{}.{}.{}", groups[0], groups[1], groups[2], groups[3]);
                    assert!(!is_valid(&ip, RecordType::A, LENIENT), "{ip}");
                }
            }
        }
    }

    #[test]
    fn test_malformed_ipv4() {
        for ip in [
            "",
            "1.2.3",
            "1.2.3.4.5",
            "1..3.4",
            "1.2.3.",
            "a.b.c.d",
            "1.2.3.4 ",
            " 1.2.3.4",
            "+1.2.3.4",
            "1.2.3.0004",
            "1.2.3.-1",
            "2001:db8::1",
        ] {
            assert!(!is_valid(ip, RecordType::A, LENIENT), "{ip:?}");
        }
    }

    #[test]
    fn test_lenient_ipv6_accepts_hex_colon_shapes() {
        for ip in [
            "2001:db8::1",
            "::1",
            "fe80::1",
            "2001:DB8:0:0:0:0:0:1",
            ":::",
            "1:2",
            "ffffffff::",
            "abcdef",
        ] {
            assert!(is_valid(ip, RecordType::Aaaa, LENIENT), "{ip:?}");
        }
    }

    #[test]
    fn test_lenient_ipv6_rejects_other_characters() {
        for ip in ["", "203.0.113.1", "::ffff:203.0.113.1", "2001:db8::g", "2001 :db8::1"] {
            assert!(!is_valid(ip, RecordType::Aaaa, LENIENT), "{ip:?}");
        }
    }

    #[test]
    fn test_strict_ipv6() {
        assert!(is_valid("2001:db8::1", RecordType::Aaaa, STRICT));
        assert!(is_valid("::1", RecordType::Aaaa, STRICT));
        assert!(!is_valid(":::", RecordType::Aaaa, STRICT));
        assert!(!is_valid("1:2", RecordType::Aaaa, STRICT));
        assert!(!is_valid("ffffffff::", RecordType::Aaaa, STRICT));
    }

    #[test]
    fn test_strictness_does_not_affect_a_records() {
        assert!(is_valid("203.0.113.5", RecordType::A, STRICT));
        assert!(!is_valid("999.1.1.1", RecordType::A, STRICT));
    }
}

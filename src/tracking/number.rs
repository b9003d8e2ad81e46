use rand::Rng;

use crate::config::constant::TRACKING_PREFIX;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A fresh tracking number such as `FWEN 2345TR`.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> String {
    let digits: u16 = rng.gen_range(1000..=9999);
    let suffix: String = (0..2)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{TRACKING_PREFIX} {digits}{suffix}")
}

pub fn is_valid(candidate: &str) -> bool {
    let Some(rest) = candidate
        .strip_prefix(TRACKING_PREFIX)
        .and_then(|r| r.strip_prefix(' '))
    else {
        return false;
    };

    let bytes = rest.as_bytes();
    bytes.len() == 6
        && bytes[0] != b'0'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4..].iter().all(|b| BASE36.contains(b))
}

/// Uppercases and collapses whitespace, so `fwen  2345tr` finds `FWEN 2345TR`.
pub fn normalize(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

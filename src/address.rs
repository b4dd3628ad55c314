use web3::types::Address;

use crate::ens::keccak256;

const PREFIX_LEN: usize = 6;
const SUFFIX_LEN: usize = 4;

/// EIP-55 mixed-case rendering of an address.
pub fn to_checksum(address: &Address) -> String {
    let lower = hex::encode(address.as_bytes());
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(2 + lower.len());
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `0x1234...abcd`; short strings pass through.
pub fn shorten(address: &str) -> String {
    if address.len() <= PREFIX_LEN + SUFFIX_LEN + 3 {
        return address.to_string();
    }
    format!(
        "{}...{}",
        &address[..PREFIX_LEN],
        &address[address.len() - SUFFIX_LEN..]
    )
}

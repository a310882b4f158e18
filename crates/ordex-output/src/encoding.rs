//! Latin-1 encoding of outgoing text.
//!
//! The downstream importer reads ISO-8859-1 only. Characters above U+00FF
//! cannot be represented and are either replaced or dropped.

use encoding_rs::mem::{encode_latin1_lossy, is_str_latin1};

/// What to do with characters outside Latin-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unmappable {
    /// Write this character instead.
    Replace(char),
    /// Leave the character out.
    Drop,
}

/// Placeholder written for characters outside Latin-1.
pub const LATIN1_PLACEHOLDER: char = '?';

/// Encodes `text` as Latin-1.
pub fn encode_latin1(text: &str, unmappable: Unmappable) -> Vec<u8> {
    if is_str_latin1(text) {
        return encode_latin1_lossy(text).into_owned();
    }
    let representable: String = text
        .chars()
        .filter_map(|ch| {
            if u32::from(ch) <= 0xFF {
                Some(ch)
            } else {
                match unmappable {
                    Unmappable::Replace(placeholder) => Some(placeholder),
                    Unmappable::Drop => None,
                }
            }
        })
        .collect();
    encode_latin1_lossy(&representable).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::mem::decode_latin1;

    #[test]
    fn accented_text_is_single_byte() {
        let bytes = encode_latin1("Désignation", Unmappable::Replace(LATIN1_PLACEHOLDER));
        assert_eq!(bytes.len(), "Désignation".chars().count());
        assert_eq!(bytes[1], 0xE9);
        assert_eq!(decode_latin1(&bytes), "Désignation");
    }

    #[test]
    fn characters_outside_latin1_are_replaced_or_dropped() {
        let replaced = encode_latin1("Prix 5€ – ok", Unmappable::Replace(LATIN1_PLACEHOLDER));
        assert_eq!(decode_latin1(&replaced), "Prix 5? ? ok");

        let dropped = encode_latin1("F2025€", Unmappable::Drop);
        assert_eq!(dropped, b"F2025".to_vec());
    }
}

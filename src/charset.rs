// Copyright (c) 2026 rezky_nightky

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Charset {
    Matrix,
    Digits,
    Hex,
    Binary,
    Letters,
    Katakana,
    Ascii,
}

pub fn charset_from_str(spec: &str) -> Result<Charset, ConfigError> {
    match spec.trim().to_ascii_lowercase().as_str() {
        "matrix" => Ok(Charset::Matrix),
        "digits" | "dec" | "decimal" => Ok(Charset::Digits),
        "hex" | "hexadecimal" => Ok(Charset::Hex),
        "bin" | "binary" | "01" => Ok(Charset::Binary),
        "letters" | "english" => Ok(Charset::Letters),
        "katakana" => Ok(Charset::Katakana),
        "ascii" => Ok(Charset::Ascii),
        _ => Err(ConfigError::Charset(spec.to_string())),
    }
}

fn push_range(out: &mut Vec<char>, start: u32, end: u32) {
    for v in start..=end {
        if let Some(ch) = char::from_u32(v) {
            out.push(ch);
        }
    }
}

/// Alphabet for `charset`, or the characters of `custom` when given.
/// Repeats and whitespace are dropped; the result is never empty.
pub fn build_chars(charset: Charset, custom: Option<&str>) -> Vec<char> {
    let mut raw: Vec<char> = Vec::new();

    match custom {
        Some(s) => raw.extend(s.chars()),
        None => match charset {
            Charset::Matrix => raw.extend("0123456789qwertyuiopasdfghjklzxcvbnm".chars()),
            Charset::Digits => push_range(&mut raw, 0x30, 0x39),
            Charset::Hex => {
                push_range(&mut raw, 0x30, 0x39);
                push_range(&mut raw, 0x61, 0x66);
            }
            Charset::Binary => push_range(&mut raw, 0x30, 0x31),
            Charset::Letters => push_range(&mut raw, 0x61, 0x7A),
            Charset::Katakana => push_range(&mut raw, 0xFF66, 0xFF9D),
            Charset::Ascii => push_range(&mut raw, 0x21, 0x7E),
        },
    }

    let mut out: Vec<char> = Vec::with_capacity(raw.len());
    for ch in raw {
        if !ch.is_whitespace() && !ch.is_control() && !out.contains(&ch) {
            out.push(ch);
        }
    }

    if out.is_empty() {
        out.push('0');
        out.push('1');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_is_the_default_36() {
        let out = build_chars(Charset::Matrix, None);
        assert_eq!(out.len(), 36);
        assert_eq!(out.iter().collect::<String>(), "0123456789qwertyuiopasdfghjklzxcvbnm");
    }

    #[test]
    fn binary_has_only_0_and_1() {
        assert_eq!(build_chars(Charset::Binary, None), vec!['0', '1']);
    }

    #[test]
    fn custom_chars_are_deduplicated() {
        assert_eq!(build_chars(Charset::Matrix, Some("abca b")), vec!['a', 'b', 'c']);
        assert_eq!(build_chars(Charset::Matrix, Some("   ")), vec!['0', '1']);
    }

    #[test]
    fn aliases_and_unknown_names() {
        assert_eq!(charset_from_str(" DEC ").unwrap(), Charset::Digits);
        assert_eq!(charset_from_str("01").unwrap(), Charset::Binary);
        assert!(charset_from_str("runic").is_err());
    }

    #[test]
    fn katakana_range_is_half_width() {
        let out = build_chars(Charset::Katakana, None);
        assert_eq!(out.first(), Some(&'\u{FF66}'));
        assert_eq!(out.len(), 0xFF9D - 0xFF66 + 1);
    }
}

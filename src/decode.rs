use crate::std::string::String;
use crate::std::vec::Vec;

#[cfg(feature = "std")]
use thiserror::Error;

use crate::charset::{decode_a, decode_b, Charset, FNC1};
use crate::encode::PATTERNS;
use crate::{Bar, FNC1_SYMBOL, STOP, SWITCH_A, SWITCH_B, SWITCH_C};

/// Errors that can occur during decoding.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum DecodingError {
    /// A sequence of bars resulted in an unknown pattern.
    #[cfg_attr(feature = "std", error("pattern {0:b} not recognized"))]
    Pattern(u16),
    /// A bar's width or spacing is not valid.
    #[cfg_attr(feature = "std", error("bars are not valid"))]
    InvalidBars,
    /// The stop code at the end is wrong.
    #[cfg_attr(feature = "std", error("wrong stop code"))]
    WrongStop,
    /// The input was too short.
    #[cfg_attr(feature = "std", error("code too short to be valid"))]
    Short,
    /// The code's length can not fit an allowed sequence of bars.
    #[cfg_attr(feature = "std", error("length not correct"))]
    Length,
    /// The checksum did not match.
    #[cfg_attr(feature = "std", error("checksum mismatch"))]
    Checksum,
    /// The code did not start with a charset signal.
    #[cfg_attr(feature = "std", error("start char did not signal charset"))]
    NoCharset,
    /// A symbol occurred in a charset that did not support it.
    #[cfg_attr(feature = "std", error("unexpected symbol {0}"))]
    Unexpected(u8),
}

pub(crate) fn lookup(pattern: u16) -> Result<u8, DecodingError> {
    PATTERNS
        .iter()
        .position(|&p| p == pattern)
        .map(|i| i as u8)
        .ok_or(DecodingError::Pattern(pattern))
}

fn bars_to_pattern(bars: &[Bar]) -> Result<u16, DecodingError> {
    let mut result = 0;
    for bar in bars {
        match bar.width {
            1 => result = (result << 1) | 0b1,
            2 => result = (result << 2) | 0b11,
            3 => result = (result << 3) | 0b111,
            4 => result = (result << 4) | 0b1111,
            _ => return Err(DecodingError::InvalidBars),
        }
        result <<= bar.space;
    }
    Ok(result)
}

/// Map bars to the full symbol sequence, checksum and stop included.
pub fn bars_to_symbols(bars: &[Bar]) -> Result<Vec<u8>, DecodingError> {
    if bars.len() < 3 + 3 + 4 {
        return Err(DecodingError::Short);
    }
    let (data, stop) = bars.split_at(bars.len() - 4);
    if bars_to_pattern(stop)? != PATTERNS[STOP as usize] {
        return Err(DecodingError::WrongStop);
    }
    if data.len() % 3 != 0 {
        return Err(DecodingError::Length);
    }
    let mut symbols = data
        .chunks_exact(3)
        .map(|chunk| lookup(bars_to_pattern(chunk)?))
        .collect::<Result<Vec<u8>, _>>()?;
    symbols.push(STOP);
    Ok(symbols)
}

/// Decode a full symbol sequence back into logical text.
///
/// Function codes come back as [`FNC1`](crate::FNC1) and its siblings.
pub fn decode_symbols(symbols: &[u8]) -> Result<String, DecodingError> {
    let [body @ .., checksum, stop] = symbols else {
        return Err(DecodingError::Short);
    };
    if *stop != STOP {
        return Err(DecodingError::WrongStop);
    }
    if body.is_empty() {
        return Err(DecodingError::Short);
    }
    if crate::checksum(body.iter().cloned()) != *checksum {
        return Err(DecodingError::Checksum);
    }

    let mut charset = Charset::from_start(body[0]).ok_or(DecodingError::NoCharset)?;
    let mut text = String::with_capacity(body.len());
    for &symbol in &body[1..] {
        match (charset, symbol) {
            (Charset::C, 0..=99) => {
                text.push((b'0' + symbol / 10) as char);
                text.push((b'0' + symbol % 10) as char);
            }
            (Charset::C, SWITCH_A) | (Charset::B, SWITCH_A) => charset = Charset::A,
            (Charset::C, SWITCH_B) | (Charset::A, SWITCH_B) => charset = Charset::B,
            (Charset::A, SWITCH_C) | (Charset::B, SWITCH_C) => charset = Charset::C,
            (Charset::C, FNC1_SYMBOL) => text.push(FNC1),
            (Charset::A, _) => text.push(decode_a(symbol).ok_or(DecodingError::Unexpected(symbol))?),
            (Charset::B, _) => text.push(decode_b(symbol).ok_or(DecodingError::Unexpected(symbol))?),
            (Charset::C, _) => return Err(DecodingError::Unexpected(symbol)),
        }
    }
    Ok(text)
}

/// Decode a sequence of bars.
pub fn decode(bars: &[Bar]) -> Result<String, DecodingError> {
    decode_symbols(&bars_to_symbols(bars)?)
}

#[cfg(test)]
use crate::std::vec;

#[test]
fn test_bars_to_pattern() {
    assert_eq!(bars_to_pattern(&[Bar { width: 2, space: 0 }]), Ok(0b11));
    assert_eq!(
        bars_to_pattern(&[
            Bar { width: 2, space: 1 },
            Bar { width: 1, space: 2 },
            Bar { width: 3, space: 2 },
        ]),
        Ok(0b11010011100),
    );

    for pattern in PATTERNS {
        let bars = crate::encode::bits_to_bars(pattern);
        assert_eq!(bars_to_pattern(&bars), Ok(pattern));
    }
}

#[test]
fn test_round_trip() {
    let messages = [
        "HELLO\n123456w0r1\rd",
        "",
        "7",
        "12345",
        "ab12345c",
        "\u{f1}0101234567891011\u{f1}21abc",
        "A\nb\u{f4}\u{f2}\u{f3}",
        "\x7F~{}|",
    ];
    for msg in messages {
        let code = crate::Code128::encode(msg).unwrap();
        let bars: Vec<Bar> = code.bars().collect();
        assert_eq!(decode(&bars).as_deref(), Ok(msg));
        assert_eq!(decode_symbols(code.symbols()).as_deref(), Ok(msg));
    }
}

#[test]
fn test_wrong_checksum() {
    let mut symbols = crate::Code128::encode("abc").unwrap().symbols().to_vec();
    let n = symbols.len();
    symbols[n - 2] = (symbols[n - 2] + 1) % 103;
    assert_eq!(decode_symbols(&symbols), Err(DecodingError::Checksum));
}

#[test]
fn test_malformed() {
    assert_eq!(decode_symbols(&[STOP]), Err(DecodingError::Short));
    assert_eq!(decode_symbols(&[104, 104, 105]), Err(DecodingError::WrongStop));
    assert_eq!(decode_symbols(&[0, 0, STOP]), Err(DecodingError::NoCharset));
    // a start symbol in the middle of the code
    let body = vec![crate::START_C, crate::START_A];
    let mut symbols = body.clone();
    symbols.push(crate::checksum(body.into_iter()));
    symbols.push(STOP);
    assert_eq!(decode_symbols(&symbols), Err(DecodingError::Unexpected(crate::START_A)));
}

use crate::std::string::String;
use crate::std::vec;
use crate::std::vec::Vec;

use crate::charset::{self, Charset, FNC1};
use crate::error::{check_chars, EncodingError};
use crate::{Bar, FNC1_SYMBOL};

/// Bar patterns of the symbols, one bit per module.
///
/// The stop pattern includes the final termination bar.
pub(crate) const PATTERNS: [u16; 107] = [
    0x6cc, 0x66c, 0x666, 0x498, 0x48c, 0x44c, 0x4c8, 0x4c4, 0x464, 0x648, 0x644, 0x624, 0x59c,
    0x4dc, 0x4ce, 0x5cc, 0x4ec, 0x4e6, 0x672, 0x65c, 0x64e, 0x6e4, 0x674, 0x76e, 0x74c, 0x72c,
    0x726, 0x764, 0x734, 0x732, 0x6d8, 0x6c6, 0x636, 0x518, 0x458, 0x446, 0x588, 0x468, 0x462,
    0x688, 0x628, 0x622, 0x5b8, 0x58e, 0x46e, 0x5d8, 0x5c6, 0x476, 0x776, 0x68e, 0x62e, 0x6e8,
    0x6e2, 0x6ee, 0x758, 0x746, 0x716, 0x768, 0x762, 0x71a, 0x77a, 0x642, 0x78a, 0x530, 0x50c,
    0x4b0, 0x486, 0x42c, 0x426, 0x590, 0x584, 0x4d0, 0x4c2, 0x434, 0x432, 0x612, 0x650, 0x7ba,
    0x614, 0x47a, 0x53c, 0x4bc, 0x49e, 0x5e4, 0x4f4, 0x4f2, 0x7a4, 0x794, 0x792, 0x6de, 0x6f6,
    0x7b6, 0x578, 0x51e, 0x45e, 0x5e8, 0x5e2, 0x7a8, 0x7a2, 0x5de, 0x5ee, 0x75e, 0x7ae, 0x684,
    0x690, 0x69c, 0x18eb,
];

/// At least this many digits in a row make a switch to C worthwhile.
const MIN_DIGIT_RUN: usize = 4;
const LOOKAHEAD: usize = 10;

#[inline]
fn digit(ch: char) -> Option<u8> {
    ch.to_digit(10).map(|d| d as u8)
}

fn digit_run(chars: &[char]) -> usize {
    chars
        .iter()
        .take(LOOKAHEAD)
        .take_while(|c| c.is_ascii_digit())
        .count()
}

/// State of one encoding pass.
#[derive(Debug, PartialEq, Clone)]
struct Encodation {
    charset: Charset,
    /// A digit waiting for its partner while in charset C.
    pending: Option<u8>,
    symbols: Vec<u8>,
    /// Set if the very first body symbol switched the charset.
    leading_switch: Option<Charset>,
}

impl Encodation {
    fn new(charset: Charset) -> Self {
        Self {
            charset,
            pending: None,
            symbols: vec![charset.start()],
            leading_switch: None,
        }
    }

    #[inline]
    fn switch(&mut self, charset: Charset) {
        log::debug!("switching from {:?} to {:?}", self.charset, charset);
        if self.symbols.len() == 1 {
            self.leading_switch = Some(charset);
        }
        self.symbols.push(charset.switch());
        self.charset = charset;
    }

    /// Emit the pending digit on its own, which requires leaving C.
    fn flush_pending(&mut self) {
        debug_assert_ne!(self.charset, Charset::C);
        if let Some(d) = self.pending.take() {
            // digits have the same value in A and B
            self.symbols.push(b'0' + d - b' ');
        }
    }

    fn push_char(&mut self, ch: char) -> Result<(), EncodingError> {
        let symbol = self.charset.value(ch).ok_or_else(|| illegal(ch))?;
        self.symbols.push(symbol);
        Ok(())
    }

    fn push_digit(&mut self, d: u8) {
        match self.pending.take() {
            Some(first) => self.symbols.push(Charset::pair(first, d)),
            None => self.pending = Some(d),
        }
    }

    /// Merge a switch right after the start symbol into the start symbol.
    fn fold_start(mut self) -> Self {
        if let Some(charset) = self.leading_switch.take() {
            log::debug!("folding leading switch into start code {:?}", charset);
            self.symbols.remove(1);
            self.symbols[0] = charset.start();
        }
        self
    }
}

fn illegal(ch: char) -> EncodingError {
    let mut chars = String::new();
    chars.push(ch);
    EncodingError::IllegalCharacter {
        symbology: crate::NAME,
        chars,
    }
}

/// Encode the logical text into start and body symbols.
///
/// Checksum and stop are not included.
pub(super) fn encode_as_indices(
    text: &str,
    start: Charset,
    fold: bool,
) -> Result<Vec<u8>, EncodingError> {
    check_chars(text, crate::NAME, charset::is_encodable)?;

    let chars: Vec<char> = text.chars().collect();
    let mut enc = Encodation::new(start);

    for (pos, &ch) in chars.iter().enumerate() {
        match enc.charset {
            Charset::C => {
                if let Some(d) = digit(ch) {
                    enc.push_digit(d);
                    continue;
                }
                // FNC1 exists in C, but an unpaired digit has to leave first
                if ch == FNC1 && enc.pending.is_none() {
                    enc.symbols.push(FNC1_SYMBOL);
                    continue;
                }
                let next = if Charset::B.contains(ch) {
                    Charset::B
                } else {
                    Charset::A
                };
                enc.switch(next);
                enc.flush_pending();
            }
            current => {
                if digit_run(&chars[pos..]) >= MIN_DIGIT_RUN {
                    enc.switch(Charset::C);
                    if let Some(d) = digit(ch) {
                        enc.push_digit(d);
                    }
                    continue;
                }
                let other = match current {
                    Charset::A => Charset::B,
                    _ => Charset::A,
                };
                if !current.contains(ch) && other.contains(ch) {
                    enc.switch(other);
                }
            }
        }
        enc.push_char(ch)?;
    }

    if enc.pending.is_some() {
        enc.switch(Charset::B);
        enc.flush_pending();
    }

    let enc = if fold { enc.fold_start() } else { enc };
    Ok(enc.symbols)
}

pub(super) fn bits_to_bars(mut bits: u16) -> Vec<Bar> {
    let mut bars = Vec::with_capacity(3);
    while bits != 0 {
        let mut width = 0;
        let zeroes = bits.leading_zeros();
        for i in (0..(16 - zeroes)).rev() {
            if bits & (1 << i) != 0 {
                width += 1;
                bits ^= 1 << i;
            } else {
                break;
            }
        }
        bars.push(Bar {
            width: width as u8,
            space: (bits.leading_zeros() - width - zeroes) as u8,
        });
    }
    bars
}

#[cfg(test)]
use crate::{START_A, START_B, START_C, SWITCH_A, SWITCH_B, SWITCH_C};

#[cfg(test)]
fn encode(text: &str) -> Vec<u8> {
    encode_as_indices(text, Charset::guess(text), true).unwrap()
}

#[test]
fn test_bits_to_bars() {
    assert_eq!(bits_to_bars(0), vec![]);
    let bars = bits_to_bars(0b10000011010);
    assert_eq!(
        bars,
        vec![
            Bar { width: 1, space: 5 },
            Bar { width: 2, space: 1 },
            Bar { width: 1, space: 1 },
        ]
    );
    let bars = bits_to_bars(0b1100011101011);
    assert_eq!(
        bars,
        vec![
            Bar { width: 2, space: 3 },
            Bar { width: 3, space: 1 },
            Bar { width: 1, space: 1 },
            Bar { width: 2, space: 0 },
        ]
    );
}

#[test]
fn test_patterns() {
    for (i, pattern) in PATTERNS.iter().cloned().enumerate() {
        assert_eq!(crate::decode::lookup(pattern), Ok(i as u8));
    }
}

#[test]
fn test_digits_start_in_c() {
    assert_eq!(encode("1234"), vec![START_C, 12, 34]);
    assert_eq!(encode("00"), vec![START_C, 0]);
}

#[test]
fn test_odd_digits_end_in_b() {
    assert_eq!(encode("12345"), vec![START_C, 12, 34, SWITCH_B, b'5' - b' ']);
    // a single digit folds the switch into the start code
    assert_eq!(encode("7"), vec![START_B, b'7' - b' ']);
}

#[test]
fn test_short_digit_runs_stay_in_b() {
    assert_eq!(
        encode("a123b"),
        vec![START_B, 65, b'1' - b' ', b'2' - b' ', b'3' - b' ', 66]
    );
}

#[test]
fn test_switch_to_c_for_long_runs() {
    assert_eq!(
        encode("ab1234"),
        vec![START_B, 65, 66, SWITCH_C, 12, 34]
    );
    assert_eq!(
        encode("ab12345c"),
        vec![START_B, 65, 66, SWITCH_C, 12, 34, SWITCH_B, b'5' - b' ', 67]
    );
}

#[test]
fn test_leading_digits_fold_into_start_c() {
    assert_eq!(encode("1234ab"), vec![START_C, 12, 34, SWITCH_B, 65, 66]);
}

#[test]
fn test_control_characters_use_a() {
    assert_eq!(encode("\nAB"), vec![START_A, b'\n' + 0x40, 33, 34]);
    assert_eq!(
        encode("ab\n"),
        vec![START_B, 65, 66, SWITCH_A, b'\n' + 0x40]
    );
    assert_eq!(
        encode("A\nb"),
        vec![START_B, 33, SWITCH_A, b'\n' + 0x40, SWITCH_B, 66]
    );
}

#[test]
fn test_c_to_a_for_control_characters() {
    assert_eq!(
        encode("1234\n"),
        vec![START_C, 12, 34, SWITCH_A, b'\n' + 0x40]
    );
}

#[test]
fn test_fnc1_in_c() {
    let text = "\u{f1}0123";
    assert_eq!(
        encode_as_indices(text, Charset::C, true).unwrap(),
        vec![START_C, FNC1_SYMBOL, 1, 23]
    );
    // an unpaired digit is flushed in B before the separator
    assert_eq!(
        encode_as_indices("123\u{f1}45", Charset::C, true).unwrap(),
        vec![START_C, 12, SWITCH_B, b'3' - b' ', FNC1_SYMBOL, b'4' - b' ', b'5' - b' ']
    );
}

#[test]
fn test_no_fold_without_switch() {
    // FNC4 in B has the value of the switch to B
    assert_eq!(encode("\u{f4}a"), vec![START_B, SWITCH_B, 65]);
    // the digit pair 99 has the value of the switch to C
    assert_eq!(encode("99"), vec![START_C, 99]);
}

#[test]
fn test_fold_can_be_disabled() {
    assert_eq!(
        encode_as_indices("7", Charset::C, false).unwrap(),
        vec![START_C, SWITCH_B, b'7' - b' ']
    );
}

#[test]
fn test_illegal_characters() {
    assert_eq!(
        encode_as_indices("aäbß", Charset::B, true),
        Err(EncodingError::IllegalCharacter {
            symbology: crate::NAME,
            chars: "äß".into(),
        })
    );
}

#[test]
fn test_empty() {
    assert_eq!(encode(""), vec![START_B]);
}

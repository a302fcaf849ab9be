//! The three charsets of Code 128 and their symbol values.
//!
//! Logical text uses four private characters for the function codes, see
//! [`FNC1`] to [`FNC4`]. Everything else is plain ASCII: charset A covers the
//! control characters and upper case, charset B all printable characters,
//! and charset C packs two digits into one symbol.

use crate::{FNC1_SYMBOL, START_A, START_B, START_C, SWITCH_A, SWITCH_B, SWITCH_C};

/// Function code 1, the GS1 marker and field separator.
pub const FNC1: char = '\u{f1}';
/// Function code 2.
pub const FNC2: char = '\u{f2}';
/// Function code 3.
pub const FNC3: char = '\u{f3}';
/// Function code 4.
pub const FNC4: char = '\u{f4}';

const FNC2_SYMBOL: u8 = 97;
const FNC3_SYMBOL: u8 = 96;

/// One of the three Code 128 charsets.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Charset {
    /// Control characters and upper case ASCII.
    A,
    /// Printable ASCII.
    B,
    /// Pairs of digits.
    C,
}

impl Charset {
    /// The start symbol opening a code in this charset.
    #[inline]
    pub fn start(self) -> u8 {
        match self {
            Charset::A => START_A,
            Charset::B => START_B,
            Charset::C => START_C,
        }
    }

    /// The symbol switching from another charset to this one.
    #[inline]
    pub fn switch(self) -> u8 {
        match self {
            Charset::A => SWITCH_A,
            Charset::B => SWITCH_B,
            Charset::C => SWITCH_C,
        }
    }

    pub(crate) fn from_start(symbol: u8) -> Option<Self> {
        match symbol {
            START_A => Some(Charset::A),
            START_B => Some(Charset::B),
            START_C => Some(Charset::C),
            _ => None,
        }
    }

    /// The symbol value of a single character in this charset.
    ///
    /// Charset C only encodes [`FNC1`] on its own, digits go through
    /// [`Charset::pair`].
    pub fn value(self, ch: char) -> Option<u8> {
        match self {
            Charset::A => encode_a(ch),
            Charset::B => encode_b(ch),
            Charset::C => (ch == FNC1).then_some(FNC1_SYMBOL),
        }
    }

    /// Whether the character belongs to this charset.
    ///
    /// For charset C this is true for single digits although they can only
    /// be emitted in pairs.
    pub fn contains(self, ch: char) -> bool {
        match self {
            Charset::C => ch.is_ascii_digit() || ch == FNC1,
            _ => self.value(ch).is_some(),
        }
    }

    /// The symbol value of two digits in charset C.
    #[inline]
    pub fn pair(first: u8, second: u8) -> u8 {
        debug_assert!(first < 10 && second < 10);
        first * 10 + second
    }

    /// Initial charset for the text: C if it only consists of digits, B
    /// otherwise.
    pub fn guess(text: &str) -> Self {
        if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
            Charset::C
        } else {
            Charset::B
        }
    }
}

/// Whether the character can be encoded in any charset.
pub fn is_encodable(ch: char) -> bool {
    encode_a(ch).is_some() || encode_b(ch).is_some()
}

fn encode_a(ch: char) -> Option<u8> {
    match ch {
        '\0'..='\x1F' => Some(ch as u8 + 0x40),
        ' '..='_' => Some(ch as u8 - b' '),
        FNC1 => Some(FNC1_SYMBOL),
        FNC2 => Some(FNC2_SYMBOL),
        FNC3 => Some(FNC3_SYMBOL),
        // shares its value with the switch to A in charset B
        FNC4 => Some(SWITCH_A),
        _ => None,
    }
}

fn encode_b(ch: char) -> Option<u8> {
    match ch {
        ' '..='\x7F' => Some(ch as u8 - b' '),
        FNC1 => Some(FNC1_SYMBOL),
        FNC2 => Some(FNC2_SYMBOL),
        FNC3 => Some(FNC3_SYMBOL),
        FNC4 => Some(SWITCH_B),
        _ => None,
    }
}

pub(crate) fn decode_a(symbol: u8) -> Option<char> {
    match symbol {
        0..=0x3F => Some((symbol + b' ') as char),
        0x40..=0x5F => Some((symbol - 0x40) as char),
        FNC3_SYMBOL => Some(FNC3),
        FNC2_SYMBOL => Some(FNC2),
        SWITCH_A => Some(FNC4),
        FNC1_SYMBOL => Some(FNC1),
        _ => None,
    }
}

pub(crate) fn decode_b(symbol: u8) -> Option<char> {
    match symbol {
        0..=0x5F => Some((symbol + b' ') as char),
        FNC3_SYMBOL => Some(FNC3),
        FNC2_SYMBOL => Some(FNC2),
        SWITCH_B => Some(FNC4),
        FNC1_SYMBOL => Some(FNC1),
        _ => None,
    }
}

#[test]
fn test_charset_a() {
    assert_eq!(Charset::A.value(' '), Some(0));
    assert_eq!(Charset::A.value('A'), Some(33));
    assert_eq!(Charset::A.value('_'), Some(63));
    assert_eq!(Charset::A.value('\0'), Some(64));
    assert_eq!(Charset::A.value('\x1D'), Some(93));
    assert_eq!(Charset::A.value('a'), None);
    assert_eq!(Charset::A.value(FNC1), Some(102));
}

#[test]
fn test_charset_b() {
    assert_eq!(Charset::B.value('a'), Some(65));
    assert_eq!(Charset::B.value('~'), Some(94));
    assert_eq!(Charset::B.value('\x7F'), Some(95));
    assert_eq!(Charset::B.value('\n'), None);
    assert_eq!(Charset::B.value(FNC4), Some(100));
}

#[test]
fn test_charset_c() {
    assert_eq!(Charset::pair(4, 2), 42);
    assert_eq!(Charset::C.value(FNC1), Some(102));
    assert_eq!(Charset::C.value('4'), None);
    assert!(Charset::C.contains('4'));
    assert!(!Charset::C.contains('x'));
}

#[test]
fn test_inverse() {
    for ch in (0u8..=0x7F).map(char::from).chain([FNC1, FNC2, FNC3, FNC4]) {
        if let Some(symbol) = encode_a(ch) {
            assert_eq!(decode_a(symbol), Some(ch));
        }
        if let Some(symbol) = encode_b(ch) {
            assert_eq!(decode_b(symbol), Some(ch));
        }
        assert!(is_encodable(ch));
    }
    assert!(!is_encodable('ß'));
}

#[test]
fn test_guess() {
    assert_eq!(Charset::guess("0123"), Charset::C);
    assert_eq!(Charset::guess("012a"), Charset::B);
    assert_eq!(Charset::guess(""), Charset::B);
}

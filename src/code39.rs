//! Code 39 and the German pharmaceutical number (PZN) built on it.

use crate::error::{check_chars, EncodingError};
use crate::std::format;
use crate::std::string::String;
use crate::std::vec::Vec;

/// The characters of Code 39, their index is the symbol value.
const CHARS: &[u8; 43] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";

/// Symbol value of `*`, the start and stop character.
const EDGE: u8 = 43;

fn value(ch: char) -> Option<u8> {
    CHARS.iter().position(|&c| c as char == ch).map(|i| i as u8)
}

/// A Code 39.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Code39 {
    code: String,
    /// Whether the last character is the check character.
    check: bool,
}

impl Code39 {
    pub(crate) const NAME: &'static str = "Code 39";

    /// Upper-case the code and optionally append the modulo 43 check
    /// character.
    pub fn new(code: &str, add_checksum: bool) -> Result<Self, EncodingError> {
        let mut code = code.to_ascii_uppercase();
        check_chars(&code, Self::NAME, |c| value(c).is_some())?;
        if add_checksum {
            code.push(CHARS[checksum(&code) as usize] as char);
        }
        Ok(Self {
            code,
            check: add_checksum,
        })
    }

    /// The code as encoded, check character included.
    pub fn fullcode(&self) -> &str {
        &self.code
    }

    /// The modulo 43 check value of the data.
    pub fn checksum(&self) -> u8 {
        let data = if self.check {
            &self.code[..self.code.len() - 1]
        } else {
            &self.code[..]
        };
        checksum(data)
    }

    /// The symbol values, framed by `*` (value 43).
    pub fn symbols(&self) -> Vec<u8> {
        let mut symbols = Vec::with_capacity(self.code.len() + 2);
        symbols.push(EDGE);
        symbols.extend(self.code.chars().filter_map(value));
        symbols.push(EDGE);
        symbols
    }
}

fn checksum(code: &str) -> u8 {
    (code.chars().filter_map(value).map(u32::from).sum::<u32>() % 43) as u8
}

/// The two generations of the PZN.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PznKind {
    /// Six digits and a check digit.
    Pzn7,
    /// Seven digits and a check digit.
    Pzn8,
}

impl PznKind {
    fn digits(self) -> usize {
        match self {
            PznKind::Pzn7 => 6,
            PznKind::Pzn8 => 7,
        }
    }

    fn first_weight(self) -> u32 {
        match self {
            PznKind::Pzn7 => 2,
            PznKind::Pzn8 => 1,
        }
    }
}

/// A Pharmazentralnummer, encoded as Code 39 `PZN-<digits><check>`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Pzn {
    kind: PznKind,
    /// Digits with the check digit.
    pzn: String,
}

impl Pzn {
    pub(crate) const NAME: &'static str = "Pharmazentralnummer";

    /// Extra characters are cut off before validating.
    pub fn new(pzn: &str, kind: PznKind) -> Result<Self, EncodingError> {
        let pzn: String = pzn.chars().take(kind.digits()).collect();
        check_chars(&pzn, Self::NAME, |c| c.is_ascii_digit())?;
        if pzn.len() != kind.digits() {
            return Err(EncodingError::NumberOfDigits {
                expected: kind.digits(),
                found: pzn.len(),
            });
        }
        let check = pzn_checksum(&pzn, kind)?;
        Ok(Self {
            kind,
            pzn: format!("{pzn}{check}"),
        })
    }

    /// Which PZN generation this is.
    pub fn kind(&self) -> PznKind {
        self.kind
    }

    /// `PZN-` followed by the digits and the check digit.
    pub fn fullcode(&self) -> String {
        format!("PZN-{}", self.pzn)
    }

    /// The check digit.
    pub fn checksum(&self) -> u8 {
        self.pzn.as_bytes()[self.pzn.len() - 1] - b'0'
    }

    /// The Code 39 carrying this PZN, without a Code 39 check character.
    pub fn code39(&self) -> Code39 {
        Code39 {
            code: self.fullcode(),
            check: false,
        }
    }
}

fn pzn_checksum(digits: &str, kind: PznKind) -> Result<u8, EncodingError> {
    let sum: u32 = digits
        .bytes()
        .zip(kind.first_weight()..)
        .map(|(d, weight)| u32::from(d - b'0') * weight)
        .sum();
    match (sum % 11) as u8 {
        10 => Err(EncodingError::ChecksumDomain(10)),
        check => Ok(check),
    }
}

#[test]
fn test_code39_checksum() {
    let code = Code39::new("code39", true).unwrap();
    assert_eq!(code.fullcode(), "CODE39W");
    assert_eq!(code.checksum(), 32);
    assert_eq!(Code39::new("CODE39", false).unwrap().checksum(), 32);
}

#[test]
fn test_code39_symbols() {
    let code = Code39::new("A-1", false).unwrap();
    assert_eq!(code.symbols(), crate::std::vec![EDGE, 10, 36, 1, EDGE]);
}

#[test]
fn test_code39_illegal() {
    assert_eq!(
        Code39::new("ab_c*", false),
        Err(EncodingError::IllegalCharacter {
            symbology: Code39::NAME,
            chars: "_*".into(),
        })
    );
}

#[test]
fn test_pzn7() {
    let pzn = Pzn::new("490880", PznKind::Pzn7).unwrap();
    assert_eq!(pzn.fullcode(), "PZN-4908802");
    assert_eq!(pzn.checksum(), 2);
    assert_eq!(pzn.code39().fullcode(), "PZN-4908802");
    // extra digits are ignored
    assert_eq!(Pzn::new("49088099", PznKind::Pzn7).unwrap(), pzn);
}

#[test]
fn test_pzn8() {
    let pzn = Pzn::new("2758089", PznKind::Pzn8).unwrap();
    assert_eq!(pzn.fullcode(), "PZN-27580899");
}

#[test]
fn test_pzn_errors() {
    assert_eq!(
        Pzn::new("12345", PznKind::Pzn7),
        Err(EncodingError::NumberOfDigits {
            expected: 6,
            found: 5
        })
    );
    assert!(matches!(
        Pzn::new("12a456", PznKind::Pzn7),
        Err(EncodingError::IllegalCharacter { .. })
    ));
    assert_eq!(
        Pzn::new("000003", PznKind::Pzn7),
        Err(EncodingError::ChecksumDomain(10))
    );
}

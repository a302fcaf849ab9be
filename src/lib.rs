//! This crate encodes text as Code 128 symbols and builds GS1-128 codes
//! from GS1 application identifiers (AIs).
//!
//! The encoder works on logical text: printable ASCII, ASCII control
//! characters, and the four function codes [`FNC1`] to [`FNC4`]. It walks the
//! text once, switching between the charsets A, B and C as it goes, and
//! produces the sequence of symbol values with start, checksum and stop.
//!
//! ## Example
//!
//! ```rust
//! use gs1_code128::{Code128, Gs1128Ai};
//!
//! let code = Code128::encode("Hello!").unwrap();
//! assert_eq!(code.symbols()[0], 104);
//!
//! let gs1 = Gs1128Ai::from_brackets("(10)4711(01)08720299927469(11)240621");
//! assert!(gs1.warnings().is_empty());
//! // fixed length AIs go first, so no separator is needed
//! assert_eq!(gs1.fullcode(), "(01)08720299927469(11)240621(10)4711");
//! let code = gs1.encode().unwrap();
//! assert_eq!(&code.symbols()[..3], &[105, 102, 1]);
//! ```
//!
//! ## GS1 application identifiers
//!
//! [`Gs1128Ai`] accepts either bracket notation like `(01)...(11)...` or a list
//! of identifier/value pairs. Identifiers may be given by name (`"GTIN"`) or by
//! code (`"01"`). Values of the measure AIs `310` to `342` are scaled to six
//! digits with an implied decimal point. Problems with the values do not stop
//! the encoding, they are collected as [`Warning`]s.
//!
//! ## Other symbologies
//!
//! [`Code39`] and [`Pzn`] are included for completeness. All symbologies share
//! the [`Symbology`] trait and the [`Barcode`] enum.
#![no_std]

#[cfg(not(feature = "std"))]
extern crate alloc as std;
#[cfg(feature = "std")]
extern crate std;

use std::vec::Vec;

mod ai;
mod charset;
mod code39;
mod decode;
mod encode;
mod error;
mod gs1;
mod symbology;

pub use ai::{resolve_name, AiInfo};
pub use charset::{Charset, FNC1, FNC2, FNC3, FNC4};
pub use code39::{Code39, Pzn, PznKind};
pub use decode::{bars_to_symbols, decode, decode_symbols, DecodingError};
pub use error::EncodingError;
pub use gs1::{
    ai_values_from_brackets, is_well_formed, normalize_pair, scale_decimal, Gs1128, Gs1128Ai,
    Gs1Message, Warning, WarningKind,
};
pub use symbology::{Barcode, Code128Text, Symbology};

const NAME: &str = "Code 128";

const SWITCH_C: u8 = 99;
const SWITCH_B: u8 = 100;
const SWITCH_A: u8 = 101;
const FNC1_SYMBOL: u8 = 102;
const START_A: u8 = 103;
const START_B: u8 = 104;
const START_C: u8 = 105;
const STOP: u8 = 106;

fn checksum(symbols: impl Iterator<Item = u8>) -> u8 {
    (symbols
        .enumerate()
        .map(|(i, idx)| (i.max(1) as u64) * idx as u64)
        .sum::<u64>()
        % 103) as u8
}

/// Representation of a "black line" in the code.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Bar {
    /// The width of the line.
    ///
    /// Ranges from one to four.
    pub width: u8,
    /// White space after the line.
    pub space: u8,
}

/// A coordinate of a bar in a barcode.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct BarCoordinate {
    /// The x coordinate, started from the left.
    ///
    /// The first bar will always be at 10, which is the
    /// offset for the left quiet zone.
    pub x: u32,
    /// The width of the bar.
    pub width: u8,
}

/// An encoded Code 128.
///
/// The [symbols](Self::symbols) are the start symbol, the data symbols with
/// charset switches in between, the checksum, and the stop symbol. Each
/// symbol value stands for a fixed pattern of bars, available through
/// [`bars()`](Self::bars) and [`bar_coordinates()`](Self::bar_coordinates).
///
/// ```rust
/// # use gs1_code128::Code128;
/// let code = Code128::encode("Code128 <3").unwrap();
/// let available_space = 100.0; // unit is, say, "pt"
/// let line_width = available_space / code.len() as f64;
/// for bar in code.bar_coordinates() {
///      let x = bar.x as f64 * line_width;
///      let width = bar.width as f64 * line_width;
///      // print line at `x` pt, `width` pt wide
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Code128 {
    indices: Vec<u8>,
}

impl Code128 {
    /// Encode the text as Code 128.
    ///
    /// Text made of digits only starts in charset C, anything else in B.
    pub fn encode(text: &str) -> Result<Self, EncodingError> {
        Code128Builder::default().encode(text)
    }

    /// The full symbol sequence: start, data, checksum and stop.
    pub fn symbols(&self) -> &[u8] {
        &self.indices
    }

    /// The checksum symbol.
    pub fn checksum(&self) -> u8 {
        self.indices[self.indices.len() - 2]
    }

    /// Get the sequence of bars this Code 128 consists of.
    pub fn bars(&self) -> impl Iterator<Item = Bar> + '_ {
        self.indices
            .iter()
            .flat_map(|idx| encode::bits_to_bars(encode::PATTERNS[*idx as usize]))
    }

    /// Get the coordinates of the bars this Code 128 consists of.
    pub fn bar_coordinates(&self) -> impl Iterator<Item = BarCoordinate> + '_ {
        self.bars().scan(10, |pos, bar| {
            let x = *pos;
            *pos += bar.width as u32 + bar.space as u32;
            Some(BarCoordinate {
                x,
                width: bar.width,
            })
        })
    }

    /// Get the total width of the code in units of the [Bar](crate::Bar)
    /// with the quiet zone included.
    pub fn len(&self) -> usize {
        self.indices.len() * 11 + 2 + 20
    }

    /// Whether this Code 128 encodes empty data.
    pub fn is_empty(&self) -> bool {
        self.indices.len() == 3
    }
}

/// Builder for encoding a Code 128 with more control.
#[derive(Debug, Clone, Copy)]
pub struct Code128Builder {
    start: Option<Charset>,
    fold_start: bool,
}

impl Code128Builder {
    /// Start in the given charset instead of guessing from the text.
    pub fn with_start(self, start: Charset) -> Self {
        Self {
            start: Some(start),
            ..self
        }
    }

    /// Whether a charset switch directly after the start symbol is merged
    /// into the start symbol. Enabled by default.
    pub fn with_start_folding(self, fold_start: bool) -> Self {
        Self { fold_start, ..self }
    }

    /// Encode the text as Code 128.
    pub fn encode(self, text: &str) -> Result<Code128, EncodingError> {
        let start = self.start.unwrap_or_else(|| Charset::guess(text));
        let mut indices = encode::encode_as_indices(text, start, self.fold_start)?;
        indices.push(checksum(indices.iter().cloned()));
        indices.push(STOP);
        Ok(Code128 { indices })
    }
}

impl Default for Code128Builder {
    fn default() -> Self {
        Self {
            start: None,
            fold_start: true,
        }
    }
}

#[test]
fn test_bar_size() {
    for pattern in &encode::PATTERNS[0..STOP as usize] {
        let size: u32 = encode::bits_to_bars(*pattern)
            .into_iter()
            .map(|m| m.width as u32 + m.space as u32)
            .sum();
        assert_eq!(size, 11);
    }

    let size: u32 = encode::bits_to_bars(encode::PATTERNS[STOP as usize])
        .into_iter()
        .map(|m| m.width as u32 + m.space as u32)
        .sum();
    assert_eq!(size, 13);
}

#[test]
fn test_code_size() {
    let code = Code128::encode("foo").unwrap();
    let size = code
        .bars()
        .map(|m| m.width as u32 + m.space as u32)
        .sum::<u32>()
        + 20;
    assert_eq!(code.len(), size as usize);
}

#[test]
fn test_is_empty() {
    assert!(Code128::encode("").unwrap().is_empty());
    assert!(!Code128::encode(".").unwrap().is_empty());
}

#[test]
fn test_checksum() {
    // 104 + 1 * 33 + 2 * 34 = 205, 205 % 103 = 102
    let code = Code128::encode("AB").unwrap();
    assert_eq!(code.symbols(), &[START_B, 33, 34, 102, STOP]);
    assert_eq!(code.checksum(), 102);

    for text in ["", "0", "a1b2c3d4", "\u{f1}0123456789", "\n\t\r"] {
        let first = Code128::encode(text).unwrap();
        let again = Code128::encode(text).unwrap();
        assert_eq!(first, again);
        assert!(first.checksum() < 103);
        let n = first.symbols().len();
        assert_eq!(
            first.checksum(),
            checksum(first.symbols()[..n - 2].iter().cloned())
        );
    }
}

#[test]
fn test_builder() {
    let code = Code128Builder::default()
        .with_start(Charset::A)
        .encode("AB")
        .unwrap();
    assert_eq!(code.symbols()[..3], [START_A, 33, 34]);

    let code = Code128Builder::default()
        .with_start_folding(false)
        .encode("\nA")
        .unwrap();
    assert_eq!(code.symbols()[..4], [START_B, SWITCH_A, 74, 33]);
}

#[test]
fn test_only_digits_start_in_c() {
    for text in ["0", "42", "0123456789", "000000000000001"] {
        let code = Code128Builder::default()
            .with_start_folding(false)
            .encode(text)
            .unwrap();
        assert_eq!(code.symbols()[0], START_C);
    }
}

#[test]
fn test_short_digit_runs_never_use_c() {
    for text in ["a1b22c333d", "123abc", "x9y99z999"] {
        let code = Code128::encode(text).unwrap();
        let n = code.symbols().len();
        assert!(!code.symbols()[..n - 2].contains(&SWITCH_C));
        assert_ne!(code.symbols()[0], START_C);
    }
}

#[test]
fn test_bar_coordinates() {
    let code = Code128::encode("").unwrap();
    // 104 % 103 = 1
    assert_eq!(code.symbols(), &[START_B, 1, STOP]);
    let bars: Vec<_> = code.bar_coordinates().collect();
    assert_eq!(bars[0], BarCoordinate { x: 10, width: 2 });
    assert_eq!(bars[1], BarCoordinate { x: 13, width: 1 });
    assert_eq!(bars[2], BarCoordinate { x: 16, width: 1 });
    assert_eq!(bars[3], BarCoordinate { x: 21, width: 2 });
    assert_eq!(bars[4], BarCoordinate { x: 25, width: 2 });
    assert_eq!(bars[5], BarCoordinate { x: 28, width: 2 });
    assert_eq!(bars[6], BarCoordinate { x: 32, width: 2 });
    assert_eq!(bars[7], BarCoordinate { x: 37, width: 3 });
    assert_eq!(bars[8], BarCoordinate { x: 41, width: 1 });
    assert_eq!(bars[9], BarCoordinate { x: 43, width: 2 });
    assert_eq!(bars.len(), 10);
}

#[test]
fn test_gs1_ai_prefix() {
    let gs1 = Gs1128Ai::from_brackets("(01)01234567891011(11)200622(17)240622(21)88888888");
    let code = gs1.encode().unwrap();
    assert_eq!(
        code.symbols(),
        &[
            START_C,
            FNC1_SYMBOL,
            1,
            1,
            23,
            45,
            67,
            89,
            10,
            11,
            11,
            20,
            6,
            22,
            17,
            24,
            6,
            22,
            21,
            88,
            88,
            88,
            88,
            62,
            STOP,
        ]
    );
}

//! GS1-128: Code 128 with a leading [`FNC1`] and, optionally, application
//! identifiers (AIs) that describe the data.

use core::fmt;

use crate::ai::{is_date, is_decimal_prefix, resolve_name, AiInfo};
use crate::charset::{Charset, FNC1};
use crate::std::format;
use crate::std::string::{String, ToString};
use crate::std::vec::Vec;
use crate::{Code128, Code128Builder, EncodingError};

/// Digits in the value of a measure AI.
const DECIMAL_DIGITS: usize = 6;

/// What is wrong with an AI or its value.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum WarningKind {
    /// The AI demands a value of fixed length.
    FixedLength {
        /// Required length.
        expected: usize,
        /// Length of the given value.
        found: usize,
    },
    /// A measure AI got a value that is not a number. The value is used as
    /// is.
    NotNumeric,
    /// A measure value had more than six digits and was cut.
    Truncated {
        /// Length of the given value.
        found: usize,
    },
    /// The AI has more than four digits.
    AiTooLong,
    /// The AI is neither a known name nor a numeric code.
    UnknownAi,
}

/// A problem found while normalizing an AI and its value.
///
/// Warnings never stop the encoding, the value is used as well as possible.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Warning {
    /// The AI code, after resolving names.
    pub ai: String,
    /// The value as given.
    pub value: String,
    /// The kind of problem.
    pub kind: WarningKind,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { ai, value, .. } = self;
        match self.kind {
            WarningKind::FixedLength { .. } if is_date(ai) => write!(
                f,
                "for AI {ai} the date format is YYMMDD, use 00 for an unknown day, not {value:?}"
            ),
            WarningKind::FixedLength { expected, found } => write!(
                f,
                "for AI {ai} the value should have {expected} characters, not {found}"
            ),
            WarningKind::NotNumeric => {
                write!(f, "AI {ai} only takes numbers, {value:?} was provided")
            }
            WarningKind::Truncated { found } => write!(
                f,
                "AI {ai} takes {} digits, {value:?} has {found} characters and was cut",
                DECIMAL_DIGITS
            ),
            WarningKind::AiTooLong => write!(f, "AI {ai} is too long, only 4 digits are allowed"),
            WarningKind::UnknownAi => {
                write!(f, "AI {ai:?} is neither a known name nor a 2 to 4 digit code")
            }
        }
    }
}

fn warn(warnings: &mut Vec<Warning>, ai: &str, value: &str, kind: WarningKind) {
    let warning = Warning {
        ai: ai.into(),
        value: value.into(),
        kind,
    };
    log::warn!("{warning}");
    warnings.push(warning);
}

/// Whether the brackets of the code are balanced.
pub fn is_well_formed(code: &str) -> bool {
    code.matches('(').count() == code.matches(')').count()
}

/// Split bracket notation like `(01)0872...(11)240621` into AI/value pairs.
///
/// Returns `None` if the code is not made of `(AI)value` groups only.
pub fn ai_values_from_brackets(code: &str) -> Option<Vec<(&str, &str)>> {
    if !is_well_formed(code) {
        return None;
    }
    code.strip_prefix('(')?
        .split('(')
        .map(|group| group.split_once(')'))
        .collect()
}

fn is_number(value: &str) -> bool {
    let mut parts = value.splitn(2, '.');
    let main = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();
    !(main.is_empty() && fraction.is_empty())
        && main.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

/// Normalize the value of a measure AI such as `310` (net weight in kg).
///
/// A three digit AI gets a fourth digit counting the implied decimals, and
/// the value becomes six digits without a decimal point:
///
/// ```rust
/// # use gs1_code128::scale_decimal;
/// let mut warnings = Vec::new();
/// let scaled = scale_decimal("310", "6.12345", &mut warnings);
/// assert_eq!(scaled, ("3105".to_string(), "612345".to_string()));
/// assert!(warnings.is_empty());
/// ```
pub fn scale_decimal(ai: &str, value: &str, warnings: &mut Vec<Warning>) -> (String, String) {
    let unchanged = || (ai.to_string(), value.to_string());
    if !ai.get(..3).is_some_and(is_decimal_prefix) {
        return unchanged();
    }
    if ai.len() > 4 {
        warn(warnings, ai, value, WarningKind::AiTooLong);
        return unchanged();
    }
    if !is_number(value) {
        warn(warnings, ai, value, WarningKind::NotNumeric);
        let ai = if ai.len() == 3 { format!("{ai}0") } else { ai.into() };
        return (ai, value.into());
    }
    if ai.len() == 4 {
        // the decimals are given, the value must already fit
        if value.len() != DECIMAL_DIGITS {
            let kind = WarningKind::FixedLength {
                expected: DECIMAL_DIGITS,
                found: value.len(),
            };
            warn(warnings, ai, value, kind);
        }
        return unchanged();
    }

    let truncated = WarningKind::Truncated { found: value.len() };
    let Some((main, fraction)) = value.split_once('.') else {
        if value.len() > DECIMAL_DIGITS {
            warn(warnings, ai, value, truncated);
        }
        let padded = format!("{value:0>width$}", width = DECIMAL_DIGITS);
        return (format!("{ai}0"), padded[..DECIMAL_DIGITS].into());
    };

    let fraction = if value.len() <= DECIMAL_DIGITS + 1 {
        let mut fraction = fraction.to_string();
        while main.len() + fraction.len() < DECIMAL_DIGITS {
            fraction.push('0');
        }
        fraction
    } else if main.len() > DECIMAL_DIGITS {
        warn(warnings, ai, value, truncated);
        return (format!("{ai}0"), main[..DECIMAL_DIGITS].into());
    } else {
        warn(warnings, ai, value, truncated);
        fraction[..DECIMAL_DIGITS - main.len()].to_string()
    };
    (format!("{ai}{}", fraction.len()), format!("{main}{fraction}"))
}

/// Unresolved AIs are used as given, so they should at least be numeric.
fn check_code(ai: &str, value: &str, warnings: &mut Vec<Warning>) {
    let numeric = !ai.is_empty() && ai.bytes().all(|b| b.is_ascii_digit());
    let kind = if !numeric || ai.len() < 2 {
        WarningKind::UnknownAi
    } else if ai.len() > 4 && !ai.get(..3).is_some_and(is_decimal_prefix) {
        // measure AIs report this while scaling
        WarningKind::AiTooLong
    } else {
        return;
    };
    warn(warnings, ai, value, kind);
}

/// Normalize one AI and its value.
///
/// Names are resolved to codes, fixed length values are checked and
/// measure values are scaled with [`scale_decimal`].
pub fn normalize_pair(ai: &str, value: &str, warnings: &mut Vec<Warning>) -> (String, String) {
    let ai = match resolve_name(ai) {
        Some(code) => code,
        None => {
            check_code(ai, value, warnings);
            ai
        }
    };
    if let Some(expected) = AiInfo::of(ai).fixed_length {
        let found = value.chars().count();
        if found != expected {
            warn(warnings, ai, value, WarningKind::FixedLength { expected, found });
        }
        return (ai.into(), value.into());
    }
    scale_decimal(ai, value, warnings)
}

/// Normalized AIs with their values, ready to be encoded.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Gs1Message {
    pairs: Vec<(String, String)>,
    warnings: Vec<Warning>,
}

impl Gs1Message {
    /// Normalize AI/value pairs. AIs may be codes or names.
    pub fn from_pairs<I, A, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, V)>,
        A: AsRef<str>,
        V: AsRef<str>,
    {
        let mut warnings = Vec::new();
        let pairs = pairs
            .into_iter()
            .map(|(ai, value)| normalize_pair(ai.as_ref(), value.as_ref(), &mut warnings))
            .collect();
        Self { pairs, warnings }
    }

    /// Parse and normalize bracket notation, `None` if it is malformed.
    pub fn from_brackets(code: &str) -> Option<Self> {
        ai_values_from_brackets(code).map(Self::from_pairs)
    }

    /// The normalized AI/value pairs in input order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Problems found during normalization.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    fn ordered(&self, sorted: bool) -> Vec<(&str, &str, bool)> {
        let mut pairs: Vec<_> = self
            .pairs
            .iter()
            .map(|(ai, value)| (ai.as_str(), value.as_str(), AiInfo::of(ai).separator))
            .collect();
        if sorted {
            pairs.sort_by_key(|&(_, _, separator)| separator);
        }
        pairs
    }

    /// The logical text for the encoder.
    ///
    /// It starts with [`FNC1`], and FNC1 also separates a variable length
    /// value from the next AI. If `sorted`, fixed length AIs are moved to
    /// the front so fewer separators are needed.
    pub fn create_code(&self, sorted: bool) -> String {
        let mut code = String::new();
        code.push(FNC1);
        let mut trailing = false;
        for (ai, value, separator) in self.ordered(sorted) {
            code.push_str(ai);
            code.push_str(value);
            if separator {
                code.push(FNC1);
            }
            trailing = separator;
        }
        if trailing {
            code.pop();
        }
        code
    }

    /// The human readable text, `(AI)value` for every pair, in the same order
    /// as [`create_code`](Self::create_code).
    pub fn hri_text(&self, sorted: bool) -> String {
        self.ordered(sorted)
            .into_iter()
            .map(|(ai, value, _)| format!("({ai}){value}"))
            .collect()
    }
}

/// A GS1-128 of arbitrary data.
///
/// The data is prefixed with [`FNC1`], nothing else is checked.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Gs1128 {
    code: String,
}

impl Gs1128 {
    /// Prefix the code with [`FNC1`].
    pub fn new(code: &str) -> Self {
        let mut prefixed = String::with_capacity(code.len() + FNC1.len_utf8());
        prefixed.push(FNC1);
        prefixed.push_str(code);
        Self { code: prefixed }
    }

    /// The logical text including the leading [`FNC1`].
    pub fn logical_string(&self) -> &str {
        &self.code
    }

    /// The code as given, without [`FNC1`].
    pub fn fullcode(&self) -> &str {
        &self.code[FNC1.len_utf8()..]
    }

    /// Encode as Code 128.
    pub fn encode(&self) -> Result<Code128, EncodingError> {
        Code128::encode(&self.code)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
enum Content {
    Ais(Gs1Message),
    /// Malformed bracket notation, encoded as is.
    Literal(String),
}

/// A GS1-128 built from application identifiers.
///
/// The logical text is derived anew on every call, so changing the
/// ordering with [`set_sorted`](Self::set_sorted) affects the next encoding.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Gs1128Ai {
    content: Content,
    sorted: bool,
}

impl Gs1128Ai {
    /// Parse bracket notation like `(01)08720299927469(11)240621`.
    ///
    /// If the brackets are malformed the code is encoded literally, without
    /// any AI handling.
    pub fn from_brackets(code: &str) -> Self {
        let content = match Gs1Message::from_brackets(code) {
            Some(message) => Content::Ais(message),
            None => {
                log::debug!("malformed AI brackets, encoding {code:?} literally");
                Content::Literal(code.into())
            }
        };
        Self {
            content,
            sorted: true,
        }
    }

    /// Build from AI/value pairs. AIs may be codes or names like `"GTIN"`.
    pub fn from_pairs<I, A, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, V)>,
        A: AsRef<str>,
        V: AsRef<str>,
    {
        Self {
            content: Content::Ais(Gs1Message::from_pairs(pairs)),
            sorted: true,
        }
    }

    /// Whether fixed length AIs are moved to the front. Enabled by default.
    pub fn sorted(self, sorted: bool) -> Self {
        Self { sorted, ..self }
    }

    /// See [`sorted`](Self::sorted).
    pub fn set_sorted(&mut self, sorted: bool) {
        self.sorted = sorted;
    }

    /// The normalized AIs, `None` for a literal code.
    pub fn message(&self) -> Option<&Gs1Message> {
        match &self.content {
            Content::Ais(message) => Some(message),
            Content::Literal(_) => None,
        }
    }

    /// Problems found during normalization.
    pub fn warnings(&self) -> &[Warning] {
        match self.message() {
            Some(message) => message.warnings(),
            None => &[],
        }
    }

    /// The logical text for the encoder, starting with [`FNC1`].
    pub fn logical_string(&self) -> String {
        match &self.content {
            Content::Ais(message) => message.create_code(self.sorted),
            Content::Literal(code) => Gs1128::new(code).code,
        }
    }

    /// The human readable text with AIs in brackets.
    pub fn fullcode(&self) -> String {
        match &self.content {
            Content::Ais(message) => message.hri_text(self.sorted),
            Content::Literal(code) => code.clone(),
        }
    }

    /// Encode as Code 128.
    ///
    /// The initial charset is guessed without the leading [`FNC1`], so pure
    /// digit data starts in charset C.
    pub fn encode(&self) -> Result<Code128, EncodingError> {
        let code = self.logical_string();
        let start = Charset::guess(&code[FNC1.len_utf8()..]);
        Code128Builder::default().with_start(start).encode(&code)
    }
}

#[cfg(test)]
use crate::std::vec;

#[cfg(test)]
const EXAMPLE: &str = "(01)08720299927469(11)240621(17)250621(10)20240621/0001";

#[cfg(test)]
fn scaled(ai: &str, value: &str) -> (String, String) {
    scale_decimal(ai, value, &mut Vec::new())
}

#[cfg(test)]
fn pair(ai: &str, value: &str) -> (String, String) {
    (ai.into(), value.into())
}

#[test]
fn test_ai_values_from_brackets() {
    assert_eq!(
        ai_values_from_brackets(EXAMPLE),
        Some(vec![
            ("01", "08720299927469"),
            ("11", "240621"),
            ("17", "250621"),
            ("10", "20240621/0001"),
        ])
    );
    assert_eq!(ai_values_from_brackets("01)123(11"), None);
    assert_eq!(ai_values_from_brackets("x(01)123"), None);
    assert_eq!(ai_values_from_brackets(""), None);
}

#[test]
fn test_is_well_formed() {
    assert!(is_well_formed(EXAMPLE));
    assert!(!is_well_formed(&format!("({EXAMPLE}")));
}

#[test]
fn test_scale_decimal() {
    assert_eq!(scaled("310", "123456"), pair("3100", "123456"));
    assert_eq!(scaled("310", "23456"), pair("3100", "023456"));
    assert_eq!(scaled("310", "6"), pair("3100", "000006"));
    assert_eq!(scaled("310", "6a"), pair("3100", "6a"));
    assert_eq!(scaled("310", "6.12345"), pair("3105", "612345"));
    assert_eq!(scaled("310", "6.1234"), pair("3105", "612340"));
    assert_eq!(scaled("310", "6123456.7"), pair("3100", "612345"));
    assert_eq!(scaled("310", "6.1234567"), pair("3105", "612345"));
    assert_eq!(scaled("320", "123.4"), pair("3203", "123400"));
    assert_eq!(scaled("330", "123456."), pair("3300", "123456"));
    assert_eq!(scaled("310", ".5"), pair("3106", "500000"));
    assert_eq!(scaled("3102", "001250"), pair("3102", "001250"));
    assert_eq!(scaled("01", "6.5"), pair("01", "6.5"));
}

#[test]
fn test_scale_decimal_warnings() {
    let mut warnings = Vec::new();
    scale_decimal("310", "6a", &mut warnings);
    scale_decimal("310", "1234567", &mut warnings);
    scale_decimal("31030", "5", &mut warnings);
    scale_decimal("3102", "125", &mut warnings);
    scale_decimal("310", "6.12345", &mut warnings);
    let kinds: Vec<_> = warnings.iter().map(|w| w.kind).collect();
    assert_eq!(
        kinds,
        vec![
            WarningKind::NotNumeric,
            WarningKind::Truncated { found: 7 },
            WarningKind::AiTooLong,
            WarningKind::FixedLength {
                expected: 6,
                found: 3
            },
        ]
    );
    assert_eq!(warnings[0].ai, "310");
    assert_eq!(warnings[0].value, "6a");
}

#[test]
fn test_normalize_pair() {
    let mut warnings = Vec::new();
    assert_eq!(
        normalize_pair("GTIN", "08720299927469", &mut warnings),
        pair("01", "08720299927469")
    );
    assert_eq!(
        normalize_pair("NET_WEIGHT_KG", "1.5", &mut warnings),
        pair("3105", "150000")
    );
    assert_eq!(normalize_pair("21", "xyz", &mut warnings), pair("21", "xyz"));
    assert!(warnings.is_empty());

    assert_eq!(normalize_pair("01", "123", &mut warnings), pair("01", "123"));
    assert_eq!(
        normalize_pair("PROD_DATE", "20240621", &mut warnings),
        pair("11", "20240621")
    );
    assert_eq!(
        warnings[0].kind,
        WarningKind::FixedLength {
            expected: 14,
            found: 3
        }
    );
    assert_eq!(warnings[1].ai, "11");
    assert!(warnings[1].to_string().contains("YYMMDD"));
    assert!(warnings[0].to_string().contains("14 characters"));
}

#[test]
fn test_normalize_pair_aliases() {
    let mut warnings = Vec::new();
    assert_eq!(
        normalize_pair("NET_WEIGHT_M", "1.5", &mut warnings),
        pair("3105", "150000")
    );
    assert_eq!(
        normalize_pair("BEST_BEFORE:", "240621", &mut warnings),
        pair("15", "240621")
    );
    assert!(warnings.is_empty());
}

#[test]
fn test_normalize_pair_unknown_ai() {
    let mut warnings = Vec::new();
    assert_eq!(
        normalize_pair("NET_WEIGHT_X", "1.5", &mut warnings),
        pair("NET_WEIGHT_X", "1.5")
    );
    assert_eq!(normalize_pair("1", "x", &mut warnings), pair("1", "x"));
    assert_eq!(normalize_pair("12345", "x", &mut warnings), pair("12345", "x"));
    // reported once, by the scaling
    normalize_pair("31030", "5", &mut warnings);
    let kinds: Vec<_> = warnings.iter().map(|w| w.kind).collect();
    assert_eq!(
        kinds,
        vec![
            WarningKind::UnknownAi,
            WarningKind::UnknownAi,
            WarningKind::AiTooLong,
            WarningKind::AiTooLong,
        ]
    );
    assert_eq!(warnings[0].ai, "NET_WEIGHT_X");
    assert!(warnings[0].to_string().contains("known name"));

    let code = Gs1128Ai::from_pairs([("NET_WEIGHT_X", "1.5"), ("GTIN", "08720299927469")]);
    assert_eq!(code.warnings().len(), 1);
    assert_eq!(code.warnings()[0].kind, WarningKind::UnknownAi);
    assert!(code.encode().is_ok());
}

#[test]
fn test_create_code_sorted() {
    let message = Gs1Message::from_brackets(EXAMPLE).unwrap();
    assert_eq!(
        message.create_code(true),
        "\u{f1}010872029992746911240621172506211020240621/0001"
    );

    let message = Gs1Message::from_brackets(&format!("{EXAMPLE}(21)xyz")).unwrap();
    assert_eq!(
        message.create_code(true),
        "\u{f1}010872029992746911240621172506211020240621/0001\u{f1}21xyz"
    );
}

#[test]
fn test_create_code_moves_variable_fields_last() {
    let message = Gs1Message::from_pairs([
        ("10", "ABC"),
        ("01", "08720299927469"),
        ("21", "xyz"),
        ("17", "250621"),
    ]);
    assert_eq!(
        message.create_code(true),
        "\u{f1}01087202999274691725062110ABC\u{f1}21xyz"
    );
    assert_eq!(
        message.create_code(false),
        "\u{f1}10ABC\u{f1}010872029992746921xyz\u{f1}17250621"
    );

    // no trailing separator without sorting either
    let message = Gs1Message::from_pairs([("01", "08720299927469"), ("10", "ABC")]);
    assert_eq!(message.create_code(false), "\u{f1}010872029992746910ABC");
    let message = Gs1Message::from_pairs([("10", "ABC"), ("21", "xyz")]);
    assert_eq!(message.create_code(false), "\u{f1}10ABC\u{f1}21xyz");
}

#[test]
fn test_create_code_no_separator_before_last_variable_field() {
    let message = Gs1Message::from_pairs([
        ("01", "08720299927469"),
        ("11", "240621"),
        ("17", "250621"),
        ("21", "xyz"),
    ]);
    let code = message.create_code(true);
    assert_eq!(code, "\u{f1}0108720299927469112406211725062121xyz");
    assert_eq!(code.matches(FNC1).count(), 1);
    assert!(code.starts_with(FNC1));
    assert_eq!(Gs1Message::default().create_code(true), "\u{f1}");
}

#[test]
fn test_hri_text() {
    let message = Gs1Message::from_pairs([("10", "ABC"), ("01", "08720299927469")]);
    assert_eq!(message.hri_text(true), "(01)08720299927469(10)ABC");
    assert_eq!(message.hri_text(false), "(10)ABC(01)08720299927469");
}

#[test]
fn test_gs1_128() {
    let code = Gs1128::new("0123");
    assert_eq!(code.fullcode(), "0123");
    assert_eq!(code.logical_string(), "\u{f1}0123");
    assert_eq!(
        code.encode().unwrap().symbols(),
        &[104, 102, 99, 1, 23, 87, 106]
    );
}

#[test]
fn test_gs1_128_ai_sorting_is_not_cached() {
    let mut code = Gs1128Ai::from_pairs([("10", "ABC"), ("01", "08720299927469")]);
    let sorted = code.encode().unwrap();
    assert_eq!(
        crate::decode_symbols(sorted.symbols()).unwrap(),
        code.logical_string()
    );

    code.set_sorted(false);
    assert_eq!(code.logical_string(), "\u{f1}10ABC\u{f1}0108720299927469");
    assert_eq!(code.fullcode(), "(10)ABC(01)08720299927469");
    let unsorted = code.encode().unwrap();
    assert_ne!(sorted, unsorted);
    assert_eq!(
        crate::decode_symbols(unsorted.symbols()).unwrap(),
        code.logical_string()
    );
}

#[test]
fn test_gs1_128_ai_literal() {
    let code = Gs1128Ai::from_brackets("((01)123");
    assert_eq!(code.message(), None);
    assert_eq!(code.logical_string(), "\u{f1}((01)123");
    assert_eq!(code.fullcode(), "((01)123");
    assert!(code.warnings().is_empty());
    assert!(code.encode().is_ok());
}

#[test]
fn test_gs1_128_ai_warnings() {
    let code = Gs1128Ai::from_pairs([("GTIN", "123"), ("NET_WEIGHT_KG", "abc")]);
    assert_eq!(code.warnings().len(), 2);
    assert_eq!(code.logical_string(), "\u{f1}011233100abc");
    assert!(code.sorted(false).encode().is_ok());
}

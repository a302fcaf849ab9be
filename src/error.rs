use crate::std::string::String;

#[cfg(feature = "std")]
use thiserror::Error;

/// Errors that can occur during encoding.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum EncodingError {
    /// The text contains characters the symbology can not represent.
    #[cfg_attr(
        feature = "std",
        error("the following characters are not valid for {symbology}: {chars}")
    )]
    IllegalCharacter {
        /// Name of the symbology.
        symbology: &'static str,
        /// The offending characters, in order of appearance.
        chars: String,
    },
    /// A fixed size number has the wrong count of digits.
    #[cfg_attr(feature = "std", error("expected {expected} digits, not {found}"))]
    NumberOfDigits {
        /// Required count.
        expected: usize,
        /// Count after truncation.
        found: usize,
    },
    /// The computed check value can not be represented.
    #[cfg_attr(feature = "std", error("check value {0} can not be encoded"))]
    ChecksumDomain(u8),
}

pub(crate) fn check_chars(
    text: &str,
    symbology: &'static str,
    allowed: impl Fn(char) -> bool,
) -> Result<(), EncodingError> {
    let chars: String = text.chars().filter(|&c| !allowed(c)).collect();
    if chars.is_empty() {
        Ok(())
    } else {
        Err(EncodingError::IllegalCharacter { symbology, chars })
    }
}

#[test]
fn test_check_chars() {
    assert_eq!(check_chars("ABC", "test", |c| c.is_ascii_uppercase()), Ok(()));
    assert_eq!(
        check_chars("AbCd", "test", |c| c.is_ascii_uppercase()),
        Err(EncodingError::IllegalCharacter {
            symbology: "test",
            chars: "bd".into(),
        })
    );
}

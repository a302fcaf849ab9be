use crate::std::string::{String, ToString};
use crate::std::vec::Vec;

use crate::{Code128, Code39, EncodingError, Gs1128, Gs1128Ai, Pzn};

/// What every supported barcode can do.
pub trait Symbology {
    /// Name of the symbology.
    const NAME: &'static str;

    /// The symbol values to render, start and stop included.
    fn build(&self) -> Result<Vec<u8>, EncodingError>;

    /// The text printed along with the code.
    fn fullcode(&self) -> String;

    /// The check value as a symbol value, or a digit for [`Pzn`].
    fn checksum(&self) -> Result<u8, EncodingError>;
}

/// Plain text to be encoded as Code 128.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Code128Text(pub String);

impl Symbology for Code128Text {
    const NAME: &'static str = crate::NAME;

    fn build(&self) -> Result<Vec<u8>, EncodingError> {
        Ok(Code128::encode(&self.0)?.symbols().to_vec())
    }

    fn fullcode(&self) -> String {
        self.0.clone()
    }

    fn checksum(&self) -> Result<u8, EncodingError> {
        Ok(Code128::encode(&self.0)?.checksum())
    }
}

impl Symbology for Gs1128 {
    const NAME: &'static str = "GS1-128";

    fn build(&self) -> Result<Vec<u8>, EncodingError> {
        Ok(self.encode()?.symbols().to_vec())
    }

    fn fullcode(&self) -> String {
        Gs1128::fullcode(self).to_string()
    }

    fn checksum(&self) -> Result<u8, EncodingError> {
        Ok(self.encode()?.checksum())
    }
}

impl Symbology for Gs1128Ai {
    const NAME: &'static str = "GS1-128 AI";

    fn build(&self) -> Result<Vec<u8>, EncodingError> {
        Ok(self.encode()?.symbols().to_vec())
    }

    fn fullcode(&self) -> String {
        Gs1128Ai::fullcode(self)
    }

    fn checksum(&self) -> Result<u8, EncodingError> {
        Ok(self.encode()?.checksum())
    }
}

impl Symbology for Code39 {
    const NAME: &'static str = Code39::NAME;

    fn build(&self) -> Result<Vec<u8>, EncodingError> {
        Ok(self.symbols())
    }

    fn fullcode(&self) -> String {
        Code39::fullcode(self).to_string()
    }

    fn checksum(&self) -> Result<u8, EncodingError> {
        Ok(Code39::checksum(self))
    }
}

impl Symbology for Pzn {
    const NAME: &'static str = Pzn::NAME;

    fn build(&self) -> Result<Vec<u8>, EncodingError> {
        Ok(self.code39().symbols())
    }

    fn fullcode(&self) -> String {
        Pzn::fullcode(self)
    }

    fn checksum(&self) -> Result<u8, EncodingError> {
        Ok(Pzn::checksum(self))
    }
}

/// Any of the supported barcodes.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Barcode {
    /// Code 39.
    Code39(Code39),
    /// PZN as Code 39.
    Pzn(Pzn),
    /// Code 128.
    Code128(Code128Text),
    /// GS1-128 of arbitrary data.
    Gs1128(Gs1128),
    /// GS1-128 from application identifiers.
    Gs1128Ai(Gs1128Ai),
}

macro_rules! dispatch {
    ($self:ident, $code:ident => $expr:expr) => {
        match $self {
            Barcode::Code39($code) => $expr,
            Barcode::Pzn($code) => $expr,
            Barcode::Code128($code) => $expr,
            Barcode::Gs1128($code) => $expr,
            Barcode::Gs1128Ai($code) => $expr,
        }
    };
}

impl Barcode {
    /// Name of the symbology.
    pub fn name(&self) -> &'static str {
        match self {
            Barcode::Code39(_) => Code39::NAME,
            Barcode::Pzn(_) => Pzn::NAME,
            Barcode::Code128(_) => <Code128Text as Symbology>::NAME,
            Barcode::Gs1128(_) => <Gs1128 as Symbology>::NAME,
            Barcode::Gs1128Ai(_) => <Gs1128Ai as Symbology>::NAME,
        }
    }

    /// See [`Symbology::build`].
    pub fn build(&self) -> Result<Vec<u8>, EncodingError> {
        dispatch!(self, code => Symbology::build(code))
    }

    /// See [`Symbology::fullcode`].
    pub fn fullcode(&self) -> String {
        dispatch!(self, code => Symbology::fullcode(code))
    }

    /// See [`Symbology::checksum`].
    pub fn checksum(&self) -> Result<u8, EncodingError> {
        dispatch!(self, code => Symbology::checksum(code))
    }
}

macro_rules! impl_from {
    ($($variant:ident($ty:ty)),*) => {
        $(
            impl From<$ty> for Barcode {
                fn from(code: $ty) -> Self {
                    Barcode::$variant(code)
                }
            }
        )*
    };
}

impl_from!(
    Code39(Code39),
    Pzn(Pzn),
    Code128(Code128Text),
    Gs1128(Gs1128),
    Gs1128Ai(Gs1128Ai)
);

#[cfg(test)]
use crate::PznKind;

#[test]
fn test_barcode_dispatch() {
    let codes: Vec<Barcode> = crate::std::vec![
        Code39::new("CODE39", true).unwrap().into(),
        Pzn::new("490880", PznKind::Pzn7).unwrap().into(),
        Code128Text("AB".into()).into(),
        Gs1128::new("0123").into(),
        Gs1128Ai::from_brackets("(01)08720299927469(10)ABC").into(),
    ];
    let fullcodes: Vec<String> = codes.iter().map(Barcode::fullcode).collect();
    assert_eq!(
        fullcodes,
        [
            "CODE39W",
            "PZN-4908802",
            "AB",
            "0123",
            "(01)08720299927469(10)ABC"
        ]
    );
    let checksums: Vec<u8> = codes.iter().map(|c| c.checksum().unwrap()).collect();
    assert_eq!(checksums[..4], [32, 2, 102, 87]);
    for code in &codes {
        let symbols = code.build().unwrap();
        assert!(symbols.len() >= 3);
    }
    assert_eq!(codes[1].name(), "Pharmazentralnummer");
    assert_eq!(codes[4].name(), "GS1-128 AI");
}

#[test]
fn test_build_propagates_errors() {
    let code = Barcode::from(Code128Text("Füße".into()));
    assert!(matches!(
        code.build(),
        Err(EncodingError::IllegalCharacter { .. })
    ));
}

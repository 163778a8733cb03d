use std::{fmt::Display, io::Read, sync::Arc};

use ::base64::{engine::general_purpose, Engine as _};
use data_encoding::{BASE32HEX_NOPAD, BASE32_NOPAD};

use super::{
    generator::{DynGenerator, Generator},
    PasswordError,
};

/// Text encodings of random bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    HexLower,
    HexUpper,
    /// RFC 4648 base32, no padding.
    Base32,
    /// RFC 4648 base32 with the extended hex alphabet, no padding.
    Base32Hex,
    /// RFC 4648 base64, no padding.
    Base64,
    /// RFC 4648 base64 with the URL and filename safe alphabet, no padding.
    Base64Url,
    /// Adobe/btoa ascii85, without the `<~ ~>` delimiters.
    Ascii85,
}

impl Encoding {
    #[must_use]
    pub fn encode(self, data: &[u8]) -> String {
        match self {
            Self::HexLower => hex::encode(data),
            Self::HexUpper => hex::encode_upper(data),
            Self::Base32 => BASE32_NOPAD.encode(data),
            Self::Base32Hex => BASE32HEX_NOPAD.encode(data),
            Self::Base64 => general_purpose::STANDARD_NO_PAD.encode(data),
            Self::Base64Url => general_purpose::URL_SAFE_NO_PAD.encode(data),
            Self::Ascii85 => ascii85_encode(data),
        }
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::HexLower => "hex",
            Self::HexUpper => "HEX",
            Self::Base32 => "base32",
            Self::Base32Hex => "base32hex",
            Self::Base64 => "base64",
            Self::Base64Url => "base64url",
            Self::Ascii85 => "ascii85",
        };
        write!(f, "{name}")
    }
}

/// Reads `count` random bytes and encodes them.
#[derive(Debug, Clone, Copy)]
pub struct Encoded {
    encoding: Encoding,
    count: usize,
}

impl Generator for Encoded {
    fn password(&self, rng: &mut dyn Read) -> Result<String, PasswordError> {
        if self.count == 0 {
            return Ok(String::new());
        }
        let mut bytes = vec![0_u8; self.count];
        rng.read_exact(&mut bytes)?;
        Ok(self.encoding.encode(&bytes))
    }
}

/// Returns a generator encoding `count` random bytes with `encoding`.
#[must_use]
pub fn encoded(encoding: Encoding, count: usize) -> DynGenerator {
    Arc::new(Encoded { encoding, count })
}

macro_rules! define_encoding_generators {
    ($($name:ident => $encoding:ident),+) => {
        $(
            #[doc = concat!("Encodes `count` random bytes with [`Encoding::", stringify!($encoding), "`].")]
            #[must_use] pub fn $name(count: usize) -> DynGenerator {
                encoded(Encoding::$encoding, count)
            }
        )+
    }
}

define_encoding_generators! {
    hex_lower => HexLower,
    hex_upper => HexUpper,
    base32 => Base32,
    base32_hex => Base32Hex,
    base64 => Base64,
    base64_url => Base64Url,
    ascii85 => Ascii85
}

/// Strips the `<~ ~>` frame added by the encoder.
fn ascii85_encode(data: &[u8]) -> String {
    let framed = ascii85::encode(data);
    framed
        .strip_prefix("<~")
        .and_then(|s| s.strip_suffix("~>"))
        .unwrap_or(&framed)
        .to_owned()
}

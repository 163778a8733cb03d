use std::{fmt::Display, io::Read, sync::Arc};

use itertools::Itertools;

use super::{
    generator::{DynGenerator, Generator},
    sampler::{read_slice_n, N_MAX},
    PasswordError,
};

/// The `Charset` structure holds the characters a password may be drawn
/// from, in the order given by the caller.
///
/// A charset contains at least 2 distinct characters. The order matters: a
/// given byte stream always selects the same positions.
///
/// Pre-defined charsets are available:
///  - `Charset::digits()`
///  - `Charset::latin_lower()`
///  - `Charset::latin_upper()`
///  - `Charset::latin_mixed()`
///  - `Charset::latin_lower_digit()`
///  - `Charset::latin_upper_digit()`
///  - `Charset::latin_mixed_digit()`
///  - `Charset::ascii_graphic()`
///  - `Charset::hex_lower()`
///  - `Charset::hex_upper()`
///
/// To build your own, use `Charset::try_from("0123456789abcdef")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    chars: Arc<[char]>,
}

impl TryFrom<&str> for Charset {
    type Error = PasswordError;

    /// Tries to create a `Charset` from a string slice of characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the string holds less than 2 characters, more
    /// than `N_MAX` characters, or the same character twice.
    fn try_from(template: &str) -> Result<Self, Self::Error> {
        let chars = template.chars().collect_vec();
        if chars.len() < 2 {
            return Err(PasswordError::InvalidCharset(format!(
                "a charset must contain at least 2 characters, got {}",
                chars.len()
            )));
        }
        if chars.len() > N_MAX as usize {
            return Err(PasswordError::InvalidCharset(format!(
                "a charset must contain at most {N_MAX} characters, got {}",
                chars.len()
            )));
        }
        if let Some(c) = chars.iter().duplicates().next() {
            return Err(PasswordError::InvalidCharset(format!(
                "duplicate character {c:?} in charset"
            )));
        }
        Ok(Self {
            chars: chars.into(),
        })
    }
}

impl TryFrom<&String> for Charset {
    type Error = PasswordError;

    fn try_from(value: &String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl TryFrom<&[u8]> for Charset {
    type Error = PasswordError;

    /// Tries to create a `Charset` from UTF-8 bytes.
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let template = std::str::from_utf8(value)
            .map_err(|e| PasswordError::InvalidCharset(format!("invalid UTF-8 in charset: {e}")))?;
        Self::try_from(template)
    }
}

impl Charset {
    /// Returns the number of characters in the charset.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always `false`: a charset holds at least 2 characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Returns a generator drawing `count` characters from this charset.
    ///
    /// # Panics
    ///
    /// Panics if `count` is 0.
    #[must_use]
    pub fn generator(&self, count: usize) -> DynGenerator {
        assert!(count > 0, "count must be positive");
        Arc::new(CharsetGenerator {
            charset: self.clone(),
            count,
        })
    }
}

impl Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}", self.chars.iter().collect::<String>()))
    }
}

/// Draws a fixed number of characters from a [`Charset`].
#[derive(Debug, Clone)]
pub struct CharsetGenerator {
    charset: Charset,
    count: usize,
}

impl Generator for CharsetGenerator {
    fn password(&self, rng: &mut dyn Read) -> Result<String, PasswordError> {
        let mut out = String::with_capacity(self.count * 4);
        for _ in 0..self.count {
            out.push(*read_slice_n(rng, &self.charset.chars)?);
        }
        Ok(out)
    }
}

/// Validates `template` and returns a generator drawing `count` of its
/// characters.
///
/// # Errors
///
/// See [`Charset::try_from`].
///
/// # Panics
///
/// Panics if `count` is 0.
pub fn charset(template: &str, count: usize) -> Result<DynGenerator, PasswordError> {
    Ok(Charset::try_from(template)?.generator(count))
}

// Use a macro to define functions with similar functionality but different
// names
macro_rules! define_charset_constructors {
    ($($name:ident => $charset:expr),+) => {
        $(
            impl Charset {
                #[doc = "Creates a Charset with the given characters: `"]
                #[doc = $charset]
                #[doc = "`."]
                #[must_use] pub fn $name() -> Charset {
                    Charset::try_from($charset).expect("pre-defined charsets are valid")
                }
            }
        )+
    }
}

define_charset_constructors! {
    digits => "0123456789",
    latin_lower => "abcdefghijklmnopqrstuvwxyz",
    latin_upper => "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    latin_mixed => "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz",
    latin_lower_digit => "abcdefghijklmnopqrstuvwxyz0123456789",
    latin_upper_digit => "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789",
    latin_mixed_digit => "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789",
    ascii_graphic => "!\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~",
    hex_lower => "0123456789abcdef",
    hex_upper => "0123456789ABCDEF"
}

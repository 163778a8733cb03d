use std::io::Read;

use itertools::Itertools;

use super::{
    generator::Generator,
    sampler::{read_int_n, N_MAX},
    PasswordError,
};
use crate::pw_ensure;

const VOWELS_UPPER: &str = "AEIOU";
const CONSONANTS_UPPER: &str = "BCDFGHJKLMNPQRSTVWXYZ";
const VOWELS_LOWER: &str = "aeiou";
const CONSONANTS_LOWER: &str = "bcdfghjklmnpqrstvwxyz";
const LETTERS_UPPER: &str = "AEIOUBCDFGHJKLMNPQRSTVWXYZ";
const LETTERS: &str = "AEIOUaeiouBCDFGHJKLMNPQRSTVWXYZbcdfghjklmnpqrstvwxyz";
const NUMBERS: &str = "0123456789";
const OTHERS: &str = "@&%?,=[]_:-+*$#!'^~;()/.";
const EVERYTHING: &str =
    "AEIOUaeiouBCDFGHJKLMNPQRSTVWXYZbcdfghjklmnpqrstvwxyz0123456789!@#$%^&*()";

/// Characters a template class letter stands for.
///
/// The order of the characters is part of the output format: a given byte
/// stream selects the same position in every version of the table.
#[must_use]
pub fn class_characters(class: u8) -> Option<&'static [u8]> {
    let characters = match class {
        b'V' => VOWELS_UPPER,
        b'C' => CONSONANTS_UPPER,
        b'v' => VOWELS_LOWER,
        b'c' => CONSONANTS_LOWER,
        b'A' => LETTERS_UPPER,
        b'a' => LETTERS,
        b'n' => NUMBERS,
        b'o' => OTHERS,
        b'x' => EVERYTHING,
        b' ' => " ",
        _ => return None,
    };
    Some(characters.as_bytes())
}

/// Spectre (Master Password) style templates.
///
/// A template is a list of alternatives separated by `:`, each alternative
/// being a string of class letters (see [`class_characters`]). Each call
/// picks one alternative uniformly, then one character uniformly per class
/// letter. Unlike the reference algorithm, every choice is drawn without
/// modulo bias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectreTemplate {
    templates: Vec<Vec<u8>>,
}

impl SpectreTemplate {
    /// Parses `"CvcnoCvc:CvcCvcno"`-like templates.
    ///
    /// # Errors
    ///
    /// Fails on an empty template, an empty alternative or an unknown class
    /// letter.
    pub fn new(templates: &str) -> Result<Self, PasswordError> {
        if templates.is_empty() {
            return Err(PasswordError::InvalidTemplate(
                "a Spectre template cannot be empty".to_owned(),
            ));
        }
        let templates = templates
            .split(':')
            .map(|template| {
                if template.is_empty() {
                    return Err(PasswordError::InvalidTemplate(
                        "a Spectre template cannot hold an empty alternative".to_owned(),
                    ));
                }
                if let Some(c) = template
                    .chars()
                    .find(|c| !c.is_ascii() || class_characters(*c as u8).is_none())
                {
                    return Err(PasswordError::InvalidTemplate(format!(
                        "unknown class {c:?} in Spectre template {template:?}"
                    )));
                }
                Ok(template.as_bytes().to_vec())
            })
            .collect::<Result<Vec<_>, _>>()?;
        pw_ensure!(
            templates.len() <= N_MAX as usize,
            PasswordError::InvalidTemplate(format!(
                "a Spectre template holds at most {N_MAX} alternatives"
            ))
        );
        Ok(Self { templates })
    }

    /// The alternatives, as written.
    pub fn templates(&self) -> impl Iterator<Item = &str> {
        // alternatives only hold ASCII class letters
        self.templates
            .iter()
            .map(|t| std::str::from_utf8(t).unwrap_or_default())
    }
}

impl Generator for SpectreTemplate {
    fn password(&self, rng: &mut dyn Read) -> Result<String, PasswordError> {
        let i = read_int_n(rng, self.templates.len() as u32)?;
        let template = &self.templates[i as usize];
        let mut out = String::with_capacity(template.len());
        for &class in template {
            let characters = class_characters(class).ok_or_else(|| {
                PasswordError::InvalidTemplate(format!("unknown class {:?}", char::from(class)))
            })?;
            let j = read_int_n(rng, characters.len() as u32)?;
            out.push(char::from(characters[j as usize]));
        }
        Ok(out)
    }
}

// Use a macro to define the Master Password template sets
macro_rules! define_spectre_templates {
    ($($name:ident => [$($template:literal),+ $(,)?]),+ $(,)?) => {
        $(
            impl SpectreTemplate {
                #[doc = concat!("The `", stringify!($name), "` template set: `", $($template, " "),+, "`.")]
                #[must_use] pub fn $name() -> SpectreTemplate {
                    SpectreTemplate::new(&[$($template),+].iter().join(":"))
                        .expect("pre-defined templates are valid")
                }
            }
        )+
    }
}

define_spectre_templates! {
    maximum => ["anoxxxxxxxxxxxxxxxxx", "axxxxxxxxxxxxxxxxxno"],
    long => [
        "CvcvnoCvcvCvcv", "CvcvCvcvnoCvcv", "CvcvCvcvCvcvno",
        "CvccnoCvcvCvcv", "CvccCvcvnoCvcv", "CvccCvcvCvcvno",
        "CvcvnoCvccCvcv", "CvcvCvccnoCvcv", "CvcvCvccCvcvno",
        "CvcvnoCvcvCvcc", "CvcvCvcvnoCvcc", "CvcvCvcvCvccno",
        "CvccnoCvccCvcv", "CvccCvccnoCvcv", "CvccCvccCvcvno",
        "CvcvnoCvccCvcc", "CvcvCvccnoCvcc", "CvcvCvccCvccno",
        "CvccnoCvcvCvcc", "CvccCvcvnoCvcc", "CvccCvcvCvccno",
    ],
    medium => ["CvcnoCvc", "CvcCvcno"],
    short => ["Cvcn"],
    basic => ["aaanaaan", "aannaaan", "aaannaaa"],
    pin => ["nnnn"],
    name => ["cvccvcvcv"],
    phrase => ["cvcc cvc cvccvcv cvc", "cvc cvccvcvcv cvcv", "cv cvccv cvc cvcvccv"],
}

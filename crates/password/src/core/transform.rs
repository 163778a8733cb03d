use std::{io::Read, sync::Arc};

use unicode_segmentation::UnicodeSegmentation;

use super::{
    generator::{DynGenerator, Generator},
    PasswordError,
};

/// Post-processes the output of a generator.
pub struct Transform {
    generator: DynGenerator,
    f: Arc<dyn Fn(&str) -> String + Send + Sync>,
}

impl Generator for Transform {
    fn password(&self, rng: &mut dyn Read) -> Result<String, PasswordError> {
        let out = self.generator.password(rng)?;
        Ok((self.f)(&out))
    }
}

/// Applies `f` to every output of `generator`.
pub fn transform<F>(generator: DynGenerator, f: F) -> DynGenerator
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    Arc::new(Transform {
        generator,
        f: Arc::new(f),
    })
}

/// Full Unicode lower-casing of the output of `generator`.
pub fn lower_case(generator: DynGenerator) -> DynGenerator {
    transform(generator, str::to_lowercase)
}

/// Full Unicode upper-casing of the output of `generator`.
pub fn upper_case(generator: DynGenerator) -> DynGenerator {
    transform(generator, str::to_uppercase)
}

/// Title-cases the output of `generator` following the rules of the
/// language identified by the BCP 47 tag `language` (e.g. `"en"`,
/// `"tr-TR"`, `"nl"`).
pub fn title_case(generator: DynGenerator, language: &str) -> DynGenerator {
    let language = Language::from_tag(language);
    transform(generator, move |s| language.title(s))
}

/// Casing rules that differ from the root locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Root,
    /// Turkish and Azerbaijani: dotted and dotless i.
    Turkic,
    /// Dutch: the `ij` digraph is capitalized as a whole.
    Dutch,
}

impl Language {
    /// Selects the rules from the primary subtag of a BCP 47 tag. Unknown
    /// languages use the root rules.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "tr" | "az" => Self::Turkic,
            "nl" => Self::Dutch,
            _ => Self::Root,
        }
    }

    /// Upper-cases the first cased letter of each word and lower-cases the
    /// rest of it. Whatever precedes that letter is left unchanged.
    #[must_use]
    pub fn title(self, s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for word in s.split_word_bounds() {
            let (at, first) = match word.char_indices().find(|&(_, c)| is_cased(c)) {
                Some(found) => found,
                None => {
                    out.push_str(word);
                    continue;
                }
            };
            out.push_str(&word[..at]);
            let rest = &word[at + first.len_utf8()..];
            if self == Self::Dutch && matches!(first, 'i' | 'I') && rest.starts_with(['j', 'J']) {
                out.push_str("IJ");
                out.push_str(&self.lower(&rest[1..]));
            } else {
                self.push_title(&mut out, first);
                out.push_str(&self.lower(rest));
            }
        }
        out
    }

    fn push_title(self, out: &mut String, c: char) {
        match (self, c) {
            (Self::Turkic, 'i') => out.push('\u{130}'),
            (_, 'Ǆ' | 'ǅ' | 'ǆ') => out.push('ǅ'),
            (_, 'Ǉ' | 'ǈ' | 'ǉ') => out.push('ǈ'),
            (_, 'Ǌ' | 'ǋ' | 'ǌ') => out.push('ǋ'),
            (_, 'Ǳ' | 'ǲ' | 'ǳ') => out.push('ǲ'),
            _ => out.extend(c.to_uppercase()),
        }
    }

    fn lower(self, s: &str) -> String {
        match self {
            Self::Turkic => s
                .chars()
                .map(|c| match c {
                    'I' => "ı".to_owned(),
                    '\u{130}' => "i".to_owned(),
                    _ => c.to_lowercase().collect(),
                })
                .collect(),
            Self::Root | Self::Dutch => s.to_lowercase(),
        }
    }
}

fn is_cased(c: char) -> bool {
    c.is_lowercase() || c.is_uppercase() || matches!(c, 'ǅ' | 'ǈ' | 'ǋ' | 'ǲ')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_root() {
        let en = Language::from_tag("en-US");
        assert_eq!(en.title("hello WORLD"), "Hello World");
        assert_eq!(en.title("  élan-vital 42x"), "  Élan-Vital 42X");
        assert_eq!(en.title("3RD 1st_PLACE"), "3Rd 1St_place");
        assert_eq!(en.title("42 ??"), "42 ??");
        assert_eq!(en.title("ǆungla"), "ǅungla");
        assert_eq!(en.title(""), "");
    }

    #[test]
    fn test_title_turkic() {
        let tr = Language::from_tag("tr");
        assert_eq!(tr, Language::Turkic);
        assert_eq!(tr.title("istanbul İZMİR IRMAK"), "İstanbul İzmir Irmak");
        assert_eq!(Language::from_tag("az_AZ").title("ilk"), "İlk");
    }

    #[test]
    fn test_title_dutch() {
        let nl = Language::from_tag("NL-be");
        assert_eq!(nl.title("ijsland"), "IJsland");
        assert_eq!(Language::from_tag("en").title("ijsland"), "Ijsland");
    }
}

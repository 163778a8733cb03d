use std::{io::Read, sync::Arc};

use itertools::Itertools;
use once_cell::sync::OnceCell;
use tracing::trace;

use super::{
    generator::{DynGenerator, Generator},
    sampler::{read_slice_n, N_MAX},
    PasswordError,
};
use crate::pw_ensure;

/// Picks one item of a slice per call.
#[derive(Debug, Clone)]
pub struct FromSlice {
    items: Arc<[String]>,
}

impl Generator for FromSlice {
    fn password(&self, rng: &mut dyn Read) -> Result<String, PasswordError> {
        Ok(read_slice_n(rng, &self.items)?.clone())
    }
}

/// Returns a generator picking one of `items` uniformly.
///
/// # Errors
///
/// Fails if `items` is empty or holds more than `N_MAX` entries.
pub fn from_slice<I, S>(items: I) -> Result<DynGenerator, PasswordError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let items = items.into_iter().map(Into::into).collect::<Arc<[String]>>();
    if items.is_empty() || items.len() > N_MAX as usize {
        return Err(PasswordError::InvalidWordList(format!(
            "a list must hold between 1 and {N_MAX} items, got {}",
            items.len()
        )));
    }
    Ok(Arc::new(FromSlice { items }))
}

/// A validated list of distinct, non-empty words without whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordList {
    words: Arc<[String]>,
}

impl WordList {
    /// Validates `words`.
    ///
    /// # Errors
    ///
    /// Fails on an empty list, an empty word, a word containing Unicode
    /// whitespace, a duplicate word, or a list longer than `N_MAX`.
    pub fn new<I, S>(words: I) -> Result<Self, PasswordError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = words.into_iter().map(Into::into).collect_vec();
        validate_words(&words).map_err(PasswordError::InvalidWordList)?;
        Ok(Self {
            words: words.into(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }
}

impl TryFrom<&str> for WordList {
    type Error = PasswordError;

    /// Parses a newline-delimited list. Blank lines are skipped and `\r\n`
    /// line endings are accepted.
    fn try_from(blob: &str) -> Result<Self, Self::Error> {
        Self::new(blob.lines().filter(|line| !line.is_empty()))
    }
}

impl TryFrom<&[u8]> for WordList {
    type Error = PasswordError;

    fn try_from(blob: &[u8]) -> Result<Self, Self::Error> {
        let blob = std::str::from_utf8(blob)
            .map_err(|e| PasswordError::InvalidWordList(format!("invalid UTF-8: {e}")))?;
        Self::try_from(blob)
    }
}

impl Generator for WordList {
    fn password(&self, rng: &mut dyn Read) -> Result<String, PasswordError> {
        Ok(read_slice_n(rng, &self.words)?.clone())
    }
}

/// Checks the word list invariants: between 1 and `N_MAX` distinct,
/// non-empty words without Unicode whitespace.
fn validate_words<S: AsRef<str>>(words: &[S]) -> Result<(), String> {
    pw_ensure!(!words.is_empty(), "a word list cannot be empty".to_owned());
    pw_ensure!(
        words.len() <= N_MAX as usize,
        format!(
            "a word list holds at most {N_MAX} words, got {}",
            words.len()
        )
    );
    for (i, word) in words.iter().map(AsRef::<str>::as_ref).enumerate() {
        pw_ensure!(!word.is_empty(), format!("word at index {i} is empty"));
        pw_ensure!(
            !word.chars().any(char::is_whitespace),
            format!("word {word:?} contains whitespace")
        );
    }
    if let Some(word) = words.iter().map(AsRef::<str>::as_ref).duplicates().next() {
        return Err(format!("duplicate word {word:?}"));
    }
    Ok(())
}

/// A newline-delimited list compiled into the binary.
///
/// The blob is split and validated on first use only; later calls reuse the
/// parsed items. Blank lines and `\r` line endings are ignored, the other
/// lines must satisfy the [`WordList`] invariants. Each call to `password`
/// returns one item.
#[derive(Debug)]
pub struct EmbeddedList {
    blob: &'static str,
    items: OnceCell<Result<Vec<&'static str>, String>>,
}

impl EmbeddedList {
    #[must_use]
    pub const fn new(blob: &'static str) -> Self {
        Self {
            blob,
            items: OnceCell::new(),
        }
    }

    /// The parsed items, in file order.
    ///
    /// # Errors
    ///
    /// Fails with [`PasswordError::InvalidWordList`] if the blob holds no
    /// item, a duplicate item or an item containing whitespace. The outcome
    /// is computed once.
    pub fn items(&self) -> Result<&[&'static str], PasswordError> {
        self.items
            .get_or_init(|| {
                let items = self
                    .blob
                    .split('\n')
                    .map(|line| line.strip_suffix('\r').unwrap_or(line))
                    .filter(|line| !line.is_empty())
                    .collect_vec();
                trace!("split embedded list into {} items", items.len());
                validate_words(&items)?;
                Ok(items)
            })
            .as_deref()
            .map_err(|e| PasswordError::InvalidWordList(e.clone()))
    }

    /// Counts how many list items tile `s` from left to right, trying the
    /// longest item first at each position.
    ///
    /// Returns `None` if some part of `s` is not an item or if the list is
    /// invalid. Used on emoji lists to count emoji in a generated string.
    #[must_use]
    pub fn greedy_count(&self, s: &str) -> Option<usize> {
        let items = self.items().ok()?;
        let mut rest = s;
        let mut count = 0;
        while !rest.is_empty() {
            let item = items
                .iter()
                .filter(|item| rest.starts_with(**item))
                .max_by_key(|item| item.len())?;
            rest = &rest[item.len()..];
            count += 1;
        }
        Some(count)
    }
}

impl Generator for EmbeddedList {
    fn password(&self, rng: &mut dyn Read) -> Result<String, PasswordError> {
        Ok((*read_slice_n(rng, self.items()?)?).to_owned())
    }
}

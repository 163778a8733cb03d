//! Generators producing strings matched by a regular expression.
//!
//! The pattern is parsed with `regex-syntax` and its high-level IR is
//! compiled into a tree of emit nodes. Emitting walks the tree and draws
//! every choice (alternation branch, repetition count, class member) from
//! the reader with [`read_int_n`].

use std::{collections::HashMap, fmt, io::Read, sync::Arc};

use regex_syntax::{
    hir::{Class, Hir, HirKind},
    ParserBuilder,
};
use tracing::debug;

use super::{
    generator::{random_repeat, DynGenerator, Generator},
    sampler::{read_int_n, read_rune, N_MAX},
    unicode::{ascii_any, table_from_class, unicode_any},
    PasswordError, RangeTable,
};
use crate::pw_bail;

/// Extra repetitions allowed by unbounded operators: `*` is `{0,15}` and
/// `+` is `{1,16}`.
pub const MAX_UNBOUNDED_REPEAT: u32 = 15;

const MAX_CODE_POINT: u32 = 0x10_FFFF;

/// Builds the generator substituted for a named capture, from the capture's
/// sub-expression.
pub type SpecialCapture = Arc<dyn Fn(&Hir) -> Result<DynGenerator, PasswordError> + Send + Sync>;

/// Parser options.
///
/// Dot-matches-newline is always on and case-insensitive matching always
/// off: they are not configurable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub multi_line: bool,
    pub swap_greed: bool,
    pub ignore_whitespace: bool,
    pub crlf: bool,
    /// Sample `.` and negated classes from [`unicode_any`] instead of
    /// [`ascii_any`].
    pub unicode_any: bool,
}

impl Flags {
    #[must_use]
    pub const fn multi_line(mut self, yes: bool) -> Self {
        self.multi_line = yes;
        self
    }

    #[must_use]
    pub const fn swap_greed(mut self, yes: bool) -> Self {
        self.swap_greed = yes;
        self
    }

    #[must_use]
    pub const fn ignore_whitespace(mut self, yes: bool) -> Self {
        self.ignore_whitespace = yes;
        self
    }

    #[must_use]
    pub const fn crlf(mut self, yes: bool) -> Self {
        self.crlf = yes;
        self
    }

    #[must_use]
    pub const fn unicode_any(mut self, yes: bool) -> Self {
        self.unicode_any = yes;
        self
    }
}

/// Compiles patterns into [`RegexTemplate`]s.
#[derive(Clone, Default)]
pub struct RegexParser {
    flags: Flags,
    special: HashMap<String, SpecialCapture>,
}

impl fmt::Debug for RegexParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegexParser")
            .field("flags", &self.flags)
            .field("special", &self.special.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl RegexParser {
    #[must_use]
    pub fn new(flags: Flags) -> Self {
        Self {
            flags,
            special: HashMap::new(),
        }
    }

    /// Replaces every capture named `name` by the generator `factory`
    /// builds from the capture's sub-expression.
    pub fn set_special_capture<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Hir) -> Result<DynGenerator, PasswordError> + Send + Sync + 'static,
    {
        self.special.insert(name.into(), Arc::new(factory));
        self
    }

    /// Samples `.` and negated classes from the Unicode-any table.
    pub fn set_unicode_any(&mut self) -> &mut Self {
        self.flags.unicode_any = true;
        self
    }

    #[must_use]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Parses and compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Fails on a syntax error, on a class without any usable code point
    /// and on repetition ranges holding more than [`N_MAX`] counts.
    pub fn parse(&self, pattern: &str) -> Result<RegexTemplate, PasswordError> {
        let hir = ParserBuilder::new()
            .dot_matches_new_line(true)
            .case_insensitive(false)
            .multi_line(self.flags.multi_line)
            .swap_greed(self.flags.swap_greed)
            .ignore_whitespace(self.flags.ignore_whitespace)
            .crlf(self.flags.crlf)
            .unicode(true)
            .utf8(true)
            .build()
            .parse(pattern)?;
        let root = self.compile(&hir)?;
        debug!(
            "compiled regex template `{pattern}` (unicode any: {})",
            self.flags.unicode_any
        );
        Ok(RegexTemplate {
            pattern: pattern.to_owned(),
            root,
        })
    }

    fn any_table(&self) -> &'static RangeTable {
        if self.flags.unicode_any {
            unicode_any()
        } else {
            ascii_any()
        }
    }

    fn compile(&self, hir: &Hir) -> Result<Node, PasswordError> {
        match hir.kind() {
            HirKind::Empty | HirKind::Look(_) => Ok(Node::Concat(Vec::new())),
            HirKind::Literal(literal) => {
                let s = std::str::from_utf8(&literal.0).map_err(|e| {
                    PasswordError::UnsupportedRegex(format!("literal {hir} is not UTF-8: {e}"))
                })?;
                Ok(Node::Literal(s.to_owned()))
            }
            HirKind::Class(class) => self.compile_class(hir, class),
            HirKind::Repetition(rep) => {
                let max = match rep.max {
                    Some(max) => max,
                    None => rep.min.checked_add(MAX_UNBOUNDED_REPEAT).ok_or_else(|| {
                        PasswordError::UnsupportedRegex(format!(
                            "repetition {hir} has no usable upper bound"
                        ))
                    })?,
                };
                if max - rep.min >= N_MAX {
                    return Err(PasswordError::UnsupportedRegex(format!(
                        "repetition {hir} holds more than {N_MAX} counts"
                    )));
                }
                Ok(Node::Repeat {
                    min: rep.min,
                    max,
                    node: Box::new(self.compile(&rep.sub)?),
                })
            }
            HirKind::Capture(capture) => {
                let special = capture
                    .name
                    .as_deref()
                    .and_then(|name| self.special.get(name));
                match special {
                    Some(factory) => Ok(Node::Special(factory(&*capture.sub)?)),
                    None => self.compile(&capture.sub),
                }
            }
            HirKind::Concat(subs) => Ok(Node::Concat(
                subs.iter()
                    .map(|sub| self.compile(sub))
                    .collect::<Result<_, _>>()?,
            )),
            HirKind::Alternation(subs) => {
                if subs.len() > N_MAX as usize {
                    return Err(PasswordError::UnsupportedRegex(format!(
                        "alternation holds more than {N_MAX} branches"
                    )));
                }
                Ok(Node::Alternate(
                    subs.iter()
                        .map(|sub| self.compile(sub))
                        .collect::<Result<_, _>>()?,
                ))
            }
        }
    }

    fn compile_class(&self, hir: &Hir, class: &Class) -> Result<Node, PasswordError> {
        let table = match class {
            Class::Unicode(class) => table_from_class(class),
            Class::Bytes(class) => {
                if class.ranges().iter().any(|r| !r.end().is_ascii()) {
                    return Err(PasswordError::UnsupportedRegex(format!(
                        "byte class {hir} reaches beyond ASCII"
                    )));
                }
                RangeTable::from_ranges(
                    class
                        .ranges()
                        .iter()
                        .map(|r| (u32::from(r.start()), u32::from(r.end()))),
                )
            }
        };
        // negated classes and `.` reach the last code point
        let is_open = table.ranges().last().map(|(_, hi, _)| hi) == Some(MAX_CODE_POINT);
        let table = if is_open {
            table.intersect(self.any_table())
        } else {
            table
        };
        let count = table.count();
        if count == 0 {
            pw_bail!(PasswordError::EmptyClass(hir.to_string()));
        }
        if count > N_MAX {
            return Err(PasswordError::UnsupportedRegex(format!(
                "class {hir} holds more than {N_MAX} code points"
            )));
        }
        Ok(Node::Class {
            table: Arc::new(table),
            count,
        })
    }
}

/// A compiled emit node.
#[derive(Clone)]
enum Node {
    Literal(String),
    Class { table: Arc<RangeTable>, count: u32 },
    Concat(Vec<Node>),
    Alternate(Vec<Node>),
    Repeat { min: u32, max: u32, node: Box<Node> },
    Special(DynGenerator),
}

impl Node {
    fn emit(&self, rng: &mut dyn Read, out: &mut String) -> Result<(), PasswordError> {
        match self {
            Self::Literal(s) => out.push_str(s),
            Self::Class { table, count } => out.push(read_rune(rng, table, *count)?),
            Self::Concat(nodes) => {
                for node in nodes {
                    node.emit(rng, out)?;
                }
            }
            Self::Alternate(nodes) => {
                // the branch count is checked against `N_MAX` at compile time
                let i = read_int_n(rng, nodes.len() as u32)?;
                nodes[i as usize].emit(rng, out)?;
            }
            Self::Repeat { min, max, node } => {
                let k = *min + read_int_n(rng, *max - *min + 1)?;
                for _ in 0..k {
                    node.emit(rng, out)?;
                }
            }
            Self::Special(generator) => out.push_str(&generator.password(rng)?),
        }
        Ok(())
    }
}

/// A generator of strings matched by a regular expression.
#[derive(Clone)]
pub struct RegexTemplate {
    pattern: String,
    root: Node,
}

impl RegexTemplate {
    /// The source pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl fmt::Debug for RegexTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegexTemplate")
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

impl Generator for RegexTemplate {
    fn password(&self, rng: &mut dyn Read) -> Result<String, PasswordError> {
        let mut out = String::new();
        self.root.emit(rng, &mut out)?;
        Ok(out)
    }
}

/// Compiles `pattern` with the default flags and no special capture.
///
/// # Errors
///
/// See [`RegexParser::parse`].
pub fn regex(pattern: &str) -> Result<DynGenerator, PasswordError> {
    Ok(Arc::new(RegexParser::default().parse(pattern)?))
}

/// A special capture factory using `generator` for the capture.
///
/// If the capture's sub-expression holds a bounded repetition `{min,max}`,
/// the first one found decides how many times `generator` runs, the outputs
/// being joined with `separator`. Otherwise `generator` runs once.
pub fn with_repeat(
    generator: DynGenerator,
    separator: &str,
) -> impl Fn(&Hir) -> Result<DynGenerator, PasswordError> + Send + Sync + 'static {
    let separator = separator.to_owned();
    move |sub: &Hir| match first_bounded_repetition(sub) {
        Some((min, max)) => random_repeat(generator.clone(), &separator, min, max),
        None => Ok(generator.clone()),
    }
}

fn first_bounded_repetition(hir: &Hir) -> Option<(u32, u32)> {
    match hir.kind() {
        HirKind::Repetition(rep) => match rep.max {
            Some(max) => Some((rep.min, max)),
            None => first_bounded_repetition(&rep.sub),
        },
        HirKind::Capture(capture) => first_bounded_repetition(&capture.sub),
        HirKind::Concat(subs) | HirKind::Alternation(subs) => {
            subs.iter().find_map(first_bounded_repetition)
        }
        HirKind::Empty | HirKind::Literal(_) | HirKind::Class(_) | HirKind::Look(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn parse_sub(pattern: &str) -> Hir {
        ParserBuilder::new()
            .build()
            .parse(pattern)
            .expect("valid pattern")
    }

    #[test]
    fn test_literal_and_anchors_read_nothing() -> Result<(), PasswordError> {
        let template = RegexParser::default().parse(r"^abc\b$")?;
        let mut rng = Cursor::new(Vec::<u8>::new());
        assert_eq!(template.password(&mut rng)?, "abc");
        Ok(())
    }

    #[test]
    fn test_repetition_draw() -> Result<(), PasswordError> {
        // `{2,5}`: one draw in [0, 4] added to 2
        let template = RegexParser::default().parse("x{2,5}")?;
        let mut rng = Cursor::new(vec![3_u8]);
        assert_eq!(template.password(&mut rng)?, "xxxxx");

        // `*` is `{0,15}`
        let template = RegexParser::default().parse("y*")?;
        let mut rng = Cursor::new(vec![15_u8]);
        assert_eq!(template.password(&mut rng)?, "y".repeat(15));
        Ok(())
    }

    #[test]
    fn test_negated_class_is_printable_ascii() -> Result<(), PasswordError> {
        let template = RegexParser::default().parse("[^a-z]")?;
        // 95 - 26 = 69 candidates: the first one is the space
        let mut rng = Cursor::new(vec![0_u8, 68]);
        assert_eq!(template.password(&mut rng)?, " ");
        assert_eq!(template.password(&mut rng)?, "~");
        Ok(())
    }

    #[test]
    fn test_empty_class() {
        let res = RegexParser::default().parse(r"[^\x20-\x7E]");
        assert!(matches!(res, Err(PasswordError::EmptyClass(_))));
    }

    #[test]
    fn test_syntax_error() {
        let res = RegexParser::default().parse("a(b");
        assert!(matches!(res, Err(PasswordError::Regex(_))));
    }

    #[test]
    fn test_first_bounded_repetition() {
        assert_eq!(first_bounded_repetition(&parse_sub(r"\w{3,5}")), Some((3, 5)));
        assert_eq!(
            first_bounded_repetition(&parse_sub(r"(?:a+b{2,4})c{7}")),
            Some((2, 4))
        );
        assert_eq!(first_bounded_repetition(&parse_sub("abc")), None);
    }
}

//! Default tables sampled by `.` and by negated character classes.

use lazy_static::lazy_static;
use regex_syntax::{
    hir::{Class, ClassUnicode, HirKind},
    ParserBuilder,
};
use tracing::debug;

use super::RangeTable;

/// Letters, non-spacing marks, numbers, punctuation and symbols, minus
/// deprecated and default-ignorable code points (variation selectors,
/// zero-width joiners, word joiner, ...), minus ASCII controls and a few
/// hand-picked confusables.
const UNICODE_ANY_CLASS: &str = r"[\p{Lu}\p{Ll}\p{Lt}\p{Lo}\p{Mn}\p{N}\p{P}\p{S}--[\p{Deprecated}\p{Default_Ignorable_Code_Point}\x00-\x1F\x7F\x{0FD5}\x{0FD6}\x{534D}\x{5350}]]";

lazy_static! {
    static ref ASCII_ANY: RangeTable = RangeTable::from_ranges([(0x20, 0x7E)]);
    static ref UNICODE_ANY: RangeTable = build_unicode_any();
}

/// Printable ASCII, space included: `[0x20, 0x7E]`.
#[must_use]
pub fn ascii_any() -> &'static RangeTable {
    &ASCII_ANY
}

/// The curated table of "any" Unicode character, built once on first use.
#[must_use]
pub fn unicode_any() -> &'static RangeTable {
    &UNICODE_ANY
}

/// Converts a `regex-syntax` Unicode class into a stride-1 table.
pub(crate) fn table_from_class(class: &ClassUnicode) -> RangeTable {
    RangeTable::from_ranges(
        class
            .ranges()
            .iter()
            .map(|r| (r.start() as u32, r.end() as u32)),
    )
}

fn build_unicode_any() -> RangeTable {
    let hir = ParserBuilder::new()
        .build()
        .parse(UNICODE_ANY_CLASS)
        .expect("the Unicode-any class is a valid pattern");
    let table = match hir.kind() {
        HirKind::Class(Class::Unicode(class)) => table_from_class(class),
        _ => unreachable!("the Unicode-any pattern is a single class"),
    };
    debug!(
        "built Unicode-any table: {} ranges, {} code points",
        table.r16.len() + table.r32.len(),
        table.count()
    );
    table
}

pub mod error;
pub use error::PasswordError;

mod sampler;
pub use sampler::{read_int_n, read_rune, read_slice_n, N_MAX};

mod range_table;
pub use range_table::{Range16, Range32, RangeTable};

mod unicode;
pub use unicode::{ascii_any, unicode_any};

mod generator;
pub use generator::{
    alternate, concat, empty, fixed, hyphen, join, random_repeat, rejection_sample, repeat, space,
    Alternate, DynGenerator, Fixed, Generator, Join, RandomRepeat, RejectionSample, Repeat,
};

mod charset;
pub use charset::{charset, Charset, CharsetGenerator};

mod word_list;
pub use word_list::{from_slice, EmbeddedList, FromSlice, WordList};

mod transform;
pub use transform::{lower_case, title_case, transform, upper_case, Language, Transform};

mod encoding;
pub use encoding::{
    ascii85, base32, base32_hex, base64, base64_url, encoded, hex_lower, hex_upper, Encoded,
    Encoding,
};

mod regex_template;
pub use regex_template::{
    regex, with_repeat, Flags, RegexParser, RegexTemplate, SpecialCapture, MAX_UNBOUNDED_REPEAT,
};

mod spectre;
pub use spectre::{class_characters, SpectreTemplate};

mod reader;
pub use reader::{RngReader, UnpinnedReader};

//! Composable generators of passwords, passphrases and other secret
//! strings.
//!
//! Every generator consumes bytes from a caller-supplied
//! [`std::io::Read`] and never sources randomness on its own: the same
//! generator fed the same byte stream always produces the same output.
//!
//! ```
//! use cloudproof_password::core::{
//!     charset, join, Charset, Generator, RegexParser, RngReader, SpectreTemplate,
//! };
//!
//! let mut rng = RngReader::new(rand::rngs::OsRng);
//!
//! let pin = charset("0123456789", 6).unwrap();
//! let token = join("-", vec![Charset::latin_lower().generator(4); 3]);
//! let template = RegexParser::default().parse(r"[A-Z]{2}\d{4}").unwrap();
//!
//! assert_eq!(pin.password(&mut rng).unwrap().len(), 6);
//! assert_eq!(token.password(&mut rng).unwrap().len(), 14);
//! assert_eq!(template.password(&mut rng).unwrap().chars().count(), 6);
//! assert_eq!(SpectreTemplate::pin().password(&mut rng).unwrap().len(), 4);
//! ```

pub mod core;

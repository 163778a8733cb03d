use std::io::Read;

use super::{PasswordError, RangeTable};
use crate::pw_error;

/// Largest range size accepted by [`read_int_n`].
pub const N_MAX: u32 = (1 << 31) - 1;

/// Reads a uniformly distributed integer in `[0, n)` from `rng`.
///
/// Each draw reads the narrowest little-endian word able to hold `n - 1`
/// (one byte up to `n = 2^8`, two bytes up to `n = 2^16`, four bytes above)
/// and rejects the non-uniform tail of the word range, so there is no modulo
/// bias. The expected number of draws is below 2 for every `n`.
///
/// # Panics
///
/// Panics if `n` is `0` or greater than [`N_MAX`].
///
/// # Errors
///
/// Only reader failures are reported. A stream ending in the middle of a
/// word is reported as [`PasswordError::UnexpectedEof`].
pub fn read_int_n(rng: &mut dyn Read, n: u32) -> Result<u32, PasswordError> {
    assert!(n >= 1, "n must be positive");
    assert!(n <= N_MAX, "n must not be greater than {N_MAX}");

    let width = word_width(n);
    let range = 1_u64 << (8 * width);
    let max = range - 1 - (range % u64::from(n));
    loop {
        let v = read_word(rng, width)?;
        if v <= max {
            // `v % n < n <= N_MAX` so the cast is lossless
            return Ok((v % u64::from(n)) as u32);
        }
    }
}

/// Picks one element of `xs` uniformly.
///
/// # Panics
///
/// Panics if `xs` is empty or longer than [`N_MAX`].
pub fn read_slice_n<'a, T>(rng: &mut dyn Read, xs: &'a [T]) -> Result<&'a T, PasswordError> {
    let n = u32::try_from(xs.len()).unwrap_or(u32::MAX);
    let i = read_int_n(rng, n)?;
    Ok(&xs[i as usize])
}

/// Picks the code point at a uniformly drawn position of `table`, the code
/// points being enumerated in ascending order.
///
/// `count` must be `table.count()`; callers compute it once at construction.
pub fn read_rune(rng: &mut dyn Read, table: &RangeTable, count: u32) -> Result<char, PasswordError> {
    let i = read_int_n(rng, count)?;
    let code_point = table
        .nth(i)
        .ok_or_else(|| pw_error!("index {} out of bounds for range table of size {}", i, table.count()))?;
    char::from_u32(code_point).ok_or_else(|| pw_error!("{:#x} is not a Unicode scalar value", code_point))
}

const fn word_width(n: u32) -> usize {
    if n <= 1 << 8 {
        1
    } else if n <= 1 << 16 {
        2
    } else {
        4
    }
}

fn read_word(rng: &mut dyn Read, width: usize) -> Result<u64, PasswordError> {
    let mut buf = [0_u8; 8];
    rng.read_exact(&mut buf[..width])?;
    Ok(u64::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_word_width() {
        assert_eq!(word_width(1), 1);
        assert_eq!(word_width(256), 1);
        assert_eq!(word_width(257), 2);
        assert_eq!(word_width(65_536), 2);
        assert_eq!(word_width(65_537), 4);
        assert_eq!(word_width(N_MAX), 4);
    }

    #[test]
    fn test_rejects_biased_tail() -> Result<(), PasswordError> {
        // 256 % 21 = 4: bytes above 251 are rejected
        let mut rng = Cursor::new(vec![255_u8, 252, 251]);
        assert_eq!(read_int_n(&mut rng, 21)?, 251 % 21);
        assert_eq!(rng.position(), 3);

        // a power of two never rejects
        let mut rng = Cursor::new(vec![0xff_u8, 0xff]);
        assert_eq!(read_int_n(&mut rng, 1 << 16)?, 0xffff);
        Ok(())
    }

    #[test]
    fn test_little_endian_words() -> Result<(), PasswordError> {
        let mut rng = Cursor::new(vec![0x01_u8, 0x02]);
        assert_eq!(read_int_n(&mut rng, 1000)?, 0x0201 % 1000);

        let mut rng = Cursor::new(vec![0x01_u8, 0x02, 0x03, 0x04]);
        assert_eq!(read_int_n(&mut rng, 100_000)?, 0x0403_0201 % 100_000);
        Ok(())
    }

    #[test]
    fn test_short_read() {
        let mut rng = Cursor::new(vec![0x01_u8, 0x02, 0x03]);
        let res = read_int_n(&mut rng, 100_000);
        assert!(matches!(res, Err(PasswordError::UnexpectedEof)));
        assert_eq!(
            PasswordError::UnexpectedEof.to_string(),
            "unexpected end of stream"
        );
    }

    #[test]
    #[should_panic(expected = "n must be positive")]
    fn test_zero_range() {
        let mut rng = Cursor::new(vec![0_u8; 4]);
        let _ = read_int_n(&mut rng, 0);
    }

    #[test]
    fn test_read_slice_n() -> Result<(), PasswordError> {
        let xs = ["a", "b", "c"];
        let mut rng = Cursor::new(vec![4_u8]);
        assert_eq!(*read_slice_n(&mut rng, &xs)?, "b");
        Ok(())
    }

    #[test]
    fn test_read_rune() -> Result<(), PasswordError> {
        let table = RangeTable::from_ranges([(u32::from('a'), u32::from('c'))]);
        let mut rng = Cursor::new(vec![2_u8]);
        assert_eq!(read_rune(&mut rng, &table, table.count())?, 'c');

        // a count larger than the table points past its last code point
        let mut rng = Cursor::new(vec![5_u8]);
        let res = read_rune(&mut rng, &table, 6);
        assert!(matches!(res, Err(PasswordError::Generic(msg)) if msg.contains("out of bounds")));
        Ok(())
    }
}

use std::{
    io::{self, Read},
    sync::atomic::{AtomicBool, Ordering},
};

use rand::RngCore;
use tracing::trace;

/// Exposes a random number generator as an endless byte stream.
///
/// ```
/// use cloudproof_password::core::{Generator, RngReader, SpectreTemplate};
///
/// let mut rng = RngReader::new(rand::rngs::OsRng);
/// let password = SpectreTemplate::long().password(&mut rng).unwrap();
/// assert_eq!(password.len(), 14);
/// ```
#[derive(Debug, Clone)]
pub struct RngReader<R: RngCore> {
    rng: R,
}

impl<R: RngCore> RngReader<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: RngCore> Read for RngReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.rng
            .try_fill_bytes(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(buf.len())
    }
}

static UNPINNED: AtomicBool = AtomicBool::new(false);

/// Guards against callers pinning the output of the library to a fixed
/// byte stream.
///
/// On the first read through any `UnpinnedReader` of the process, one byte
/// of the inner stream is discarded with probability one half, so that the
/// exact passwords derived from a given stream are not stable across runs.
/// Every other read is forwarded unchanged.
#[derive(Debug)]
pub struct UnpinnedReader<R: Read> {
    inner: R,
}

impl<R: Read> UnpinnedReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for UnpinnedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !UNPINNED.swap(true, Ordering::AcqRel) && rand::random::<bool>() {
            trace!("discarding one byte of the random stream");
            let mut skipped = [0_u8; 1];
            self.inner.read_exact(&mut skipped)?;
        }
        self.inner.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;

    #[test]
    fn test_rng_reader_is_seeded_stream() {
        let mut a = RngReader::new(ChaCha20Rng::seed_from_u64(7));
        let mut b = ChaCha20Rng::seed_from_u64(7);

        let mut from_reader = [0_u8; 37];
        a.read_exact(&mut from_reader).unwrap();
        let mut from_rng = [0_u8; 37];
        b.fill_bytes(&mut from_rng);
        assert_eq!(from_reader, from_rng);
    }

    #[test]
    fn test_unpinned_reader_skips_at_most_one_byte() {
        let mut reader = UnpinnedReader::new(Cursor::new((0_u8..16).collect::<Vec<_>>()));
        let mut buf = [0_u8; 4];
        reader.read_exact(&mut buf).unwrap();
        // other tests of the process may have consumed the one-time coin
        assert!(buf == [0, 1, 2, 3] || buf == [1, 2, 3, 4]);
        let first = buf[0];

        reader.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [first + 4, first + 5, first + 6, first + 7]);
    }
}

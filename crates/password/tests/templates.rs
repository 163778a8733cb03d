use std::{
    io::{BufReader, Read},
    sync::Arc,
};

use aes::Aes128;
use cloudproof_password::core::{
    concat, fixed, hyphen, join, random_repeat, repeat, title_case, transform, unicode_any,
    Charset, DynGenerator, Flags, Generator, PasswordError, RegexParser, RngReader,
    SpectreTemplate, UnpinnedReader, WordList,
};
use ctr::{
    cipher::{KeyIvInit, StreamCipher},
    Ctr128BE,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

struct ZeroKeystream(Ctr128BE<Aes128>);

impl Read for ZeroKeystream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        buf.fill(0);
        self.0.apply_keystream(buf);
        Ok(buf.len())
    }
}

fn zero_keystream() -> ZeroKeystream {
    ZeroKeystream(Ctr128BE::<Aes128>::new(
        &[0_u8; 16].into(),
        &[0_u8; 16].into(),
    ))
}

const WORDS: &str = "acid\nbasil\ncobalt\ndune\nember\nfjord\ngravel\nhazel\niris\njuniper\n";

fn passphrase(words: usize) -> Result<DynGenerator, PasswordError> {
    let list: DynGenerator = Arc::new(WordList::try_from(WORDS)?);
    Ok(join(
        "-",
        vec![
            title_case(repeat(list, "-", words), "en"),
            Charset::digits().generator(2),
        ],
    ))
}

#[test]
fn test_passphrase() -> Result<(), PasswordError> {
    let generator = passphrase(4)?;
    let mut rng = RngReader::new(ChaCha20Rng::seed_from_u64(42));
    for _ in 0..100 {
        let password = generator.password(&mut rng)?;
        let parts = password.split('-').collect::<Vec<_>>();
        assert_eq!(parts.len(), 5, "{password:?}");
        for word in &parts[..4] {
            let lower = word.to_lowercase();
            assert!(WORDS.lines().any(|w| w == lower), "{word:?}");
            assert!(word.starts_with(|c: char| c.is_ascii_uppercase()));
        }
        assert!(parts[4].len() == 2 && parts[4].bytes().all(|b| b.is_ascii_digit()));
    }
    Ok(())
}

#[test]
fn test_same_stream_same_password() -> Result<(), PasswordError> {
    let generator = concat(vec![
        SpectreTemplate::medium().into_generator(),
        hyphen(),
        RegexParser::default().parse(r"[a-f0-9]{8}")?.into_generator(),
    ]);
    let a = generator.password(&mut RngReader::new(ChaCha20Rng::seed_from_u64(1)))?;
    let b = generator.password(&mut RngReader::new(ChaCha20Rng::seed_from_u64(1)))?;
    assert_eq!(a, b);
    Ok(())
}

#[test]
fn test_spectre_over_buffered_keystream() -> Result<(), PasswordError> {
    let template = SpectreTemplate::long();
    let mut rng = BufReader::new(zero_keystream());
    assert_eq!(template.password(&mut rng)?, "Dadl8(WeraHinc");
    assert_eq!(template.password(&mut rng)?, "GewyBoru7=Fubu");
    Ok(())
}

#[test]
fn test_unicode_any_template() -> Result<(), PasswordError> {
    let mut parser = RegexParser::new(Flags::default().unicode_any(true));
    let template = parser.parse(r"[^\p{Han}]{12}")?;
    let mut rng = UnpinnedReader::new(RngReader::new(ChaCha20Rng::seed_from_u64(3)));
    for _ in 0..50 {
        let password = template.password(&mut rng)?;
        assert_eq!(password.chars().count(), 12);
        assert!(password.chars().all(|c| unicode_any().contains(c)));
    }

    parser.set_special_capture("sep", |_| Ok(fixed("/")));
    let template = parser.parse(r"\d{3}(?P<sep>x)\d{3}")?;
    let password = template.password(&mut rng)?;
    assert_eq!(password.chars().nth(3), Some('/'));
    Ok(())
}

#[test]
fn test_transform_and_random_repeat() -> Result<(), PasswordError> {
    let generator = transform(
        random_repeat(Charset::latin_lower().generator(3), " ", 1, 4)?,
        |s| s.replace(' ', "_"),
    );
    let mut rng = RngReader::new(ChaCha20Rng::seed_from_u64(5));
    for _ in 0..100 {
        let password = generator.password(&mut rng)?;
        let groups = password.split('_').count();
        assert!((1..=4).contains(&groups));
        assert_eq!(password.len(), groups * 4 - 1);
    }
    Ok(())
}

use cloudproof_password::core::{
    read_int_n, with_repeat, Charset, Generator, RegexParser, RngReader, SpectreTemplate,
    WordList,
};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn entropy_reader() -> RngReader<ChaCha20Rng> {
    RngReader::new(ChaCha20Rng::from_entropy())
}

fn bench_sampler(c: &mut Criterion) {
    let mut rng = entropy_reader();
    c.bench_function("sampler/read_int_n/1-byte word", |b| {
        b.iter(|| read_int_n(&mut rng, 129).unwrap());
    });
    c.bench_function("sampler/read_int_n/4-byte word", |b| {
        b.iter(|| read_int_n(&mut rng, 1_000_003).unwrap());
    });
}

fn bench_charset(c: &mut Criterion) {
    let mut rng = entropy_reader();
    let generator = Charset::ascii_graphic().generator(24);
    c.bench_function("charset/ascii graphic/24", |b| {
        b.iter(|| generator.password(&mut rng).unwrap());
    });
}

fn bench_spectre(c: &mut Criterion) {
    let mut rng = entropy_reader();
    let template = SpectreTemplate::long();
    c.bench_function("spectre/long", |b| {
        b.iter(|| template.password(&mut rng).unwrap());
    });
}

fn bench_regex(c: &mut Criterion) {
    let mut rng = entropy_reader();
    c.bench_function("regex/compile", |b| {
        b.iter(|| {
            RegexParser::default()
                .parse(r"[A-Z][a-z]{3,8}-\d{4}-[^a-zA-Z0-9 ]{2}")
                .unwrap()
        });
    });

    let template = RegexParser::default()
        .parse(r"[A-Z][a-z]{3,8}-\d{4}-[^a-zA-Z0-9 ]{2}")
        .unwrap();
    c.bench_function("regex/ascii", |b| {
        b.iter(|| template.password(&mut rng).unwrap());
    });

    let mut parser = RegexParser::default();
    parser.set_unicode_any();
    let template = parser.parse(".{16}").unwrap();
    c.bench_function("regex/unicode any/16", |b| {
        b.iter(|| template.password(&mut rng).unwrap());
    });

    let words = WordList::try_from("correct\nhorse\nbattery\nstaple\ntroubadour\nzebra").unwrap();
    let mut parser = RegexParser::default();
    parser.set_special_capture("word", with_repeat(std::sync::Arc::new(words), "-"));
    let template = parser.parse(r"(?P<word>\w{4,6})\d{2}").unwrap();
    c.bench_function("regex/word capture", |b| {
        b.iter(|| template.password(&mut rng).unwrap());
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(5000);
    targets =
        bench_sampler,
        bench_charset,
        bench_spectre,
        bench_regex,
);

criterion_main!(benches);

use std::{io::Read, sync::Arc};

use tracing::trace;

use super::{
    sampler::{read_int_n, N_MAX},
    PasswordError,
};

/// A source of passwords.
///
/// A generator reads zero or more bytes from `rng` and turns them into a
/// string. The only state a call depends on is the byte stream: the same
/// generator fed the same bytes produces the same output.
pub trait Generator: Send + Sync {
    /// Generates one password.
    ///
    /// # Errors
    ///
    /// Reader failures are propagated unchanged.
    fn password(&self, rng: &mut dyn Read) -> Result<String, PasswordError>;

    /// Moves the generator behind an `Arc` to compose it with others.
    fn into_generator(self) -> DynGenerator
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}

/// A shared, cheaply clonable generator.
pub type DynGenerator = Arc<dyn Generator>;

impl<G: Generator + ?Sized> Generator for Arc<G> {
    fn password(&self, rng: &mut dyn Read) -> Result<String, PasswordError> {
        (**self).password(rng)
    }
}

impl<G: Generator + ?Sized> Generator for &G {
    fn password(&self, rng: &mut dyn Read) -> Result<String, PasswordError> {
        (**self).password(rng)
    }
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn password(&self, rng: &mut dyn Read) -> Result<String, PasswordError> {
        (**self).password(rng)
    }
}

/// A generator always returning the same string.
#[derive(Debug, Clone)]
pub struct Fixed(String);

impl Generator for Fixed {
    fn password(&self, _rng: &mut dyn Read) -> Result<String, PasswordError> {
        Ok(self.0.clone())
    }
}

/// Returns `s` unchanged, never reads.
pub fn fixed(s: impl Into<String>) -> DynGenerator {
    Arc::new(Fixed(s.into()))
}

#[must_use]
pub fn empty() -> DynGenerator {
    fixed("")
}

#[must_use]
pub fn space() -> DynGenerator {
    fixed(" ")
}

#[must_use]
pub fn hyphen() -> DynGenerator {
    fixed("-")
}

/// Invokes each child in order and joins the results with a separator.
pub struct Join {
    separator: String,
    generators: Vec<DynGenerator>,
}

impl Generator for Join {
    fn password(&self, rng: &mut dyn Read) -> Result<String, PasswordError> {
        let parts = self
            .generators
            .iter()
            .map(|g| g.password(rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join(&self.separator))
    }
}

/// Joins the output of `generators` with `separator`.
///
/// No generator yields [`empty`], a single one is returned as is.
pub fn join(separator: &str, mut generators: Vec<DynGenerator>) -> DynGenerator {
    match generators.len() {
        0 => empty(),
        1 => generators.remove(0),
        _ => Arc::new(Join {
            separator: separator.to_owned(),
            generators,
        }),
    }
}

/// Invokes a generator a fixed number of times.
pub struct Repeat {
    generator: DynGenerator,
    separator: String,
    count: usize,
}

impl Generator for Repeat {
    fn password(&self, rng: &mut dyn Read) -> Result<String, PasswordError> {
        repeat_n(&self.generator, &self.separator, self.count, rng)
    }
}

fn repeat_n(
    generator: &DynGenerator,
    separator: &str,
    count: usize,
    rng: &mut dyn Read,
) -> Result<String, PasswordError> {
    let mut parts = Vec::with_capacity(count);
    for _ in 0..count {
        parts.push(generator.password(rng)?);
    }
    Ok(parts.join(separator))
}

/// Invokes `generator` exactly `count` times and joins the results with
/// `separator`.
pub fn repeat(generator: DynGenerator, separator: &str, count: usize) -> DynGenerator {
    match count {
        0 => empty(),
        1 => generator,
        _ => Arc::new(Repeat {
            generator,
            separator: separator.to_owned(),
            count,
        }),
    }
}

/// Invokes a generator a random number of times within `[min, max]`.
pub struct RandomRepeat {
    generator: DynGenerator,
    separator: String,
    min: u32,
    max: u32,
}

impl Generator for RandomRepeat {
    fn password(&self, rng: &mut dyn Read) -> Result<String, PasswordError> {
        let k = self.min + read_int_n(rng, self.max - self.min + 1)?;
        repeat_n(&self.generator, &self.separator, k as usize, rng)
    }
}

/// Invokes `generator` a number of times drawn uniformly in `[min, max]`.
///
/// # Errors
///
/// Fails if `min > max` or if the range holds more than [`N_MAX`] values.
pub fn random_repeat(
    generator: DynGenerator,
    separator: &str,
    min: u32,
    max: u32,
) -> Result<DynGenerator, PasswordError> {
    if min > max {
        return Err(PasswordError::InvalidArgument(
            "min argument cannot be greater than max argument".to_owned(),
        ));
    }
    if max - min >= N_MAX {
        return Err(PasswordError::InvalidArgument(format!(
            "repeat range [{min}, {max}] holds more than {N_MAX} values"
        )));
    }
    Ok(Arc::new(RandomRepeat {
        generator,
        separator: separator.to_owned(),
        min,
        max,
    }))
}

/// Picks one child uniformly and invokes it.
pub struct Alternate {
    generators: Vec<DynGenerator>,
}

impl Generator for Alternate {
    fn password(&self, rng: &mut dyn Read) -> Result<String, PasswordError> {
        // the length is checked against `N_MAX` at construction
        let i = read_int_n(rng, self.generators.len() as u32)?;
        self.generators[i as usize].password(rng)
    }
}

/// Picks one of `generators` uniformly on each call.
///
/// # Errors
///
/// Fails if `generators` is empty or holds more than [`N_MAX`] entries.
pub fn alternate(mut generators: Vec<DynGenerator>) -> Result<DynGenerator, PasswordError> {
    match generators.len() {
        0 => Err(PasswordError::InvalidArgument(
            "alternate requires at least one generator".to_owned(),
        )),
        1 => Ok(generators.remove(0)),
        n if n > N_MAX as usize => Err(PasswordError::InvalidArgument(format!(
            "alternate accepts at most {N_MAX} generators, got {n}"
        ))),
        _ => Ok(Arc::new(Alternate { generators })),
    }
}

/// Invokes a generator until its output satisfies a predicate.
pub struct RejectionSample {
    generator: DynGenerator,
    predicate: Arc<dyn Fn(&str) -> bool + Send + Sync>,
}

impl Generator for RejectionSample {
    fn password(&self, rng: &mut dyn Read) -> Result<String, PasswordError> {
        let mut attempts = 0_u64;
        loop {
            let candidate = self.generator.password(rng)?;
            attempts += 1;
            if (self.predicate)(&candidate) {
                trace!("rejection sampling accepted after {attempts} attempt(s)");
                return Ok(candidate);
            }
        }
    }
}

/// Invokes `generator` until `predicate` accepts its output.
///
/// A predicate that never accepts keeps the loop going until the reader
/// fails.
pub fn rejection_sample<F>(generator: DynGenerator, predicate: F) -> DynGenerator
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    Arc::new(RejectionSample {
        generator,
        predicate: Arc::new(predicate),
    })
}

/// Concatenates the outputs of `generators`, without separator.
pub fn concat(generators: Vec<DynGenerator>) -> DynGenerator {
    join("", generators)
}

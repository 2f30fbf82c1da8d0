// src/generator.rs
use crate::error::GeneratorError;
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};

const UPPERCASE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const NUMBER_CHARS: &[u8] = b"0123456789";
pub const SYMBOL_CHARS: &[u8] = b"!@#$%^&*()_+[]{};:.<>?/`~|";

/// Longest password the generator will build.
pub const MAX_PASSWORD_LENGTH: i64 = 4096;

/// How many characters of each class a generated password contains.
///
/// Counts are signed so that values typed by a user can be handed over as-is;
/// [`generate_password`] rejects anything negative.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterCounts {
    pub upper: i64,
    pub lower: i64,
    pub digits: i64,
    pub symbols: i64,
}

impl Default for CharacterCounts {
    fn default() -> Self {
        CharacterCounts {
            upper: 4,
            lower: 4,
            digits: 2,
            symbols: 2,
        }
    }
}

impl CharacterCounts {
    pub fn new(upper: i64, lower: i64, digits: i64, symbols: i64) -> Self {
        CharacterCounts { upper, lower, digits, symbols }
    }

    /// Length of the password these counts produce, or `None` if the sum overflows.
    pub fn total(&self) -> Option<i64> {
        self.upper
            .checked_add(self.lower)?
            .checked_add(self.digits)?
            .checked_add(self.symbols)
    }

    fn classes(&self) -> [(&'static str, i64, &'static [u8]); 4] {
        [
            ("uppercase", self.upper, UPPERCASE_CHARS),
            ("lowercase", self.lower, LOWERCASE_CHARS),
            ("digit", self.digits, NUMBER_CHARS),
            ("symbol", self.symbols, SYMBOL_CHARS),
        ]
    }

    pub fn validate(&self) -> Result<(), GeneratorError> {
        for (class, count, _) in self.classes() {
            if count < 0 {
                return Err(GeneratorError::InvalidArgument { class, count });
            }
        }
        match self.total() {
            Some(total) if total <= MAX_PASSWORD_LENGTH => Ok(()),
            _ => Err(GeneratorError::TooLong { max: MAX_PASSWORD_LENGTH }),
        }
    }
}

/// Generates a password with exactly the requested number of characters per class,
/// in shuffled order. Uses the thread-local RNG, which is cryptographically secure.
pub fn generate_password(counts: &CharacterCounts) -> Result<String, GeneratorError> {
    let mut rng = thread_rng();
    generate_password_with_rng(counts, &mut rng)
}

pub fn generate_password_with_rng<R: Rng + ?Sized>(
    counts: &CharacterCounts,
    rng: &mut R,
) -> Result<String, GeneratorError> {
    counts.validate()?;

    let length = counts.total().unwrap_or(0) as usize;
    let mut password_bytes: Vec<u8> = Vec::with_capacity(length);
    for (_, count, charset) in counts.classes() {
        for _ in 0..count {
            // Charsets are never empty, so choose always yields.
            if let Some(&c) = charset.choose(rng) {
                password_bytes.push(c);
            }
        }
    }
    password_bytes.shuffle(rng);

    log::debug!("Generated password of length {}", password_bytes.len());
    // Every charset is ASCII.
    Ok(password_bytes.into_iter().map(char::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn class_counts(password: &str) -> (i64, i64, i64, i64) {
        let upper = password.chars().filter(|c| c.is_ascii_uppercase()).count() as i64;
        let lower = password.chars().filter(|c| c.is_ascii_lowercase()).count() as i64;
        let digits = password.chars().filter(|c| c.is_ascii_digit()).count() as i64;
        let symbols = password.bytes().filter(|b| SYMBOL_CHARS.contains(b)).count() as i64;
        (upper, lower, digits, symbols)
    }

    #[test]
    fn test_generate_password_exact_composition() {
        let counts = CharacterCounts::new(3, 5, 2, 4);
        let password = generate_password(&counts).unwrap();
        assert_eq!(password.len(), 14);
        assert_eq!(class_counts(&password), (3, 5, 2, 4));
    }

    #[test]
    fn test_generate_password_many_compositions() {
        let mut rng = StdRng::seed_from_u64(7);
        for upper in 0..4 {
            for symbols in 0..4 {
                let counts = CharacterCounts::new(upper, 2, 1, symbols);
                let password = generate_password_with_rng(&counts, &mut rng).unwrap();
                assert_eq!(Some(password.len() as i64), counts.total());
                assert_eq!(class_counts(&password), (upper, 2, 1, symbols));
            }
        }
    }

    #[test]
    fn test_generate_password_all_zero_is_empty() {
        let password = generate_password(&CharacterCounts::new(0, 0, 0, 0)).unwrap();
        assert_eq!(password, "");
    }

    #[test]
    fn test_generate_password_only_lowercase() {
        let password = generate_password(&CharacterCounts::new(0, 10, 0, 0)).unwrap();
        assert_eq!(password.len(), 10);
        assert!(password.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_generate_password_only_symbols() {
        let password = generate_password(&CharacterCounts::new(0, 0, 0, 30)).unwrap();
        assert!(password.bytes().all(|b| SYMBOL_CHARS.contains(&b)));
    }

    #[test]
    fn test_negative_count_is_invalid_argument() {
        let err = generate_password(&CharacterCounts::new(2, -1, 2, 2)).unwrap_err();
        assert_eq!(err, GeneratorError::InvalidArgument { class: "lowercase", count: -1 });

        let err = generate_password(&CharacterCounts::new(0, 0, 0, -5)).unwrap_err();
        assert_eq!(err, GeneratorError::InvalidArgument { class: "symbol", count: -5 });
    }

    #[test]
    fn test_overflowing_counts_are_rejected() {
        let counts = CharacterCounts::new(i64::MAX, 1, 0, 0);
        assert_eq!(counts.total(), None);
        let err = generate_password(&counts).unwrap_err();
        assert_eq!(err, GeneratorError::TooLong { max: MAX_PASSWORD_LENGTH });
    }

    #[test]
    fn test_length_limit() {
        let at_limit = CharacterCounts::new(MAX_PASSWORD_LENGTH - 3, 1, 1, 1);
        assert_eq!(generate_password(&at_limit).unwrap().len() as i64, MAX_PASSWORD_LENGTH);

        let too_long = CharacterCounts::new(MAX_PASSWORD_LENGTH, 0, 0, 1);
        assert_eq!(
            generate_password(&too_long).unwrap_err(),
            GeneratorError::TooLong { max: MAX_PASSWORD_LENGTH }
        );
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let counts = CharacterCounts::default();
        let first = generate_password_with_rng(&counts, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = generate_password_with_rng(&counts, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_password_randomness() {
        let counts = CharacterCounts::new(5, 5, 5, 5);
        let password_1 = generate_password(&counts).unwrap();
        let password_2 = generate_password(&counts).unwrap();
        assert_ne!(password_1, password_2, "Passwords generated with the same counts should generally differ.");
    }
}

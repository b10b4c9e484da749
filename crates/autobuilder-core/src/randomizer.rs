//! Seedable random primitive source.
//!
//! [`Randomizer`] wraps a ChaCha8 generator behind a `parking_lot::Mutex`, so a
//! single instance can be shared across threads by cloning it (clones share
//! state). Each generation context gets its own instance by default; with a
//! fixed seed every draw is reproducible.
//!
//! Range arguments are inclusive on both ends unless stated otherwise, and
//! invalid arguments return [`GenerateError`] instead of panicking.

use crate::error::{GenerateError, GenerateResult};
use autobuilder_types::Decimal;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use uuid::Uuid;

/// Fractional digits of generated decimals.
pub const DECIMAL_SCALE: u32 = 6;

const ALPHA_NUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const HEX_DIGITS: &[u8] = b"0123456789abcdef";
const UPPER_LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Widest date window accepted: 100,000 years.
pub const MAX_DATE_WINDOW_DAYS: i64 = 36_500_000;

#[derive(Clone)]
pub struct Randomizer {
    rng: Arc<Mutex<ChaCha8Rng>>,
    seed: Option<u64>,
}

impl std::fmt::Debug for Randomizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Randomizer").field("seed", &self.seed).finish()
    }
}

impl Default for Randomizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Randomizer {
    /// Seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Arc::new(Mutex::new(ChaCha8Rng::from_entropy())),
            seed: None,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
            seed: Some(seed),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Reset the shared state. Affects every clone.
    pub fn reseed(&mut self, seed: u64) {
        *self.rng.lock() = ChaCha8Rng::seed_from_u64(seed);
        self.seed = Some(seed);
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut ChaCha8Rng) -> T) -> T {
        let mut rng = self.rng.lock();
        f(&mut rng)
    }

    // --- integers ---

    /// Uniform integer in `[min, max]`.
    pub fn number(&self, min: i32, max: i32) -> GenerateResult<i32> {
        if min > max {
            return Err(GenerateError::invalid_range(min, max));
        }
        if min == i32::MIN && max == i32::MAX {
            return Ok(self.full_int());
        }
        Ok(self.with_rng(|rng| rng.gen_range(min..=max)))
    }

    /// Uniform integer over the whole `i32` domain, composed from two 16-bit draws.
    pub fn full_int(&self) -> i32 {
        self.with_rng(|rng| {
            let s1: u32 = rng.gen_range(0..i32::MAX as u32);
            let s2: u32 = rng.gen_range(0..i32::MAX as u32);
            (((s1 >> 8) & 0xFFFF) << 16 | ((s2 >> 8) & 0xFFFF)) as i32
        })
    }

    /// Even integer in `[min, max]`.
    pub fn even(&self, min: i32, max: i32) -> GenerateResult<i32> {
        if min > max {
            return Err(GenerateError::invalid_range(min, max));
        }
        let lo = (min as i64).div_euclid(2) + (min as i64).rem_euclid(2);
        let hi = (max as i64).div_euclid(2);
        if lo > hi {
            return Err(GenerateError::invalid_argument(
                "max",
                format!("no even number in [{}, {}]", min, max),
            ));
        }
        Ok(self.with_rng(|rng| rng.gen_range(lo..=hi) * 2) as i32)
    }

    /// Odd integer in `[min, max]`.
    pub fn odd(&self, min: i32, max: i32) -> GenerateResult<i32> {
        if min > max {
            return Err(GenerateError::invalid_range(min, max));
        }
        let lo = (min as i64 - 1).div_euclid(2) + (min as i64 - 1).rem_euclid(2);
        let hi = (max as i64 - 1).div_euclid(2);
        if lo > hi {
            return Err(GenerateError::invalid_argument(
                "max",
                format!("no odd number in [{}, {}]", min, max),
            ));
        }
        Ok((self.with_rng(|rng| rng.gen_range(lo..=hi)) * 2 + 1) as i32)
    }

    /// `count` digits, each in `[min_digit, max_digit]`.
    pub fn digits(&self, count: usize, min_digit: u8, max_digit: u8) -> GenerateResult<Vec<u8>> {
        if max_digit > 9 {
            return Err(GenerateError::invalid_argument("max_digit", "must be at most 9"));
        }
        if min_digit > max_digit {
            return Err(GenerateError::invalid_range(min_digit, max_digit));
        }
        Ok(self.with_rng(|rng| (0..count).map(|_| rng.gen_range(min_digit..=max_digit)).collect()))
    }

    pub fn long(&self, min: i64, max: i64) -> GenerateResult<i64> {
        if min > max {
            return Err(GenerateError::invalid_range(min, max));
        }
        Ok(self.with_rng(|rng| rng.gen_range(min..=max)))
    }

    pub fn byte(&self) -> u8 {
        self.with_rng(|rng| rng.gen())
    }

    pub fn bytes(&self, count: usize) -> Vec<u8> {
        self.with_rng(|rng| (0..count).map(|_| rng.gen()).collect())
    }

    // --- floating point ---

    /// Uniform double in `[0, 1)`.
    pub fn double(&self) -> f64 {
        self.with_rng(|rng| rng.gen())
    }

    /// Uniform double in `[min, max)` (`min` when the bounds are equal).
    pub fn double_between(&self, min: f64, max: f64) -> GenerateResult<f64> {
        if !(min <= max) {
            return Err(GenerateError::invalid_range(min, max));
        }
        if min == max {
            return Ok(min);
        }
        Ok(min + (max - min) * self.double())
    }

    pub fn float_between(&self, min: f32, max: f32) -> GenerateResult<f32> {
        self.double_between(min as f64, max as f64).map(|v| v as f32)
    }

    pub fn decimal_between(&self, min: f64, max: f64) -> GenerateResult<Decimal> {
        self.double_between(min, max)
            .map(|v| Decimal::from_f64(v, DECIMAL_SCALE))
    }

    // --- booleans ---

    pub fn bool(&self) -> bool {
        self.with_rng(|rng| rng.gen())
    }

    /// `true` with probability `weight`.
    pub fn bool_weighted(&self, weight: f64) -> GenerateResult<bool> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(GenerateError::invalid_argument(
                "weight",
                format!("{} is not within [0, 1]", weight),
            ));
        }
        Ok(self.with_rng(|rng| rng.gen_bool(weight)))
    }

    // --- characters and text ---

    /// Character in `[min, max]`. Surrogate code points map to `min`.
    pub fn char_between(&self, min: char, max: char) -> GenerateResult<char> {
        if min > max {
            return Err(GenerateError::invalid_range(min, max));
        }
        let code = self.with_rng(|rng| rng.gen_range(min as u32..=max as u32));
        Ok(char::from_u32(code).unwrap_or(min))
    }

    pub fn chars(&self, min: char, max: char, count: usize) -> GenerateResult<Vec<char>> {
        (0..count).map(|_| self.char_between(min, max)).collect()
    }

    /// `length` characters from the range `[min, max]`.
    pub fn string(&self, length: usize, min: char, max: char) -> GenerateResult<String> {
        Ok(self.chars(min, max, length)?.into_iter().collect())
    }

    /// `length` characters drawn uniformly from `pool`.
    pub fn string_from_pool(&self, length: usize, pool: &str) -> GenerateResult<String> {
        let pool: Vec<char> = pool.chars().collect();
        if pool.is_empty() && length > 0 {
            return Err(GenerateError::invalid_argument("pool", "must not be empty"));
        }
        Ok(self.with_rng(|rng| (0..length).map(|_| pool[rng.gen_range(0..pool.len())]).collect()))
    }

    /// Text from `pool` with a length in `[min_length, max_length]`.
    pub fn string_between(
        &self,
        min_length: usize,
        max_length: usize,
        pool: &str,
    ) -> GenerateResult<String> {
        if min_length > max_length {
            return Err(GenerateError::invalid_range(min_length, max_length));
        }
        let length = self.with_rng(|rng| rng.gen_range(min_length..=max_length));
        self.string_from_pool(length, pool)
    }

    pub fn alpha_numeric(&self, length: usize) -> String {
        self.pick_ascii(length, ALPHA_NUMERIC)
    }

    pub fn hexadecimal(&self, length: usize, prefix: &str) -> String {
        format!("{}{}", prefix, self.pick_ascii(length, HEX_DIGITS))
    }

    fn pick_ascii(&self, length: usize, pool: &[u8]) -> String {
        self.with_rng(|rng| {
            (0..length)
                .map(|_| pool[rng.gen_range(0..pool.len())] as char)
                .collect()
        })
    }

    /// Replace every `symbol` in `format` with a random digit.
    pub fn replace_numbers(&self, format: &str, symbol: char) -> String {
        self.with_rng(|rng| {
            format
                .chars()
                .map(|c| {
                    if c == symbol {
                        char::from(b'0' + rng.gen_range(0..10u8))
                    } else {
                        c
                    }
                })
                .collect()
        })
    }

    /// `#` becomes a digit, `?` an upper-case letter, `*` either.
    pub fn replace(&self, format: &str) -> String {
        self.with_rng(|rng| {
            format
                .chars()
                .map(|c| match c {
                    '#' => char::from(b'0' + rng.gen_range(0..10u8)),
                    '?' => UPPER_LETTERS[rng.gen_range(0..UPPER_LETTERS.len())] as char,
                    '*' if rng.gen::<bool>() => char::from(b'0' + rng.gen_range(0..10u8)),
                    '*' => UPPER_LETTERS[rng.gen_range(0..UPPER_LETTERS.len())] as char,
                    other => other,
                })
                .collect()
        })
    }

    /// Truncate `value` to `max_length` characters, padding with random
    /// alphanumerics up to `min_length`.
    pub fn clamp_string(
        &self,
        value: &str,
        min_length: usize,
        max_length: usize,
    ) -> GenerateResult<String> {
        if min_length > max_length {
            return Err(GenerateError::invalid_range(min_length, max_length));
        }
        let mut clamped: String = value.chars().take(max_length).collect();
        let len = clamped.chars().count();
        if len < min_length {
            clamped.push_str(&self.alpha_numeric(min_length - len));
        }
        Ok(clamped)
    }

    // --- identifiers and dates ---

    /// Version 4 UUID drawn from the seeded state.
    pub fn uuid(&self) -> Uuid {
        let bytes: [u8; 16] = self.with_rng(|rng| rng.gen());
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }

    /// Instant within `days` days before `reference` (default: now).
    pub fn date(&self, days: i64, reference: Option<DateTime<Utc>>) -> GenerateResult<DateTime<Utc>> {
        if days < 0 {
            return Err(GenerateError::invalid_argument("days", "must not be negative"));
        }
        let max = reference.unwrap_or_else(Utc::now);
        let window = days.checked_mul(MILLIS_PER_DAY).ok_or_else(|| {
            GenerateError::invalid_argument("days", format!("window of {} days is too wide", days))
        })?;
        let back = self.with_rng(|rng| rng.gen_range(0..=window));
        max.checked_sub_signed(Duration::milliseconds(back))
            .ok_or_else(|| {
                GenerateError::invalid_argument(
                    "days",
                    format!("window of {} days reaches past the earliest representable date", days),
                )
            })
    }

    // --- selection ---

    /// One element chosen uniformly.
    pub fn element<'a, T>(&self, items: &'a [T]) -> GenerateResult<&'a T> {
        if items.is_empty() {
            return Err(GenerateError::invalid_argument("items", "must not be empty"));
        }
        let index = self.with_rng(|rng| rng.gen_range(0..items.len()));
        Ok(&items[index])
    }

    /// `count` distinct positions, without replacement.
    pub fn elements<T: Clone>(&self, items: &[T], count: usize) -> GenerateResult<Vec<T>> {
        if count > items.len() {
            return Err(GenerateError::invalid_argument(
                "count",
                format!("cannot pick {} of {} items", count, items.len()),
            ));
        }
        let mut picked = items.to_vec();
        self.shuffle(&mut picked);
        picked.truncate(count);
        Ok(picked)
    }

    pub fn shuffle<T>(&self, items: &mut [T]) {
        self.with_rng(|rng| items.shuffle(rng));
    }

    /// One enum variant, never one of `exclude`.
    pub fn enum_value(
        &self,
        type_name: &str,
        variants: &[String],
        exclude: &[String],
    ) -> GenerateResult<String> {
        let candidates = Self::enum_candidates(type_name, variants, exclude)?;
        self.element(&candidates).map(|v| v.to_string())
    }

    /// Several distinct enum variants. `count: None` picks a random count.
    pub fn enum_values(
        &self,
        type_name: &str,
        variants: &[String],
        count: Option<usize>,
        exclude: &[String],
    ) -> GenerateResult<Vec<String>> {
        let candidates = Self::enum_candidates(type_name, variants, exclude)?;
        let count = match count {
            Some(count) => count,
            None => self.with_rng(|rng| rng.gen_range(1..=candidates.len())),
        };
        Ok(self
            .elements(&candidates, count)?
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    fn enum_candidates<'a>(
        type_name: &str,
        variants: &'a [String],
        exclude: &[String],
    ) -> GenerateResult<Vec<&'a str>> {
        let candidates: Vec<&str> = variants
            .iter()
            .filter(|v| !exclude.contains(v))
            .map(String::as_str)
            .collect();
        if candidates.is_empty() {
            return Err(GenerateError::EnumExhausted {
                type_name: type_name.to_string(),
            });
        }
        Ok(candidates)
    }
}

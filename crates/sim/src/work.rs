// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CPU-bound busy work bounded by wall-clock time.

use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use rand::Rng;

/// Range candidates are drawn from before being forced odd.
pub const CANDIDATE_RANGE: RangeInclusive<u64> = 100_000..=1_000_000;

/// Trial division of an odd `n` by odd divisors up to `isqrt(n)`.
///
/// Even inputs are only tested against odd divisors, matching how the work
/// loop uses it; this is load generation, not a general primality test.
pub fn is_prime_odd(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut divisor = 3;
    while divisor * divisor <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// Spin on primality checks until `budget` of wall-clock time has passed.
///
/// Returns the number of candidates checked. The count depends on the
/// machine and on scheduling; only the elapsed time is bounded.
pub fn cpu_work_for<R: Rng + ?Sized>(budget: Duration, rng: &mut R) -> u64 {
    let deadline = deadline_after(budget);
    let mut units = 0;
    while deadline.is_none_or(|d| Instant::now() < d) {
        let candidate = rng.random_range(CANDIDATE_RANGE) | 1;
        std::hint::black_box(is_prime_odd(candidate));
        units += 1;
    }
    units
}

/// `None` when the budget runs past what an [`Instant`] can represent.
fn deadline_after(budget: Duration) -> Option<Instant> {
    Instant::now().checked_add(budget)
}

#[cfg(test)]
#[path = "work_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local display-name generation for simulated participants.

use rand::Rng;

use crate::participant::ParticipantName;

pub const FIRST_NAMES: [&str; 10] = [
    "Ada", "Bo", "Cy", "Dara", "Eli", "Fen", "Gus", "Hana", "Ivo", "Juno",
];

pub const LAST_NAMES: [&str; 10] = [
    "Lind", "Ferris", "Moreau", "Okafor", "Quist", "Sato", "Varga", "Walsh", "Yoon", "Zeller",
];

/// Generate `count` display names using the thread-local RNG.
pub fn generate_names(count: usize) -> Vec<ParticipantName> {
    generate_names_with(&mut rand::rng(), count)
}

/// Generate `count` display names of the form `"First Last #i"`.
///
/// First and last parts are sampled independently and may repeat; the 1-based
/// sequence suffix makes every full name unique.
pub fn generate_names_with<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<ParticipantName> {
    (1..=count)
        .map(|seq| {
            let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
            let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
            ParticipantName::new(format!("{first} {last} #{seq}"))
        })
        .collect()
}

#[cfg(test)]
#[path = "names_tests.rs"]
mod tests;

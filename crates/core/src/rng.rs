//! RNG module - token generation for fills and refills
//!
//! Every random token the engine places comes from a [`TokenSource`] owned
//! by the engine, so a seed fully determines a game.
//!
//! Provides a simple LCG ([`SimpleRng`]) as the default source.

use crate::types::Token;

/// Source of fresh tokens.
pub trait TokenSource {
    /// Produce a token in `[0, max_val)`. `max_val` is at least 1.
    fn next_token(&mut self, max_val: u8) -> Token;
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of a power-of-two LCG cycle with a
    /// short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current internal state (the seed to reproduce the remaining sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TokenSource for SimpleRng {
    fn next_token(&mut self, max_val: u8) -> Token {
        self.next_range(max_val as u32) as Token
    }
}

impl<T: TokenSource + ?Sized> TokenSource for &mut T {
    fn next_token(&mut self, max_val: u8) -> Token {
        (**self).next_token(max_val)
    }
}

impl<T: TokenSource + ?Sized> TokenSource for Box<T> {
    fn next_token(&mut self, max_val: u8) -> Token {
        (**self).next_token(max_val)
    }
}

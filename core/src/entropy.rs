//! Randomness behind floating registers and unresolved thresholds.

use std::collections::VecDeque;
use std::fmt;

/// Source of uniform integers in `0..bound`.
pub trait Entropy: Send {
    fn below(&mut self, bound: u32) -> u32;

    /// Uniform decimal digit, the value a floating register reads as.
    fn digit(&mut self) -> i64 {
        i64::from(self.below(10))
    }
}

/// Thread-local generator used outside of tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadEntropy;

impl Entropy for ThreadEntropy {
    fn below(&mut self, bound: u32) -> u32 {
        if bound <= 1 {
            return 0;
        }
        rand::random_range(0..bound)
    }
}

/// Replays a fixed sequence, reduced modulo the requested bound.
///
/// An empty script always yields zero.
#[derive(Clone, Default)]
pub struct ScriptedEntropy {
    script: VecDeque<u32>,
}

impl ScriptedEntropy {
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl fmt::Debug for ScriptedEntropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedEntropy")
            .field("remaining", &self.script.len())
            .finish()
    }
}

impl Entropy for ScriptedEntropy {
    fn below(&mut self, bound: u32) -> u32 {
        let Some(next) = self.script.pop_front() else {
            return 0;
        };
        self.script.push_back(next);
        next % bound.max(1)
    }
}

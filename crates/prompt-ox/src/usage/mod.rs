use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Token accounting for one inference call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl Usage {
    /// No usage reported.
    pub const NONE: Self = Self {
        prompt_tokens: 0,
        completion_tokens: 0,
        total_tokens: 0,
    };

    pub fn new(prompt_tokens: u64, completion_tokens: u64, total_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }

    /// Usage for providers that only report prompt and completion counts.
    pub fn from_counts(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self::new(
            prompt_tokens,
            completion_tokens,
            prompt_tokens + completion_tokens,
        )
    }

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl Add for Usage {
    type Output = Usage;

    fn add(mut self, other: Usage) -> Usage {
        self += other;
        self
    }
}

impl AddAssign for Usage {
    fn add_assign(&mut self, rhs: Self) {
        self.prompt_tokens += rhs.prompt_tokens;
        self.completion_tokens += rhs.completion_tokens;
        self.total_tokens += rhs.total_tokens;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_counts_sums_total() {
        let usage = Usage::from_counts(12, 30);
        assert_eq!(usage.total_tokens, 42);
        assert!(!usage.is_none());
        assert!(Usage::default().is_none());
    }

    #[test]
    fn usage_accumulates() {
        let mut total = Usage::NONE;
        total += Usage::from_counts(1, 2);
        let total = total + Usage::new(3, 4, 8);
        assert_eq!(total, Usage::new(4, 6, 11));
    }
}

/// Largest repeat count a digit prefix can build up.
pub const DEFAULT_MAX: u32 = 100;

/// Vim-style numeric prefix: `5j` moves down five times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accumulator {
    count: u32,
    max: u32,
}

impl Default for Accumulator {
    fn default() -> Self {
        Accumulator::new(DEFAULT_MAX)
    }
}

impl Accumulator {
    pub fn new(max: u32) -> Self {
        Accumulator { count: 0, max }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Append a decimal digit, saturating at the maximum.
    pub fn accumulate_digit(&mut self, digit: u32) {
        self.count = self
            .count
            .saturating_mul(10)
            .saturating_add(digit.min(9))
            .min(self.max);
    }

    /// Run `action` the accumulated number of times (at least once), then
    /// reset.
    pub fn execute(&mut self, mut action: impl FnMut()) {
        for _ in 0..self.take() {
            action();
        }
    }

    /// The repeat count (at least 1). Resets the prefix.
    pub fn take(&mut self) -> u32 {
        let times = self.count.max(1);
        self.reset();
        times
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

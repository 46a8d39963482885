// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Resend cooldown for one-time codes.

use std::time::Duration;

use tokio::time::Instant;

/// Countdown started when a code is sent. Resending is allowed once it
/// reaches zero.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    initial: Duration,
    started_at: Instant,
}

impl Countdown {
    pub fn start(initial: Duration) -> Self {
        Self {
            initial,
            started_at: Instant::now(),
        }
    }

    pub fn initial(&self) -> Duration {
        self.initial
    }

    pub fn remaining(&self) -> Duration {
        self.initial.saturating_sub(self.started_at.elapsed())
    }

    /// Whole seconds left, rounded up, as a countdown label shows them.
    pub fn remaining_secs(&self) -> u64 {
        let remaining = self.remaining();
        remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
    }

    pub fn is_elapsed(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Restart from the initial value.
    pub fn reset(&mut self) {
        self.started_at = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn counts_down_and_resets() {
        let mut countdown = Countdown::start(Duration::from_secs(60));
        assert_eq!(countdown.remaining_secs(), 60);
        assert!(!countdown.is_elapsed());

        tokio::time::advance(Duration::from_millis(59_500)).await;
        assert_eq!(countdown.remaining_secs(), 1);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(countdown.is_elapsed());
        assert_eq!(countdown.remaining_secs(), 0);

        countdown.reset();
        assert_eq!(countdown.remaining(), countdown.initial());
    }
}

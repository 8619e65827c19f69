//! Status lines cycled on the processing HUD.

use std::time::Duration;

/// Time each status line stays on screen.
pub const MESSAGE_STEP: Duration = Duration::from_secs(4);

/// Status lines in display order. The last one is held once reached.
pub const PROCESSING_MESSAGES: [&str; 8] = [
    "INITIALIZING NEURAL NETWORK...",
    "ANALYZING BIOMETRIC DATA...",
    "MAPPING FACIAL FEATURES...",
    "APPLYING MOS PARAMETERS...",
    "GENERATING TACTICAL PROFILE...",
    "ENHANCING MILITARY ATTRIBUTES...",
    "FINALIZING TRANSFORMATION...",
    "RECRUIT PROFILE COMPLETE",
];

/// Position in `PROCESSING_MESSAGES`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageCycle {
    index: usize,
}

impl MessageCycle {
    /// Moves to the next line, staying on the last one.
    pub fn advance(&mut self) {
        if self.index + 1 < PROCESSING_MESSAGES.len() {
            self.index += 1;
        }
    }

    /// The line currently shown.
    #[must_use]
    pub fn current(self) -> &'static str {
        PROCESSING_MESSAGES[self.index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_starts_at_first_message() {
        assert_eq!(MessageCycle::default().current(), "INITIALIZING NEURAL NETWORK...");
    }

    #[test]
    fn test_cycle_holds_last_message() {
        let mut cycle = MessageCycle::default();

        for _ in 0..20 {
            cycle.advance();
        }

        assert_eq!(cycle.current(), "RECRUIT PROFILE COMPLETE");
    }
}

//! Completion gate state machine.
//!
//! A pure, timer-free model of the processing screen. The driver feeds it
//! progress ticks, the generation result, the video-end signal and the
//! settle timer; the gate decides when the single forward transition
//! happens. Holding the result inside the gate makes the transition
//! single-shot: firing hands the result out, and there is nothing left to
//! hand out a second time.

/// Progress shown once generation has finished.
pub const COMPLETE_PERCENT: u8 = 100;

/// Joins generation completion and video end into one transition.
#[derive(Debug)]
pub struct CompletionGate<T> {
    cap: u8,
    progress: u8,
    generation_done: bool,
    video_done: bool,
    fired: bool,
    result: Option<T>,
}

impl<T> CompletionGate<T> {
    /// Creates a gate whose progress climbs no higher than `cap` while
    /// generation is outstanding.
    #[must_use]
    pub fn new(cap: u8) -> Self {
        Self {
            cap: cap.min(COMPLETE_PERCENT),
            progress: 0,
            generation_done: false,
            video_done: false,
            fired: false,
            result: None,
        }
    }

    /// Current progress percentage.
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Whether the generation result has arrived.
    #[must_use]
    pub fn generation_done(&self) -> bool {
        self.generation_done
    }

    /// Whether the presentation video has ended.
    #[must_use]
    pub fn video_done(&self) -> bool {
        self.video_done
    }

    /// Whether the transition has happened.
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Whether the settle delay should be running: generation is done,
    /// progress shows 100 and the transition is still pending.
    #[must_use]
    pub fn is_settling(&self) -> bool {
        self.generation_done && self.progress >= COMPLETE_PERCENT && !self.fired
    }

    /// One step of the progress climb. Returns the new percentage.
    pub fn tick(&mut self) -> u8 {
        if self.generation_done {
            self.progress = COMPLETE_PERCENT;
        } else if self.progress < self.cap {
            self.progress += 1;
        }
        self.progress
    }

    /// Records the generation result and completes the progress bar.
    ///
    /// A second result is ignored; the first one is what the transition
    /// carries.
    pub fn finish_generation(&mut self, result: T) {
        if self.generation_done {
            return;
        }
        self.generation_done = true;
        self.progress = COMPLETE_PERCENT;
        self.result = Some(result);
    }

    /// Records the end of the presentation video.
    ///
    /// Fires immediately if generation is already done. Otherwise this is a
    /// no-op for the transition and the progress path fires later.
    pub fn video_ended(&mut self) -> Option<T> {
        self.video_done = true;
        self.fire()
    }

    /// The settle delay has elapsed after progress reached 100.
    pub fn settle_elapsed(&mut self) -> Option<T> {
        self.fire()
    }

    fn fire(&mut self) -> Option<T> {
        if !self.is_settling() {
            return None;
        }
        self.fired = true;
        self.result.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_climbs_by_one_up_to_cap() {
        // Arrange
        let mut gate: CompletionGate<&str> = CompletionGate::new(95);

        // Act
        let first = gate.tick();
        for _ in 0..200 {
            gate.tick();
        }

        // Assert
        assert_eq!(first, 1);
        assert_eq!(gate.progress(), 95);
        assert!(!gate.is_settling());
    }

    #[test]
    fn test_finishing_generation_completes_progress() {
        let mut gate = CompletionGate::new(95);
        gate.tick();

        gate.finish_generation("pair");

        assert_eq!(gate.progress(), COMPLETE_PERCENT);
        assert!(gate.generation_done());
        assert!(gate.is_settling());
        assert_eq!(gate.tick(), COMPLETE_PERCENT);
    }

    #[test]
    fn test_video_end_before_generation_is_noop() {
        // Arrange
        let mut gate = CompletionGate::new(95);

        // Act
        let fired = gate.video_ended();

        // Assert
        assert_eq!(fired, None);
        assert!(gate.video_done());
        assert!(!gate.has_fired());

        // Generation landing later still fires through the settle path.
        gate.finish_generation("pair");
        assert_eq!(gate.settle_elapsed(), Some("pair"));
    }

    #[test]
    fn test_video_end_after_generation_fires_immediately() {
        let mut gate = CompletionGate::new(95);
        gate.finish_generation("pair");

        assert_eq!(gate.video_ended(), Some("pair"));
        assert!(gate.has_fired());
    }

    #[test]
    fn test_transition_fires_only_once() {
        // Arrange
        let mut gate = CompletionGate::new(95);
        gate.finish_generation("pair");

        // Act
        let by_video = gate.video_ended();
        let by_settle = gate.settle_elapsed();
        let by_video_again = gate.video_ended();

        // Assert
        assert_eq!(by_video, Some("pair"));
        assert_eq!(by_settle, None);
        assert_eq!(by_video_again, None);
        assert!(!gate.is_settling());
    }

    #[test]
    fn test_settle_before_generation_does_not_fire() {
        let mut gate: CompletionGate<&str> = CompletionGate::new(95);

        assert_eq!(gate.settle_elapsed(), None);
        assert!(!gate.has_fired());
    }

    #[test]
    fn test_second_result_is_ignored() {
        let mut gate = CompletionGate::new(95);
        gate.finish_generation("first");
        gate.finish_generation("second");

        assert_eq!(gate.settle_elapsed(), Some("first"));
    }

    #[test]
    fn test_cap_above_hundred_is_clamped() {
        let mut gate: CompletionGate<()> = CompletionGate::new(250);

        for _ in 0..300 {
            gate.tick();
        }

        assert_eq!(gate.progress(), COMPLETE_PERCENT);
        assert!(!gate.is_settling());
    }
}

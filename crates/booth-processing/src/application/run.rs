//! Processing screen driver.
//!
//! `ProcessingRun` owns every timer of the processing screen (progress
//! ticker, status-line ticker, settle delay) for exactly one screen
//! lifecycle. Dropping the run future cancels all of them, so repeated
//! entries into the processing screen never leak timers.

use std::future::Future;
use std::time::Duration;

use booth_core::config::Tunables;
use serde::Serialize;
use tokio::sync::{oneshot, watch};
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep_until};
use tracing::{debug, info};

use crate::domain::gate::CompletionGate;
use crate::domain::messages::{MESSAGE_STEP, MessageCycle};

/// What the presentation layer renders while processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Progress bar percentage.
    pub percent: u8,
    /// Whether generation is still outstanding.
    pub generating: bool,
    /// Current HUD status line.
    pub message: &'static str,
}

impl ProgressSnapshot {
    /// HUD status label.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        if self.generating { "GENERATING" } else { "COMPLETE" }
    }
}

/// Which path caused the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionTrigger {
    /// Progress reached 100 and the settle delay elapsed.
    Progress,
    /// The presentation video ended after generation had finished.
    VideoEnd,
}

/// Outcome of one processing screen lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion<T> {
    /// The generation result carried to the next screen.
    pub result: T,
    /// The path that fired the transition.
    pub trigger: CompletionTrigger,
}

/// One lifecycle of the processing screen.
#[derive(Debug)]
pub struct ProcessingRun {
    progress_step: Duration,
    settle_delay: Duration,
    progress_cap: u8,
    progress: watch::Sender<ProgressSnapshot>,
}

impl ProcessingRun {
    /// Creates a run and the receiver its progress is published on.
    #[must_use]
    pub fn new(tunables: &Tunables) -> (Self, watch::Receiver<ProgressSnapshot>) {
        let (progress, receiver) = watch::channel(ProgressSnapshot {
            percent: 0,
            generating: true,
            message: MessageCycle::default().current(),
        });
        let run = Self {
            progress_step: tunables.progress_step,
            settle_delay: tunables.settle_delay,
            progress_cap: tunables.progress_cap,
            progress,
        };
        (run, receiver)
    }

    /// Drives the screen until the transition fires and returns the
    /// generation result.
    ///
    /// `video_end` is the presentation collaborator's one-shot callback. If
    /// its sender is dropped without sending, the video is treated as never
    /// ending and only the progress path can fire.
    pub async fn run<T, F>(self, generation: F, video_end: oneshot::Receiver<()>) -> Completion<T>
    where
        F: Future<Output = T>,
    {
        let mut gate = CompletionGate::new(self.progress_cap);
        let mut messages = MessageCycle::default();

        let start = Instant::now();
        let mut progress_ticker = interval_at(start + self.progress_step, self.progress_step);
        progress_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut message_ticker = interval_at(start + MESSAGE_STEP, MESSAGE_STEP);
        message_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let settle = sleep_until(start);
        tokio::pin!(settle, generation, video_end);
        let mut settle_armed = false;
        let mut video_pending = true;

        loop {
            tokio::select! {
                _ = progress_ticker.tick() => {
                    gate.tick();
                }
                _ = message_ticker.tick() => {
                    messages.advance();
                }
                result = &mut generation, if !gate.generation_done() => {
                    info!(elapsed_ms = elapsed_ms(start), "generation finished");
                    gate.finish_generation(result);
                }
                signal = &mut video_end, if video_pending => {
                    video_pending = false;
                    if signal.is_ok() {
                        debug!(generation_done = gate.generation_done(), "presentation video ended");
                        if let Some(result) = gate.video_ended() {
                            return self.complete(&gate, messages, result, CompletionTrigger::VideoEnd);
                        }
                    }
                }
                () = &mut settle, if settle_armed => {
                    if let Some(result) = gate.settle_elapsed() {
                        return self.complete(&gate, messages, result, CompletionTrigger::Progress);
                    }
                }
            }

            if gate.is_settling() && !settle_armed {
                settle.as_mut().reset(Instant::now() + self.settle_delay);
                settle_armed = true;
            }
            self.publish(&gate, messages);
        }
    }

    fn publish<T>(&self, gate: &CompletionGate<T>, messages: MessageCycle) {
        self.progress.send_replace(ProgressSnapshot {
            percent: gate.progress(),
            generating: !gate.generation_done(),
            message: messages.current(),
        });
    }

    fn complete<T>(
        &self,
        gate: &CompletionGate<T>,
        messages: MessageCycle,
        result: T,
        trigger: CompletionTrigger,
    ) -> Completion<T> {
        self.publish(gate, messages);
        info!(?trigger, "processing complete");
        Completion { result, trigger }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use tokio::time::sleep;

    use super::*;

    fn generation_after(delay: Duration) -> impl Future<Output = &'static str> {
        async move {
            sleep(delay).await;
            "pair"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_path_fires_after_settle_delay() {
        // Arrange
        let (run, progress) = ProcessingRun::new(&Tunables::default());
        let (_video, video_end) = oneshot::channel();
        let started = Instant::now();

        // Act
        let completion = run
            .run(generation_after(Duration::from_secs(10)), video_end)
            .await;

        // Assert
        assert_eq!(completion.result, "pair");
        assert_eq!(completion.trigger, CompletionTrigger::Progress);
        assert_eq!(started.elapsed(), Duration::from_millis(11_500));
        let last = *progress.borrow();
        assert_eq!(last.percent, 100);
        assert_eq!(last.status_label(), "COMPLETE");
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_climbs_one_percent_per_step() {
        // Arrange
        let (run, progress) = ProcessingRun::new(&Tunables::default());
        let (_video, video_end) = oneshot::channel();
        let handle = tokio::spawn(run.run(generation_after(Duration::from_secs(60)), video_end));

        // Act
        sleep(Duration::from_millis(4_300)).await;
        let early = *progress.borrow();

        // Assert
        assert_eq!(early.percent, 10);
        assert!(early.generating);
        assert_eq!(early.status_label(), "GENERATING");
        assert_eq!(early.message, "ANALYZING BIOMETRIC DATA...");

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_holds_at_cap_while_generating() {
        let (run, progress) = ProcessingRun::new(&Tunables::default());
        let (_video, video_end) = oneshot::channel();
        let handle = tokio::spawn(run.run(generation_after(Duration::from_secs(90)), video_end));

        sleep(Duration::from_secs(60)).await;

        assert_eq!(progress.borrow().percent, 95);
        assert_eq!(progress.borrow().message, "RECRUIT PROFILE COMPLETE");
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_video_end_after_generation_fires_immediately() {
        // Arrange
        let (run, _progress) = ProcessingRun::new(&Tunables::default());
        let (video, video_end) = oneshot::channel();
        let started = Instant::now();
        tokio::spawn(async move {
            sleep(Duration::from_millis(10_700)).await;
            let _ = video.send(());
        });

        // Act
        let completion = run
            .run(generation_after(Duration::from_secs(10)), video_end)
            .await;

        // Assert
        assert_eq!(completion.trigger, CompletionTrigger::VideoEnd);
        assert_eq!(started.elapsed(), Duration::from_millis(10_700));
    }

    #[tokio::test(start_paused = true)]
    async fn test_video_end_before_generation_waits_for_progress_path() {
        // Arrange
        let (run, _progress) = ProcessingRun::new(&Tunables::default());
        let (video, video_end) = oneshot::channel();
        video.send(()).unwrap();
        let started = Instant::now();

        // Act
        let completion = run
            .run(generation_after(Duration::from_secs(30)), video_end)
            .await;

        // Assert
        assert_eq!(completion.trigger, CompletionTrigger::Progress);
        assert_eq!(started.elapsed(), Duration::from_millis(31_500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_video_sender_never_fires() {
        let (run, _progress) = ProcessingRun::new(&Tunables::default());
        let (video, video_end) = oneshot::channel::<()>();
        drop(video);

        let completion = run
            .run(generation_after(Duration::from_secs(3)), video_end)
            .await;

        assert_eq!(completion.trigger, CompletionTrigger::Progress);
    }

    #[tokio::test(start_paused = true)]
    async fn test_video_end_during_settle_fires_once() {
        // Arrange
        let (run, _progress) = ProcessingRun::new(&Tunables::default());
        let (video, video_end) = oneshot::channel();
        tokio::spawn(async move {
            sleep(Duration::from_millis(5_500)).await;
            let _ = video.send(());
        });
        let started = Instant::now();

        // Act
        let completion = run
            .run(generation_after(Duration::from_secs(5)), video_end)
            .await;
        sleep(Duration::from_secs(5)).await;

        // Assert
        assert_eq!(completion.trigger, CompletionTrigger::VideoEnd);
        assert_eq!(completion.result, "pair");
        assert_eq!(started.elapsed(), Duration::from_millis(10_500));
    }
}

use std::fmt;
use std::time::Duration;

use log::{error, info, warn};

use crate::state::LoopState;
use crate::timer::{CancelHandle, LoopTimer};

/// Anything that can be shown or hidden as one frame of the loop.
pub trait FrameMarker {
    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleError {
    /// No frame is active when an advance is due (or the sequence is empty).
    LostActiveFrame,
    AlreadyStarted,
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleError::LostActiveFrame => {
                write!(f, "unable to determine currently visible frame")
            }
            CycleError::AlreadyStarted => write!(f, "animation loop already started"),
        }
    }
}

impl std::error::Error for CycleError {}

/// Walks a fixed sequence of frames in a circle, one visible at a time,
/// holding the last frame longer than the others.
pub struct FrameCycler<F: FrameMarker> {
    frames: Vec<F>,
    active: Option<usize>,

    short_delay: Duration,
    long_delay: Duration,

    timer: LoopTimer,
    state: LoopState,
    loops_completed: usize,
}

impl<F: FrameMarker> FrameCycler<F> {
    pub fn with_delays(frames: Vec<F>, short_delay: Duration, long_delay: Duration) -> Self {
        Self {
            frames,
            active: None,
            short_delay,
            long_delay,
            timer: LoopTimer::new(),
            state: LoopState::Idle,
            loops_completed: 0,
        }
    }

    /// Picks the initial active frame and schedules the first advance.
    pub fn start(&mut self, initial_delay: Duration) -> Result<usize, CycleError> {
        if self.state != LoopState::Idle {
            return Err(CycleError::AlreadyStarted);
        }
        if self.frames.is_empty() {
            return Err(self.lose_active_frame());
        }

        let marked: Vec<usize> = self
            .frames
            .iter()
            .enumerate()
            .filter(|(_, frame)| frame.is_visible())
            .map(|(i, _)| i)
            .collect();

        let first = match marked.as_slice() {
            [] => {
                self.frames[0].set_visible(true);
                0
            }
            [only] => *only,
            [first, rest @ ..] => {
                warn!(
                    "{} frames marked visible at start, keeping frame {} and hiding the rest",
                    marked.len(),
                    first
                );
                for &i in rest {
                    self.frames[i].set_visible(false);
                }
                *first
            }
        };

        self.active = Some(first);
        self.state = LoopState::Running;
        self.timer.arm(initial_delay);
        Ok(first)
    }

    /// Moves the visible marker to the next frame and schedules the advance after it.
    pub fn advance(&mut self) -> Result<usize, CycleError> {
        let Some(current) = self.active.filter(|&i| i < self.frames.len()) else {
            return Err(self.lose_active_frame());
        };

        let next = (current + 1) % self.frames.len();

        // Mark then clear; a single frame is its own successor and stays visible
        self.frames[next].set_visible(true);
        if next != current {
            self.frames[current].set_visible(false);
        }
        if next == 0 {
            self.loops_completed += 1;
        }

        self.active = Some(next);
        self.timer.arm(self.delay_after(next));
        Ok(next)
    }

    /// Feeds elapsed time to the pending delay, advancing when it runs out.
    pub fn update(&mut self, elapsed: Duration) -> Result<Option<usize>, CycleError> {
        if self.state != LoopState::Running {
            return Ok(None);
        }
        if self.timer.tick(elapsed) {
            return self.advance().map(Some);
        }
        if self.timer.cancel_handle().is_cancelled() {
            info!("Animation loop cancelled");
            self.state = LoopState::Halted;
        }
        Ok(None)
    }

    /// Delay to wait once `index` became the visible frame.
    pub fn delay_after(&self, index: usize) -> Duration {
        if index + 1 == self.frames.len() {
            self.long_delay
        } else {
            self.short_delay
        }
    }

    /// Hides every frame and forgets the active one.
    pub fn clear(&mut self) {
        for frame in self.frames.iter_mut() {
            frame.set_visible(false);
        }
        self.active = None;
    }

    /// Cancels the pending advance; the visible frame stays on screen.
    pub fn stop(&mut self) {
        self.timer.disarm();
        if self.state == LoopState::Running {
            self.state = LoopState::Halted;
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.timer.cancel_handle()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    #[cfg(test)]
    pub fn pending_delay(&self) -> Option<Duration> {
        self.timer.pending_delay()
    }

    pub fn loops_completed(&self) -> usize {
        self.loops_completed
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[F] {
        &self.frames
    }

    #[cfg(test)]
    pub fn frames_mut(&mut self) -> &mut [F] {
        &mut self.frames
    }

    fn lose_active_frame(&mut self) -> CycleError {
        error!("Unable to determine currently visible frame. Animation loop terminated.");
        self.timer.disarm();
        self.state = LoopState::Halted;
        CycleError::LostActiveFrame
    }
}

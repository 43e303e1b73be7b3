//! Drives a step function to completion.
//!
//! The runner owns the cadence; the walker owns the state. Calling
//! [`Runner::run`] or calling [`Runner::run_for`] once per frame produces
//! the same drawing.

use std::time::{Duration, Instant};

use crate::error::{Result, SkylineError};
use crate::pen::Pen;
use crate::scene::Scene;

/// Default cap on the number of steps of a run.
pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

/// Time budget per frame in animated mode.
pub const FRAME_BUDGET: Duration = Duration::from_millis(10);

/// A step function: `walk(i)` does step `i` and says whether to go on.
pub trait Walk {
    fn walk(&mut self, step: usize) -> Result<bool>;
}

impl<P: Pen> Walk for Scene<P> {
    fn walk(&mut self, step: usize) -> Result<bool> {
        Scene::walk(self, step)
    }
}

impl<F> Walk for F
where
    F: FnMut(usize) -> Result<bool>,
{
    fn walk(&mut self, step: usize) -> Result<bool> {
        self(step)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Finished,
}

pub struct Runner<W: Walk> {
    walker: W,
    state: RunState,
    next_step: usize,
    max_steps: usize,
    error: Option<SkylineError>,
}

impl<W: Walk> Runner<W> {
    pub fn new(walker: W) -> Self {
        Self {
            walker,
            state: RunState::NotStarted,
            next_step: 0,
            max_steps: DEFAULT_MAX_STEPS,
            error: None,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == RunState::Finished
    }

    /// Number of `walk` calls issued so far.
    pub fn steps(&self) -> usize {
        self.next_step
    }

    /// The error that ended the run, if one did.
    pub fn error(&self) -> Option<&SkylineError> {
        self.error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<SkylineError> {
        self.error.take()
    }

    pub fn walker(&self) -> &W {
        &self.walker
    }

    pub fn walker_mut(&mut self) -> &mut W {
        &mut self.walker
    }

    pub fn into_walker(self) -> W {
        self.walker
    }

    /// Issues one step. Returns whether the run is still going.
    pub fn step_once(&mut self) -> bool {
        if self.state == RunState::Finished {
            return false;
        }
        if self.next_step >= self.max_steps {
            log::info!("step cap of {} reached", self.max_steps);
            self.state = RunState::Finished;
            return false;
        }

        self.state = RunState::Running;
        let step = self.next_step;
        let result = self.walker.walk(step);
        self.next_step += 1;

        match result {
            Ok(true) if self.next_step < self.max_steps => true,
            Ok(true) => {
                log::info!("step cap of {} reached", self.max_steps);
                self.state = RunState::Finished;
                false
            }
            Ok(false) => {
                log::info!("run finished after {} steps", self.next_step);
                self.state = RunState::Finished;
                false
            }
            Err(err) => {
                log::error!("step {step} failed, stopping: {err}");
                self.error = Some(err);
                self.state = RunState::Finished;
                false
            }
        }
    }

    /// Steps until the run finishes.
    pub fn run(&mut self) -> RunState {
        while self.step_once() {}
        self.state
    }

    /// Steps until `budget` is spent or the run finishes. Returns whether
    /// the run is still going.
    pub fn run_for(&mut self, budget: Duration) -> bool {
        let start = Instant::now();
        loop {
            if !self.step_once() {
                return false;
            }
            if start.elapsed() >= budget {
                return true;
            }
        }
    }

    /// Cancels the run. No further steps are issued.
    pub fn stop(&mut self) {
        if self.state != RunState::Finished {
            log::info!("run stopped after {} steps", self.next_step);
            self.state = RunState::Finished;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_until_walker_says_stop() {
        let mut calls = Vec::new();
        let mut runner = Runner::new(|i: usize| -> Result<bool> {
            calls.push(i);
            Ok(i < 4)
        });
        assert_eq!(runner.state(), RunState::NotStarted);
        assert_eq!(runner.run(), RunState::Finished);
        assert_eq!(runner.steps(), 5);
        drop(runner);
        assert_eq!(calls, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn step_cap_ends_endless_walker() {
        let mut runner = Runner::new(|_: usize| -> Result<bool> { Ok(true) }).with_max_steps(10);
        runner.run();
        assert_eq!(runner.steps(), 10);
        assert!(runner.error().is_none());
        assert!(!runner.step_once());
        assert_eq!(runner.steps(), 10);
    }

    #[test]
    fn error_terminates_and_is_kept() {
        let mut runner = Runner::new(|i: usize| -> Result<bool> {
            if i == 2 {
                Err(SkylineError::StepFailed {
                    step: i,
                    reason: "boom".into(),
                })
            } else {
                Ok(true)
            }
        });
        assert_eq!(runner.run(), RunState::Finished);
        assert_eq!(runner.steps(), 3);
        assert!(matches!(
            runner.error(),
            Some(SkylineError::StepFailed { step: 2, .. })
        ));
    }

    #[test]
    fn state_moves_forward_only() {
        let mut runner = Runner::new(|i: usize| -> Result<bool> { Ok(i < 1) });
        assert!(runner.step_once());
        assert_eq!(runner.state(), RunState::Running);
        assert!(!runner.step_once());
        assert_eq!(runner.state(), RunState::Finished);
        assert!(!runner.step_once());
        assert_eq!(runner.state(), RunState::Finished);
    }

    #[test]
    fn stop_cancels_further_steps() {
        let mut runner = Runner::new(|_: usize| -> Result<bool> { Ok(true) });
        runner.step_once();
        runner.stop();
        assert!(!runner.run_for(Duration::from_millis(5)));
        assert_eq!(runner.steps(), 1);
    }

    #[test]
    fn time_sliced_run_matches_tight_loop() {
        let walker = || {
            let mut total = 0usize;
            move |i: usize| -> Result<bool> {
                total += i;
                Ok(total < 100)
            }
        };
        let mut tight = Runner::new(walker());
        tight.run();

        let mut sliced = Runner::new(walker());
        while sliced.run_for(Duration::ZERO) {}
        assert_eq!(tight.steps(), sliced.steps());
    }

    #[test]
    fn drives_a_scene() {
        use crate::config::SceneConfig;
        use crate::pen::StrokeLog;

        let mut config = SceneConfig::default();
        config.depth = 2;
        let scene = Scene::new(config, StrokeLog::new()).unwrap();
        let mut runner = Runner::new(scene);
        runner.run();
        // Two rows plus the call that reports the end.
        assert_eq!(runner.steps(), 3);
        assert!(runner.walker().is_finished());
    }
}

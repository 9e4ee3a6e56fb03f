use std::num::NonZeroU32;

use crate::TaskStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Waiting,
    Done,
    Failed,
    TimedOut,
}

/// One status query outcome fed into the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    Status(TaskStatus),
    /// The query itself failed. Counts as an attempt but never ends the session.
    QueryFailed,
}

/// What the driver has to do after an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    /// Sleep one interval, then query again as attempt `next_attempt`.
    Wait { next_attempt: u32 },
    FetchResult,
    Fail,
    GiveUp,
}

/// Pure create → poll → fetch state machine.
///
/// Attempts are numbered `1..=max_attempts`. The machine never asks for a
/// wait after the last attempt, so a session that times out performs
/// exactly `max_attempts` queries and `max_attempts - 1` waits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollMachine {
    max_attempts: u32,
    attempts: u32,
    state: PollState,
}

impl PollMachine {
    pub fn new(max_attempts: NonZeroU32) -> Self {
        Self {
            max_attempts: max_attempts.get(),
            attempts: 0,
            state: PollState::Waiting,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Number of observations consumed so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Attempt number the next observation will be recorded under.
    pub fn next_attempt(&self) -> u32 {
        self.attempts + 1
    }

    /// Applies one observation. Observations after a terminal state are
    /// ignored and the terminal step is repeated.
    pub fn observe(&mut self, observation: Observation) -> PollStep {
        if self.state != PollState::Waiting {
            return self.terminal_step();
        }

        self.attempts += 1;
        match observation {
            Observation::Status(TaskStatus::Completed) => self.state = PollState::Done,
            Observation::Status(TaskStatus::Failed) => self.state = PollState::Failed,
            Observation::Status(_) | Observation::QueryFailed => {
                if self.attempts < self.max_attempts {
                    return PollStep::Wait {
                        next_attempt: self.attempts + 1,
                    };
                }
                self.state = PollState::TimedOut;
            }
        }
        self.terminal_step()
    }

    fn terminal_step(&self) -> PollStep {
        match self.state {
            PollState::Done => PollStep::FetchResult,
            PollState::Failed => PollStep::Fail,
            PollState::TimedOut => PollStep::GiveUp,
            PollState::Waiting => PollStep::Wait {
                next_attempt: self.attempts + 1,
            },
        }
    }
}

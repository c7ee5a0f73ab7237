use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::stats::format_clock;
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockState {
    #[default]
    NotStarted,
    Running,
    Paused,
    Finished,
}

impl ClockState {
    pub fn label(&self) -> &'static str {
        match self {
            ClockState::NotStarted => "not started",
            ClockState::Running => "running",
            ClockState::Paused => "paused",
            ClockState::Finished => "finished",
        }
    }
}

/// What a single second (or a manual quarter advance) did to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The clock was not running; nothing changed.
    Idle,
    Counted,
    QuarterBegan(u8),
    Finished,
}

/// Countdown within a quarter, the quarter number and the run state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameClock {
    time_left: u32,
    quarter: u8,
    state: ClockState,
    quarter_length: u32,
    quarters: u8,
}

impl GameClock {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            time_left: config.quarter_length,
            quarter: 1,
            state: ClockState::NotStarted,
            quarter_length: config.quarter_length,
            quarters: config.quarters,
        }
    }

    /// Rebuild a clock from stored values. A clock stored while running comes
    /// back paused, since nothing is ticking yet. A countdown longer than the
    /// configured quarter (the length changed between sessions) is cut down to
    /// a full quarter.
    pub fn restore(config: &GameConfig, time_left: u32, quarter: u8, state: ClockState) -> Result<Self> {
        if quarter == 0 || quarter > config.quarters {
            return Err(GameError::Validation(format!(
                "quarter {quarter} is outside 1..={}",
                config.quarters
            )));
        }
        if time_left > config.quarter_length {
            warn!(
                "saved countdown {time_left}s exceeds the {}s quarter, clamping",
                config.quarter_length
            );
        }
        let time_left = time_left.min(config.quarter_length);
        let state = match state {
            ClockState::Running => ClockState::Paused,
            other => other,
        };
        Ok(Self {
            time_left,
            quarter,
            state,
            quarter_length: config.quarter_length,
            quarters: config.quarters,
        })
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == ClockState::Paused
    }

    /// True once the countdown has been started and has not finished, paused or not.
    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running | ClockState::Paused)
    }

    pub fn is_ticking(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn is_finished(&self) -> bool {
        self.state == ClockState::Finished
    }

    pub fn has_started(&self) -> bool {
        self.state != ClockState::NotStarted
    }

    pub fn start(&mut self) -> Result<()> {
        self.transition(ClockState::NotStarted, ClockState::Running, "start the clock")
    }

    pub fn pause(&mut self) -> Result<()> {
        self.transition(ClockState::Running, ClockState::Paused, "pause")
    }

    pub fn resume(&mut self) -> Result<()> {
        self.transition(ClockState::Paused, ClockState::Running, "resume")
    }

    /// Count down one second. Only a running clock moves.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != ClockState::Running {
            return TickOutcome::Idle;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.roll_over()
        } else {
            TickOutcome::Counted
        }
    }

    /// End the current quarter early. Allowed while running or paused.
    pub fn end_quarter(&mut self) -> Result<TickOutcome> {
        if !self.is_running() {
            return Err(GameError::ClockTransition {
                state: self.state.label(),
                action: "advance the quarter",
            });
        }
        self.time_left = 0;
        Ok(self.roll_over())
    }

    /// Refill the current quarter and stop the countdown. Allowed while
    /// running or paused; the quarter number is kept.
    pub fn reset_quarter(&mut self) -> Result<()> {
        if !self.is_running() {
            return Err(GameError::ClockTransition {
                state: self.state.label(),
                action: "reset the timer",
            });
        }
        self.time_left = self.quarter_length;
        self.state = ClockState::Paused;
        Ok(())
    }

    /// Take over the countdown that ran on `live` since this clock was
    /// captured. Only applies inside the same quarter and only ever moves the
    /// countdown down, so a refilled quarter is not carried back.
    pub(crate) fn keep_countdown(&mut self, live: &GameClock) {
        if self.is_running() && live.has_started() && live.quarter == self.quarter {
            self.time_left = self.time_left.min(live.time_left);
        }
    }

    fn roll_over(&mut self) -> TickOutcome {
        if self.quarter < self.quarters {
            self.quarter += 1;
            self.time_left = self.quarter_length;
            TickOutcome::QuarterBegan(self.quarter)
        } else {
            self.state = ClockState::Finished;
            TickOutcome::Finished
        }
    }

    fn transition(&mut self, from: ClockState, to: ClockState, action: &'static str) -> Result<()> {
        if self.state != from {
            return Err(GameError::ClockTransition {
                state: self.state.label(),
                action,
            });
        }
        self.state = to;
        Ok(())
    }

    /// "(2nd Quarter 9:58)"
    pub fn display(&self) -> String {
        format!("({} {})", quarter_name(self.quarter), format_clock(self.time_left))
    }
}

pub fn quarter_name(quarter: u8) -> String {
    let suffix = match (quarter % 10, quarter % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{quarter}{suffix} Quarter")
}

//! Synchronous session state machine.
//!
//! `Session` knows nothing about wall-clock time: every call to [`Session::tick`]
//! advances the clock by one fixed step. The async driver in
//! [`crate::engine`] is what calls `tick` on a timer.

use std::time::Duration;

use rand::Rng;

use crate::{
    grid::{Grid, TOTAL_CELLS},
    mode::Mode,
    record::{Outcome, ResultRecord},
};

/// Default timer step.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Countdown time at or below which the clock is shown as urgent.
pub const LOW_TIME_MILLIS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
}

/// State of the current (or most recent) session.
#[derive(Debug, Clone)]
pub struct Session {
    grid: Option<Grid>,
    next_expected: u8,
    mode: Mode,
    elapsed_ms: u64,
    remaining_ms: u64,
    phase: Phase,
    step_ms: u64,
    generation: u64,
}

impl Session {
    pub fn new(step: Duration) -> Self {
        Self {
            grid: None,
            next_expected: 1,
            mode: Mode::default(),
            elapsed_ms: 0,
            remaining_ms: 0,
            phase: Phase::Idle,
            step_ms: (step.as_millis() as u64).max(1),
            generation: 0,
        }
    }

    /// Starts a session on a freshly shuffled grid.
    pub fn start<R: Rng>(&mut self, mode: Mode, rng: &mut R) -> u64 {
        self.start_replay(Grid::shuffled(rng), mode)
    }

    /// Starts a session on a given grid, keeping its cell order.
    ///
    /// Any running session is discarded without producing a record.
    pub fn start_replay(&mut self, grid: Grid, mode: Mode) -> u64 {
        self.grid = Some(grid);
        self.next_expected = 1;
        self.mode = mode;
        self.elapsed_ms = 0;
        self.remaining_ms = mode.total_millis().unwrap_or(0);
        self.phase = Phase::Running;
        self.generation += 1;
        self.generation
    }

    /// Handles a click on the cell showing `value`.
    ///
    /// Returns the record when the click ends the session.
    pub fn click(&mut self, value: u8) -> Option<ResultRecord> {
        if !self.is_running() {
            return None;
        }

        if value != self.next_expected {
            return self.end(Outcome::Fail);
        }

        self.next_expected += 1;
        if usize::from(self.next_expected) > TOTAL_CELLS {
            return self.end(Outcome::Success);
        }
        None
    }

    /// Advances the clock by one step.
    ///
    /// Returns the record when a countdown runs out.
    pub fn tick(&mut self) -> Option<ResultRecord> {
        if !self.is_running() {
            return None;
        }

        match self.mode {
            Mode::Unlimited => {
                self.elapsed_ms += self.step_ms;
                None
            }
            Mode::Countdown(_) => {
                self.remaining_ms = self.remaining_ms.saturating_sub(self.step_ms);
                if self.remaining_ms == 0 {
                    self.end(Outcome::Timeout)
                } else {
                    None
                }
            }
        }
    }

    /// Stops the session without producing a record.
    pub fn abandon(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Finishes the session. A second call after the session is idle
    /// returns `None`.
    fn end(&mut self, outcome: Outcome) -> Option<ResultRecord> {
        if !self.is_running() {
            return None;
        }
        self.phase = Phase::Idle;

        let grid = self.grid?;
        Some(ResultRecord::new(
            self.mode,
            outcome,
            self.time_used_ms() as f64 / 1000.0,
            grid,
        ))
    }

    fn time_used_ms(&self) -> u64 {
        match self.mode.total_millis() {
            Some(total) => total.saturating_sub(self.remaining_ms),
            None => self.elapsed_ms,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn next_expected(&self) -> u8 {
        self.next_expected
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Identifies the current session; bumped on every start.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }

    pub fn remaining_secs(&self) -> f64 {
        self.remaining_ms as f64 / 1000.0
    }

    /// Seconds to show on the clock: remaining for countdowns, elapsed
    /// otherwise.
    pub fn display_time(&self) -> f64 {
        if self.mode.is_unlimited() {
            self.elapsed_secs()
        } else {
            self.remaining_secs()
        }
    }

    /// Share of the countdown already used, 0-100. Always 0 when unlimited.
    pub fn progress_percentage(&self) -> f64 {
        match self.mode.total_millis() {
            Some(total) if total > 0 => {
                total.saturating_sub(self.remaining_ms) as f64 / total as f64 * 100.0
            }
            _ => 0.0,
        }
    }

    pub fn is_low_time(&self) -> bool {
        self.mode.is_countdown() && self.remaining_ms <= LOW_TIME_MILLIS
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

/// Formats seconds as `m:ss` from one minute up, `s.cc` below.
pub fn format_time(seconds: f64) -> String {
    let centis = (seconds.max(0.0) * 100.0).round() as u64;
    let minutes = centis / 6000;
    let secs = (centis / 100) % 60;

    if minutes > 0 {
        format!("{}:{:02}", minutes, secs)
    } else {
        format!("{}.{:02}", secs, centis % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::CountdownSecs;
    use rand::{SeedableRng, rngs::StdRng};

    fn countdown(secs: CountdownSecs) -> Mode {
        Mode::Countdown(secs)
    }

    fn started(mode: Mode) -> Session {
        let mut session = Session::default();
        let mut rng = StdRng::seed_from_u64(11);
        session.start(mode, &mut rng);
        session
    }

    #[test]
    fn test_new_session_is_idle() {
        let mut session = Session::default();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.grid().is_none());
        assert!(session.click(1).is_none());
        assert!(session.tick().is_none());
    }

    #[test]
    fn test_start_resets_state() {
        let session = started(countdown(CountdownSecs::Thirty));
        assert!(session.is_running());
        assert_eq!(session.next_expected(), 1);
        assert_eq!(session.remaining_secs(), 30.0);
        assert_eq!(session.elapsed_secs(), 0.0);
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn test_unlimited_ticks_count_up_and_never_end() {
        let mut session = started(Mode::Unlimited);
        let mut last = session.elapsed_secs();

        for _ in 0..2_000 {
            assert!(session.tick().is_none());
            assert!(session.elapsed_secs() > last);
            assert_eq!(session.remaining_secs(), 0.0);
            last = session.elapsed_secs();
        }

        assert!(session.is_running());
        assert_eq!(session.display_time(), 200.0);
        assert_eq!(session.progress_percentage(), 0.0);
        assert!(!session.is_low_time());
    }

    #[test]
    fn test_countdown_times_out_after_full_duration() {
        let mut session = started(countdown(CountdownSecs::Thirty));
        let mut records = Vec::new();

        for _ in 0..300 {
            if let Some(record) = session.tick() {
                records.push(record);
            }
        }

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.outcome, Outcome::Timeout);
        assert_eq!(record.time_used, 30.0);
        assert_eq!(record.errors, 0);
        assert!(!session.is_running());

        // Further ticks after the timeout do nothing.
        assert!(session.tick().is_none());
    }

    #[test]
    fn test_countdown_does_not_end_early() {
        let mut session = started(countdown(CountdownSecs::Thirty));
        for _ in 0..299 {
            assert!(session.tick().is_none());
        }
        assert!(session.is_running());
        assert!(session.is_low_time());
        assert_eq!(session.display_time(), 0.1);
    }

    #[test]
    fn test_clicking_in_order_succeeds() {
        let mut session = started(countdown(CountdownSecs::Thirty));
        for _ in 0..42 {
            session.tick();
        }

        for value in 1..25u8 {
            assert!(session.click(value).is_none());
        }
        let record = session.click(25).expect("final click ends the session");

        assert_eq!(record.outcome, Outcome::Success);
        assert_eq!(record.time_used, 4.2);
        assert_eq!(record.errors, 0);
        assert_eq!(&record.grid, session.grid().unwrap());
        assert!(record.replay_of.is_none());
        assert!(!session.is_running());
    }

    #[test]
    fn test_unlimited_success_uses_elapsed_time() {
        let mut session = started(Mode::Unlimited);
        for _ in 0..75 {
            session.tick();
        }
        let record = (1..=25u8).find_map(|v| session.click(v)).unwrap();
        assert_eq!(record.outcome, Outcome::Success);
        assert_eq!(record.time_used, 7.5);
        assert_eq!(record.mode_display, "Unlimited");
    }

    #[test]
    fn test_wrong_click_fails_immediately() {
        let mut session = started(countdown(CountdownSecs::Sixty));
        assert!(session.click(1).is_none());
        let record = session.click(3).expect("wrong click ends the session");

        assert_eq!(record.outcome, Outcome::Fail);
        assert_eq!(record.errors, 1);
        assert_eq!(session.phase(), Phase::Idle);

        assert!(session.click(2).is_none());
        assert!(session.tick().is_none());
    }

    #[test]
    fn test_replay_keeps_grid_order() {
        let values: Vec<u8> = (1..=25).rev().collect();
        let grid = Grid::from_cells(&values).unwrap();
        let mut session = Session::default();
        session.start_replay(grid, Mode::Unlimited);

        assert_eq!(session.grid(), Some(&grid));
        assert_eq!(session.mode(), Mode::Unlimited);
        assert_eq!(session.remaining_secs(), 0.0);
    }

    #[test]
    fn test_restart_bumps_generation_and_discards_progress() {
        let mut session = started(countdown(CountdownSecs::Thirty));
        session.click(1);
        session.tick();

        let mut rng = StdRng::seed_from_u64(3);
        let generation = session.start(Mode::Unlimited, &mut rng);

        assert_eq!(generation, 2);
        assert_eq!(session.next_expected(), 1);
        assert_eq!(session.elapsed_secs(), 0.0);
    }

    #[test]
    fn test_abandon_produces_no_record() {
        let mut session = started(countdown(CountdownSecs::Thirty));
        session.abandon();
        assert!(!session.is_running());
        assert!(session.click(1).is_none());
    }

    #[test]
    fn test_progress_and_low_time() {
        let mut session = started(countdown(CountdownSecs::Thirty));
        for _ in 0..150 {
            session.tick();
        }
        assert_eq!(session.progress_percentage(), 50.0);
        assert!(!session.is_low_time());

        for _ in 0..100 {
            session.tick();
        }
        assert_eq!(session.remaining_secs(), 5.0);
        assert!(session.is_low_time());
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0.00");
        assert_eq!(format_time(4.2), "4.20");
        assert_eq!(format_time(0.29), "0.29");
        assert_eq!(format_time(59.99), "59.99");
        assert_eq!(format_time(60.0), "1:00");
        assert_eq!(format_time(125.4), "2:05");
        assert_eq!(format_time(-1.0), "0.00");
    }
}

//! Session engine: owns the session state machine and drives its clock.
//!
//! Ticks run on a spawned tokio task. Clicks and ticks both go through the
//! same mutex, and a tick only acts when the session generation it was
//! spawned for is still current and running, so a session ends at most once.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use rand::{SeedableRng, rngs::StdRng};
use tokio::{task::JoinHandle, time};
use tracing::{debug, info};

use crate::{
    grid::Grid,
    mode::Mode,
    record::ResultRecord,
    session::{Session, TICK_INTERVAL},
};

/// Invoked with the record when a countdown runs out.
pub type TimeoutCallback = Arc<dyn Fn(ResultRecord) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Timer period, also the amount of game time each tick accounts for.
    pub tick_interval: Duration,
    /// Fixed seed for reproducible grids.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: TICK_INTERVAL,
            seed: None,
        }
    }
}

/// Read-only view of the session for rendering.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub grid: Option<Grid>,
    pub next_expected: u8,
    pub mode: Mode,
    pub running: bool,
    pub display_time: f64,
    pub progress_percentage: f64,
    pub is_low_time: bool,
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        Self {
            grid: session.grid().copied(),
            next_expected: session.next_expected(),
            mode: session.mode(),
            running: session.is_running(),
            display_time: session.display_time(),
            progress_percentage: session.progress_percentage(),
            is_low_time: session.is_low_time(),
        }
    }
}

pub struct SessionEngine {
    config: EngineConfig,
    session: Arc<Mutex<Session>>,
    timer: Option<JoinHandle<()>>,
    on_timeout: Arc<Mutex<Option<TimeoutCallback>>>,
    rng: StdRng,
}

impl SessionEngine {
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            session: Arc::new(Mutex::new(Session::new(config.tick_interval))),
            config,
            timer: None,
            on_timeout: Arc::new(Mutex::new(None)),
            rng,
        }
    }

    /// Registers the callback fired when a countdown expires.
    pub fn on_timeout<F>(&self, callback: F)
    where
        F: Fn(ResultRecord) + Send + Sync + 'static,
    {
        *lock(&self.on_timeout) = Some(Arc::new(callback));
    }

    /// Starts a session on a freshly shuffled grid.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, mode: Mode) {
        self.cancel_timer();
        let generation = lock(&self.session).start(mode, &mut self.rng);
        info!(mode = %mode, generation, "Session started");
        self.spawn_timer(generation);
    }

    /// Starts a session on a stored grid.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_replay(&mut self, grid: Grid, mode: Mode) {
        self.cancel_timer();
        let generation = lock(&self.session).start_replay(grid, mode);
        info!(mode = %mode, generation, "Replay session started");
        self.spawn_timer(generation);
    }

    /// Handles a click; returns the record if it ended the session.
    pub fn click(&mut self, value: u8) -> Option<ResultRecord> {
        let record = lock(&self.session).click(value);
        if let Some(ref record) = record {
            self.cancel_timer();
            info!(
                outcome = %record.outcome,
                time_used = record.time_used,
                "Session ended by click"
            );
        }
        record
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from(&*lock(&self.session))
    }

    pub fn is_running(&self) -> bool {
        lock(&self.session).is_running()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Stops any running session and its timer without producing a record.
    pub fn close(&mut self) {
        self.cancel_timer();
        let mut session = lock(&self.session);
        if session.is_running() {
            session.abandon();
            info!("Session abandoned on close");
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
            debug!("Session timer cancelled");
        }
    }

    fn spawn_timer(&mut self, generation: u64) {
        let session = Arc::clone(&self.session);
        let on_timeout = Arc::clone(&self.on_timeout);
        let period = self.config.tick_interval;

        self.timer = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            loop {
                interval.tick().await;

                let record = {
                    let mut session = lock(&session);
                    if session.generation() != generation || !session.is_running() {
                        return;
                    }
                    session.tick()
                };

                if let Some(record) = record {
                    info!(time_used = record.time_used, "Session timed out");
                    let callback = lock(&on_timeout).clone();
                    if let Some(callback) = callback {
                        callback(record);
                    }
                    return;
                }
            }
        }));
    }
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Drop for SessionEngine {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mode::CountdownSecs,
        record::Outcome,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn seeded_engine() -> SessionEngine {
        SessionEngine::new(EngineConfig {
            seed: Some(99),
            ..EngineConfig::default()
        })
    }

    fn recording_callback(engine: &SessionEngine) -> (Arc<AtomicUsize>, Arc<Mutex<Vec<ResultRecord>>>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let records = Arc::new(Mutex::new(Vec::new()));
        let calls_clone = Arc::clone(&calls);
        let records_clone = Arc::clone(&records);
        engine.on_timeout(move |record| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            records_clone.lock().unwrap().push(record);
        });
        (calls, records)
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_timeout_fires_callback_once() {
        let mut engine = seeded_engine();
        let (calls, records) = recording_callback(&engine);

        engine.start(Mode::Countdown(CountdownSecs::Thirty));
        time::sleep(Duration::from_millis(30_050)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let records = records.lock().unwrap();
        assert_eq!(records[0].outcome, Outcome::Timeout);
        assert_eq!(records[0].time_used, 30.0);
        assert_eq!(records[0].errors, 0);
        assert!(!engine.is_running());

        drop(records);
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unlimited_clock_counts_up() {
        let mut engine = seeded_engine();
        engine.start(Mode::Unlimited);

        time::sleep(Duration::from_millis(1_050)).await;
        let first = engine.snapshot();
        time::sleep(Duration::from_millis(1_000)).await;
        let second = engine.snapshot();

        assert!(second.display_time > first.display_time);
        assert_eq!(second.display_time, 2.0);
        assert!(second.running);
        assert_eq!(second.progress_percentage, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_end_stops_timer() {
        let mut engine = seeded_engine();
        let (calls, _) = recording_callback(&engine);
        engine.start(Mode::Countdown(CountdownSecs::Thirty));

        time::sleep(Duration::from_millis(550)).await;
        let record = engine.click(2).expect("wrong first click fails");
        assert_eq!(record.outcome, Outcome::Fail);
        assert_eq!(record.time_used, 0.5);

        time::sleep(Duration::from_secs(40)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(engine.snapshot().display_time, 29.5);
        assert!(engine.click(1).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_previous_timer() {
        let mut engine = seeded_engine();
        let (calls, records) = recording_callback(&engine);

        engine.start(Mode::Countdown(CountdownSecs::Thirty));
        time::sleep(Duration::from_millis(10_050)).await;
        engine.start(Mode::Countdown(CountdownSecs::Thirty));
        time::sleep(Duration::from_millis(10_000)).await;

        // Only the new session's clock is running.
        assert_eq!(engine.snapshot().display_time, 20.0);

        time::sleep(Duration::from_millis(20_000)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(records.lock().unwrap()[0].time_used, 30.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_uses_given_grid() {
        let mut engine = seeded_engine();
        let values: Vec<u8> = (1..=25).rev().collect();
        let grid = Grid::from_cells(&values).unwrap();

        engine.start_replay(grid, Mode::Unlimited);
        time::sleep(Duration::from_millis(350)).await;
        let record = (1..=25u8).find_map(|v| engine.click(v)).unwrap();

        assert_eq!(record.grid, grid);
        assert_eq!(record.outcome, Outcome::Success);
        assert_eq!(record.time_used, 0.3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_timer() {
        let mut engine = seeded_engine();
        let (calls, _) = recording_callback(&engine);
        engine.start(Mode::Countdown(CountdownSecs::Thirty));

        time::sleep(Duration::from_millis(1_050)).await;
        engine.close();
        time::sleep(Duration::from_secs(60)).await;

        assert!(!engine.is_running());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(engine.snapshot().display_time, 29.0);
    }

    #[tokio::test]
    async fn test_seeded_engines_generate_same_grid() {
        let mut first = seeded_engine();
        let mut second = seeded_engine();
        first.start(Mode::Unlimited);
        second.start(Mode::Unlimited);

        assert_eq!(first.snapshot().grid, second.snapshot().grid);
        first.close();
        second.close();
    }
}

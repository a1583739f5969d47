use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait GameEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                // key releases are reported on some platforms; a tap counts once
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    if tx.send(GameEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(GameEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("terminal event reader stopped: {e}");
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-fed event source for driving a [`Runner`] without a terminal,
/// used by the unit tests here and the headless integration tests
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl GameEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time.
///
/// Ticks are scheduled against a fixed deadline, so a burst of key presses
/// does not push the next tick back.
pub struct Runner<E: GameEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Instant,
}

impl<E: GameEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        let next_tick = Instant::now() + ticker.interval();
        Self {
            event_source,
            ticker,
            next_tick,
        }
    }

    /// Restart the tick schedule from now, e.g. when a new round begins
    pub fn reset_schedule(&mut self) {
        self.next_tick = Instant::now() + self.ticker.interval();
    }

    /// Blocks until the next event or the tick deadline, whichever comes first
    pub fn step(&mut self) -> GameEvent {
        let now = Instant::now();
        if now >= self.next_tick {
            return self.fire_tick();
        }

        match self.event_source.recv_timeout(self.next_tick - now) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => self.fire_tick(),
            Err(RecvTimeoutError::Disconnected) => {
                // nothing more will arrive, sleep out the interval instead of spinning
                std::thread::sleep(self.next_tick.saturating_duration_since(Instant::now()));
                self.fire_tick()
            }
        }
    }

    fn fire_tick(&mut self) -> GameEvent {
        self.next_tick += self.ticker.interval();
        let now = Instant::now();
        if self.next_tick < now {
            // fell behind (suspended process); resume cadence from now
            self.next_tick = now + self.ticker.interval();
        }
        GameEvent::Tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let mut runner = Runner::new(es, ticker);

        // With no events available, step should yield Tick
        let ev = runner.step();
        match ev {
            GameEvent::Tick => {}
            _ => panic!("expected Tick on timeout"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(50));
        let mut runner = Runner::new(es, ticker);

        match runner.step() {
            GameEvent::Resize => {}
            _ => panic!("expected Resize event"),
        }
    }

    #[test]
    fn steady_keys_do_not_delay_ticks() {
        let (tx, rx) = mpsc::channel();
        // keeps typing every 5ms until the runner is dropped
        let typist = std::thread::spawn(move || {
            let key = GameEvent::Key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE));
            while tx.send(key.clone()).is_ok() {
                std::thread::sleep(Duration::from_millis(5));
            }
        });

        let started = Instant::now();
        let mut runner = Runner::new(TestEventSource::new(rx), FixedTicker::from_millis(30));

        let mut keys_seen = 0u32;
        let mut ticked_after = None;
        while started.elapsed() < Duration::from_secs(2) {
            match runner.step() {
                GameEvent::Tick => {
                    ticked_after = Some(started.elapsed());
                    break;
                }
                GameEvent::Key(_) => keys_seen += 1,
                GameEvent::Resize => {}
            }
        }
        drop(runner);
        typist.join().unwrap();

        let ticked_after = ticked_after.expect("steady key presses starved the tick");
        assert!(keys_seen > 0);
        assert!(ticked_after >= Duration::from_millis(30));
        assert!(
            ticked_after < Duration::from_millis(300),
            "first tick came after {ticked_after:?}"
        );
    }

    #[test]
    fn disconnected_source_still_ticks() {
        let (tx, rx) = mpsc::channel::<GameEvent>();
        drop(tx);
        let es = TestEventSource::new(rx);
        let mut runner = Runner::new(es, FixedTicker::from_millis(2));

        assert!(matches!(runner.step(), GameEvent::Tick));
        assert!(matches!(runner.step(), GameEvent::Tick));
    }
}

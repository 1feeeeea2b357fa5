//! Live position tracker
//!
//! Polls a [`PositionSource`] on a fixed period, keeps the most recent
//! position, and reports every accepted sample to the view as a
//! [`DisplayPoint`].
//!
//! # Lifecycle
//!
//! `Idle → Polling → Stopped`. Tracking starts with [`start_tracking`] and
//! ends with [`TrackingHandle::stop`] (or by dropping the handle). A stopped
//! handle never polls again; start a new one instead.
//!
//! # Ordering
//!
//! A fetch is issued on every tick whether or not the previous one has
//! completed. Results are applied in the order they *arrive*, so a slow
//! response for an older tick overwrites a newer position if it lands later.
//!
//! # Failures
//!
//! A failed fetch is logged and otherwise ignored: the last known position is
//! kept and the next tick acts as the retry.

use crate::config::{OutOfRangePolicy, TrackerConfig};
use crate::mapper::SensorField;
use crate::source::PositionSource;
use crate::types::{DisplayPoint, LocatorError, Position, Result, Timestamp};
use chrono::Utc;
use parking_lot::{Mutex, ReentrantMutex};
use std::cell::{Cell, RefCell};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

/// Tracker lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerPhase {
    Idle,
    Polling,
    Stopped,
}

/// Snapshot of a tracker's state
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerState {
    /// Most recently received position (absent until the first success)
    pub last_position: Option<Position>,
    /// `last_position` mapped into display space
    pub last_point: Option<DisplayPoint>,
    /// When `last_position` was received
    pub last_update: Option<Timestamp>,
    pub phase: TrackerPhase,
    pub polling_active: bool,
    /// Number of ticks that issued a fetch
    pub ticks: u64,
    /// Number of positions applied
    pub updates: u64,
    /// Number of failed fetches
    pub failures: u64,
    /// Number of positions ignored by [`OutOfRangePolicy::Drop`]
    pub dropped: u64,
}

impl TrackerState {
    fn new() -> Self {
        Self {
            last_position: None,
            last_point: None,
            last_update: None,
            phase: TrackerPhase::Idle,
            polling_active: false,
            ticks: 0,
            updates: 0,
            failures: 0,
            dropped: 0,
        }
    }

    /// The marker to draw, present iff a position has been received
    pub fn marker(&self) -> Option<DisplayPoint> {
        self.last_position.and(self.last_point)
    }
}

type UpdateCallback = Box<dyn FnMut(DisplayPoint) + Send>;

/// Guards the only paths that may act on a fetch result.
///
/// `stop` clears `active` under this lock, so once it returns no result can
/// be applied and the callback is never invoked again. The lock is reentrant
/// so the callback itself may call `stop`.
struct Gate {
    active: Cell<bool>,
    on_update: RefCell<UpdateCallback>,
}

struct Shared {
    gate: ReentrantMutex<Gate>,
    state: Mutex<TrackerState>,
    field: SensorField,
    policy: OutOfRangePolicy,
}

impl Shared {
    /// Record a tick; false once tracking has been stopped
    fn begin_tick(&self) -> bool {
        let gate = self.gate.lock();
        if !gate.active.get() {
            return false;
        }
        self.state.lock().ticks += 1;
        true
    }

    fn apply(&self, tick: u64, result: Result<Position>) {
        let gate = self.gate.lock();
        if !gate.active.get() {
            log::trace!("Discarding result of tick {} after stop", tick);
            return;
        }

        let position = match result {
            Ok(position) => position,
            Err(e) => {
                log::warn!("Position fetch failed (tick {}): {}", tick, e);
                self.state.lock().failures += 1;
                return;
            }
        };

        let mapped = self.field.to_display(&position);
        let Some(point) = self.policy.apply(mapped) else {
            log::warn!(
                "Dropping out-of-range position {} (tick {}, maps to {})",
                position,
                tick,
                mapped
            );
            self.state.lock().dropped += 1;
            return;
        };

        {
            let mut state = self.state.lock();
            state.last_position = Some(position);
            state.last_point = Some(point);
            state.last_update = Some(Utc::now());
            state.updates += 1;
        }

        log::debug!("Position {} (tick {}) -> {}", position, tick, point);
        let mut on_update = gate.on_update.borrow_mut();
        (*on_update)(point);
    }

    /// Close the gate; returns true on the first call only
    fn deactivate(&self) -> bool {
        let was_active = self.gate.lock().active.replace(false);

        let mut state = self.state.lock();
        state.polling_active = false;
        state.phase = TrackerPhase::Stopped;

        was_active
    }
}

/// Owner of a running tracker
///
/// Dropping the handle stops tracking.
pub struct TrackingHandle {
    shared: Arc<Shared>,
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl TrackingHandle {
    /// Stop polling
    ///
    /// Idempotent. After this returns, in-flight fetches are abandoned and
    /// the update callback is never called again. May be called from inside
    /// the update callback.
    pub fn stop(&self) {
        if self.shared.deactivate() {
            log::info!("Position tracking stopped");
        }
        let _ = self.cancel.send(true);
        self.task.abort();
    }

    /// Snapshot of the current state
    pub fn state(&self) -> TrackerState {
        self.shared.state.lock().clone()
    }

    /// The marker to draw, if any position has been received
    pub fn marker(&self) -> Option<DisplayPoint> {
        self.shared.state.lock().marker()
    }

    /// Most recently received position
    pub fn last_position(&self) -> Option<Position> {
        self.shared.state.lock().last_position
    }

    pub fn is_active(&self) -> bool {
        self.shared.state.lock().polling_active
    }
}

impl Drop for TrackingHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start polling `source` and report each accepted position to `on_update`
///
/// Must be called from within a tokio runtime. The first fetch is issued
/// immediately, then one per `config.poll_interval()`.
///
/// # Example
/// ```no_run
/// use store_locator::{start_tracking, HttpPositionSource, SensorField, TrackerConfig};
///
/// # async fn run() -> store_locator::Result<()> {
/// let config = TrackerConfig::new().with_position_url("http://localhost:8000/position");
/// let source = HttpPositionSource::new(&config)?;
/// let field = SensorField::new(10.0, 8.0)?;
///
/// let handle = start_tracking(source, field, &config, |point| {
///     println!("marker at {}", point);
/// })?;
///
/// // ... when the view goes away
/// handle.stop();
/// # Ok(())
/// # }
/// ```
pub fn start_tracking<S, F>(
    source: S,
    field: SensorField,
    config: &TrackerConfig,
    on_update: F,
) -> Result<TrackingHandle>
where
    S: PositionSource + 'static,
    F: FnMut(DisplayPoint) + Send + 'static,
{
    config.validate()?;
    let runtime = tokio::runtime::Handle::try_current()
        .map_err(|e| LocatorError::Runtime(e.to_string()))?;

    let mut state = TrackerState::new();
    state.phase = TrackerPhase::Polling;
    state.polling_active = true;

    let shared = Arc::new(Shared {
        gate: ReentrantMutex::new(Gate {
            active: Cell::new(true),
            on_update: RefCell::new(Box::new(on_update)),
        }),
        state: Mutex::new(state),
        field,
        policy: config.out_of_range,
    });

    let (cancel, cancelled) = watch::channel(false);
    let period = config.poll_interval();

    log::info!(
        "Position tracking started (period={}ms, field={}x{}m)",
        period.as_millis(),
        field.width(),
        field.height()
    );

    let task = runtime.spawn(poll_loop(
        Arc::new(source),
        Arc::clone(&shared),
        period,
        cancelled,
    ));

    Ok(TrackingHandle {
        shared,
        cancel,
        task,
    })
}

/// Stop a tracker; safe to call repeatedly
pub fn stop_tracking(handle: &TrackingHandle) {
    handle.stop();
}

/// Driver task: the single owner of the timer and of all in-flight fetches
async fn poll_loop<S>(
    source: Arc<S>,
    shared: Arc<Shared>,
    period: Duration,
    mut cancelled: watch::Receiver<bool>,
) where
    S: PositionSource + 'static,
{
    let mut interval = tokio::time::interval(period);
    let mut in_flight: JoinSet<(u64, Result<Position>)> = JoinSet::new();
    let mut tick: u64 = 0;

    loop {
        tokio::select! {
            biased;

            _ = cancelled.changed() => break,

            Some(joined) = in_flight.join_next() => match joined {
                Ok((tick, result)) => shared.apply(tick, result),
                Err(e) if e.is_cancelled() => {}
                Err(e) => {
                    log::error!("Position fetch task panicked: {}", e);
                    shared.state.lock().failures += 1;
                }
            },

            _ = interval.tick() => {
                if !shared.begin_tick() {
                    break;
                }
                tick += 1;
                log::trace!("Tick {}", tick);

                let source = Arc::clone(&source);
                let this_tick = tick;
                in_flight.spawn(async move { (this_tick, source.fetch().await) });
            }
        }
    }

    // Dropping the set aborts whatever is still outstanding.
    in_flight.abort_all();
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Fixed(Position);

    #[async_trait]
    impl PositionSource for Fixed {
        async fn fetch(&self) -> Result<Position> {
            Ok(self.0)
        }
    }

    fn field() -> SensorField {
        SensorField::new(10.0, 10.0).unwrap()
    }

    #[test]
    fn test_start_requires_runtime() {
        let result = start_tracking(
            Fixed(Position::new(1.0, 1.0)),
            field(),
            &TrackerConfig::new(),
            |_| {},
        );
        assert!(matches!(result, Err(LocatorError::Runtime(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_config_rejected() {
        let config = TrackerConfig::new().with_poll_interval(Duration::ZERO);
        let result = start_tracking(Fixed(Position::new(1.0, 1.0)), field(), &config, |_| {});
        assert!(matches!(result, Err(LocatorError::InvalidConfig(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_phase_transitions() {
        let handle = start_tracking(
            Fixed(Position::new(5.0, 2.5)),
            field(),
            &TrackerConfig::new(),
            |_| {},
        )
        .unwrap();

        let state = handle.state();
        assert_eq!(state.phase, TrackerPhase::Polling);
        assert!(state.polling_active);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(handle.marker(), Some(DisplayPoint::new(25.0, 50.0)));

        handle.stop();
        let state = handle.state();
        assert_eq!(state.phase, TrackerPhase::Stopped);
        assert!(!state.polling_active);
        assert!(!handle.is_active());
    }

    #[test]
    fn test_marker_requires_position() {
        let mut state = TrackerState::new();
        assert_eq!(state.marker(), None);

        state.last_point = Some(DisplayPoint::new(1.0, 1.0));
        assert_eq!(state.marker(), None);

        state.last_position = Some(Position::new(0.1, 0.1));
        assert_eq!(state.marker(), Some(DisplayPoint::new(1.0, 1.0)));
    }
}

//! Rate limiting for high-frequency platform events.
//!
//! Neither limiter owns a timer. Callers pass the current time on every
//! event and poll with [`Throttle::flush`] / [`Debounce::flush`] once per
//! turn of their event loop.

use std::time::Duration;

use web_time::Instant;

/// Default minimum spacing between processed scroll events.
pub const DEFAULT_SCROLL_THROTTLE: Duration = Duration::from_millis(50);

/// Default quiet period before a resize is processed.
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Leading-edge throttle with a trailing flush.
///
/// The first event fires immediately. Events arriving within `interval` of
/// the last fire are collapsed into one pending fire, released by
/// [`flush`](Self::flush) once the interval has elapsed.
#[derive(Clone, Debug)]
pub struct Throttle {
    interval: Duration,
    last_fired: Option<Instant>,
    pending: bool,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
            pending: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether an event is waiting for the trailing edge.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Records an event. Returns true when it should be processed now.
    pub fn event(&mut self, now: Instant) -> bool {
        if self.ready(now) {
            self.fire(now);
            true
        } else {
            self.pending = true;
            false
        }
    }

    /// Releases a held event once the interval has passed.
    pub fn flush(&mut self, now: Instant) -> bool {
        if self.pending && self.ready(now) {
            self.fire(now);
            true
        } else {
            false
        }
    }

    fn ready(&self, now: Instant) -> bool {
        self.last_fired
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval)
    }

    fn fire(&mut self, now: Instant) {
        self.last_fired = Some(now);
        self.pending = false;
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_THROTTLE)
    }
}

/// Trailing-edge debounce: fires once input has been quiet for `interval`.
#[derive(Clone, Debug)]
pub struct Debounce {
    interval: Duration,
    last_event: Option<Instant>,
}

impl Debounce {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_event: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_pending(&self) -> bool {
        self.last_event.is_some()
    }

    /// When the pending event will be released if nothing else arrives.
    pub fn deadline(&self) -> Option<Instant> {
        self.last_event.map(|last| last + self.interval)
    }

    /// Records an event, restarting the quiet period.
    pub fn event(&mut self, now: Instant) {
        self.last_event = Some(now);
    }

    /// Returns true once, when the quiet period after the last event ends.
    pub fn flush(&mut self, now: Instant) -> bool {
        match self.last_event {
            Some(last) if now.saturating_duration_since(last) >= self.interval => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(DEFAULT_RESIZE_DEBOUNCE)
    }
}

//! Viewport sensor abstraction.
//!
//! The layout core never talks to a concrete resize or intersection
//! observer. A platform implements [`ViewportSensor`] and pushes events,
//! which the core collects in a [`SensorInbox`] and processes on its own
//! schedule.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use web_time::Instant;

use crate::window::ViewportMetrics;

/// The container or document changed size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeEvent {
    /// Measured width of the content container, if it has been laid out.
    pub container_width: Option<f32>,
    /// Width of the document, used when the container is unmeasured.
    pub document_width: f32,
    /// Viewport metrics after the resize.
    pub viewport: ViewportMetrics,
    pub at: Instant,
}

impl ResizeEvent {
    /// Width the column resolver should use.
    pub fn effective_width(&self) -> f32 {
        self.container_width.unwrap_or(self.document_width)
    }
}

/// The document scrolled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEvent {
    pub viewport: ViewportMetrics,
    pub at: Instant,
}

/// The load sentinel entered or left the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityEvent {
    pub visible: bool,
    pub at: Instant,
}

/// Any event delivered by a sensor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SensorEvent {
    Resize(ResizeEvent),
    Scroll(ScrollEvent),
    Visibility(VisibilityEvent),
}

/// Platform hook for size, scroll and sentinel visibility notifications.
///
/// Each registration returns a [`SensorSubscription`]; dropping it must stop
/// further deliveries to that callback.
pub trait ViewportSensor {
    /// Notifies on container or document size changes.
    fn on_resize(&mut self, callback: Box<dyn FnMut(ResizeEvent)>) -> SensorSubscription;

    /// Notifies on document scroll.
    fn on_scroll(&mut self, callback: Box<dyn FnMut(ScrollEvent)>) -> SensorSubscription;

    /// Notifies when the load sentinel's intersection with the viewport
    /// changes.
    fn on_visibility_change(
        &mut self,
        callback: Box<dyn FnMut(VisibilityEvent)>,
    ) -> SensorSubscription;
}

/// Handle to a sensor registration. Disconnects when dropped.
pub struct SensorSubscription {
    label: &'static str,
    disconnect: Option<Box<dyn FnOnce()>>,
}

impl SensorSubscription {
    /// Creates a subscription that runs `disconnect` exactly once on release.
    pub fn new(label: &'static str, disconnect: impl FnOnce() + 'static) -> Self {
        Self {
            label,
            disconnect: Some(Box::new(disconnect)),
        }
    }

    /// A subscription with nothing to release.
    pub fn detached(label: &'static str) -> Self {
        Self {
            label,
            disconnect: None,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Releases the registration now.
    pub fn disconnect(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            log::debug!("mosaic: disconnecting {} sensor", self.label);
            disconnect();
        }
    }
}

impl Drop for SensorSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for SensorSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorSubscription")
            .field("label", &self.label)
            .field("connected", &self.disconnect.is_some())
            .finish()
    }
}

/// Queue of sensor events awaiting processing.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone, Debug, Default)]
pub struct SensorInbox {
    events: Rc<RefCell<VecDeque<SensorEvent>>>,
}

impl SensorInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: SensorEvent) {
        self.events.borrow_mut().push_back(event);
    }

    /// Removes and returns every queued event in arrival order.
    pub fn drain(&self) -> Vec<SensorEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Registers this inbox with every notifier of `sensor`.
    pub fn connect(&self, sensor: &mut dyn ViewportSensor) -> SensorConnection {
        let inbox = self.clone();
        let resize = sensor.on_resize(Box::new(move |e| inbox.push(SensorEvent::Resize(e))));
        let inbox = self.clone();
        let scroll = sensor.on_scroll(Box::new(move |e| inbox.push(SensorEvent::Scroll(e))));
        let inbox = self.clone();
        let visibility = sensor.on_visibility_change(Box::new(move |e| {
            inbox.push(SensorEvent::Visibility(e))
        }));
        log::debug!("mosaic: sensor connected");
        SensorConnection {
            resize,
            scroll,
            visibility,
        }
    }
}

/// The three registrations made by [`SensorInbox::connect`].
#[derive(Debug)]
pub struct SensorConnection {
    resize: SensorSubscription,
    scroll: SensorSubscription,
    visibility: SensorSubscription,
}

impl SensorConnection {
    /// Releases all registrations now instead of on drop.
    pub fn disconnect(self) {
        self.resize.disconnect();
        self.scroll.disconnect();
        self.visibility.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingSensor {
        released: Rc<Cell<usize>>,
        scroll: Option<Box<dyn FnMut(ScrollEvent)>>,
    }

    impl CountingSensor {
        fn subscription(&self, label: &'static str) -> SensorSubscription {
            let released = self.released.clone();
            SensorSubscription::new(label, move || released.set(released.get() + 1))
        }
    }

    impl ViewportSensor for CountingSensor {
        fn on_resize(&mut self, _callback: Box<dyn FnMut(ResizeEvent)>) -> SensorSubscription {
            self.subscription("resize")
        }

        fn on_scroll(&mut self, callback: Box<dyn FnMut(ScrollEvent)>) -> SensorSubscription {
            self.scroll = Some(callback);
            self.subscription("scroll")
        }

        fn on_visibility_change(
            &mut self,
            _callback: Box<dyn FnMut(VisibilityEvent)>,
        ) -> SensorSubscription {
            self.subscription("visibility")
        }
    }

    #[test]
    fn dropping_connection_disconnects_each_subscription_once() {
        let mut sensor = CountingSensor::default();
        let inbox = SensorInbox::new();
        let connection = inbox.connect(&mut sensor);
        assert_eq!(sensor.released.get(), 0);
        drop(connection);
        assert_eq!(sensor.released.get(), 3);
    }

    #[test]
    fn explicit_disconnect_does_not_double_release() {
        let released = Rc::new(Cell::new(0));
        let counter = released.clone();
        let subscription = SensorSubscription::new("resize", move || counter.set(counter.get() + 1));
        subscription.disconnect();
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn events_reach_inbox_in_order() {
        let mut sensor = CountingSensor::default();
        let inbox = SensorInbox::new();
        let _connection = inbox.connect(&mut sensor);
        let now = Instant::now();
        let deliver = sensor.scroll.as_mut().unwrap();
        for top in [10.0, 20.0] {
            deliver(ScrollEvent {
                viewport: ViewportMetrics::new(top, 100.0).unwrap(),
                at: now,
            });
        }
        let events = inbox.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], SensorEvent::Scroll(e) if e.viewport.scroll_top == 20.0));
        assert!(inbox.is_empty());
    }

    #[test]
    fn effective_width_prefers_container() {
        let viewport = ViewportMetrics::default();
        let at = Instant::now();
        let measured = ResizeEvent {
            container_width: Some(700.0),
            document_width: 1024.0,
            viewport,
            at,
        };
        assert_eq!(measured.effective_width(), 700.0);
        let unmeasured = ResizeEvent {
            container_width: None,
            ..measured
        };
        assert_eq!(unmeasured.effective_width(), 1024.0);
    }
}

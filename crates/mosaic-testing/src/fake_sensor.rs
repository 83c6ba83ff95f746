use std::cell::RefCell;
use std::rc::{Rc, Weak};

use mosaic_foundation::{
    ResizeEvent, ScrollEvent, SensorSubscription, ViewportSensor, VisibilityEvent,
};

type Slot<E> = Vec<(u64, Box<dyn FnMut(E)>)>;

#[derive(Default)]
struct SensorRegistry {
    resize: Slot<ResizeEvent>,
    scroll: Slot<ScrollEvent>,
    visibility: Slot<VisibilityEvent>,
    next_id: u64,
    disconnects: usize,
}

impl SensorRegistry {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn remove(&mut self, id: u64) {
        let before = self.active();
        self.resize.retain(|(slot, _)| *slot != id);
        self.scroll.retain(|(slot, _)| *slot != id);
        self.visibility.retain(|(slot, _)| *slot != id);
        if self.active() < before {
            self.disconnects += 1;
        }
    }

    fn active(&self) -> usize {
        self.resize.len() + self.scroll.len() + self.visibility.len()
    }
}

/// In-memory [`ViewportSensor`] whose events are emitted by the test.
///
/// Cloned handles share the same registrations, so a test can keep one
/// handle while the widget holds the subscriptions.
#[derive(Clone, Default)]
pub struct FakeViewportSensor {
    registry: Rc<RefCell<SensorRegistry>>,
}

impl FakeViewportSensor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit_resize(&self, event: ResizeEvent) {
        for (_, callback) in self.registry.borrow_mut().resize.iter_mut() {
            callback(event);
        }
    }

    pub fn emit_scroll(&self, event: ScrollEvent) {
        for (_, callback) in self.registry.borrow_mut().scroll.iter_mut() {
            callback(event);
        }
    }

    pub fn emit_visibility(&self, event: VisibilityEvent) {
        for (_, callback) in self.registry.borrow_mut().visibility.iter_mut() {
            callback(event);
        }
    }

    /// Number of callbacks currently registered.
    pub fn active_subscriptions(&self) -> usize {
        self.registry.borrow().active()
    }

    /// Number of registrations released so far.
    pub fn disconnect_count(&self) -> usize {
        self.registry.borrow().disconnects
    }

    fn subscription(&self, label: &'static str, id: u64) -> SensorSubscription {
        let registry: Weak<RefCell<SensorRegistry>> = Rc::downgrade(&self.registry);
        SensorSubscription::new(label, move || {
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().remove(id);
            }
        })
    }
}

impl ViewportSensor for FakeViewportSensor {
    fn on_resize(&mut self, callback: Box<dyn FnMut(ResizeEvent)>) -> SensorSubscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id();
            registry.resize.push((id, callback));
            id
        };
        self.subscription("resize", id)
    }

    fn on_scroll(&mut self, callback: Box<dyn FnMut(ScrollEvent)>) -> SensorSubscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id();
            registry.scroll.push((id, callback));
            id
        };
        self.subscription("scroll", id)
    }

    fn on_visibility_change(
        &mut self,
        callback: Box<dyn FnMut(VisibilityEvent)>,
    ) -> SensorSubscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id();
            registry.visibility.push((id, callback));
            id
        };
        self.subscription("visibility", id)
    }
}

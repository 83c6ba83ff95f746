//! A scripted browser page hosting the gallery below a fixed header.

use std::cell::RefCell;
use std::rc::Rc;

use mosaic_foundation::{
    ResizeEvent, ScrollEvent, SensorSubscription, ViewportMetrics, ViewportSensor,
    VisibilityEvent,
};
use web_time::Instant;

type Listeners<E> = Rc<RefCell<Vec<Box<dyn FnMut(E)>>>>;

pub struct SimulatedPage {
    width: f32,
    window_height: f32,
    header_height: f32,
    page_scroll: f32,
    content_height: f32,
    sentinel_top: Option<f32>,
    sentinel_visible: bool,
    resize: Listeners<ResizeEvent>,
    scroll: Listeners<ScrollEvent>,
    visibility: Listeners<VisibilityEvent>,
}

impl SimulatedPage {
    pub fn new(width: f32, window_height: f32, header_height: f32) -> Self {
        Self {
            width,
            window_height,
            header_height,
            page_scroll: 0.0,
            content_height: 0.0,
            sentinel_top: None,
            sentinel_visible: false,
            resize: Rc::default(),
            scroll: Rc::default(),
            visibility: Rc::default(),
        }
    }

    pub fn resize(&mut self, width: f32, at: Instant) {
        self.width = width;
        let event = ResizeEvent {
            container_width: Some(width),
            document_width: width,
            viewport: self.viewport(),
            at,
        };
        for listener in self.resize.borrow_mut().iter_mut() {
            listener(event);
        }
    }

    pub fn scroll_by(&mut self, delta: f32, at: Instant) {
        let max_scroll = (self.header_height + self.content_height - self.window_height).max(0.0);
        self.page_scroll = (self.page_scroll + delta).clamp(0.0, max_scroll);
        let event = ScrollEvent {
            viewport: self.viewport(),
            at,
        };
        for listener in self.scroll.borrow_mut().iter_mut() {
            listener(event);
        }
        self.update_sentinel(at);
    }

    /// Records what the gallery drew, as a browser would after layout.
    pub fn set_content(&mut self, content_height: f32, sentinel_top: Option<f32>, at: Instant) {
        self.content_height = content_height;
        self.sentinel_top = sentinel_top;
        self.update_sentinel(at);
    }

    fn container_top(&self) -> f32 {
        self.header_height - self.page_scroll
    }

    fn viewport(&self) -> ViewportMetrics {
        // Before the first layout the container is as tall as the window.
        let rect_height = if self.content_height > 0.0 {
            self.content_height
        } else {
            self.window_height
        };
        ViewportMetrics::from_container_rect(self.container_top(), rect_height, self.window_height)
        .unwrap_or_default()
    }

    fn update_sentinel(&mut self, at: Instant) {
        let visible = self.sentinel_top.is_some_and(|top| {
            let on_screen = self.container_top() + top;
            on_screen < self.window_height && on_screen >= 0.0
        });
        if visible != self.sentinel_visible {
            self.sentinel_visible = visible;
            for listener in self.visibility.borrow_mut().iter_mut() {
                listener(VisibilityEvent { visible, at });
            }
        }
    }
}

fn register<E: 'static>(
    listeners: &Listeners<E>,
    label: &'static str,
    callback: Box<dyn FnMut(E)>,
) -> SensorSubscription {
    listeners.borrow_mut().push(callback);
    let weak = Rc::downgrade(listeners);
    SensorSubscription::new(label, move || {
        if let Some(listeners) = weak.upgrade() {
            listeners.borrow_mut().clear();
        }
    })
}

impl ViewportSensor for SimulatedPage {
    fn on_resize(&mut self, callback: Box<dyn FnMut(ResizeEvent)>) -> SensorSubscription {
        register(&self.resize, "resize", callback)
    }

    fn on_scroll(&mut self, callback: Box<dyn FnMut(ScrollEvent)>) -> SensorSubscription {
        register(&self.scroll, "scroll", callback)
    }

    fn on_visibility_change(
        &mut self,
        callback: Box<dyn FnMut(VisibilityEvent)>,
    ) -> SensorSubscription {
        register(&self.visibility, "visibility", callback)
    }
}

use std::cell::Cell;
use std::rc::Rc;

use mosaic_foundation::{
    DataItem, ResizeEvent, ScrollEvent, ViewportMetrics, VisibilityEvent,
};
use mosaic_ui::{MasonryFrame, MasonrySpec, VirtualMasonry};

use crate::clock::ManualClock;
use crate::fake_sensor::FakeViewportSensor;

/// Drives a mounted [`VirtualMasonry`] through a fake sensor and a manual
/// clock.
///
/// The simulated page is the gallery alone: the container starts at the
/// top of the document and is taller than the window.
pub struct MasonryTestRule {
    masonry: VirtualMasonry<DataItem, String>,
    sensor: FakeViewportSensor,
    clock: ManualClock,
    append_requests: Rc<Cell<usize>>,
    render_completions: Rc<Cell<usize>>,
    container_width: Option<f32>,
    document_width: f32,
    window_height: f32,
    scroll_top: f32,
}

impl MasonryTestRule {
    /// Mounts a gallery in a `width` x `window_height` window.
    ///
    /// Items render to `"{id}#{display_index}"`.
    pub fn new(spec: MasonrySpec, width: f32, window_height: f32) -> Self {
        let append_requests = Rc::new(Cell::new(0));
        let render_completions = Rc::new(Cell::new(0));
        let appends = append_requests.clone();
        let completions = render_completions.clone();

        let mut masonry = VirtualMasonry::new(spec, width, |item: &DataItem, index| {
            format!("{}#{}", item.id, index)
        })
        .unwrap_or_else(|err| panic!("invalid spec for test rule: {err}"))
        .on_request_append(move || appends.set(appends.get() + 1))
        .on_render_complete(move || completions.set(completions.get() + 1));

        let mut sensor = FakeViewportSensor::new();
        masonry.mount(&mut sensor);

        Self {
            masonry,
            sensor,
            clock: ManualClock::new(),
            append_requests,
            render_completions,
            container_width: Some(width),
            document_width: width,
            window_height,
            scroll_top: 0.0,
        }
    }

    /// A rule with default spec and a 1280 x 800 window.
    pub fn desktop() -> Self {
        Self::new(MasonrySpec::default(), 1280.0, 800.0)
    }

    pub fn masonry(&self) -> &VirtualMasonry<DataItem, String> {
        &self.masonry
    }

    pub fn masonry_mut(&mut self) -> &mut VirtualMasonry<DataItem, String> {
        &mut self.masonry
    }

    pub fn sensor(&self) -> &FakeViewportSensor {
        &self.sensor
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn set_data(&self, data: Rc<[DataItem]>) {
        self.masonry.set_data_source(data);
    }

    pub fn set_has_next_page(&self, has_next_page: bool) {
        self.masonry.set_has_next_page(has_next_page);
    }

    /// Simulates the container becoming unmeasurable, so resizes fall back
    /// to the document width.
    pub fn detach_container(&mut self) {
        self.container_width = None;
    }

    /// Emits a resize of both the document and the container.
    pub fn resize(&mut self, width: f32) {
        self.document_width = width;
        if self.container_width.is_some() {
            self.container_width = Some(width);
        }
        self.sensor.emit_resize(ResizeEvent {
            container_width: self.container_width,
            document_width: self.document_width,
            viewport: self.viewport(),
            at: self.clock.now(),
        });
    }

    /// Emits a scroll to `scroll_top`.
    pub fn scroll_to(&mut self, scroll_top: f32) {
        self.scroll_top = scroll_top;
        self.sensor.emit_scroll(ScrollEvent {
            viewport: self.viewport(),
            at: self.clock.now(),
        });
    }

    pub fn set_sentinel_visible(&self, visible: bool) {
        self.sensor.emit_visibility(VisibilityEvent {
            visible,
            at: self.clock.now(),
        });
    }

    /// Runs one turn of the event loop at the current time.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.masonry.tick(now);
    }

    /// Advances time, then runs one turn of the event loop.
    pub fn advance_ms(&mut self, ms: u64) {
        self.clock.advance_ms(ms);
        self.tick();
    }

    /// Waits out every rate limit and delivers deferred notifications.
    pub fn settle(&mut self) {
        self.advance_ms(1_000);
        self.advance_ms(1_000);
    }

    /// Resizes and waits for the debounced layout to apply.
    pub fn resize_and_settle(&mut self, width: f32) {
        self.resize(width);
        self.settle();
    }

    /// Scrolls and waits for the throttled window to apply.
    pub fn scroll_and_settle(&mut self, scroll_top: f32) {
        self.scroll_to(scroll_top);
        self.settle();
    }

    pub fn frame(&self) -> MasonryFrame<String> {
        self.masonry.render()
    }

    pub fn append_requests(&self) -> usize {
        self.append_requests.get()
    }

    pub fn render_completions(&self) -> usize {
        self.render_completions.get()
    }

    /// The whole window shows gallery content at the current scroll offset.
    pub fn viewport(&self) -> ViewportMetrics {
        ViewportMetrics::new(self.scroll_top, self.window_height)
            .unwrap_or_else(|err| panic!("test rule produced an invalid viewport: {err}"))
    }
}

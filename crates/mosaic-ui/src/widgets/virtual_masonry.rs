//! Virtual masonry widget.
//!
//! [`VirtualMasonry`] keeps a [`MasonryState`] in sync with platform events
//! and produces a [`MasonryFrame`] describing what the host should draw:
//! the windowed items with their absolute geometry, the total content
//! height and the optional load sentinel.

use std::rc::Rc;
use std::time::Duration;

use mosaic_foundation::{
    Breakpoint, ColumnFallback, ColumnPolicy, Debounce, ItemStyle, MasonryItem, MasonryState,
    ResizeEvent, Result, SensorConnection, SensorEvent, SensorInbox, Throttle, ViewportMetrics,
    ViewportSensor, DEFAULT_BREAKPOINTS, DEFAULT_COLUMN_GAP, DEFAULT_MAX_COLUMNS,
    DEFAULT_RESIZE_DEBOUNCE, DEFAULT_SCROLL_THROTTLE, DEFAULT_TRAILING_MARGIN,
};
use web_time::Instant;

/// Configuration for VirtualMasonry layout and event handling.
#[derive(Clone, Debug, PartialEq)]
pub struct MasonrySpec {
    /// Breakpoint table, narrowest first.
    pub breakpoints: Vec<Breakpoint>,
    /// Column count when the container is wider than every breakpoint.
    pub max_columns: usize,
    /// Gap when the container is wider than every breakpoint.
    pub max_gap: f32,
    /// Space below the tallest column, reserved for the load indicator.
    pub trailing_margin: f32,
    /// Minimum spacing between processed scroll events.
    pub scroll_throttle: Duration,
    /// Quiet period before a resize is processed.
    pub resize_debounce: Duration,
}

impl Default for MasonrySpec {
    fn default() -> Self {
        Self {
            breakpoints: DEFAULT_BREAKPOINTS.to_vec(),
            max_columns: DEFAULT_MAX_COLUMNS,
            max_gap: DEFAULT_COLUMN_GAP,
            trailing_margin: DEFAULT_TRAILING_MARGIN,
            scroll_throttle: DEFAULT_SCROLL_THROTTLE,
            resize_debounce: DEFAULT_RESIZE_DEBOUNCE,
        }
    }
}

impl MasonrySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn breakpoints(mut self, breakpoints: impl Into<Vec<Breakpoint>>) -> Self {
        self.breakpoints = breakpoints.into();
        self
    }

    pub fn max_columns(mut self, columns: usize) -> Self {
        self.max_columns = columns;
        self
    }

    pub fn max_gap(mut self, gap: f32) -> Self {
        self.max_gap = gap;
        self
    }

    pub fn trailing_margin(mut self, margin: f32) -> Self {
        self.trailing_margin = margin;
        self
    }

    pub fn scroll_throttle(mut self, interval: Duration) -> Self {
        self.scroll_throttle = interval;
        self
    }

    pub fn resize_debounce(mut self, interval: Duration) -> Self {
        self.resize_debounce = interval;
        self
    }

    /// Column policy derived from the breakpoint table and fallback.
    pub fn column_policy(&self) -> ColumnPolicy {
        ColumnPolicy::new(
            self.breakpoints.clone(),
            ColumnFallback {
                columns: self.max_columns,
                gap: self.max_gap,
            },
        )
    }
}

/// One materialized item.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedItem<R> {
    /// Reconciliation key, stable across frames for the same source slot.
    pub key: String,
    /// Absolute geometry inside the content box.
    pub style: ItemStyle,
    /// 1-based position in the data source.
    pub display_index: usize,
    /// Output of the caller's render function.
    pub content: R,
}

/// Everything the host needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct MasonryFrame<R> {
    /// Height of the scrollable content box.
    pub content_height: f32,
    /// Windowed items in source order.
    pub items: Vec<RenderedItem<R>>,
    /// Top of the load indicator, when more pages exist.
    pub sentinel_top: Option<f32>,
}

impl<R> MasonryFrame<R> {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.key.as_str())
    }
}

type RenderFn<T, R> = Box<dyn Fn(&T, usize) -> R>;

/// A virtualized masonry gallery bound to a viewport sensor.
///
/// The host calls [`tick`](Self::tick) once per turn of its event loop and
/// [`render`](Self::render) whenever it draws.
///
/// # Example
///
/// ```rust,ignore
/// let mut gallery = VirtualMasonry::new(MasonrySpec::default(), 1280.0, |photo: &Photo, n| {
///     format!("#{n} {}", photo.title)
/// })?
/// .on_request_append(move || pager.fetch_next())
/// .on_render_complete(|| log::info!("window settled"));
///
/// gallery.mount(&mut platform_sensor);
/// gallery.set_data_source(photos.into());
/// loop {
///     gallery.tick(Instant::now());
///     draw(gallery.render());
/// }
/// ```
pub struct VirtualMasonry<T, R> {
    state: MasonryState<T>,
    render_item: RenderFn<T, R>,
    on_request_append: Option<Box<dyn FnMut()>>,
    on_render_complete: Option<Box<dyn FnMut()>>,

    inbox: SensorInbox,
    connection: Option<SensorConnection>,

    scroll_throttle: Throttle,
    resize_debounce: Debounce,
    latest_scroll: Option<ViewportMetrics>,
    latest_resize: Option<ResizeEvent>,

    /// Window commits observed during the previous tick.
    deferred_render_complete: usize,
}

impl<T: MasonryItem, R> VirtualMasonry<T, R> {
    /// Creates an unmounted gallery.
    ///
    /// `document_width` selects the initial column count before the
    /// container is measured.
    pub fn new(
        spec: MasonrySpec,
        document_width: f32,
        render_item: impl Fn(&T, usize) -> R + 'static,
    ) -> Result<Self> {
        let state = MasonryState::new(spec.column_policy(), spec.trailing_margin, document_width)?;
        Ok(Self {
            state,
            render_item: Box::new(render_item),
            on_request_append: None,
            on_render_complete: None,
            inbox: SensorInbox::new(),
            connection: None,
            scroll_throttle: Throttle::new(spec.scroll_throttle),
            resize_debounce: Debounce::new(spec.resize_debounce),
            latest_scroll: None,
            latest_resize: None,
            deferred_render_complete: 0,
        })
    }

    /// Called once per rising edge of the load sentinel's visibility.
    pub fn on_request_append(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_request_append = Some(Box::new(callback));
        self
    }

    /// Called once per window recomputation, on the tick after it happened.
    pub fn on_render_complete(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_render_complete = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> &MasonryState<T> {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.connection.is_some()
    }

    /// Subscribes to `sensor`. Remounting releases the previous sensor first.
    pub fn mount(&mut self, sensor: &mut dyn ViewportSensor) {
        self.unmount();
        self.connection = Some(self.inbox.connect(sensor));
    }

    /// Releases every sensor subscription and drops undelivered events.
    pub fn unmount(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.disconnect();
        }
        self.inbox.drain();
    }

    /// Replaces the data source. See [`MasonryState::set_data_source`].
    pub fn set_data_source(&self, data: Rc<[T]>) -> bool {
        self.state.set_data_source(data)
    }

    pub fn set_has_next_page(&self, has_next_page: bool) {
        self.state.set_has_next_page(has_next_page);
    }

    /// Processes queued sensor events and due rate-limited work.
    ///
    /// Render-complete notifications for window commits seen by the
    /// previous tick are delivered first, so they always arrive after the
    /// host had a chance to draw the committed window.
    pub fn tick(&mut self, now: Instant) {
        let due = std::mem::take(&mut self.deferred_render_complete);
        if let Some(callback) = self.on_render_complete.as_mut() {
            for _ in 0..due {
                callback();
            }
        }

        for event in self.inbox.drain() {
            match event {
                SensorEvent::Resize(resize) => {
                    self.latest_resize = Some(resize);
                    self.resize_debounce.event(resize.at);
                }
                SensorEvent::Scroll(scroll) => {
                    self.latest_scroll = Some(scroll.viewport);
                    if self.scroll_throttle.event(scroll.at) {
                        self.apply_latest_scroll();
                    }
                }
                SensorEvent::Visibility(visibility) => {
                    if self.state.update_sentinel_visibility(visibility.visible) {
                        self.request_append();
                    }
                }
            }
        }

        if self.resize_debounce.flush(now) {
            self.apply_latest_resize();
        }
        if self.scroll_throttle.flush(now) {
            self.apply_latest_scroll();
        }

        self.deferred_render_complete = self.state.take_render_completions();
    }

    /// Materializes the current window.
    pub fn render(&self) -> MasonryFrame<R> {
        let content_height = self.state.content_height();
        let sentinel_top = self.state.sentinel_top();
        let items = if self.state.has_layout() {
            self.state.with_visible(|window, _| {
                window
                    .iter()
                    .map(|(placed, item)| RenderedItem {
                        key: placed.key.clone(),
                        style: placed.style,
                        display_index: placed.display_index(),
                        content: (self.render_item)(*item, placed.display_index()),
                    })
                    .collect::<Vec<_>>()
            })
        } else {
            Vec::new()
        };
        MasonryFrame {
            content_height,
            items,
            sentinel_top,
        }
    }

    fn apply_latest_scroll(&mut self) {
        if let Some(viewport) = self.latest_scroll {
            self.state.apply_scroll(viewport);
        }
    }

    fn apply_latest_resize(&mut self) {
        let Some(resize) = self.latest_resize.take() else {
            return;
        };
        // The resize may also have moved the viewport; keep the latest
        // scroll position when one is newer.
        let viewport = match self.latest_scroll {
            Some(scroll) => ViewportMetrics {
                scroll_top: scroll.scroll_top,
                viewport_height: resize.viewport.viewport_height,
            },
            None => resize.viewport,
        };
        if let Err(err) = self.state.apply_resize(resize.effective_width(), viewport) {
            log::warn!("mosaic: ignoring resize: {err}");
        }
    }

    fn request_append(&mut self) {
        match self.on_request_append.as_mut() {
            Some(callback) => callback(),
            None => log::warn!("mosaic: load sentinel became visible but no append handler is set"),
        }
    }
}

impl<T, R> Drop for VirtualMasonry<T, R> {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.disconnect();
        }
    }
}

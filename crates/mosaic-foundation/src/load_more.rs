//! Load-more trigger for lazy layouts.
//!
//! Tracks the visibility of the sentinel placed after the content and
//! reports only the rising edge of "became visible". Pagination state and
//! deduplication of requests stay with the caller.

/// Rising-edge detector for the load sentinel.
#[derive(Clone, Debug, Default)]
pub struct LoadMoreTrigger {
    /// Whether the caller reports more data to fetch. The sentinel exists
    /// only while this is set.
    has_next_page: bool,

    /// Last reported visibility of the sentinel.
    sentinel_visible: bool,

    /// Number of rising edges reported so far.
    requests: u64,
}

impl LoadMoreTrigger {
    pub fn new(has_next_page: bool) -> Self {
        Self {
            has_next_page,
            ..Self::default()
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    pub fn is_sentinel_visible(&self) -> bool {
        self.sentinel_visible
    }

    /// Number of append requests reported since creation.
    pub fn request_count(&self) -> u64 {
        self.requests
    }

    /// Updates the pagination flag.
    ///
    /// Removing the sentinel resets its visibility, so it reappearing in
    /// view later counts as a new rising edge.
    pub fn set_has_next_page(&mut self, has_next_page: bool) {
        self.has_next_page = has_next_page;
        if !has_next_page {
            self.sentinel_visible = false;
        }
    }

    /// Records a visibility change of the sentinel.
    ///
    /// Returns true exactly when the sentinel goes from hidden to visible
    /// while it exists. Repeated `true` reports do not fire again.
    pub fn update_visibility(&mut self, visible: bool) -> bool {
        let visible = visible && self.has_next_page;
        let rising = visible && !self.sentinel_visible;
        self.sentinel_visible = visible;
        if rising {
            self.requests += 1;
            log::debug!("mosaic: load sentinel visible, requesting append #{}", self.requests);
        }
        rising
    }

    /// Top of the sentinel in content coordinates, if it is present.
    pub fn sentinel_top(&self, content_height: f32, trailing_margin: f32) -> Option<f32> {
        self.has_next_page
            .then(|| (content_height - trailing_margin).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_on_rising_edge_only() {
        let mut trigger = LoadMoreTrigger::new(true);
        assert!(trigger.update_visibility(true));
        assert!(!trigger.update_visibility(true));
        assert!(!trigger.update_visibility(true));
        assert!(!trigger.update_visibility(false));
        assert!(trigger.update_visibility(true));
        assert_eq!(trigger.request_count(), 2);
    }

    #[test]
    fn visible_invisible_visible_fires_at_most_twice() {
        let mut trigger = LoadMoreTrigger::new(true);
        let fired = [true, false, true]
            .into_iter()
            .filter(|&v| trigger.update_visibility(v))
            .count();
        assert_eq!(fired, 2);
    }

    #[test]
    fn no_sentinel_without_next_page() {
        let mut trigger = LoadMoreTrigger::new(false);
        assert!(!trigger.update_visibility(true));
        assert_eq!(trigger.sentinel_top(500.0, 48.0), None);
        assert_eq!(trigger.request_count(), 0);
    }

    #[test]
    fn removing_sentinel_rearms_trigger() {
        let mut trigger = LoadMoreTrigger::new(true);
        assert!(trigger.update_visibility(true));
        trigger.set_has_next_page(false);
        assert!(!trigger.is_sentinel_visible());
        trigger.set_has_next_page(true);
        assert!(trigger.update_visibility(true));
    }

    #[test]
    fn sentinel_sits_after_content() {
        let trigger = LoadMoreTrigger::new(true);
        assert_eq!(trigger.sentinel_top(472.0, 48.0), Some(424.0));
        assert_eq!(trigger.sentinel_top(48.0, 48.0), Some(0.0));
    }
}

/// Change-detection state for one published value: a hysteresis band plus a
/// heartbeat deadline that forces a republish of an unchanged value.
#[derive(Debug, Clone, Copy)]
pub struct ChangePublisher {
    last_published: f32,
    next_deadline_ms: u64,
    threshold: f32,
    interval_ms: u64,
}

impl ChangePublisher {
    /// Starts with an unknown value and a lapsed deadline, so the first
    /// reading is always published.
    pub fn new(threshold: f32, interval_ms: u64) -> Self {
        Self {
            last_published: f32::NAN,
            next_deadline_ms: 0,
            threshold,
            interval_ms,
        }
    }

    pub fn last_published(&self) -> f32 {
        self.last_published
    }

    pub fn next_deadline_ms(&self) -> u64 {
        self.next_deadline_ms
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms >= self.next_deadline_ms
    }

    /// A known value always exceeds an unknown one; an unknown reading
    /// never exceeds anything.
    pub fn exceeds_threshold(&self, value: f32) -> bool {
        if value.is_nan() {
            return false;
        }
        self.last_published.is_nan() || (value - self.last_published).abs() >= self.threshold
    }

    /// Feeds a fresh reading; returns the value to publish, if any.
    pub fn observe(&mut self, value: f32, now_ms: u64) -> Option<f32> {
        if self.exceeds_threshold(value) || self.is_due(now_ms) {
            self.mark_published(value, now_ms);
            Some(value)
        } else {
            None
        }
    }

    pub fn mark_published(&mut self, value: f32, now_ms: u64) {
        self.last_published = value;
        self.next_deadline_ms = now_ms.saturating_add(self.interval_ms);
    }

    /// Forgets the last value; the deadline is left untouched.
    pub fn mark_unknown(&mut self) {
        self.last_published = f32::NAN;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIFTEEN_MIN_MS: u64 = 15 * 60 * 1_000;

    fn published_at(value: f32, now_ms: u64) -> ChangePublisher {
        let mut publisher = ChangePublisher::new(0.2, FIFTEEN_MIN_MS);
        publisher.mark_published(value, now_ms);
        publisher
    }

    #[test]
    fn first_reading_is_published() {
        let mut publisher = ChangePublisher::new(0.2, FIFTEEN_MIN_MS);
        assert_eq!(publisher.observe(22.4, 5), Some(22.4));
        assert_eq!(publisher.next_deadline_ms(), 5 + FIFTEEN_MIN_MS);
    }

    #[test]
    fn small_change_is_held_back() {
        let mut publisher = published_at(20.0, 1_000);
        assert_eq!(publisher.observe(20.1, 2_000), None);
        assert_eq!(publisher.last_published(), 20.0);
    }

    #[test]
    fn large_change_is_published() {
        let mut publisher = published_at(20.0, 1_000);
        assert_eq!(publisher.observe(20.3, 2_000), Some(20.3));
        assert_eq!(publisher.next_deadline_ms(), 2_000 + FIFTEEN_MIN_MS);
    }

    #[test]
    fn threshold_is_inclusive() {
        // 0.25 is exact in binary, so the delta equals the threshold.
        let mut publisher = ChangePublisher::new(0.25, FIFTEEN_MIN_MS);
        publisher.mark_published(20.0, 0);
        assert_eq!(publisher.observe(20.25, 10), Some(20.25));
        assert_eq!(publisher.observe(20.0, 20), Some(20.0));
    }

    #[test]
    fn deadline_forces_unchanged_value() {
        let mut publisher = published_at(20.0, 0);
        assert_eq!(publisher.observe(20.0, FIFTEEN_MIN_MS - 1), None);
        assert_eq!(publisher.observe(20.0, FIFTEEN_MIN_MS), Some(20.0));
        assert_eq!(publisher.next_deadline_ms(), 2 * FIFTEEN_MIN_MS);
    }

    #[test]
    fn heartbeat_bound_holds_for_constant_input() {
        let mut publisher = ChangePublisher::new(0.2, FIFTEEN_MIN_MS);
        let mut last_publish = None;

        for now_ms in (0..4 * FIFTEEN_MIN_MS).step_by(1_000) {
            if publisher.observe(19.5, now_ms).is_some() {
                if let Some(previous) = last_publish {
                    assert!(now_ms - previous <= FIFTEEN_MIN_MS);
                }
                last_publish = Some(now_ms);
            }
        }

        assert_eq!(last_publish, Some(3 * FIFTEEN_MIN_MS));
    }

    #[test]
    fn recovery_from_unknown_publishes_immediately() {
        let mut publisher = published_at(20.0, 0);
        publisher.mark_unknown();

        assert!(publisher.last_published().is_nan());
        assert_eq!(publisher.observe(20.05, 1_000), Some(20.05));
        assert_eq!(publisher.observe(20.1, 2_000), None);
    }
}

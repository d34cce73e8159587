use std::cell::Cell;
use std::rc::Rc;

/// Monotonic millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Asks the host to call back for another frame.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Hand-driven clock. Clones share the same time, so a test can keep a
/// handle while the task owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: f64) {
        self.now.set(self.now.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Counts frame requests instead of scheduling anything.
#[derive(Debug, Default)]
pub struct CountingScheduler {
    pub requested: usize,
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&mut self) {
        self.requested += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_time() {
        let clock = ManualClock::new(10.0);
        let handle = clock.clone();
        handle.advance(5.5);
        assert_eq!(clock.now_ms(), 15.5);
        handle.set(2.0);
        assert_eq!(clock.now_ms(), 2.0);
    }
}

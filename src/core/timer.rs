use super::state::Ticks;

/// Countdown tagged with the meaning of the duration it measures.
///
/// Replacing a timer is the only way to change its tag, so a state and the
/// time left in it always change together.
#[derive(Debug, Clone)]
pub struct Timer<T> {
    remaining: Ticks,
    data: T,
}

impl<T> Timer<T> {
    pub fn new(remaining: Ticks, data: T) -> Self {
        Self { remaining, data }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    /// Returns true on the tick the countdown reaches zero.
    pub fn step(&mut self) -> bool {
        assert!(self.remaining != 0, "Stepped a timer that already fired");
        self.remaining -= 1;
        self.remaining == 0
    }
}

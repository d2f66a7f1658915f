//! Frame-driven timers
//!
//! Timers never run on their own: the host reports elapsed time through
//! frame ticks, and every timer that became due since the previous tick fires
//! on the same thread, in due order.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Timer callback
pub type TimerCallback<C> = Rc<dyn Fn(&mut C, TimerId)>;

/// Identifies a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn id(&self) -> u64 {
        self.0
    }
}

struct Timer<C> {
    id: TimerId,
    due: Duration,
    /// Re-arm period for intervals, `None` for one-shot timeouts
    period: Option<Duration>,
    callback: TimerCallback<C>,
}

/// Schedules timeouts and intervals against host time
pub struct TimerManager<C> {
    timers: Vec<Timer<C>>,
    now: Duration,
    next_id: u64,
}

impl<C> fmt::Debug for TimerManager<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerManager")
            .field("now", &self.now)
            .field("active", &self.timers.len())
            .finish()
    }
}

impl<C> Default for TimerManager<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TimerManager<C> {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            now: Duration::ZERO,
            next_id: 0,
        }
    }

    /// Time of the last tick
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Fire once, `delay` after the last tick
    pub fn set_timeout(&mut self, delay: Duration, callback: TimerCallback<C>) -> TimerId {
        self.schedule(delay, None, callback)
    }

    /// Fire every `period` after the last tick
    ///
    /// A zero period fires once per tick.
    pub fn set_interval(&mut self, period: Duration, callback: TimerCallback<C>) -> TimerId {
        self.schedule(period, Some(period), callback)
    }

    fn schedule(&mut self, delay: Duration, period: Option<Duration>, callback: TimerCallback<C>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due: self.now + delay,
            period,
            callback,
        });
        id
    }

    /// Cancel a timer, returning whether it was active
    pub fn clear(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Move the clock to `now` and list the timers due, earliest first
    ///
    /// Nothing fires here; call [`fire`](Self::fire) for each returned id.
    pub fn advance(&mut self, now: Duration) -> Vec<TimerId> {
        self.now = self.now.max(now);
        let mut due: Vec<(Duration, TimerId)> = self
            .timers
            .iter()
            .filter(|t| t.due <= self.now)
            .map(|t| (t.due, t.id))
            .collect();
        due.sort();
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Take the callback of a due timer, re-arming intervals and dropping
    /// timeouts
    ///
    /// Returns `None` when the timer was cleared in the meantime.
    pub fn fire(&mut self, id: TimerId) -> Option<TimerCallback<C>> {
        let index = self.timers.iter().position(|t| t.id == id)?;
        let timer = &mut self.timers[index];
        let callback = Rc::clone(&timer.callback);
        match timer.period {
            Some(period) => {
                // Skip missed periods instead of bursting
                timer.due = self.now + period.max(Duration::from_nanos(1));
            }
            None => {
                self.timers.remove(index);
            }
        }
        Some(callback)
    }
}

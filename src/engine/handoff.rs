//! src/engine/handoff.rs
//!
//! Single-slot, latest-wins exchange between one producer and one consumer.
//!
//! A `put` never blocks: an unconsumed value is replaced (and counted as
//! dropped). A `take` removes the value, so nothing is delivered twice.
//! Closing the slot wakes both sides; the producer uses
//! [`Slot::sleep_unless_closed`] as its interruptible pacing sleep.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct SlotState<T> {
    value: Option<T>,
    closed: bool,
    dropped: u64,
}

#[derive(Debug)]
pub struct Slot<T> {
    state: Mutex<SlotState<T>>,
    signal: Condvar,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                value: None,
                closed: false,
                dropped: 0,
            }),
            signal: Condvar::new(),
        }
    }

    // neither side panics while holding the lock, so a poisoned state is still consistent
    fn lock(&self) -> MutexGuard<'_, SlotState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `value`, replacing any unconsumed one. Returns `false` (and drops
    /// `value`) when the slot is closed.
    pub fn put(&self, value: T) -> bool {
        let mut state = self.lock();
        if state.closed {
            return false;
        }
        if state.value.replace(value).is_some() {
            state.dropped += 1;
        }
        drop(state);
        self.signal.notify_all();
        true
    }

    /// Take the current value without waiting.
    pub fn try_take(&self) -> Option<T> {
        self.lock().value.take()
    }

    /// Take the current value, waiting up to `timeout` for one to arrive.
    ///
    /// A value stored before the slot was closed is still handed out.
    pub fn take_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        loop {
            if let Some(value) = state.value.take() {
                return Some(value);
            }
            if state.closed {
                return None;
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            state = self
                .signal
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Sleep for `duration` unless the slot gets closed first.
    ///
    /// Returns `true` when the slot is closed.
    pub fn sleep_unless_closed(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut state = self.lock();
        loop {
            if state.closed {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            state = self
                .signal
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    pub fn close(&self) {
        self.lock().closed = true;
        self.signal.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Values overwritten before the consumer took them.
    pub fn dropped(&self) -> u64 {
        self.lock().dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn latest_value_wins() {
        let slot = Slot::new();
        assert!(slot.put(1));
        assert!(slot.put(2));
        assert!(slot.put(3));
        assert_eq!(slot.try_take(), Some(3));
        assert_eq!(slot.try_take(), None);
        assert_eq!(slot.dropped(), 2);
    }

    #[test]
    fn closed_slot_rejects_puts_but_drains() {
        let slot = Slot::new();
        slot.put("last");
        slot.close();
        assert!(!slot.put("late"));
        assert_eq!(slot.take_timeout(Duration::from_millis(5)), Some("last"));
        assert_eq!(slot.take_timeout(Duration::from_millis(5)), None);
    }

    #[test]
    fn take_times_out_when_empty() {
        let slot: Slot<u8> = Slot::new();
        let start = Instant::now();
        assert_eq!(slot.take_timeout(Duration::from_millis(20)), None);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn close_interrupts_sleep() {
        let slot: Arc<Slot<u8>> = Arc::new(Slot::new());
        let sleeper = {
            let slot = slot.clone();
            thread::spawn(move || {
                let start = Instant::now();
                let closed = slot.sleep_unless_closed(Duration::from_secs(30));
                (closed, start.elapsed())
            })
        };
        thread::sleep(Duration::from_millis(20));
        slot.close();
        let (closed, waited) = sleeper.join().unwrap();
        assert!(closed);
        assert!(waited < Duration::from_secs(30));
    }

    #[test]
    fn consumer_sees_values_in_order() {
        let slot: Arc<Slot<u32>> = Arc::new(Slot::new());
        let producer = {
            let slot = slot.clone();
            thread::spawn(move || {
                for i in 0..1_000 {
                    slot.put(i);
                }
                slot.close();
            })
        };
        let mut seen = Vec::new();
        while let Some(v) = slot.take_timeout(Duration::from_secs(5)) {
            seen.push(v);
        }
        producer.join().unwrap();
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seen.last(), Some(&999));
    }
}

//! Periodic sampling abstraction.
//!
//! A registration does not carry a callback. When it fires, the host hands
//! the [`TickHandle`] back to [`crate::TimerWidget::on_tick`], which routes it
//! to the engine holding that handle. A handle cancelled while its tick was
//! already queued therefore arrives as a stale tick and is dropped.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

pub trait Scheduler {
    /// Monotonic time in milliseconds.
    fn now_ms(&self) -> u64;

    /// Begin delivering ticks for a new registration every `interval_ms`.
    fn schedule_periodic(&mut self, interval_ms: u64) -> TickHandle;

    /// Stop a registration. No tick for `handle` is delivered afterwards,
    /// except one the host had already queued.
    fn cancel(&mut self, handle: TickHandle);
}

struct Periodic {
    handle: TickHandle,
    interval_ms: u64,
    next_due_ms: u64,
}

/// Simulated clock for deterministic runs.
///
/// Time only moves when [`pop_due`](Self::pop_due) or
/// [`settle`](Self::settle) is called.
#[derive(Default)]
pub struct ManualScheduler {
    now_ms: u64,
    next_id: u64,
    timers: Vec<Periodic>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            now_ms,
            ..Self::default()
        }
    }

    /// Take the earliest registration due at or before `until_ms`, move the
    /// clock to its due time and schedule its next period.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TickHandle> {
        let timer = self
            .timers
            .iter_mut()
            .filter(|t| t.next_due_ms <= until_ms)
            .min_by_key(|t| (t.next_due_ms, t.handle.id()))?;
        self.now_ms = self.now_ms.max(timer.next_due_ms);
        timer.next_due_ms += timer.interval_ms;
        Some(timer.handle)
    }

    /// Move the clock forward to `until_ms` without firing anything.
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    pub fn is_active(&self, handle: TickHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }
}

impl Scheduler for ManualScheduler {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn schedule_periodic(&mut self, interval_ms: u64) -> TickHandle {
        let interval_ms = interval_ms.max(1);
        self.next_id += 1;
        let handle = TickHandle::new(self.next_id);
        self.timers.push(Periodic {
            handle,
            interval_ms,
            next_due_ms: self.now_ms + interval_ms,
        });
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.timers.retain(|t| t.handle != handle);
    }
}

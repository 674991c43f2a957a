//! Real-time scheduler. A pump thread owns every periodic registration and
//! posts `AppEvent::Tick` to the main loop when one comes due.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use timer_core::{Scheduler, TickHandle};

use crate::AppEvent;

pub enum PumpCtl {
    Start { handle: TickHandle, interval_ms: u64 },
    Stop(TickHandle),
    Quit,
}

pub struct PumpScheduler {
    epoch: Instant,
    next_id: u64,
    ctl: Sender<PumpCtl>,
    thread: Option<JoinHandle<()>>,
}

impl PumpScheduler {
    pub fn spawn(events: Sender<AppEvent>) -> Self {
        let (ctl, ctl_rx) = mpsc::channel();
        let thread = std::thread::spawn(move || pump_thread(ctl_rx, events));
        Self {
            epoch: Instant::now(),
            next_id: 0,
            ctl,
            thread: Some(thread),
        }
    }

    /// Stop the pump thread and wait for it.
    pub fn shutdown(&mut self) {
        self.ctl.send(PumpCtl::Quit).ok();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("pump thread panicked");
            }
        }
    }
}

impl Drop for PumpScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Scheduler for PumpScheduler {
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn schedule_periodic(&mut self, interval_ms: u64) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle::new(self.next_id);
        if self.ctl.send(PumpCtl::Start { handle, interval_ms }).is_err() {
            log::error!("pump thread is gone, {:?} will never fire", handle);
        }
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.ctl.send(PumpCtl::Stop(handle)).ok();
    }
}

struct Registration {
    handle: TickHandle,
    interval: Duration,
    next_due: Instant,
}

fn pump_thread(ctl: Receiver<PumpCtl>, events: Sender<AppEvent>) {
    let mut timers: Vec<Registration> = Vec::new();

    loop {
        // Block-wait when nothing is scheduled
        let msg = match timers.iter().map(|t| t.next_due).min() {
            Some(due) => {
                match ctl.recv_timeout(due.saturating_duration_since(Instant::now())) {
                    Ok(msg) => Some(msg),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match ctl.recv() {
                Ok(msg) => Some(msg),
                Err(_) => break,
            },
        };

        match msg {
            Some(PumpCtl::Start { handle, interval_ms }) => {
                let interval = Duration::from_millis(interval_ms.max(1));
                log::trace!("pump: {:?} every {:?}", handle, interval);
                timers.push(Registration {
                    handle,
                    interval,
                    next_due: Instant::now() + interval,
                });
            }
            Some(PumpCtl::Stop(handle)) => {
                timers.retain(|t| t.handle != handle);
            }
            Some(PumpCtl::Quit) => break,
            None => {
                let now = Instant::now();
                for timer in timers.iter_mut().filter(|t| t.next_due <= now) {
                    if events.send(AppEvent::Tick(timer.handle)).is_err() {
                        return;
                    }
                    timer.next_due += timer.interval;
                    // Fell behind: skip missed periods rather than bursting
                    if timer.next_due <= now {
                        timer.next_due = now + timer.interval;
                    }
                }
            }
        }
    }
    log::debug!("pump thread exiting");
}

use serde::Serialize;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

const ENABLE_LOGS: bool = false;

use crate::log_debug;

/// Identifies one window or delayed action for the lifetime of the scheduler.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    pub duration: Duration,
    pub tick_interval: Duration,
}

impl WindowSpec {
    pub fn new(duration: Duration, tick_interval: Duration) -> Self {
        Self {
            duration,
            tick_interval,
        }
    }

    /// Ticks fire at `0, interval, 2*interval, ...` strictly before `duration`.
    pub fn tick_count(&self) -> u32 {
        let interval = self.tick_interval.as_millis().max(1);
        let count = self.duration.as_millis().div_ceil(interval);
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub index: u32,
    pub remaining: Duration,
}

impl Tick {
    /// Whole seconds left, rounded up the way a countdown display shows them.
    pub fn remaining_secs(&self) -> u64 {
        let millis = self.remaining.as_millis() as u64;
        millis.div_ceil(1000)
    }
}

#[derive(Debug)]
pub struct WindowHandle {
    id: TimerId,
    token: CancellationToken,
}

impl WindowHandle {
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Suppresses the completion callback and every tick not yet fired.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug)]
pub struct DelayHandle {
    id: TimerId,
    token: CancellationToken,
}

impl DelayHandle {
    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Spawns windows and delayed actions as tokio tasks under one root
/// cancellation token, so a phase change can drop everything at once.
pub struct Scheduler {
    root: CancellationToken,
    next_id: u64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            root: CancellationToken::new(),
            next_id: 0,
        }
    }

    fn child(&mut self) -> (TimerId, CancellationToken) {
        self.next_id = self.next_id.wrapping_add(1);
        (TimerId(self.next_id), self.root.child_token())
    }

    pub fn open_window<T, C>(&mut self, spec: WindowSpec, mut on_tick: T, on_complete: C) -> WindowHandle
    where
        T: FnMut(TimerId, Tick) + Send + 'static,
        C: FnOnce(TimerId) + Send + 'static,
    {
        let (id, token) = self.child();
        let task_token = token.clone();

        tokio::spawn(async move {
            let started = Instant::now();
            let mut interval = time::interval(spec.tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            for index in 0..spec.tick_count() {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => {
                        log_debug!("{id} cancelled before tick {index}");
                        return;
                    }
                    _ = interval.tick() => {}
                }

                let remaining = spec
                    .duration
                    .saturating_sub(spec.tick_interval.saturating_mul(index));
                on_tick(id, Tick { index, remaining });
            }

            tokio::select! {
                biased;
                _ = task_token.cancelled() => {
                    log_debug!("{id} cancelled before completion");
                }
                _ = time::sleep_until(started + spec.duration) => {
                    if !task_token.is_cancelled() {
                        on_complete(id);
                    }
                }
            }
        });

        WindowHandle { id, token }
    }

    pub fn delay<A>(&mut self, delay: Duration, action: A) -> DelayHandle
    where
        A: FnOnce(TimerId) + Send + 'static,
    {
        let (id, token) = self.child();
        let task_token = token.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = task_token.cancelled() => {
                    log_debug!("{id} delayed action cancelled");
                }
                _ = time::sleep(delay) => action(id),
            }
        });

        DelayHandle { id, token }
    }

    /// Cancel every outstanding window and delayed action.
    pub fn cancel_all(&mut self) {
        self.root.cancel();
        self.root = CancellationToken::new();
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[derive(Debug, PartialEq)]
    enum Fired {
        Tick(u32, u64),
        Done,
        Action,
    }

    fn window_events(
        scheduler: &mut Scheduler,
        spec: WindowSpec,
    ) -> (WindowHandle, mpsc::UnboundedReceiver<Fired>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let tick_tx = tx.clone();
        let handle = scheduler.open_window(
            spec,
            move |_, tick| {
                let _ = tick_tx.send(Fired::Tick(tick.index, tick.remaining_secs()));
            },
            move |_| {
                let _ = tx.send(Fired::Done);
            },
        );
        (handle, rx)
    }

    #[test]
    fn tick_count_covers_window() {
        let spec = WindowSpec::new(Duration::from_secs(10), Duration::from_secs(1));
        assert_eq!(spec.tick_count(), 10);
        let spec = WindowSpec::new(Duration::from_millis(2500), Duration::from_secs(1));
        assert_eq!(spec.tick_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn window_ticks_then_completes() {
        let mut scheduler = Scheduler::new();
        let started = Instant::now();
        let (_handle, mut rx) = window_events(
            &mut scheduler,
            WindowSpec::new(Duration::from_secs(10), Duration::from_secs(1)),
        );

        let mut fired = Vec::new();
        while let Some(event) = rx.recv().await {
            let done = event == Fired::Done;
            fired.push(event);
            if done {
                break;
            }
        }

        assert_eq!(fired.len(), 11);
        assert_eq!(fired[0], Fired::Tick(0, 10));
        assert_eq!(fired[9], Fired::Tick(9, 1));
        assert_eq!(fired[10], Fired::Done);
        assert_eq!(started.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_window_never_completes() {
        let mut scheduler = Scheduler::new();
        let (handle, mut rx) = window_events(
            &mut scheduler,
            WindowSpec::new(Duration::from_secs(10), Duration::from_secs(1)),
        );

        for expected in 0..3 {
            match rx.recv().await {
                Some(Fired::Tick(index, _)) => assert_eq!(index, expected),
                other => panic!("unexpected {other:?}"),
            }
        }
        handle.cancel();
        assert!(handle.is_cancelled());

        time::sleep(Duration::from_secs(20)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_action_fires_once_after_delay() {
        let mut scheduler = Scheduler::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let started = Instant::now();
        let handle = scheduler.delay(Duration::from_secs(30), move |_| {
            let _ = tx.send(Fired::Action);
        });

        assert_eq!(rx.recv().await, Some(Fired::Action));
        assert_eq!(started.elapsed(), Duration::from_secs(30));
        assert!(!handle.is_cancelled());
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_delay_is_suppressed() {
        let mut scheduler = Scheduler::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = scheduler.delay(Duration::from_secs(5), move |_| {
            let _ = tx.send(Fired::Action);
        });

        time::sleep(Duration::from_secs(2)).await;
        handle.cancel();
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_stops_everything_but_later_timers_run() {
        let mut scheduler = Scheduler::new();
        let (_window, mut window_rx) = window_events(
            &mut scheduler,
            WindowSpec::new(Duration::from_secs(10), Duration::from_secs(1)),
        );
        let (tx, mut delay_rx) = mpsc::unbounded_channel();
        let stale = tx.clone();
        let old_delay = scheduler.delay(Duration::from_secs(3), move |_| {
            let _ = stale.send(1u8);
        });

        assert_eq!(window_rx.recv().await, Some(Fired::Tick(0, 10)));
        scheduler.cancel_all();
        assert!(old_delay.is_cancelled());

        let fresh = scheduler.delay(Duration::from_secs(4), move |_| {
            let _ = tx.send(2u8);
        });
        assert_ne!(fresh.id(), old_delay.id());

        assert_eq!(delay_rx.recv().await, Some(2));
        assert_eq!(window_rx.recv().await, None);
    }
}

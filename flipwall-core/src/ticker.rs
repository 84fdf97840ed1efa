use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
    },
    time::{Duration, Instant},
};

use crate::wall::WallEvent;

/// Emits [`WallEvent::Tick`] at a fixed cadence from a background thread.
///
/// The thread sleeps in short slices so that dropping the ticker stops it
/// promptly rather than after up to a full period.
pub struct FlipTicker {
    stop: Arc<AtomicBool>,
    _ticker_thread_handle: std::thread::JoinHandle<()>,
}

const POLL_INTERVAL: Duration = Duration::from_millis(10);

impl FlipTicker {
    pub fn new(period: Duration, event_tx: Sender<WallEvent>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();

        let ticker_thread_handle = std::thread::Builder::new()
            .name("flipwall-ticker".to_string())
            .spawn(move || {
                let mut next_tick = Instant::now() + period;
                loop {
                    if thread_stop.load(Ordering::Relaxed) {
                        return;
                    }
                    let now = Instant::now();
                    if now >= next_tick {
                        next_tick = next_deadline(next_tick, now, period);
                        if event_tx.send(WallEvent::Tick).is_err() {
                            // Receiver is gone; the session is over.
                            return;
                        }
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
            })
            .expect("failed to spawn ticker thread");

        Self {
            stop,
            _ticker_thread_handle: ticker_thread_handle,
        }
    }
}

/// The deadline for the tick after one fired at `now`. When the thread fell
/// badly behind (system suspend, a long scheduler stall), the cadence resumes
/// from `now` rather than firing a burst of catch-up ticks.
fn next_deadline(deadline: Instant, now: Instant, period: Duration) -> Instant {
    let next = deadline + period;
    if next > now { next } else { now + period }
}

impl Drop for FlipTicker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_at_roughly_the_configured_period() {
        let (tx, rx) = std::sync::mpsc::channel();
        let _ticker = FlipTicker::new(Duration::from_millis(30), tx);

        // Two ticks should land well within half a second.
        for _ in 0..2 {
            rx.recv_timeout(Duration::from_millis(500))
                .expect("expected a tick");
        }
    }

    #[test]
    fn deadline_advances_by_one_period_when_on_time() {
        let period = Duration::from_secs(2);
        let deadline = Instant::now();
        // The tick fired just barely late, as the poll loop always does.
        let now = deadline + Duration::from_millis(3);
        assert_eq!(next_deadline(deadline, now, period), deadline + period);
    }

    #[test]
    fn deadline_resumes_cadence_after_a_stall() {
        let period = Duration::from_secs(2);
        let deadline = Instant::now();
        let now = deadline + Duration::from_secs(60);
        assert_eq!(next_deadline(deadline, now, period), now + period);
    }

    #[test]
    fn dropping_the_ticker_stops_the_stream() {
        let (tx, rx) = std::sync::mpsc::channel();
        let ticker = FlipTicker::new(Duration::from_millis(20), tx);
        rx.recv_timeout(Duration::from_millis(500))
            .expect("expected a tick");
        drop(ticker);

        // Drain anything in flight, then the channel must disconnect.
        std::thread::sleep(Duration::from_millis(100));
        while rx.try_recv().is_ok() {}
        assert!(rx.try_recv().is_err());
    }
}

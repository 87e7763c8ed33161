use std::time::{Duration, Instant};

/*
 * PollInterval keeps the event loop wakeups spaced apart by the desired
 * interval: each sleep call subtracts both the time the loop body took and
 * the amount the previous sleep overshot by. Deviations larger than one
 * whole interval are forgotten instead of chased, since paying them back
 * would just squeeze the following intervals.
 *
 * max_quantum bounds how long we can go without actually sleeping when the
 * compensation keeps canceling the sleep out; running unchecked would starve
 * everything else on the thread.
 */
pub struct PollInterval {
    interval: Duration,
    max_quantum: Duration,
    task_start: Instant,
    oversleep_duration: Duration,
    quantum_duration: Duration,
}

impl PollInterval {
    pub fn new(interval: Duration, max_quantum: Duration) -> Self {
        PollInterval {
            interval,
            max_quantum,
            task_start: Instant::now(),
            oversleep_duration: Duration::ZERO,
            quantum_duration: Duration::ZERO,
        }
    }

    pub fn sleep(&mut self) {
        let task_duration = self.task_start.elapsed();
        self.quantum_duration += task_duration;

        let mut sleep_duration = self
            .interval
            .saturating_sub(task_duration)
            .saturating_sub(self.oversleep_duration);

        if sleep_duration.is_zero() && self.quantum_duration < self.max_quantum {
            self.oversleep_duration = Duration::ZERO;
        } else {
            if sleep_duration.is_zero() {
                sleep_duration = Duration::from_millis(1);
            }

            let now = Instant::now();
            spin_sleep::sleep(sleep_duration);

            self.oversleep_duration = now.elapsed().saturating_sub(sleep_duration);
            self.quantum_duration = Duration::ZERO;
        }

        self.task_start = Instant::now();
    }
}

pub mod ring;
pub mod timer;

use self::ring::RingBuffer;
use self::timer::SystemTimers;

/// Number of tick durations kept for the rolling stats.
const TICK_HISTORY_LEN: usize = 300;
/// Frame-time seconds between summary log lines.
const LOG_INTERVAL: f64 = 5.0;

/// Tick timing diagnostics. Fed by the runner, logged every few seconds of
/// frame time.
pub struct TickStats {
    /// Wall time spent inside `Sim::tick` (seconds).
    pub tick_times: RingBuffer<f64>,
    pub tick_count: u64,

    log_timer: f64,
    log_tick_count: u32,
}

impl TickStats {
    pub fn new() -> Self {
        Self {
            tick_times: RingBuffer::new(TICK_HISTORY_LEN),
            tick_count: 0,
            log_timer: 0.0,
            log_tick_count: 0,
        }
    }

    /// Record how long one tick took.
    pub fn record_tick(&mut self, tick_secs: f64) {
        self.tick_count += 1;
        self.log_tick_count += 1;
        self.tick_times.push(tick_secs);
    }

    /// Advance the log clock by `wall_dt` seconds. Returns true when a
    /// summary line was written.
    pub fn maybe_log(&mut self, wall_dt: f64, timers: &SystemTimers, cats: usize, balls: usize) -> bool {
        self.log_timer += wall_dt;
        if self.log_timer < LOG_INTERVAL {
            return false;
        }

        let (min, avg, max) = self.tick_times.stats().unwrap_or((0.0, 0.0, 0.0));
        log::info!(
            "ticks: {} ({:.0}/s) | avg: {:.3}ms | min: {:.3}ms | max: {:.3}ms | cats: {} | balls: {}",
            self.tick_count,
            self.log_tick_count as f64 / self.log_timer,
            avg * 1000.0,
            min * 1000.0,
            max * 1000.0,
            cats,
            balls,
        );
        log::debug!("phases: {} | total {:.1}us", timers.summary(), timers.total_us());
        self.log_timer = 0.0;
        self.log_tick_count = 0;
        true
    }
}

impl Default for TickStats {
    fn default() -> Self {
        Self::new()
    }
}

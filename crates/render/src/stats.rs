use std::time::Duration;

use crate::march::{MarchResult, MissReason};

/// Per-frame ray statistics for instrumentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub hits: u64,
    pub escaped: u64,
    pub step_budget: u64,
    pub non_finite: u64,
    /// Field evaluations spent marching, normals excluded.
    pub total_steps: u64,
}

impl FrameStats {
    pub fn record(&mut self, result: &MarchResult) {
        match result {
            MarchResult::Hit { .. } => self.hits += 1,
            MarchResult::Miss { reason, .. } => match reason {
                MissReason::Escaped => self.escaped += 1,
                MissReason::StepBudget => self.step_budget += 1,
                MissReason::NonFinite => self.non_finite += 1,
            },
        }
        self.total_steps += u64::from(result.steps());
    }

    pub fn merge(mut self, other: FrameStats) -> FrameStats {
        self.hits += other.hits;
        self.escaped += other.escaped;
        self.step_budget += other.step_budget;
        self.non_finite += other.non_finite;
        self.total_steps += other.total_steps;
        self
    }

    pub fn rays(&self) -> u64 {
        self.hits + self.misses()
    }

    pub fn misses(&self) -> u64 {
        self.escaped + self.step_budget + self.non_finite
    }

    pub fn hit_ratio(&self) -> f64 {
        match self.rays() {
            0 => 0.0,
            n => self.hits as f64 / n as f64,
        }
    }

    pub fn mean_steps(&self) -> f64 {
        match self.rays() {
            0 => 0.0,
            n => self.total_steps as f64 / n as f64,
        }
    }
}

impl std::fmt::Display for FrameStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rays={} hits={} ({:.1}%) escaped={} step_budget={} non_finite={} mean_steps={:.1}",
            self.rays(),
            self.hits,
            self.hit_ratio() * 100.0,
            self.escaped,
            self.step_budget,
            self.non_finite,
            self.mean_steps()
        )
    }
}

/// Frame time tracker over a fixed window of recent frames.
#[derive(Debug)]
pub struct FrameTimer {
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    /// A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    fn window(&self) -> &[Duration] {
        &self.history[..self.count()]
    }

    pub fn average(&self) -> Duration {
        let count = self.count();
        if count == 0 {
            return Duration::ZERO;
        }
        let total: Duration = self.window().iter().sum();
        total / count as u32
    }

    pub fn max(&self) -> Duration {
        self.window().iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.window().iter().copied().min().unwrap_or(Duration::ZERO)
    }

    pub fn count(&self) -> usize {
        if self.filled {
            self.capacity
        } else {
            self.index
        }
    }

    /// Frames per second implied by the average frame time.
    pub fn fps(&self) -> f64 {
        let avg = self.average().as_secs_f64();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_count_outcomes() {
        let mut stats = FrameStats::default();
        stats.record(&MarchResult::Hit {
            distance: 2.0,
            steps: 3,
        });
        stats.record(&MarchResult::Miss {
            steps: 100,
            reason: MissReason::StepBudget,
        });
        stats.record(&MarchResult::Miss {
            steps: 5,
            reason: MissReason::Escaped,
        });
        assert_eq!(stats.rays(), 3);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.step_budget, 1);
        assert_eq!(stats.total_steps, 108);
        assert!((stats.mean_steps() - 36.0).abs() < 1e-9);
    }

    #[test]
    fn stats_merge_adds_fields() {
        let a = FrameStats {
            hits: 2,
            escaped: 1,
            total_steps: 10,
            ..FrameStats::default()
        };
        let merged = a.merge(a);
        assert_eq!(merged.hits, 4);
        assert_eq!(merged.rays(), 6);
        assert_eq!(merged.total_steps, 20);
    }

    #[test]
    fn display_reports_hit_percentage() {
        let mut stats = FrameStats::default();
        stats.record(&MarchResult::Hit { distance: 1.0, steps: 4 });
        stats.record(&MarchResult::Miss { steps: 2, reason: MissReason::Escaped });
        assert!(stats.to_string().contains("hits=1 (50.0%)"));
    }

    #[test]
    fn empty_stats_have_zero_ratio() {
        assert_eq!(FrameStats::default().hit_ratio(), 0.0);
    }

    #[test]
    fn frame_timer_tracks_history() {
        let mut timer = FrameTimer::new(3);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));

        assert_eq!(timer.count(), 3);
        assert_eq!(timer.average(), Duration::from_millis(20));
        assert_eq!(timer.max(), Duration::from_millis(30));
        assert_eq!(timer.min(), Duration::from_millis(10));
        assert!((timer.fps() - 50.0).abs() < 1e-6);
    }

    #[test]
    fn frame_timer_wraps_around() {
        let mut timer = FrameTimer::new(2);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30)); // overwrites first

        assert_eq!(timer.count(), 2);
        assert_eq!(timer.average(), Duration::from_millis(25));
    }

    #[test]
    fn empty_timer_reports_zero() {
        let timer = FrameTimer::new(0);
        assert_eq!(timer.average(), Duration::ZERO);
        assert_eq!(timer.fps(), 0.0);
    }
}

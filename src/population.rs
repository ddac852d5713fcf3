/// Settlement head-count. `idle + workers == total` and `total <= max_population`
/// hold after every operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    total: u32,
    idle: u32,
    workers: u32,
    growth_rate: f64,
    max_population: u32,
    growth_progress: f64,
}

impl Default for Population {
    fn default() -> Self {
        Self::new(5, 10, 0.0)
    }
}

impl Population {
    /// Everyone starts idle. `total` is clamped to the cap.
    pub fn new(total: u32, max_population: u32, growth_rate: f64) -> Self {
        let total = total.min(max_population);
        Self {
            total,
            idle: total,
            workers: 0,
            growth_rate: sanitize_rate(growth_rate),
            max_population,
            growth_progress: 0.0,
        }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn idle(&self) -> u32 {
        self.idle
    }

    pub fn workers(&self) -> u32 {
        self.workers
    }

    pub fn growth_rate(&self) -> f64 {
        self.growth_rate
    }

    pub fn max_population(&self) -> u32 {
        self.max_population
    }

    pub fn raise_cap(&mut self, delta: u32) {
        self.max_population = self.max_population.saturating_add(delta);
    }

    pub fn add_growth(&mut self, delta: f64) {
        self.growth_rate = sanitize_rate(self.growth_rate + delta);
    }

    /// Accumulates `growth_rate * dt`; each whole person arrives idle.
    pub fn advance(&mut self, dt_seconds: f64) {
        self.growth_progress += self.growth_rate * dt_seconds;
        if self.growth_progress < 1.0 {
            return;
        }
        let arrivals = self.growth_progress.floor();
        self.growth_progress -= arrivals;
        let arrivals = if arrivals >= u32::MAX as f64 {
            u32::MAX
        } else {
            arrivals as u32
        };

        self.total = self.total.saturating_add(arrivals);
        self.idle = self.idle.saturating_add(arrivals);
        if self.total > self.max_population {
            let excess = self.total - self.max_population;
            self.total = self.max_population;
            self.idle = self.idle.saturating_sub(excess);
        }
    }

    pub fn assign_workers(&mut self, count: u32) -> bool {
        if count > self.idle {
            return false;
        }
        self.idle -= count;
        self.workers += count;
        true
    }

    pub fn release_workers(&mut self, count: u32) -> bool {
        if count > self.workers {
            return false;
        }
        self.workers -= count;
        self.idle += count;
        true
    }
}

fn sanitize_rate(rate: f64) -> f64 {
    if rate.is_finite() {
        rate.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_accumulates_fractional_progress() {
        let mut pop = Population::new(2, 10, 0.4);
        pop.advance(1.0);
        pop.advance(1.0);
        assert_eq!(pop.total(), 2);
        pop.advance(1.0);
        assert_eq!(pop.total(), 3);
        assert_eq!(pop.idle(), 3);
        assert_eq!(pop.workers(), 0);
    }

    #[test]
    fn growth_is_capped() {
        let mut pop = Population::new(9, 10, 5.0);
        assert!(pop.assign_workers(4));
        pop.advance(1.0);
        assert_eq!(pop.total(), 10);
        assert_eq!(pop.workers(), 4);
        assert_eq!(pop.idle(), 6);
    }

    #[test]
    fn cap_and_growth_deltas() {
        let mut pop = Population::default();
        pop.raise_cap(5);
        pop.add_growth(0.5);
        assert_eq!(pop.max_population(), 15);
        pop.advance(20.0);
        assert_eq!(pop.total(), 15);
        assert_eq!(pop.idle(), 15);
    }

    #[test]
    fn worker_moves_are_all_or_nothing() {
        let mut pop = Population::new(3, 10, 0.0);
        assert!(!pop.assign_workers(4));
        assert_eq!(pop.idle(), 3);
        assert!(pop.assign_workers(2));
        assert!(!pop.release_workers(3));
        assert!(pop.release_workers(2));
        assert_eq!(pop.idle(), 3);
        assert_eq!(pop.workers(), 0);
    }

    #[test]
    fn new_clamps_to_cap() {
        let pop = Population::new(50, 10, 0.0);
        assert_eq!(pop.total(), 10);
        assert_eq!(pop.idle(), 10);
    }
}

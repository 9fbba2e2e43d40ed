/// Debounce timer driven by caller-supplied timestamps in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    duration: f64,
    last_trigger: Option<f64>,
}

impl Cooldown {
    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            last_trigger: None,
        }
    }

    pub fn is_active(&self, now: f64) -> bool {
        self.last_trigger
            .is_some_and(|triggered| now - triggered < self.duration)
    }

    /// Starts the cooldown unless it is already running. Returns whether it fired.
    pub fn try_trigger(&mut self, now: f64) -> bool {
        if self.is_active(now) {
            return false;
        }
        self.last_trigger = Some(now);
        true
    }

    pub fn remaining(&self, now: f64) -> f64 {
        match self.last_trigger {
            Some(triggered) => (self.duration - (now - triggered)).max(0.0),
            None => 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.last_trigger = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_retrigger_until_expired() {
        let mut cooldown = Cooldown::new(2.0);

        assert!(cooldown.try_trigger(10.0));
        assert!(cooldown.is_active(11.999));
        assert!(!cooldown.try_trigger(11.5));
        assert!(!cooldown.is_active(12.0));
        assert!(cooldown.try_trigger(12.0));
    }

    #[test]
    fn remaining_counts_down() {
        let mut cooldown = Cooldown::new(2.0);
        assert_eq!(cooldown.remaining(0.0), 0.0);

        cooldown.try_trigger(1.0);
        assert!((cooldown.remaining(1.5) - 1.5).abs() < 1e-9);
        assert_eq!(cooldown.remaining(5.0), 0.0);

        cooldown.reset();
        assert!(!cooldown.is_active(1.5));
    }
}

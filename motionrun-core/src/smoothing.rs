use std::collections::VecDeque;

/// Fixed-size shift-and-push moving average.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: VecDeque<f32>,
    size: usize,
}

impl MovingAverage {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            window: VecDeque::with_capacity(size),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Pushes a sample and returns the new average. The first sample fills
    /// the whole window so early averages are not pulled towards zero.
    pub fn push(&mut self, sample: f32) -> f32 {
        if self.window.is_empty() {
            self.window.extend(std::iter::repeat_n(sample, self.size));
        } else {
            self.window.pop_front();
            self.window.push_back(sample);
        }
        self.average().unwrap_or(sample)
    }

    pub fn average(&self) -> Option<f32> {
        if self.window.is_empty() {
            return None;
        }
        Some(self.window.iter().sum::<f32>() / self.window.len() as f32)
    }

    pub fn clear(&mut self) {
        self.window.clear();
    }
}

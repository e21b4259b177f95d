// Progress bookkeeping for a single preload run.

/// Percentage of `completed` out of `total`, rounded half up.
pub fn percent_of(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let completed = completed.min(total);
    ((200 * completed + total) / (2 * total)) as u8
}

/// Owns the progress integer of one run. Values only move forward.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: usize,
    completed: usize,
    last_reported: Option<u8>,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            last_reported: None,
        }
    }

    /// Record one settled asset and return the percentage to report.
    pub fn settle(&mut self) -> u8 {
        self.completed = (self.completed + 1).min(self.total);
        let percent = percent_of(self.completed, self.total);
        self.last_reported = Some(percent);
        percent
    }

    /// Force progress to 100. Returns `None` when 100 was already the last report.
    pub fn finish(&mut self) -> Option<u8> {
        if self.last_reported == Some(100) {
            return None;
        }
        self.last_reported = Some(100);
        Some(100)
    }

    pub fn percent(&self) -> u8 {
        self.last_reported.unwrap_or(0)
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

use serde::Serialize;

/// Result of feeding one seated-count sample to an occupancy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OccupancyVerdict {
    /// Sample agreed (or was unusable); keep sampling.
    Continue,
    /// First disagreeing sample; the window must stop here.
    Mismatch { expected: u32, detected: u32 },
    /// The check already concluded; the sample was not evaluated.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OccupancyOutcome {
    Confirmed { expected: u32, agreeing: usize },
    Mismatch { expected: u32, detected: u32 },
}

/// Streaming comparison of seated counts against a snapshotted expectation.
#[derive(Debug, Clone)]
pub struct OccupancyCheck {
    expected: u32,
    agreeing: usize,
    failed: usize,
    mismatch: Option<u32>,
}

impl OccupancyCheck {
    pub fn new(expected: u32) -> Self {
        Self {
            expected,
            agreeing: 0,
            failed: 0,
            mismatch: None,
        }
    }

    /// Number of samples actually compared, including a mismatching one.
    #[cfg(test)]
    pub fn evaluated(&self) -> usize {
        self.agreeing + usize::from(self.mismatch.is_some())
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    #[cfg(test)]
    pub fn is_concluded(&self) -> bool {
        self.mismatch.is_some()
    }

    /// `None` stands for a failed detection and never counts as a mismatch.
    pub fn observe(&mut self, seated: Option<u32>) -> OccupancyVerdict {
        if self.mismatch.is_some() {
            return OccupancyVerdict::Ignored;
        }
        match seated {
            None => {
                self.failed += 1;
                OccupancyVerdict::Continue
            }
            Some(count) if count == self.expected => {
                self.agreeing += 1;
                OccupancyVerdict::Continue
            }
            Some(detected) => {
                self.mismatch = Some(detected);
                OccupancyVerdict::Mismatch {
                    expected: self.expected,
                    detected,
                }
            }
        }
    }

    pub fn finish(self) -> OccupancyOutcome {
        match self.mismatch {
            Some(detected) => OccupancyOutcome::Mismatch {
                expected: self.expected,
                detected,
            },
            None => OccupancyOutcome::Confirmed {
                expected: self.expected,
                agreeing: self.agreeing,
            },
        }
    }
}

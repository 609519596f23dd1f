/// Accelerating scroll schedule.
///
/// Each segment scrolls `rows_per_segment` rows; every completed segment
/// shortens the next one by `factor`, so the scroll speed grows geometrically.
#[derive(Debug, Clone, PartialEq)]
pub struct Speedup {
    base: f64,
    rows_per_segment: f64,
    duration_ms: f64,
    factor: f64,
    segments: u32,
}

impl Speedup {
    pub fn new(rows_per_segment: f64, initial_duration_ms: f64, factor: f64) -> Self {
        Self {
            base: 0.0,
            rows_per_segment,
            duration_ms: initial_duration_ms,
            factor,
            segments: 0,
        }
    }

    /// Offset the current segment scrolls to.
    pub fn target(&self) -> f64 {
        self.base + self.rows_per_segment
    }

    /// Duration of the current segment.
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Number of segments completed so far.
    pub fn segments(&self) -> u32 {
        self.segments
    }

    /// Rows per second of the current segment (for diagnostics).
    pub fn rows_per_second(&self) -> f64 {
        self.rows_per_segment * 1000.0 / self.duration_ms
    }

    /// Move to the next, faster segment.
    pub fn advance(&mut self) {
        self.base += self.rows_per_segment;
        self.duration_ms *= self.factor;
        self.segments += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_segment_matches_configuration() {
        let speedup = Speedup::new(10.0, 5000.0, 0.9);
        assert_eq!(speedup.target(), 10.0);
        assert_eq!(speedup.duration_ms(), 5000.0);
        assert_eq!(speedup.rows_per_second(), 2.0);
    }

    #[test]
    fn each_segment_is_faster() {
        let mut speedup = Speedup::new(10.0, 5000.0, 0.9);
        speedup.advance();
        assert_eq!(speedup.target(), 20.0);
        assert!((speedup.duration_ms() - 4500.0).abs() < 1e-9);
        speedup.advance();
        assert_eq!(speedup.target(), 30.0);
        assert!((speedup.duration_ms() - 4050.0).abs() < 1e-9);
        assert_eq!(speedup.segments(), 2);
    }
}

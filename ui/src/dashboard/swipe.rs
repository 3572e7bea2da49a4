//! Horizontal swipes on the dashboard step through days.

/// Minimum horizontal travel, in CSS pixels, for a touch to count as a swipe.
pub const SWIPE_THRESHOLD: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStep {
    Previous,
    Next,
}

/// Classify a touch that moved by `(dx, dy)`. Mostly-vertical moves scroll
/// and are ignored; a leftward swipe goes to the next day.
pub fn classify(dx: f64, dy: f64) -> Option<DayStep> {
    if dx.abs() <= SWIPE_THRESHOLD || dx.abs() <= dy.abs() {
        return None;
    }
    Some(if dx < 0.0 { DayStep::Next } else { DayStep::Previous })
}

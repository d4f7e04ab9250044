// Gap boundary synthesis
use crate::domain::reading::Reading;
use crate::domain::window::DisplayWindow;

/// Pad a chronologically sorted sequence with null sentinels so it spans the
/// whole window. Charts need explicit domain bounds independent of data
/// density, otherwise a sparse series renders on a compressed time axis.
pub fn fill_boundaries(readings: Vec<Reading>, window: &DisplayWindow) -> Vec<Reading> {
    let (first, last) = match (readings.first(), readings.last()) {
        (Some(first), Some(last)) => (first.timestamp, last.timestamp),
        _ => return vec![Reading::gap(window.start()), Reading::gap(window.end())],
    };

    let mut filled = Vec::with_capacity(readings.len() + 2);
    if first > window.start() {
        filled.push(Reading::gap(window.start()));
    }
    filled.extend(readings);
    if last < window.end() {
        filled.push(Reading::gap(window.end()));
    }
    filled
}

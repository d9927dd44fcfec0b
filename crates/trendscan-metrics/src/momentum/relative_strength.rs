//! Composite relative-strength score
//!
//! Compares the latest close against closes roughly one, two and three
//! quarters back plus the oldest close in the window. The most recent
//! quarter carries double weight.

/// Newest-first indices of the quarterly checkpoints (~63, ~126, ~189
/// trading days back).
pub const CHECKPOINTS: [usize; 3] = [62, 125, 188];

/// Weight applied to the most recent checkpoint.
pub const RECENT_WEIGHT: f64 = 2.0;

/// Compute the relative-strength score from newest-first closes.
///
/// The fourth horizon uses the oldest available close, so windows of 251
/// and 252 points both score. Returns `None` when the window does not reach
/// past the last checkpoint.
pub fn relative_strength(closes: &[f64]) -> Option<f64> {
    let oldest = CHECKPOINTS[2] + 1;
    if closes.len() <= oldest {
        return None;
    }

    let last = closes[0];
    let ratio = |k: usize| last / closes[k];

    Some(
        RECENT_WEIGHT * ratio(CHECKPOINTS[0])
            + ratio(CHECKPOINTS[1])
            + ratio(CHECKPOINTS[2])
            + ratio(closes.len() - 1),
    )
}

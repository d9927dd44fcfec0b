//! Two-quarter rolling average.

/// Average each quarter with the next older one, newest first.
///
/// With `floor` set, negative values count as zero inside the average. The
/// oldest quarter, and any quarter whose older neighbour is missing, is kept
/// unchanged. A missing quarter stays missing.
pub fn rolling_average(series: &[Option<f64>], floor: bool) -> Vec<Option<f64>> {
    let clamp = |x: f64| if floor { x.max(0.0) } else { x };

    series
        .iter()
        .enumerate()
        .map(|(q, current)| {
            let current = (*current)?;
            match series.get(q + 1).copied().flatten() {
                Some(older) => Some((clamp(current) + clamp(older)) / 2.0),
                None => Some(current),
            }
        })
        .collect()
}

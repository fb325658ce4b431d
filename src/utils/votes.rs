//! Helpers for per-class score vectors

/// Index of the largest score, lowest index on ties.
///
/// NaN scores never win. Returns `None` for an empty slice.
pub fn max_index(votes: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in votes.iter().enumerate() {
        match best {
            None if !v.is_nan() => best = Some((i, v)),
            Some((_, b)) if v > b => best = Some((i, v)),
            _ => {}
        }
    }
    best.map(|(i, _)| i).or(if votes.is_empty() { None } else { Some(0) })
}

/// Sum of all scores
pub fn total_mass(votes: &[f64]) -> f64 {
    votes.iter().sum()
}

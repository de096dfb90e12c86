use std::time::Duration;

/// Characters per "word" in gross wpm.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Accuracy and gross wpm for one point in a session
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Score {
    pub accuracy: f64,
    pub wpm: f64,
}

/// Number of typed positions that differ from the reference at the same index.
pub fn mismatch_count(reference: &[char], typed: &[char]) -> usize {
    // anything typed past the end of the reference counts as a mismatch
    let overflow = typed.len().saturating_sub(reference.len());

    typed
        .iter()
        .zip(reference.iter())
        .filter(|(t, r)| t != r)
        .count()
        + overflow
}

/// Accuracy in percent against the full reference length.
///
/// Untyped positions count as correct, so a fresh session reads 100.
pub fn accuracy(reference: &[char], typed: &[char]) -> f64 {
    if reference.is_empty() {
        return 100.0;
    }

    let total = reference.len() as f64;
    let mismatches = mismatch_count(reference, typed).min(reference.len()) as f64;

    100.0 * (total - mismatches) / total
}

/// Gross wpm: `(reference_len / 5) / minutes`. Zero elapsed time reports 0.
pub fn gross_wpm(reference_len: usize, elapsed: Duration) -> f64 {
    let minutes = elapsed.as_secs_f64() / 60.0;
    if minutes <= 0.0 {
        return 0.0;
    }

    (reference_len as f64 / CHARS_PER_WORD) / minutes
}

pub fn score(reference: &[char], typed: &[char], elapsed: Duration) -> Score {
    Score {
        accuracy: accuracy(reference, typed),
        wpm: gross_wpm(reference.len(), elapsed),
    }
}

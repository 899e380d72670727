//! Candidate selection helpers for callers of a recognizer.
//!
//! Recognizers never rank their own output. These helpers implement the
//! usual caller policy: prefer higher confidence, then the longer span, then
//! the candidate produced first.

use std::cmp::Ordering;

use crate::TermMatch;

/// Picks the best candidate: highest confidence, then longest span.
///
/// Ties keep the earliest produced candidate.
///
/// # Examples
///
/// ```
/// use field_recognizer_core::{best_match, TermMatch, Value};
///
/// let matches = vec![
///     TermMatch::new(0, 3, 0.43, Some(Value::Choice("Red".into()))),
///     TermMatch::new(0, 7, 1.0, Some(Value::Choice("Reddish".into()))),
/// ];
/// let best = best_match(matches).unwrap();
/// assert_eq!(best.value, Some(Value::Choice("Reddish".into())));
/// ```
pub fn best_match<I>(matches: I) -> Option<TermMatch>
where
    I: IntoIterator<Item = TermMatch>,
{
    let mut best: Option<TermMatch> = None;
    for candidate in matches {
        let replace = match &best {
            None => true,
            Some(current) => rank(&candidate, current) == Ordering::Greater,
        };
        if replace {
            best = Some(candidate);
        }
    }
    best
}

/// Drops candidates whose span is strictly covered by a candidate of equal or
/// higher confidence.
///
/// Order of the surviving candidates is preserved.
pub fn remove_covered(matches: Vec<TermMatch>) -> Vec<TermMatch> {
    matches
        .iter()
        .enumerate()
        .filter(|(i, candidate)| {
            !matches.iter().enumerate().any(|(j, other)| {
                *i != j
                    && other.covers(candidate)
                    && !other.is_same_span(candidate)
                    && other.confidence >= candidate.confidence
            })
        })
        .map(|(_, candidate)| candidate.clone())
        .collect()
}

fn rank(a: &TermMatch, b: &TermMatch) -> Ordering {
    a.confidence
        .partial_cmp(&b.confidence)
        .unwrap_or(Ordering::Equal)
        .then(a.length.cmp(&b.length))
}

use std::collections::HashSet;

use rand::rngs::SmallRng;

use crate::error::CoreError;
use crate::random;

#[derive(Clone, Debug)]
pub struct OptionEntry {
    pub text: String,
    pub is_correct: bool,
}

/// A fixed-size multiple-choice set with exactly one correct entry.
#[derive(Clone, Debug)]
pub struct OptionSet {
    pub entries: Vec<OptionEntry>,
    pub correct_index: usize,
}

/// Build `k` unique options around `correct`, drawing distractors
/// uniformly from `candidates`. The field extracted from the candidate
/// universe (translation, headword) is the caller's choice; this routine
/// only sees strings.
pub fn build_options(
    correct: &str,
    candidates: &[&str],
    k: usize,
    rng: &mut SmallRng,
) -> Result<OptionSet, CoreError> {
    let mut distinct: HashSet<&str> = candidates.iter().copied().collect();
    distinct.insert(correct);
    if distinct.len() < k {
        return Err(CoreError::InsufficientCandidates {
            needed: k,
            distinct: distinct.len(),
        });
    }

    // The distinct-count guard above bounds this loop: k unique texts
    // exist in candidates ∪ {correct}.
    let mut texts: Vec<&str> = vec![correct];
    while texts.len() < k {
        let Some(&pick) = random::pick_uniform(candidates, rng) else {
            break;
        };
        if !texts.contains(&pick) {
            texts.push(pick);
        }
    }

    random::shuffle(&mut texts, rng);
    let correct_index = texts.iter().position(|&t| t == correct).unwrap_or(0);
    let entries = texts
        .into_iter()
        .map(|text| OptionEntry {
            is_correct: text == correct,
            text: text.to_string(),
        })
        .collect();

    Ok(OptionSet {
        entries,
        correct_index,
    })
}

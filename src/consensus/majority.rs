use std::collections::HashMap;

use crate::error::{GameError, GameResult};

/// Most frequent value; ties go to whichever tied value appeared first.
///
/// An empty sequence is `UndeterminedConsensus`, never a coincidental zero.
pub fn majority_vote(values: &[u32]) -> GameResult<u32> {
    let mut tallies: HashMap<u32, (usize, usize)> = HashMap::new();
    for (position, value) in values.iter().enumerate() {
        let entry = tallies.entry(*value).or_insert((0, position));
        entry.0 += 1;
    }

    tallies
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value)
        .ok_or(GameError::UndeterminedConsensus { samples: 0 })
}

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::filter::Selection;
use crate::error::{DashboardError, Result};
use crate::model::Record;

/// Pick one record uniformly at random.
///
/// The random source is supplied by the caller so a fixed seed gives a
/// reproducible pick.
pub fn sample_one<'a, R>(selection: &Selection<'a>, rng: &mut R) -> Result<&'a Record>
where
    R: Rng + ?Sized,
{
    selection
        .records()
        .choose(rng)
        .copied()
        .ok_or_else(|| DashboardError::EmptySelection("the current selection".to_string()))
}

/// Seeded when `seed` is given, otherwise seeded from OS entropy.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

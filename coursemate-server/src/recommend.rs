//! Course recommendation
//!
//! Candidate spots come from a region filter on the address. Previously
//! shown spots are excluded, the rest are shuffled, and the first few get a
//! rank-based score. The score is synthetic: it reflects position in the
//! shuffled list, not affinity with the user.

use rand::seq::SliceRandom;
use rand::Rng;
use sqlx::PgPool;

use crate::db::{DbError, SpotRepo};
use crate::models::Region;

/// Spots returned per recommendation when the caller has no preference
pub const DEFAULT_LIMIT: usize = 3;

const TOP_SCORE: f64 = 0.95;
const SCORE_STEP: f64 = 0.05;

/// One recommended spot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation {
    pub spot_id: i64,
    pub match_score: f64,
}

/// Score for the spot at `rank` (0-based), rounded to two decimals.
///
/// ```
/// use coursemate_server::recommend::match_score;
///
/// assert_eq!(match_score(0), 0.95);
/// assert_eq!(match_score(2), 0.85);
/// ```
pub fn match_score(rank: usize) -> f64 {
    let raw = TOP_SCORE - SCORE_STEP * rank as f64;
    (raw * 100.0).round() / 100.0
}

/// Drop excluded ids, shuffle uniformly, keep the first `limit`.
pub fn select<R>(
    mut candidates: Vec<i64>,
    exclude: &[i64],
    limit: usize,
    rng: &mut R,
) -> Vec<Recommendation>
where
    R: Rng + ?Sized,
{
    candidates.retain(|id| !exclude.contains(id));
    candidates.shuffle(rng);

    candidates
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(rank, spot_id)| Recommendation {
            spot_id,
            match_score: match_score(rank),
        })
        .collect()
}

/// Picks spots for a region straight from the database
pub struct RecommendationSelector<'a> {
    pool: &'a PgPool,
}

impl<'a> RecommendationSelector<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Recommend up to `limit` spots in `region`, never any of `exclude`.
    ///
    /// An empty result means nothing matched; it is not an error.
    pub async fn recommend(
        &self,
        region: &Region,
        exclude: &[i64],
        limit: usize,
    ) -> Result<Vec<Recommendation>, DbError> {
        let candidates = SpotRepo::new(self.pool).ids_in_region(region).await?;

        if candidates.is_empty() {
            tracing::info!(region = region.as_str(), "no spots in region");
            return Ok(Vec::new());
        }

        let total = candidates.len();
        let picked = select(candidates, exclude, limit, &mut rand::thread_rng());

        tracing::debug!(
            region = region.as_str(),
            candidates = total,
            excluded = exclude.len(),
            picked = picked.len(),
            "recommendation selected"
        );
        Ok(picked)
    }
}

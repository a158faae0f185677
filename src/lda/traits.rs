// LDA backend trait — swap-ready abstraction.
//
// The pipeline only needs `fit(dtm, k, seed) -> (gamma, beta)`. The default
// backend is a collapsed Gibbs sampler; a variational implementation could
// slot in behind the same interface.

use crate::error::Result;
use crate::text::dtm::DocumentTermMatrix;

use super::model::TopicModel;

/// A numerical routine that fits LDA with a fixed topic count.
///
/// Implementations must be deterministic for a given `(dtm, k, seed)` and
/// must not share mutable RNG state between calls, since the topic-count
/// selector runs several fits concurrently.
pub trait LdaBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Fit one model with `k` topics.
    fn fit(&self, dtm: &DocumentTermMatrix, k: usize, seed: u64) -> Result<TopicModel>;
}

// LDA inference — a pluggable backend trait, the fitted model, and the
// default collapsed Gibbs sampler.

pub mod gibbs;
pub mod model;
pub mod traits;

pub use gibbs::GibbsSampler;
pub use model::TopicModel;
pub use traits::LdaBackend;

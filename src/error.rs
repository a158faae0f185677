// Error kinds for the topic-model pipeline.
//
// Every stage (DTM builder, LDA engine, topic-count selector) reports one of
// these. I/O-facing code (CSV loading, export, config) uses anyhow instead.

use thiserror::Error;

/// Errors raised by the pipeline stages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopicModelError {
    /// No documents, or nothing left in the vocabulary after normalization.
    #[error("corpus is empty: {0}")]
    EmptyCorpus(String),

    /// k must be at least 2 and no larger than the vocabulary.
    #[error("invalid topic count k={k} (must be between 2 and the vocabulary size {vocabulary_size})")]
    InvalidTopicCount { k: usize, vocabulary_size: usize },

    /// The numerical fit failed or produced non-finite values.
    #[error("inference failed: {0}")]
    Inference(String),
}

pub type Result<T> = std::result::Result<T, TopicModelError>;

/// Check a candidate topic count against the vocabulary size.
pub fn validate_topic_count(k: usize, vocabulary_size: usize) -> Result<()> {
    if k < 2 || k > vocabulary_size {
        return Err(TopicModelError::InvalidTopicCount { k, vocabulary_size });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_topic_count_bounds() {
        assert!(validate_topic_count(2, 8).is_ok());
        assert!(validate_topic_count(8, 8).is_ok());
        assert_eq!(
            validate_topic_count(1, 8),
            Err(TopicModelError::InvalidTopicCount {
                k: 1,
                vocabulary_size: 8
            })
        );
        assert!(validate_topic_count(0, 8).is_err());
        assert!(validate_topic_count(9, 8).is_err());
    }

    #[test]
    fn test_error_messages_name_the_problem() {
        let err = TopicModelError::InvalidTopicCount {
            k: 20,
            vocabulary_size: 8,
        };
        assert!(err.to_string().contains("k=20"));
        assert!(TopicModelError::EmptyCorpus("no documents".into())
            .to_string()
            .contains("no documents"));
    }
}

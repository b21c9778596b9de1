use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected dataset shape for {context}: {reason}")]
    UnexpectedShape { context: String, reason: String },
}

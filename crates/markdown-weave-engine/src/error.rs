/// Errors that escape the engine.
///
/// Malformed markup never produces one of these: syntax problems are
/// recovered in place and stay visible in the output.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An evaluator failure whose category the caller asked to see directly.
    #[error("expression evaluation failed ({category}): {message}")]
    Evaluation { category: String, message: String },
    /// `diff` was asked to compare documents with different root shapes.
    #[error("cannot diff a {old} document against a {new} document")]
    IncompatibleRoots {
        old: &'static str,
        new: &'static str,
    },
    /// A host inclusion loader found a document that includes itself.
    #[error("inclusion cycle through {0}")]
    InclusionCycle(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

use thiserror::Error;

/// Failure of a single `scan()` call.
///
/// Every variant wraps the collaborator error that caused it. Nothing here is
/// retried; the caller decides whether to scan again.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to enumerate documents")]
    Enumerate(#[source] anyhow::Error),

    #[error("failed to determine document path")]
    Path(#[source] anyhow::Error),

    #[error("failed to read links from {path}")]
    ReadLinks {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to resolve link {target:?} from {path}")]
    Resolve {
        path: String,
        target: String,
        #[source]
        source: anyhow::Error,
    },
}

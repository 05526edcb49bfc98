use thiserror::Error;

/// Failures reported by the memory manager.
///
/// The last two variants guard states that cannot be reached while the
/// manager's bookkeeping is consistent; they exist so an inconsistency
/// degrades into an error instead of a panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A size argument was zero.
    #[error("size must be greater than zero")]
    InvalidSize,

    /// The process id is unknown, or registered under the other
    /// allocation scheme than the operation expects.
    #[error("process not found: {0}")]
    ProcessNotFound(String),

    /// The page number has no entry in the process's page table.
    #[error("page {page} out of range for process {process}")]
    PageOutOfRange { process: String, page: usize },

    /// First-fit could not place the named segment; nothing was committed.
    #[error("unable to allocate segment {segment}")]
    InsufficientSpace { segment: String },

    /// FIFO replacement was asked for a victim while the queue was empty.
    #[error("FIFO queue empty during replacement")]
    EmptyFifoQueue,

    /// LRU replacement found no occupied frame to evict.
    #[error("no resident pages available for LRU eviction")]
    NoResidentPages,
}

pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_culprit() {
        let err = SimError::ProcessNotFound("P9".to_string());
        assert_eq!(err.to_string(), "process not found: P9");

        let err = SimError::PageOutOfRange { process: "P1".to_string(), page: 4 };
        assert_eq!(err.to_string(), "page 4 out of range for process P1");

        let err = SimError::InsufficientSpace { segment: "heap".to_string() };
        assert_eq!(err.to_string(), "unable to allocate segment heap");
    }
}

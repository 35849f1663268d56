use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The detector's spellcheck call failed. The original error is kept as
    /// the source so callers can downcast it.
    #[error("spellcheck detector failed")]
    Detector(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("detector returned range {start}..{end}, which does not fit a {len}-byte document")]
    InvalidRange { start: usize, end: usize, len: usize },
}

impl Error {
    pub(crate) fn detector<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Detector(Box::new(err))
    }
}

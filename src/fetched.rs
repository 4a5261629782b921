use crate::error::CmsError;

/// Outcome of a content fetch that never fails outright.
///
/// A failed fetch still yields a usable value (an empty list or `None`),
/// but stays distinguishable from content that is genuinely empty.
#[derive(Debug)]
pub enum Fetched<T> {
    /// The content source answered and this is its content.
    Fresh(T),
    /// The content source failed; `value` is the empty stand-in.
    Fallback { value: T, error: CmsError },
}

impl<T> Fetched<T> {
    /// Settle a fetch result, substituting `T::default()` on error.
    pub fn settle(result: Result<T, CmsError>) -> Self
    where
        T: Default,
    {
        match result {
            Ok(value) => Fetched::Fresh(value),
            Err(error) => Fetched::Fallback {
                value: T::default(),
                error,
            },
        }
    }

    /// The content, or the empty stand-in after a failure.
    pub fn value(&self) -> &T {
        match self {
            Fetched::Fresh(value) | Fetched::Fallback { value, .. } => value,
        }
    }

    /// Consume and return the content, fresh or not.
    pub fn into_value(self) -> T {
        match self {
            Fetched::Fresh(value) | Fetched::Fallback { value, .. } => value,
        }
    }

    /// Whether the fetch failed and the value is a stand-in.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Fetched::Fallback { .. })
    }

    /// The error behind a fallback, if any.
    pub fn error(&self) -> Option<&CmsError> {
        match self {
            Fetched::Fresh(_) => None,
            Fetched::Fallback { error, .. } => Some(error),
        }
    }

    /// Split into the value and whether it is a fallback.
    pub fn into_parts(self) -> (T, bool) {
        let degraded = self.is_fallback();
        (self.into_value(), degraded)
    }

    /// Transform the value while keeping the fresh or fallback state.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Fetched::Fresh(value) => Fetched::Fresh(f(value)),
            Fetched::Fallback { value, error } => Fetched::Fallback {
                value: f(value),
                error,
            },
        }
    }

    /// Turn back into a plain `Result`, discarding the fallback value.
    pub fn into_result(self) -> Result<T, CmsError> {
        match self {
            Fetched::Fresh(value) => Ok(value),
            Fetched::Fallback { error, .. } => Err(error),
        }
    }
}

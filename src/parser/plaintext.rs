use std::borrow::Cow;

/// Plain text has no markup to skip: the detector sees every byte.
pub fn mask(content: &str) -> Cow<'_, str> {
    Cow::Borrowed(content)
}

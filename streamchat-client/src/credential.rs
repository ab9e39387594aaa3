//! The bearer credential sent with every request.

use zeroize::Zeroizing;

/// An opaque bearer token. Cannot be logged, serialized, or cloned.
/// Memory is zeroed on drop via [`Zeroizing`].
///
/// The token is only visible inside [`Credential::with_token`].
pub struct Credential {
    inner: Zeroizing<String>,
}

impl Credential {
    /// Wrap a token. The string is moved, not copied.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            inner: Zeroizing::new(token.into()),
        }
    }

    /// Scoped exposure of the token.
    pub fn with_token<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        f(&self.inner)
    }

    /// True if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The `Authorization` header value for this token.
    pub(crate) fn bearer_header(&self) -> Zeroizing<String> {
        self.with_token(|token| Zeroizing::new(format!("Bearer {token}")))
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

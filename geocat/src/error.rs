// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;

use geocat_auth::{ResolveError, RightsError};
use geocat_core::PublicationKey;
use geocat_query::QueryError;
use thiserror::Error;

/// Errors returned by the registry.
///
/// `S` is the error of the publication store, `I` the error of the identity provider.
#[derive(Debug, Error)]
pub enum RegistryError<S, I> {
    /// Access rights were rejected.
    #[error(transparent)]
    Rights(#[from] RightsError),

    #[error("publication {0} already exists")]
    AlreadyExists(PublicationKey),

    #[error("publication {0} not found")]
    NotFound(PublicationKey),

    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryError),

    #[error("publication store unavailable: {0}")]
    StoreUnavailable(S),

    #[error("identity provider unavailable: {0}")]
    IdentityUnavailable(I),
}

impl<S, I> RegistryError<S, I> {
    /// Stable machine-readable code of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            RegistryError::Rights(RightsError::UnknownIdentifier(_)) => ErrorCode::UnknownIdentifier,
            RegistryError::Rights(RightsError::NoWriter) => ErrorCode::NoWriter,
            RegistryError::Rights(RightsError::WriteWithoutRead(_)) => ErrorCode::WriteWithoutRead,
            RegistryError::Rights(RightsError::SelfLockout(_)) => ErrorCode::SelfLockout,
            RegistryError::Rights(RightsError::OwnerLockout(_)) => ErrorCode::OwnerLockout,
            RegistryError::AlreadyExists(_) => ErrorCode::AlreadyExists,
            RegistryError::NotFound(_) => ErrorCode::NotFound,
            RegistryError::InvalidQuery(_) => ErrorCode::InvalidQuery,
            RegistryError::StoreUnavailable(_) | RegistryError::IdentityUnavailable(_) => {
                ErrorCode::StoreUnavailable
            }
        }
    }
}

impl<S, I> From<ResolveError<I>> for RegistryError<S, I> {
    fn from(value: ResolveError<I>) -> Self {
        match value {
            ResolveError::Rights(err) => RegistryError::Rights(err),
            ResolveError::Provider(err) => RegistryError::IdentityUnavailable(err),
        }
    }
}

/// Stable error codes callers can branch on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    UnknownIdentifier,
    NoWriter,
    WriteWithoutRead,
    SelfLockout,
    OwnerLockout,
    AlreadyExists,
    NotFound,
    InvalidQuery,
    StoreUnavailable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnknownIdentifier => "unknown_identifier",
            ErrorCode::NoWriter => "no_writer",
            ErrorCode::WriteWithoutRead => "write_without_read",
            ErrorCode::SelfLockout => "self_lockout",
            ErrorCode::OwnerLockout => "owner_lockout",
            ErrorCode::AlreadyExists => "already_exists",
            ErrorCode::NotFound => "not_found",
            ErrorCode::InvalidQuery => "invalid_query",
            ErrorCode::StoreUnavailable => "store_unavailable",
        }
    }

    /// Returns `true` if the request of the caller was invalid, `false` for backend failures which
    /// might succeed on retry.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ErrorCode::StoreUnavailable)
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::convert::Infallible;

    use geocat_auth::{ResolveError, RightsError};
    use geocat_core::{PublicationKey, PublicationType};
    use geocat_query::{OrderBy, QueryError};

    use super::{ErrorCode, RegistryError};

    type Error = RegistryError<std::io::Error, Infallible>;

    #[test]
    fn stable_codes() {
        let key = PublicationKey::new("ws", PublicationType::Map, "map");

        let cases: Vec<(Error, &str, bool)> = vec![
            (
                RightsError::UnknownIdentifier(BTreeSet::from(["bob".to_string()])).into(),
                "unknown_identifier",
                true,
            ),
            (RightsError::NoWriter.into(), "no_writer", true),
            (
                RightsError::WriteWithoutRead(BTreeSet::new()).into(),
                "write_without_read",
                true,
            ),
            (RightsError::SelfLockout("alice".into()).into(), "self_lockout", true),
            (RightsError::OwnerLockout("alice".into()).into(), "owner_lockout", true),
            (RegistryError::AlreadyExists(key.clone()), "already_exists", true),
            (RegistryError::NotFound(key), "not_found", true),
            (
                QueryError::MissingOrderingParameter(OrderBy::Bbox).into(),
                "invalid_query",
                true,
            ),
            (
                RegistryError::StoreUnavailable(std::io::Error::other("disk full")),
                "store_unavailable",
                false,
            ),
        ];

        for (error, code, is_client_error) in cases {
            assert_eq!(error.code().as_str(), code);
            assert_eq!(error.code().is_client_error(), is_client_error);
        }
    }

    #[test]
    fn resolve_errors_keep_their_kind() {
        let error: RegistryError<Infallible, std::io::Error> =
            ResolveError::Rights(RightsError::NoWriter).into();
        assert_eq!(error.code(), ErrorCode::NoWriter);

        let error: RegistryError<Infallible, std::io::Error> =
            ResolveError::Provider(std::io::Error::other("offline")).into();
        assert!(matches!(error, RegistryError::IdentityUnavailable(_)));
        assert_eq!(error.code(), ErrorCode::StoreUnavailable);
    }
}

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the social graph and its storage can report.
///
/// Operation errors are recoverable: the caller reports them and carries on,
/// and the graph is left exactly as it was. Storage errors carry the path of
/// the file involved.
#[derive(Debug, Error)]
pub enum Error {
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    /// Usernames are single tokens: non-empty, no whitespace.
    #[error("invalid username '{0}'")]
    InvalidUsername(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    /// A 1-based selection outside `1..=len`.
    #[error("invalid selection {index} (expected 1..={len})")]
    InvalidSelection { index: usize, len: usize },

    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error("cannot send a friend request to yourself")]
    SelfRequest,

    #[error("already friends with '{0}'")]
    AlreadyFriends(String),

    #[error("corrupt data file {}: {source}", path.display())]
    CorruptFile {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("cannot write {}: {source}", path.display())]
    UnencodableField {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

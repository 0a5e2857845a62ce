use std::result;
use thiserror::Error as ThisError;

/// Failure conditions reported by the splay collections.
///
/// Neither condition leaves the container in an inconsistent state. A failed insert does not
/// touch the tree at all; a failed removal leaves its contents unchanged but may have splayed the
/// last node visited while looking for the key.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum Error {
    #[error("key is already present")]
    DuplicateKey,

    #[error("key does not exist")]
    KeyNotFound,
}

pub type Result<T> = result::Result<T, Error>;

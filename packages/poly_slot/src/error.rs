use thiserror::Error;

/// Errors reported by slot operations that depend on the slot's contents.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The operation needs a stored value but the slot is empty.
    #[error("the slot holds no value")]
    Empty,

    /// The caller asked for the stored value as a concrete type other than
    /// the one actually stored.
    #[error("the slot holds a value of type {actual}, not {requested}")]
    WrongType {
        /// The concrete type the caller asked for.
        requested: &'static str,

        /// The concrete type of the value actually stored.
        actual: &'static str,
    },

    /// The stored value was placed without clone support, so the slot
    /// cannot be duplicated while it holds this value.
    #[error("the stored value of type {type_name} was placed without clone support")]
    NotCloneable {
        /// The concrete type of the value actually stored.
        type_name: &'static str,
    },
}

/// A specialized `Result` type for slot operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

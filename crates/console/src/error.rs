//! Console error model.

use thiserror::Error;

use hbnb_storage::StorageError;

/// User-facing diagnostics. `Display` renders the exact line printed to the console.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    #[error("** class name missing **")]
    ClassNameMissing,

    #[error("** class doesn't exist **")]
    ClassDoesNotExist,

    #[error("** instance id missing **")]
    InstanceIdMissing,

    #[error("** no instance found **")]
    NoInstanceFound,

    #[error("** attribute name missing **")]
    AttributeNameMissing,

    #[error("** value missing **")]
    ValueMissing,

    /// A declared attribute rejected the value (e.g. `"abc"` for an integer attribute).
    #[error("** invalid value for attribute **")]
    InvalidValue,

    /// The object of a bulk update is not a JSON object, even after quote normalization.
    #[error("** malformed attribute dictionary **")]
    MalformedDictionary,
}

/// Failure of a single console command.
///
/// `Command` is printed and the loop continues; the other variants end the session.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("console i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

//! Line-oriented command interpreter over the HBNB object store.
//!
//! Lines are parsed into [`Request`]s, dispatched to handlers that work on an explicit
//! [`FileStorage`](hbnb_storage::FileStorage), and answered on the console's output sink.

pub mod config;
pub mod console;
pub mod error;
pub mod handlers;
pub mod parser;

pub use config::ConsoleConfig;
pub use console::{Console, Flow};
pub use error::{CommandError, ConsoleError};
pub use parser::{Request, parse_line};

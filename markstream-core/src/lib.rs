//! Markstream Core - backtrackable character stream (pure logic, no IO setup)
//!
//! Wraps a forward-only [`BackingSource`] and exposes the [`CharStream`]
//! interface a parser front-end drives: position tracking, lookahead built
//! from read-then-backup, nested marks and absolute seeking.
//!
//! Configuration is passed explicitly via parameters, not via global state.
//!
//! ```
//! use markstream_core::{CharStream, MarkedCharStream, TextSource, Unit};
//!
//! let mut source = TextSource::new("AB\nCd");
//! let mut stream = MarkedCharStream::new(&mut source, "demo", true);
//! for _ in 0..3 {
//!     stream.advance().unwrap();
//! }
//! assert_eq!((stream.index(), stream.line(), stream.column()), (3, 2, 0));
//! assert_eq!(stream.lookahead(1).unwrap(), Some(Unit::Char('c')));
//! ```

pub mod marks;
pub mod position;
pub mod source;
pub mod stream;

// Re-export common types
pub use marks::{MarkStack, Marker};
pub use position::{Position, Unit, LINE_TERMINATOR};
pub use source::{BackingSource, ReaderSource, SourceError, TextSource};
pub use stream::{CharStream, MarkedCharStream};

// Re-export config types from markstream-config
pub use markstream_config::{SourceConfig, StreamConfig};

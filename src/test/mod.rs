mod journal;
mod stream;

pub use journal::{Event, Journal};
pub use lines::LatchedLines;
pub use stream::JournalStream;

//! Writers (and a reader) for search results.

mod format;
mod pin;
mod sqt;
mod tab;

pub use format::format_float;
pub use pin::PinWriter;
pub use sqt::SqtWriter;
pub use tab::{
    DEFAULT_PRECISION,
    ResultRecord,
    TabColumn,
    TabWriter,
    read_results,
    read_results_file,
};

mod shuffle;
mod stream;

pub use shuffle::{
    DecoyShuffleConfig,
    shuffle_region,
    shuffled_order,
};
pub use stream::{
    SeedConfig,
    SeedKeyword,
    ShuffleStream,
};

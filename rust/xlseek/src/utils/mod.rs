pub mod ranges;
pub mod tolerance;

pub use ranges::{
    MassWindow,
    MassWindowError,
};
pub use tolerance::MassTolerance;

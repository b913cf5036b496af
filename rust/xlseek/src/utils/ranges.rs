use thiserror::Error;

/// A closed mass interval `[start, end]` in Daltons.
///
/// Construction rejects inverted or non-finite bounds, so an existing window
/// is always searchable.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MassWindow(f64, f64);

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MassWindowError {
    #[error("Expected the lower bound to be less than or equal to the upper, got ({0}, {1})")]
    ExpectedOrderedRange(f64, f64),
    #[error("Expected finite bounds, got ({0}, {1})")]
    ExpectedFiniteBounds(f64, f64),
}

impl MassWindow {
    pub fn try_new(start: f64, end: f64) -> Result<Self, MassWindowError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(MassWindowError::ExpectedFiniteBounds(start, end));
        }
        if start > end {
            return Err(MassWindowError::ExpectedOrderedRange(start, end));
        }
        Ok(Self(start, end))
    }

    pub fn start(&self) -> f64 {
        self.0
    }

    pub fn end(&self) -> f64 {
        self.1
    }

    pub fn contains(&self, x: f64) -> bool {
        self.0 <= x && x <= self.1
    }
}

impl TryFrom<(f64, f64)> for MassWindow {
    type Error = MassWindowError;

    fn try_from(value: (f64, f64)) -> Result<Self, Self::Error> {
        MassWindow::try_new(value.0, value.1)
    }
}

/// Index range of the elements of `slice` (sorted by `key_fn`) whose keys
/// fall inside `window`.
pub fn sorted_range_by_mass<T>(
    slice: &[T],
    window: &MassWindow,
    key_fn: impl Fn(&T) -> f64,
) -> std::ops::Range<usize> {
    let start = slice.partition_point(|x| key_fn(x) < window.start());
    let end = start + slice[start..].partition_point(|x| key_fn(x) <= window.end());
    start..end
}

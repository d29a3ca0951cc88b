//! Half-open strided ranges over `f64`.

/// An iterator over `start, start + step, start + 2 * step, ...` for every
/// value strictly below `stop`.
///
/// The number of values is `ceil((stop - start) / step)`, so a final value
/// closer to `stop` than `step` is still produced.
///
/// ```
/// # use geometry::prelude::*;
/// let xs: Vec<f64> = Steps::new(0., 10., 4.).collect();
/// assert_eq!(xs, vec![0., 4., 8.]);
/// assert_eq!(Steps::new(0., 8., 4.).len(), 2);
/// assert_eq!(Steps::new(5., 0., 1.).len(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Steps {
    start: f64,
    step: f64,
    next: usize,
    len: usize,
}

impl Steps {
    /// Creates a new strided range over `[start, stop)`.
    ///
    /// A non-positive or non-finite `step`, or a non-finite bound, yields an empty range.
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        let len = if step > 0. && step.is_finite() && start.is_finite() && stop.is_finite() {
            let n = ((stop - start) / step).ceil();
            if n > 0. { n as usize } else { 0 }
        } else {
            0
        };
        Self {
            start,
            step,
            next: 0,
            len,
        }
    }

    #[inline]
    fn value(&self, i: usize) -> f64 {
        self.start + i as f64 * self.step
    }
}

impl Iterator for Steps {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.next < self.len {
            let value = self.value(self.next);
            self.next += 1;
            Some(value)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Steps {}

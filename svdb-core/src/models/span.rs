use crate::models::Interval;

/// Anything that occupies a genomic span.
///
/// Grouping and clustering only look at the span; callers keep whatever
/// payload they need (caller name, filter, identifiers) on the implementing
/// type.
pub trait GenomicSpan {
    fn interval(&self) -> &Interval;
}

impl GenomicSpan for Interval {
    #[inline]
    fn interval(&self) -> &Interval {
        self
    }
}

impl<T: GenomicSpan + ?Sized> GenomicSpan for &T {
    #[inline]
    fn interval(&self) -> &Interval {
        (**self).interval()
    }
}

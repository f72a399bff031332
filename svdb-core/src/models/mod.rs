pub mod interval;
pub mod span;
pub mod sv;

// re-export for cleaner imports
pub use self::interval::Interval;
pub use self::span::GenomicSpan;
pub use self::sv::{CallId, Filter, Genotype, Sv, SvType};

/// Errors reported by the statistics routines.
///
/// Every routine in this crate fails fast with one of these kinds instead of
/// returning a default or `NaN` value. Callers decide whether to abort or skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ErrorKind {
    /// A range filter was requested with neither a lower nor an upper bound.
    #[display("no range given: at least one of the lower and upper bounds is required")]
    MissingRange,
    /// Statistics were requested over an empty sequence.
    #[display("cannot compute statistics of an empty sequence")]
    EmptyInput,
    /// A difference test was requested with fewer than two observations in a group.
    #[display(
        "difference test needs at least 2 observations per group (got {first} and {second})"
    )]
    InsufficientSamples { first: usize, second: usize },
    /// Timestamps and values were not index-aligned.
    #[display("{timestamps} timestamps do not match {values} values")]
    LengthMismatch { timestamps: usize, values: usize },
}

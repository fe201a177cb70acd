use tally_types::{AggregateResult, PartialCount};

/// Sum every partial into one result. The outcome does not depend on the
/// order of `partials`.
pub fn merge<I>(partials: I) -> AggregateResult
where
    I: IntoIterator<Item = PartialCount>,
{
    let mut result = AggregateResult::new();
    for partial in partials {
        result.absorb(partial);
    }
    result
}

//! Progress bar denominator

use crate::core::error::Result;
use crate::core::options::FeedMode;
use crate::core::source::Source;
use crate::core::units::parse_total;

/// Determine the total the progress bar counts towards.
///
/// An explicit `total` always wins and is validated even before anything is
/// streamed; an empty one counts as not given. Otherwise byte mode sums the
/// file sizes; standard input and line mode have no knowable total.
pub fn estimate_total(total: Option<&str>, mode: FeedMode, sources: &[Source]) -> Result<Option<u64>> {
    if let Some(text) = total.filter(|t| !t.is_empty()) {
        return parse_total(text).map(Some);
    }

    let sizes: Option<Vec<u64>> = sources.iter().map(Source::size).collect();
    match (mode, sizes) {
        (FeedMode::Bytes, Some(sizes)) => Ok(Some(sizes.iter().sum())),
        _ => Ok(None),
    }
}

use std::collections::BTreeMap;

use crate::error::{ProbeError, Result};
use crate::metrics::Counter;

/// Extract the tracked counters from `pdns_control show "*"` output.
///
/// The output is a list of `name=value` pairs separated by commas (and, for
/// some versions, newlines). Names that are not tracked are skipped. The value
/// of a tracked counter is the run of digits at the start of its value; the
/// first occurrence of a name wins.
pub fn parse_counters(output: &str) -> Result<BTreeMap<Counter, u64>> {
    let mut counters = BTreeMap::new();

    for token in output.split(|c: char| c == ',' || c.is_whitespace()) {
        let Some((name, raw)) = token.split_once('=') else {
            continue;
        };
        let Ok(counter) = name.parse::<Counter>() else {
            continue;
        };
        if counters.contains_key(&counter) {
            continue;
        }

        let digits = raw
            .find(|c: char| !c.is_ascii_digit())
            .map_or(raw, |end| &raw[..end]);
        let value = digits
            .parse::<u64>()
            .map_err(|_| ProbeError::MalformedCounter {
                counter,
                value: raw.to_string(),
            })?;

        counters.insert(counter, value);
    }

    if let Some(counter) = Counter::ALL
        .into_iter()
        .find(|counter| !counters.contains_key(counter))
    {
        return Err(ProbeError::MissingCounter { counter });
    }

    Ok(counters)
}

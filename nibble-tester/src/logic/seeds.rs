use std::collections::HashSet;
use thiserror::Error;

pub const DEFAULT_SEED: u64 = 1337;
const MAX_RANGE_LEN: u64 = 10_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("unrecognized seed token: {0}")]
    Unrecognized(String),
    #[error("seed range {start}..={end} is empty")]
    EmptyRange { start: u64, end: u64 },
    #[error("seed range {start}..={end} is too long")]
    RangeTooLong { start: u64, end: u64 },
}

/// Resolve CLI seed tokens into a deduplicated seed list.
///
/// Accepts decimal integers (a leading `-` is dropped), `0x` hex literals,
/// and inclusive ranges written `start..end` or `start..=end`. Falls back to
/// [`DEFAULT_SEED`] when nothing usable was given.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>, SeedError> {
    let mut seeds = Vec::new();
    let mut seen = HashSet::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        for seed in expand_token(token)? {
            if seen.insert(seed) {
                seeds.push(seed);
            }
        }
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }
    Ok(seeds)
}

fn expand_token(token: &str) -> Result<Vec<u64>, SeedError> {
    if let Some((start, end)) = token.split_once("..") {
        let end = end.strip_prefix('=').unwrap_or(end);
        let (Some(start), Some(end)) = (parse_single(start), parse_single(end)) else {
            return Err(SeedError::Unrecognized(token.to_string()));
        };
        if end < start {
            return Err(SeedError::EmptyRange { start, end });
        }
        if end - start >= MAX_RANGE_LEN {
            return Err(SeedError::RangeTooLong { start, end });
        }
        return Ok((start..=end).collect());
    }
    parse_single(token)
        .map(|seed| vec![seed])
        .ok_or_else(|| SeedError::Unrecognized(token.to_string()))
}

fn parse_single(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Some(hex) = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16).ok();
    }
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value.unsigned_abs());
    }
    raw.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn resolves_numeric_hex_and_negative() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "-7", "0xff", "42"])).unwrap();
        assert_eq!(seeds, vec![42, 7, 255]);
    }

    #[test]
    fn expands_ranges() {
        assert_eq!(
            resolve_seed_inputs(&tokens(&["1..3"])).unwrap(),
            vec![1, 2, 3]
        );
        assert_eq!(
            resolve_seed_inputs(&tokens(&["5..=6", "6"])).unwrap(),
            vec![5, 6]
        );
        assert_eq!(
            resolve_seed_inputs(&tokens(&["9..2"])).unwrap_err(),
            SeedError::EmptyRange { start: 9, end: 2 }
        );
        assert!(matches!(
            resolve_seed_inputs(&tokens(&["0..99999"])).unwrap_err(),
            SeedError::RangeTooLong { .. }
        ));
    }

    #[test]
    fn defaults_when_empty_and_rejects_garbage() {
        assert_eq!(resolve_seed_inputs(&[]).unwrap(), vec![DEFAULT_SEED]);
        assert_eq!(
            resolve_seed_inputs(&tokens(&["pancake"])).unwrap_err(),
            SeedError::Unrecognized("pancake".to_string())
        );
    }
}

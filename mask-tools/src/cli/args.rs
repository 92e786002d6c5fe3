pub use clap::{App, Arg};
pub use inflector::Inflector;

use raster_masks::prelude::Parallelism;

#[macro_export]
macro_rules! args_parser {
    ($name:expr) => {{
        $crate::cli::args::App::new($name)
            .version(clap::crate_version!())
            .author(clap::crate_authors!())
    }};
}

#[macro_export]
macro_rules! arg {
    ($name:expr) => {{
        use inflector::Inflector;
        $crate::cli::args::Arg::with_name($name).value_name(&$name.to_screaming_snake_case())
    }};
}

#[macro_export]
macro_rules! opt {
    ($name:expr) => {{
        use inflector::Inflector;
        $crate::cli::args::Arg::with_name($name)
            .long(&$name.to_kebab_case())
            .value_name(&$name.to_screaming_snake_case())
    }};
}

/// Parse a window step given as `N` (square) or `H,W`.
pub fn parse_step(s: &str) -> Result<(usize, usize), String> {
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid step `{}`: {}", s, e))
    };
    let (h, w) = match s.find(',') {
        Some(idx) => (parse(&s[..idx])?, parse(&s[idx + 1..])?),
        None => {
            let n = parse(s)?;
            (n, n)
        }
    };
    if h == 0 || w == 0 {
        return Err(format!("invalid step `{}`: must be at least 1", s));
    }
    Ok((h, w))
}

/// Map a job count to a [`Parallelism`]: `0` uses the global
/// pool, `1` runs sequentially.
pub fn parallelism(jobs: Option<usize>, default: Parallelism) -> Parallelism {
    match jobs {
        None => default,
        Some(0) => Parallelism::Default,
        Some(1) => Parallelism::Sequential,
        Some(n) => Parallelism::Threads(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps() {
        assert_eq!(parse_step("8"), Ok((8, 8)));
        assert_eq!(parse_step("4, 6"), Ok((4, 6)));
        assert!(parse_step("0").is_err());
        assert!(parse_step("4,x").is_err());
    }

    #[test]
    fn job_counts() {
        assert_eq!(parallelism(None, Parallelism::Sequential), Parallelism::Sequential);
        assert_eq!(parallelism(Some(0), Parallelism::Sequential), Parallelism::Default);
        assert_eq!(parallelism(Some(1), Parallelism::Default), Parallelism::Sequential);
        assert_eq!(parallelism(Some(3), Parallelism::Default), Parallelism::Threads(3));
    }
}

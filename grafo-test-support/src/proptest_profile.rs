//! Property-test run profile shared by every suite.
//!
//! CI raises case counts through `GRAFO_PBT_CASES`; `GRAFO_PBT_FORK` runs each
//! case in a forked subprocess. Invalid overrides are logged and ignored.

use std::env;

/// Environment variable controlling proptest case counts.
pub const CASES_ENV_KEY: &str = "GRAFO_PBT_CASES";
/// Environment variable controlling proptest process forking.
pub const FORK_ENV_KEY: &str = "GRAFO_PBT_FORK";

/// Runtime profile for property-test execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Loads a profile from the process environment.
    ///
    /// # Examples
    /// ```
    /// use grafo_test_support::proptest_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self::from_lookup(default_cases, default_fork, |key| env::var(key).ok())
    }

    /// Loads a profile through an arbitrary variable lookup.
    ///
    /// # Examples
    /// ```
    /// use grafo_test_support::proptest_profile::{CASES_ENV_KEY, ProptestRunProfile};
    ///
    /// let profile = ProptestRunProfile::from_lookup(64, false, |key| {
    ///     (key == CASES_ENV_KEY).then(|| "500".to_owned())
    /// });
    /// assert_eq!(profile.cases(), 500);
    /// assert!(!profile.fork());
    /// ```
    #[must_use]
    pub fn from_lookup<F>(default_cases: u32, default_fork: bool, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let cases = lookup(CASES_ENV_KEY)
            .and_then(|raw| accept(CASES_ENV_KEY, &raw, parse_cases(&raw)))
            .unwrap_or(default_cases);
        let fork = lookup(FORK_ENV_KEY)
            .and_then(|raw| accept(FORK_ENV_KEY, &raw, parse_flag(&raw)))
            .unwrap_or(default_fork);
        Self { cases, fork }
    }

    /// Number of cases to run per property.
    #[must_use]
    #[rustfmt::skip]
    pub const fn cases(&self) -> u32 { self.cases }

    /// Whether cases run in forked subprocesses.
    #[must_use]
    #[rustfmt::skip]
    pub const fn fork(&self) -> bool { self.fork }
}

fn accept<T>(key: &str, raw: &str, parsed: Result<T, &'static str>) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(reason) => {
            tracing::warn!(env = key, raw, reason, "ignoring invalid property-test override");
            None
        }
    }
}

fn parse_cases(raw: &str) -> Result<u32, &'static str> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("cases must be positive"),
        Ok(cases) => Ok(cases),
        Err(_) => Err("cases must be an unsigned integer"),
    }
}

fn parse_flag(raw: &str) -> Result<bool, &'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected true/false, 1/0, yes/no or on/off"),
    }
}

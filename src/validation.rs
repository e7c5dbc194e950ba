use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

// Experiment names are lowercase, start with an alphanumeric and contain
// alphanumerics, dashes, underscores and spaces.
static EXPERIMENT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9\-_ ]*$").expect("experiment name regex is valid")
});

// Same shape for alternatives and KPIs, any letter case.
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9][a-z0-9\-_ ]*$").expect("name regex is valid")
});

pub fn is_valid_experiment_name(name: &str) -> bool {
    EXPERIMENT_NAME_RE.is_match(name)
}

pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

pub fn check_experiment_name(name: &str) -> Result<()> {
    if is_valid_experiment_name(name) {
        Ok(())
    } else {
        Err(Error::InvalidExperimentName(name.to_string()))
    }
}

/// Checks the candidate list: at least two entries, each a valid name.
pub fn check_alternatives<S: AsRef<str>>(alternatives: &[S]) -> Result<()> {
    if alternatives.len() < 2 {
        return Err(Error::TooFewAlternatives(alternatives.len()));
    }
    match alternatives
        .iter()
        .map(AsRef::as_ref)
        .find(|alt| !is_valid_name(alt))
    {
        Some(bad) => Err(Error::InvalidAlternativeName(bad.to_string())),
        None => Ok(()),
    }
}

pub fn check_kpi(kpi: &str) -> Result<()> {
    if is_valid_name(kpi) {
        Ok(())
    } else {
        Err(Error::InvalidKpiName(kpi.to_string()))
    }
}

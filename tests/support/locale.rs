use std::convert::Infallible;
use std::str::FromStr;

/// A locale candidate taken from a step, optionally wrapped in quotes so
/// surrounding whitespace survives the Gherkin parser.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StepLocale(String);

impl FromStr for StepLocale {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let unquoted = trimmed
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .unwrap_or(trimmed);

        Ok(Self(unquoted.to_owned()))
    }
}

impl StepLocale {
    /// The candidate exactly as the scenario wrote it.
    pub fn into_inner(self) -> String {
        self.0
    }
}

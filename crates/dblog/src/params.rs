//! Conversion of a command's parameters into a loggable form.

use crate::value::Parameters;
use std::fmt;

/// Marker that replaces parameter values when sensitive data logging is off.
pub const REDACTED: &str = "?";

/// Ordered `(name, value)` pairs ready for logging.
///
/// Displays as `name=value, name=value`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggableParameters(Vec<(String, String)>);

impl LoggableParameters {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LoggableParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

/// Build the loggable representation of `params`.
///
/// Names are always kept (an unnamed parameter logs as `""`). With
/// `hide_values` every value is replaced by [`REDACTED`].
pub fn loggable_parameters(params: &Parameters, hide_values: bool) -> LoggableParameters {
    LoggableParameters(
        params
            .iter()
            .map(|p| {
                let name = p.name.clone().unwrap_or_default();
                let value = if hide_values {
                    REDACTED.to_string()
                } else {
                    p.value.to_string()
                };
                (name, value)
            })
            .collect(),
    )
}

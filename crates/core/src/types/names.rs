//! Validated names used as registry keys and values
//!
//! Both names are fully-qualified binary names (`my_crate::shapes::Circle`).
//! A valid name is non-empty, carries no whitespace and no `#`, since either
//! would not survive a round trip through the registry line format.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

fn validate(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.chars().any(char::is_whitespace) {
        "name contains whitespace"
    } else if name.contains('#') {
        "name contains a comment marker"
    } else {
        return Ok(());
    };
    Err(Error::InvalidName {
        name: name.to_string(),
        reason,
    })
}

macro_rules! binary_name {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap a name; surrounding whitespace is trimmed first
            pub fn new(name: impl AsRef<str>) -> Result<Self> {
                let name = name.as_ref().trim();
                validate(name)?;
                Ok(Self(name.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Last path segment, `Circle` for `my_crate::shapes::Circle`
            pub fn simple_name(&self) -> &str {
                simple_name(&self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(value: String) -> Result<Self> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = Error;

            fn try_from(value: &str) -> Result<Self> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }
    };
}

binary_name!(
    /// Identifies an abstraction for which implementations are registered
    ContractName
);

binary_name!(
    /// Identifies a concrete implementation of a contract
    ImplementationName
);

/// Last segment of a `::` or `.` separated path
pub fn simple_name(path: &str) -> &str {
    let after_colons = path.rsplit("::").next().unwrap_or(path);
    after_colons.rsplit('.').next().unwrap_or(after_colons)
}

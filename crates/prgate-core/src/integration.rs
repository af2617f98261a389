use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// How the pull-request head is combined with its base in the working copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntegrationTool {
    #[default]
    Rebase,
    Merge,
    Checkout,
}

impl IntegrationTool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rebase => "rebase",
            Self::Merge => "merge",
            Self::Checkout => "checkout",
        }
    }
}

impl FromStr for IntegrationTool {
    type Err = CoreError;

    /// An empty value selects the default, [`IntegrationTool::Rebase`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "rebase" => Ok(Self::Rebase),
            "merge" => Ok(Self::Merge),
            "checkout" => Ok(Self::Checkout),
            other => Err(CoreError::UnknownIntegrationTool(other.to_string())),
        }
    }
}

impl fmt::Display for IntegrationTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tools_parse() {
        assert_eq!("".parse::<IntegrationTool>().unwrap(), IntegrationTool::Rebase);
        assert_eq!("rebase".parse::<IntegrationTool>().unwrap(), IntegrationTool::Rebase);
        assert_eq!("merge".parse::<IntegrationTool>().unwrap(), IntegrationTool::Merge);
        assert_eq!("checkout".parse::<IntegrationTool>().unwrap(), IntegrationTool::Checkout);
    }

    #[test]
    fn squash_is_a_config_error() {
        let err = "squash".parse::<IntegrationTool>().unwrap_err();
        assert!(err.is_config());
        assert_eq!(err.to_string(), "invalid integration tool specified: squash");
    }
}

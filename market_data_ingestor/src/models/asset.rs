use std::fmt;

use serde::{Deserialize, Serialize};

/// Asset class a request is routed by. Earnings calendars only exist for equities,
/// so that is the one class the bar and earnings providers accept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    #[default]
    UsEquity,
}

impl AssetClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AssetClass::UsEquity => "us_equity",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

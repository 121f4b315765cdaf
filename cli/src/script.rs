//! Operation scripts: an ordered list of calls and clock advances.

use agora_governance::Operation;
use agora_types::Address;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Script {
    /// Clock reading before the first step. Defaults to wall-clock now.
    pub start_time: Option<u64>,

    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(try_from = "RawStep")]
pub enum Step {
    /// Move the clock forward.
    Advance { advance_secs: u64 },
    /// Submit an operation as `caller`.
    Call { caller: Address, op: Operation },
}

/// A `[[step]]` table before it is classified. A step is either a clock
/// advance or a call, never both.
#[derive(Deserialize)]
struct RawStep {
    caller: Option<Address>,
    advance_secs: Option<u64>,
    #[serde(flatten)]
    rest: toml::Table,
}

impl TryFrom<RawStep> for Step {
    type Error = String;

    fn try_from(raw: RawStep) -> Result<Self, Self::Error> {
        match (raw.caller, raw.advance_secs) {
            (Some(_), Some(_)) => {
                Err("a step takes either `caller` with an operation or `advance_secs`, not both".into())
            }
            (None, Some(advance_secs)) => match raw.rest.keys().next() {
                Some(key) => Err(format!("unexpected field `{key}` in an advance step")),
                None => Ok(Step::Advance { advance_secs }),
            },
            (Some(caller), None) => {
                let op = toml::Value::Table(raw.rest)
                    .try_into::<Operation>()
                    .map_err(|e| format!("invalid operation for {caller}: {e}"))?;
                Ok(Step::Call { caller, op })
            }
            (None, None) => Err("a step needs `caller` or `advance_secs`".into()),
        }
    }
}

impl Script {
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing script {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

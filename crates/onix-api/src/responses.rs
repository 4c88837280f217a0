//! Response types for the WAPI and the module output contract

use serde::{Deserialize, Serialize};

/// Result envelope returned by every WAPI write operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WapiResult {
    /// Reference of the affected resource
    #[serde(rename = "ref", default)]
    pub reference: String,
    #[serde(default)]
    pub changed: bool,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
    /// Operation code reported by the WAPI (`I`, `U`, `D`, `L`)
    #[serde(default)]
    pub operation: String,
}

/// Outcome printed by a CRUD command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModuleOutcome {
    /// The call went through; `changed` mirrors the WAPI result
    Exit { changed: bool, meta: WapiResult },
    /// The call failed, either at the WAPI or before reaching it
    Fail {
        failed: bool,
        msg: String,
        #[serde(flatten)]
        result: Option<WapiResult>,
    },
}

impl ModuleOutcome {
    /// Translate a WAPI result into the module contract
    #[must_use]
    pub fn from_result(result: WapiResult) -> Self {
        if result.error {
            ModuleOutcome::Fail {
                failed: true,
                msg: result.message.clone(),
                result: Some(result),
            }
        } else {
            ModuleOutcome::Exit {
                changed: result.changed,
                meta: result,
            }
        }
    }

    /// Failure that never reached the WAPI
    pub fn failure(msg: impl Into<String>) -> Self {
        ModuleOutcome::Fail {
            failed: true,
            msg: msg.into(),
            result: None,
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, ModuleOutcome::Fail { .. })
    }
}

/// Facts exported by `ox setup`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionFacts {
    pub ox_token: String,
    pub ox_uri: String,
}

/// Output of `ox setup`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupFacts {
    pub changed: bool,
    pub ansible_facts: ConnectionFacts,
    pub meta: serde_json::Map<String, serde_json::Value>,
}

impl SetupFacts {
    pub fn new(token: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            changed: false,
            ansible_facts: ConnectionFacts {
                ox_token: token.into(),
                ox_uri: uri.into(),
            },
            meta: serde_json::Map::new(),
        }
    }
}

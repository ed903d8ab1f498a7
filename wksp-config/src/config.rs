// External crate imports
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use wksp_core::error::{Result, WkspError};

/// Main workspace configuration structure.
///
/// This is the unit the editor works on: a named set of environments, one of
/// which is the default. It round-trips through JSON with the server's
/// camelCase field names, so a config fetched from the server can be edited
/// and sent back unchanged.
///
/// Two copies of this tree exist per editing session: the baseline (last
/// persisted state) and the draft (working copy). See `wksp_config::diff`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// Workspace name, unique within the owner's namespace.
    pub name: String,

    /// Key of the default environment. Must exist in `environments`.
    #[serde(default)]
    pub default_env: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub environments: IndexMap<String, Environment>,

    /// Server-issued hyperlinks. Opaque to us; must never be sent back on
    /// update, so every persist path strips this field first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<serde_json::Value>,
}

impl WorkspaceConfig {
    /// Check the structural invariant: `default_env` names an existing
    /// environment. Callers run this before handing the config to the
    /// normalizer or the orchestrator.
    pub fn validate(&self) -> Result<()> {
        if self.default_env.is_empty() {
            return Err(WkspError::Validation(
                "workspace config has no default environment".to_string(),
            ));
        }
        if !self.environments.contains_key(&self.default_env) {
            return Err(WkspError::Validation(format!(
                "default environment '{}' is not defined",
                self.default_env
            )));
        }
        Ok(())
    }

    /// The default environment, if the invariant holds.
    pub fn default_environment(&self) -> Option<&Environment> {
        self.environments.get(&self.default_env)
    }
}

/// One runnable environment: how to build it (recipe) and what machines it
/// runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Environment {
    #[serde(default)]
    pub recipe: Recipe,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub machines: IndexMap<String, Machine>,
}

/// Declarative build/run description: a dockerfile, a compose file, or an
/// image reference. Exactly one of `content` / `location` is normally set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Recipe type, e.g. "dockerfile", "compose", "image".
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Machine {
    #[serde(default)]
    pub attributes: MachineAttributes,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MachineAttributes {
    /// Memory limit in bytes. Absent means "use the provider default";
    /// the compose normalizer raises anything under 1 GiB to 2 GiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit_bytes: Option<u64>,
}

//! Stack selection and source resolution.
//!
//! A workspace is seeded either from a predefined stack (a reusable recipe
//! plus config template) or from a custom recipe the user supplies as a URL
//! or inline script. The two input modes are mutually exclusive:
//! selecting a stack clears any pending custom-recipe fields, and editing a
//! custom-recipe field deselects the stack.

use serde::{Deserialize, Serialize};
use wksp_config::config::{Environment, Machine, Recipe};
use wksp_config::{WorkspaceConfig, DEFAULT_MACHINE_MEMORY_BYTES};

use crate::error::{OrchestratorError, Result};

/// A predefined stack offered as a starting point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stack {
    pub id: String,
    pub name: String,
    pub source: StackSource,
    /// Config template bundled with the stack, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_config: Option<WorkspaceConfig>,
}

/// Where a stack's build input comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackSource {
    /// Source kind: "location", "image" or "dockerfile".
    #[serde(rename = "type")]
    pub kind: String,
    pub origin: String,
}

/// Build/runtime source derived from the user's selection.
///
/// Closed set of variants so resolution is exhaustively matched; an
/// unrecognized stack source kind fails resolution instead of leaking an
/// untyped descriptor downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    /// Literal dockerfile text.
    DockerfileContent(String),
    /// URL of a dockerfile.
    DockerfileLocation(String),
    /// Inline custom recipe script.
    EnvironmentContent {
        content: String,
        format: Option<String>,
    },
    /// URL of a custom recipe.
    EnvironmentLocation {
        location: String,
        format: Option<String>,
    },
}

impl SourceDescriptor {
    /// Environment recipe equivalent of this descriptor.
    pub fn recipe(&self) -> Recipe {
        match self {
            SourceDescriptor::DockerfileContent(content) => Recipe {
                kind: "dockerfile".to_string(),
                content: Some(content.clone()),
                ..Default::default()
            },
            SourceDescriptor::DockerfileLocation(location) => Recipe {
                kind: "dockerfile".to_string(),
                location: Some(location.clone()),
                ..Default::default()
            },
            SourceDescriptor::EnvironmentContent { content, format } => Recipe {
                kind: format.clone().unwrap_or_else(|| "compose".to_string()),
                content: Some(content.clone()),
                ..Default::default()
            },
            SourceDescriptor::EnvironmentLocation { location, format } => Recipe {
                kind: format.clone().unwrap_or_else(|| "compose".to_string()),
                location: Some(location.clone()),
                ..Default::default()
            },
        }
    }
}

/// Mutually-exclusive stack / custom-recipe selection state.
#[derive(Debug, Clone, Default)]
pub struct StackSelector {
    stack: Option<Stack>,
    recipe_url: Option<String>,
    recipe_script: Option<String>,
    recipe_format: Option<String>,
}

impl StackSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a predefined stack, or `None` to switch to the custom-recipe
    /// path. Selecting a stack clears pending custom-recipe input.
    pub fn select_stack(&mut self, stack: Option<Stack>) {
        if stack.is_some() {
            self.recipe_url = None;
            self.recipe_script = None;
        }
        self.stack = stack;
    }

    pub fn stack(&self) -> Option<&Stack> {
        self.stack.as_ref()
    }

    pub fn stack_id(&self) -> Option<&str> {
        self.stack.as_ref().map(|s| s.id.as_str())
    }

    /// Stage a custom recipe URL; deselects any stack.
    pub fn set_recipe_url(&mut self, url: impl Into<String>) {
        self.stack = None;
        self.recipe_url = Some(url.into());
    }

    /// Stage an inline custom recipe script; deselects any stack.
    pub fn set_recipe_script(&mut self, script: impl Into<String>) {
        self.stack = None;
        self.recipe_script = Some(script.into());
    }

    /// Stage the custom recipe format ("compose", "dockerfile"); deselects
    /// any stack.
    pub fn set_recipe_format(&mut self, format: impl Into<String>) {
        self.stack = None;
        self.recipe_format = Some(format.into());
    }

    /// Derive the source descriptor for the current selection.
    ///
    /// Custom path: a non-empty URL wins over inline content. Stack path:
    /// resolution depends on the stack's source kind; unknown kinds are
    /// fatal.
    pub fn resolve(&self) -> Result<SourceDescriptor> {
        let Some(stack) = &self.stack else {
            return Ok(self.resolve_custom());
        };

        match stack.source.kind.to_lowercase().as_str() {
            "location" => Ok(SourceDescriptor::DockerfileLocation(
                stack.source.origin.clone(),
            )),
            "image" => Ok(SourceDescriptor::DockerfileContent(format!(
                "FROM {}",
                stack.source.origin
            ))),
            "dockerfile" => Ok(SourceDescriptor::DockerfileContent(
                stack.source.origin.clone(),
            )),
            other => Err(OrchestratorError::UnsupportedSourceKind(other.to_string())),
        }
    }

    fn resolve_custom(&self) -> SourceDescriptor {
        match &self.recipe_url {
            Some(url) if !url.is_empty() => SourceDescriptor::EnvironmentLocation {
                location: url.clone(),
                format: self.recipe_format.clone(),
            },
            _ => SourceDescriptor::EnvironmentContent {
                content: self.recipe_script.clone().unwrap_or_default(),
                format: self.recipe_format.clone(),
            },
        }
    }

    /// Build the workspace config for the current selection.
    ///
    /// Uses the stack's bundled config template when present (renamed to
    /// `name`); otherwise synthesizes a single-environment config from the
    /// resolved source with one default-sized machine.
    pub fn build_config(&self, name: &str) -> Result<WorkspaceConfig> {
        if let Some(template) = self.stack.as_ref().and_then(|s| s.workspace_config.as_ref()) {
            let mut config = template.clone();
            config.name = name.to_string();
            return Ok(config);
        }

        let source = self.resolve()?;
        let mut machine = Machine::default();
        machine.attributes.memory_limit_bytes = Some(DEFAULT_MACHINE_MEMORY_BYTES);

        let mut environment = Environment {
            recipe: source.recipe(),
            ..Default::default()
        };
        environment
            .machines
            .insert("dev-machine".to_string(), machine);

        let mut config = WorkspaceConfig {
            name: name.to_string(),
            default_env: name.to_string(),
            ..Default::default()
        };
        config.environments.insert(name.to_string(), environment);
        Ok(config)
    }
}

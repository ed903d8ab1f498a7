//! Recipe-type-specific environment handling.
//!
//! Each recipe type (compose, dockerfile, ...) can have its own rules for
//! enumerating machines and rebuilding an environment from an edited machine
//! list. Managers are looked up by recipe type in an `EnvironmentRegistry`;
//! a recipe type with no registered manager is left untouched by
//! normalization.

use indexmap::IndexMap;

use crate::config::{Environment, Machine};

/// Machines below this limit get reset to the default. 1 GiB.
pub const MIN_MACHINE_MEMORY_BYTES: u64 = 1_073_741_824;

/// Memory limit applied to machines with no usable limit. 2 GiB.
pub const DEFAULT_MACHINE_MEMORY_BYTES: u64 = 2_147_483_648;

/// Per-recipe-type environment operations.
pub trait EnvironmentManager: Send + Sync {
    /// Recipe type this manager handles, e.g. "compose".
    fn recipe_type(&self) -> &str;

    /// Enumerate the machines of an environment, keyed by machine name.
    fn machines(&self, env: &Environment) -> Vec<(String, Machine)>;

    /// Set a machine's memory limit.
    fn set_memory_limit(&self, machine: &mut Machine, bytes: u64);

    /// Rebuild an environment from an edited machine list. The recipe is
    /// carried over from `env` unchanged.
    fn rebuild(&self, env: &Environment, machines: Vec<(String, Machine)>) -> Environment;
}

/// Manager for compose-type recipes.
#[derive(Debug, Default)]
pub struct ComposeEnvironmentManager;

impl EnvironmentManager for ComposeEnvironmentManager {
    fn recipe_type(&self) -> &str {
        "compose"
    }

    fn machines(&self, env: &Environment) -> Vec<(String, Machine)> {
        env.machines
            .iter()
            .map(|(name, machine)| (name.clone(), machine.clone()))
            .collect()
    }

    fn set_memory_limit(&self, machine: &mut Machine, bytes: u64) {
        machine.attributes.memory_limit_bytes = Some(bytes);
    }

    fn rebuild(&self, env: &Environment, machines: Vec<(String, Machine)>) -> Environment {
        Environment {
            recipe: env.recipe.clone(),
            machines: machines.into_iter().collect(),
        }
    }
}

/// Registry of environment managers, keyed by recipe type.
pub struct EnvironmentRegistry {
    managers: IndexMap<String, Box<dyn EnvironmentManager>>,
}

impl EnvironmentRegistry {
    pub fn new() -> Self {
        Self {
            managers: IndexMap::new(),
        }
    }

    /// Registry with the built-in managers registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ComposeEnvironmentManager));
        registry
    }

    pub fn register(&mut self, manager: Box<dyn EnvironmentManager>) {
        self.managers
            .insert(manager.recipe_type().to_string(), manager);
    }

    pub fn manager_for(&self, recipe_type: &str) -> Option<&dyn EnvironmentManager> {
        self.managers.get(recipe_type).map(|m| m.as_ref())
    }
}

impl Default for EnvironmentRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Enforce the minimum memory policy on an environment.
///
/// Only compose-type environments are touched: every machine whose memory
/// limit is unset or below `MIN_MACHINE_MEMORY_BYTES` is reset to
/// `DEFAULT_MACHINE_MEMORY_BYTES`. Other recipe types pass through
/// unchanged. Returns a rebuilt environment; the input is never mutated.
pub fn normalize(registry: &EnvironmentRegistry, env: &Environment) -> Environment {
    if env.recipe.kind != "compose" {
        return env.clone();
    }
    let Some(manager) = registry.manager_for(&env.recipe.kind) else {
        return env.clone();
    };

    let mut machines = manager.machines(env);
    for (name, machine) in machines.iter_mut() {
        if machine.attributes.memory_limit_bytes.unwrap_or(0) < MIN_MACHINE_MEMORY_BYTES {
            tracing::debug!(
                machine = name.as_str(),
                "raising machine memory limit to default"
            );
            manager.set_memory_limit(machine, DEFAULT_MACHINE_MEMORY_BYTES);
        }
    }
    manager.rebuild(env, machines)
}

#[cfg(test)]
mod memory_normalization_tests {
    use crate::config::{Environment, Machine};
    use crate::environment::{
        normalize, EnvironmentRegistry, DEFAULT_MACHINE_MEMORY_BYTES, MIN_MACHINE_MEMORY_BYTES,
    };

    fn compose_env(limits: &[(&str, Option<u64>)]) -> Environment {
        let mut env = Environment::default();
        env.recipe.kind = "compose".to_string();
        env.recipe.content = Some("services: {}".to_string());
        for (name, limit) in limits {
            let mut machine = Machine::default();
            machine.attributes.memory_limit_bytes = *limit;
            env.machines.insert(name.to_string(), machine);
        }
        env
    }

    fn limit_of(env: &Environment, machine: &str) -> Option<u64> {
        env.machines[machine].attributes.memory_limit_bytes
    }

    #[test]
    fn unset_zero_and_half_gib_are_raised_to_default() {
        let registry = EnvironmentRegistry::with_defaults();
        let env = compose_env(&[
            ("db", None),
            ("web", Some(0)),
            ("cache", Some(536870912)),
        ]);

        let normalized = normalize(&registry, &env);
        for machine in ["db", "web", "cache"] {
            assert_eq!(
                limit_of(&normalized, machine),
                Some(DEFAULT_MACHINE_MEMORY_BYTES)
            );
        }
        // input untouched
        assert_eq!(limit_of(&env, "db"), None);
    }

    #[test]
    fn limits_at_or_above_minimum_are_kept() {
        let registry = EnvironmentRegistry::with_defaults();
        let env = compose_env(&[
            ("small", Some(MIN_MACHINE_MEMORY_BYTES)),
            ("big", Some(3221225472)),
        ]);

        let normalized = normalize(&registry, &env);
        assert_eq!(normalized, env);
    }

    #[test]
    fn normalize_is_idempotent() {
        let registry = EnvironmentRegistry::with_defaults();
        let env = compose_env(&[("db", None), ("big", Some(3221225472))]);

        let once = normalize(&registry, &env);
        let twice = normalize(&registry, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn non_compose_recipes_pass_through() {
        let registry = EnvironmentRegistry::with_defaults();
        let mut env = compose_env(&[("dev", Some(1024))]);
        env.recipe.kind = "dockerfile".to_string();

        let normalized = normalize(&registry, &env);
        assert_eq!(normalized, env);
        assert_eq!(limit_of(&normalized, "dev"), Some(1024));
    }
}

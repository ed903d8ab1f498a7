//! Workspace name generation.
//!
//! Names are `wksp-` plus a four-character lowercase base-36 token. Up to
//! 100 draws are made against the caller's used-name set; if every draw
//! collides the last one is returned anyway. Accepting a clash after 100
//! tries is deliberate policy (the server rejects the duplicate on create),
//! so this must not be turned into a hard failure.

use std::collections::HashSet;

use rand::prelude::*;

const NAME_PREFIX: &str = "wksp-";
const TOKEN_LEN: usize = 4;
const MAX_DRAWS: u32 = 100;

/// Generate a workspace name not present in `existing`, given fewer than
/// `MAX_DRAWS` collisions.
pub fn generate(existing: &HashSet<String>, rng: &mut impl Rng) -> String {
    let mut name = String::new();
    for _ in 0..MAX_DRAWS {
        name = format!("{}{}", NAME_PREFIX, base36_token(rng));
        if !existing.contains(&name) {
            break;
        }
    }
    name
}

/// `generate` with the thread-local random source.
pub fn generate_default(existing: &HashSet<String>) -> String {
    generate(existing, &mut rand::rng())
}

fn base36_token(rng: &mut impl Rng) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut n = rng.random_range(0..36u32.pow(TOKEN_LEN as u32));

    let mut buf = [b'0'; TOKEN_LEN];
    for slot in buf.iter_mut().rev() {
        *slot = DIGITS[(n % 36) as usize];
        n /= 36;
    }
    buf.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    #[test]
    fn generated_name_has_fixed_format() {
        let mut rng = StdRng::seed_from_u64(1);
        let name = generate(&HashSet::new(), &mut rng);
        assert_eq!(name.len(), NAME_PREFIX.len() + TOKEN_LEN);
        assert!(name.starts_with(NAME_PREFIX));
        let token = &name[NAME_PREFIX.len()..];
        assert!(token
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn skips_names_already_in_use() {
        // First draw from this seed collides; the generator must move on.
        let mut probe = StdRng::seed_from_u64(42);
        let first = generate(&HashSet::new(), &mut probe);

        let existing: HashSet<String> = [first.clone()].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(42);
        let name = generate(&existing, &mut rng);
        assert_ne!(name, first);
        assert!(!existing.contains(&name));
    }

    #[test]
    fn hundred_collisions_returns_last_draw() {
        // Pre-compute the first 100 draws, then rig the existing set so all
        // of them collide. The generator tolerates this and hands back the
        // 100th draw rather than failing.
        let mut probe = StdRng::seed_from_u64(7);
        let draws: Vec<String> = (0..MAX_DRAWS)
            .map(|_| format!("{}{}", NAME_PREFIX, base36_token(&mut probe)))
            .collect();

        let existing: HashSet<String> = draws.iter().cloned().collect();
        let mut rng = StdRng::seed_from_u64(7);
        let name = generate(&existing, &mut rng);
        assert_eq!(&name, draws.last().unwrap());
        assert!(existing.contains(&name));
    }
}

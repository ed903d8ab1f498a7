//! Change detection between the baseline and draft configuration copies.
//!
//! The editor keeps two copies of the config tree: the baseline (last state
//! the server acknowledged) and the draft (what the user is editing). The
//! apply action is enabled exactly when these differ. Renames are staged
//! separately from other edits because the name field is surfaced in its own
//! form before the rest of the draft is committed.

use crate::config::WorkspaceConfig;

/// Deep structural comparison of the whole config tree.
pub fn is_dirty(baseline: &WorkspaceConfig, draft: &WorkspaceConfig) -> bool {
    baseline != draft
}

/// Name-only comparison against a staged rename.
pub fn is_name_changed(baseline: &WorkspaceConfig, new_name: &str) -> bool {
    baseline.name != new_name
}

/// Commit a staged rename into the draft.
///
/// No-op when the name form reports invalid or the name is unchanged
/// relative to the baseline; only the draft's name field is touched.
pub fn rename(
    draft: &mut WorkspaceConfig,
    baseline: &WorkspaceConfig,
    new_name: &str,
    form_valid: bool,
) {
    if !form_valid || !is_name_changed(baseline, new_name) {
        return;
    }
    draft.name = new_name.to_string();
}

//! Persisted key namespace.

/// Persisted key of the local mutation counter.
pub const KEY_LOCAL_VERSION: &str = "profile_local_version";

/// Persisted key of the highest server-acknowledged version.
pub const KEY_LAST_SYNCED_VERSION: &str = "profile_last_synced_version";

/// Persisted key of the dirty-key ledger.
pub const KEY_DIRTY_KEYS: &str = "profile_dirty_keys";

/// Prefix of per-attribute value keys.
pub const ATTR_KEY_PREFIX: &str = "profile_attr_";

/// Returns the persisted store key for an attribute.
pub fn attr_key(key: &str) -> String {
    format!("{ATTR_KEY_PREFIX}{key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_keys_are_namespaced() {
        assert_eq!(attr_key("coins"), "profile_attr_coins");
    }
}

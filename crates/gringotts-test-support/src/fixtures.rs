//! Seed hook and environment helpers.

/// Environment variable carrying the seed-data option.
///
/// Cargo test has no option parser, so the flag rides on the environment.
/// Unset or blank means "off".
pub const SEED_DATA_VAR: &str = "GRINGOTTS_SEED_DATA";

/// Whether fixture data should be loaded before tests run.
#[must_use]
pub fn seed_requested() -> bool {
    seed_requested_with(std::env::var(SEED_DATA_VAR).ok())
}

fn seed_requested_with(value: Option<String>) -> bool {
    value.is_some_and(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_flag_means_off() {
        assert!(!seed_requested_with(None));
    }

    #[test]
    fn blank_flag_means_off() {
        assert!(!seed_requested_with(Some(String::new())));
        assert!(!seed_requested_with(Some("   ".to_string())));
    }

    #[test]
    fn any_value_means_on() {
        assert!(seed_requested_with(Some("1".to_string())));
        assert!(seed_requested_with(Some("yes".to_string())));
    }

    #[test]
    fn seed_requested_obeys_env_value() {
        let env_value = std::env::var(SEED_DATA_VAR).ok();
        assert_eq!(seed_requested(), seed_requested_with(env_value));
    }
}

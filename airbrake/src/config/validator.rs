use crate::config::Config;
use crate::promise::Promise;

/// Decides whether `config` may emit notices right now.
///
/// Checks run in a fixed order so the rejection reason is deterministic:
/// project id, project key, then the environment ignore list. The first
/// failing check settles the promise. Pure function of the config snapshot,
/// no I/O.
pub fn check_notify_ability(config: &Config) -> Promise {
    let mut promise = Promise::new();

    if let Some(reason) = missing_credentials(config) {
        promise.reject(Some(reason));
        return promise;
    }
    if let Some(reason) = ignored_environment(config) {
        promise.reject(Some(reason));
        return promise;
    }

    promise.resolve(None);
    promise
}

/// Credentials-only subset of the notify-ability check, backing
/// `Config::validate`.
pub(crate) fn check_credentials(config: &Config) -> Promise {
    let mut promise = Promise::new();
    match missing_credentials(config) {
        Some(reason) => promise.reject(Some(reason)),
        None => promise.resolve(None),
    };

    promise
}

fn missing_credentials(config: &Config) -> Option<String> {
    // A zero project id is treated as unset.
    match config.project_id() {
        None | Some(0) => return Some("project_id is required".to_string()),
        Some(_) => {}
    }

    match config.project_key() {
        None | Some("") => Some("project_key is required".to_string()),
        Some(_) => None,
    }
}

fn ignored_environment(config: &Config) -> Option<String> {
    if config.ignore_environments().is_empty() {
        return None;
    }

    let env = config.environment()?;
    if config.ignore_environments().iter().any(|ignored| ignored == env) {
        return Some(format!("the '{env}' environment is ignored"));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigOptions;

    fn config(options: ConfigOptions) -> Config {
        Config::new(options).expect("build config")
    }

    fn valid_options() -> ConfigOptions {
        ConfigOptions {
            project_id: Some(1),
            project_key: Some("2".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn resolves_with_credentials_and_free_environment() {
        let promise = check_notify_ability(&config(valid_options()));

        assert!(promise.is_resolved());
        assert_eq!(promise.value(), None);
    }

    #[test]
    fn rejects_without_project_id() {
        let promise = check_notify_ability(&config(ConfigOptions {
            project_key: Some("2".to_string()),
            ..Default::default()
        }));

        assert!(promise.is_rejected());
        assert_eq!(promise.reason(), Some("project_id is required"));
    }

    #[test]
    fn rejects_zero_project_id() {
        let promise = check_notify_ability(&config(ConfigOptions {
            project_id: Some(0),
            project_key: Some("2".to_string()),
            ..Default::default()
        }));

        assert_eq!(promise.reason(), Some("project_id is required"));
    }

    #[test]
    fn rejects_without_project_key() {
        let promise = check_notify_ability(&config(ConfigOptions {
            project_id: Some(1),
            ..Default::default()
        }));

        assert!(promise.is_rejected());
        assert_eq!(promise.reason(), Some("project_key is required"));
    }

    #[test]
    fn rejects_empty_project_key() {
        let promise = check_notify_ability(&config(ConfigOptions {
            project_id: Some(1),
            project_key: Some(String::new()),
            ..Default::default()
        }));

        assert_eq!(promise.reason(), Some("project_key is required"));
    }

    #[test]
    fn rejects_ignored_environment_by_name() {
        let promise = check_notify_ability(&config(ConfigOptions {
            environment: Some("test".to_string()),
            ignore_environments: Some(vec!["dev".to_string(), "test".to_string()]),
            ..valid_options()
        }));

        assert!(promise.is_rejected());
        assert_eq!(promise.reason(), Some("the 'test' environment is ignored"));
    }

    #[test]
    fn resolves_for_unlisted_environment() {
        let promise = check_notify_ability(&config(ConfigOptions {
            environment: Some("production".to_string()),
            ignore_environments: Some(vec!["test".to_string()]),
            ..valid_options()
        }));

        assert!(promise.is_resolved());
    }

    #[test]
    fn resolves_when_environment_is_unset() {
        let promise = check_notify_ability(&config(ConfigOptions {
            ignore_environments: Some(vec!["test".to_string()]),
            ..valid_options()
        }));

        assert!(promise.is_resolved());
    }

    #[test]
    fn credential_checks_take_precedence_over_environment() {
        let promise = check_notify_ability(&config(ConfigOptions {
            environment: Some("test".to_string()),
            ignore_environments: Some(vec!["test".to_string()]),
            ..Default::default()
        }));

        assert_eq!(promise.reason(), Some("project_id is required"));
    }

    #[test]
    fn check_credentials_skips_environment_rules() {
        let promise = check_credentials(&config(ConfigOptions {
            environment: Some("test".to_string()),
            ignore_environments: Some(vec!["test".to_string()]),
            ..valid_options()
        }));

        assert!(promise.is_resolved());
    }
}

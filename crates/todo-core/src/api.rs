// crates/todo-core/src/api.rs

use crate::error::TodoError;

/// The only API version tag the service accepts.
pub const API_VERSION: &str = "1";

/// Reject any request whose `api` tag is not [`API_VERSION`].
pub fn check_api(api: &str) -> Result<(), TodoError> {
    if api == API_VERSION {
        Ok(())
    } else {
        Err(TodoError::UnsupportedApi(api.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_current_version() {
        assert!(check_api("1").is_ok());
    }

    #[test]
    fn test_rejects_other_versions() {
        for api in ["", "2", "v1", " 1", "1.0"] {
            match check_api(api) {
                Err(TodoError::UnsupportedApi(v)) => assert_eq!(v, api),
                other => panic!("expected UnsupportedApi for {:?}, got {:?}", api, other),
            }
        }
    }

    #[test]
    fn test_error_message_carries_value() {
        let err = check_api("7").unwrap_err();
        assert_eq!(err.to_string(), "invalid api version: 7");
    }
}

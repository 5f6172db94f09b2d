//! Integration tests for error types

#[cfg(test)]
mod tests {
    use mak_errors::*;

    #[test]
    fn test_error_conversion() {
        let build_err = BuildError::NoBuildSystemDetected {
            path: "/tmp/project".into(),
        };
        let err: Error = build_err.into();
        assert!(matches!(err, Error::Build(_)));
    }

    #[test]
    fn test_error_display() {
        let err = EnvError::Missing {
            name: "BUILD_DIR".into(),
        };
        assert_eq!(err.to_string(), "missing variable: BUILD_DIR");
    }

    #[test]
    fn test_error_clone() {
        let err = ConfigError::ParseError {
            message: "expected value at line 1".into(),
        };
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let err: Error = io_err.into();
        assert!(matches!(
            err,
            Error::Io {
                kind: std::io::ErrorKind::PermissionDenied,
                ..
            }
        ));
    }

    #[test]
    fn test_io_error_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::io_with_path(&io_err, "/etc/mak/config.toml");
        assert!(matches!(
            &err,
            Error::Io { path: Some(path), .. } if path.ends_with("config.toml")
        ));
        assert_eq!(err.user_code(), Some("error.io"));
    }

    #[test]
    fn test_user_codes() {
        let err: Error = EnvError::Parse {
            name: "JOBS".into(),
            value: "many".into(),
            message: "invalid digit found in string".into(),
        }
        .into();
        assert_eq!(err.user_code(), Some("env.parse"));
        assert!(err.user_hint().is_some());
        assert!(!err.is_retryable());
    }
}

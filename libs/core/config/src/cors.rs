use crate::{env_required, ConfigError, FromEnv};

/// Origins allowed to call the API from a browser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_origins: origins.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a comma-separated origin list, dropping blanks.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() {
            return Err(ConfigError::ParseError {
                key: "CORS_ALLOWED_ORIGIN".to_string(),
                details: "at least one origin is required".to_string(),
            });
        }

        Ok(Self {
            allowed_origins: origins,
        })
    }
}

impl FromEnv for CorsConfig {
    /// Requires `CORS_ALLOWED_ORIGIN`, e.g. `http://localhost:5173`
    fn from_env() -> Result<Self, ConfigError> {
        Self::parse(&env_required("CORS_ALLOWED_ORIGIN")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_origin() {
        let config = CorsConfig::parse("http://localhost:5173").unwrap();
        assert_eq!(config.allowed_origins, vec!["http://localhost:5173"]);
    }

    #[test]
    fn test_comma_separated_origins_are_trimmed() {
        let config = CorsConfig::parse(" https://a.example , ,https://b.example").unwrap();
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_blank_origin_list_is_rejected() {
        assert!(CorsConfig::parse(" , ").is_err());
    }

    #[test]
    fn test_from_env_requires_variable() {
        temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || {
            let err = CorsConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("CORS_ALLOWED_ORIGIN"));
        });

        temp_env::with_var("CORS_ALLOWED_ORIGIN", Some("https://shop.example"), || {
            let config = CorsConfig::from_env().unwrap();
            assert_eq!(config, CorsConfig::new(["https://shop.example"]));
        });
    }
}

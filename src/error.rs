use std::fmt;

/// Errors that can occur while setting up the page.
///
/// Nothing that runs per frame or per event returns one of these; those paths
/// degrade to no-ops instead.
#[derive(Debug)]
pub enum Error {
    /// Settings or question JSON couldn't be parsed.
    Config(serde_json::Error),
    /// A config file couldn't be read.
    Io(std::io::Error),
    /// A setting parsed fine but has a value we can't draw with.
    InvalidSetting { name: &'static str, reason: String },
    /// A browser API call failed while wiring up the page.
    #[cfg(target_arch = "wasm32")]
    Js(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Failed to parse config: {}", e),
            Error::Io(e) => write!(f, "Failed to read config file: {}", e),
            Error::InvalidSetting { name, reason } => {
                write!(f, "Invalid setting `{}`: {}", name, reason)
            }
            #[cfg(target_arch = "wasm32")]
            Error::Js(msg) => write!(f, "Browser call failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for Error {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Error::Js(format!("{:?}", value))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<Error> for wasm_bindgen::JsValue {
    fn from(e: Error) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_setting_names_the_field() {
        let err = Error::InvalidSetting {
            name: "trail_alpha",
            reason: "must be between 0 and 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid setting `trail_alpha`: must be between 0 and 1"
        );
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn json_errors_keep_their_source() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.to_string().starts_with("Failed to parse config"));
        assert!(std::error::Error::source(&err).is_some());
    }
}

use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_DIR: &str = "_data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    /// Basic auth is enforced only when this is set.
    pub credentials: Option<Credentials>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = ["PORT", "VCAP_APP_PORT"]
            .iter()
            .find_map(|key| lookup(*key).and_then(|value| value.trim().parse::<u16>().ok()))
            .unwrap_or(DEFAULT_PORT);

        let data_dir = lookup("APP_DATA_DIR")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let credentials = match (lookup("HTUSER"), lookup("HTAUTH")) {
            (Some(user), Some(password)) if !user.is_empty() => Some(Credentials { user, password }),
            _ => None,
        };

        Self {
            port,
            data_dir,
            credentials,
        }
    }
}

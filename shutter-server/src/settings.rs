use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Storage {
    pub data_dir: String,
    pub uploads_dir: String,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            data_dir: "data".into(),
            uploads_dir: "uploads".into(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    pub server: Server,
    pub storage: Storage,
}

impl Settings {
    /// Layered settings: defaults, then an optional `shutter.toml`, then
    /// environment overrides (`SERVER__PORT`, `STORAGE__DATA_DIR`, ...).
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", "3000")?
            .set_default("storage.data_dir", "data")?
            .set_default("storage.uploads_dir", "uploads")?
            .add_source(
                File::with_name("shutter.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::default().separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::{remove_var, set_var};

    #[test]
    fn defaults_and_env_overrides() {
        set_var("SERVER__PORT", "4000");
        set_var("STORAGE__DATA_DIR", "/tmp/shutter-data");
        let settings = Settings::new().unwrap_or_default();
        remove_var("SERVER__PORT");
        remove_var("STORAGE__DATA_DIR");

        assert_eq!(settings.listen_addr(), "127.0.0.1:4000");
        assert_eq!(settings.storage.data_dir, "/tmp/shutter-data");
        assert_eq!(settings.storage.uploads_dir, "uploads");
    }
}

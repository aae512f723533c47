//! config/account_config.rs
//! Carga de cuentas remitentes desde un archivo estilo `.env`.
//!
//! Formato esperado:
//!
//! ```text
//! DEFAULT_ACCOUNT=personal
//! PERSONAL_EMAIL_USER=me@gmail.com
//! PERSONAL_APP_PASSWORD="abcd efgh ijkl mnop"
//! PERSONAL_DISPLAY_NAME=Me
//! # opcionales
//! PERSONAL_SMTP_HOST=smtp.gmail.com
//! PERSONAL_SMTP_PORT=465
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::MailError;
use crate::models::account_model::Account;

pub const DEFAULT_ACCOUNT_KEY: &str = "DEFAULT_ACCOUNT";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;

const USER_SUFFIX: &str = "_EMAIL_USER";
const PASSWORD_SUFFIX: &str = "_APP_PASSWORD";
const DISPLAY_NAME_SUFFIX: &str = "_DISPLAY_NAME";
const HOST_SUFFIX: &str = "_SMTP_HOST";
const PORT_SUFFIX: &str = "_SMTP_PORT";

#[derive(Debug, Clone)]
pub struct AccountConfig {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl AccountConfig {
    /// Lee el archivo sin tocar las variables de entorno del proceso.
    pub fn load(path: &Path) -> Result<Self, MailError> {
        if !path.is_file() {
            return Err(MailError::ConfigMissing(path.to_path_buf()));
        }

        let invalid = |e: dotenv::Error| MailError::ConfigInvalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let mut values = BTreeMap::new();
        for item in dotenv::from_path_iter(path).map_err(invalid)? {
            let (key, value) = item.map_err(invalid)?;
            values.insert(key, value);
        }

        log::debug!(
            "Config cargada desde {} ({} claves)",
            path.display(),
            values.len()
        );

        Ok(Self::from_values(path.to_path_buf(), values))
    }

    pub fn from_values(path: PathBuf, values: BTreeMap<String, String>) -> Self {
        AccountConfig { path, values }
    }

    pub fn default_account(&self) -> Option<&str> {
        self.value(DEFAULT_ACCOUNT_KEY)
    }

    /// Nombres de cuenta (en minúsculas) con `<NAME>_EMAIL_USER` definido.
    pub fn account_names(&self) -> Vec<String> {
        self.values
            .keys()
            .filter_map(|k| k.strip_suffix(USER_SUFFIX))
            .filter(|name| !name.is_empty())
            .map(|name| name.to_ascii_lowercase())
            .collect()
    }

    /// Resuelve `--from` o, si no se indicó, la cuenta por defecto.
    pub fn resolve(&self, requested: Option<&str>) -> Result<Account, MailError> {
        let name = match requested.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => self
                .default_account()
                .map(str::to_string)
                .ok_or_else(|| MailError::CredentialNotConfigured {
                    account: "(default)".to_string(),
                    key: DEFAULT_ACCOUNT_KEY.to_string(),
                })?,
        };

        let prefix = name.to_ascii_uppercase();

        let address = match self.value(&format!("{prefix}{USER_SUFFIX}")) {
            Some(address) => address.to_string(),
            None => {
                return Err(MailError::AccountNotFound {
                    name,
                    available: self.account_names(),
                })
            }
        };

        let password_key = format!("{prefix}{PASSWORD_SUFFIX}");
        let secret = self
            .value(&password_key)
            .map(str::to_string)
            .ok_or_else(|| MailError::CredentialNotConfigured {
                account: name.clone(),
                key: password_key.clone(),
            })?;

        let display_name = self
            .value(&format!("{prefix}{DISPLAY_NAME_SUFFIX}"))
            .map(str::to_string)
            .unwrap_or_else(|| name.clone());

        let smtp_host = self
            .value(&format!("{prefix}{HOST_SUFFIX}"))
            .unwrap_or(DEFAULT_SMTP_HOST)
            .to_string();

        let port_key = format!("{prefix}{PORT_SUFFIX}");
        let smtp_port = match self.value(&port_key) {
            Some(raw) => raw.parse::<u16>().map_err(|e| MailError::ConfigInvalid {
                path: self.path.clone(),
                message: format!("{port_key}={raw}: {e}"),
            })?,
            None => DEFAULT_SMTP_PORT,
        };

        Ok(Account {
            name,
            address,
            secret,
            display_name,
            smtp_host,
            smtp_port,
        })
    }

    // Valores vacíos cuentan como ausentes
    fn value(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

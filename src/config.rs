// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Configuration
//!
//! Connection settings are read from the Argo CD CLI config file, so a prior
//! `argocd login` is all that is needed. Anything given on the command line
//! (or through `ARGOCD_SERVER` / `ARGOCD_AUTH_TOKEN`) wins over the file.
//!
//! Our own data (logs) lives under ~/.argocd-actions/.

use anyhow::{Context, Result, anyhow, bail};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::argocd::ClientOptions;

/// Get the base directory for our own files (~/.argocd-actions/)
pub fn base_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".argocd-actions"))
        .context("Could not determine home directory")
}

/// Default location of the Argo CD CLI config
///
/// `$ARGOCD_CONFIG_DIR/config`, else `$XDG_CONFIG_HOME/argocd/config`,
/// else `~/.config/argocd/config`.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("ARGOCD_CONFIG_DIR").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir).join("config"));
    }
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir).join("argocd").join("config"));
    }
    dirs::home_dir()
        .map(|p| p.join(".config").join("argocd").join("config"))
        .context("Could not determine home directory")
}

/// Argo CD CLI local config (`~/.config/argocd/config`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LocalConfig {
    #[serde(default)]
    pub current_context: String,
    #[serde(default)]
    pub contexts: Vec<ContextRef>,
    #[serde(default)]
    pub servers: Vec<Server>,
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextRef {
    pub name: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub user: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Server {
    pub server: String,
    #[serde(default)]
    pub insecure: bool,
    #[serde(default)]
    pub plain_text: bool,
    #[serde(default)]
    pub grpc_web_root_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct User {
    pub name: String,
    #[serde(default)]
    pub auth_token: String,
}

impl LocalConfig {
    /// Load config from disk, or return default if not found
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(LocalConfig::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: LocalConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn context(&self, name: &str) -> Option<&ContextRef> {
        self.contexts.iter().find(|c| c.name == name)
    }

    pub fn server(&self, server: &str) -> Option<&Server> {
        self.servers.iter().find(|s| s.server == server)
    }

    pub fn user(&self, name: &str) -> Option<&User> {
        self.users.iter().find(|u| u.name == name)
    }

    /// Context to use: the requested one, or `current-context`
    fn select_context(&self, requested: Option<&str>) -> Result<Option<&ContextRef>> {
        match requested {
            Some(name) => self
                .context(name)
                .map(Some)
                .ok_or_else(|| anyhow!("Context '{}' not found in Argo CD config", name)),
            None if self.current_context.is_empty() => Ok(None),
            None => Ok(self.context(&self.current_context)),
        }
    }
}

/// Connection settings given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    pub server: Option<String>,
    pub auth_token: Option<String>,
    pub context: Option<String>,
    pub insecure: bool,
    pub plaintext: bool,
    pub grpc_web_root_path: Option<String>,
}

/// Merge overrides with the local config into client options
///
/// With an explicit server, the config entry for that server (and the token
/// of a context pointing at it) still fills in anything not overridden.
pub fn resolve_client_options(
    local: &LocalConfig,
    overrides: ConnectionOverrides,
) -> Result<ClientOptions> {
    let explicit_server = overrides.server.filter(|s| !s.is_empty());
    let context = match &explicit_server {
        Some(server) if overrides.context.is_none() => {
            local.contexts.iter().find(|c| &c.server == server)
        }
        _ => local.select_context(overrides.context.as_deref())?,
    };

    let Some(server) = explicit_server.or_else(|| context.map(|c| c.server.clone())) else {
        bail!(
            "Argo CD server address unspecified. Use --server, set ARGOCD_SERVER, \
             or run 'argocd login' first"
        );
    };

    let server_entry = local.server(&server);
    let token = overrides
        .auth_token
        .filter(|t| !t.is_empty())
        .or_else(|| {
            context
                .and_then(|c| local.user(&c.user))
                .map(|u| u.auth_token.clone())
                .filter(|t| !t.is_empty())
        });

    let root_path = overrides
        .grpc_web_root_path
        .or_else(|| server_entry.map(|s| s.grpc_web_root_path.clone()))
        .filter(|p| !p.trim_matches('/').is_empty());

    Ok(ClientOptions {
        insecure: overrides.insecure || server_entry.is_some_and(|s| s.insecure),
        plaintext: overrides.plaintext || server_entry.is_some_and(|s| s.plain_text),
        server,
        auth_token: token.map(SecretString::from),
        root_path,
    })
}

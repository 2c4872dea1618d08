// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

use crate::actions::{Multiplicity, SelectorCriteria};
use crate::config::ConnectionOverrides;

#[derive(Parser, Debug)]
#[command(name = "argocd-actions")]
#[command(author, version, about = "List and run actions on resources managed by Argo CD applications")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// How to reach the Argo CD API server
#[derive(ClapArgs, Debug, Default)]
pub struct ConnectionArgs {
    /// Argo CD server address
    #[arg(long, env = "ARGOCD_SERVER", global = true)]
    pub server: Option<String>,

    /// Authentication token
    #[arg(long, env = "ARGOCD_AUTH_TOKEN", global = true, hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Name of the Argo CD context to use (defaults to current-context)
    #[arg(long = "argocd-context", global = true, value_name = "CONTEXT")]
    pub context: Option<String>,

    /// Path to the Argo CD config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Skip server certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Disable TLS
    #[arg(long, global = true)]
    pub plaintext: bool,

    /// Path prefix the API server is served under
    #[arg(long, global = true, value_name = "PATH")]
    pub grpc_web_root_path: Option<String>,
}

impl ConnectionArgs {
    pub fn overrides(&self) -> ConnectionOverrides {
        ConnectionOverrides {
            server: self.server.clone(),
            auth_token: self.auth_token.clone(),
            context: self.context.clone(),
            insecure: self.insecure,
            plaintext: self.plaintext,
            grpc_web_root_path: self.grpc_web_root_path.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lists available actions on resources
    List(ListArgs),

    /// Runs an available action on resource(s)
    Run(RunArgs),
}

#[derive(ClapArgs, Debug)]
pub struct ListArgs {
    /// Application name
    #[arg(value_name = "APPNAME")]
    pub app: String,

    /// Name of resource
    #[arg(long)]
    pub resource_name: Option<String>,

    /// Kind
    #[arg(long)]
    pub kind: Option<String>,

    /// Group (pass an empty value to select the core group)
    #[arg(long)]
    pub group: Option<String>,

    /// Namespace
    #[arg(long)]
    pub namespace: Option<String>,

    /// Output format
    #[arg(short, long = "out", value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Omit column headers in table output
    #[arg(long)]
    pub no_headers: bool,
}

impl ListArgs {
    pub fn criteria(&self) -> SelectorCriteria {
        SelectorCriteria {
            // An explicit empty group selects the core API group
            group: self.group.clone(),
            kind: non_empty(&self.kind),
            namespace: non_empty(&self.namespace),
            name: non_empty(&self.resource_name),
            multiplicity: Multiplicity::Any,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct RunArgs {
    /// Application name
    #[arg(value_name = "APPNAME")]
    pub app: String,

    /// Action to run, as <group>/<kind>/<action>
    #[arg(value_name = "ACTION")]
    pub action: String,

    /// Name of resource
    #[arg(long)]
    pub resource_name: Option<String>,

    /// Namespace
    #[arg(long)]
    pub namespace: Option<String>,

    /// Kind
    #[arg(long)]
    pub kind: Option<String>,

    /// Run the action on every matching resource
    #[arg(long)]
    pub all: bool,
}

impl RunArgs {
    pub fn criteria(&self) -> SelectorCriteria {
        SelectorCriteria {
            group: None,
            kind: None,
            namespace: non_empty(&self.namespace),
            name: non_empty(&self.resource_name),
            multiplicity: Multiplicity::from_all_flag(self.all),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_list_args() {
        let args = parse(&[
            "argocd-actions",
            "list",
            "guestbook",
            "--kind",
            "Deployment",
            "--namespace",
            "",
            "-o",
            "json",
        ]);
        let Command::List(list) = args.command else {
            panic!("expected list");
        };
        assert_eq!(list.app, "guestbook");
        assert_eq!(list.output, OutputFormat::Json);

        let criteria = list.criteria();
        assert_eq!(criteria.kind.as_deref(), Some("Deployment"));
        assert_eq!(criteria.namespace, None);
        assert_eq!(criteria.group, None);
        assert_eq!(criteria.multiplicity, Multiplicity::Any);
    }

    #[test]
    fn test_list_explicit_empty_group() {
        let args = parse(&["argocd-actions", "list", "guestbook", "--group", ""]);
        let Command::List(list) = args.command else {
            panic!("expected list");
        };
        assert_eq!(list.criteria().group.as_deref(), Some(""));
    }

    #[test]
    fn test_run_args() {
        let args = parse(&[
            "argocd-actions",
            "run",
            "guestbook",
            "apps/Deployment/restart",
            "--resource-name",
            "web",
            "--all",
        ]);
        let Command::Run(run) = args.command else {
            panic!("expected run");
        };
        assert_eq!(run.action, "apps/Deployment/restart");
        let criteria = run.criteria();
        assert_eq!(criteria.name.as_deref(), Some("web"));
        assert_eq!(criteria.multiplicity, Multiplicity::Any);
    }

    #[test]
    fn test_run_defaults_to_single() {
        let args = parse(&["argocd-actions", "run", "guestbook", "apps/Deployment/restart"]);
        let Command::Run(run) = args.command else {
            panic!("expected run");
        };
        assert_eq!(run.criteria().multiplicity, Multiplicity::Single);
    }

    #[test]
    fn test_run_requires_action() {
        assert!(Args::try_parse_from(["argocd-actions", "run", "guestbook"]).is_err());
    }

    #[test]
    fn test_global_connection_flags_after_subcommand() {
        let args = parse(&[
            "argocd-actions",
            "list",
            "guestbook",
            "--server",
            "localhost:8080",
            "--plaintext",
            "--argocd-context",
            "local",
        ]);
        let overrides = args.connection.overrides();
        assert_eq!(overrides.server.as_deref(), Some("localhost:8080"));
        assert_eq!(overrides.context.as_deref(), Some("local"));
        assert!(overrides.plaintext);
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}

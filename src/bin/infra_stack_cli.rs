//! Infra Stack CLI
//!
//! Commands: sanitize, check, synth
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 when a checked name is invalid

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use infra_stack::{
    check_name, sanitize, DeploymentContext, StackConfig, StackProps, StackSynthesizer, SynthError,
};

#[derive(Parser)]
#[command(name = "infra-stack-cli")]
#[command(about = "Infra Stack CLI - deterministic resource names and stack templates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML stack config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a candidate into a valid bucket name
    Sanitize {
        #[arg(allow_hyphen_values = true)]
        candidate: String,
    },

    /// Report grammar violations of a name
    Check {
        #[arg(allow_hyphen_values = true)]
        name: String,
    },

    /// Emit the stack template
    Synth {
        /// Fixed stack name (generated from the clock otherwise)
        #[arg(long)]
        stack_name: Option<String>,

        #[arg(long, env = "CDK_DEFAULT_ACCOUNT")]
        account: Option<String>,

        #[arg(long, env = "CDK_DEFAULT_REGION")]
        region: Option<String>,

        /// Default for the VpcId template parameter
        #[arg(long, env = "VPC_ID")]
        vpc_id: Option<String>,
    },
}

fn emit<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn synth(
    config: Option<PathBuf>,
    stack_name: Option<String>,
    account: Option<String>,
    region: Option<String>,
    vpc_id: Option<String>,
) -> Result<infra_stack::SynthesizedStack, SynthError> {
    let config = StackConfig::load_or_default(config.as_deref())?;

    let now = Utc::now();
    let props = match stack_name {
        Some(name) => StackProps::named(&config, name, now),
        None => StackProps::generate(&config, now),
    };

    let mut ctx = DeploymentContext::from_parts(account, region);
    if let Some(vpc_id) = vpc_id {
        ctx = ctx.with_vpc_id(vpc_id);
    }

    StackSynthesizer::new(config).synthesize(&props, &ctx)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sanitize { candidate } => {
            let name = sanitize(&candidate);
            emit(&serde_json::json!({
                "candidate": candidate,
                "name": name,
            }))
        }

        Commands::Check { name } => {
            let check = check_name(&name);
            let code = emit(&check);
            if check.valid {
                code
            } else {
                ExitCode::from(2)
            }
        }

        Commands::Synth { stack_name, account, region, vpc_id } => {
            match synth(cli.config, stack_name, account, region, vpc_id) {
                Ok(stack) => emit(&stack),
                Err(e) => {
                    tracing::error!(error = %e, "synthesis failed");
                    let output = serde_json::json!({
                        "success": false,
                        "error": e.to_string(),
                    });
                    println!("{}", output);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

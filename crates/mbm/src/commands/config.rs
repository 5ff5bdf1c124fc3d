//! Config command - configuration management.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};

use mbm_config::{MbmConfig, SessionConfig};
use mbm_types::HasSessionCacheConfig;

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration and where it came from
    Show,

    /// Show the user configuration file path
    Path,

    /// Initialize a config file with defaults
    Init {
        /// Create project-local config (./mbm.toml) instead of user config
        #[arg(long)]
        local: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Path => cmd_path(),
        ConfigCommand::Init { local, force } => cmd_init(local, force),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let loaded = ctx.load_config()?;

    println!("# MBM Configuration\n");

    if loaded.sources.is_empty() {
        println!("No config files loaded (using defaults)\n");
    } else {
        for path in &loaded.sources {
            println!("# loaded: {}", path.display());
        }
        println!();
    }

    let session = loaded.config.session();
    let effective = MbmConfig {
        session: Some(session.clone()),
    };
    print!("{}", effective.to_toml()?);

    if ctx.verbose {
        println!();
        describe_session(&session);
    }

    Ok(())
}

fn describe_session(session: &SessionConfig) {
    println!("# ttl: {:?} (sliding)", session.ttl());
    match session.max_entries() {
        Some(max) => println!("# capacity: {max} tokens"),
        None => println!("# capacity: unbounded"),
    }
    match session.sweep_interval() {
        Some(interval) => println!("# sweep: every {interval:?}"),
        None => println!("# sweep: disabled (lazy eviction only)"),
    }
}

fn cmd_path() -> Result<()> {
    match mbm_config::user_config_path() {
        Some(path) => println!("{}", path.display()),
        None => bail!("could not determine the user config directory"),
    }
    Ok(())
}

fn cmd_init(local: bool, force: bool) -> Result<()> {
    let path = if local {
        std::path::PathBuf::from("mbm.toml")
    } else {
        match mbm_config::user_config_path() {
            Some(path) => path,
            None => bail!("could not determine the user config directory"),
        }
    };

    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let config = MbmConfig {
        session: Some(SessionConfig::default()),
    };
    mbm_config::save_config(&config, &path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

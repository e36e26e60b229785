//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init { force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let cfg = Config {
                bridge: global.bridge.clone(),
                state_file: global.state_file.clone(),
                timeout: global.timeout.unwrap_or(Config::default().timeout),
                ..Config::default()
            };
            let written = config::save_config(&cfg)?;
            eprintln!("Config written to {}", written.display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::resolve(global)?;
            let out = toml::to_string_pretty(&cfg)?;
            let state_path = cfg.state_path();
            output::print_output(out.trim_end(), global.quiet);
            output::print_output(
                &format!("# state file: {}", state_path.display()),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}

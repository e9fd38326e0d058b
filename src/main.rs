use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use pricefx::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Skip fetching live rates and use the built-in table
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for pricefx::AppCommand {
    fn from(cmd: Commands) -> pricefx::AppCommand {
        match cmd {
            Commands::Rates => pricefx::AppCommand::Rates,
            Commands::Convert { amount, from, to } => {
                pricefx::AppCommand::Convert { amount, from, to }
            }
            Commands::Currencies => pricefx::AppCommand::Currencies,
            Commands::Select { code } => pricefx::AppCommand::Select { code },
            Commands::Price {
                amount,
                from,
                no_symbol,
                suffix,
            } => pricefx::AppCommand::Price {
                amount,
                from,
                show_symbol: !no_symbol,
                suffix,
            },
            Commands::Watch { amount, from } => pricefx::AppCommand::Watch { amount, from },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the active exchange rates
    Rates,
    /// Convert an amount between two currencies
    Convert {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Source currency
        #[arg(long, default_value = "CNY")]
        from: String,
        /// Target currency, defaults to the selected display currency
        #[arg(long)]
        to: Option<String>,
    },
    /// List supported currencies by region
    Currencies,
    /// Change the display currency
    Select { code: String },
    /// Render a price in the selected display currency
    Price {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Currency the amount is expressed in, defaults to CNY
        #[arg(long)]
        from: Option<String>,
        /// Omit the currency symbol
        #[arg(long)]
        no_symbol: bool,
        /// Text appended after the amount
        #[arg(long)]
        suffix: Option<String>,
    },
    /// Keep rates fresh and reprint a price whenever they change
    Watch {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Currency the amount is expressed in, defaults to CNY
        #[arg(long)]
        from: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => pricefx::cli::setup::setup(),
        Some(cmd) => {
            pricefx::run_command(cmd.into(), cli.config_path.as_deref(), cli.offline).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> pricefx::AppCommand {
        let cli = Cli::try_parse_from(args).unwrap();
        cli.command.unwrap().into()
    }

    #[test]
    fn test_negative_amounts_are_accepted() {
        assert_eq!(
            parse(&["pricefx", "watch", "-250", "--from", "usd"]),
            pricefx::AppCommand::Watch {
                amount: -250.0,
                from: Some("usd".to_string()),
            }
        );
        assert_eq!(
            parse(&["pricefx", "convert", "-10", "--from", "USD"]),
            pricefx::AppCommand::Convert {
                amount: -10.0,
                from: "USD".to_string(),
                to: None,
            }
        );
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}

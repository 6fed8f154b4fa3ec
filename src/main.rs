use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxconv::cli::convert::ConvertArgs;
use fxconv::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List exchange rates against the base currency, favorites first
    Rates {
        /// Only show currencies whose code contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert, using '.' or ',' as decimal separator
        amount: String,
        /// Source currency (defaults to the base currency)
        #[arg(short, long, value_parser = parse_code)]
        from: Option<String>,
        /// Target currency (defaults to EUR)
        #[arg(short, long, value_parser = parse_code)]
        to: Option<String>,
        /// Treat the amount as the target side
        #[arg(short, long)]
        reverse: bool,
        /// Swap the currencies after converting
        #[arg(long)]
        swap: bool,
    },
    /// Add a currency to favorites, or remove it if already present
    Favorite {
        #[arg(value_parser = parse_code)]
        code: String,
    },
    /// Show the base currency, or set it and reload rates
    Base {
        #[arg(value_parser = parse_code)]
        code: Option<String>,
    },
}

fn parse_code(s: &str) -> Result<String, String> {
    let code = s.trim().to_uppercase();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!("invalid currency code: {s}"));
    }
    Ok(code)
}

impl From<Commands> for fxconv::AppCommand {
    fn from(cmd: Commands) -> fxconv::AppCommand {
        match cmd {
            Commands::Rates { search } => fxconv::AppCommand::Rates { search },
            Commands::Convert {
                amount,
                from,
                to,
                reverse,
                swap,
            } => fxconv::AppCommand::Convert(ConvertArgs {
                amount,
                from,
                to,
                reverse,
                swap,
            }),
            Commands::Favorite { code } => fxconv::AppCommand::Favorite { code },
            Commands::Base { code } => fxconv::AppCommand::Base { code },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxconv::cli::setup::setup(),
        Some(cmd) => fxconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
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

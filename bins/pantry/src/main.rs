//! pantry: match free text against the ingredient catalog and manage it.

use clap::{Parser, Subcommand};
use pantry_cli::output::Status;
use pantry_core::config::Config;
use pantry_core::error::exit_codes;
use pantry_telemetry::TelemetryConfig;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

use commands::{ingredients, matching, sponsors, token, Context};

/// Approximate ingredient matching for recipes and product labels
#[derive(Parser)]
#[command(name = "pantry")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to pantry.toml lookup)
    #[arg(short, long, global = true, env = "PANTRY_CONFIG")]
    config: Option<PathBuf>,

    /// Catalog snapshot, overriding the configured path
    #[arg(long, global = true, env = "PANTRY_CATALOG")]
    catalog: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match text against the ingredient vocabulary
    Match {
        /// Text to match
        text: Option<String>,

        /// Read the text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Match each non-blank line of --file separately
        #[arg(long, requires = "file")]
        lines: bool,
    },

    /// Manage ingredients
    Ingredients {
        #[command(subcommand)]
        action: IngredientAction,
    },

    /// Manage sponsors
    Sponsors {
        #[command(subcommand)]
        action: SponsorAction,
    },

    /// Admin session tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum IngredientAction {
    /// List ingredients by id
    List {
        /// Maximum rows to show
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Rows to skip
        #[arg(long, default_value = "0")]
        after: usize,
    },

    /// Add an ingredient
    Add {
        /// Ingredient name
        name: String,

        /// Score contributed when matched
        #[arg(short, long, allow_negative_numbers = true)]
        score: f64,

        /// Free-form description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Change fields of an ingredient
    Update {
        /// Ingredient id
        id: i64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New score
        #[arg(short, long, allow_negative_numbers = true)]
        score: Option<f64>,
    },

    /// Remove an ingredient
    Remove {
        /// Ingredient id
        id: i64,
    },
}

#[derive(Subcommand)]
enum SponsorAction {
    /// List sponsors by id
    List {
        /// Maximum rows to show
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Rows to skip
        #[arg(long, default_value = "0")]
        after: usize,
    },

    /// Add a sponsor product
    Add {
        /// Sponsor name
        #[arg(long)]
        sponsor: String,

        /// Product name
        #[arg(long)]
        product: String,

        /// Product description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Product picture URL or path
        #[arg(long, default_value = "")]
        picture: String,
    },

    /// Remove a sponsor
    Remove {
        /// Sponsor id
        id: i64,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a session token for an identity
    Issue {
        /// Who the token is for
        identity: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return fail(&anyhow::Error::from(e), cli.json),
    };

    let telemetry = TelemetryConfig {
        log_level: if cli.verbose {
            "pantry=debug,pantry_catalog=debug,pantry_search=debug".to_string()
        } else {
            config.schema.logging.level.clone()
        },
        json: config.schema.logging.json,
        ..Default::default()
    };
    if let Err(e) = pantry_telemetry::init_with_config(telemetry) {
        Status::warning(&format!("Logging disabled: {}", e));
    }

    let ctx = Context::new(config, cli.catalog, cli.json);

    let result = match cli.command {
        Commands::Match { text, file, lines } => matching::run(&ctx, text, file, lines),

        Commands::Ingredients { action } => match action {
            IngredientAction::List { count, after } => ingredients::list(&ctx, count, after),
            IngredientAction::Add { name, score, description } => {
                ingredients::add(&ctx, name, description, score)
            }
            IngredientAction::Update { id, name, description, score } => {
                ingredients::update(&ctx, id, name, description, score)
            }
            IngredientAction::Remove { id } => ingredients::remove(&ctx, id),
        },

        Commands::Sponsors { action } => match action {
            SponsorAction::List { count, after } => sponsors::list(&ctx, count, after),
            SponsorAction::Add { sponsor, product, description, picture } => {
                sponsors::add(&ctx, sponsor, product, description, picture)
            }
            SponsorAction::Remove { id } => sponsors::remove(&ctx, id),
        },

        Commands::Token { action } => match action {
            TokenAction::Issue { identity } => token::issue(&ctx, identity),
        },
    };

    if cli.verbose {
        tracing::debug!(metrics = %pantry_telemetry::metrics().export_json(), "Run complete");
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e, cli.json),
    }
}

/// Report an error and map it to the process exit code
fn fail(err: &anyhow::Error, json: bool) -> ExitCode {
    let code = match err.downcast_ref::<pantry_core::Error>() {
        Some(e) => {
            if json {
                match serde_json::to_string_pretty(&e.to_report()) {
                    Ok(report) => eprintln!("{}", report),
                    Err(_) => Status::report(e),
                }
            } else {
                Status::report(e);
            }
            e.code.exit_code()
        }
        None => {
            Status::error(&format!("{:#}", err));
            exit_codes::FAILURE
        }
    };
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_match_file_lines() {
        let cli = Cli::try_parse_from(["pantry", "--json", "match", "--file", "r.txt", "--lines"])
            .unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Match { lines: true, text: None, .. }));
    }

    #[test]
    fn test_lines_requires_file() {
        assert!(Cli::try_parse_from(["pantry", "match", "salt", "--lines"]).is_err());
    }

    #[test]
    fn test_parse_negative_score() {
        let cli = Cli::try_parse_from(["pantry", "ingredients", "add", "sugar", "--score", "-2.5"])
            .unwrap();
        match cli.command {
            Commands::Ingredients { action: IngredientAction::Add { score, .. } } => {
                assert_eq!(score, -2.5)
            }
            _ => panic!("expected ingredients add"),
        }
    }

    #[test]
    fn test_fail_maps_exit_codes() {
        let err: anyhow::Error = pantry_core::Error::invalid_input("Text input is required").into();
        assert_eq!(fail(&err, true), ExitCode::from(exit_codes::VALIDATION_ERROR as u8));

        let err: anyhow::Error = pantry_core::Error::not_found("ingredient", 9).into();
        assert_eq!(fail(&err, false), ExitCode::from(exit_codes::NOT_FOUND as u8));

        let err = anyhow::anyhow!("boom");
        assert_eq!(fail(&err, false), ExitCode::from(exit_codes::FAILURE as u8));
    }
}

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use talent_score::scoring::ScoringError;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_NO_JUDGES: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    /// Judge sections and the formula trace
    #[default]
    Text,
    /// The full breakdown as JSON
    Json,
    /// One judge per line, tab separated
    Tsv,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive score form (default if no subcommand)
    Form {
        /// Start from a sheet file instead of an empty sheet
        #[arg(long)]
        sheet: Option<PathBuf>,
    },
    /// Score a sheet file and print the breakdown
    Calc {
        /// Path to the YAML sheet file
        sheet: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,

        /// Override the control constant (M₀) for this run
        #[arg(long)]
        control_constant: Option<f64>,
    },
    /// Print how each number is calculated
    Formulas,
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "talent-score")]
#[command(about = "Talent competition scoring with judge bias detection", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/talent-score/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    talent_score::logging::init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Form { sheet: None });
    let config_path = cli.config.map(PathBuf::from);

    // Commands that don't need a loaded config
    match command {
        Commands::Formulas => {
            print!("{}", talent_score::output::FORMULA_GUIDE);
            std::process::exit(EXIT_SUCCESS);
        }
        Commands::Init => {
            if let Err(e) = talent_score::config::init::run_init_wizard(config_path.clone()) {
                eprintln!("Init failed: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
            std::process::exit(EXIT_SUCCESS);
        }
        _ => {}
    }

    // Load config
    let config = match talent_score::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let scoring = config.effective_scoring();
    if let Err(errors) = talent_score::scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    tracing::debug!(control_constant = scoring.control_constant, "scoring config ready");

    match command {
        Commands::Calc { sheet, format, control_constant } => {
            let mut score_sheet = match talent_score::sheet::load_sheet(&sheet, &scoring) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Sheet error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            if let Some(m0) = control_constant {
                let overridden = talent_score::scoring::ScoringConfig::with_control_constant(m0);
                if let Err(errors) = talent_score::scoring::validate_scoring(&overridden) {
                    eprintln!("Invalid --control-constant:");
                    for error in errors {
                        eprintln!("  - {}", error);
                    }
                    std::process::exit(EXIT_INPUT);
                }
                score_sheet.set_control_constant(m0);
            }

            let breakdown = match score_sheet.calculate() {
                Ok(b) => b,
                Err(e @ ScoringError::NoActiveJudges) => {
                    eprintln!("Cannot calculate: {}", e);
                    std::process::exit(EXIT_NO_JUDGES);
                }
                Err(e @ ScoringError::EmptySpecialCriteria { .. }) => {
                    eprintln!("Cannot calculate: {}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            let output = match format {
                OutputFormat::Text => {
                    let use_colors = talent_score::output::should_use_colors();
                    talent_score::output::format_breakdown(&breakdown, use_colors)
                }
                OutputFormat::Tsv => talent_score::output::format_tsv(&breakdown),
                OutputFormat::Json => match talent_score::output::format_json(&breakdown) {
                    Ok(json) => json,
                    Err(e) => {
                        eprintln!("Failed to serialize breakdown: {}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                },
            };
            println!("{}", output);
        }
        Commands::Form { sheet } => {
            let score_sheet = match sheet {
                Some(path) => match talent_score::sheet::load_sheet(&path, &scoring) {
                    Ok(s) => s,
                    Err(e) => {
                        eprintln!("Sheet error: {:#}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                },
                None => talent_score::sheet::ScoreSheet::new(config.judge_count(), &scoring),
            };

            let app = talent_score::tui::App::new(score_sheet);
            match talent_score::tui::run_tui(app).await {
                Ok(app) => {
                    // Leave the last fresh result on screen after the form closes
                    if let (Some(Ok(breakdown)), false) = (&app.result, app.result_stale) {
                        let use_colors = talent_score::output::should_use_colors();
                        println!(
                            "{}",
                            talent_score::output::format_summary(breakdown, use_colors)
                        );
                    }
                }
                Err(e) => {
                    eprintln!("Form error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            }
        }
        Commands::Formulas | Commands::Init => {}
    }

    std::process::exit(EXIT_SUCCESS);
}

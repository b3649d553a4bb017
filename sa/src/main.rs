//! SkillsAssess - CV skills assessment
//!
//! CLI entry point for assessing a CV against a role or identifying which
//! roles it fits.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, error, info};

use skillsassess::analyzer::Analyzer;
use skillsassess::cli::{Cli, Command};
use skillsassess::config::Config;
use skillsassess::error::AssessError;
use skillsassess::llm::create_client;
use skillsassess::{display, output, roles};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Can't log here yet, logging isn't initialized
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skillsassess")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("skillsassess.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(model = %config.llm.model, "SkillsAssess loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Analyze {
            role,
            cv_file,
            output,
            logging,
        } => {
            config.llm_log.enabled |= logging;
            cmd_analyze(&config, &role, &cv_file, output.as_deref()).await
        }
        Command::IdentifyRoles {
            cv_file,
            output,
            logging,
        } => {
            config.llm_log.enabled |= logging;
            cmd_identify_roles(&config, &cv_file, output.as_deref()).await
        }
        Command::Roles => cmd_roles(),
        Command::Extract { prompt_file } => cmd_extract(&prompt_file),
        Command::Clean { file } => cmd_clean(file.as_deref()),
    }
}

/// Print an error line and exit with status 1
fn fail(message: &str) -> ! {
    eprintln!("{}", format!("❌ Error: {}", message).red());
    std::process::exit(1);
}

fn check_cv(cv_file: &Path) {
    if !cv_file.is_file() {
        fail(&format!("CV file '{}' not found", cv_file.display()));
    }
}

fn check_api_key(config: &Config) {
    if config.validate().is_err() {
        eprintln!(
            "{}",
            format!("❌ Error: {} environment variable not set", config.llm.api_key_env).red()
        );
        eprintln!("{}", "Add your key to the .env file:".yellow());
        eprintln!("{}=your-key-here", config.llm.api_key_env);
        std::process::exit(1);
    }
}

fn report_failure(context: &str, err: &AssessError) -> ! {
    error!(error = %err, "{}", context);
    if let Some(raw) = err.raw_response() {
        debug!(raw_len = raw.len(), "report_failure: undecodable reply");
        eprintln!("{}", "❌ Error: Failed to parse LLM response as JSON".red());
    } else {
        eprintln!("{}", format!("❌ Error: {}", context).red());
    }
    eprintln!("{}", format!("Error: {}", err).red());
    if let AssessError::Llm(e) = err
        && e.is_transient()
    {
        eprintln!("{}", "The API may be temporarily unavailable; try again shortly.".yellow());
    }
    std::process::exit(1);
}

fn analyzer_for(config: &Config) -> Result<Analyzer> {
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let base = std::env::current_dir().context("Failed to read current directory")?;
    Ok(Analyzer::from_config(llm, config, base))
}

fn save(result: &prompttext::StructuredResult, output: &str, config: &Config) -> Result<()> {
    let path = output::resolve_output_path(output, &config.paths.reports_dir);
    output::save_json(result, &path)?;
    println!("\n{}", format!("💾 Saved to: {}", path.display()).green());
    Ok(())
}

async fn cmd_analyze(config: &Config, role: &str, cv_file: &Path, output: Option<&str>) -> Result<()> {
    debug!(%role, cv = %cv_file.display(), ?output, "cmd_analyze: called");
    if !roles::is_valid(role) {
        eprintln!("{}", format!("❌ Error: Invalid role '{}'", role).red());
        eprintln!("{}", format!("Valid roles: {}", roles::valid_roles().join(", ")).yellow());
        std::process::exit(1);
    }
    check_cv(cv_file);
    check_api_key(config);

    let analyzer = analyzer_for(config)?;
    println!("{}", format!("📄 Loading CV: {}", cv_file.display()).cyan());
    println!("{}", format!("🔍 Analyzing for role: {}", role).cyan());
    println!("{}", "⏳ This may take a moment...".yellow());

    let assessment = match analyzer.analyze(role, cv_file).await {
        Ok(assessment) => assessment,
        Err(e) => report_failure("Assessment failed", &e),
    };

    print!("{}", display::render_assessment(&assessment));
    if let Some(output) = output {
        save(&assessment.result, output, config)?;
    }
    Ok(())
}

async fn cmd_identify_roles(config: &Config, cv_file: &Path, output: Option<&str>) -> Result<()> {
    debug!(cv = %cv_file.display(), ?output, "cmd_identify_roles: called");
    check_cv(cv_file);
    check_api_key(config);

    let analyzer = analyzer_for(config)?;
    println!("{}", format!("📄 Loading CV: {}", cv_file.display()).cyan());
    println!("{}", "🔍 Analyzing CV to identify relevant roles...".cyan());
    println!("{}", "⏳ This may take a moment...".yellow());

    let result = match analyzer.identify_roles(cv_file).await {
        Ok(result) => result,
        Err(e) => report_failure("Failed to identify roles", &e),
    };

    print!("{}", display::render_roles(&result));
    if let Some(output) = output {
        save(&result, output, config)?;
    }
    Ok(())
}

fn cmd_roles() -> Result<()> {
    debug!("cmd_roles: called");
    for (id, config) in roles::all() {
        println!("{} {} (max tokens: {})", format!("{:<20}", id).cyan(), config.title, config.max_tokens);
    }
    Ok(())
}

fn cmd_extract(prompt_file: &Path) -> Result<()> {
    debug!(path = %prompt_file.display(), "cmd_extract: called");
    let document =
        fs::read_to_string(prompt_file).with_context(|| format!("Failed to read {}", prompt_file.display()))?;
    let template = prompttext::extract(&document).with_context(|| format!("In {}", prompt_file.display()))?;
    println!("{}", template);
    Ok(())
}

fn cmd_clean(file: Option<&Path>) -> Result<()> {
    debug!(?file, "cmd_clean: called");
    let raw = match file {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let cleaned = prompttext::clean(raw.as_str());
    println!("{}", cleaned);

    if let Err(e) = serde_json::from_str::<serde_json::Value>(&cleaned) {
        eprintln!("{}", format!("⚠️  Recovered text is not valid JSON: {}", e).yellow());
        std::process::exit(1);
    }
    Ok(())
}

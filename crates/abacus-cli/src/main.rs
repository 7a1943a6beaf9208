mod config;
mod registry;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use abacus_core::{
    Error as CoreError, MAX_ENUMERATED_DIGITS, QuestionSettings, Scenario, ValidationIssue,
    ValidationReport, enumerate_valid_rule_strings, normalize_settings, parse_rule_set,
};
use abacus_generate::rng::fresh_seed;
use abacus_generate::{
    GenerationError, WorksheetEngine, WorksheetOptions, generate_question, rng_from_seed,
};
use registry::{
    RunContext, init_console_logging, init_run_logging, start_run, write_answers, write_report,
    write_worksheet,
};

/// Exit status for a rule string that does not parse.
const EXIT_INVALID_RULE: u8 = 2;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("settings error: {0}")]
    Core(#[from] CoreError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "abacus", version, about = "Abacus practice question generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print questions for a settings file.
    Generate(GenerateArgs),
    /// Generate a worksheet into a new run directory.
    Worksheet(WorksheetArgs),
    /// Inspect multiplication rule strings.
    #[command(subcommand)]
    Rules(RulesCommand),
    /// Print the JSON Schema of settings files.
    Schema,
    /// List add/subtract scenarios.
    Scenarios,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Settings file (.toml or .json).
    #[arg(long, value_name = "FILE")]
    config: PathBuf,
    /// Overrides the seed from the settings file.
    #[arg(long)]
    seed: Option<String>,
    /// Number of questions.
    #[arg(long, default_value_t = 1)]
    count: u32,
    /// Print each question as a JSON line.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Append the expected answer to each printed question.
    #[arg(long, default_value_t = false)]
    answers: bool,
}

#[derive(Args, Debug)]
struct WorksheetArgs {
    /// Settings file (.toml or .json).
    #[arg(long, value_name = "FILE")]
    config: PathBuf,
    /// Overrides the seed from the settings file.
    #[arg(long)]
    seed: Option<String>,
    /// Number of questions on the worksheet.
    #[arg(long, default_value_t = 20)]
    count: u32,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
    /// Regenerate questions that already appear on the worksheet.
    #[arg(long, default_value_t = false)]
    unique: bool,
    /// Draws per question slot when --unique is set.
    #[arg(long, default_value_t = 50)]
    max_attempts: u32,
}

#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// Parse a rule string such as "ss + sd".
    Parse {
        #[arg(value_name = "RULE")]
        rule: String,
    },
    /// List every valid rule string for the given digit counts.
    List {
        /// Multiplicand digits.
        #[arg(long)]
        term1: usize,
        /// Multiplier digits.
        #[arg(long)]
        term2: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    match cli.command {
        Command::Generate(args) => {
            init_console_logging()?;
            run_generate(args)?;
        }
        Command::Worksheet(args) => run_worksheet(args)?,
        Command::Rules(RulesCommand::Parse { rule }) => return Ok(run_rules_parse(&rule)),
        Command::Rules(RulesCommand::List { term1, term2 }) => run_rules_list(term1, term2)?,
        Command::Schema => {
            let schema = schemars::schema_for!(QuestionSettings);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Command::Scenarios => {
            for scenario in Scenario::all() {
                println!("{:>2}  {}", scenario.id(), scenario.label());
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Load, override the seed and normalize. Repairs come back as issues so
/// the caller decides where to report them.
fn resolve_settings(
    path: &Path,
    seed: Option<String>,
) -> Result<(QuestionSettings, Vec<ValidationIssue>), CliError> {
    let mut settings = config::load_settings(path)?;
    if seed.is_some() {
        settings.seed = seed;
    }

    let normalized = normalize_settings(&settings)
        .map_err(|report| CliError::InvalidConfig(describe_report(&report)))?;
    Ok((normalized.settings, normalized.warnings))
}

fn describe_report(report: &ValidationReport) -> String {
    report
        .errors
        .iter()
        .map(|issue| match &issue.hint {
            Some(hint) => format!("{} [{}]: {} ({hint})", issue.path, issue.code, issue.message),
            None => format!("{} [{}]: {}", issue.path, issue.code, issue.message),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn log_normalization(warnings: &[ValidationIssue]) {
    for issue in warnings {
        warn!(code = %issue.code, path = %issue.path, "{}", issue.message);
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let (settings, warnings) = resolve_settings(&args.config, args.seed)?;
    log_normalization(&warnings);

    let seed = settings.seed.clone().unwrap_or_else(fresh_seed);
    let mut rng = rng_from_seed(&seed);
    info!(seed = %seed, count = args.count, "generating questions");

    for _ in 0..args.count {
        let question = generate_question(&settings, &mut rng)?;
        if args.json {
            println!("{}", serde_json::to_string(&question)?);
        } else if args.answers {
            println!("{} {}", question.question_string, question.expected_answer);
        } else {
            println!("{}", question.question_string);
        }
    }
    Ok(())
}

fn run_worksheet(args: WorksheetArgs) -> Result<(), CliError> {
    let (mut settings, warnings) = resolve_settings(&args.config, args.seed)?;
    // Record the seed up front so config.json can replay the run.
    let seed = settings.seed.get_or_insert_with(fresh_seed).clone();

    let options = WorksheetOptions {
        count: args.count,
        unique: args.unique,
        max_attempts_question: args.max_attempts,
    };

    let run_id = Uuid::new_v4().to_string();
    let ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        run_dir: args.run_dir,
        config_path: args.config,
        settings: settings.clone(),
        options: options.clone(),
        normalization_warnings: warnings.clone(),
    };

    let paths = start_run(&ctx)?;
    init_run_logging(&paths.logs_path)?;

    info!(event = "run_started", run_id = %run_id, seed = %seed);
    log_normalization(&warnings);

    let worksheet = match WorksheetEngine::new(options).run(&settings) {
        Ok(worksheet) => worksheet,
        Err(GenerationError::Failed(report)) => {
            write_report(&paths, &report)?;
            info!(event = "run_finished", status = "failed", path = %paths.report_path.display());
            return Err(CliError::Generation(GenerationError::Failed(report)));
        }
        Err(err) => return Err(err.into()),
    };

    write_worksheet(&paths, &worksheet)?;
    write_answers(&paths, &worksheet)?;
    info!(
        event = "run_finished",
        status = "success",
        worksheet_id = %worksheet.id,
        fallbacks = worksheet.report.fallback_count,
        duration_ms = worksheet.report.duration_ms
    );

    println!("worksheet {} written to {}", worksheet.id, paths.root.display());
    Ok(())
}

fn run_rules_parse(rule: &str) -> ExitCode {
    let Some(rules) = parse_rule_set(rule) else {
        eprintln!("invalid rule string: '{rule}'");
        return ExitCode::from(EXIT_INVALID_RULE);
    };

    println!("rule:         {rules}");
    println!("parts:        {}", rules.parts().join(", "));
    println!("checked:      {}", rules.checked_parts().join(", "));
    println!("term1 digits: {}", rules.term1_digits());
    println!("term2 digits: {}", rules.term2_digits());
    println!(
        "zero pattern: {:0width$b}",
        rules.zero_pattern(),
        width = rules.term1_digits()
    );
    ExitCode::SUCCESS
}

fn run_rules_list(term1: usize, term2: usize) -> Result<(), CliError> {
    let range = 1..=MAX_ENUMERATED_DIGITS;
    if !range.contains(&term1) || !range.contains(&term2) {
        return Err(CliError::InvalidConfig(format!(
            "rule enumeration supports 1..={MAX_ENUMERATED_DIGITS} digits per term"
        )));
    }

    for rule in enumerate_valid_rule_strings(term1, term2) {
        println!("{rule}");
    }
    Ok(())
}

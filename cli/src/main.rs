mod output;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use field_recognizer::{PhraseConfig, Recognizer, RecognizerContext, build_recognizer, load_field};
use field_recognizer_core::{TermMatch, Value, best_match, validate_field};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use output::{MatchReport, MatchRow, OutputFormat, format_report};

#[derive(Debug, Parser)]
#[command(name = "recognize-field")]
#[command(about = "Recognize free-text answers to form fields")]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Log recognizer decisions to stderr (overrides RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every candidate match for an input.
    Match(MatchArgs),
    /// Print the rendered help text for a field.
    Help(HelpArgs),
    /// Validate one or more field definition YAML files.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct FieldArgs {
    /// Field definition YAML file.
    #[arg(long)]
    field: PathBuf,
    /// Phrase configuration YAML file (English phrases when omitted).
    #[arg(long)]
    phrases: Option<PathBuf>,
    /// Current value of the field, written as the user would type it.
    #[arg(long)]
    default: Option<String>,
}

#[derive(Debug, Args)]
struct MatchArgs {
    #[command(flatten)]
    field: FieldArgs,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Text to recognize.
    input: String,
}

#[derive(Debug, Args)]
struct HelpArgs {
    #[command(flatten)]
    field: FieldArgs,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Field definition YAML files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Phrase configuration used to compile term patterns.
    #[arg(long)]
    phrases: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Match(args) => run_match(args),
        Command::Help(args) => run_help(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ---------------------------------------------------------------------------
// match / help
// ---------------------------------------------------------------------------

fn run_match(args: MatchArgs) -> Result<(), String> {
    let (recognizer, default) = load_recognizer(&args.field)?;
    let input = args.input.as_str();

    let found: Vec<TermMatch> = recognizer.matches(input, default.as_ref()).collect();
    let best = best_match(found.iter().cloned()).and_then(|b| found.iter().position(|m| *m == b));

    let report = MatchReport {
        field: recognizer.field().to_string(),
        input: input.to_string(),
        matches: found.iter().map(|m| MatchRow::new(m, input)).collect(),
        best,
        mentions: recognizer
            .field_mentions(input)
            .iter()
            .map(|m| MatchRow::new(m, input))
            .collect(),
    };

    let rendered = format_report(&report, args.format)?;
    println!("{}", rendered.trim_end());
    Ok(())
}

fn run_help(args: HelpArgs) -> Result<(), String> {
    let (recognizer, default) = load_recognizer(&args.field)?;
    println!("{}", recognizer.help(default.as_ref()));
    Ok(())
}

/// Builds the recognizer and resolves `--default` by recognizing it against
/// the same field.
fn load_recognizer(args: &FieldArgs) -> Result<(Recognizer, Option<Value>), String> {
    let context = load_context(args.phrases.as_deref())?;
    let field = load_field(&args.field)
        .map_err(|err| format!("Failed to load '{}': {err}", args.field.display()))?;
    let recognizer = build_recognizer(&field, &context).map_err(|err| err.to_string())?;

    let default = match &args.default {
        Some(text) => Some(resolve_default(&recognizer, text)?),
        None => None,
    };
    debug!(field = %recognizer.field(), default = ?default, "Recognizer ready");
    Ok((recognizer, default))
}

fn load_context(phrases: Option<&Path>) -> Result<RecognizerContext, String> {
    match phrases {
        Some(path) => {
            let phrases = PhraseConfig::load(path)
                .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?;
            RecognizerContext::new(phrases).map_err(|err| err.to_string())
        }
        None => Ok(RecognizerContext::default()),
    }
}

fn resolve_default(recognizer: &Recognizer, text: &str) -> Result<Value, String> {
    best_match(recognizer.matches(text, None))
        .and_then(|m| m.value)
        .ok_or_else(|| {
            format!(
                "Default '{text}' is not a value of field '{}'",
                recognizer.field()
            )
        })
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let context = load_context(args.phrases.as_deref())?;
    let mut invalid = 0usize;

    for path in &args.inputs {
        let problems = validate_file(path, &context);
        if problems.is_empty() {
            continue;
        }
        invalid += 1;
        eprintln!("{}:", path.display());
        for problem in problems {
            eprintln!("  {problem}");
        }
    }

    if invalid > 0 {
        return Err(format!(
            "{invalid} of {} field definition(s) are invalid",
            args.inputs.len()
        ));
    }
    println!("Validated {} field definition(s).", args.inputs.len());
    Ok(())
}

fn validate_file(path: &Path, context: &RecognizerContext) -> Vec<String> {
    let field = match load_field(path) {
        Ok(field) => field,
        Err(err) => return vec![err.to_string()],
    };

    let problems: Vec<String> = validate_field(&field)
        .iter()
        .map(ToString::to_string)
        .collect();
    if !problems.is_empty() {
        return problems;
    }

    // Structural checks pass; compiling catches malformed terms.
    match build_recognizer(&field, context) {
        Ok(_) => Vec::new(),
        Err(err) => vec![err.to_string()],
    }
}

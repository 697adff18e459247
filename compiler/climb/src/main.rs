use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use climb::batch::{run_batch, summarize};
use climb::generate::{from_definition, random_expression, RandomSpec};
use climb::report::{self, OutputMode, ReportOptions};
use climb::{analyze, AnalysisOptions};
use climb_ast::{from_nested_list, NestedList};
use climb_lexer::{tokenize, BindingPowerTable};
use climb_oracle::check;
use climb_parser::{ParseStrategy, ParserConfig};
use log::{debug, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum StrategyArg {
    /// Loop with an explicit operator stack
    #[default]
    Stack,
    /// Recursive precedence climbing
    Recursive,
}

impl From<StrategyArg> for ParseStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Stack => ParseStrategy::Stack,
            StrategyArg::Recursive => ParseStrategy::Recursive,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "climb",
    version,
    about = "Binding-power expression parser with a parse-tree correctness oracle",
    long_about = "climb parses expressions with operators defined only by their left and right\n\
        binding powers, then checks the result against a grammar-free oracle.\n\n\
        EXAMPLES:\n\
        \n  climb parse '5 + 3 ! * 4'             Parse with the standard operators\n\
        \n  climb --all parse 'a + b * c'         Also check every possible tree\n\
        \n  climb define '6 7, _ 9, 8 8'          Parse an expression over generated operators\n\
        \n  climb random --length 8 --seed 3      Parse a random expression\n\
        \n  climb -qq batch exprs.txt             Check one expression per line"
)]
struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Shorter output: -q prints one line, -qq only + or -
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    quiet: u8,

    /// JSON binding-power table to use instead of the standard operators
    #[arg(long, global = true, value_name = "FILE")]
    table: Option<PathBuf>,

    /// Parser encoding
    #[arg(long, global = true, value_enum, default_value_t)]
    strategy: StrategyArg,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t)]
    format: OutputMode,

    /// Check every possible parse tree as well
    #[arg(long, global = true)]
    all: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse and check an expression
    Parse(ParseArgs),

    /// Generate operators from binding-power pairs and parse an expression over them
    #[command(long_about = "Each comma-separated pair 'lbp rbp' defines an operator \
        named (lbp;rbp).\n\
        '_ rbp' defines a prefix operator and 'lbp _' a postfix operator.\n\
        '6 7, _ 9, 8 8' parses A0 (6;7) (_;9) A2 (8;8) A3.")]
    Define(DefineArgs),

    /// Generate random operators and parse a random expression over them
    Random(RandomArgs),

    /// Check a given tree, stored as a JSON nested list, against an expression
    Check(CheckArgs),

    /// Parse and check one expression per line, in parallel
    Batch(BatchArgs),
}

#[derive(Debug, Args, Clone)]
struct ParseArgs {
    /// Expression; several words are joined with spaces
    #[arg(required = true, value_name = "EXPR")]
    expression: Vec<String>,
}

#[derive(Debug, Args, Clone)]
struct DefineArgs {
    /// Comma-separated binding-power pairs
    #[arg(value_name = "PAIRS")]
    definition: String,
}

#[derive(Debug, Args, Clone)]
struct RandomArgs {
    /// Number of operators to create
    #[arg(long, default_value_t = 6)]
    operators: usize,

    /// Number of distinct binding-power values
    #[arg(long, default_value_t = 6)]
    powers: usize,

    /// Number of operators in the expression
    #[arg(long, default_value_t = 6)]
    length: usize,

    /// Seed for a reproducible expression
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Args, Clone)]
struct CheckArgs {
    /// JSON file holding the tree as nested arrays of strings
    #[arg(long, value_name = "FILE")]
    tree: PathBuf,

    /// Expression the tree should be the parse of
    #[arg(required = true, value_name = "EXPR")]
    expression: Vec<String>,
}

#[derive(Debug, Args, Clone)]
struct BatchArgs {
    /// Input file (reads from stdin if not provided)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .try_init();
}

fn load_table(path: Option<&Path>) -> Result<BindingPowerTable> {
    let Some(path) = path else {
        return Ok(BindingPowerTable::standard());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read table '{}'", path.display()))?;
    let table = BindingPowerTable::from_json(&text)
        .with_context(|| format!("invalid binding-power table '{}'", path.display()))?;
    debug!("loaded {} operators from {}", table.len(), path.display());
    Ok(table)
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read from stdin")?;
            Ok(buf)
        }
    }
}

impl Cli {
    fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            parser: ParserConfig {
                strategy: self.strategy.into(),
                ..ParserConfig::default()
            },
            candidates: self.all,
        }
    }

    fn report_options(&self) -> ReportOptions {
        ReportOptions {
            quiet: self.quiet,
            show_ranges: self.verbose > 0,
            mode: self.format,
        }
    }
}

/// Parses `source`, prints the report and returns the exit status.
fn parse_and_report(cli: &Cli, source: &str, table: &BindingPowerTable) -> Result<i32> {
    let analysis = match analyze(source, table, &cli.analysis_options()) {
        Ok(analysis) => analysis,
        Err(err) => {
            eprintln!("{}", err.render());
            return Ok(1);
        }
    };
    println!("{}", report::render(&analysis, &cli.report_options(), cli.all)?);
    Ok(if analysis.is_correct() { 0 } else { 1 })
}

fn run_check(cli: &Cli, args: &CheckArgs, table: &BindingPowerTable) -> Result<i32> {
    let text = fs::read_to_string(&args.tree)
        .with_context(|| format!("failed to read tree '{}'", args.tree.display()))?;
    let list: NestedList = serde_json::from_str(&text)
        .with_context(|| format!("'{}' is not a nested list", args.tree.display()))?;
    let tree = from_nested_list(&list, table)?;
    let tokens = tokenize(&args.expression.join(" "), table)?;
    let verdict = check(&tree, &tokens, table);

    match (cli.format, cli.quiet) {
        (OutputMode::Json, _) => println!("{}", serde_json::to_string_pretty(&verdict)?),
        (OutputMode::Text, 0 | 1) => {
            println!("{}", tree.to_stripped_sexpr());
            println!("Weight correct: {}", verdict.weight_correct);
            println!("Range correct: {}", verdict.range_correct);
            println!("Parse of input: {}", verdict.is_parse_of_input);
        }
        (OutputMode::Text, _) => println!("{}", if verdict.is_correct() { "+" } else { "-" }),
    }
    Ok(if verdict.is_correct() { 0 } else { 1 })
}

fn run_batch_command(cli: &Cli, args: &BatchArgs, table: &BindingPowerTable) -> Result<i32> {
    let input = read_input(args.input.as_deref())?;
    let outcomes = run_batch(&input, table, &cli.analysis_options());
    let summary = summarize(&outcomes);

    if cli.format == OutputMode::Json {
        let json = serde_json::json!({ "lines": outcomes, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        for outcome in &outcomes {
            let mark = if outcome.correct { "+" } else { "-" };
            match (cli.quiet, &outcome.sexpr, &outcome.error) {
                (2.., _, _) => println!("{mark}"),
                (_, _, Some(error)) => println!("{mark} {}: {error}", outcome.line),
                (_, Some(sexpr), None) => println!("{mark} {}: {sexpr}", outcome.line),
                (_, None, None) => println!("{mark} {}", outcome.line),
            }
        }
        if cli.quiet == 0 {
            println!(
                "{} expressions: {} correct, {} incorrect, {} errors",
                summary.total, summary.correct, summary.incorrect, summary.errors
            );
        }
    }
    Ok(if summary.is_success() { 0 } else { 1 })
}

fn run(cli: &Cli) -> Result<i32> {
    match &cli.command {
        Command::Parse(args) => {
            let table = load_table(cli.table.as_deref())?;
            parse_and_report(cli, &args.expression.join(" "), &table)
        }
        Command::Define(args) => {
            let generated = from_definition(&args.definition)?;
            parse_and_report(cli, &generated.expression, &generated.table)
        }
        Command::Random(args) => {
            let spec = RandomSpec {
                operators: args.operators,
                powers: args.powers,
                length: args.length,
            };
            let mut rng = match args.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let generated = random_expression(&spec, &mut rng)?;
            if cli.quiet == 0 && cli.format == OutputMode::Text {
                println!("Random expression: {}\n", generated.expression);
            }
            parse_and_report(cli, &generated.expression, &generated.table)
        }
        Command::Check(args) => {
            let table = load_table(cli.table.as_deref())?;
            run_check(cli, args, &table)
        }
        Command::Batch(args) => {
            let table = load_table(cli.table.as_deref())?;
            run_batch_command(cli, args, &table)
        }
    }
}

fn run_cli() -> i32 {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    }
}

fn main() {
    std::process::exit(run_cli());
}

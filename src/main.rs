use clap::{Args, Parser as ClapParser, Subcommand};
use rsql_filter::cli::{self, CliError, CompileOptions, FilterOptions};
use serde::Serialize;
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

#[derive(ClapParser)]
#[command(name = "rsql")]
#[command(about = "rsql - Compile RSQL/FIQL filter expressions into backend-neutral predicates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CompileArgs {
    /// The filter expression
    query: String,

    /// Entity schema (JSON file)
    #[arg(short, long)]
    schema: PathBuf,

    /// Compiler configuration (JSON file)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Suppress duplicate rows produced by to-many joins
    #[arg(short, long)]
    distinct: bool,

    /// Pretty-print the output
    #[arg(short, long)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the syntax of a filter expression
    Check {
        /// The filter expression
        query: String,
    },

    /// Compile a filter expression against a schema
    Compile(CompileArgs),

    /// Apply a filter expression to a JSON array of records
    Filter {
        #[command(flatten)]
        args: CompileArgs,

        /// JSON records file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'rsql docs' to list categories)
        category: String,
    },
}

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { query } => cli::execute_check(&query).map(|()| {
            println!("Syntax is valid");
        }),
        Commands::Compile(args) => run_compile(args),
        Commands::Filter { args, input } => run_filter(args, input),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn compile_options(args: &CompileArgs) -> Result<CompileOptions, CliError> {
    Ok(CompileOptions {
        query: args.query.clone(),
        schema: fs::read_to_string(&args.schema)?,
        config: args.config.as_ref().map(fs::read_to_string).transpose()?,
        distinct: args.distinct,
    })
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }?;
    println!("{}", json);
    Ok(())
}

fn run_compile(args: CompileArgs) -> Result<(), CliError> {
    let output = cli::execute_compile(&compile_options(&args)?)?;
    print_json(&output, args.pretty)
}

fn run_filter(args: CompileArgs, input: Option<PathBuf>) -> Result<(), CliError> {
    let input = match input {
        Some(path) => Some(fs::read_to_string(path)?),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = FilterOptions {
        compile: compile_options(&args)?,
        input,
    };
    let output = cli::execute_filter(&options)?;
    print_json(&output, args.pretty)
}

use callq::ParseOptions;
use callq::cli::{self, CheckOptions, CheckResult, CliError};
use clap::{Parser as ClapParser, Subcommand};
use std::fs;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "callq")]
#[command(about = "callq - Parse call-style filter queries into typed predicates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query and bind it against a schema
    Check {
        /// The query to check
        query: String,

        /// Schema JSON (reads from stdin if neither this nor --schema-file is given)
        #[arg(short, long, conflicts_with = "schema_file")]
        schema: Option<String>,

        /// Path to a schema JSON file
        #[arg(long)]
        schema_file: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't bind
        #[arg(long)]
        syntax_only: bool,

        /// Maximum nesting depth of calls (values above 1024 are clamped)
        #[arg(long, default_value_t = callq::options::DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Maximum query length in bytes
        #[arg(long, default_value_t = callq::options::DEFAULT_MAX_INPUT_LEN)]
        max_input_len: usize,
    },

    /// List the operators
    Operators,

    /// Show the language reference
    Docs,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            query,
            schema,
            schema_file,
            pretty,
            syntax_only,
            max_depth,
            max_input_len,
        } => {
            let limits = ParseOptions {
                max_depth,
                max_input_len,
            };
            run_check(query, schema, schema_file, pretty, syntax_only, limits)
        }
        Commands::Operators => {
            print!("{}", cli::operator_table());
            Ok(())
        }
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
    };

    if let Err(e) = result {
        if !matches!(e, CliError::Diagnostics(_)) {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

fn run_check(
    query: String,
    schema: Option<String>,
    schema_file: Option<String>,
    pretty: bool,
    syntax_only: bool,
    limits: ParseOptions,
) -> Result<(), CliError> {
    let schema = match (schema, schema_file) {
        (Some(s), _) => Some(s),
        (None, Some(path)) => Some(fs::read_to_string(path)?),
        (None, None) if !syntax_only && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        (None, None) => None,
    };

    let options = CheckOptions {
        query,
        schema,
        syntax_only,
        limits,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(output) => {
            if pretty {
                println!("{:#}", output);
            } else {
                println!("{}", output);
            }
        }
        CheckResult::Invalid { messages, .. } => {
            for message in &messages {
                eprintln!("{}", message);
            }
            return Err(CliError::Diagnostics(messages.len()));
        }
    }
    Ok(())
}

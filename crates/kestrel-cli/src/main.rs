use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;

mod commands;
mod config;

/// Kestrel programming language interpreter.
///
/// Kestrel is a small, embeddable scripting language with closures,
/// classes, lists, and exceptions. This CLI runs, checks, and inspects
/// Kestrel programs and hosts an interactive REPL.
///
/// EXAMPLES:
///     kestrel run main.kst         Run a Kestrel program
///     kestrel check main.kst       Report static errors without running
///     kestrel ast main.kst         Dump the parse tree as JSON
///     kestrel repl                 Start interactive REPL
///
/// ENVIRONMENT VARIABLES:
///     KESTREL_HISTORY_FILE  Custom REPL history path
///     KESTREL_NO_HISTORY    Set to '1' to disable REPL history
#[derive(Parser)]
#[command(name = "kestrel")]
#[command(version)]
#[command(propagate_version = true)]
#[command(after_help = "For more information, see: https://github.com/kestrel-script/kestrel")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Kestrel source file
    ///
    /// Executes the file through the full pipeline: lex, parse, fold,
    /// resolve, interpret. If the last statement is a bare expression,
    /// its value is printed when not null.
    ///
    /// EXAMPLES:
    ///     kestrel run main.kst            Run a program
    ///     kestrel run main.kst --no-fold  Skip constant folding
    #[command(visible_alias = "r")]
    Run {
        /// Path to the Kestrel source file
        file: String,
        /// Disable the constant folding pass
        #[arg(long)]
        no_fold: bool,
    },

    /// Check a Kestrel source file without running it
    ///
    /// Reports lex, parse, and resolution errors. Nothing executes, so
    /// the check is safe on untrusted input.
    ///
    /// EXAMPLES:
    ///     kestrel check main.kst       Check for errors
    #[command(visible_alias = "c")]
    Check {
        /// Path to the Kestrel source file
        file: String,
    },

    /// Dump a source file's AST as JSON
    ///
    /// Parses the file and prints the versioned syntax tree as pretty
    /// JSON on stdout, for tooling and front-end debugging.
    ///
    /// EXAMPLES:
    ///     kestrel ast main.kst          Dump the parse tree
    ///     kestrel ast main.kst --fold   Dump the constant-folded tree
    Ast {
        /// Path to the Kestrel source file
        file: String,
        /// Apply constant folding before dumping
        #[arg(long)]
        fold: bool,
    },

    /// Start an interactive REPL
    ///
    /// Opens a Read-Eval-Print Loop with line editing and history.
    /// Definitions persist across lines; a failed line leaves earlier
    /// definitions intact.
    ///
    /// REPL COMMANDS:
    ///     :help, :h      Show help
    ///     :quit, :q      Exit REPL
    ///     :reset         Clear all definitions
    ///
    /// EXAMPLES:
    ///     kestrel repl                  Start the REPL
    ///     kestrel repl --no-history     Skip history load/save
    Repl {
        /// Disable history load/save for this session
        #[arg(long, env = "KESTREL_NO_HISTORY")]
        no_history: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::Config::from_env();

    let exit_code = match cli.command {
        Commands::Run { file, no_fold } => commands::run::run(&file, no_fold)?,
        Commands::Check { file } => commands::check::run(&file)?,
        Commands::Ast { file, fold } => commands::ast::run(&file, fold)?,
        Commands::Repl { no_history } => commands::repl::run(no_history, &config)?,
    };

    if exit_code != 0 {
        process::exit(exit_code);
    }
    Ok(())
}

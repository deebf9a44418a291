use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use koi::ast_printer::AstPrinter;
use koi::parser::Parser;
use koi::scanner::Scanner;
use koi::{Diagnostics, Koi};

#[derive(ClapParser, Debug)]
#[command(version, about = "Koi language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to koi.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print one JSON object per token
        #[arg(long)]
        json: bool,
    },

    /// Parses a file and prints the AST of each statement
    Parse { filename: PathBuf },

    /// Runs a file as a Koi program
    Run { filename: PathBuf },

    /// Starts an interactive prompt (the default)
    Repl,
}

/// Reads the contents of a file as UTF-8 text.
fn read_file(filename: &PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = String::new();

    let bytes = reader
        .read_to_string(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(buf)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("koi.log").context("Failed to create koi.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("koi::").unwrap_or(module);
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to koi.log");
    Ok(())
}

fn tokenize(filename: &PathBuf, json: bool) -> Result<()> {
    let source = read_file(filename)?;
    let mut failed = false;

    for result in Scanner::new(&source) {
        match result {
            Ok(token) if json => println!("{}", serde_json::to_string(&token)?),
            Ok(token) => println!("{}", token),
            Err(e) => {
                failed = true;
                eprintln!("{}", e);
            }
        }
    }

    if failed {
        debug!("Tokenization failed, exiting with code 65");
        process::exit(65);
    }

    Ok(())
}

fn parse(filename: &PathBuf) -> Result<()> {
    let source = read_file(filename)?;
    let mut diagnostics = Diagnostics::new();

    let tokens = Scanner::new(&source).scan_tokens(&mut diagnostics);
    let statements = Parser::new(tokens, &mut diagnostics).parse();

    if diagnostics.has_errors() {
        for message in diagnostics.messages() {
            eprintln!("{}", message);
        }
        process::exit(65);
    }

    let printer = AstPrinter;
    for stmt in &statements {
        println!("{}", printer.print_stmt(stmt));
    }

    Ok(())
}

fn run(filename: &PathBuf) -> Result<()> {
    let source = read_file(filename)?;
    let mut koi = Koi::new();

    if let Err(e) = koi.run(&source) {
        eprintln!("{}", e);
        process::exit(e.exit_code());
    }

    info!("Program executed successfully");
    Ok(())
}

fn repl() -> Result<()> {
    println!("Koi v{}", env!("CARGO_PKG_VERSION"));
    println!("Press Ctrl+D to exit");

    let mut koi = Koi::new();
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        // Lock per line so `input()` can read stdin while a line runs.
        line.clear();
        let bytes = stdin
            .read_line(&mut line)
            .context("Failed to read from stdin")?;

        if bytes == 0 {
            println!();
            break;
        }

        // Errors are reported and the session carries on.
        if let Err(e) = koi.run(&line) {
            eprintln!("{}", e);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match &args.commands {
        Some(Commands::Tokenize { filename, json }) => tokenize(filename, *json),
        Some(Commands::Parse { filename }) => parse(filename),
        Some(Commands::Run { filename }) => run(filename),
        Some(Commands::Repl) | None => repl(),
    }
}

use bfrun::interpreter::{self, InterpreterError, USAGE_EXIT_CODE};
use bfrun::logging;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "bfrun")]
#[command(version)]
#[command(about = "Brainfuck interpreter with a bounds-checked 30,000 cell tape")]
struct Args {
    /// The Brainfuck source file to execute
    #[arg(required = true)]
    file: PathBuf,

    /// Log more to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(USAGE_EXIT_CODE);
        }
    };

    logging::init_logging(args.verbose);

    // Read source file as raw bytes; every byte is one instruction
    let source = match fs::read(&args.file) {
        Ok(s) => s,
        Err(source) => fail(InterpreterError::FileOpen {
            path: args.file.clone(),
            source,
        }),
    };

    debug!(bytes = source.len(), path = %args.file.display(), "loaded source");

    if let Err(e) = interpreter::run(&source) {
        fail(e);
    }
}

fn fail(err: InterpreterError) -> ! {
    eprintln!("bfrun: {}", err);
    process::exit(err.exit_code());
}

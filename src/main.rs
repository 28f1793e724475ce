use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::{fs, process, thread};

use clap::Parser as ClapParser;
use log::LevelFilter;

use rusty_pas::evaluator::{Evaluator, Object};
use rusty_pas::frontend::ast::Program;
use rusty_pas::frontend::{Parser, ParserError};

const PROMPT: &str = ">> ";
const INTERPRETER_STACK_SIZE: usize = 64 * 1024 * 1024;

#[derive(ClapParser, Debug)]
#[clap(name = "rpas", version, about = "Interpreter for a small Pascal-like language")]
struct Cli {
    /// Script to run. Starts the interactive shell when omitted.
    #[clap(parse(from_os_str))]
    script: Option<PathBuf>,

    /// Log more (-v for debug, -vv for trace)
    #[clap(short, long, parse(from_occurrences))]
    verbose: u64,

    /// Print the parsed program instead of evaluating it
    #[clap(long)]
    print_ast: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("could not set up logging: {}", e);
        process::exit(70);
    }

    // Recursion up to `MAX_CALL_DEPTH` must fit on this thread's stack.
    let worker = thread::Builder::new()
        .name("rpas".to_owned())
        .stack_size(INTERPRETER_STACK_SIZE)
        .spawn(move || match &cli.script {
            Some(path) => run_file(path, cli.print_ast),
            None => run_prompt(cli.print_ast),
        });

    let finished = match worker {
        Ok(handle) => handle.join().is_ok(),
        Err(e) => {
            eprintln!("could not start interpreter thread: {}", e);
            false
        }
    };
    if !finished {
        process::exit(70);
    }
}

fn init_logging(verbosity: u64) -> Result<(), fern::InitError> {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] [{}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()?;

    Ok(())
}

fn run_prompt(print_ast: bool) {
    let mut evaluator = Evaluator::new();
    let stdin = io::stdin();

    loop {
        print!("{}", PROMPT);
        if io::stdout().flush().is_err() {
            return;
        }

        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) => return,
            Ok(_) => {}
            Err(e) => {
                eprintln!("could not read input: {}", e);
                process::exit(74);
            }
        }

        let program = match parse(&line) {
            Ok(program) => program,
            Err(errors) => {
                report_errors(&errors);
                continue;
            }
        };

        if print_ast {
            println!("{}", program);
        } else {
            run(&mut evaluator, &program);
        }
    }
}

fn run_file(path: &Path, print_ast: bool) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("could not read {}: {}", path.display(), e);
            process::exit(74);
        }
    };

    let program = match parse(&source) {
        Ok(program) => program,
        Err(errors) => {
            report_errors(&errors);
            process::exit(65);
        }
    };

    if print_ast {
        println!("{}", program);
        return;
    }

    let mut evaluator = Evaluator::new();
    if !run(&mut evaluator, &program) {
        process::exit(70);
    }
}

fn parse(source: &str) -> Result<Program, Vec<ParserError>> {
    Parser::from_source(source).parse()
}

/// Prints every produced value. Returns false if evaluation ended on an error.
fn run(evaluator: &mut Evaluator, program: &Program) -> bool {
    let values = evaluator.eval_each(program);
    for value in values.iter() {
        println!("{}", value.inspect());
    }

    !values.last().map_or(false, Object::is_error)
}

fn report_errors(errors: &[ParserError]) {
    for error in errors.iter() {
        eprintln!("\t{}", error);
    }
}

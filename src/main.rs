//! Command-line front end for the stackvm interpreter
//!
//! Usage:
//!   stackvm run program.bin [--debug] [--json] [--disasm]
//!   stackvm exec "08 06 05 68 60 ac"
//!   stackvm disasm program.bin
//!   stackvm asm program.jasm -o program.bin

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use stackvm::bytecode::{asm, disasm};
use stackvm::loader;
use stackvm::runtime::{self, Completion, Executor, Fault, FaultClass, FaultKind, Limits, Termination, Value};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "stackvm", version, about = "Run 32-bit integer stack-machine bytecode")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a bytecode file and execute it
    Run {
        file: PathBuf,
        #[command(flatten)]
        options: RunOptions,
    },
    /// Execute hex-encoded code directly, without a file header
    Exec {
        hex: String,
        #[command(flatten)]
        options: RunOptions,
    },
    /// Print a listing of a bytecode file
    Disasm { file: PathBuf },
    /// Assemble a mnemonic listing into a bytecode file
    Asm {
        source: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RunOptions {
    /// Trace every executed instruction to stderr
    #[arg(long)]
    debug: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Print a listing before executing
    #[arg(long)]
    disasm: bool,

    #[arg(long, default_value_t = runtime::limits::DEFAULT_STACK_CAPACITY)]
    stack_capacity: usize,

    #[arg(long, default_value_t = runtime::limits::DEFAULT_LOCALS_CAPACITY)]
    locals_capacity: usize,
}

impl RunOptions {
    fn limits(&self) -> Limits {
        Limits::default()
            .with_stack_capacity(self.stack_capacity)
            .with_locals_capacity(self.locals_capacity)
    }
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Report {
    Completed {
        value: Value,
        termination: Termination,
        result_code: i32,
    },
    Faulted {
        fault: FaultKind,
        class: FaultClass,
        pc: isize,
        message: String,
        result_code: i32,
    },
}

impl Report {
    fn new(outcome: &Result<Completion, Fault>) -> Self {
        let result_code = runtime::result_code(outcome);
        match outcome {
            Ok(completion) => Report::Completed {
                value: completion.value,
                termination: completion.termination,
                result_code,
            },
            Err(fault) => Report::Faulted {
                fault: fault.kind,
                class: fault.class(),
                pc: fault.pc,
                message: fault.to_string(),
                result_code,
            },
        }
    }
}

fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "stackvm=debug" } else { "warn" }));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(code: &[u8], options: &RunOptions) -> Result<ExitCode, Box<dyn Error>> {
    if options.disasm {
        print!("{}", disasm::disassemble(code));
    }

    let mut executor = Executor::with_limits(options.limits());
    executor.set_debug(options.debug);
    let outcome = executor.execute(code);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&Report::new(&outcome))?);
    } else {
        match &outcome {
            Ok(completion) => println!("returned: {} ({})", completion.value, completion.termination),
            Err(fault) => println!("fault: {fault}"),
        }
    }

    Ok(match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    })
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    match cli.command {
        Command::Run { file, options } => {
            let program = loader::load(&file)?;
            execute(program.code(), &options)
        }
        Command::Exec { hex: input, options } => {
            let digits: String = input.split_whitespace().collect();
            let code = hex::decode(digits)?;
            execute(&code, &options)
        }
        Command::Disasm { file } => {
            let program = loader::load(&file)?;
            print!("{}", disasm::disassemble(program.code()));
            Ok(ExitCode::SUCCESS)
        }
        Command::Asm { source, output } => {
            let text = fs::read_to_string(&source)?;
            let code = asm::assemble(&text)?;
            loader::save(&output, &code)?;
            println!("wrote {} bytes of code to {}", code.len(), output.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let debug = match &cli.command {
        Command::Run { options, .. } | Command::Exec { options, .. } => options.debug,
        _ => false,
    };
    init_logging(debug);
    debug!(?cli, "starting");

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

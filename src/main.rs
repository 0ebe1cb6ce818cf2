//! Garnet CLI: run a script file or evaluate a string.

use std::env;
use std::path::Path;
use std::process;

use garnet::error::GarnetError;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "\
Usage: garnet [options] <file.gr>
       garnet -e <code>

Options:
  -e <code>        Evaluate a string of Garnet code
  --disassemble    Print the compiled instruction listing before running
  --version        Print version
  --help           Print this help";

enum Command {
    Run { file: String },
    Eval { code: String },
}

fn main() {
    let mut args = env::args().skip(1);
    let mut disassemble = false;
    let mut command = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                println!("{}", USAGE);
                return;
            }
            "--version" | "-v" => {
                println!("garnet {}", VERSION);
                return;
            }
            "--disassemble" => disassemble = true,
            "-e" => match args.next() {
                Some(code) => command = Some(Command::Eval { code }),
                None => {
                    eprintln!("garnet: -e requires an argument");
                    process::exit(1);
                }
            },
            file if !file.starts_with('-') => {
                command = Some(Command::Run {
                    file: file.to_string(),
                });
            }
            other => {
                eprintln!("garnet: unknown option '{}'\n{}", other, USAGE);
                process::exit(1);
            }
        }
    }

    let Some(command) = command else {
        eprintln!("{}", USAGE);
        process::exit(1);
    };

    let result = match command {
        Command::Run { file } => {
            if disassemble {
                match std::fs::read_to_string(&file)
                    .map_err(GarnetError::from)
                    .and_then(|source| garnet::compile(&source, &file))
                {
                    Ok(unit) => {
                        print!("{}", garnet::vm::disassemble(&unit));
                        println!("---");
                    }
                    Err(e) => report(e),
                }
            }
            garnet::run_file(Path::new(&file))
        }
        Command::Eval { code } => {
            if disassemble {
                match garnet::compile(&code, "(eval)") {
                    Ok(unit) => {
                        print!("{}", garnet::vm::disassemble(&unit));
                        println!("---");
                    }
                    Err(e) => report(e),
                }
            }
            garnet::run(&code, "(eval)")
        }
    };

    if let Err(e) = result {
        report(e);
    }
}

fn report(error: GarnetError) -> ! {
    match &error {
        GarnetError::Runtime(e) => {
            let file = e.file.as_deref().unwrap_or("(unknown)");
            eprintln!("{}:{}: {}", file, e.line, e);
        }
        other => eprintln!("{}", other),
    }
    process::exit(1);
}

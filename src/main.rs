mod cli;

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use ascii_byte_stream::Stream;
use ascii_byte_stream::script::Session;
use miette::{NamedSource, Report};
use tracing::Level;
use yansi::Paint;

use self::cli::Args;

fn read_script(path: &str) -> io::Result<String> {
    if path == "-" {
        let mut contents = String::new();
        io::stdin().read_to_string(&mut contents)?;

        Ok(contents)
    } else {
        fs::read_to_string(path)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let script = match read_script(&args.script) {
        Ok(script) => script,

        Err(e) => {
            eprintln!("Could not read the script `{}`: {e}", args.script);
            return ExitCode::from(2);
        }
    };

    let stream = match &args.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(input) => Stream::new(input),

            Err(e) => {
                eprintln!("Could not read the input file `{}`: {e}", path.display());
                return ExitCode::from(2);
            }
        },

        None => Stream::new(""),
    };

    let mut session = Session::new(stream);

    match session.run(&script) {
        Ok(steps) => {
            if !args.quiet {
                for step in steps {
                    println!(
                        "{:>4}: {} => {}",
                        step.line,
                        step.command.bold(),
                        step.outcome,
                    );
                }
            }

            ExitCode::SUCCESS
        }

        Err(e) => {
            let name = if args.script == "-" {
                "<stdin>"
            } else {
                args.script.as_str()
            };
            let report = Report::new(e).with_source_code(NamedSource::new(name, script));
            eprintln!("{report:?}");

            ExitCode::FAILURE
        }
    }
}

//! MOL command-line interpreter.

mod commands;
mod logging;

use commands::{lex_file, parse_file, parse_run_args, run_file};
use mol_diagnostic::ColorMode;

fn main() {
    logging::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: mol run <file.mol> [--no-trace] [--color=<mode>]");
                std::process::exit(1);
            }
            run_with_args(&args[2..]);
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: mol lex <file.mol>");
                std::process::exit(1);
            }
            std::process::exit(lex_file(&args[2], default_color()).code());
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: mol parse <file.mol>");
                std::process::exit(1);
            }
            std::process::exit(parse_file(&args[2], default_color()).code());
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("MOL {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            // A bare `.mol` path runs the file.
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("mol"))
            {
                run_with_args(&args[1..]);
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

fn no_color() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty())
}

fn default_color() -> ColorMode {
    if no_color() {
        ColorMode::Never
    } else {
        ColorMode::Auto
    }
}

fn run_with_args(args: &[String]) {
    let run_args = match parse_run_args(args, no_color()) {
        Ok(run_args) => run_args,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };
    let status = run_file(&run_args.path, run_args.options);
    std::process::exit(status.code());
}

fn print_usage() {
    println!("MOL pipe-language interpreter");
    println!();
    println!("Usage: mol <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.mol>       Run a MOL program");
    println!("  lex <file.mol>       Tokenize and display tokens");
    println!("  parse <file.mol>     Parse and display program info");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Run options:");
    println!("  --trace              Trace pipe chains of three or more stages (default)");
    println!("  --no-trace           Never trace pipe chains");
    println!("  --color=<mode>       Colour traces and diagnostics: auto, always, never");
    println!();
    println!("Environment:");
    println!("  RUST_LOG             Log filter, e.g. mol_eval=debug");
    println!("  MOL_LOG_TREE=1       Hierarchical log output");
    println!("  NO_COLOR             Disable colours");
    println!();
    println!("Examples:");
    println!("  mol run main.mol");
    println!("  mol main.mol --no-trace");
    println!("  RUST_LOG=mol_eval=debug mol run main.mol");
}

// SPDX-License-Identifier: Apache-2.0

//! Interactive front end: reads one JSON document per line and prints the
//! parsed tree, or the parser's error message.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use arenajson::{Limits, Session, Value, DEFAULT_MAX_DEPTH};
use clap::Parser;

const PROMPT: &str = "> ";
const EXIT_COMMAND: &str = ".exit";

#[derive(Parser, Debug)]
#[command(name = "arenajson-repl", version, about = "Parse JSON documents and print the tree")]
struct Args {
    /// Print the compact form instead of the indented one
    #[arg(long)]
    compact: bool,

    /// Deepest array/object nesting to accept
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Parse this file once instead of reading lines from stdin
    file: Option<PathBuf>,
}

fn show(value: &Value<'_>, compact: bool) -> String {
    if compact {
        format!("{value}")
    } else {
        format!("{value:#}")
    }
}

fn prompt() {
    print!("{PROMPT}");
    // Nothing useful to do if stdout is gone.
    let _ = io::stdout().flush();
}

/// Parses `input` and prints the outcome. Returns whether the parse succeeded.
fn report(session: &mut Session, input: &[u8], compact: bool) -> bool {
    match session.parse(input) {
        Some(root) => {
            println!("{}", show(root, compact));
            true
        }
        None => {
            println!("[ERROR]: {}", session.error_message());
            false
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    log::debug!("{args:?}");

    let limits = Limits::default().with_max_depth(args.max_depth);
    let mut session = Session::new().with_limits(limits);

    if let Some(path) = &args.file {
        let input = match fs::read(path) {
            Ok(input) => input,
            Err(e) => {
                eprintln!("Error: Unable to read file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        };
        let ok = report(&mut session, &input, args.compact);
        std::process::exit(if ok { 0 } else { 1 });
    }

    if let Err(e) = ctrlc::set_handler(|| {
        println!();
        prompt();
    }) {
        log::warn!("Ctrl-C will terminate the process: {e}");
    }

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        prompt();
        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error: Unable to read stdin: {e}");
                std::process::exit(1);
            }
        }
        let input = line.trim_end_matches(['\r', '\n']);
        if input.trim() == EXIT_COMMAND {
            break;
        }
        if input.trim().is_empty() {
            continue;
        }
        report(&mut session, input.as_bytes(), args.compact);
    }
    session.release();
}

// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser as ClapParser;
use jsua::{ContainerKind, Event, Parser};

/// Streams JSON events for one or more inputs, one line per event.
#[derive(ClapParser)]
#[command(name = "jsua")]
struct Args {
    /// Files to parse. Omitted, or `-`, reads standard input.
    files: Vec<PathBuf>,
}

const CHUNK_SIZE: usize = 4096;

fn main() {
    env_logger::init();
    let args = Args::parse();

    let sources: Vec<PathBuf> = if args.files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        args.files
    };

    for source in sources {
        if let Err(err) = run_one(&source) {
            eprintln!("Parse Error: {}", err);
            std::process::exit(1);
        }
    }
}

fn run_one(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader: Box<dyn Read> = if path.as_os_str() == "-" {
        Box::new(io::stdin())
    } else {
        Box::new(File::open(path)?)
    };

    let mut parser = Parser::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            parser.feed(&[], print_event)?;
            return Ok(());
        }
        parser.feed(&buf[..n], print_event)?;
    }
}

fn print_event(event: Event) {
    println!(
        "({}, {:?}, {})",
        state_name(event.container_state),
        event.kind,
        format_data(event.data)
    );
}

fn state_name(state: ContainerKind) -> &'static str {
    match state {
        ContainerKind::Object => "Object",
        ContainerKind::Array => "Array",
        ContainerKind::Unknown => "Unknown",
    }
}

fn format_data(data: &[u8]) -> String {
    if data.is_empty() {
        "-".to_string()
    } else {
        format!("{:?}", String::from_utf8_lossy(data))
    }
}

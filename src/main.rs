use std::fs;
use std::io::{self, Read};
use std::ops::Range;
use std::path::PathBuf;

use clap::Parser as ClapParser;

use notemark::{ParseOptions, Parser};

mod cli;
use cli::{Cli, Commands};

/// Parse a range string like "5:10" into a zero-based half-open range.
fn parse_range(range_str: &str) -> Result<Range<usize>, String> {
    let parts: Vec<&str> = range_str.split(':').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid range format '{}'. Expected START:END (e.g., 5:10)",
            range_str
        ));
    }

    let start = parts[0]
        .parse::<usize>()
        .map_err(|_| format!("Invalid start line '{}'", parts[0]))?;
    let end = parts[1]
        .parse::<usize>()
        .map_err(|_| format!("Invalid end line '{}'", parts[1]))?;

    if start == 0 || end == 0 {
        return Err("Line numbers must be 1-indexed (start from 1)".to_string());
    }

    if start > end {
        return Err(format!(
            "Start line ({}) must be less than or equal to end line ({})",
            start, end
        ));
    }

    Ok(start - 1..end)
}

fn print_json<T: serde::Serialize>(value: &T, compact: bool) -> io::Result<()> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .map_err(io::Error::other)?;
    println!("{json}");
    Ok(())
}

fn read_all(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            file,
            range,
            compact,
            structure,
            lines,
            filepath,
            detailed_links,
            auto_embed_raw_links,
            inter_text_underscores,
            allow_unknown_html_tags,
        } => {
            if structure && lines {
                eprintln!("Error: --structure and --lines cannot be combined");
                std::process::exit(2);
            }

            let parsed_range = match range.as_deref().map(parse_range).transpose() {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(2);
                }
            };

            let mut builder = ParseOptions::builder()
                .detailed_links(detailed_links)
                .auto_embed_raw_links(auto_embed_raw_links)
                .inter_text_underscores(inter_text_underscores)
                .allow_unknown_html_tags(allow_unknown_html_tags);
            let from = filepath.or_else(|| {
                file.as_ref()
                    .and_then(|p| p.to_str())
                    .map(str::to_string)
            });
            if let Some(from) = from {
                builder = builder.filepath(from);
            }
            let options = builder.build();

            let input = read_all(file.as_ref())?;
            let output = match parsed_range {
                Some(range) => {
                    let lines: Vec<&str> = input.lines().collect();
                    Parser::window(&lines, range, &options).parse()
                }
                None => notemark::parse(&input, &options),
            };

            if structure {
                print_json(&output.structure, compact)
            } else if lines {
                print_json(&output.lines, compact)
            } else {
                print_json(&output, compact)
            }
        }
    }
}

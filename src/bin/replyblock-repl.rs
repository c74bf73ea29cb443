use arrrg::CommandLine;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use replyblock::{parse, SplitStrategy};

#[derive(Clone, Default, Debug, Eq, PartialEq, arrrg_derive::CommandLine)]
struct Args {
    #[arrrg(flag, "Pretty-print parsed records")]
    pretty: bool,
}

/// A line holding only this ends the reply being typed.
const END_OF_REPLY: &str = ".";

/// True for a line that leaves the loop, even in the middle of a reply.
fn is_exit(line: &str) -> bool {
    matches!(line.trim(), "exit" | "quit")
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn print_reply(lines: &[String], args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let raw = lines.join("\n");
    let records = parse(&raw);
    println!(
        "# {} records via {}",
        records.len(),
        SplitStrategy::detect(&raw)
    );
    for record in records.iter() {
        let json = if args.pretty {
            serde_json::to_string_pretty(record)?
        } else {
            serde_json::to_string(record)?
        };
        println!("{json}");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let (args, free) = Args::from_command_line_relaxed("USAGE: replyblock-repl [OPTIONS]");
    if !free.is_empty() {
        eprintln!("replyblock-repl takes no positional arguments");
        std::process::exit(1);
    }

    println!("Type or paste a reply.  A line with only \"{END_OF_REPLY}\" parses it.");
    println!("Type \"exit\" or \"quit\" at any time, or press Ctrl-D, to quit.");

    let mut rl = DefaultEditor::new()?;
    let mut pending: Vec<String> = vec![];
    loop {
        let prompt = if pending.is_empty() { "reply> " } else { "...   " };
        match rl.readline(prompt) {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                if is_exit(&line) {
                    break;
                }
                if line.trim() == END_OF_REPLY {
                    print_reply(&pending, &args)?;
                    pending.clear();
                } else {
                    pending.push(line);
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => {
                if !pending.is_empty() {
                    print_reply(&pending, &args)?;
                }
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_words_leave_the_loop() {
        assert!(is_exit("exit"));
        assert!(is_exit("  quit \t"));
        assert!(!is_exit("exit now"));
        assert!(!is_exit("message: exit"));
        assert!(!is_exit(END_OF_REPLY));
    }
}

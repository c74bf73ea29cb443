use std::io::Read;

use arrrg::CommandLine;
use tracing_subscriber::EnvFilter;

use replyblock::{parse, InputError, SplitStrategy};

#[derive(Clone, Default, Debug, Eq, PartialEq, arrrg_derive::CommandLine)]
struct Args {
    #[arrrg(flag, "Pretty-print each JSON array")]
    pretty: bool,

    #[arrrg(flag, "Report the split strategy and record count for each input on stderr")]
    strategy: bool,
}

fn init_tracing() {
    // RUST_LOG=replyblock=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let (args, free) =
        Args::from_command_line_relaxed("USAGE: replyblock-to-json [OPTIONS] [input_file...]");

    if free.is_empty() {
        let mut buf = vec![];
        std::io::stdin().read_to_end(&mut buf)?;
        process_input("<stdin>", &buf, &args)?;
    }
    for input_file in &free {
        let buf = std::fs::read(input_file)?;
        process_input(input_file, &buf, &args)?;
    }

    Ok(())
}

/// Decode a whole input once; parsing and strategy detection share the result.
fn decode(buf: &[u8]) -> Result<&str, InputError> {
    Ok(std::str::from_utf8(buf)?)
}

fn process_input(name: &str, buf: &[u8], args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let raw = match decode(buf) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("{name}: {err}");
            std::process::exit(1);
        }
    };
    let records = parse(raw);
    if args.strategy {
        eprintln!(
            "{name}: {} records via {}",
            records.len(),
            SplitStrategy::detect(raw)
        );
    }
    let json = if args.pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    println!("{json}");
    Ok(())
}

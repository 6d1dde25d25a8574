use clap::Parser;
use goblin::{Bytecode, ExecutionLimits, Instructions, Object};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Disassemble and run a raw instruction stream.
///
/// Instructions are given as hex, e.g. `bytecode_debug -c 1 -c 2 000000 000001 01 06`.
#[derive(Parser, Debug)]
#[command(name = "bytecode_debug", version)]
struct Args {
    /// Instruction bytes in hex; whitespace and separate arguments are joined.
    #[arg(required = true)]
    hex: Vec<String>,

    /// Integer constant, in pool order.
    #[arg(short = 'c', long = "constant", allow_hyphen_values = true)]
    constants: Vec<i64>,

    /// Only print the disassembly.
    #[arg(short = 'd', long)]
    disassemble: bool,

    #[arg(long)]
    stack_size: Option<usize>,

    #[arg(long)]
    max_steps: Option<u64>,
}

/// Decode hex digit pairs, ignoring whitespace.
fn parse_hex(parts: &[String]) -> Result<Vec<u8>, String> {
    let digits: String = parts
        .iter()
        .flat_map(|part| part.chars())
        .filter(|c| !c.is_whitespace())
        .collect();

    if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(format!("invalid hex digit {:?}", c));
    }
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits: {}", digits.len()));
    }

    // Only ASCII digits remain, so each pair is a valid `str`.
    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).map_err(|err| err.to_string())?;
            u8::from_str_radix(pair, 16)
                .map_err(|err| format!("invalid hex byte {:?}: {}", pair, err))
        })
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let bytes = match parse_hex(&args.hex) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    debug!(len = bytes.len(), "decoded instruction bytes");

    let code = Bytecode::new(
        Instructions::from(bytes),
        args.constants.into_iter().map(Object::Integer).collect(),
    );
    println!("{:?}", code);

    if args.disassemble {
        return;
    }

    let mut limits = ExecutionLimits::new();
    if let Some(size) = args.stack_size {
        limits = limits.stack_size(size);
    }
    if let Some(steps) = args.max_steps {
        limits = limits.max_steps(steps);
    }

    match goblin::execute_with_limits(&code, limits) {
        Ok(Some(value)) => println!("=> {} ({})", value, value.object_type()),
        Ok(None) => println!("=> (nothing popped)"),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

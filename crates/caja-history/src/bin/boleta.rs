//! # Boleta Printer
//!
//! Renders a sale's receipt from a JSON store snapshot, without the web
//! shell.
//!
//! ## Usage
//! ```bash
//! # Write boleta_1042.prn to the current directory
//! cargo run -p caja-history --bin boleta -- --data sales.json --sale 1042
//!
//! # Also print the share link for a local number
//! cargo run -p caja-history --bin boleta -- --data sales.json --sale 1042 --phone 12345678
//!
//! # Custom output directory and config file
//! cargo run -p caja-history --bin boleta -- --data sales.json --sale 1042 \
//!     --out ./boletas --config ./caja.toml
//!
//! # Send the document straight to a USB printer
//! cargo run -p caja-history --bin boleta -- --data sales.json --sale 1042 --out /tmp \
//!     && cat /tmp/boleta_1042.prn > /dev/usb/lp0
//! ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use caja_core::SaleId;
use caja_history::{FsHost, HistoryConfig, HistoryView, InMemoryStore};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Parsed command line.
#[derive(Debug, Default)]
struct Args {
    data: Option<PathBuf>,
    sale: Option<String>,
    phone: Option<String>,
    out: PathBuf,
    config: Option<PathBuf>,
    preview: bool,
}

fn print_help() {
    println!("Caja POS Boleta Printer");
    println!();
    println!("Usage: boleta --data <FILE> --sale <ID> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -d, --data <FILE>     Store snapshot (JSON with sales, users, currentUser)");
    println!("  -s, --sale <ID>       Sale id to print");
    println!("  -p, --phone <DIGITS>  Also print the share link for this local number");
    println!("  -o, --out <DIR>       Output directory (default: .)");
    println!("  -c, --config <FILE>   Config file (default: platform config dir)");
    println!("      --preview         Print a plain-text preview of the receipt");
    println!("  -h, --help            Show this help message");
}

/// Parses `--flag value` pairs. Returns `None` when help was requested.
fn parse_args(args: &[String]) -> Result<Option<Args>, String> {
    let mut parsed = Args {
        out: PathBuf::from("."),
        ..Default::default()
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let mut value = || {
            i += 1;
            args.get(i)
                .cloned()
                .ok_or_else(|| format!("{} needs a value", flag))
        };

        match flag {
            "-d" | "--data" => parsed.data = Some(PathBuf::from(value()?)),
            "-s" | "--sale" => parsed.sale = Some(value()?),
            "-p" | "--phone" => parsed.phone = Some(value()?),
            "-o" | "--out" => parsed.out = PathBuf::from(value()?),
            "-c" | "--config" => parsed.config = Some(PathBuf::from(value()?)),
            "--preview" => parsed.preview = true,
            "-h" | "--help" => return Ok(None),
            other => return Err(format!("Unknown argument: {}", other)),
        }
        i += 1;
    }

    Ok(Some(parsed))
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` overrides the default `info,caja=debug`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,caja=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let args = match parse_args(&args) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", e);
            print_help();
            return ExitCode::from(2);
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let data = args.data.ok_or("--data is required")?;
    let sale_id = SaleId::from(args.sale.ok_or("--sale is required")?);

    let config = HistoryConfig::load(args.config)?;
    let store = Arc::new(InMemoryStore::load(&data)?);
    let host = Arc::new(FsHost::new(&args.out));

    let mut view = HistoryView::new(store.clone(), store, host, config.receipt_options());
    view.select(&sale_id)?;

    if args.preview {
        if let Some(sale) = view.selected() {
            let seller = view.seller_for(sale);
            let document = caja_core::ReceiptDocument::build(sale, &seller, view.options())?;
            println!("{}", document.preview());
        }
    }

    let filename = view.download_document()?;
    info!(path = ?args.out.join(&filename), "Boleta written");

    if let Some(phone) = args.phone {
        if !view.open_share() {
            return Err("sale cannot be shared".into());
        }
        view.set_share_phone(&phone);
        if !view.can_share() {
            return Err(format!(
                "--phone needs {} digits",
                caja_core::SHARE_PHONE_DIGITS
            )
            .into());
        }
        view.confirm_share()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("boleta")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args() {
        let args = parse_args(&argv(&["--data", "s.json", "-s", "1042", "--phone", "12345678"]))
            .unwrap()
            .unwrap();
        assert_eq!(args.data, Some(PathBuf::from("s.json")));
        assert_eq!(args.sale.as_deref(), Some("1042"));
        assert_eq!(args.phone.as_deref(), Some("12345678"));
        assert_eq!(args.out, PathBuf::from("."));
        assert!(!args.preview);
    }

    #[test]
    fn test_parse_args_errors_and_help() {
        assert!(parse_args(&argv(&["--sale"])).is_err());
        assert!(parse_args(&argv(&["--bogus"])).is_err());
        assert!(parse_args(&argv(&["-h"])).unwrap().is_none());
    }
}

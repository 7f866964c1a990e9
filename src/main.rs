//! # chatlog CLI
//!
//! Command-line interface for the chatlog library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chatlog::cli::Args;
use chatlog::format::OutputFormat;
use chatlog::{ChatlogError, Extractor};

fn main() {
    let args = <Args as ClapParser>::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

/// Sends library logs to stderr. `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "chatlog=trace" } else { "chatlog=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(args: &Args) -> Result<(), ChatlogError> {
    let total_start = Instant::now();

    let output_path = args.output_path();
    let format: OutputFormat = args.format.into();

    // Print header
    println!("📦 chatlog v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input.display());
    println!("💾 Output:  {}", output_path.display());
    println!("📄 Format:  {}", format);
    println!();

    // Step 1: Extract
    let mut extractor = Extractor::open(&args.input)?.with_config(args.extractor_config());
    println!("⏳ Extracting messages...");
    let parse_start = Instant::now();
    let original_count = extractor.extract()?.len();
    println!(
        "   Found {} messages ({:.2}s)",
        original_count,
        parse_start.elapsed().as_secs_f64()
    );

    // Step 2: Drop attachment placeholders and mentions
    if args.keep_bad_data {
        println!("⏭️  Keeping bad data (--keep-bad-data)");
    } else {
        println!("🧹 Dropping bad data...");
        let stats = extractor.drop_bad_data_with_stats();
        println!(
            "   Kept {} messages ({} dropped, {:.1}%)",
            stats.after,
            stats.dropped(),
            stats.drop_ratio()
        );
    }
    let final_count = extractor.messages().len();

    if final_count == 0 {
        println!();
        println!("⚠️  No messages left, nothing written");
        return Ok(());
    }

    // Step 3: Write
    println!("💾 Writing {}...", format);
    let write_start = Instant::now();
    extractor.write(&output_path, format, &args.output_config())?;
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());

    println!();
    println!("✅ Done! Output saved to {}", output_path.display());

    // Summary
    println!();
    println!("📊 Summary:");
    println!("   Extracted: {} messages", original_count);
    println!("   Final:     {} messages", final_count);
    println!("   Total time: {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}

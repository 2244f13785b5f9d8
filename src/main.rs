//! cachecp CLI: pull, push or stat a list of objects.

use anyhow::Result;
use cachecp::engine::arg_parser::Cli;
use cachecp::engine::handle_run;
use clap::Parser;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    println!("Total time: {:.3} seconds.", start_time.elapsed().as_secs_f64());
    Ok(())
}

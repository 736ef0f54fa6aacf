mod cli;
mod config;
mod graph;
mod params;
mod pipelines;

use std::fs;
use std::io::Write;

use anyhow::Result;
use env_logger::Builder;
use log::{LevelFilter, debug, info};

use crate::cli::parse;
use crate::graph::GraphBuilder;

fn main() -> Result<()> {
    let args = parse();

    let log_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    println!("\n-------------\n NeoVax\n-------------\n");

    let params = cli::to_parameters(&args)?;
    info!("Run name: {}", params.run_name());
    info!("Run directory: {}", params.run_directory());

    let mut builder = GraphBuilder::new();
    let root = pipelines::run(&mut builder, &params)?;
    debug!("Terminal synchronization node: {}", root.id());
    info!("Assembled {} task graph operations", builder.ops().len());

    let plan = serde_json::to_string_pretty(builder.ops())?;
    match &args.plan_out {
        Some(path) => {
            fs::write(path, plan)?;
            info!("Wrote plan to {}", path);
        }
        None => println!("{}", plan),
    }

    Ok(())
}

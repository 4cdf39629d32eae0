use anyhow::Result;
use clap::Parser;
use gridlock::Gridlock;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Gridlock - A lock-ordering deadlock demonstrator"
)]
struct Cli {
    /// Also write a machine-readable event log (one JSON object per line)
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut demo = Gridlock::new();
    if let Some(path) = cli.log {
        demo = demo.with_log(path);
    }

    let scenario = demo.build()?;
    let workers = scenario.launch();

    // Worker threads die with the process, so park on the handles: a
    // deadlocked pair keeps the process visibly hung instead of being
    // silently killed at exit. The launcher itself has already returned.
    for worker in workers {
        let _ = worker.join();
    }

    Ok(())
}

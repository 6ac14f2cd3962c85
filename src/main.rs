use mimalloc::MiMalloc;
use sealbox::cli::Cli;
use sealbox::ui::display;
use tracing_subscriber::filter::LevelFilter;

/// Chunk buffers churn across worker threads; mimalloc keeps that cheap.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() {
    let cli = Cli::init();

    let level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    tracing_subscriber::fmt().with_max_level(level).with_target(false).init();

    if let Err(e) = cli.execute() {
        display::show_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

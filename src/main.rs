use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use todo_tui::core::config::{self, TodoConfig};
use todo_tui::tui;

#[derive(Parser)]
#[command(name = "todo-tui", about = "Terminal client for a todo-list REST API")]
struct Args {
    /// Base URL of the todos collection, e.g. http://localhost:5000/todos
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to todo-tui.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("todo-tui.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let todo_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: {e}, using defaults");
            log::warn!("Config error: {e}");
            TodoConfig::default()
        }
    };
    let resolved = config::resolve(&todo_config, args.api_url.as_deref());

    log::info!("todo-tui starting up against {}", resolved.api_url);

    tui::run(resolved)
}

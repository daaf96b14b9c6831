//! paged-todos-cli - drives the list and counter controllers against a
//! running server.
//!
//! Usage:
//!   paged-todos-cli [--base-url <url>] [--page <n>] <command>

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use paged_todos::client::{
    CounterController, HttpTodoApi, PageWindow, SyncMode, TodoListController,
};
use paged_todos::domain::{MAX_PAGE_SIZE, TodoId};
use paged_todos::telemetry::init_tracing;

#[derive(Parser)]
#[command(name = "paged-todos-cli")]
#[command(about = "Client for the paged to-do server")]
struct Cli {
    /// Server base URL
    #[arg(long, global = true, default_value = "http://localhost:3000")]
    base_url: String,

    /// Items per page (1-100)
    #[arg(
        long,
        global = true,
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE_SIZE))
    )]
    page_size: u32,

    /// Page to load before running the command
    #[arg(long, global = true, default_value_t = 1)]
    page: u32,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Refetch the page after mutations that change the total count
    #[arg(long, global = true)]
    refetch: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a page
    List,
    /// Create a to-do and show the page
    Add {
        /// Title of the new to-do
        title: String,
    },
    /// Flip the completion flag of a to-do on the page
    Toggle {
        /// Id of the to-do
        id: i64,
    },
    /// Delete a to-do
    Delete {
        /// Id of the to-do
        id: i64,
    },
    /// Show the page after the loaded one
    Next,
    /// Show the page before the loaded one
    Prev,
    /// Show the counter
    Counter,
    /// Increment the counter
    Increment,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("paged_todos=warn");
    let cli = Cli::parse();

    let api = HttpTodoApi::with_timeout(&cli.base_url, cli.timeout_ms.map(Duration::from_millis))
        .context("failed to build HTTP client")?;

    match cli.command {
        Commands::Counter => run_counter_command(api, false).await,
        Commands::Increment => run_counter_command(api, true).await,
        command => {
            let sync_mode = if cli.refetch {
                SyncMode::Refetch
            } else {
                SyncMode::Patch
            };
            let mut controller =
                TodoListController::new(api, cli.page_size).with_sync_mode(sync_mode);
            tracing::debug!(
                sync_mode = ?controller.sync_mode(),
                page_size = controller.window().page_size(),
                "List controller ready"
            );

            let result = run_list_command(&mut controller, cli.page, command).await;
            print_window(controller.window());
            result
        }
    }
}

async fn run_counter_command(api: HttpTodoApi, increment: bool) -> anyhow::Result<()> {
    let mut controller = CounterController::new(api);
    let result = if increment {
        controller.increment().await
    } else {
        controller.load().await
    };
    println!("counter: {} ({})", controller.value(), controller.status());
    result.context("counter request failed")
}

async fn run_list_command(
    controller: &mut TodoListController<HttpTodoApi>,
    page: u32,
    command: Commands,
) -> anyhow::Result<()> {
    controller
        .go_to_page(page)
        .await
        .context("failed to load page")?;

    match command {
        Commands::List | Commands::Counter | Commands::Increment => Ok(()),
        Commands::Add { title } => {
            controller.set_input(title);
            controller.add().await.context("failed to add todo")
        }
        Commands::Toggle { id } => controller
            .toggle(TodoId::new(id))
            .await
            .context("failed to toggle todo"),
        Commands::Delete { id } => controller
            .delete(TodoId::new(id))
            .await
            .context("failed to delete todo"),
        Commands::Next => controller.next_page().await.context("failed to load page"),
        Commands::Prev => controller
            .previous_page()
            .await
            .context("failed to load page"),
    }
}

fn print_window(window: &PageWindow) {
    println!(
        "page {}/{} ({} total, {})",
        window.current_page(),
        window.max_page(),
        window.total_count(),
        window.status()
    );
    for todo in window.items() {
        let mark = if todo.completed { "x" } else { " " };
        println!("  [{mark}] {:>4}  {}", todo.id.value(), todo.title);
    }
}

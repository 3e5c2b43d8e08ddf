//! Equipment checkout CLI
//!
//! User and ambassador front end for the equipment checkout API.

use anyhow::{anyhow, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio_stream::StreamExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use equipment_checkout::{
    config::{AppConfig, LoggingConfig},
    models::{BoardSnapshot, CheckoutRequest, StagedRequest},
    services::poller::BoardPoller,
    AppState,
};

#[derive(Debug, Parser)]
#[command(name = "checkout", about = "Equipment checkout client", version)]
struct Cli {
    /// Backend URL, overriding the configuration files
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List equipment models and how many units are free
    Catalog,
    /// List every equipment unit
    Items,
    /// List free units of a model
    Available { model: String },
    /// Request a unit of a model as the signed-in user
    Request { model: String },
    /// Sign the equipment waiver
    Waiver,
    /// Show the ambassador tables, refreshing on the poll interval
    Board {
        /// Fetch once and exit
        #[arg(long)]
        once: bool,
    },
    /// Approve a pending request, staging it with the free units
    Approve {
        #[arg(long)]
        pid: i32,
        #[arg(long)]
        model: String,
    },
    /// Cancel a pending request
    Reject {
        #[arg(long)]
        pid: i32,
        #[arg(long)]
        model: String,
    },
    /// Check out a staged request with one of its candidate units
    Assign {
        #[arg(long)]
        staged: i32,
        #[arg(long)]
        equipment: i32,
    },
    /// Drop a staged request
    Unstage {
        #[arg(long)]
        staged: i32,
    },
    /// Mark a checkout returned
    Return {
        #[arg(long)]
        checkout: i32,
    },
    /// Show every checkout, returned ones included
    History,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url.clone() {
        config.api.base_url = url;
    }

    init_tracing(&config.logging);
    tracing::debug!("Starting checkout client v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::connect(config)?;
    run(cli.command, &state).await
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("equipment_checkout={},checkout={}", logging.level, logging.level).into());
    let json = logging.format.eq_ignore_ascii_case("json");

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

async fn run(command: Command, state: &AppState) -> anyhow::Result<()> {
    let services = &state.services;
    let board = &services.board;

    match command {
        Command::Catalog => {
            for model in services.directory.list_all_models().await? {
                println!("{:<30} {:>3} available", model.model, model.num_available);
            }
        }
        Command::Items => {
            for item in services.directory.list_all_items().await? {
                let status = if item.is_checked_out { "checked out" } else { "free" };
                println!("{:>5}  {:<30} {}", item.equipment_id, item.model, status);
            }
        }
        Command::Available { model } => {
            for item in services.directory.list_available_items_for_model(&model).await? {
                println!("{:>5}  {}", item.equipment_id, item.model);
            }
        }
        Command::Request { model } => {
            services
                .profile
                .load()
                .await?
                .ok_or_else(|| anyhow!("Not signed in"))?;
            let request = services.checkouts.submit_request(&model).await?;
            println!("Requested {} for {} ({})", request.model, request.user_name, request.pid);
        }
        Command::Waiver => {
            services
                .profile
                .load()
                .await?
                .ok_or_else(|| anyhow!("Not signed in"))?;
            let profile = services.profile.sign_waiver().await?;
            println!("Waiver signed for {}", profile.display_name());
        }
        Command::Board { once } => {
            if once {
                board.refresh_all().await;
                print_board(&board.snapshot());
            } else {
                watch_board(state).await;
            }
        }
        Command::Approve { pid, model } => {
            let request = find_request(state, pid, &model).await?;
            let staged = board
                .approve_request(&request)
                .await
                .ok_or_else(|| anyhow!("Approval failed, see log"))?;
            println!("Staged #{} with candidates {:?}", staged.id.unwrap_or_default(), staged.id_choices);
        }
        Command::Reject { pid, model } => {
            let request = find_request(state, pid, &model).await?;
            board
                .reject_request(&request)
                .await
                .ok_or_else(|| anyhow!("Rejection failed, see log"))?;
            println!("Request cancelled");
        }
        Command::Assign { staged, equipment } => {
            let staged = find_staged(state, staged).await?;
            let checkout = board
                .approve_staged(&staged, equipment)
                .await
                .ok_or_else(|| anyhow!("Checkout failed, see log"))?;
            println!(
                "Unit {} checked out to {} until {}",
                checkout.equipment_id, checkout.user_name, checkout.end_at
            );
        }
        Command::Unstage { staged } => {
            let staged = find_staged(state, staged).await?;
            board
                .reject_staged(&staged)
                .await
                .ok_or_else(|| anyhow!("Rejection failed, see log"))?;
            println!("Staged request dropped");
        }
        Command::Return { checkout } => {
            let active = services.checkouts.list_active_checkouts().await?;
            let checkout = active
                .into_iter()
                .find(|c| c.id == Some(checkout))
                .ok_or_else(|| anyhow!("No active checkout #{}", checkout))?;
            let returned = board
                .return_checkout(&checkout)
                .await
                .ok_or_else(|| anyhow!("Return failed, see log"))?;
            println!("Unit {} returned", returned.equipment_id);
        }
        Command::History => {
            for c in services.checkouts.list_checkout_history().await? {
                let status = if c.is_active { "out" } else { "returned" };
                println!(
                    "#{:<4} unit {:<5} {:<24} {} -> {}  {}",
                    c.id.unwrap_or_default(),
                    c.equipment_id,
                    c.user_name,
                    c.started_at.format("%Y-%m-%d %H:%M"),
                    c.end_at.format("%Y-%m-%d %H:%M"),
                    status
                );
            }
        }
    }

    Ok(())
}

/// Poll until Ctrl-C, printing the tables whenever they change
async fn watch_board(state: &AppState) {
    let board = state.services.board.clone();
    let poller = BoardPoller::spawn(board.clone(), state.config.poll.interval());
    let mut updates = board.updates();

    loop {
        tokio::select! {
            Some(snapshot) = updates.next() => {
                if snapshot.refreshed_at.is_some() {
                    print_board(&snapshot);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.shutdown().await;
}

async fn find_request(state: &AppState, pid: i32, model: &str) -> anyhow::Result<CheckoutRequest> {
    state
        .services
        .checkouts
        .list_requests()
        .await?
        .into_iter()
        .find(|r| r.pid == pid && r.model == model)
        .ok_or_else(|| anyhow!("No pending {} request for {}", model, pid))
}

async fn find_staged(state: &AppState, id: i32) -> anyhow::Result<StagedRequest> {
    state
        .services
        .checkouts
        .list_staged_requests()
        .await?
        .into_iter()
        .find(|s| s.id == Some(id))
        .ok_or_else(|| anyhow!("No staged request #{}", id))
}

fn print_board(snapshot: &BoardSnapshot) {
    let now = Utc::now();

    println!("Requests ({})", snapshot.request_count());
    for r in &snapshot.requests {
        println!("  {:>9}  {:<24} {}", r.pid, r.user_name, r.model);
    }

    println!("Staged ({})", snapshot.staged_count());
    for s in &snapshot.staged {
        let choices: Vec<String> = s.id_choices.iter().map(ToString::to_string).collect();
        println!(
            "  #{:<4} {:>9}  {:<24} {:<20} [{}]",
            s.id.unwrap_or_default(),
            s.pid,
            s.user_name,
            s.model,
            choices.join(", ")
        );
    }

    println!(
        "Active checkouts ({}, {} overdue)",
        snapshot.checkout_count(),
        snapshot.overdue(now).count()
    );
    for c in &snapshot.checkouts {
        let overdue = if c.is_overdue(now) { "  OVERDUE" } else { "" };
        println!(
            "  #{:<4} unit {:<5} {:<24} due {}{}",
            c.id.unwrap_or_default(),
            c.equipment_id,
            c.user_name,
            c.end_at.format("%Y-%m-%d %H:%M"),
            overdue
        );
    }
    println!();
}

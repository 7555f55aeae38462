use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde_json::Value;
use std::io;
use std::sync::Arc;
use tracing::{error, info};

use trialcapture::{
    cli::{Cli, Commands, FormCommand, FormTarget, ScoreCommand},
    config::Config,
    forms::{FormContext, FormController},
    gateway::{Gateway, HttpGateway, MemoryGateway},
    lists::{fetch_participants, fetch_sessions, ParticipantFilter},
    models::{display_date, ParticipantId},
    notify::ToastKind,
    scoring::{
        distress::MAX_RATING,
        fact_g::{ITEMS, MAX_ITEM_VALUE},
        DistressIndex, FactGScores, ProblemArea, Subscale,
    },
    tui::{ui::truncate, App},
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "trialcapture=info");
    }

    // The TUI owns the terminal, so it only logs to the file
    init_logging(!matches!(cli.command, Commands::Tui));

    let config = Config::from_env()?;
    config.validate()?;

    let gateway: Arc<dyn Gateway> = if cli.offline {
        info!("Running offline against the in-memory backend");
        Arc::new(MemoryGateway::lenient())
    } else {
        Arc::new(HttpGateway::new(&config).context("Failed to create API client")?)
    };

    let result = match cli.command {
        Commands::Participants { group, search } => {
            list_participants(&config, gateway.as_ref(), group.as_deref(), search.as_deref()).await
        }
        Commands::Sessions { participant, study } => {
            list_sessions(&config, gateway.as_ref(), &participant, &study).await
        }
        Commands::Form { action } => handle_form(action, &config, gateway).await,
        Commands::Score { scale } => handle_score(scale),
        Commands::Tui => run_tui(config, gateway).await,
    };

    if let Err(e) = result {
        error!("Command failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(to_stderr: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let file_appender = tracing_appender::rolling::never(".", "trialcapture.log");

    tracing_subscriber::registry()
        .with(to_stderr.then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::from_default_env())
        }))
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();
}

async fn list_participants(
    config: &Config,
    gateway: &dyn Gateway,
    group: Option<&str>,
    search: Option<&str>,
) -> Result<()> {
    let mut filter = ParticipantFilter::new();
    if let Some(group) = group {
        filter = filter.with_group(Commands::parse_group(group)?);
    }
    if let Some(search) = search {
        filter = filter.with_text(search);
    }

    let participants = fetch_participants(gateway, config.user_id.as_deref())
        .await
        .context("Failed to fetch participants")?;
    let participants = filter.apply(&participants);

    if participants.is_empty() {
        println!("No participants found");
        return Ok(());
    }

    println!(
        "{:<14} {:<12} {:<5} {:<10} {:<8} {:<14} {:<12}",
        "Participant", "Study", "Age", "Gender", "Group", "Status", "Enrolled"
    );
    println!("{}", "-".repeat(80));
    for p in &participants {
        println!(
            "{:<14} {:<12} {:<5} {:<10} {:<8} {:<14} {:<12}",
            truncate(p.participant_id.as_str(), 14),
            truncate(p.study_id.as_str(), 12),
            p.age.map(|a| a.to_string()).unwrap_or_default(),
            truncate(p.gender.as_deref().unwrap_or(""), 10),
            p.group_type.map(|g| g.as_str()).unwrap_or(""),
            truncate(p.status.as_deref().unwrap_or(""), 14),
            p.enrolled_on.map(display_date).unwrap_or_default(),
        );
    }
    println!();
    println!("Total: {} participants", participants.len());

    Ok(())
}

async fn list_sessions(config: &Config, gateway: &dyn Gateway, participant: &str, study: &str) -> Result<()> {
    let participant_id = ParticipantId::new(participant.trim());
    let study_id = Commands::parse_study_id(study, &config.study_prefix)?;

    let sessions = fetch_sessions(gateway, &participant_id, &study_id)
        .await
        .with_context(|| format!("Failed to fetch VR sessions for {}", participant_id))?;

    if sessions.is_empty() {
        println!("No VR sessions for participant {} ({})", participant_id, study_id);
        return Ok(());
    }

    println!("{:<8} {:<12} {:<30} {:<14}", "Session", "Date", "Module", "Status");
    println!("{}", "-".repeat(66));
    for s in &sessions {
        println!(
            "{:<8} {:<12} {:<30} {:<14}",
            s.session_no.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string()),
            s.session_date.map(display_date).unwrap_or_default(),
            truncate(s.module.as_deref().unwrap_or(""), 30),
            truncate(s.status.as_deref().unwrap_or(""), 14),
        );
    }

    Ok(())
}

fn build_controller(
    target: &FormTarget,
    config: &Config,
    gateway: Arc<dyn Gateway>,
) -> Result<FormController<dyn Gateway>> {
    let kind = Commands::parse_form_kind(&target.kind)?;
    let study_id = Commands::parse_study_id(&target.study, &config.study_prefix)?;

    let mut context = FormContext::new(ParticipantId::new(target.participant.trim()), study_id);
    if let Some(user_id) = &config.user_id {
        context = context.with_user(user_id.clone());
    }
    if let Some(age) = target.age {
        context = context.with_age(age);
    }
    if let Some(record_id) = target.record {
        context = context.with_record(record_id);
    }
    if let Some(date) = target.date {
        context = context.with_date(date);
    }

    Ok(FormController::new(gateway, kind, context))
}

async fn handle_form(action: FormCommand, config: &Config, gateway: Arc<dyn Gateway>) -> Result<()> {
    match action {
        FormCommand::Show { target } => {
            let mut controller = build_controller(&target, config, gateway)?;
            load_form(&mut controller).await?;
            print_form(&controller);
        }
        FormCommand::Save { target, assignments } => {
            let mut controller = build_controller(&target, config, gateway)?;
            load_form(&mut controller).await?;

            for assignment in &assignments {
                let (key, value) = Commands::parse_assignment(assignment)?;
                controller
                    .set_field(&key, &value)
                    .with_context(|| format!("Cannot set {}", key))?;
            }

            let saved = controller.save().await;
            print_toasts(&mut controller);
            let record_id = saved?;
            match record_id.or(controller.record_id()) {
                Some(id) => println!("Saved {} record {}", controller.schema().title, id),
                None => println!("Saved {}", controller.schema().title),
            }
        }
        FormCommand::Clear { target } => {
            let mut controller = build_controller(&target, config, gateway)?;
            load_form(&mut controller).await?;
            controller.clear();
            print_toasts(&mut controller);
            print_form(&controller);
            println!();
            println!("Form reset locally; nothing was sent");
        }
    }

    Ok(())
}

async fn load_form(controller: &mut FormController<dyn Gateway>) -> Result<()> {
    let loaded = controller.load().await;
    print_toasts(controller);
    let phase = loaded.with_context(|| format!("Failed to load {}", controller.schema().title))?;
    info!("Loaded {} ({})", controller.schema().title, phase.as_str());
    Ok(())
}

fn print_toasts(controller: &mut FormController<dyn Gateway>) {
    for toast in controller.take_toasts() {
        let tag = match toast.kind {
            ToastKind::Success => "ok",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
        };
        println!("[{}] {}", tag, toast.summary());
    }
}

fn print_form(controller: &FormController<dyn Gateway>) {
    let schema = controller.schema();
    let context = controller.context();

    println!("{} ({})", schema.title, controller.phase().as_str());
    println!("Participant: {}  Study: {}", context.participant_id, context.study_id);
    if let Some(id) = controller.record_id() {
        println!("Record: {}", id);
    }
    if let Some(date) = controller.selected_date() {
        println!("Date: {}", display_date(date));
    }
    println!("{}", "-".repeat(80));

    let values = controller.values();
    for (spec, value) in values.iter() {
        if !values.is_revealed(spec) {
            continue;
        }
        let marker = if spec.required { "*" } else { " " };
        println!(
            "{}{:<22} {:<40} {}",
            marker,
            spec.key,
            truncate(spec.label, 40),
            value.display(spec)
        );
    }

    let derived = controller.derived();
    if !derived.is_empty() {
        println!();
        for (column, value) in derived {
            let value = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            println!("{:<24} {}", column, value);
        }
    }
}

fn handle_score(scale: ScoreCommand) -> Result<()> {
    match scale {
        ScoreCommand::FactG { answers } => {
            let mut parsed: Vec<(&'static str, u8)> = Vec::new();
            for answer in &answers {
                let (code, value) = Commands::parse_assignment(answer)?;
                let item = ITEMS
                    .iter()
                    .find(|item| item.code.eq_ignore_ascii_case(&code))
                    .with_context(|| format!("Unknown FACT-G item: {}", code))?;
                let value: u8 = value
                    .parse()
                    .with_context(|| format!("Answer for {} is not a number: {}", item.code, value))?;
                if value > MAX_ITEM_VALUE {
                    anyhow::bail!("Answer for {} must be 0-{}, got {}", item.code, MAX_ITEM_VALUE, value);
                }
                parsed.push((item.code, value));
            }

            let scores = FactGScores::compute(|code| {
                parsed.iter().rev().find(|(c, _)| *c == code).map(|(_, v)| *v)
            });

            for subscale in Subscale::ALL {
                println!("{:<28} {:>3}", subscale.as_str(), scores.subscale(subscale));
            }
            println!("{:<28} {:>3}", "FACT-G total", scores.total);
            println!("{:<28} {:>3}/{}", "Items answered", scores.answered, ITEMS.len());
        }
        ScoreCommand::Distress { rating, problems } => {
            if rating > MAX_RATING {
                anyhow::bail!("Rating must be 0-{}, got {}", MAX_RATING, rating);
            }

            let mut counts: Vec<(ProblemArea, usize)> = Vec::new();
            for entry in &problems {
                let (area, count) = Commands::parse_assignment(entry)?;
                let area = Commands::parse_problem_area(&area)?;
                let count: usize = count
                    .parse()
                    .with_context(|| format!("Problem count for {} is not a number: {}", area.as_str(), count))?;
                counts.push((area, count));
            }

            let index = DistressIndex::compute(Some(rating), |area| {
                counts.iter().filter(|(a, _)| *a == area).map(|(_, n)| n).sum()
            });

            println!("{:<28} {:>3}", "Distress rating", rating);
            for (area, count) in &index.problems_by_area {
                println!("{:<28} {:>3}", area.as_str(), count);
            }
            println!("{:<28} {:>3}", "Total problems", index.total_problems);
            println!(
                "{:<28} {:>3}",
                "Clinically significant",
                if index.significant { "Yes" } else { "No" }
            );
        }
    }

    Ok(())
}

async fn run_tui(config: Config, gateway: Arc<dyn Gateway>) -> Result<()> {
    info!("Starting trialcapture TUI");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, gateway);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match &result {
        Ok(_) => info!("trialcapture TUI exited"),
        Err(e) => error!("trialcapture TUI encountered an error: {}", e),
    }
    result
}

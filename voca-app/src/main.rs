use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use voca_app::config::Config;
use voca_app::sound::LoggingSoundBank;
use voca_app::terminal::{self, Command, HELP};
use voca_app::{GameController, ProgressTracker};
use voca_core::{GameEventBus, SoundScope, WordCorpus};
use voca_persistence::connection::connect_and_migrate;
use voca_persistence::repositories::{KvRepository, ProgressRepository};
use voca_persistence::PersistentStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Loading words from directory: {}", config.words_directory);
    let corpus = match WordCorpus::from_dir(&config.words_directory) {
        Ok(corpus) => Arc::new(corpus),
        Err(e) => {
            error!("Failed to load words from '{}': {:#}", config.words_directory, e);
            error!("Set WORDS_DIRECTORY to a directory containing words_elementary_<n>.json files.");
            std::process::exit(1);
        }
    };

    let db = match connect_and_migrate(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };
    let store: Arc<dyn PersistentStore> = Arc::new(KvRepository::new(db));
    let tracker = ProgressTracker::load(
        ProgressRepository::new(store),
        config.rewards,
        config.reset_stats_on_grade_reset,
    )
    .await;

    let mut events = GameEventBus::new();
    events.add_handler(Box::new(SoundScope::acquire(LoggingSoundBank::new(true))));

    let mut controller = GameController::start(corpus, tracker, config.guess_mode, events);
    println!("{}", HELP);
    print!("{}", terminal::render_view(&controller.view()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => handle_command(&mut controller, command),
            Err(e) => println!("{}\n{}", e, HELP),
        }
    }

    match controller.persist().await {
        Ok(0) => info!("Progress saved"),
        Ok(pending) => warn!("{} progress entries could not be saved", pending),
        Err(e) => error!("Failed to save progress: {:#}", e),
    }
}

fn handle_command(controller: &mut GameController, command: Command) {
    match command {
        Command::Guess(letter) => match controller.submit_guess(letter) {
            Ok(_) => print!("{}", terminal::render_view(&controller.view())),
            Err(e) => println!("{}", e),
        },
        Command::Next => {
            controller.next_round();
            print!("{}", terminal::render_view(&controller.view()));
        }
        Command::GiveUp => match controller.forfeit() {
            Ok(()) => print!("{}", terminal::render_view(&controller.view())),
            Err(e) => println!("{}", e),
        },
        Command::Grade(grade) => {
            controller.select_grade(grade);
            print!("{}", terminal::render_view(&controller.view()));
        }
        Command::Reset => {
            controller.reset_progress();
            println!("Solved words for grade {} have been reset.", controller.grade());
            print!("{}", terminal::render_view(&controller.view()));
        }
        Command::Stats => print!(
            "{}",
            terminal::render_stats(&controller.played_grades(), controller.reward_balance())
        ),
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
}

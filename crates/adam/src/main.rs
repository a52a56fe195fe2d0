//! Scripture-study chat in the terminal.
//!
//! Reads the API key from the `GROQ_API_KEY` environment variable or
//! `--api-key`.
//!
//! # Examples
//!
//! ```sh
//! # Interactive session
//! adam
//!
//! # One question, then exit
//! adam --prompt "Psalm 23:1" --doctrine sda
//!
//! # Another translation, a smaller budget, and the model's reasoning
//! adam --bible-version "King James Version" --max-tokens 8192 --show-reasoning
//!
//! # Custom wording
//! adam --templates my-templates.json
//! ```

use std::io::{self, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::process;

use adam::catalog::{self, Doctrine, MODELS};
use adam::config::AppConfig;
use adam::events::{CompositeObserver, LoggingObserver, TurnObserver};
use adam::render::TerminalRenderer;
use adam::repl::{self, Command};
use adam::session::{Session, TurnOutcome};
use adam::{DEFAULT_BASE_URL, DEFAULT_TEMPERATURE, GroqClient};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Bible study assistant over a streaming chat-completion API.
#[derive(Parser)]
#[command(name = "adam", version)]
struct Cli {
    // ── Connection ─────────────────────────────────────────────
    /// API key for the completion service
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// OpenAI-compatible API root
    #[arg(long, env = "ADAM_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    // ── Model and sampling ─────────────────────────────────────
    /// Model identifier (see --list-models)
    #[arg(long)]
    model: Option<String>,

    /// Maximum completion tokens (a multiple of 8192 within the model's limit)
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Sampling temperature (0 leaves it to the provider)
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Show the model's reasoning while it streams
    #[arg(long)]
    show_reasoning: bool,

    // ── Study settings ─────────────────────────────────────────
    /// Doctrine: "sunday" or "sda" (or the full name)
    #[arg(long)]
    doctrine: Option<Doctrine>,

    /// Bible translation named in every prompt
    #[arg(long, default_value = catalog::DEFAULT_BIBLE_VERSION)]
    bible_version: String,

    /// JSON file overriding the prompt templates
    #[arg(long)]
    templates: Option<PathBuf>,

    // ── Mode ───────────────────────────────────────────────────
    /// Ask one question and exit instead of starting a session
    #[arg(long, short)]
    prompt: Option<String>,

    /// List available models and exit
    #[arg(long)]
    list_models: bool,

    /// Debug logging on stderr
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn app_config(&self) -> AppConfig {
        let defaults = AppConfig::default();
        AppConfig {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone().unwrap_or(defaults.model),
            max_tokens: self.max_tokens,
            doctrine: self.doctrine.unwrap_or_default(),
            bible_version: self.bible_version.clone(),
            temperature: self.temperature,
            show_reasoning: self.show_reasoning,
            templates_path: self.templates.clone(),
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}

fn print_models(current: Option<&str>) {
    for model in MODELS {
        let marker = if Some(model.identifier) == current {
            "*"
        } else {
            " "
        };
        println!("{marker} {model}");
    }
}

/// Print a failed or cancelled outcome. Returns whether the turn completed.
fn report_outcome(outcome: &TurnOutcome) -> bool {
    match outcome {
        TurnOutcome::Completed { .. } => true,
        TurnOutcome::Failed { error, .. } => {
            error!("[{}] {error}", outcome.trace_id());
            if error.is_transient() {
                eprintln!("Error: {error} (temporary, try again)");
            } else {
                eprintln!("Error: {error}");
            }
            false
        }
        TurnOutcome::Cancelled { .. } => {
            eprintln!("[stopped]");
            false
        }
    }
}

/// Run one turn, abandoning it on Ctrl-C. Returns whether it completed.
async fn run_turn(
    session: &mut Session,
    input: &str,
    client: &GroqClient,
    observer: &dyn TurnObserver,
) -> bool {
    let result = tokio::select! {
        result = session.submit(input, client, observer) => result,
        _ = tokio::signal::ctrl_c() => {
            println!();
            eprintln!("[interrupted]");
            return false;
        }
    };
    match result {
        Ok(outcome) => report_outcome(&outcome),
        Err(e) => {
            eprintln!("Error: {e}");
            false
        }
    }
}

fn handle_command(command: Command, session: &mut Session) -> ControlFlow<()> {
    match command {
        Command::Ask(_) | Command::Empty => {}
        Command::NewChat => {
            session.new_chat();
            println!("Started a new chat.");
        }
        Command::Model(None) => println!("Model: {}", session.settings().model),
        Command::Model(Some(id)) => match session.select_model(&id) {
            Ok(true) => println!(
                "Switched to {} (new chat, max tokens {}).",
                session.settings().model.identifier,
                session.settings().max_tokens
            ),
            Ok(false) => println!("Already using {id}."),
            Err(e) => eprintln!("Error: {e}"),
        },
        Command::ListModels => print_models(Some(session.settings().model.identifier)),
        Command::Tokens(None) => {
            let choices: Vec<String> = session
                .settings()
                .model
                .max_token_choices()
                .iter()
                .map(u32::to_string)
                .collect();
            println!(
                "Max tokens: {} (choices: {})",
                session.settings().max_tokens,
                choices.join(", ")
            );
        }
        Command::Tokens(Some(n)) => match session.set_max_tokens(n) {
            Ok(()) => println!("Max tokens set to {n}."),
            Err(e) => eprintln!("Error: {e}"),
        },
        Command::Doctrine(None) => {
            let current = session.settings().doctrine;
            for doctrine in Doctrine::ALL {
                let marker = if doctrine == current { "*" } else { " " };
                println!("{marker} {}", doctrine.selector_label());
            }
        }
        Command::Doctrine(Some(doctrine)) => {
            session.set_doctrine(doctrine);
            println!("Doctrine set to {doctrine}.");
        }
        Command::Bible(None) => println!("Bible version: {}", session.settings().bible_version),
        Command::Bible(Some(version)) => {
            session.set_bible_version(version);
            println!("Bible version set to {}.", session.settings().bible_version);
        }
        Command::History => {
            if session.transcript().is_empty() {
                println!("No messages yet.");
            }
            for message in session.transcript().all() {
                println!("── {} ──\n{}\n", message.role, message.content);
            }
        }
        Command::Usage => println!("{}", session.usage().summary()),
        Command::Help => println!("{}", repl::help_text()),
        Command::Invalid(reason) => eprintln!("{reason}"),
        Command::Quit => return ControlFlow::Break(()),
    }
    ControlFlow::Continue(())
}

async fn run_repl(mut session: Session, client: GroqClient, observer: &dyn TurnObserver) {
    println!(
        "adam {} | {} | {} | {}",
        env!("CARGO_PKG_VERSION"),
        session.settings().model.identifier,
        session.settings().doctrine.selector_label(),
        session.settings().bible_version
    );
    println!("Type /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        if let Err(e) = io::stdout().flush() {
            error!("Failed to flush stdout: {e}");
        }

        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {e}");
                break;
            }
        };

        match repl::parse(&line) {
            Command::Ask(input) => {
                run_turn(&mut session, &input, &client, observer).await;
            }
            command => {
                if handle_command(command, &mut session).is_break() {
                    break;
                }
            }
        }
    }
    info!("Session ended: {}", session.usage().summary());
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.list_models {
        print_models(None);
        return;
    }

    let config = cli.app_config();
    let setup = config
        .build_session_settings()
        .and_then(|settings| Ok((settings, config.build_client()?)));
    let (settings, client) = match setup {
        Ok(setup) => setup,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    info!(
        "Using {} at {}",
        settings.model.identifier,
        config.base_url.trim()
    );

    let mut session = Session::new(settings);
    let observer = CompositeObserver::new()
        .with_if(cli.verbose, LoggingObserver)
        .with(TerminalRenderer::stdout(cli.show_reasoning));

    match &cli.prompt {
        Some(prompt) => {
            if !run_turn(&mut session, prompt, &client, &observer).await {
                process::exit(1);
            }
        }
        None => run_repl(session, client, &observer).await,
    }
}

use std::fmt;
use std::io::BufRead;
use std::sync::Arc;

use quiz_core::model::{AnswerRecord, GameId, GameResult, Problem};
use services::{
    AppServices, AppState, Clock, Feedback, HttpScoreSync, ScoreSync, SessionInput,
    SessionObserver,
};
use tokio::sync::mpsc;
use tracing::{debug, info};
use ui::vm::{MenuVm, ResultsVm, SessionVm};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingGameId,
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingGameId => write!(f, "play requires a game id"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app list                       [--db <sqlite_url>]");
    eprintln!("  app play <game-id> [--offline] [--db <sqlite_url>]");
    eprintln!("  app scores         [--offline] [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:maths.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MATHS_DB_URL, MATHS_LOG");
    eprintln!("  MATHS_SYNC_URL, MATHS_SYNC_KEY, MATHS_USER_ID, MATHS_SYNC_TOKEN  # optional sync");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List,
    Play(GameId),
    Scores,
}

#[derive(Debug)]
struct Args {
    command: Command,
    db_url: String,
    offline: bool,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let command = match args.next().as_deref() {
            None | Some("list") => Command::List,
            Some("scores") => Command::Scores,
            Some("play") => {
                let id = args
                    .next()
                    .filter(|id| !id.starts_with("--"))
                    .ok_or(ArgsError::MissingGameId)?;
                Command::Play(GameId::new(id))
            }
            Some("--help" | "-h" | "help") => return Ok(None),
            Some(other) => return Err(ArgsError::UnknownArg(other.to_string())),
        };

        let mut db_url =
            std::env::var("MATHS_DB_URL").unwrap_or_else(|_| "sqlite:maths.sqlite3".into());
        let mut offline = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--offline" => offline = true,
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(Self {
            command,
            db_url: normalize_sqlite_url(db_url),
            offline,
        }))
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn setup_logging() {
    let filter = std::env::var("MATHS_LOG").unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}

//
// ─── TERMINAL RENDERING ────────────────────────────────────────────────────────
//

/// Prints session notifications to stdout through a `SessionVm`.
struct ConsoleObserver {
    vm: SessionVm,
}

impl SessionObserver for ConsoleObserver {
    fn on_question(&mut self, index: usize, total: usize, problem: &Problem) {
        self.vm.on_question(index, total, problem);
        println!();
        println!("{} ({}%)", self.vm.counter_text(), self.vm.progress_percent());
        if let Some(text) = self.vm.question_text() {
            println!("  {text}");
        }
    }

    fn on_tick(&mut self, remaining: u32) {
        self.vm.on_tick(remaining);
        if let Some(text) = self.vm.timer_text() {
            if self.vm.timer_warning() {
                println!("  ⏱ {text}!");
            } else {
                println!("  ⏱ {text}");
            }
        }
    }

    fn on_timeout(&mut self, _index: usize) {
        println!("  Time's up!");
    }

    fn on_answer(&mut self, index: usize, record: &AnswerRecord) {
        self.vm.on_answer(index, record);
    }

    fn on_feedback(&mut self, feedback: &Feedback) {
        self.vm.on_feedback(feedback);
        if let Some(text) = self.vm.feedback_text() {
            println!("  {text}");
        }
    }

    fn on_complete(&mut self, result: &GameResult) {
        self.vm.on_complete(result);
    }
}

fn print_menu(menu: &MenuVm) {
    println!("{}", MenuVm::SUBTITLE);
    for card in &menu.cards {
        println!("  {} {:<16} {}", card.icon, card.id.as_str(), card.name);
        println!("      {}", card.description);
    }
}

fn print_scores(menu: &MenuVm) {
    if menu.best_scores.is_empty() {
        println!("No scores yet.");
        return;
    }
    println!("{}", MenuVm::BEST_SCORES_TITLE);
    for best in &menu.best_scores {
        println!("  {}  ({})", best.line, best.date_str);
    }
}

fn print_results(results: &ResultsVm) {
    println!();
    println!("{}", results.title);
    if let Some(banner) = results.banner() {
        println!("{banner}");
    }
    println!("{} Questions Correct ({})", results.score_text, results.percentage_text);
    println!();
    println!("Question Breakdown");
    for row in &results.rows {
        let mark = if row.is_correct { "✓" } else { "✗" };
        println!("  {mark} {}", row.line());
    }
}

/// Parse one line of player input. `None` means the line is not an answer.
fn parse_input(line: &str) -> Option<SessionInput> {
    let trimmed = line.trim();
    match trimmed {
        "q" | "quit" | "exit" => Some(SessionInput::Quit),
        _ => trimmed.parse::<i64>().ok().map(SessionInput::Answer),
    }
}

/// Forward stdin lines to the session on a plain thread.
///
/// A detached thread keeps a blocked read from holding up process exit.
fn spawn_stdin_reader(tx: mpsc::Sender<SessionInput>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_input(&line) {
                Some(input) => {
                    if tx.blocking_send(input).is_err() {
                        break;
                    }
                }
                None if line.trim().is_empty() => {}
                None => println!("  Enter a number, or q to quit."),
            }
        }
    });
}

//
// ─── COMMANDS ──────────────────────────────────────────────────────────────────
//

async fn play(
    services: &AppServices,
    state: &mut AppState,
    game_id: GameId,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = services.registry();
    let game = registry.get(&game_id)?;
    state.begin_game(game_id);

    println!("{} {}", game.icon(), game.display_name());
    println!("{}", game.description());
    println!("Type your answer and press Enter. q quits.");

    let total = usize::try_from(game.settings().total_questions()).unwrap_or(usize::MAX);
    let console: Box<dyn SessionObserver> = Box::new(ConsoleObserver {
        vm: SessionVm::new(total),
    });
    let runner = game.create_runner([console]);

    let (tx, rx) = mpsc::channel(16);
    spawn_stdin_reader(tx);

    let Some(result) = runner.run(rx).await? else {
        println!("Game abandoned.");
        state.show_menu();
        return Ok(());
    };

    let recorded = services.record_game(&result).await?;
    state.set_high_scores(recorded.high_scores);
    state.finish_game(result, recorded.is_new_high_score);
    if let Some(last) = state.last_result() {
        print_results(&ResultsVm::from(last));
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = match Args::parse(std::env::args().skip(1)) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            return Err(e.into());
        }
    };

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;

    let sync = HttpScoreSync::from_env();
    let user_id = sync
        .config()
        .filter(|_| !parsed.offline)
        .map(|config| config.user_id.clone());
    let remote = (!parsed.offline && sync.enabled()).then(|| Arc::new(sync) as Arc<dyn ScoreSync>);
    debug!(db = %parsed.db_url, sync = remote.is_some(), "starting");

    let services = AppServices::new_sqlite(&parsed.db_url, Clock::system(), remote).await?;

    let mut state = AppState::new(services.load_high_scores().await?);
    if let Some(user_id) = user_id {
        info!(user = %user_id, "score sync enabled");
        state.sign_in(user_id);
    }

    match parsed.command {
        Command::List => {
            print_menu(&MenuVm::new(&services.registry(), state.high_scores()));
            Ok(())
        }
        Command::Scores => {
            print_scores(&MenuVm::new(&services.registry(), state.high_scores()));
            Ok(())
        }
        Command::Play(game_id) => play(&services, &mut state, game_id).await,
    }
}

#[tokio::main]
async fn main() {
    setup_logging();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<Args>, ArgsError> {
        Args::parse(args.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn play_requires_a_game_id() {
        assert!(matches!(parse(&["play"]), Err(ArgsError::MissingGameId)));
        let args = parse(&["play", "speed-maths", "--offline", "--db", "sqlite::memory:"])
            .unwrap()
            .unwrap();
        assert_eq!(args.command, Command::Play(GameId::from("speed-maths")));
        assert!(args.offline);
        assert_eq!(args.db_url, "sqlite::memory:");
    }

    #[test]
    fn help_and_unknown_commands() {
        assert!(parse(&["--help"]).unwrap().is_none());
        assert!(matches!(parse(&["dance"]), Err(ArgsError::UnknownArg(_))));
        assert!(matches!(
            parse(&["scores", "--db"]),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
    }

    #[test]
    fn relative_sqlite_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/maths.sqlite3".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/maths.sqlite3"));
    }

    #[test]
    fn input_lines_map_to_answers_or_quit() {
        assert_eq!(parse_input(" 42 "), Some(SessionInput::Answer(42)));
        assert_eq!(parse_input("-3"), Some(SessionInput::Answer(-3)));
        assert_eq!(parse_input("q"), Some(SessionInput::Quit));
        assert_eq!(parse_input("abc"), None);
    }
}

pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::{info, warn};

use vokab::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    drill::{rank_struggles, Drill},
    error::WordListError,
    history::HistoryLog,
    language::{Direction, WordList},
    logging,
    remote::{DocumentStore, DEFAULT_BASE_URL, DEFAULT_COLLECTION},
    runtime::{DrillEvent, EventChannel, Runner},
    session::DrillConfig,
    stats::{ErrorCountStore, StatsDb},
};

pub const TICK_RATE_MS: u64 = 50;

/// terminal vocabulary drill with loose answer checking and mistake-weighted word selection
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal vocabulary drill: translate the word shown, get loose accent- and case-insensitive checking. Every miss lowers the word's draw weight (10 minus its mistakes, never below 1), so words you keep missing come up less often."
)]
pub struct Cli {
    /// which side of each pair is shown
    #[clap(short = 'd', long, value_enum)]
    direction: Option<Direction>,

    /// built-in word list to drill
    #[clap(short = 'l', long = "list", value_enum)]
    list: Option<BuiltinList>,

    /// JSON word list to drill instead of a built-in one
    #[clap(short = 'w', long)]
    word_list: Option<PathBuf>,

    /// pick words uniformly, ignoring mistake counts
    #[clap(long)]
    random_words: bool,

    /// how long a correct answer stays on screen
    #[clap(long)]
    advance_delay_ms: Option<u64>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// print the words with the most mistakes
    Stats {
        #[clap(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
    /// forget all recorded mistakes
    Reset,
    /// import a remote document collection as a word list
    Fetch {
        /// project holding the collection
        #[clap(long)]
        project: Option<String>,

        #[clap(long, default_value = DEFAULT_COLLECTION)]
        collection: String,

        #[clap(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// write the list here instead of stdout
        #[clap(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum BuiltinList {
    FrenchEnglish,
}

impl Cli {
    /// Command line flags win over the stored config
    fn apply_to(&self, cfg: &mut Config) {
        if let Some(direction) = self.direction {
            cfg.direction = direction;
        }
        if let Some(list) = self.list {
            cfg.builtin_list = list.to_string();
            cfg.word_list = None;
        }
        if let Some(path) = &self.word_list {
            cfg.word_list = Some(path.clone());
        }
        if self.random_words {
            cfg.random_words = true;
        }
        if let Some(ms) = self.advance_delay_ms {
            cfg.advance_delay_ms = ms;
        }
    }
}

fn load_word_list(cfg: &Config) -> Result<WordList, WordListError> {
    match &cfg.word_list {
        Some(path) => WordList::from_path(path),
        None => WordList::builtin(&cfg.builtin_list),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Drill,
    Struggles,
}

#[derive(Debug, Default)]
pub struct StrugglesState {
    pub scroll_offset: usize,
}

pub struct App {
    pub drill: Drill,
    pub state: AppState,
    pub struggles_state: StrugglesState,
}

impl App {
    pub fn new(drill: Drill) -> Self {
        Self {
            drill,
            state: AppState::Drill,
            struggles_state: StrugglesState::default(),
        }
    }

    /// Apply one key press. Returns true when the app should quit.
    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return true;
        }

        match self.state {
            AppState::Drill => match key.code {
                KeyCode::Enter => {
                    self.drill.submit(now);
                }
                KeyCode::Tab => self.drill.toggle_direction(),
                KeyCode::F(2) => {
                    self.struggles_state = StrugglesState::default();
                    self.state = AppState::Struggles;
                }
                KeyCode::Backspace => self.drill.backspace(),
                KeyCode::Char(c) => self.drill.write(c),
                _ => {}
            },
            AppState::Struggles => match key.code {
                KeyCode::F(2) | KeyCode::Backspace | KeyCode::Char('b') => {
                    self.state = AppState::Drill;
                }
                KeyCode::Up => {
                    self.struggles_state.scroll_offset =
                        self.struggles_state.scroll_offset.saturating_sub(1);
                }
                KeyCode::Down => {
                    // Will check max scroll in render function
                    self.struggles_state.scroll_offset += 1;
                }
                KeyCode::Home => {
                    self.struggles_state.scroll_offset = 0;
                }
                _ => {}
            },
        }
        false
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    cli.apply_to(&mut config);

    if let Some(command) = cli.command.clone() {
        logging::init_stderr_logging();
        return run_command(command, &config);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(log_path) = AppDirs::log_path() {
        logging::init_file_logging(&log_path)?;
    }

    let words = load_word_list(&config)?;
    info!(list = %words.name, pairs = words.len(), "loaded word list");
    let store = StatsDb::new()?;
    let mut drill = Drill::new(words.pairs, Box::new(store), DrillConfig::from(&config));
    if let Some(history) = HistoryLog::new() {
        drill = drill.with_history(history);
    }
    let mut app = App::new(drill);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // remember the last direction, leave everything else as configured on disk
    let mut stored = config_store.load();
    stored.direction = app.drill.direction();
    if let Err(e) = config_store.save(&stored) {
        warn!(error = %e, "failed to save config");
    }

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        EventChannel::terminal(),
        Duration::from_millis(TICK_RATE_MS),
    );

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            DrillEvent::Tick => {
                if app.drill.on_tick(Instant::now()) {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            DrillEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            DrillEvent::Key(key) => {
                if app.on_key(key, Instant::now()) {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    ui::screen::current_screen(&app.state).render(app, f);
}

fn run_command(command: Command, config: &Config) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Stats { limit } => {
            let words = load_word_list(config)?;
            let counts = StatsDb::new()?.load_or_default();
            let ranked = rank_struggles(&words.pairs, &counts, config.direction, limit);
            print!("{}", format_struggles(&ranked, config.direction));
        }
        Command::Reset => {
            StatsDb::new()?.clear()?;
            info!("error counts cleared");
            println!("All recorded mistakes have been cleared.");
        }
        Command::Fetch {
            project,
            collection,
            base_url,
            output,
        } => {
            let project = project.unwrap_or_else(|| config.project_id.clone());
            let store = DocumentStore::new(&base_url, &project)?;
            let runtime = tokio::runtime::Runtime::new()?;
            let documents = runtime.block_on(store.fetch_collection(&collection))?;

            let pairs: Vec<_> = documents
                .iter()
                .filter_map(|doc| {
                    let pair = doc.to_word_pair();
                    if pair.is_none() {
                        warn!(id = %doc.id, "skipping document without a word pair");
                    }
                    pair
                })
                .collect();
            info!(documents = documents.len(), pairs = pairs.len(), "fetched collection");

            let list = WordList {
                name: collection,
                pairs,
            }
            .ensure_not_empty()?;
            let json = serde_json::to_string_pretty(&list)?;
            match output {
                Some(path) => fs::write(path, json)?,
                None => println!("{json}"),
            }
        }
    }
    Ok(())
}

fn format_struggles(ranked: &[(vokab::language::WordPair, u32)], direction: Direction) -> String {
    if ranked.is_empty() {
        return "No mistakes recorded yet.\n".to_string();
    }
    let mut out = format!("Most missed words ({direction}):\n");
    for (pair, mistakes) in ranked {
        out.push_str(&format!(
            "{:>5}  {} → {}\n",
            mistakes,
            direction.prompt_of(pair),
            direction.answer_of(pair)
        ));
    }
    out
}

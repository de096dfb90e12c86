use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use quickfox::{
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore, DEFAULT_REFERENCE_TEXT},
    runtime::{
        CrosstermEventSource, FixedTicker, Runner, SessionEvent, SessionEventSource, Ticker,
    },
    session::EndReason,
    typing::{Flow, TypingTest},
    ui::{status_lines, SessionView, Theme},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::{
    error::Error,
    fs::{self, File},
    io::{self, stdin, Stdout},
    path::PathBuf,
    time::Instant,
};

/// minimal terminal typing speed test
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type the sentence on screen as fast and as accurately as you can. The clock starts on your first keystroke and the test ends when the sentence is complete or the timeout runs out."
)]
pub struct Cli {
    /// config file to use instead of the one in the platform config directory
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// file to write logs to instead of the platform data directory
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// include debug detail in the log
    #[clap(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(&cli);

    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let config = store.load();
    log::info!(
        "quickfox starting with config {} (timeout {:?})",
        store.path().display(),
        config.timeout()
    );
    let theme = Theme::from_config(&config.theme);

    let mut terminal = setup_terminal()?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(config.tick_rate()),
    );
    let mut test = TypingTest::new(DEFAULT_REFERENCE_TEXT, config.timeout(), runner.sender());

    let outcome = start_tui(&mut terminal, &mut test, &theme, &runner);
    restore_terminal(&mut terminal)?;
    outcome?;

    print_summary(&test);

    Ok(())
}

fn init_logging(cli: &Cli) {
    let Some(path) = cli.log_file.clone().or_else(AppDirs::log_path) else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create(&path) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, Box<dyn Error>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }

    let backend = CrosstermBackend::new(stdout);
    match Terminal::new(backend) {
        Ok(terminal) => Ok(terminal),
        Err(e) => {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
            Err(e.into())
        }
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn start_tui<B: Backend, E: SessionEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    test: &mut TypingTest,
    theme: &Theme,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| {
            f.render_widget(SessionView::new(&*test, theme, Instant::now()), f.area())
        })?;

        let event = match runner.step() {
            SessionEvent::SourceFailed(reason) => {
                return Err(format!("keyboard input failed: {reason}").into());
            }
            event => event,
        };
        if test.on_event(event, Instant::now()) == Flow::Exit {
            break;
        }
    }

    Ok(())
}

fn print_summary(test: &TypingTest) {
    let Some(result) = test.session().result() else {
        return;
    };

    if result.reason == EndReason::TimedOut {
        println!("Time up");
    }
    println!("{}", test.session().reference());
    for line in status_lines(result.wpm, result.accuracy) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use quickfox::runtime::TestEventSource;
    use quickfox::session::Phase;
    use ratatui::backend::TestBackend;
    use std::time::Duration;

    fn headless_loop() -> (
        Terminal<TestBackend>,
        Runner<TestEventSource, FixedTicker>,
        TypingTest,
    ) {
        let terminal = Terminal::new(TestBackend::new(60, 14)).unwrap();
        let runner = Runner::new(
            TestEventSource::new(),
            FixedTicker::new(Duration::from_millis(5)),
        );
        let test = TypingTest::new("hi", Duration::from_secs(60), runner.sender());
        (terminal, runner, test)
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["quickfox"]);

        assert_eq!(cli.config, None);
        assert_eq!(cli.log_file, None);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_config_path() {
        let cli = Cli::parse_from(["quickfox", "-c", "/tmp/qf.json"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/qf.json")));

        let cli = Cli::parse_from(["quickfox", "--config", "other.json"]);
        assert_eq!(cli.config, Some(PathBuf::from("other.json")));
    }

    #[test]
    fn test_cli_logging_flags() {
        let cli = Cli::parse_from(["quickfox", "--log-file", "run.log", "-v"]);
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_rejects_prompt_flag() {
        assert!(Cli::try_parse_from(["quickfox", "-p", "custom text"]).is_err());
    }

    #[test]
    fn test_loop_fails_when_keyboard_source_fails() {
        let (mut terminal, runner, mut test) = headless_loop();
        runner
            .sender()
            .send(SessionEvent::SourceFailed("not a tty".into()))
            .unwrap();

        let outcome = start_tui(&mut terminal, &mut test, &Theme::default(), &runner);

        let err = outcome.unwrap_err();
        assert!(err.to_string().contains("not a tty"));
        assert_eq!(test.session().phase(), Phase::Idle);
    }

    #[test]
    fn test_loop_returns_when_session_completes() {
        let (mut terminal, runner, mut test) = headless_loop();
        let tx = runner.sender();
        for c in "hi".chars() {
            tx.send(SessionEvent::Key(KeyEvent::new(
                KeyCode::Char(c),
                KeyModifiers::NONE,
            )))
            .unwrap();
        }

        start_tui(&mut terminal, &mut test, &Theme::default(), &runner).unwrap();

        assert!(test.session().result().is_some());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}

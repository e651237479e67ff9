//! src/main.rs
//! Study material browser TUI

use std::{
    io::{self, Stdout},
    panic::PanicHookInfo,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use edunav_core::{
    Logger,
    config::Config,
    controller::{
        action_dispatcher::{ActionDispatcher, DispatchResult},
        actions::Action,
        event_loop::{EventLoop, TaskResult},
        voice::{line_transcripts, spawn_transcript_forwarder},
    },
    model::{app_state::AppState, preferences::Preferences, ui_state::UIState},
    provider::{data_provider::DataProvider, sheets::SheetsProvider},
    view::{
        snapshots::{UiSnapshot, ViewSnapshot},
        ui::UIRenderer,
    },
};
use edunav_prefs::{FileStore, PersistenceConfig};

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    setup_panic_handler();

    let (config, origin) = match Config::load().await {
        Ok((config, origin)) => (config, Ok(origin)),
        Err(e) => (Config::default(), Err(e)),
    };
    let log_dir = config.log_dir()?;
    let _log_guard: WorkerGuard = Logger::init_tracing(&config.logging, &log_dir)?;
    info!("Starting edunav");
    match origin {
        Ok(origin) => origin.report(),
        Err(e) => warn!("Failed to load config, using defaults: {e:#}"),
    }

    let app = App::new(config)
        .await
        .context("Failed to initialize application")?;
    app.run().await.context("Application runtime error")?;

    info!("Application exited cleanly");
    Ok(())
}

struct App {
    terminal: AppTerminal,
    event_loop: EventLoop,
    dispatcher: ActionDispatcher,
    renderer: UIRenderer,
    state: AppState,
    ui: UIState,
    cancel: CancellationToken,
    last_title: Option<String>,
    slow_frames: u32,
}

impl App {
    async fn new(config: Config) -> Result<Self> {
        let prefs_path = Config::prefs_path()?;
        let store = FileStore::open(prefs_path, PersistenceConfig::default())
            .context("Failed to open preference store")?;
        let state = AppState::new(Preferences::new(store), config.features.clone());

        let (task_tx, task_rx) = mpsc::unbounded_channel::<TaskResult>();
        let (action_tx, action_rx) = mpsc::unbounded_channel::<Action>();

        let provider: Arc<dyn DataProvider> = Arc::new(
            SheetsProvider::new(config.provider.clone()).context("Failed to build HTTP client")?,
        );
        let dispatcher = ActionDispatcher::new(
            provider,
            config.provider.request_timeout,
            config.ui.opener_cmd.clone(),
            task_tx,
        );

        let cancel = CancellationToken::new();
        if let Some(path) = config.ui.transcript_source.clone() {
            match line_transcripts(path).await {
                Ok(lines) => {
                    spawn_transcript_forwarder(lines, action_tx.clone(), cancel.clone());
                }
                Err(e) => warn!("Transcript source unavailable: {e}"),
            }
        }

        let event_loop = EventLoop::new(task_rx, action_rx, config.ui.tick_rate);

        let mut ui = UIState::new();
        dispatcher.spawn_load(&mut ui);

        let terminal = setup_terminal().context("Failed to initialize terminal")?;
        info!("Application initialized successfully");

        Ok(Self {
            terminal,
            event_loop,
            dispatcher,
            renderer: UIRenderer::new(),
            state,
            ui,
            cancel,
            last_title: None,
            slow_frames: 0,
        })
    }

    async fn run(mut self) -> Result<()> {
        info!("Starting event loop");

        loop {
            self.render()?;

            let action = self.event_loop.next_action(self.ui.overlay).await;
            debug!("Dispatching action: {:?}", action);

            if self.dispatcher.handle(action, &mut self.state, &mut self.ui)
                == DispatchResult::Terminate
            {
                info!("Quit requested");
                break;
            }
        }

        self.cancel.cancel();
        info!(
            "Frames drawn: {}, slow frames: {}, fps: {:.1}",
            self.renderer.stats().frames,
            self.slow_frames,
            self.renderer.stats().fps()
        );
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        if !self.ui.needs_redraw() {
            return Ok(());
        }

        let start = Instant::now();
        let view = ViewSnapshot::capture(&self.state, &self.ui);
        let overlay = UiSnapshot::from(&self.ui);
        let loading = self.ui.loading.as_ref();
        let renderer = &mut self.renderer;

        self.terminal
            .draw(|frame: &mut Frame<'_>| renderer.render(frame, &view, &overlay, loading))
            .context("Failed to draw terminal")?;

        self.ui.clear_redraw();
        self.ui.increment_frame();

        if let Some(meta) = &view.page_meta
            && self.last_title.as_deref() != Some(meta.title.as_str())
        {
            execute!(self.terminal.backend_mut(), SetTitle(&meta.title))
                .context("Failed to set terminal title")?;
            self.last_title = Some(meta.title.clone());
        }

        let duration: Duration = start.elapsed();
        if duration.as_millis() > 16 {
            self.slow_frames += 1;
            warn!("Slow render: {}ms (target: <16ms)", duration.as_millis());
        }
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Err(e) = cleanup_terminal(&mut self.terminal) {
            warn!("Failed to cleanup terminal: {}", e);
        }
    }
}

fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    info!("Terminal setup complete");
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    info!("Terminal cleanup complete");
    Ok(())
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}

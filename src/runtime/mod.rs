use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::cli::{Cli, CtlRequest};
use crate::library::scan;
use crate::logging;
use crate::mpris;
use crate::notification::{NullPresenter, Presenter};
use crate::player::Player;
use crate::relay::Relay;

mod event_loop;
mod settings;
mod startup;

pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_problem) = settings::load_settings();

    match logging::init(&settings.logging) {
        Ok(path) => info!(log = %path.display(), "tonearm starting"),
        Err(e) => eprintln!("tonearm: logging disabled: {e}"),
    }
    if let Some(problem) = config_problem {
        warn!("{problem}; using defaults");
    }

    let dir = startup::resolve_dir(cli.dir, &settings.library);
    let tracks = scan(&dir, &settings.library);
    info!(count = tracks.len(), dir = %dir.display(), "catalog scanned");

    let mpris_enabled = settings.mpris.enabled;
    let bus_suffix = settings.mpris.bus_suffix.clone();
    let player = Player::rodio(&settings.playback, move |tx| -> Box<dyn Presenter + Send> {
        if mpris_enabled {
            Box::new(mpris::spawn_mpris(Relay::new(tx), &bus_suffix))
        } else {
            Box::new(NullPresenter)
        }
    })
    .map_err(crate::error::Error::from)?;

    let mut app = App::new(tracks);
    app.set_current_dir(dir.display().to_string());
    app.set_playback_handle(player.info());
    app.set_toast_duration(std::time::Duration::from_secs(settings.ui.toast_seconds));

    startup::seed_player(&app, &player.sender(), cli.open.as_deref());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            &mut terminal,
            &settings,
            &dir,
            &mut app,
            &player.sender(),
            &mut state,
        )
    })();

    player.quit();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("tonearm stopped");
    run_result
}

/// `tonearm ctl ...`: deliver one request to a running instance over the session bus.
pub fn ctl(request: CtlRequest) -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_problem) = settings::load_settings();
    if let Some(problem) = config_problem {
        eprintln!("tonearm: {problem}; using defaults");
    }
    let suffix = settings.mpris.bus_suffix.as_str();

    match (&request, request.action()) {
        (CtlRequest::Open { locator }, _) => mpris::send_open(suffix, locator)?,
        (_, Some(action)) => mpris::send_action(suffix, action)?,
        (_, None) => {}
    }
    Ok(())
}

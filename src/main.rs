// Copyright (c) 2026 rezky_nightky

mod cell;
mod charset;
mod column;
mod config;
mod engine;
mod error;
mod frame;
mod glyph;
mod palette;
mod pool;
mod runtime;
mod scheduler;
mod surface;
mod terminal;

use std::fs::File;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::{print_list_charsets, print_list_colors, Args, Settings, DEFAULT_PARAMS_USAGE};
use crate::engine::Engine;
use crate::error::{RainError, Result};
use crate::frame::Frame;
use crate::scheduler::{FrameDriver, FrameScheduler, StopHandle};
use crate::terminal::{restore_terminal_best_effort, stderr_outside_raw_mode, Terminal};

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let _ = match log_file {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .try_init(),
        None => builder.with_writer(stderr_outside_raw_mode).try_init(),
    };
    Ok(())
}

fn install_stop_signals(stop: &StopHandle) {
    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            let stop = stop.clone();
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    info!(signal = sig, "stop requested by signal");
                    stop.stop();
                }
            });
        }
    }

    #[cfg(windows)]
    {
        let stop = stop.clone();
        if let Err(e) = ctrlc::set_handler(move || stop.stop()) {
            warn!(error = %e, "failed to install Ctrl-C handler");
        }
    }
}

/// Terminal host: feeds resize and quit events to the engine and presents
/// every painted frame.
struct App {
    engine: Engine<Frame>,
    term: Terminal,
    screensaver: bool,
}

impl App {
    fn handle_event(&mut self, ev: Event, stop: &StopHandle) -> Option<(u16, u16)> {
        match ev {
            Event::Resize(w, h) => return Some((w, h)),
            Event::Key(k) if k.kind == KeyEventKind::Press => {
                let quit = self.screensaver
                    || matches!(k.code, KeyCode::Esc | KeyCode::Char('q'))
                    || (k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL));
                if quit {
                    stop.stop();
                }
            }
            _ => {}
        }
        None
    }
}

impl FrameDriver for App {
    type Error = RainError;

    fn idle(&mut self, timeout: Duration, stop: &StopHandle) -> Result<()> {
        let mut pending_resize = None;
        let mut wait = timeout;
        while Terminal::poll_event(wait)? {
            let ev = Terminal::read_event()?;
            if let Some(size) = self.handle_event(ev, stop) {
                pending_resize = Some(size);
            }
            wait = Duration::ZERO;
        }

        if let Some((w, h)) = pending_resize {
            self.engine.surface_mut().resize(w, h);
            self.engine.resize();
        }
        Ok(())
    }

    fn frame(&mut self) -> Result<()> {
        self.engine.frame()?;
        self.term.draw(self.engine.surface())?;
        Ok(())
    }
}

fn run() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(DEFAULT_PARAMS_USAGE);
    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_charsets {
        print_list_charsets();
        return Ok(());
    }

    if args.list_colors {
        print_list_colors();
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        let sha = env!("GLYPHRAIN_GIT_SHA");
        if sha.is_empty() {
            println!("Build: {}", env!("GLYPHRAIN_BUILD"));
        } else {
            println!("Build: {} ({})", env!("GLYPHRAIN_BUILD"), sha);
        }
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    let settings = Settings::from_args(&args)?;
    init_tracing(args.log_file.as_deref())?;

    if !std::io::stdout().is_terminal() {
        warn!(error = %RainError::HostHandleMissing, "not starting the rain");
        return Ok(());
    }

    let term = Terminal::new(settings.host.color_mode, settings.host.default_background)?;
    let (w, h) = term.size()?;
    let frame = Frame::new(w, h, settings.rain.glyph_size);
    let engine = Engine::new(frame, settings.rain)?;

    let mut scheduler = FrameScheduler::new(settings.host.fps).with_limit(settings.host.duration);
    install_stop_signals(&scheduler.stop_handle());

    let mut app = App {
        engine,
        term,
        screensaver: settings.host.screensaver,
    };
    let frames = scheduler.run(&mut app)?;
    info!(
        frames,
        rendered = app.engine.frames(),
        columns = app.engine.pool().len(),
        capacity = app.engine.thresholds().capacity,
        "rain finished"
    );
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        restore_terminal_best_effort();
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

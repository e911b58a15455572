use clap::Parser;
use color_eyre::Result;
use log::info;
use ratatui::DefaultTerminal;
use sensortui::{cli, App, AppConfig, AppEvent, CacheManager, ConfigManager, Theme, APP_NAME};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

fn run(mut terminal: DefaultTerminal, args: &cli::Args, config: AppConfig) -> Result<()> {
    let theme = Theme::from_config(&config.theme)
        .or_else(|e| Theme::from_config(&AppConfig::default().theme).map_err(|_| e))?;
    let poll_interval = Duration::from_millis(config.performance.event_poll_interval_ms);
    let source = cli::record_source(args, &config);

    let (tx, rx) = channel::<AppEvent>();
    let mut app = App::new_with_config(tx.clone(), source, theme, config);
    if args.debug {
        app.enable_debug();
    }
    if let Some(filter) = &args.filter {
        app.set_filter_text(filter);
    }
    render(&mut terminal, &mut app)?;
    tx.send(AppEvent::Fetch)?;

    loop {
        if crossterm::event::poll(poll_interval)? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) => {
                    if key.is_press() {
                        tx.send(AppEvent::Key(key))?
                    }
                }
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        if app.refresh_due(Instant::now()) {
            tx.send(AppEvent::Fetch)?;
        }

        let updated = match rx.recv_timeout(Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    AppEvent::Crash(msg) => {
                        return Err(color_eyre::eyre::eyre!(msg));
                    }
                    event => {
                        if let Some(event) = app.event(&event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => false,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
    Ok(())
}

fn handle_early_exit_flags(args: &cli::Args) -> Result<Option<()>> {
    if args.clear_cache {
        match CacheManager::new(APP_NAME) {
            Ok(cache) => {
                match cache.clear_all() {
                    Ok(removed) if removed.is_empty() => println!("No cache to clear"),
                    Ok(removed) => {
                        for path in removed {
                            println!("Removed {}", path.display());
                        }
                        println!("Cache cleared successfully");
                    }
                    Err(e) => {
                        eprintln!("Error clearing cache: {}", e);
                        std::process::exit(1);
                    }
                }
                return Ok(Some(()));
            }
            Err(_e) => {
                println!("No cache to clear");
                return Ok(Some(()));
            }
        }
    }

    if args.generate_config {
        match ConfigManager::new(APP_NAME) {
            Ok(manager) => match manager.write_default_config(args.force) {
                Ok(path) => {
                    println!("Wrote default configuration to {}", path.display());
                    return Ok(Some(()));
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Error initializing config manager: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(None)
}

fn load_config(args: &cli::Args) -> AppConfig {
    let mut config = match AppConfig::load(APP_NAME) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {}. Using default configuration.", e);
            AppConfig::default()
        }
    };
    cli::apply_overrides(args, &mut config);
    config
}

fn main() -> Result<()> {
    let args = cli::Args::parse();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    color_eyre::install()?;
    let config = load_config(&args);
    config.validate()?;

    if let Ok(cache) = CacheManager::new(APP_NAME) {
        match sensortui::init_logging(&config, &cache) {
            Ok(path) => info!(
                "{} {} logging to {}",
                APP_NAME,
                env!("CARGO_PKG_VERSION"),
                path.display()
            ),
            Err(e) => eprintln!("Warning: could not start logging: {}", e),
        }
    }

    let terminal = ratatui::init();
    let result = run(terminal, &args, config);
    ratatui::restore();
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

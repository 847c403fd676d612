use anyhow::Context;
use clap::Parser;
use velocity_arena::adapters::TerminalSurface;
use velocity_arena::config::Command;
use velocity_arena::core::format::CounterFormat;
use velocity_arena::core::gate::{GateOutcome, GuardDecision};
use velocity_arena::domain::model::ElementId;
use velocity_arena::domain::ports::PageSurface;
use velocity_arena::utils::{error::ErrorSeverity, logger, validation::Validate};
use velocity_arena::{
    AccessGuard, CliConfig, MemorySessionStore, PasswordGate, SiteConfig, SiteError, TimedCounter,
    TokioFrameClock,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let result = match cli.command {
        Command::Counter {
            target,
            duration,
            prefix,
            suffix,
            fps,
            separator,
        } => run_counter(target, duration, CounterFormat::new(prefix, suffix, separator), fps).await,
        Command::Validate { config } => validate_config(&config).map_err(anyhow::Error::from),
        Command::Gate { config, password } => run_gate(&config, &password).await,
    };

    if let Err(e) = result {
        if let Some(site_error) = e.downcast_ref::<SiteError>() {
            tracing::error!(
                "❌ {} (Category: {:?}, Severity: {:?})",
                site_error,
                site_error.category(),
                site_error.severity()
            );
            eprintln!("❌ {}", site_error.user_friendly_message());
            eprintln!("💡 Suggestion: {}", site_error.recovery_suggestion());

            let exit_code = match site_error.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            return Ok(());
        }
        return Err(e);
    }

    Ok(())
}

async fn run_counter(target: u64, duration_ms: i64, format: CounterFormat, fps: u32) -> anyhow::Result<()> {
    let surface = TerminalSurface;
    let element = ElementId::new("terminal");

    tracing::info!("🔢 Counting to {} over {}ms at {}fps", target, duration_ms, fps);
    let handle = TimedCounter::new(target, duration_ms).spawn(TokioFrameClock::new(fps), move |value| {
        surface.set_text(&element, &format.render(value))
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            handle.cancel();
            tracing::info!("Interrupted, cancelling counter");
        }
        _ = handle.settled() => {}
    }

    let outcome = handle.finished().await?;
    println!();
    tracing::info!("✅ Counter finished: {:?}", outcome);
    Ok(())
}

fn validate_config(path: &str) -> velocity_arena::Result<()> {
    tracing::info!("📁 Loading configuration from: {}", path);
    let config = SiteConfig::from_file(path)?;
    config.validate()?;

    println!("✅ Configuration is valid");
    println!(
        "  counter: {}ms default, threshold {}, separator '{}'",
        config.counter.default_duration_ms, config.counter.threshold, config.counter.separator
    );
    println!("  frames: {}fps", config.frames.fps);
    println!(
        "  reveal: .{} -> .{} at {}",
        config.reveal.animate_class, config.reveal.visible_class, config.reveal.threshold
    );
    println!(
        "  navigation: offset {}px, active .{}",
        config.navigation.nav_offset, config.navigation.active_class
    );
    println!(
        "  gate: {} -> {} ({}h, password {})",
        config.gate.login_page,
        config.gate.redirect_to,
        config.gate.session_hours,
        if config.gate.password.is_some() { "set" } else { "not set" }
    );
    Ok(())
}

async fn run_gate(path: &str, password: &str) -> anyhow::Result<()> {
    let config = SiteConfig::from_file(path).with_context(|| format!("loading {}", path))?;
    config.validate()?;

    let store = MemorySessionStore::new();
    let gate = PasswordGate::new(&config.gate, store.clone())?;
    let guard = AccessGuard::new(&config.gate, store);

    match gate.submit(password, chrono::Utc::now()).await? {
        GateOutcome::Empty { message } | GateOutcome::Denied { message } => {
            println!("🔒 {}", message);
        }
        GateOutcome::Granted { message, redirect } => {
            println!("🔓 {}", message);
            println!("➡️  {} (after {:?})", redirect.to, redirect.after);
        }
    }

    match guard.check(chrono::Utc::now()) {
        GuardDecision::Allow => println!("Protected pages: allowed"),
        GuardDecision::Redirect(redirect) => println!("Protected pages: redirect to {}", redirect.to),
    }
    Ok(())
}

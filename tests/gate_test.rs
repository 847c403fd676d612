use anyhow::Result;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use std::time::Duration;
use velocity_arena::config::{GateConfig, SiteConfig};
use velocity_arena::core::gate::{GateOutcome, GuardDecision};
use velocity_arena::domain::ports::SessionStore;
use velocity_arena::{AccessGuard, MemorySessionStore, PasswordGate, SiteError};

fn gate_config() -> GateConfig {
    let config = SiteConfig::from_toml_str(
        r#"
[gate]
password = "velocity2025"
"#,
    )
    .unwrap();
    config.gate
}

fn launch_day() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_correct_password_grants_session() -> Result<()> {
    let config = gate_config();
    let store = MemorySessionStore::new();
    let gate = PasswordGate::new(&config, store.clone())?;
    let guard = AccessGuard::new(&config, store.clone());

    assert!(matches!(guard.check(launch_day()), GuardDecision::Redirect(_)));
    assert!(gate.check(launch_day()).is_none());

    let started = tokio::time::Instant::now();
    let outcome = gate.submit("  velocity2025 ", launch_day()).await?;
    assert!(started.elapsed() >= Duration::from_millis(500));

    let (message, redirect) = match outcome {
        GateOutcome::Granted { message, redirect } => (message, redirect),
        other => panic!("expected access, got {:?}", other),
    };
    assert_eq!(message, config.messages.success);
    assert_eq!(redirect.to, "apresentacao.html");
    assert_eq!(redirect.after, Duration::from_millis(800));

    assert_eq!(guard.check(launch_day()), GuardDecision::Allow);
    let redirect = gate.check(launch_day() + ChronoDuration::hours(23)).unwrap();
    assert_eq!(redirect.to, "apresentacao.html");
    assert_eq!(redirect.after, Duration::ZERO);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_wrong_and_empty_passwords() -> Result<()> {
    let config = gate_config();
    let store = MemorySessionStore::new();
    let gate = PasswordGate::new(&config, store.clone())?;

    let started = tokio::time::Instant::now();
    let outcome = gate.submit("   ", launch_day()).await?;
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(
        outcome,
        GateOutcome::Empty {
            message: config.messages.empty.clone()
        }
    );

    let outcome = gate.submit("velocity2024", launch_day()).await?;
    assert_eq!(
        outcome,
        GateOutcome::Denied {
            message: config.messages.invalid.clone()
        }
    );
    assert!(store.is_empty());
    assert!(!gate.is_authenticated(launch_day()));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_expired_session_is_removed() -> Result<()> {
    let config = gate_config();
    let store = MemorySessionStore::new();
    let gate = PasswordGate::new(&config, store.clone())?;
    let guard = AccessGuard::new(&config, store.clone());

    gate.submit("velocity2025", launch_day()).await?;
    assert!(!store.is_empty());

    let next_day = launch_day() + ChronoDuration::hours(24);
    match guard.check(next_day) {
        GuardDecision::Redirect(redirect) => assert_eq!(redirect.to, "index.html"),
        GuardDecision::Allow => panic!("session should have expired"),
    }
    assert!(store.is_empty());
    Ok(())
}

#[test]
fn test_malformed_session_is_rejected_but_kept() {
    let config = gate_config();
    let store = MemorySessionStore::new();
    store.set_item(&config.storage_key, "not json");
    let guard = AccessGuard::new(&config, store.clone());

    assert!(matches!(guard.check(launch_day()), GuardDecision::Redirect(_)));
    assert_eq!(store.get_item(&config.storage_key).as_deref(), Some("not json"));
}

#[tokio::test(start_paused = true)]
async fn test_logout_clears_session() -> Result<()> {
    let config = gate_config();
    let store = MemorySessionStore::new();
    let gate = PasswordGate::new(&config, store.clone())?;

    gate.submit("velocity2025", launch_day()).await?;
    assert!(gate.is_authenticated(launch_day()));

    let redirect = gate.logout();
    assert_eq!(redirect.to, "index.html");
    assert!(store.is_empty());
    assert!(!gate.is_authenticated(launch_day()));
    Ok(())
}

#[test]
fn test_gate_requires_password() {
    let err = PasswordGate::new(&GateConfig::default(), MemorySessionStore::new()).err();
    assert!(matches!(err, Some(SiteError::MissingConfigError { .. })));
}

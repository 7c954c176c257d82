//! Progress commands: status, record, journal, stats.

use chrono::Utc;
use musafir_core::error::Result;
use musafir_core::{Config, Notification};

use super::open_engine;

pub fn status(config: &Config, json: bool) -> Result<()> {
    let engine = open_engine(config);
    if json {
        println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        return Ok(());
    }
    println!("Level:  {}", engine.level());
    println!("Points: {}", engine.points());
    println!(
        "Mirror: {}% ({})",
        engine.gauge_value(),
        engine.gauge_band().as_str()
    );
    match engine.points_to_next_level() {
        Some(remaining) => println!("Next level in {remaining} points"),
        None => println!("Final level reached"),
    }
    Ok(())
}

pub fn record(config: &Config, task: &str, reflection: &str) -> Result<()> {
    let mut engine = open_engine(config);
    let result = engine.record_effort_by_key(task, reflection)?;

    // A zero duration disables the confirmation as surely as `enabled = false`.
    if config.notifications.enabled && config.notifications.duration_secs > 0 {
        let notification = Notification::new(
            result.confirmation.clone(),
            Utc::now(),
            config.notifications.duration_secs,
        );
        eprintln!("{}", notification.message);
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub fn journal(config: &Config, json: bool, limit: Option<usize>) -> Result<()> {
    let engine = open_engine(config);
    let entries = engine.journal();
    let shown = &entries[..limit.unwrap_or(entries.len()).min(entries.len())];

    if json {
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }
    if shown.is_empty() {
        println!("No experience recorded yet.");
        return Ok(());
    }
    for entry in shown {
        println!(
            "{}  {}",
            entry.display_timestamp(&config.journal.timestamp_format),
            entry.task_text
        );
        println!("    \"{}\"", entry.content);
        println!("    +{} points", entry.points_awarded);
    }
    Ok(())
}

pub fn stats(config: &Config) -> Result<()> {
    let engine = open_engine(config);
    println!("{}", serde_json::to_string_pretty(&engine.stats())?);
    Ok(())
}

use musafir_core::error::Result;
use musafir_core::{Catalog, Config};

use super::open_engine;

pub fn tasks(json: bool) -> Result<()> {
    let tasks = Catalog::new().list_tasks();
    if json {
        println!("{}", serde_json::to_string_pretty(tasks)?);
        return Ok(());
    }
    for task in tasks {
        println!(
            "{:>2}  {:<55} +{:<3} {}",
            task.id, task.text, task.points, task.category
        );
    }
    Ok(())
}

pub fn stages(config: &Config, json: bool) -> Result<()> {
    let engine = open_engine(config);
    let stages = engine.stages();
    if json {
        println!("{}", serde_json::to_string_pretty(&stages)?);
        return Ok(());
    }
    for status in &stages {
        let lock = if status.unlocked { "" } else { "  [locked]" };
        println!("{}{}", status.stage.name, lock);
        println!("    {}", status.stage.description);
    }
    Ok(())
}

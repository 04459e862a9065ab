//! Protocol inspection command.

use crate::composer;
use crate::model::Field;

/// Print the protocol `mode` compiles to
pub fn cmd_protocol(mode: &str) -> anyhow::Result<()> {
    let protocol = composer::compile(mode, None, None)?;

    println!("Protocol: {}", protocol.mode);
    println!("=========");
    println!("BPM:              {}", protocol.bpm_range);
    println!(
        "Vocals:           {}",
        if protocol.allow_vocals { "allowed" } else { "not allowed" }
    );
    match protocol.required_key_quality {
        Some(quality) => println!("Key:              {} only", quality),
        None => println!("Key:              any"),
    }
    let excluded: Vec<&str> = protocol.excluded_version_tags.iter().map(|t| t.as_str()).collect();
    if excluded.is_empty() {
        println!("Excluded tags:    none");
    } else {
        println!("Excluded tags:    {}", excluded.join(", "));
    }
    if let Some(ceiling) = protocol.max_distraction_score {
        println!("Max distraction:  {}", ceiling);
    }
    let fields: Vec<&str> = protocol.required_fields().into_iter().map(Field::as_str).collect();
    println!("Required fields:  {}", fields.join(", "));
    println!("Seed genres:      {}", protocol.mode.default_genres().join(", "));
    Ok(())
}

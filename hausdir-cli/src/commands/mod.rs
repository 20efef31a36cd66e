pub mod area;
pub mod show;
pub mod subtask;
pub mod tasks;

use anyhow::Result;

/// Subtask numbers on the command line start at 1.
pub fn subtask_index(number: usize) -> Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("Subtask numbers start at 1"))
}

/// Print `value` as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

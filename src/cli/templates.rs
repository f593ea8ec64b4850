//! `infogen templates` command implementation.

use crate::error::Result;
use crate::template::TEMPLATES;

/// Print the template catalog.
///
/// Templates marked `*` are described to the model in the system prompt.
///
/// # Errors
///
/// Never fails; returns `Result` for consistency with other commands.
pub fn run() -> Result<()> {
    println!("{:<42} Name", "ID");
    println!("{}", "─".repeat(80));

    for template in TEMPLATES {
        let id = if template.id.is_empty() {
            "(none)"
        } else {
            template.id
        };
        let marker = if template.in_prompt { "*" } else { " " };
        println!("{marker}{id:<41} {}", template.label);
    }

    println!("{}", "─".repeat(80));
    println!("Use with: infogen generate --template <ID> \"your prompt\"");

    Ok(())
}

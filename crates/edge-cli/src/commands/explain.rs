//! `edge explain`: a readable summary of the resolved settings.

use edge_preset::Resolution;

use crate::cli::ExplainArgs;
use crate::error::Result;
use crate::ui;

use super::resolve_selection;

/// Execute the explain command.
///
/// # Errors
///
/// Same as `edge resolve`, minus output file failures.
pub fn execute(args: ExplainArgs) -> Result<()> {
    let resolution = resolve_selection(&args.selection)?;
    println!("{}", render(&resolution));
    Ok(())
}

/// Summary lines for a resolution.
pub fn render(resolution: &Resolution) -> String {
    let options = &resolution.options;
    let class = options
        .target_class
        .map(|c| c.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let mut lines = vec![
        ui::heading("Settings"),
        ui::field("env", &options.env),
        ui::field("production", options.is_production),
        ui::field("target", format!("{} ({class})", options.target)),
        ui::field("env targets", &options.env_targets),
        ui::field("modules", options.modules),
        ui::field("compliance", options.compliance()),
        ui::field("async", options.rewrite_async),
        ui::field("imports", options.imports),
        ui::field("comments", resolution.config.comments),
        String::new(),
        ui::heading("Presets"),
    ];
    lines.extend(resolution.config.presets.iter().map(|p| format!("  {}", p.name())));
    lines.push(String::new());
    lines.push(ui::heading("Plugins"));
    lines.extend(resolution.config.plugins.iter().map(|p| format!("  {}", p.name())));

    lines.join("\n")
}

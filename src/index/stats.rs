use crate::index::build::build_index;
use crate::index::types::Index;
use crate::utils::progress::{ProgressBar, ProgressStyle};
use anyhow::{Context, Result};
use std::path::Path;
use std::time::{Duration, Instant};

/// Build the index for `path` and print its statistics
pub fn show_stats(path: &Path) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid spinner template")?,
    );
    spinner.set_message(format!("Indexing {}...", path.display()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let started = Instant::now();
    let result = build_index(path);
    let elapsed = started.elapsed();
    spinner.finish_and_clear();

    let index = result.with_context(|| format!("Failed to index {}", path.display()))?;
    print!("{}", render_stats(path, &index, elapsed));
    Ok(())
}

/// Format index statistics as printed by `show_stats`
pub fn render_stats(path: &Path, index: &Index, elapsed: Duration) -> String {
    let mut out = String::new();
    out.push_str("Index Statistics\n");
    out.push_str("================\n\n");
    out.push_str(&format!("Source:           {}\n", path.display()));
    out.push_str(&format!("Record count:     {}\n", index.len()));
    out.push_str(&format!("Column count:     {}\n", index.schema().len()));
    out.push_str(&format!("Rendered size:    {}\n", format_size(index.rendered_bytes() as u64)));
    out.push_str(&format!("Build time:       {:.1} ms\n", elapsed.as_secs_f64() * 1000.0));

    out.push_str("\nColumns:\n");
    let id_position = index.schema().id_position();
    for (i, column) in index.schema().columns().iter().enumerate() {
        let marker = if i == id_position { " (key)" } else { "" };
        out.push_str(&format!("  {:>3}  {}{}\n", i + 1, column, marker));
    }

    out
}

/// Format byte size to human readable
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

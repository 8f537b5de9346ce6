//! Portable exports: history logs as JSON, the latest snapshot as CSV.

use std::fs;
use std::path::Path;

use scribestats_core::StatsSnapshot;
use scribestats_store::{HistoryStore, PERSONAL_STATS};

pub(crate) fn run_export_history(
    store: &HistoryStore,
    log: &str,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let entries = store.export_all(log)?;
    let raw = serde_json::to_string_pretty(&entries)?;
    match output {
        Some(path) => {
            fs::write(path, raw)?;
            println!("exported {} entries to {}", entries.len(), path.display());
        }
        None => println!("{raw}"),
    }
    Ok(())
}

pub(crate) fn run_import_history(
    store: &HistoryStore,
    log: &str,
    input: &Path,
) -> anyhow::Result<()> {
    let raw = fs::read_to_string(input)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", input.display()))?;
    let count = store.import_all(log, &raw)?;
    println!("imported {count} entries into log '{log}'");
    Ok(())
}

pub(crate) fn run_export_csv(store: &HistoryStore, output: Option<&Path>) -> anyhow::Result<()> {
    let entries = store.read(PERSONAL_STATS)?;
    let Some(latest) = entries.last() else {
        anyhow::bail!("no snapshots recorded yet; run a refresh first");
    };
    let snapshot: StatsSnapshot = serde_json::from_value(latest.data.clone())?;
    let csv = snapshot_to_csv(&snapshot);
    match output {
        Some(path) => {
            fs::write(path, csv)?;
            println!(
                "exported {} articles to {}",
                snapshot.articles.len(),
                path.display()
            );
        }
        None => print!("{csv}"),
    }
    Ok(())
}

/// Renders a snapshot's article table as CSV, articles in stored order.
/// Fields containing commas, quotes, or newlines are quoted with internal
/// quotes doubled.
fn snapshot_to_csv(snapshot: &StatsSnapshot) -> String {
    let mut csv = String::from("title,views,reads,readPercent,fans,claps,comments,earnings\n");
    for article in &snapshot.articles {
        let row = [
            csv_field(&article.title),
            article.views.map_or_else(String::new, |n| n.to_string()),
            article.reads.map_or_else(String::new, |n| n.to_string()),
            format!("{:.1}", article.read_rate()),
            article.fans.to_string(),
            article.claps.to_string(),
            article.comments.to_string(),
            csv_field(&article.earnings.to_string()),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }
    csv
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

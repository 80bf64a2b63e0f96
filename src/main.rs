use anyhow::{Context, Result};
use clap::Parser;

use schulte_trainer::{
    args::Args,
    db::{self, RecordStore},
    engine::EngineConfig,
    logging,
    record::HistoryRecord,
    session::format_time,
    stats::{HistoryStats, ModeStats},
    ui,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let data_dir = db::get_data_dir()?;
    let _log_guard = logging::init_file_logging(&data_dir.join("logs"))?;

    let db_path = match args.db.clone() {
        Some(path) => path,
        None => db::get_db_path()?,
    };
    tracing::info!("Using database {}", db_path.display());

    let pool = db::create_pool(&db_path).await?;
    let store = RecordStore::open(pool).await;

    if args.is_report() {
        return print_report(&args, &store);
    }

    let config = EngineConfig {
        seed: args.seed,
        ..EngineConfig::default()
    };
    ui::run_ui(store, config, args.mode)
}

fn print_report(args: &Args, store: &RecordStore) -> Result<()> {
    let stats = store.stats();
    let recent: Vec<&HistoryRecord> = store
        .history()
        .iter()
        .take(args.history.unwrap_or(0))
        .collect();

    if args.json {
        let mut report = serde_json::Map::new();
        if args.stats {
            report.insert("stats".into(), serde_json::to_value(&stats)?);
        }
        if args.history.is_some() {
            report.insert("history".into(), serde_json::to_value(&recent)?);
        }
        let text = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
        println!("{text}");
        return Ok(());
    }

    if args.stats {
        print_stats(&stats);
    }

    for record in recent {
        let comparison = record
            .comparison
            .as_ref()
            .map(|c| format!(" [{} {}s vs #{}]", c.improvement.as_str(), c.time_diff, c.original_id))
            .unwrap_or_default();
        println!(
            "#{:<5} {}  {:<9} {:<8} {:>7}{}",
            record.id,
            record.record.timestamp.format("%Y-%m-%d %H:%M"),
            record.record.mode_display,
            record.record.outcome,
            format_time(record.record.time_used),
            comparison
        );
    }

    Ok(())
}

fn print_stats(stats: &HistoryStats) {
    println!(
        "sessions: {}  success: {}  fail: {}  timeout: {}",
        stats.total, stats.success, stats.fail, stats.timeout
    );
    println!(
        "average: {}  best: {}  worst: {}",
        fmt_time(stats.average_time),
        fmt_time(stats.best_time),
        fmt_time(stats.worst_time)
    );
    print_mode_stats("countdown", &stats.countdown);
    print_mode_stats("unlimited", &stats.unlimited);
}

fn print_mode_stats(label: &str, stats: &ModeStats) {
    println!(
        "{label}: {} sessions, {} success, average {}, best {}",
        stats.total,
        stats.success,
        fmt_time(stats.average_time),
        fmt_time(stats.best_time)
    );
}

fn fmt_time(time: Option<f64>) -> String {
    time.map(format_time).unwrap_or_else(|| "N/A".to_string())
}

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueHint};
use serde_json::{json, Value};

use crate::analytics::{
    color_map, daily_scores, distribution, emotion_frequency, heatmap, spectrum, trend,
    validate_window, AnalyticsConfig, Granularity,
};
use crate::ingest::{parse_batch, Batch};
use crate::log_info;
use crate::report::build_report;
use crate::settings::{AnalyticsSettings, SettingsStore};
use crate::utils::time::{parse_date, today_at};

const ENABLE_LOGS: bool = true;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Emotion-entry analytics: distributions, trends, co-occurrence and daily mood"
)]
pub struct Cli {
    /// JSON settings file holding default granularity, window and offset
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub settings: Option<PathBuf>,

    /// Entry batch (JSON array or dataset object); read from stdin when omitted
    #[arg(long, short, global = true, value_hint = ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Offset from UTC in minutes used to assign entries to calendar days
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub utc_offset: Option<i32>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// Number of trailing days (today inclusive) to score
    #[arg(long)]
    pub window: Option<u32>,

    /// Last day of the window, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub today: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Every view in one dashboard report
    Report {
        /// day, week or month
        #[arg(long)]
        granularity: Option<Granularity>,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// Emotion distribution ranked by frequency
    Frequency,

    /// Emotion × activity heatmap, with unknown categories included
    Heatmap,

    /// Per-period emotion counts
    Trend {
        /// day, week or month
        #[arg(long)]
        granularity: Option<Granularity>,
    },

    /// Emotions ordered by mean intra-day logging position
    Spectrum,

    /// Daily mood scores over a trailing window
    Mood {
        #[command(flatten)]
        window: WindowArgs,
    },

    /// Stable display colors for the given names
    Color {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Show or update the stored defaults
    Settings {
        #[arg(long)]
        granularity: Option<Granularity>,

        #[arg(long)]
        window: Option<u32>,

        /// Store a fixed offset in minutes instead of following the host
        #[arg(long, allow_negative_numbers = true)]
        offset: Option<i32>,

        /// Forget a stored offset and follow the host again
        #[arg(long, conflicts_with = "offset")]
        follow_host_offset: bool,
    },
}

fn host_offset_minutes() -> i32 {
    Local::now().offset().local_minus_utc() / 60
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read entries from {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read entries from stdin")?;
            Ok(buffer)
        }
    }
}

fn resolve_today(raw: Option<&str>, config: &AnalyticsConfig) -> Result<NaiveDate> {
    match raw {
        Some(raw) => parse_date(raw, "--today"),
        None => Ok(today_at(&config.offset()?)),
    }
}

fn apply_window(config: &mut AnalyticsConfig, window: &WindowArgs) -> Result<()> {
    if let Some(days) = window.window {
        config.window_days = validate_window(days)?;
    }
    Ok(())
}

/// Run one analysis command over an already-ingested batch.
pub fn analyse(command: &Command, batch: &Batch, config: &AnalyticsConfig) -> Result<Value> {
    let entries = &batch.entries;
    let mut config = config.clone();

    let value = match command {
        Command::Report {
            granularity,
            window,
        } => {
            if let Some(granularity) = granularity {
                config.granularity = *granularity;
            }
            apply_window(&mut config, window)?;
            let today = resolve_today(window.today.as_deref(), &config)?;
            serde_json::to_value(build_report(batch, &config, today))?
        }
        Command::Frequency => serde_json::to_value(distribution(&emotion_frequency(entries)))?,
        Command::Heatmap => serde_json::to_value(heatmap(entries))?,
        Command::Trend { granularity } => {
            let granularity = granularity.unwrap_or(config.granularity);
            serde_json::to_value(trend(entries, granularity))?
        }
        Command::Spectrum => serde_json::to_value(spectrum(entries))?,
        Command::Mood { window } => {
            apply_window(&mut config, window)?;
            let today = resolve_today(window.today.as_deref(), &config)?;
            serde_json::to_value(daily_scores(entries, config.window_days, today))?
        }
        Command::Color { names } => {
            serde_json::to_value(color_map(names.iter().map(String::as_str)))?
        }
        Command::Settings { .. } => {
            anyhow::bail!("`settings` does not analyse a batch")
        }
    };
    Ok(value)
}

fn update_settings(
    cli: &Cli,
    store: Option<&SettingsStore>,
    current: AnalyticsSettings,
) -> Result<Value> {
    let Command::Settings {
        granularity,
        window,
        offset,
        follow_host_offset,
    } = &cli.command
    else {
        return Ok(json!(current));
    };

    let mut next = current.clone();
    if let Some(granularity) = granularity {
        next.granularity = *granularity;
    }
    if let Some(window) = window {
        next.window_days = *window;
    }
    if let Some(offset) = offset {
        next.utc_offset_minutes = Some(*offset);
    }
    if *follow_host_offset {
        next.utc_offset_minutes = None;
    }

    if next != current {
        store
            .context("`settings` needs --settings <PATH> to save changes")?
            .update(next.clone())?;
    }
    Ok(serde_json::to_value(next)?)
}

pub fn execute(cli: Cli) -> Result<()> {
    let store = cli.settings.clone().map(SettingsStore::new).transpose()?;
    let settings = store
        .as_ref()
        .map(SettingsStore::settings)
        .unwrap_or_default();

    let output = match &cli.command {
        Command::Settings { .. } => update_settings(&cli, store.as_ref(), settings)?,
        Command::Color { .. } => analyse(&cli.command, &Batch::default(), &AnalyticsConfig::default())?,
        command => {
            let mut config = settings.to_config(host_offset_minutes());
            if let Some(offset) = cli.utc_offset {
                config.utc_offset_minutes = offset;
            }
            let raw = read_input(cli.input.as_ref())?;
            let batch = parse_batch(&raw, &config.offset()?)?;
            log_info!(
                "Analysing {} entries at UTC{:+}min",
                batch.entries.len(),
                config.utc_offset_minutes
            );
            analyse(command, &batch, &config)?
        }
    };

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn batch() -> Batch {
        let json = r#"[
            { "_id": "1", "createdAt": "2024-03-09T08:00:00Z", "emotion": { "name": "tired" }, "activity": { "name": "work" } },
            { "_id": "2", "createdAt": "2024-03-10T08:00:00Z", "emotion": { "name": "tired" } },
            { "_id": "3", "createdAt": "2024-03-10T18:00:00Z", "emotion": { "name": "joy" }, "activity": { "name": "gym" } }
        ]"#;
        parse_batch(json, &FixedOffset::east_opt(0).unwrap()).unwrap()
    }

    #[test]
    fn parses_subcommands_and_globals() {
        let cli = Cli::try_parse_from([
            "moodlens",
            "trend",
            "--granularity",
            "week",
            "--utc-offset",
            "-300",
            "--input",
            "entries.json",
        ])
        .unwrap();
        assert_eq!(cli.utc_offset, Some(-300));
        assert_eq!(cli.input, Some(PathBuf::from("entries.json")));
        match cli.command {
            Command::Trend { granularity } => assert_eq!(granularity, Some(Granularity::Week)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_granularity() {
        assert!(Cli::try_parse_from(["moodlens", "trend", "--granularity", "hourly"]).is_err());
    }

    #[test]
    fn mood_command_honours_window_and_today() {
        let command = Command::Mood {
            window: WindowArgs {
                window: Some(3),
                today: Some("2024-03-10".into()),
            },
        };
        let value = analyse(&command, &batch(), &AnalyticsConfig::default()).unwrap();
        let days = value["days"].as_array().unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days[2]["date"], "2024-03-10");
        assert_eq!(days[2]["score"], 0.5);
        assert!(days[0]["score"].is_null());
    }

    #[test]
    fn zero_window_is_rejected() {
        let command = Command::Mood {
            window: WindowArgs {
                window: Some(0),
                today: None,
            },
        };
        assert!(analyse(&command, &batch(), &AnalyticsConfig::default()).is_err());
    }

    #[test]
    fn oversized_window_is_rejected() {
        let command = Command::Mood {
            window: WindowArgs {
                window: Some(4_000_000_000),
                today: Some("2024-03-10".into()),
            },
        };
        let err = analyse(&command, &batch(), &AnalyticsConfig::default()).unwrap_err();
        assert!(err.to_string().contains("4000000000"));
    }

    #[test]
    fn out_of_range_offset_is_an_error() {
        let command = Command::Mood {
            window: WindowArgs::default(),
        };
        let config = AnalyticsConfig {
            utc_offset_minutes: 100_000,
            ..AnalyticsConfig::default()
        };
        assert!(analyse(&command, &batch(), &config).is_err());
    }

    #[test]
    fn color_command_needs_no_batch() {
        let command = Command::Color {
            names: vec!["joy".into(), "sad".into()],
        };
        let value = analyse(&command, &Batch::default(), &AnalyticsConfig::default()).unwrap();
        assert_eq!(value, json!({ "joy": "#d49b01", "sad": "#d6bb01" }));
    }

    #[test]
    fn frequency_command_ranks_rows() {
        let value = analyse(&Command::Frequency, &batch(), &AnalyticsConfig::default()).unwrap();
        assert_eq!(value[0]["emotion"], "tired");
        assert_eq!(value[0]["count"], 2);
        assert_eq!(value[1]["share"], 0.5);
    }
}

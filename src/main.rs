use campground_preview::{
    rate_card::{
        card::read_rate_card,
        pricing_preview::{preview_pricing, GuestContext},
    },
    site_map::base_map::{base_map_url, read_layout},
    staff_shift::{
        conflicts::{detect_conflicts, read_shifts},
        shift::ShiftStatus,
        summarize_shifts::summarize_shifts,
    },
};
use std::{io::Write, path::PathBuf};

use anyhow::{anyhow, Error};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "campground_preview",
    about = "Shift conflict checks and rate card previews for campground staff screens"
)]
struct Cli {
    /// IANA timezone of the park, used to read start and end instants as local times
    #[arg(long, env = "CAMPGROUND_TIMEZONE")]
    timezone: Option<String>,

    /// Write JSON results here instead of stdout
    #[arg(long, env = "CAMPGROUND_OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ids of shifts that overlap another shift of the same staff member
    Conflicts { shifts: PathBuf },
    /// Per staff member and week totals
    Summarize { shifts: PathBuf },
    /// Price a rate card for a hypothetical guest
    Preview {
        rate_card: PathBuf,
        #[arg(long)]
        metered: bool,
        #[arg(long)]
        pays_in_full: bool,
        #[arg(long)]
        payment_method: Option<String>,
    },
    /// Find the base image of a site map layout
    BaseMap { layout: PathBuf },
    /// Check a shift status change
    Transition {
        #[arg(long)]
        from: ShiftStatus,
        #[arg(long)]
        to: ShiftStatus,
    },
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let timezone = cli.timezone.as_deref().map(parse_timezone).transpose()?;

    let json = match cli.command {
        Command::Conflicts { shifts } => {
            let shifts = read_shifts(&shifts, timezone)?;
            let conflicts = detect_conflicts(&shifts);
            tracing::info!(shifts = shifts.len(), conflicts = conflicts.len(), "checked shifts");
            to_json(&conflicts)?
        }
        Command::Summarize { shifts } => {
            let shifts = read_shifts(&shifts, timezone)?;
            let summaries = summarize_shifts(&shifts);
            tracing::info!(shifts = shifts.len(), summaries = summaries.len(), "summarized shifts");
            to_json(&summaries)?
        }
        Command::Preview {
            rate_card,
            metered,
            pays_in_full,
            payment_method,
        } => {
            let card = read_rate_card(&rate_card)?;
            let guest = GuestContext {
                is_metered: metered,
                pays_in_full,
                payment_method,
            };
            let preview = preview_pricing(&card, &guest);
            tracing::info!(rate_card = %card.name, total = preview.total, "previewed rate card");
            to_json(&preview)?
        }
        Command::BaseMap { layout } => {
            let image = base_map_url(&read_layout(&layout)?);
            if image.is_none() {
                tracing::warn!(layout = %layout.display(), "no base map image in layout");
            }
            to_json(&image)?
        }
        Command::Transition { from, to } => {
            let status = from.transition(to)?;
            tracing::info!(%from, %to, "status change allowed");
            to_json(&status)?
        }
    };

    match cli.output {
        Some(path) => {
            let mut file = std::fs::File::create(&path)?;
            file.write_all(json.as_bytes())?;
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn parse_timezone(name: &str) -> Result<Tz, Error> {
    name.parse::<Tz>()
        .map_err(|err| anyhow!("unknown timezone {name}: {err}"))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(value)?)
}

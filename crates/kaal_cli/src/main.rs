use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{Duration, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use kaal_client::{
    ApiClient, ChartProfile, ClientConfig, DashaSource, DashaTimeline, HttpBackend, KpRequest,
    ProfileStore, load_dashboard, local_timeline,
};
use kaal_time::{UtcTime, parse_date, parse_utc};
use kaal_vedic_base::dasha::{
    DashaLevel, MAX_DASHA_LEVEL, active_chain, resolve_current_dasha, resolve_validated,
    timeline_segments, vimshottari_config, vimshottari_cycle, vimshottari_cycle_from_moon,
};
use kaal_vedic_base::{DashaPeriod, Graha};
use serde_json::{Value, json};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser)]
#[command(name = "kaal", about = "Vimshottari dasha timelines and chart backend client")]
struct Cli {
    /// Chart backend base URL (overrides KAAL_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Request timeout in seconds (overrides KAAL_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Profile file (overrides KAAL_PROFILE, default ./kaal_profile.json)
    #[arg(long, global = true)]
    profile: Option<PathBuf>,
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Vimshottari cycle, or resolve it at a date
    Dasha {
        /// Cycle start or birth moment, UTC (YYYY-MM-DD or ISO-8601)
        #[arg(long)]
        start: String,
        /// First mahadasha lord (full 120-year cycle from --start)
        #[arg(long, value_parser = parse_graha, required_unless_present = "moon_lon", conflicts_with = "moon_lon")]
        lord: Option<Graha>,
        /// Moon sidereal longitude at --start in degrees (lord and balance from its nakshatra)
        #[arg(long, allow_hyphen_values = true)]
        moon_lon: Option<f64>,
        /// Maximum dasha depth (0-4)
        #[arg(long, default_value = "1")]
        max_level: u8,
        /// Resolve the current period at this UTC date instead of listing the cycle
        #[arg(long)]
        at: Option<String>,
    },
    /// Current mahadasha and antardasha for the stored profile
    Current {
        /// Evaluation date, UTC (default now)
        #[arg(long)]
        at: Option<String>,
        /// Moon sidereal longitude at birth; generates locally instead of asking the backend
        #[arg(long, allow_hyphen_values = true)]
        moon_lon: Option<f64>,
    },
    /// Mahadasha timeline for the stored profile
    Timeline {
        /// Evaluation date, UTC (default now)
        #[arg(long)]
        at: Option<String>,
        /// Moon sidereal longitude at birth in degrees
        #[arg(long, allow_hyphen_values = true)]
        moon_lon: f64,
    },
    /// Show or change the stored chart profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Fetch every dashboard section for the stored profile
    Dashboard {
        /// Target date in the profile's timezone (default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Ask the AI backend about the stored profile
    Insight {
        /// Report context (general, dasha, period, ...)
        #[arg(long, default_value = "general")]
        context: String,
        /// Question for chat mode
        #[arg(long)]
        query: Option<String>,
        /// Moon sidereal longitude at birth; adds the local dasha summary
        #[arg(long, allow_hyphen_values = true)]
        moon_lon: Option<f64>,
    },
    /// KP cusps, significators and ruling planets for the stored profile
    Kp {
        /// KP horary number (1-249) for a prashna reading
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..=249))]
        horary: Option<u16>,
    },
    /// Search places by name
    Geo {
        /// Place name
        name: String,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print the active profile
    Show,
    /// Replace the active profile
    Set {
        #[arg(long)]
        name: String,
        /// Birth date (DD/MM/YYYY or YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Birth time (HH:MM, 24h)
        #[arg(long)]
        time: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// UTC offset (+HH:MM)
        #[arg(long, allow_hyphen_values = true)]
        tz: String,
    },
    /// Import a saved-chart JSON record as the active profile
    Import {
        /// Path to the saved chart
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let store = ProfileStore::resolve(cli.profile.as_deref());
    let config = client_config(cli.api_url, cli.timeout_secs);

    match cli.command {
        Commands::Dasha {
            start,
            lord,
            moon_lon,
            max_level,
            at,
        } => {
            let start_jd = parse_utc(&start)
                .with_context(|| format!("invalid --start {start:?}"))?
                .to_jd();
            let level = max_level.min(MAX_DASHA_LEVEL);
            let cfg = vimshottari_config();
            let periods = match (lord, moon_lon) {
                (Some(lord), _) => vimshottari_cycle(start_jd, lord, level, &cfg)?,
                (None, Some(moon)) => vimshottari_cycle_from_moon(start_jd, moon, level, &cfg)?,
                (None, None) => bail!("either --lord or --moon-lon is required"),
            };

            match at {
                Some(at) => {
                    let at_jd = parse_at(Some(at.as_str()))?;
                    println!("Vimshottari at {} (cycle from {})\n", at, start);
                    render::print_current(&resolve_current_dasha(&periods, at_jd), at_jd);
                    let chain = active_chain(&periods, at_jd);
                    if chain.len() > 2 {
                        println!();
                        render::print_chain(&chain);
                    }
                }
                None => {
                    println!("Vimshottari cycle from {} ({} levels)\n", start, level + 1);
                    render::print_tree(&periods);
                }
            }
        }

        Commands::Current { at, moon_lon } => {
            let at_jd = parse_at(at.as_deref())?;
            let profile = store.load_or_default();
            let timeline = profile_timeline(&profile, moon_lon, &config).await?;
            println!(
                "{} ({} {} {}), dasha {}\n",
                profile.name,
                profile.date,
                profile.time,
                profile.timezone,
                source_label(timeline.source)
            );
            render::print_current(&resolve_validated(&timeline.periods, at_jd), at_jd);
        }

        Commands::Timeline { at, moon_lon } => {
            let at_jd = parse_at(at.as_deref())?;
            let profile = store.load_or_default();
            let timeline = local_timeline(profile.birth_jd()?, moon_lon)?;
            println!("Mahadasha timeline for {}\n", profile.name);
            render::print_timeline(&timeline_segments(&timeline.periods, at_jd));
        }

        Commands::Profile { action } => match action {
            ProfileAction::Show => {
                let profile = match store.load()? {
                    Some(p) => p,
                    None => {
                        println!("(no profile at {}, showing default)", store.path().display());
                        ChartProfile::default()
                    }
                };
                render::print_profile(&profile);
            }
            ProfileAction::Set {
                name,
                date,
                time,
                location,
                lat,
                lon,
                tz,
            } => {
                let profile = ChartProfile {
                    name,
                    date,
                    time,
                    location,
                    latitude: lat,
                    longitude: lon,
                    timezone: tz,
                };
                profile.to_birth_details().context("profile rejected")?;
                store.save(&profile)?;
                println!("Saved profile to {}", store.path().display());
                render::print_profile(&profile);
            }
            ProfileAction::Import { path } => {
                let profile = store
                    .import(&path)
                    .with_context(|| format!("could not import {}", path.display()))?;
                println!("Imported profile to {}", store.path().display());
                render::print_profile(&profile);
            }
        },

        Commands::Dashboard { date } => {
            let profile = store.load_or_default();
            let target = target_local(&profile, date.as_deref())?;
            let api = ApiClient::new(HttpBackend::new(config)?);
            let dashboard = load_dashboard(&api, &profile, target).await?;
            let at_jd = profile_local_to_jd(&profile, target)?;
            render::print_dashboard(&profile, &dashboard, target, at_jd);
        }

        Commands::Insight {
            context,
            query,
            moon_lon,
        } => {
            let profile = store.load_or_default();
            let api = ApiClient::new(HttpBackend::new(config.clone())?);
            let mut data = json!({ "profile": profile_json(&profile) });
            match profile_timeline(&profile, moon_lon, &config).await {
                Ok(timeline) => {
                    data["summary"] = dasha_summary(&timeline.periods, UtcTime::now().to_jd());
                }
                Err(e) => warn!(error = %e, "sending insight request without dasha summary"),
            }
            let insight = api.ai_insight(&context, data, query.as_deref()).await?;
            println!("{insight}");
        }

        Commands::Kp { horary } => {
            let profile = store.load_or_default();
            let request = KpRequest {
                birth_details: profile.to_birth_details()?,
                horary_number: horary,
            };
            let api = ApiClient::new(HttpBackend::new(config)?);
            let kp = api.kp_astrology(&request).await?;
            match horary {
                Some(n) => println!("KP horary {n} for {}\n", profile.name),
                None => println!("KP chart for {}\n", profile.name),
            }
            render::print_kp(&kp);
        }

        Commands::Geo { name } => {
            let api = ApiClient::new(HttpBackend::new(config)?);
            let places = api.geo_search(&name).await?;
            if places.is_empty() {
                println!("No places match {name:?}");
            }
            for place in places {
                println!(
                    "{:<40} {:>9.4} {:>9.4}  {}",
                    place.name,
                    place.latitude,
                    place.longitude,
                    place.timezone.as_deref().unwrap_or("-")
                );
            }
        }
    }
    Ok(())
}

fn client_config(api_url: Option<String>, timeout_secs: Option<u64>) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(url) = api_url {
        config.base_url = url;
    }
    if let Some(secs) = timeout_secs.filter(|s| *s > 0) {
        config.timeout_secs = secs;
    }
    config
}

fn parse_graha(s: &str) -> Result<Graha, String> {
    s.parse::<Graha>().map_err(|e| e.to_string())
}

/// `--at` as JD UTC, defaulting to now.
fn parse_at(at: Option<&str>) -> Result<f64> {
    match at {
        Some(s) => Ok(parse_utc(s)
            .with_context(|| format!("invalid date {s:?}"))?
            .to_jd()),
        None => Ok(UtcTime::now().to_jd()),
    }
}

/// Dasha tree for the profile: local when the Moon is given, else from the backend.
async fn profile_timeline(
    profile: &ChartProfile,
    moon_lon: Option<f64>,
    config: &ClientConfig,
) -> Result<DashaTimeline> {
    let birth_jd = profile.birth_jd()?;
    if let Some(moon) = moon_lon {
        return Ok(local_timeline(birth_jd, moon)?);
    }
    let api = ApiClient::new(HttpBackend::new(config.clone())?);
    let birth = profile.to_birth_details()?;
    let (chart, dasha) = api.chart_and_dasha(&birth, birth_jd).await;
    if let Err(e) = chart {
        return Err(e).context("birth chart unavailable; pass --moon-lon to work offline");
    }
    Ok(dasha?)
}

/// Target moment in the profile's timezone: today or `date`, at the current clock time.
fn target_local(profile: &ChartProfile, date: Option<&str>) -> Result<NaiveDateTime> {
    let offset_minutes = profile.offset()?.minutes();
    let now_local = Utc::now().naive_utc() + Duration::minutes(offset_minutes as i64);
    match date {
        Some(d) => {
            let day = parse_date(d).with_context(|| format!("invalid --date {d:?}"))?;
            Ok(day.and_time(now_local.time()))
        }
        None => Ok(now_local),
    }
}

fn profile_local_to_jd(profile: &ChartProfile, local: NaiveDateTime) -> Result<f64> {
    let utc = local - Duration::minutes(profile.offset()?.minutes() as i64);
    Ok(UtcTime::from_naive(&utc).to_jd())
}

fn profile_json(profile: &ChartProfile) -> Value {
    json!({
        "name": profile.name,
        "date": profile.date,
        "time": profile.time,
        "location": profile.location,
        "timezone": profile.timezone,
    })
}

/// Backend-style summary: lord names of the active period at each level.
fn dasha_summary(periods: &[DashaPeriod], at_jd: f64) -> Value {
    let mut summary = serde_json::Map::new();
    for period in active_chain(periods, at_jd) {
        let key = match period.level {
            DashaLevel::Mahadasha => "current_mahadasha",
            DashaLevel::Antardasha => "current_antardasha",
            DashaLevel::Pratyantardasha => "current_pratyantardasha",
            _ => continue,
        };
        summary.insert(key.to_string(), json!(period.lord.english_name()));
    }
    Value::Object(summary)
}

fn source_label(source: DashaSource) -> &'static str {
    match source {
        DashaSource::Backend => "from backend",
        DashaSource::Local => "generated locally",
    }
}

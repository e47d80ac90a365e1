//! Plain-text output for the CLI commands.

use chrono::NaiveDateTime;
use kaal_client::wire::KpLords;
use kaal_client::{ChartProfile, ClientError, Dashboard, KpResponse, Panchang};
use kaal_time::format_jd_date;
use kaal_vedic_base::{CurrentDasha, DashaPeriod, TimelineSegment};

/// Periods listed per level before the rest are elided.
const MAX_LISTED: usize = 50;

/// Width of the timeline bar for a full 120-year cycle.
const BAR_WIDTH: usize = 60;

pub fn print_period(p: &DashaPeriod, indent: &str) {
    println!(
        "{}{}: {} ({} - {}, JD {:.4} - {:.4}, {:.1} days)",
        indent,
        p.level.name(),
        p.lord.english_name(),
        format_jd_date(p.start_jd),
        format_jd_date(p.end_jd),
        p.start_jd,
        p.end_jd,
        p.duration_days()
    );
}

/// Mahadashas with their nested sub-periods.
pub fn print_tree(periods: &[DashaPeriod]) {
    for p in periods.iter().take(MAX_LISTED) {
        print_subtree(p, 0);
    }
    if periods.len() > MAX_LISTED {
        println!("  ... and {} more periods", periods.len() - MAX_LISTED);
    }
}

fn print_subtree(p: &DashaPeriod, depth: usize) {
    print_period(p, &"  ".repeat(depth));
    for child in p.sub_periods.iter().take(MAX_LISTED) {
        print_subtree(child, depth + 1);
    }
    if p.sub_periods.len() > MAX_LISTED {
        println!(
            "{}  ... and {} more periods",
            "  ".repeat(depth + 1),
            p.sub_periods.len() - MAX_LISTED
        );
    }
}

/// Active period at each level, outermost first.
pub fn print_chain(chain: &[&DashaPeriod]) {
    for (depth, p) in chain.iter().enumerate() {
        print_period(p, &"  ".repeat(depth));
    }
}

pub fn print_current(cur: &CurrentDasha<'_>, at_jd: f64) {
    if cur.is_none() {
        println!(
            "No dasha period covers {} (JD {:.4})",
            format_jd_date(at_jd),
            at_jd
        );
        return;
    }
    match cur.mahadasha {
        Some(md) => print_period(md, ""),
        None => println!("Mahadasha: -"),
    }
    match cur.antardasha {
        Some(ad) => {
            print_period(ad, "  ");
            println!("  Progress: {:.1}%", cur.progress * 100.0);
        }
        None => println!("  Antardasha: -"),
    }
    match cur.next_antardasha {
        Some(next) => println!(
            "  Next: {} from {}",
            next.lord.english_name(),
            format_jd_date(next.start_jd)
        ),
        None => println!("  Next: -"),
    }
}

pub fn print_timeline(segments: &[TimelineSegment]) {
    for s in segments {
        let width = ((s.width_fraction * BAR_WIDTH as f64).round() as usize).max(1);
        let fill = if s.is_current { '#' } else { '=' };
        println!(
            "{:<8} {} - {} {:>5.1}y {}{}",
            s.lord.english_name(),
            format_jd_date(s.start_jd),
            format_jd_date(s.end_jd),
            s.duration_years,
            fill.to_string().repeat(width),
            if s.is_current { "  <- current" } else { "" }
        );
    }
}

pub fn print_profile(p: &ChartProfile) {
    println!("Name:      {}", p.name);
    println!("Birth:     {} {} ({})", p.date, p.time, p.timezone);
    println!("Location:  {}", p.location);
    println!("Lat/Lon:   {:.4}, {:.4}", p.latitude, p.longitude);
}

fn print_panchang(title: &str, section: &Result<Panchang, ClientError>) {
    println!("{title}");
    match section {
        Ok(p) => {
            let fields = [
                ("Day", &p.day_of_week),
                ("Tithi", &p.tithi),
                ("Nakshatra", &p.nakshatra),
                ("Yoga", &p.yoga),
                ("Karana", &p.karana),
                ("Sunrise", &p.sunrise),
                ("Sunset", &p.sunset),
            ];
            for (label, value) in fields {
                if let Some(v) = value {
                    println!("  {label:<10} {v}");
                }
            }
        }
        Err(e) => println!("  unavailable: {e}"),
    }
}

pub fn print_dashboard(
    profile: &ChartProfile,
    dash: &Dashboard,
    target: NaiveDateTime,
    at_jd: f64,
) {
    println!(
        "Dashboard for {} at {} ({})\n",
        profile.name,
        target.format("%Y-%m-%d %H:%M"),
        profile.timezone
    );

    print_panchang("Panchang", &dash.panchang);
    print_panchang("Birth panchang", &dash.birth_panchang);

    println!("Chart");
    match &dash.chart {
        Ok(chart) => {
            if let Some(asc) = chart.ascendant.as_ref().and_then(|a| a.sign.as_deref()) {
                println!("  Ascendant  {asc}");
            }
            for planet in &chart.planets {
                println!(
                    "  {:<10} {:>8.3}  {}",
                    planet.name,
                    planet.longitude,
                    planet.nakshatra.as_deref().unwrap_or("")
                );
            }
        }
        Err(e) => println!("  unavailable: {e}"),
    }

    println!("Dasha");
    match (&dash.dasha, dash.current_dasha(at_jd)) {
        (Ok(_), Some(cur)) => print_current(&cur, at_jd),
        (Err(e), _) => println!("  unavailable: {e}"),
        (Ok(_), None) => println!("  unavailable"),
    }

    println!("Ashtakvarga");
    match &dash.ashtakvarga {
        Ok(a) => println!("  {}", a.0),
        Err(e) => println!("  unavailable: {e}"),
    }

    println!("Period overview");
    match &dash.period_overview {
        Ok(o) => {
            if let Some(daily) = &o.daily_analysis {
                println!("  daily: {daily}");
            }
            for (key, value) in &o.sections {
                println!("  {key}: {value}");
            }
        }
        Err(e) => println!("  unavailable: {e}"),
    }

    let failed = dash.failed_sections();
    if !failed.is_empty() {
        println!("\n{} section(s) failed: {}", failed.len(), failed.join(", "));
    }
}

fn lords_line(lords: Option<&KpLords>) -> String {
    let Some(l) = lords else {
        return String::new();
    };
    [&l.sign_lord, &l.star_lord, &l.sub_lord, &l.sub_sub_lord]
        .iter()
        .map(|lord| lord.as_deref().unwrap_or("-"))
        .collect::<Vec<_>>()
        .join(" / ")
}

pub fn print_kp(kp: &KpResponse) {
    if let Some(ayanamsa) = &kp.ayanamsa {
        println!("Ayanamsa: {ayanamsa}\n");
    }
    println!("Cusps (sign / star / sub / sub-sub)");
    for cusp in &kp.cusps {
        println!(
            "  {:>2}  {:<12} {:<12} {}",
            cusp.house,
            cusp.sign.as_deref().unwrap_or(""),
            cusp.degree.as_deref().unwrap_or(""),
            lords_line(cusp.lords.as_ref())
        );
    }
    println!("Planets");
    for planet in &kp.planets {
        let retro = if planet.is_retrograde == Some(true) { " (R)" } else { "" };
        println!(
            "  {:<10} {:<12} {:<12} {}",
            format!("{}{retro}", planet.name),
            planet.sign.as_deref().unwrap_or(""),
            planet.degree.as_deref().unwrap_or(""),
            lords_line(planet.lords.as_ref())
        );
    }
    if let Some(rp) = &kp.ruling_planets {
        println!("Ruling planets");
        let fields = [
            ("Day lord", &rp.day_lord),
            ("Moon star", &rp.moon_star),
            ("Moon sign", &rp.moon_sign),
            ("Lagna star", &rp.lagna_star),
            ("Lagna sign", &rp.lagna_sign),
        ];
        for (label, value) in fields {
            if let Some(v) = value {
                println!("  {label:<11} {v}");
            }
        }
    }
}

use crate::model::{ServiceStatus, StatisticsSnapshot};
use crate::report::Snapshot;
use crate::toggle::ToggleOutcome;
use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

pub fn snapshot<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    console_url: &str,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => json(out, snapshot),
        OutputFormat::Pretty => {
            writeln!(out, "{}\n", "Pi-hole Statistics".red().bold().underline())?;
            writeln!(out, "Pi-hole admin console: {console_url}")?;
            writeln!(out, "Status: {}", status_label(snapshot.status))?;
            writeln!(out, "{}", gravity_line(&snapshot.statistics))?;
            writeln!(out, "{}", "---".blue())?;
            for (label, value) in counters(&snapshot.statistics) {
                let value = if value.is_empty() { "n/a" } else { value };
                writeln!(out, "{label}: {value}")?;
            }
            writeln!(out, "{}", "---".blue())?;
            Ok(())
        }
    }
}

pub fn status<W: Write>(out: &mut W, status: ServiceStatus, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => json(out, &serde_json::json!({ "status": status })),
        OutputFormat::Pretty => {
            writeln!(out, "Pi-hole status: {}", status_label(status))?;
            Ok(())
        }
    }
}

pub fn toggle<W: Write>(out: &mut W, outcome: &ToggleOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => json(out, outcome),
        OutputFormat::Pretty => {
            if !outcome.issued {
                writeln!(out, "{}", "No change needed.".dimmed())?;
            }
            writeln!(out, "Pi-hole status: {}", status_label(outcome.current))?;
            Ok(())
        }
    }
}

fn json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn status_label(status: ServiceStatus) -> String {
    match status {
        ServiceStatus::Enabled => "Enabled".green().to_string(),
        ServiceStatus::Disabled => "Disabled".red().to_string(),
    }
}

fn gravity_line(stats: &StatisticsSnapshot) -> String {
    let Some(relative) = stats.gravity_age() else {
        return "Gravity has not been updated yet".to_string();
    };
    match relative.parse() {
        Ok(age) => format!("Gravity last updated: {age}"),
        Err(e) => {
            log::warn!("unreadable gravity age {:?}: {}", relative, e);
            "Gravity last updated: unknown".to_string()
        }
    }
}

fn counters(stats: &StatisticsSnapshot) -> [(&'static str, &str); 9] {
    [
        ("Current unique clients", stats.unique_clients.as_str()),
        ("Total clients ever seen", stats.clients_ever_seen.as_str()),
        ("Domains being blocked", stats.domains_being_blocked.as_str()),
        ("Ads blocked today", stats.ads_blocked_today.as_str()),
        ("Ads percentage today", stats.ads_percentage_today.as_str()),
        ("DNS queries today", stats.dns_queries_today.as_str()),
        ("Queries cached today", stats.queries_cached.as_str()),
        ("Queries forwarded today", stats.queries_forwarded.as_str()),
        ("Unique domains today", stats.unique_domains.as_str()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GravityStatus, RelativeAge};

    fn plain() {
        colored::control::set_override(false);
    }

    fn sample(gravity: Option<GravityStatus>) -> Snapshot {
        Snapshot {
            status: ServiceStatus::Enabled,
            statistics: StatisticsSnapshot {
                unique_clients: "12".into(),
                ads_blocked_today: "340".into(),
                gravity_last_updated: gravity,
                ..Default::default()
            },
        }
    }

    fn render(snap: &Snapshot, format: OutputFormat) -> String {
        let mut buf = Vec::new();
        snapshot(&mut buf, snap, "http://pi.hole/admin", format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn pretty_snapshot_lists_counters_in_order() {
        plain();
        let snap = sample(Some(GravityStatus {
            file_exists: true,
            absolute: None,
            relative: Some(RelativeAge {
                days: "3".into(),
                hours: "4".into(),
                minutes: "10".into(),
            }),
        }));
        let text = render(&snap, OutputFormat::Pretty);

        assert!(text.starts_with("Pi-hole Statistics\n\n"));
        assert!(text.contains("Pi-hole admin console: http://pi.hole/admin\n"));
        assert!(text.contains("Status: Enabled\n"));
        assert!(text.contains("Gravity last updated: 3 days, 4 hours, 10 minutes\n"));
        assert!(text.contains("Current unique clients: 12\n"));
        assert!(text.contains("Total clients ever seen: n/a\n"));

        let clients = text.find("Current unique clients").unwrap();
        let ads = text.find("Ads blocked today").unwrap();
        let domains = text.find("Unique domains today").unwrap();
        assert!(clients < ads && ads < domains);
    }

    #[test]
    fn pretty_snapshot_without_gravity_file() {
        plain();
        let snap = sample(Some(GravityStatus::default()));
        let text = render(&snap, OutputFormat::Pretty);
        assert!(text.contains("Gravity has not been updated yet\n"));
    }

    #[test]
    fn unparsable_gravity_age_is_not_fatal() {
        plain();
        let snap = sample(Some(GravityStatus {
            file_exists: true,
            absolute: None,
            relative: Some(RelativeAge {
                days: "soon".into(),
                ..Default::default()
            }),
        }));
        let text = render(&snap, OutputFormat::Pretty);
        assert!(text.contains("Gravity last updated: unknown\n"));
    }

    #[test]
    fn json_snapshot_keeps_wire_names() {
        let snap = sample(None);
        let value: serde_json::Value =
            serde_json::from_str(&render(&snap, OutputFormat::Json)).unwrap();
        assert_eq!(value["status"], "enabled");
        assert_eq!(value["statistics"]["unique_clients"], "12");
        assert_eq!(value["statistics"]["ads_blocked_today"], "340");
        assert!(value["statistics"].get("gravity_last_updated").is_none());
    }

    #[test]
    fn toggle_output_mentions_no_op() {
        plain();
        let outcome = ToggleOutcome {
            previous: ServiceStatus::Disabled,
            current: ServiceStatus::Disabled,
            issued: false,
        };
        let mut buf = Vec::new();
        toggle(&mut buf, &outcome, OutputFormat::Pretty).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "No change needed.\nPi-hole status: Disabled\n");
    }

    #[test]
    fn status_as_json() {
        let mut buf = Vec::new();
        status(&mut buf, ServiceStatus::Disabled, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value, serde_json::json!({"status": "disabled"}));
    }
}

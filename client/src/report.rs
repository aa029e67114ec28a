use crate::service::SearchOutcome;
use fireflightcore::checklist::ChecklistEntry;
use fireflightcore::model::{Fire, Marker, SelectedMarker, UserLocation};
use fireflightcore::state::FireDataState;
use std::fmt::Write;

pub fn fires(fires: &[Fire]) -> String {
    let mut out = format!("{} active fires\n", fires.len());
    for (index, fire) in fires.iter().enumerate() {
        let name = if fire.name.is_empty() { "(unnamed)" } else { fire.name.as_str() };
        let _ = writeln!(
            out,
            "{:>4}  {:<32} {:>9.4}, {:>10.4}",
            index, name, fire.location.latitude, fire.location.longitude
        );
    }
    out
}

fn alert_lines(out: &mut String, alerts: &[Marker]) {
    for alert in alerts {
        let _ = writeln!(
            out,
            "  ! {} ({:.4}, {:.4})",
            alert.label.as_deref().unwrap_or("fire"),
            alert.coordinate.latitude,
            alert.coordinate.longitude
        );
    }
}

pub fn search(outcome: &SearchOutcome) -> String {
    let mut out = format!(
        "{} -> {:.4}, {:.4}\n",
        outcome.place_name, outcome.search.coordinate.latitude, outcome.search.coordinate.longitude
    );
    match outcome.search.radius {
        Some(radius) => {
            let _ = writeln!(out, "{} fires within {}", outcome.alerts.len(), radius);
            alert_lines(&mut out, &outcome.alerts);
        }
        None => out.push_str("No usable radius given; proximity check skipped\n"),
    }
    out
}

pub fn locations(locations: &[UserLocation], state: &FireDataState) -> String {
    let mut out = format!("{} saved locations\n", locations.len());
    for location in locations {
        let radius = location
            .radius
            .map(|radius| radius.to_string())
            .unwrap_or_else(|| "no radius".into());
        let _ = writeln!(
            out,
            "{:>6}  {:<40} {:>10}  notifications {}",
            location.id,
            location.address,
            radius,
            if location.notifications { "on" } else { "off" }
        );
    }
    let _ = writeln!(out, "{} fire alerts near saved locations", state.user_local_fire_markers.len());
    alert_lines(&mut out, &state.user_local_fire_markers);
    out
}

pub fn selection(selected: &SelectedMarker) -> String {
    format!(
        "{:?} {} ({:.4}, {:.4}) radius {} notifications {}",
        selected.kind,
        selected.label.as_deref().unwrap_or("-"),
        selected.latitude,
        selected.longitude,
        selected
            .radius
            .map(|radius| radius.to_string())
            .unwrap_or_else(|| "-".into()),
        match selected.notifications {
            Some(true) => "on",
            Some(false) => "off",
            None => "-",
        }
    )
}

pub fn checklist(entries: &[ChecklistEntry]) -> String {
    let mut out = String::from("Emergency Evacuation Checklist\n");
    for (index, entry) in entries.iter().enumerate() {
        let mark = if entry.checked { "x" } else { " " };
        let _ = writeln!(out, "{:>3}. [{}] {}", index + 1, mark, entry.item);
    }
    out
}

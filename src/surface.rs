//! Thin text binding: writes view models into terminal lines.

use tempora_location::Place;
use tempora_view::AssetKind;

use crate::dashboard::DashboardView;

/// Render one dashboard refresh as terminal text.
pub fn render(view: &DashboardView) -> String {
    let mut out = String::new();

    out.push_str(&format!("📍 {}\n", view.location_label));
    if view.from_cache {
        out.push_str(&format!("Updated at {} (offline copy)\n", view.updated_at));
    } else {
        out.push_str(&format!("Updated at {}\n", view.updated_at));
    }
    out.push('\n');

    let c = &view.current;
    out.push_str(&format!("{} {}  {}\n", c.icon, c.temperature, c.description));
    out.push_str(&format!(
        "Feels like {}  Humidity {}  Wind {}\n",
        c.feels_like, c.humidity, c.wind
    ));
    out.push_str(&format!(
        "Visibility {}  Pressure {}  Precipitation {}\n",
        c.visibility, c.pressure, c.precipitation
    ));

    let backdrop = match view.background.kind {
        AssetKind::Video => "backdrop (video)",
        AssetKind::Image => "backdrop (image)",
    };
    out.push_str(&format!("{}: {}\n", backdrop, view.background.path()));
    out.push('\n');

    for card in &view.cards {
        let mut line = format!(
            "{:<9} {:>6}  {} {:>4}/{:<4} {}",
            card.day_name, card.date, card.icon, card.high, card.low, card.description
        );
        if let Some(precipitation) = &card.precipitation {
            line.push_str(&format!("  rain {}", precipitation));
        }
        if let Some(wind) = &card.wind {
            line.push_str(&format!("  wind {}", wind));
        }
        if let Some(humidity) = &card.humidity {
            line.push_str(&format!("  humidity {}", humidity));
        }
        line.push('\n');
        out.push_str(&line);
    }

    if !view.charts_rendered {
        out.push_str("\n(charts unavailable, showing data only)\n");
    }
    out
}

/// Render a type-ahead suggestion list, one candidate per line.
pub fn render_suggestions(places: &[Place]) -> String {
    if places.is_empty() {
        return "(no suggestions)\n".to_string();
    }
    places
        .iter()
        .map(|p| format!("{}  ({:.2}, {:.2})\n", p.name, p.latitude, p.longitude))
        .collect()
}

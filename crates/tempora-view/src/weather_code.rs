//! Static mapping from WMO weather codes to icon and description.

/// Icon glyph and human-readable description for a weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherInfo {
    pub icon: &'static str,
    pub description: &'static str,
}

const UNKNOWN_WEATHER: WeatherInfo = WeatherInfo {
    icon: "🌤️",
    description: "Unknown weather",
};

/// Look up a WMO weather code.
///
/// Total and pure: codes outside the known set get the neutral default
/// entry, never an error.
pub fn weather_info(code: i32) -> WeatherInfo {
    let (icon, description) = match code {
        0 => ("☀️", "Clear sky"),
        1 => ("🌤️", "Mainly clear"),
        2 => ("⛅", "Partly cloudy"),
        3 => ("☁️", "Overcast"),
        45 => ("🌫️", "Fog"),
        48 => ("🌫️", "Depositing rime fog"),
        51 => ("🌦️", "Light drizzle"),
        53 => ("🌦️", "Moderate drizzle"),
        55 => ("🌦️", "Dense drizzle"),
        56 => ("🌦️", "Light freezing drizzle"),
        57 => ("🌦️", "Dense freezing drizzle"),
        61 => ("🌧️", "Slight rain"),
        63 => ("🌧️", "Moderate rain"),
        65 => ("🌧️", "Heavy rain"),
        66 => ("🌧️", "Light freezing rain"),
        67 => ("🌧️", "Heavy freezing rain"),
        71 => ("🌨️", "Slight snowfall"),
        73 => ("🌨️", "Moderate snowfall"),
        75 => ("🌨️", "Heavy snowfall"),
        77 => ("🌨️", "Snow grains"),
        80 => ("🌦️", "Slight rain showers"),
        81 => ("🌦️", "Moderate rain showers"),
        82 => ("🌦️", "Violent rain showers"),
        85 => ("🌨️", "Slight snow showers"),
        86 => ("🌨️", "Heavy snow showers"),
        95 => ("⛈️", "Thunderstorm"),
        96 => ("⛈️", "Thunderstorm with slight hail"),
        99 => ("⛈️", "Thunderstorm with heavy hail"),
        _ => return UNKNOWN_WEATHER,
    };
    WeatherInfo { icon, description }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN_CODES: &[i32] = &[
        0, 1, 2, 3, 45, 48, 51, 53, 55, 56, 57, 61, 63, 65, 66, 67, 71, 73, 75, 77, 80, 81, 82,
        85, 86, 95, 96, 99,
    ];

    #[test]
    fn every_known_code_has_icon_and_description() {
        for &code in KNOWN_CODES {
            let info = weather_info(code);
            assert!(!info.icon.is_empty(), "code {} has no icon", code);
            assert!(!info.description.is_empty(), "code {} has no description", code);
            assert_ne!(info, UNKNOWN_WEATHER, "code {} fell through to default", code);
        }
    }

    #[test]
    fn unknown_codes_get_the_default_entry() {
        for code in [-1, 4, 44, 100, 999] {
            assert_eq!(weather_info(code), UNKNOWN_WEATHER);
        }
    }

    #[test]
    fn spot_checks() {
        assert_eq!(weather_info(0).description, "Clear sky");
        assert_eq!(weather_info(95).icon, "⛈️");
        assert_eq!(weather_info(71).icon, "🌨️");
    }
}

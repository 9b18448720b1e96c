//! Themed background selection by weather bucket and day/night.

/// How a background asset is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Looping video
    Video,
    /// Still image
    Image,
}

/// A themed background asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetRef {
    pub file: &'static str,
    pub kind: AssetKind,
}

impl AssetRef {
    fn new(file: &'static str) -> Self {
        let kind = if file.ends_with(".webm") {
            AssetKind::Video
        } else {
            AssetKind::Image
        };
        Self { file, kind }
    }

    /// Path relative to the asset root.
    pub fn path(&self) -> String {
        format!("images/backgrounds/{}", self.file)
    }
}

/// Pick the background for a weather code.
///
/// Buckets: 0 clear, 1-3 cloudy, 45/48 fog (one static image, no day/night
/// video variant), snow before the wider rain range, >= 95 storm, anything
/// else clear.
pub fn background_for(code: i32, is_day: bool) -> AssetRef {
    if matches!(code, 45 | 48) {
        return AssetRef::new("fog.webp");
    }

    let file = if is_day {
        match code {
            0 => "sunDay.webm",
            1..=3 => "cloudyDay.webp",
            71..=77 => "snowDay.webm",
            51..=82 => "rainDay.webm",
            c if c >= 95 => "stormDay.webm",
            _ => "sunDay.webm",
        }
    } else {
        match code {
            0 => "starsNight.webm",
            1..=3 => "cloudyNight.webm",
            71..=77 => "snowNight.webm",
            51..=82 => "rainNight.webm",
            c if c >= 95 => "stormNight.webm",
            _ => "starsNight.webm",
        }
    };
    AssetRef::new(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_day_and_night_differ() {
        assert_eq!(background_for(0, true).file, "sunDay.webm");
        assert_eq!(background_for(0, false).file, "starsNight.webm");
    }

    #[test]
    fn fog_is_one_static_image() {
        for is_day in [true, false] {
            let asset = background_for(45, is_day);
            assert_eq!(asset.file, "fog.webp");
            assert_eq!(asset.kind, AssetKind::Image);
        }
        assert_eq!(background_for(48, true).file, "fog.webp");
    }

    #[test]
    fn snow_wins_over_the_overlapping_rain_range() {
        assert_eq!(background_for(71, true).file, "snowDay.webm");
        assert_eq!(background_for(77, false).file, "snowNight.webm");
        // Rain codes outside the snow range still land in the rain bucket.
        assert_eq!(background_for(61, true).file, "rainDay.webm");
        assert_eq!(background_for(82, false).file, "rainNight.webm");
    }

    #[test]
    fn storms_cover_everything_from_95_up() {
        assert_eq!(background_for(95, true).file, "stormDay.webm");
        assert_eq!(background_for(99, false).file, "stormNight.webm");
    }

    #[test]
    fn unknown_codes_fall_back_to_clear() {
        assert_eq!(background_for(42, true).file, "sunDay.webm");
        assert_eq!(background_for(-5, false).file, "starsNight.webm");
    }

    #[test]
    fn cloudy_day_is_the_one_other_still_image() {
        let asset = background_for(2, true);
        assert_eq!(asset.kind, AssetKind::Image);
        assert_eq!(asset.path(), "images/backgrounds/cloudyDay.webp");
    }
}

use std::fmt;
use std::str::FromStr;

/// Which detector receives frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DetectorSelection {
    #[default]
    ScaleSpace,
    Tracking,
}

impl DetectorSelection {
    pub const ALL: [DetectorSelection; 2] = [DetectorSelection::ScaleSpace, DetectorSelection::Tracking];

    /// The selection after this one in [`Self::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    /// Stable identifier used on the command line and in settings.
    pub fn key(self) -> &'static str {
        match self {
            DetectorSelection::ScaleSpace => "scale-space",
            DetectorSelection::Tracking => "tracking",
        }
    }
}

impl fmt::Display for DetectorSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectorSelection::ScaleSpace => write!(f, "Cascade"),
            DetectorSelection::Tracking => write!(f, "Cascade (tracking)"),
        }
    }
}

impl FromStr for DetectorSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sel| sel.key() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown detector '{s}', expected scale-space or tracking"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_next_cycles_through_both() {
        let start = DetectorSelection::ScaleSpace;
        assert_eq!(start.next(), DetectorSelection::Tracking);
        assert_eq!(start.next().next(), start);
    }

    #[rstest]
    #[case("scale-space", DetectorSelection::ScaleSpace)]
    #[case("Tracking", DetectorSelection::Tracking)]
    #[case(" tracking\n", DetectorSelection::Tracking)]
    fn test_parse(#[case] input: &str, #[case] expected: DetectorSelection) {
        assert_eq!(input.parse::<DetectorSelection>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_is_error() {
        assert!("haar".parse::<DetectorSelection>().is_err());
    }

    #[test]
    fn test_default_is_scale_space() {
        assert_eq!(DetectorSelection::default(), DetectorSelection::ScaleSpace);
    }
}

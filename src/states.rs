//! Supported-state registry and display palette.

/// Enacted-plan statistics for one district.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistrictStats {
    pub id: u32,
    pub dem: f64,
    pub rep: f64,
    pub minority_pct: f64,
}

/// Static metadata for a supported state.
#[derive(Debug, Clone, PartialEq)]
pub struct StateInfo {
    pub name: &'static str,
    pub abbr: &'static str,
    /// Two-digit Census FIPS code, zero-padded.
    pub fips: &'static str,
    /// Map center as (lat, lon).
    pub center: (f64, f64),
    pub zoom: u8,
    pub num_districts: u32,
    pub population: u64,
    pub white_pct: f64,
    pub black_pct: f64,
    pub hispanic_pct: f64,
    pub asian_pct: f64,
    /// Formerly subject to VRA Section 5 preclearance.
    pub preclearance: bool,
    pub current_plan: &'static [DistrictStats],
}

/// Display palette cycled over district ids.
pub const DISTRICT_COLORS: [&str; 8] = [
    "#4285f4", "#ea4335", "#fbbc04", "#34a853",
    "#a142f4", "#ff6d01", "#e91e63", "#00bcd4",
];

/// Color for a 1-based district id, cycling through the palette.
pub fn district_color(district: u32) -> &'static str {
    DISTRICT_COLORS[(district.saturating_sub(1) % 8) as usize]
}

const MISSISSIPPI: StateInfo = StateInfo {
    name: "Mississippi",
    abbr: "MS",
    fips: "28",
    center: (32.7, -89.7),
    zoom: 7,
    num_districts: 4,
    population: 2_961_279,
    white_pct: 56.4,
    black_pct: 37.8,
    hispanic_pct: 3.6,
    asian_pct: 1.1,
    preclearance: true,
    current_plan: &[
        DistrictStats { id: 1, dem: 0.37, rep: 0.63, minority_pct: 28.0 },
        DistrictStats { id: 2, dem: 0.72, rep: 0.28, minority_pct: 64.0 },
        DistrictStats { id: 3, dem: 0.34, rep: 0.66, minority_pct: 30.0 },
        DistrictStats { id: 4, dem: 0.36, rep: 0.64, minority_pct: 26.0 },
    ],
};

const MARYLAND: StateInfo = StateInfo {
    name: "Maryland",
    abbr: "MD",
    fips: "24",
    center: (39.0, -76.8),
    zoom: 8,
    num_districts: 8,
    population: 6_177_224,
    white_pct: 50.3,
    black_pct: 31.1,
    hispanic_pct: 11.8,
    asian_pct: 6.7,
    preclearance: false,
    current_plan: &[
        DistrictStats { id: 1, dem: 0.60, rep: 0.40, minority_pct: 34.0 },
        DistrictStats { id: 2, dem: 0.72, rep: 0.28, minority_pct: 55.0 },
        DistrictStats { id: 3, dem: 0.63, rep: 0.37, minority_pct: 40.0 },
        DistrictStats { id: 4, dem: 0.68, rep: 0.32, minority_pct: 58.0 },
        DistrictStats { id: 5, dem: 0.58, rep: 0.42, minority_pct: 32.0 },
        DistrictStats { id: 6, dem: 0.40, rep: 0.60, minority_pct: 18.0 },
        DistrictStats { id: 7, dem: 0.70, rep: 0.30, minority_pct: 62.0 },
        DistrictStats { id: 8, dem: 0.55, rep: 0.45, minority_pct: 28.0 },
    ],
};

/// Look up a supported state by USPS postal code (case-insensitive).
pub fn state_info(code: &str) -> Option<&'static StateInfo> {
    match code.to_ascii_uppercase().as_str() {
        "MS" => Some(&MISSISSIPPI),
        "MD" => Some(&MARYLAND),
        _ => None,
    }
}

/// Postal codes of every supported state.
pub fn supported_states() -> &'static [&'static str] {
    &["MS", "MD"]
}

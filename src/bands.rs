//! Temperature banding.
//!
//! Two independent tables are in use. The list, report and dashboard views
//! color readings with [`LIST_BAND_TABLE`] (breakpoints 0/15/25/35), while
//! status badges use the six-tier [`CLASSIFIER_BAND_TABLE`] (0/10/20/30/40).
//! The two do not agree; each call site picks its table.
//!
//! Both ladders are scanned from coldest to hottest with strict `<`; the
//! hottest band is the catch-all. That makes classification total: NaN falls
//! through to the hottest band. Non-finite input is rejected by validation,
//! not here.

/// Ordered `(upper bound, band)` ladder plus the catch-all hottest band.
#[derive(Debug, Clone, Copy)]
pub struct BandTable<B: 'static> {
    ladder: &'static [(f64, B)],
    hottest: B,
}

impl<B: Copy> BandTable<B> {
    pub const fn new(ladder: &'static [(f64, B)], hottest: B) -> Self {
        Self { ladder, hottest }
    }

    /// First band whose bound the temperature is strictly below.
    pub fn classify(&self, temperature: f64) -> B {
        self.ladder
            .iter()
            .find(|(bound, _)| temperature < *bound)
            .map(|(_, band)| *band)
            .unwrap_or(self.hottest)
    }

    pub fn breakpoints(&self) -> impl Iterator<Item = f64> + '_ {
        self.ladder.iter().map(|(bound, _)| *bound)
    }
}

/// What a view needs to paint a temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub color: &'static str,
    pub status: Option<&'static str>,
    pub icon: Option<&'static str>,
}

// ---------------------------------------------------------------------------
// List table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListBand {
    VeryCold,
    Cold,
    Normal,
    Warm,
    Hot,
}

pub type ListBandTable = BandTable<ListBand>;

/// The configured thresholds also name 40 as HOT, but Hot is already the
/// catch-all from 35 so that bound is never consulted.
pub const LIST_BAND_TABLE: ListBandTable = BandTable::new(
    &[
        (0.0, ListBand::VeryCold),
        (15.0, ListBand::Cold),
        (25.0, ListBand::Normal),
        (35.0, ListBand::Warm),
    ],
    ListBand::Hot,
);

impl ListBand {
    pub fn of(temperature: f64) -> Self {
        LIST_BAND_TABLE.classify(temperature)
    }

    pub fn color(&self) -> &'static str {
        match self {
            ListBand::VeryCold => "#1976D2",
            ListBand::Cold => "#2196F3",
            ListBand::Normal => "#4CAF50",
            ListBand::Warm => "#FF9800",
            ListBand::Hot => "#F44336",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ListBand::VeryCold => "snow",
            ListBand::Cold => "partly-sunny",
            ListBand::Normal => "sunny",
            ListBand::Warm => "thermometer",
            ListBand::Hot => "flame",
        }
    }

    pub fn classification(&self) -> Classification {
        Classification {
            color: self.color(),
            status: None,
            icon: Some(self.icon()),
        }
    }
}

// ---------------------------------------------------------------------------
// Classifier table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierBand {
    Cold,
    Cool,
    Normal,
    Warm,
    Hot,
    VeryHot,
}

pub type ClassifierBandTable = BandTable<ClassifierBand>;

pub const CLASSIFIER_BAND_TABLE: ClassifierBandTable = BandTable::new(
    &[
        (0.0, ClassifierBand::Cold),
        (10.0, ClassifierBand::Cool),
        (20.0, ClassifierBand::Normal),
        (30.0, ClassifierBand::Warm),
        (40.0, ClassifierBand::Hot),
    ],
    ClassifierBand::VeryHot,
);

impl ClassifierBand {
    pub fn of(temperature: f64) -> Self {
        CLASSIFIER_BAND_TABLE.classify(temperature)
    }

    pub fn color(&self) -> &'static str {
        match self {
            ClassifierBand::Cold => "#1976D2",
            ClassifierBand::Cool => "#42A5F5",
            ClassifierBand::Normal => "#66BB6A",
            ClassifierBand::Warm => "#FFA726",
            ClassifierBand::Hot => "#F57C00",
            ClassifierBand::VeryHot => "#D32F2F",
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            ClassifierBand::Cold => "Muito Frio",
            ClassifierBand::Cool => "Frio",
            ClassifierBand::Normal => "Normal",
            ClassifierBand::Warm => "Morno",
            ClassifierBand::Hot => "Quente",
            ClassifierBand::VeryHot => "Muito Quente",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ClassifierBand::Cold => "snow",
            ClassifierBand::Cool => "rainy",
            ClassifierBand::Normal => "cloudy",
            ClassifierBand::Warm => "partly-sunny",
            ClassifierBand::Hot => "sunny",
            ClassifierBand::VeryHot => "flame",
        }
    }

    pub fn classification(&self) -> Classification {
        Classification {
            color: self.color(),
            status: Some(self.status()),
            icon: Some(self.icon()),
        }
    }
}

/// Color, status and icon from the six-tier table.
pub fn classify(temperature: f64) -> Classification {
    ClassifierBand::of(temperature).classification()
}

/// Color and icon from the list table.
pub fn classify_for_list(temperature: f64) -> Classification {
    ListBand::of(temperature).classification()
}

/// Icon for entries on the high-temperature alert list.
pub fn alert_icon(temperature: f64) -> &'static str {
    if temperature > 40.0 {
        "flame"
    } else {
        "thermometer"
    }
}

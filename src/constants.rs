//! Application constants for the XPS processor
//!
//! Enumerated field values, condition sets for the VAMAS schema, key names
//! and token positions of the PHI key-value export, and processing defaults.

// =============================================================================
// Shared Text Conventions
// =============================================================================

/// Float-overflow sentinel ("1e37" and its spellings) marking absent values
pub const SENTINEL_PATTERN: &str = r"1[eE]\+*0*37";

/// Constant metadata key holding the ISO-8601 measurement date
pub const MEASURED_DATE_KEY: &str = "measurement.measured_date";

/// Default UTC offset, in hours, for civil measurement dates
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

// =============================================================================
// VAMAS Enumerations
// =============================================================================

pub const EXPERIMENT_MODES: &[&str] = &[
    "MAP", "MAPDP", "MAPSV", "MAPSVDP", "NORM", "SDP", "SDPSV", "SEM",
];

pub const SCAN_MODES: &[&str] = &["REGULAR", "IRREGULAR", "MAPPING"];

pub const TECHNIQUES: &[&str] = &[
    "AES diff",
    "AES dir",
    "EDX",
    "ELS",
    "FABMS",
    "FABMS energy spec",
    "ISS",
    "SIMS",
    "SIMS energy spec",
    "SNMS",
    "SNMS energy spec",
    "UPS",
    "XPS",
    "XRF",
];

/// Scan mode whose abscissa is start + increment
pub const REGULAR_SCAN: &str = "REGULAR";

// =============================================================================
// VAMAS Condition Sets
// =============================================================================

pub mod modes {
    /// Modes that declare the number of spectral regions
    pub const SPECTRAL_REGIONS: &[&str] = &["MAP", "MAPDP", "NORM", "SDP"];

    /// Mapping modes with analysis positions and block coordinates
    pub const MAPPING: &[&str] = &["MAP", "MAPDP"];

    /// Depth-profile modes
    pub const DEPTH_PROFILE: &[&str] = &["MAPDP", "MAPSVDP", "SDP", "SDPSV"];

    pub const FIELD_OF_VIEW: &[&str] = &["MAP", "MAPDP", "MAPSV", "MAPSVDP", "SEM"];

    pub const LINESCAN: &[&str] = &["MAPSV", "MAPSVDP", "SEM"];
}

pub mod techniques {
    /// Ion and mass-spectrometry techniques carrying sputtering-ion fields
    pub const ION_BEAM: &[&str] = &[
        "FABMS",
        "FABMS energy spec",
        "ISS",
        "SIMS",
        "SIMS energy spec",
        "SNMS",
        "SNMS energy spec",
    ];

    /// Techniques with a separate sputtering source
    pub const SPUTTER_SOURCE: &[&str] = &["AES diff", "AES dir", "EDX", "ELS", "UPS", "XPS", "XRF"];

    pub const DIFFERENTIAL: &[&str] = &["AES diff"];
}

// =============================================================================
// PHI Key-Value Export
// =============================================================================

/// Line prefix opening every data segment
pub const PHI_SEGMENT_SEPARATOR: &str = "//Area Comment";

/// Converted text suffix written by the exporter
pub const PHI_CONVERTED_EXTENSION: &str = "txt";

pub mod phi_keys {
    pub const ACQ_FILE_DATE: &str = "AcqFileDate";
    pub const SPECTRAL_REG_DEF: &str = "SpectralRegDef";
    pub const SPECTRAL_REG_DEF2: &str = "SpectralRegDef2";
    pub const DEPTH_CAL_DEF: &str = "DepthCalDef";
    pub const SPATIAL_AREA_DESC: &str = "SpatialAreaDesc";
    pub const FILE_TYPE: &str = "FileType";
    pub const IMAGE_SIZE_XY: &str = "ImageSizeXY";
    pub const SURV_NUM_CYCLES: &str = "SurvNumCycles";

    /// Keys accumulating one token array per occurrence
    pub const TOKEN_ARRAYS: &[&str] = &[SPECTRAL_REG_DEF, SPECTRAL_REG_DEF2, DEPTH_CAL_DEF];

    /// Segment keys
    pub const X_LABEL: &str = "XLabel";
    pub const Y_LABEL: &str = "YLabel";
    pub const ATOMIC_NAME: &str = "AtomicName";

    /// Abscissa labels that mark a depth or angle profile segment
    pub const PROFILE_PREFIXES: &[&str] = &["Angle", "Sputter"];
}

pub mod phi_positions {
    // SpectralRegDef
    pub const PEAK_NAME_TRANSITIONS: usize = 2;
    pub const ABSCISSA_INCREMENT: usize = 5;
    pub const ABSCISSA_START: usize = 6;
    pub const ABSCISSA_END: usize = 7;
    pub const COLLECTION_TIME: usize = 10;
    pub const PASS_ENERGY: usize = 11;
    // SpectralRegDef2
    pub const TOTAL_ACQUISITION_NUMBER: usize = 2;
    pub const PEAK_SWEEP_NUMBER: usize = 2;
    // DepthCalDef
    pub const SPUTTERING_LAYER_NAME: usize = 1;
    pub const SPUTTERING_LAYER_PRESET_INTERVAL_TIME: usize = 7;
    pub const SPUTTERING_LAYER_PRESET_CYCLE_NUMBER: usize = 8;
}

pub mod phi_metadata {
    /// Header keys kept out of constant metadata as they are
    pub const CONST_EXCEPTIONS: &[&str] = &[
        "ImageSizeXY",
        "SpectralRegDef",
        "SpectralRegDef2",
        "DepthCalDef",
        "XraySource",
        "XrayPower",
        "XrayBeamDiameter",
        "AnalyserMode",
        "AnalyserWorkFcn",
        "SourceAnalyserAngle",
        "AnalyserSolidAngle",
        "SputterEnergy",
        "ProfSputterDelay",
        "SurvNumCycles",
    ];

    /// Constant keys reduced to their leading numeric token
    pub const CONST_WITH_UNIT: &[&str] = &["SputterEnergy", "ProfSputterDelay"];

    /// Per-row keys taken verbatim
    pub const VARIABLE_VERBATIM: &[&str] = &["XraySource", "AnalyserMode", "SurvNumCycles"];

    /// Per-row keys reduced to their leading numeric token
    pub const VARIABLE_WITH_UNIT: &[&str] = &[
        "XrayPower",
        "XrayBeamDiameter",
        "AnalyserWorkFcn",
        "SourceAnalyserAngle",
        "AnalyserSolidAngle",
    ];
}

// =============================================================================
// External Converter
// =============================================================================

pub const CONVERTER_PROGRAM: &str = "MPExport.exe";
pub const WINE_PROGRAM: &str = "wine";

// =============================================================================
// Output
// =============================================================================

pub const METADATA_SUFFIX: &str = "metadata.json";
pub const COUNTS_SUFFIX: &str = "count";

/// Reconstructed VAMAS text: section markers and key/value delimiter
pub const VAMAS_TEXT_EXTENSION: &str = "txt";
pub const VAMAS_TEXT_HEADER: &str = "//HEADER INFORMATION";
pub const VAMAS_TEXT_BLOCK_INFO: &str = "//Numeric Data Info";
pub const VAMAS_TEXT_BLOCK_DATA: &str = "//Numeric Data";

/// Extensions recognized during input discovery
pub const SUPPORTED_EXTENSIONS: &[&str] = &["vms", "spe", "pro", "ang"];

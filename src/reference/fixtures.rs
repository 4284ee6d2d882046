//! Small synthetic reference datasets for unit tests.

use serde_json::{Value, json};

use super::{
    Calibration2014, FitCalibration2023, FitCalibrationFile, PreflightCurve, ReferenceDatasets,
};

pub const SW_KNOTS: [f64; 7] = [165.0, 173.0, 181.0, 189.0, 197.0, 205.0, 213.0];
pub const LW_KNOTS: [f64; 7] = [245.0, 253.0, 261.0, 269.0, 277.0, 285.0, 292.0];

pub const A0_SW: [f64; 7] = [0.08, 0.3, 1.2, 2.5, 1.8, 0.6, 0.12];
pub const A0_LW: [f64; 7] = [0.5, 1.0, 1.6, 1.4, 1.1, 0.7, 0.3];

pub const T0: &str = "2006-09-22T21:36:00";

pub const FIT_DATES: [&str; 3] = [
    "2007-01-01T00:00:00.000",
    "2012-01-01T00:00:00.000",
    "2020-01-01T00:00:00.000",
];

pub fn nrl_2014_json() -> Value {
    json!({
        "t0": T0,
        "wave_knots_sw": SW_KNOTS,
        "wave_knots_lw": LW_KNOTS,
        "a0_sw": A0_SW,
        "tau_sw": [8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0],
        "a0_lw": A0_LW,
        "tau_lw": [20.0, 18.0, 16.0, 14.0, 12.0, 10.0, 8.0],
        "wave_area_sw": [170.0, 180.0, 190.0, 200.0, 210.0],
        "wave_area_lw": [250.0, 260.0, 270.0, 280.0, 290.0],
    })
}

pub fn fit_2023_json() -> Value {
    json!({
        "date_obs": FIT_DATES,
        "sw_wave": SW_KNOTS,
        "lw_wave": LW_KNOTS,
        "sw_ea": [
            [0.08, 0.06, 0.05],
            [0.3, 0.25, 0.2],
            [1.2, 1.0, 0.85],
            [2.5, 2.1, 1.8],
            [1.8, 1.5, 1.3],
            [0.6, 0.5, 0.42],
            [0.12, 0.1, 0.08],
        ],
        "lw_ea": [
            [0.5, 0.42, 0.35],
            [1.0, 0.85, 0.7],
            [1.6, 1.35, 1.1],
            [1.4, 1.2, 1.0],
            [1.1, 0.9, 0.75],
            [0.7, 0.6, 0.5],
            [0.3, 0.25, 0.2],
        ],
    })
}

pub fn preflight_short_json() -> Value {
    json!({ "wave": SW_KNOTS, "ea": A0_SW })
}

pub fn preflight_long_json() -> Value {
    json!({ "wave": LW_KNOTS, "ea": A0_LW })
}

pub fn nrl_2014() -> Calibration2014 {
    serde_json::from_value(nrl_2014_json()).unwrap()
}

pub fn fit_2023() -> FitCalibration2023 {
    let file: FitCalibrationFile = serde_json::from_value(fit_2023_json()).unwrap();
    FitCalibration2023::try_from(file).unwrap()
}

pub fn preflight_short() -> PreflightCurve {
    serde_json::from_value(preflight_short_json()).unwrap()
}

pub fn preflight_long() -> PreflightCurve {
    serde_json::from_value(preflight_long_json()).unwrap()
}

pub fn datasets() -> ReferenceDatasets {
    ReferenceDatasets {
        nrl_2014: nrl_2014(),
        fit_2023: fit_2023(),
        preflight_short: preflight_short(),
        preflight_long: preflight_long(),
    }
}

//! Lock-free parameter storage shared between the control and audio threads.
//!
//! Each value is an individually atomic `f32` stored as raw bits with relaxed
//! ordering. There is no cross-parameter consistency: the audio thread may see
//! a new gain alongside an old pulse width, which is fine for three
//! independent faders.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// `f32` with atomic load/store, built on `AtomicU32` bit patterns.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Host-visible parameter identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamId {
    #[serde(rename = "gain")]
    Gain,
    #[serde(rename = "pulseWidth")]
    PulseWidth,
    #[serde(rename = "filterCutoff")]
    FilterCutoff,
}

impl ParamId {
    pub const ALL: [ParamId; 3] = [ParamId::Gain, ParamId::PulseWidth, ParamId::FilterCutoff];

    /// Stable string id used for automation and state.
    pub fn as_str(self) -> &'static str {
        match self {
            ParamId::Gain => "gain",
            ParamId::PulseWidth => "pulseWidth",
            ParamId::FilterCutoff => "filterCutoff",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        ParamId::ALL.into_iter().find(|id| id.as_str() == raw)
    }

    pub fn spec(self) -> &'static ParamSpec {
        match self {
            ParamId::Gain => &GAIN,
            ParamId::PulseWidth => &PULSE_WIDTH,
            ParamId::FilterCutoff => &FILTER_CUTOFF,
        }
    }
}

/// Range, step, default and display metadata for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub id: ParamId,
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
    pub unit: &'static str,
    pub tooltip: &'static str,
}

pub const GAIN: ParamSpec = ParamSpec {
    id: ParamId::Gain,
    name: "Gain",
    min: -60.0,
    max: 0.0,
    step: 0.1,
    default: -12.0,
    unit: "dB",
    tooltip: "Control overall output gain",
};

pub const PULSE_WIDTH: ParamSpec = ParamSpec {
    id: ParamId::PulseWidth,
    name: "Pulse Width",
    min: 0.05,
    max: 0.95,
    step: 0.001,
    default: 0.5,
    unit: "",
    tooltip: "Blend between thin and wide pulse timbres",
};

pub const FILTER_CUTOFF: ParamSpec = ParamSpec {
    id: ParamId::FilterCutoff,
    name: "Virtual Filter",
    min: 0.0,
    max: 1.0,
    step: 0.001,
    default: 0.5,
    unit: "",
    tooltip: "0 = smooth/open, 1 = sharp/filtered",
};

impl ParamSpec {
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Clamp into range and snap to the nearest step from `min`.
    pub fn snap(&self, value: f32) -> f32 {
        let clamped = self.clamp(value);
        let steps = ((clamped - self.min) / self.step).round();
        self.clamp(self.min + steps * self.step)
    }

    pub fn to_normalized(&self, value: f32) -> f32 {
        ((self.clamp(value) - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    pub fn from_normalized(&self, normalized: f32) -> f32 {
        self.min + normalized.clamp(0.0, 1.0) * (self.max - self.min)
    }

    /// Display text, e.g. `-12.0 dB` or `0.500`.
    pub fn format(&self, value: f32) -> String {
        match self.unit {
            "dB" => format!("{value:.1} dB"),
            _ => format!("{value:.3}"),
        }
    }
}

/// The three shared control values.
#[derive(Debug)]
pub struct ParameterStore {
    gain_db: AtomicF32,
    pulse_width: AtomicF32,
    filter_control: AtomicF32,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self {
            gain_db: AtomicF32::new(GAIN.default),
            pulse_width: AtomicF32::new(PULSE_WIDTH.default),
            filter_control: AtomicF32::new(FILTER_CUTOFF.default),
        }
    }

    fn slot(&self, id: ParamId) -> &AtomicF32 {
        match id {
            ParamId::Gain => &self.gain_db,
            ParamId::PulseWidth => &self.pulse_width,
            ParamId::FilterCutoff => &self.filter_control,
        }
    }

    #[inline]
    pub fn get(&self, id: ParamId) -> f32 {
        self.slot(id).load()
    }

    /// Store a user-facing value: clamped and snapped to the parameter step.
    /// Non-finite values are ignored.
    pub fn set(&self, id: ParamId, value: f32) {
        if value.is_finite() {
            self.slot(id).store(id.spec().snap(value));
        }
    }

    /// Store a value clamped into range but not snapped, so values restored
    /// from state come back bit-exact.
    pub fn set_raw(&self, id: ParamId, value: f32) {
        if value.is_finite() {
            self.slot(id).store(id.spec().clamp(value));
        }
    }

    pub fn get_normalized(&self, id: ParamId) -> f32 {
        id.spec().to_normalized(self.get(id))
    }

    pub fn set_normalized(&self, id: ParamId, normalized: f32) {
        self.set(id, id.spec().from_normalized(normalized));
    }

    pub fn reset_to_defaults(&self) {
        for id in ParamId::ALL {
            self.slot(id).store(id.spec().default);
        }
    }

    #[inline]
    pub fn gain_db(&self) -> f32 {
        self.gain_db.load()
    }

    /// Linear gain from the dB value: `10^(dB / 20)`.
    #[inline]
    pub fn gain_linear(&self) -> f32 {
        db_to_gain(self.gain_db())
    }

    #[inline]
    pub fn pulse_width(&self) -> f32 {
        self.pulse_width.load()
    }

    #[inline]
    pub fn filter_control(&self) -> f32 {
        self.filter_control.load()
    }

    pub fn set_gain_db(&self, value: f32) {
        self.set(ParamId::Gain, value);
    }

    pub fn set_pulse_width(&self, value: f32) {
        self.set(ParamId::PulseWidth, value);
    }

    pub fn set_filter_control(&self, value: f32) {
        self.set(ParamId::FilterCutoff, value);
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn defaults_match_catalog() {
        let params = ParameterStore::new();
        assert_eq!(params.gain_db(), -12.0);
        assert_eq!(params.pulse_width(), 0.5);
        assert_eq!(params.filter_control(), 0.5);
    }

    #[test]
    fn set_clamps_to_range() {
        let params = ParameterStore::new();
        params.set_gain_db(12.0);
        assert_eq!(params.gain_db(), 0.0);
        params.set_gain_db(-100.0);
        assert_eq!(params.gain_db(), -60.0);
        params.set_pulse_width(0.0);
        assert!((params.pulse_width() - 0.05).abs() < 1e-6);
        params.set_filter_control(2.0);
        assert_eq!(params.filter_control(), 1.0);
    }

    #[test]
    fn set_snaps_to_step() {
        let params = ParameterStore::new();
        params.set_gain_db(-6.04);
        assert!((params.gain_db() + 6.0).abs() < 1e-4);
        params.set_pulse_width(0.12345);
        assert!((params.pulse_width() - 0.123).abs() < 1e-5);
    }

    #[test]
    fn non_finite_writes_are_ignored() {
        let params = ParameterStore::new();
        params.set_gain_db(f32::NAN);
        params.set_raw(ParamId::PulseWidth, f32::INFINITY);
        assert_eq!(params.gain_db(), -12.0);
        assert_eq!(params.pulse_width(), 0.5);
    }

    #[test]
    fn reset_restores_catalog_defaults() {
        let params = ParameterStore::new();
        params.set_gain_db(-40.0);
        params.set_raw(ParamId::PulseWidth, 0.123_4);
        params.set_filter_control(0.9);

        params.reset_to_defaults();
        for id in ParamId::ALL {
            assert_eq!(params.get(id), id.spec().default, "{id:?}");
        }
    }

    #[test]
    fn db_conversion() {
        assert!((db_to_gain(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_gain(-6.0) - 0.501_187).abs() < 1e-5);
        assert!((db_to_gain(-60.0) - 0.001).abs() < 1e-7);
    }

    #[test]
    fn normalized_round_trip() {
        let params = ParameterStore::new();
        params.set_normalized(ParamId::Gain, 0.5);
        assert!((params.gain_db() + 30.0).abs() < 1e-4);
        assert!((params.get_normalized(ParamId::Gain) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn ids_parse_and_format() {
        for id in ParamId::ALL {
            assert_eq!(ParamId::parse(id.as_str()), Some(id));
        }
        assert_eq!(ParamId::parse("resonance"), None);
        assert_eq!(GAIN.format(-12.0), "-12.0 dB");
        assert_eq!(PULSE_WIDTH.format(0.5), "0.500");
    }

    #[test]
    fn concurrent_writes_never_tear() {
        let params = Arc::new(ParameterStore::new());
        let writer = {
            let params = Arc::clone(&params);
            thread::spawn(move || {
                for i in 0..10_000 {
                    let value = if i % 2 == 0 { 0.1 } else { 0.9 };
                    params.set_raw(ParamId::FilterCutoff, value);
                }
            })
        };

        for _ in 0..10_000 {
            let value = params.filter_control();
            assert!(
                value == 0.1 || value == 0.9 || value == 0.5,
                "torn read: {value}"
            );
        }
        writer.join().unwrap();
    }
}

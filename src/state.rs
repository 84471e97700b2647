//! Opaque save/restore of the three parameter values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::params::{ParamId, ParameterStore};

pub const STATE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state blob is not valid: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported state version {0}")]
    Version(u32),
    #[error("parameter `{0}` is not a finite number")]
    NonFinite(&'static str),
}

/// Serialized form of the parameter store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginState {
    pub version: u32,
    pub gain: f32,
    pub pulse_width: f32,
    pub filter_cutoff: f32,
}

impl PluginState {
    pub fn capture(params: &ParameterStore) -> Self {
        Self {
            version: STATE_VERSION,
            gain: params.get(ParamId::Gain),
            pulse_width: params.get(ParamId::PulseWidth),
            filter_cutoff: params.get(ParamId::FilterCutoff),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        // A struct of plain numbers always serializes.
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Parse and validate. Nothing is applied on error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateError> {
        let state: PluginState = serde_json::from_slice(bytes)?;
        if state.version != STATE_VERSION {
            return Err(StateError::Version(state.version));
        }
        for (id, value) in state.values() {
            if !value.is_finite() {
                return Err(StateError::NonFinite(id.as_str()));
            }
        }
        Ok(state)
    }

    fn values(&self) -> [(ParamId, f32); 3] {
        [
            (ParamId::Gain, self.gain),
            (ParamId::PulseWidth, self.pulse_width),
            (ParamId::FilterCutoff, self.filter_cutoff),
        ]
    }

    /// Write into `params`, clamped to range but not re-snapped.
    pub fn apply(&self, params: &ParameterStore) {
        for (id, value) in self.values() {
            params.set_raw(id, value);
        }
    }
}

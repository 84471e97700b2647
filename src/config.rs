use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{synth::DEFAULT_POLYPHONY, MAX_BLOCK_SIZE};

pub const MAX_POLYPHONY: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("polyphony must be between 1 and {MAX_POLYPHONY}, got {0}")]
    Polyphony(usize),
    #[error("keyboard queue capacity must be non-zero")]
    KeyboardQueue,
    #[error("max block size must be non-zero")]
    BlockSize,
}

/// Construction-time sizing for a [`crate::Processor`].
///
/// Everything here is preallocated up front, so changing it means building a
/// new processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub polyphony: usize,
    pub keyboard_queue_capacity: usize,
    pub max_block_size: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            polyphony: DEFAULT_POLYPHONY,
            keyboard_queue_capacity: 256,
            max_block_size: MAX_BLOCK_SIZE,
        }
    }
}

impl ProcessorConfig {
    pub fn polyphony(mut self, voices: usize) -> Self {
        self.polyphony = voices;
        self
    }

    pub fn keyboard_queue_capacity(mut self, capacity: usize) -> Self {
        self.keyboard_queue_capacity = capacity;
        self
    }

    pub fn max_block_size(mut self, frames: usize) -> Self {
        self.max_block_size = frames;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.polyphony == 0 || self.polyphony > MAX_POLYPHONY {
            return Err(ConfigError::Polyphony(self.polyphony));
        }
        if self.keyboard_queue_capacity == 0 {
            return Err(ConfigError::KeyboardQueue);
        }
        if self.max_block_size == 0 {
            return Err(ConfigError::BlockSize);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_eight_voices_and_valid() {
        let config = ProcessorConfig::default();
        assert_eq!(config.polyphony, 8);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(
            ProcessorConfig::default().polyphony(0).validate(),
            Err(ConfigError::Polyphony(0))
        );
        assert_eq!(
            ProcessorConfig::default().polyphony(65).validate(),
            Err(ConfigError::Polyphony(65))
        );
        assert_eq!(
            ProcessorConfig::default().keyboard_queue_capacity(0).validate(),
            Err(ConfigError::KeyboardQueue)
        );
        assert_eq!(
            ProcessorConfig::default().max_block_size(0).validate(),
            Err(ConfigError::BlockSize)
        );
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ProcessorConfig = serde_json::from_str(r#"{ "polyphony": 4 }"#).unwrap();
        assert_eq!(config.polyphony, 4);
        assert_eq!(config.keyboard_queue_capacity, 256);
    }
}

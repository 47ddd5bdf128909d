//! Bijection between encoded joint actions and per-device on/off vectors.

use crate::error::{Error, Result};

/// Largest joint action space the dense table accepts (10 devices).
pub const MAX_ACTIONS: usize = 1024;

/// Encodes and decodes joint actions for a fixed device count.
///
/// Bit vectors are most-significant-first: entry 0 (the first registered
/// device) is the highest bit of the encoded integer.
///
/// # Examples
///
/// ```
/// use home_energy_rl::agent::action::ActionCodec;
///
/// let codec = ActionCodec::new(3).unwrap();
/// assert_eq!(codec.num_actions(), 8);
/// assert_eq!(codec.decode(6).unwrap(), vec![1, 1, 0]);
/// assert_eq!(codec.encode(&[1, 1, 0]).unwrap(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionCodec {
    num_devices: usize,
    num_actions: usize,
}

impl ActionCodec {
    /// Creates a codec for `num_devices` devices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionSpaceTooLarge`] if `2^num_devices` exceeds
    /// [`MAX_ACTIONS`].
    pub fn new(num_devices: usize) -> Result<Self> {
        // Saturates instead of overflowing for absurd device counts.
        let num_actions = u32::try_from(num_devices)
            .ok()
            .and_then(|n| 1_usize.checked_shl(n))
            .unwrap_or(usize::MAX);
        if num_actions > MAX_ACTIONS {
            return Err(Error::ActionSpaceTooLarge {
                devices: num_devices,
                actions: num_actions,
                max: MAX_ACTIONS,
            });
        }
        Ok(Self {
            num_devices,
            num_actions,
        })
    }

    pub fn num_devices(&self) -> usize {
        self.num_devices
    }

    /// `2^num_devices`.
    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Packs a 0/1 vector into an action index. Non-zero entries count as 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionSizeMismatch`] if `bits.len()` differs from the
    /// device count.
    pub fn encode(&self, bits: &[u8]) -> Result<usize> {
        if bits.len() != self.num_devices {
            return Err(Error::ActionSizeMismatch {
                expected: self.num_devices,
                actual: bits.len(),
            });
        }
        Ok(bits
            .iter()
            .fold(0_usize, |acc, &b| (acc << 1) | usize::from(b != 0)))
    }

    /// Unpacks an action index into a fixed-width 0/1 vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAction`] if `action >= num_actions`.
    pub fn decode(&self, action: usize) -> Result<Vec<u8>> {
        if action >= self.num_actions {
            return Err(Error::InvalidAction {
                action,
                num_actions: self.num_actions,
            });
        }
        Ok((0..self.num_devices)
            .rev()
            .map(|shift| ((action >> shift) & 1) as u8)
            .collect())
    }
}

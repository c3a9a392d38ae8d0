//! Deterministic avatar derivation from kitty DNA.
//!
//! A renderer composes the avatar from a fixed set of part sprites; this
//! module only picks the part indices. The mapping reads fixed DNA byte
//! positions and reduces each modulo the part's variant count, so equal DNA
//! always yields an identical avatar and no state is involved.

use crate::types::Dna;

/// Variant counts per part, matching the sprite sets shipped with the
/// presentation layer.
const BODY_VARIANTS: u8 = 15;
const FUR_VARIANTS: u8 = 10;
const EYES_VARIANTS: u8 = 15;
const MOUTH_VARIANTS: u8 = 10;
const ACCESSORY_VARIANTS: u8 = 20;

/// Sprite part indices for one kitty avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Avatar {
    /// Body sprite index, `0..15`.
    pub body: u8,
    /// Fur sprite index, `0..10`.
    pub fur: u8,
    /// Eyes sprite index, `0..15`.
    pub eyes: u8,
    /// Mouth sprite index, `0..10`.
    pub mouth: u8,
    /// Accessory sprite index, `0..20`.
    pub accessory: u8,
}

impl Avatar {
    /// Derive the avatar for a DNA value.
    pub fn from_dna(dna: &Dna) -> Self {
        let bytes = dna.bytes();
        Self {
            body: bytes[0] % BODY_VARIANTS,
            fur: bytes[1] % FUR_VARIANTS,
            eyes: bytes[2] % EYES_VARIANTS,
            mouth: bytes[3] % MOUTH_VARIANTS,
            accessory: bytes[4] % ACCESSORY_VARIANTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DNA_BYTES;

    #[test]
    fn test_derivation_is_deterministic() {
        let dna = Dna([7; DNA_BYTES]);
        assert_eq!(Avatar::from_dna(&dna), Avatar::from_dna(&dna));
    }

    #[test]
    fn test_indices_stay_in_range() {
        for seed in 0..=255u8 {
            let mut bytes = [0u8; DNA_BYTES];
            bytes.iter_mut().enumerate().for_each(|(i, b)| {
                *b = seed.wrapping_add(i as u8).wrapping_mul(31);
            });
            let avatar = Avatar::from_dna(&Dna(bytes));
            assert!(avatar.body < BODY_VARIANTS);
            assert!(avatar.fur < FUR_VARIANTS);
            assert!(avatar.eyes < EYES_VARIANTS);
            assert!(avatar.mouth < MOUTH_VARIANTS);
            assert!(avatar.accessory < ACCESSORY_VARIANTS);
        }
    }

    #[test]
    fn test_distinct_dna_can_differ() {
        let a = Avatar::from_dna(&Dna([0; DNA_BYTES]));
        let b = Avatar::from_dna(&Dna([1; DNA_BYTES]));
        assert_ne!(a, b);
    }
}

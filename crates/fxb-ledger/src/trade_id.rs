use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of a generated trade id.
pub const TRADE_ID_LEN: usize = 12;

/// Alphabet for generated trade ids: uppercase ASCII letters and digits.
pub const TRADE_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Identifier shared by the three legs of one bracket.
///
/// Generated ids are not checked for uniqueness; with 36^12 possible values
/// a collision within one run is treated as impossible. The ledger links legs
/// by row, not by this id, so a collision would only affect reporting.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(String);

impl TradeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Draw a fresh id of [`TRADE_ID_LEN`] characters from [`TRADE_ID_CHARSET`].
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = (0..TRADE_ID_LEN)
            .map(|_| TRADE_ID_CHARSET[rng.gen_range(0..TRADE_ID_CHARSET.len())] as char)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_id_has_expected_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let id = TradeId::generate(&mut rng);
            assert_eq!(id.as_str().len(), TRADE_ID_LEN);
            assert!(id
                .as_str()
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let xs: Vec<_> = (0..5).map(|_| TradeId::generate(&mut a)).collect();
        let ys: Vec<_> = (0..5).map(|_| TradeId::generate(&mut b)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn consecutive_ids_differ() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = TradeId::generate(&mut rng);
        let b = TradeId::generate(&mut rng);
        assert_ne!(a, b);
    }
}

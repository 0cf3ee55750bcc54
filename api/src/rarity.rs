//! Weighted rarity tiers and random trait generation, rolled once per mint.

use std::fmt;

use alloy_primitives::U256;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::MarketError;
use crate::state::Attribute;

pub const TOTAL_WEIGHT_BPS: u32 = 10_000;
pub const MAX_SCORE: u16 = 10_000;

pub const RARITY_TRAIT: &str = "Rarity";
pub const RARITY_SCORE_TRAIT: &str = "Rarity Score";

#[repr(u8)]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, IntoPrimitive,
    TryFromPrimitive,
)]
pub enum RarityTier {
    Common = 0,
    Uncommon = 1,
    Rare = 2,
    Epic = 3,
    Legendary = 4,
    Mythical = 5,
}

impl RarityTier {
    pub const ALL: [RarityTier; 6] = [
        RarityTier::Common,
        RarityTier::Uncommon,
        RarityTier::Rare,
        RarityTier::Epic,
        RarityTier::Legendary,
        RarityTier::Mythical,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RarityTier::Common => "Common",
            RarityTier::Uncommon => "Uncommon",
            RarityTier::Rare => "Rare",
            RarityTier::Epic => "Epic",
            RarityTier::Legendary => "Legendary",
            RarityTier::Mythical => "Mythical",
        }
    }

    /// Entry of the standard table.
    pub fn spec(self) -> &'static TierSpec {
        &STANDARD_TIERS[u8::from(self) as usize]
    }
}

impl fmt::Display for RarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierSpec {
    pub tier: RarityTier,
    /// Probability in basis points.
    pub weight_bps: u32,
    pub min_score: u16,
    pub max_score: u16,
    pub color: &'static str,
    pub multiplier: f64,
}

impl TierSpec {
    pub fn percentage(&self) -> f64 {
        self.weight_bps as f64 / 100.0
    }

    pub fn contains(&self, score: u16) -> bool {
        (self.min_score..=self.max_score).contains(&score)
    }
}

pub const STANDARD_TIERS: [TierSpec; 6] = [
    TierSpec {
        tier: RarityTier::Common,
        weight_bps: 5_000,
        min_score: 0,
        max_score: 4_999,
        color: "#9CA3AF",
        multiplier: 1.0,
    },
    TierSpec {
        tier: RarityTier::Uncommon,
        weight_bps: 2_500,
        min_score: 5_000,
        max_score: 7_499,
        color: "#22C55E",
        multiplier: 1.2,
    },
    TierSpec {
        tier: RarityTier::Rare,
        weight_bps: 1_500,
        min_score: 7_500,
        max_score: 8_999,
        color: "#3B82F6",
        multiplier: 1.5,
    },
    TierSpec {
        tier: RarityTier::Epic,
        weight_bps: 750,
        min_score: 9_000,
        max_score: 9_749,
        color: "#A855F7",
        multiplier: 2.0,
    },
    TierSpec {
        tier: RarityTier::Legendary,
        weight_bps: 200,
        min_score: 9_750,
        max_score: 9_949,
        color: "#F59E0B",
        multiplier: 3.0,
    },
    TierSpec {
        tier: RarityTier::Mythical,
        weight_bps: 50,
        min_score: 9_950,
        max_score: MAX_SCORE,
        color: "#EF4444",
        multiplier: 5.0,
    },
];

const fn total_weight(tiers: &[TierSpec]) -> u32 {
    let mut sum = 0;
    let mut i = 0;
    while i < tiers.len() {
        sum += tiers[i].weight_bps;
        i += 1;
    }
    sum
}

const _: () = assert!(total_weight(&STANDARD_TIERS) == TOTAL_WEIGHT_BPS);

/// Candidate values per trait category; each mint picks one per category uniformly.
pub const TRAIT_CATALOGUE: &[(&str, &[&str])] = &[
    ("Background", &["Midnight", "Sunset", "Ocean", "Forest", "Desert", "Nebula"]),
    ("Body", &["Robot", "Alien", "Zombie", "Ape", "Cat", "Skeleton"]),
    ("Eyes", &["Laser", "Sleepy", "Wide", "Cyclops", "Hypno", "Shades"]),
    ("Mouth", &["Grin", "Frown", "Pipe", "Tongue", "Fangs"]),
    ("Headwear", &["None", "Crown", "Cap", "Halo", "Horns", "Beanie"]),
    ("Accessory", &["None", "Gold Chain", "Earring", "Scarf", "Monocle"]),
];

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RarityResult {
    pub tier: RarityTier,
    pub score: u16,
    pub percentage: f64,
    pub color: &'static str,
    pub multiplier: f64,
    /// Catalogue traits followed by `Rarity` and `Rarity Score`.
    pub attributes: Vec<Attribute>,
}

impl RarityResult {
    /// Suggested list price: `base` scaled by the tier multiplier (two decimals).
    pub fn price_hint(&self, base: U256) -> U256 {
        let hundredths = (self.multiplier * 100.0).round() as u64;
        base * U256::from(hundredths) / U256::from(100u64)
    }
}

pub fn random_traits<R: Rng>(rng: &mut R) -> Vec<Attribute> {
    TRAIT_CATALOGUE
        .iter()
        .filter_map(|(category, values)| {
            values
                .choose(rng)
                .map(|value| Attribute::text(*category, *value))
        })
        .collect()
}

pub struct RarityGenerator {
    tiers: Vec<TierSpec>,
    index: WeightedIndex<u32>,
}

impl RarityGenerator {
    pub fn new(tiers: Vec<TierSpec>) -> Result<Self, MarketError> {
        let total = total_weight(&tiers);
        if total != TOTAL_WEIGHT_BPS {
            return Err(MarketError::InvalidRarityTable(total));
        }
        if tiers
            .iter()
            .any(|t| t.min_score > t.max_score || t.max_score > MAX_SCORE)
        {
            return Err(MarketError::InvalidRarityTable(total));
        }
        let index = WeightedIndex::new(tiers.iter().map(|t| t.weight_bps))
            .map_err(|_| MarketError::InvalidRarityTable(total))?;
        Ok(Self { tiers, index })
    }

    pub fn standard() -> Self {
        Self::new(STANDARD_TIERS.to_vec()).expect("standard rarity table is checked at compile time")
    }

    pub fn tiers(&self) -> &[TierSpec] {
        &self.tiers
    }

    pub fn roll_tier<R: Rng>(&self, rng: &mut R) -> &TierSpec {
        &self.tiers[self.index.sample(rng)]
    }

    pub fn roll<R: Rng>(&self, rng: &mut R) -> RarityResult {
        let spec = *self.roll_tier(rng);
        let score = rng.gen_range(spec.min_score..=spec.max_score);

        let mut attributes = random_traits(rng);
        attributes.push(Attribute::text(RARITY_TRAIT, spec.tier.name()));
        attributes.push(Attribute::number(RARITY_SCORE_TRAIT, u64::from(score)));

        RarityResult {
            tier: spec.tier,
            score,
            percentage: spec.percentage(),
            color: spec.color,
            multiplier: spec.multiplier,
            attributes,
        }
    }

    /// Reproducible roll for a given seed.
    pub fn roll_seeded(&self, seed: u64) -> RarityResult {
        self.roll(&mut StdRng::seed_from_u64(seed))
    }
}

impl Default for RarityGenerator {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_standard_weights_sum_to_one_hundred_percent() {
        let sum: f64 = STANDARD_TIERS.iter().map(TierSpec::percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        for (i, tier) in RarityTier::ALL.iter().enumerate() {
            assert_eq!(STANDARD_TIERS[i].tier, *tier);
            assert_eq!(RarityTier::try_from(i as u8).unwrap(), *tier);
        }
    }

    #[test]
    fn test_bands_are_contiguous() {
        assert_eq!(STANDARD_TIERS[0].min_score, 0);
        for pair in STANDARD_TIERS.windows(2) {
            assert_eq!(pair[0].max_score + 1, pair[1].min_score);
        }
        assert_eq!(STANDARD_TIERS[5].max_score, MAX_SCORE);
    }

    #[test]
    fn test_rejects_bad_table() {
        let mut tiers = STANDARD_TIERS.to_vec();
        tiers[0].weight_bps = 4_999;
        assert!(matches!(
            RarityGenerator::new(tiers),
            Err(MarketError::InvalidRarityTable(9_999))
        ));

        let mut tiers = STANDARD_TIERS.to_vec();
        tiers[1].min_score = 8_000;
        assert!(RarityGenerator::new(tiers).is_err());
    }

    #[test]
    fn test_tier_frequencies_converge() {
        let generator = RarityGenerator::standard();
        let mut rng = StdRng::seed_from_u64(7);
        let rolls = 200_000u32;

        let mut counts: HashMap<RarityTier, u32> = HashMap::new();
        for _ in 0..rolls {
            *counts.entry(generator.roll_tier(&mut rng).tier).or_insert(0) += 1;
        }

        for spec in &STANDARD_TIERS {
            let p = spec.weight_bps as f64 / TOTAL_WEIGHT_BPS as f64;
            let expected = p * rolls as f64;
            let sigma = (rolls as f64 * p * (1.0 - p)).sqrt();
            let observed = *counts.get(&spec.tier).unwrap_or(&0) as f64;
            assert!(
                (observed - expected).abs() < 5.0 * sigma,
                "{}: observed {} expected {}",
                spec.tier,
                observed,
                expected
            );
        }
    }

    #[test]
    fn test_scores_stay_in_band() {
        let generator = RarityGenerator::standard();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20_000 {
            let result = generator.roll(&mut rng);
            let spec = result.tier.spec();
            assert!(spec.contains(result.score), "{} out of {}", result.score, result.tier);
            assert_eq!(result.color, spec.color);
            assert_eq!(result.multiplier, spec.multiplier);
        }
    }

    #[test]
    fn test_attributes_cover_catalogue_and_rarity() {
        let result = RarityGenerator::standard().roll_seeded(3);
        assert_eq!(result.attributes.len(), TRAIT_CATALOGUE.len() + 2);
        for (category, values) in TRAIT_CATALOGUE {
            let attr = result
                .attributes
                .iter()
                .find(|a| a.trait_type == *category)
                .unwrap();
            assert!(values.iter().any(|v| attr.value == *v));
        }
        let rarity = &result.attributes[TRAIT_CATALOGUE.len()];
        assert_eq!(rarity.trait_type, RARITY_TRAIT);
        assert_eq!(rarity.value, result.tier.name());
        let score = &result.attributes[TRAIT_CATALOGUE.len() + 1];
        assert_eq!(score.trait_type, RARITY_SCORE_TRAIT);
        assert_eq!(score.value, u64::from(result.score));
    }

    #[test]
    fn test_seeded_rolls_repeat() {
        let generator = RarityGenerator::standard();
        assert_eq!(generator.roll_seeded(99), generator.roll_seeded(99));
    }

    #[test]
    fn test_price_hint() {
        let mut result = RarityGenerator::standard().roll_seeded(1);
        result.multiplier = 1.2;
        assert_eq!(result.price_hint(U256::from(1_000u64)), U256::from(1_200u64));
    }
}

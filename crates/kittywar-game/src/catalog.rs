//! The reference catalog: cats, abilities, and chance cards.
//!
//! Cards are identified on the wire by a single byte. The catalog maps
//! those ids to the static data the client needs: titles, starting
//! health, trigger phases. It is built once and shared read-only (usually
//! behind an `Arc`) for the rest of the process.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{GameError, TurnPhase};

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

macro_rules! card_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u8);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }

        impl From<u8> for $name {
            fn from(id: u8) -> Self {
                Self(id)
            }
        }
    };
}

card_id!(
    /// Identifies a [`CatCard`].
    CatId,
    "cat"
);
card_id!(
    /// Identifies an [`AbilityCard`].
    AbilityId,
    "ability"
);
card_id!(
    /// Identifies a [`ChanceCard`].
    ChanceId,
    "chance"
);

// ---------------------------------------------------------------------------
// Basic moves
// ---------------------------------------------------------------------------

/// One of the four basic moves a player commits to each round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Purr = 0,
    Guard = 1,
    Scratch = 2,
    Skip = 3,
}

impl Move {
    pub const ALL: [Move; 4] = [Self::Purr, Self::Guard, Self::Scratch, Self::Skip];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.id() == id)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Purr => "Purr",
            Self::Guard => "Guard",
            Self::Scratch => "Scratch",
            Self::Skip => "Skip",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// When an ability can be activated by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityTrigger {
    /// Applied by the server on its own. The player never activates it.
    Passive,
    /// Activatable by the player during this phase, gated by cooldown.
    Phase(TurnPhase),
}

/// The basic move a chance card modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChanceCategory {
    Purr,
    Guard,
    Scratch,
}

impl ChanceCategory {
    pub fn basic_move(self) -> Move {
        match self {
            Self::Purr => Move::Purr,
            Self::Guard => Move::Guard,
            Self::Scratch => Move::Scratch,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Purr => "Purr Chance",
            Self::Guard => "Guard Chance",
            Self::Scratch => "Scratch Chance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatCard {
    pub id: CatId,
    pub title: String,
    pub max_health: u8,
    pub inborn_ability: AbilityId,
    #[serde(default)]
    pub introduction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityCard {
    pub id: AbilityId,
    pub title: String,
    pub trigger: AbilityTrigger,
    /// Nominal cooldown in rounds, as advertised to the player.
    pub cooldown: u8,
    #[serde(default)]
    pub description: String,
}

impl AbilityCard {
    pub fn is_passive(&self) -> bool {
        self.trigger == AbilityTrigger::Passive
    }

    /// Activatable abilities are the ones whose cooldown the client tracks.
    pub fn tracks_cooldown(&self) -> bool {
        !self.is_passive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChanceCard {
    pub id: ChanceId,
    pub title: String,
    pub category: ChanceCategory,
    #[serde(default)]
    pub description: String,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Read-only lookup tables for every card in the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    cats: Vec<CatCard>,
    abilities: Vec<AbilityCard>,
    chances: Vec<ChanceCard>,
}

impl Catalog {
    /// Builds a catalog, checking that ids are unique and that every
    /// cat's inborn ability exists.
    pub fn new(
        cats: Vec<CatCard>,
        abilities: Vec<AbilityCard>,
        chances: Vec<ChanceCard>,
    ) -> Result<Self, GameError> {
        let catalog = Self {
            cats,
            abilities,
            chances,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Loads a catalog from its JSON form (the same shape `serde_json`
    /// produces for [`Catalog`]).
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), GameError> {
        fn unique<T: Copy + Eq + std::hash::Hash + fmt::Display>(
            ids: impl Iterator<Item = T>,
        ) -> Result<(), GameError> {
            let mut seen = HashSet::new();
            for id in ids {
                if !seen.insert(id) {
                    return Err(GameError::InvalidCatalog(format!("duplicate id {id}")));
                }
            }
            Ok(())
        }

        unique(self.cats.iter().map(|c| c.id))?;
        unique(self.abilities.iter().map(|a| a.id))?;
        unique(self.chances.iter().map(|c| c.id))?;

        for cat in &self.cats {
            if self.ability(cat.inborn_ability).is_err() {
                return Err(GameError::InvalidCatalog(format!(
                    "{} has unknown inborn {}",
                    cat.id, cat.inborn_ability
                )));
            }
            if cat.max_health == 0 {
                return Err(GameError::InvalidCatalog(format!(
                    "{} has zero max health",
                    cat.id
                )));
            }
        }
        Ok(())
    }

    pub fn cat(&self, id: CatId) -> Result<&CatCard, GameError> {
        self.cats
            .iter()
            .find(|c| c.id == id)
            .ok_or(GameError::UnknownCat(id))
    }

    pub fn ability(&self, id: AbilityId) -> Result<&AbilityCard, GameError> {
        self.abilities
            .iter()
            .find(|a| a.id == id)
            .ok_or(GameError::UnknownAbility(id))
    }

    pub fn chance(&self, id: ChanceId) -> Result<&ChanceCard, GameError> {
        self.chances
            .iter()
            .find(|c| c.id == id)
            .ok_or(GameError::UnknownChance(id))
    }

    pub fn cats(&self) -> &[CatCard] {
        &self.cats
    }

    pub fn abilities(&self) -> &[AbilityCard] {
        &self.abilities
    }

    pub fn chances(&self) -> &[ChanceCard] {
        &self.chances
    }

    /// The card set the official server deals from.
    pub fn standard() -> Self {
        let cat = |id, title: &str, max_health, inborn, introduction: &str| CatCard {
            id: CatId(id),
            title: title.to_string(),
            max_health,
            inborn_ability: AbilityId(inborn),
            introduction: introduction.to_string(),
        };
        let ability = |id, title: &str, trigger, cooldown, description: &str| AbilityCard {
            id: AbilityId(id),
            title: title.to_string(),
            trigger,
            cooldown,
            description: description.to_string(),
        };
        let chance = |id, title: &str, category, description: &str| ChanceCard {
            id: ChanceId(id),
            title: title.to_string(),
            category,
            description: description.to_string(),
        };
        const DOUBLE_DAMAGE: &str = "Double the damage you cause in current round \
             (works together with Double Scratch) at the cost of losing 1 HP at postlude";

        Self {
            cats: vec![
                cat(0, "Persian Cat", 10, 0, "A quiet, placid long-haired breed."),
                cat(1, "Ragdoll Cat", 5, 1, "An even-tempered gentle giant."),
            ],
            abilities: vec![
                ability(0, "Rejuvenation", AbilityTrigger::Passive, 10, "Gain 1 HP"),
                ability(
                    1,
                    "Gentleman",
                    AbilityTrigger::Passive,
                    1,
                    "Gain 1 chance card if you successfully dodge two points damage",
                ),
                ability(2, "Hunting", AbilityTrigger::Passive, 0, ""),
                ability(3, "Recycling", AbilityTrigger::Passive, 0, ""),
                ability(4, "Loneliness", AbilityTrigger::Passive, 0, ""),
                ability(5, "Spotlight", AbilityTrigger::Passive, 0, ""),
                ability(6, "Attacker", AbilityTrigger::Passive, 1, DOUBLE_DAMAGE),
                ability(
                    7,
                    "Critical Hit",
                    AbilityTrigger::Phase(TurnPhase::Prelude),
                    10,
                    DOUBLE_DAMAGE,
                ),
            ],
            chances: vec![
                chance(0, "Double Purring", ChanceCategory::Purr, "Totally gain 2 HP if you don't get attacked"),
                chance(1, "Guaranteed Purring", ChanceCategory::Purr, "Totally gain 1 HP no matter you get attacked or not"),
                chance(2, "Purr and Draw", ChanceCategory::Purr, "Draw a new chance card if successfully gain 1 HP"),
                chance(3, "Reverse Scratch", ChanceCategory::Guard, "Reverse the damage"),
                chance(4, "Guard and Heal", ChanceCategory::Guard, "Totally gain 1 HP if you successfully dodge"),
                chance(5, "Guard and Draw", ChanceCategory::Guard, "Draw a new chance card if you successfully dodge"),
                chance(6, "Can't Reverse", ChanceCategory::Scratch, "Damage can't be reversed"),
                chance(7, "Can't Guard", ChanceCategory::Scratch, "Scratch can't be dodged"),
                chance(8, "Double Scratch", ChanceCategory::Scratch, "Totally cause 2 points damage"),
            ],
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

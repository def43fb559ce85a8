//! Descriptive blueprint metadata: item categories and shelf life.
//!
//! None of these types take part in cost or resource aggregation. They carry
//! the same ordinal contract as [`Grade`](crate::grade::Grade) so storage
//! layers can keep integer columns.

use crate::grade::UnknownOrdinal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Component categories
// ---------------------------------------------------------------------------

/// Category of a crafted item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ComponentType {
    Scrap = 0,
    Herb = 1,
    Weapon = 2,
    #[default]
    Gizmo = 3,
    Produce = 4,
    Brew = 5,
    Meal = 6,
    Injectable = 7,
    Armor = 8,
    Vehicle = 9,
    RoomAugment = 10,
    WeaponAugment = 11,
    ArmorAugment = 12,
    VehicleAugment = 13,
    Trap = 14,
    ShieldAugment = 15,
    RangedExotic = 16,
    MeleeExotic = 17,
}

impl ComponentType {
    pub const ALL: [ComponentType; 18] = [
        ComponentType::Scrap,
        ComponentType::Herb,
        ComponentType::Weapon,
        ComponentType::Gizmo,
        ComponentType::Produce,
        ComponentType::Brew,
        ComponentType::Meal,
        ComponentType::Injectable,
        ComponentType::Armor,
        ComponentType::Vehicle,
        ComponentType::RoomAugment,
        ComponentType::WeaponAugment,
        ComponentType::ArmorAugment,
        ComponentType::VehicleAugment,
        ComponentType::Trap,
        ComponentType::ShieldAugment,
        ComponentType::RangedExotic,
        ComponentType::MeleeExotic,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            ComponentType::Scrap => "Scrap",
            ComponentType::Herb => "Herb",
            ComponentType::Weapon => "Weapon",
            ComponentType::Gizmo => "Gizmo",
            ComponentType::Produce => "Produce",
            ComponentType::Brew => "Brew",
            ComponentType::Meal => "Meal",
            ComponentType::Injectable => "Injectable",
            ComponentType::Armor => "Armor",
            ComponentType::Vehicle => "Vehicle",
            ComponentType::RoomAugment => "Room Augment",
            ComponentType::WeaponAugment => "Weapon Augment",
            ComponentType::ArmorAugment => "Armor Augment",
            ComponentType::VehicleAugment => "Vehicle Augment",
            ComponentType::Trap => "Trap",
            ComponentType::ShieldAugment => "Shield Augment",
            ComponentType::RangedExotic => "Ranged Exotic",
            ComponentType::MeleeExotic => "Melee Exotic",
        }
    }

    /// `(ordinal, name)` pairs, sorted by display name.
    pub fn choices() -> Vec<(u8, &'static str)> {
        let mut choices: Vec<_> = Self::ALL.iter().map(|c| (c.ordinal(), c.name())).collect();
        choices.sort_by_key(|&(_, name)| name);
        choices
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for ComponentType {
    type Error = UnknownOrdinal;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(UnknownOrdinal {
                kind: "component type",
                ordinal: value,
            })
    }
}

// ---------------------------------------------------------------------------
// Expiration
// ---------------------------------------------------------------------------

/// Unit in which an item's shelf life is counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TimeUnit {
    #[default]
    NoExpiration = 0,
    EndOfEvent = 1,
    Hours = 2,
    Days = 3,
    Months = 4,
    Years = 5,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 6] = [
        TimeUnit::NoExpiration,
        TimeUnit::EndOfEvent,
        TimeUnit::Hours,
        TimeUnit::Days,
        TimeUnit::Months,
        TimeUnit::Years,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::NoExpiration => "no expiration",
            TimeUnit::EndOfEvent => "end of event",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
            TimeUnit::Months => "months",
            TimeUnit::Years => "years",
        }
    }
}

impl TryFrom<u8> for TimeUnit {
    type Error = UnknownOrdinal;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL.get(value as usize).copied().ok_or(UnknownOrdinal {
            kind: "time unit",
            ordinal: value,
        })
    }
}

/// How long an item stays usable once crafted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expiration {
    #[serde(default)]
    pub units: u16,
    #[serde(default)]
    pub time_unit: TimeUnit,
}

impl Expiration {
    pub fn new(units: u16, time_unit: TimeUnit) -> Self {
        Self { units, time_unit }
    }

    pub fn never() -> Self {
        Self::default()
    }

    pub fn expires(&self) -> bool {
        self.units != 0 && self.time_unit != TimeUnit::NoExpiration
    }
}

impl fmt::Display for Expiration {
    /// `None` for items that never expire, otherwise e.g. `6 months`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expires() {
            write!(f, "{} {}", self.units, self.time_unit.name())
        } else {
            f.write_str("None")
        }
    }
}

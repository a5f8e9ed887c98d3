//! Read-only reference tables the sizing engine works against.
//!
//! A [`Catalog`] is loaded once at start-up (see [`Catalog::from_dir`]) and
//! never mutated afterwards, so it can be shared freely between callers.

mod loader;
pub mod types;

use std::collections::BTreeMap;

use serde::Serialize;

pub use loader::{ARCHETYPES_FILE, SOLAR_FILE, TIERS_FILE};
pub use types::{Archetype, Pack, PackGroup, SolarCityYield, Tier};

/// One pack table per [`PackGroup`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PackTables {
    #[serde(rename = "ac1p")]
    ac1p: BTreeMap<String, Pack>,
    #[serde(rename = "ac3p")]
    ac3p: BTreeMap<String, Pack>,
    #[serde(rename = "dc12")]
    dc12v: BTreeMap<String, Pack>,
    #[serde(rename = "dc24")]
    dc24v: BTreeMap<String, Pack>,
    #[serde(rename = "dc48")]
    dc48v: BTreeMap<String, Pack>,
}

impl PackTables {
    pub fn table(&self, group: PackGroup) -> &BTreeMap<String, Pack> {
        match group {
            PackGroup::Ac1p => &self.ac1p,
            PackGroup::Ac3p => &self.ac3p,
            PackGroup::Dc12v => &self.dc12v,
            PackGroup::Dc24v => &self.dc24v,
            PackGroup::Dc48v => &self.dc48v,
        }
    }

    fn table_mut(&mut self, group: PackGroup) -> &mut BTreeMap<String, Pack> {
        match group {
            PackGroup::Ac1p => &mut self.ac1p,
            PackGroup::Ac3p => &mut self.ac3p,
            PackGroup::Dc12v => &mut self.dc12v,
            PackGroup::Dc24v => &mut self.dc24v,
            PackGroup::Dc48v => &mut self.dc48v,
        }
    }

    /// Inserts a pack into its group's table, replacing any pack with the same key.
    pub fn insert(&mut self, pack: Pack) {
        self.table_mut(pack.group).insert(pack.key.clone(), pack);
    }

    pub fn len(&self) -> usize {
        PackGroup::ALL.iter().map(|g| self.table(*g).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Archetypes, packs, tiers and solar yields.
///
/// Tiers keep the order they were supplied in; [`Catalog::from_dir`] supplies
/// them sorted by tier id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    archetypes: BTreeMap<String, Archetype>,
    packs: PackTables,
    tiers: Vec<Tier>,
    solar: BTreeMap<String, SolarCityYield>,
}

impl Catalog {
    /// Builds a catalog from in-memory records.
    ///
    /// Later records replace earlier ones with the same id.
    pub fn new(
        archetypes: impl IntoIterator<Item = Archetype>,
        packs: impl IntoIterator<Item = Pack>,
        tiers: impl IntoIterator<Item = Tier>,
        solar: impl IntoIterator<Item = SolarCityYield>,
    ) -> Self {
        let mut tables = PackTables::default();
        for pack in packs {
            tables.insert(pack);
        }

        let mut tier_list: Vec<Tier> = Vec::new();
        for tier in tiers {
            match tier_list.iter_mut().find(|t| t.id == tier.id) {
                Some(existing) => *existing = tier,
                None => tier_list.push(tier),
            }
        }

        Self {
            archetypes: archetypes.into_iter().map(|a| (a.id.clone(), a)).collect(),
            packs: tables,
            tiers: tier_list,
            solar: solar.into_iter().map(|s| (s.city.clone(), s)).collect(),
        }
    }

    pub fn archetype(&self, id: &str) -> Option<&Archetype> {
        self.archetypes.get(id)
    }

    pub fn archetypes(&self) -> impl Iterator<Item = &Archetype> {
        self.archetypes.values()
    }

    pub fn pack(&self, group: PackGroup, key: &str) -> Option<&Pack> {
        self.packs.table(group).get(key)
    }

    pub fn packs(&self) -> &PackTables {
        &self.packs
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn tier(&self, id: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.id == id)
    }

    pub fn solar_city(&self, city: &str) -> Option<&SolarCityYield> {
        self.solar.get(city)
    }

    pub fn solar_cities(&self) -> impl Iterator<Item = &SolarCityYield> {
        self.solar.values()
    }
}

/// Listing shape: every table keyed by id.
#[derive(Serialize)]
struct CatalogListing<'a> {
    archetypes: &'a BTreeMap<String, Archetype>,
    packs: &'a PackTables,
    tiers: BTreeMap<&'a str, &'a Tier>,
    solar: &'a BTreeMap<String, SolarCityYield>,
}

impl Serialize for Catalog {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CatalogListing {
            archetypes: &self.archetypes,
            packs: &self.packs,
            tiers: self.tiers.iter().map(|t| (t.id.as_str(), t)).collect(),
            solar: &self.solar,
        }
        .serialize(serializer)
    }
}

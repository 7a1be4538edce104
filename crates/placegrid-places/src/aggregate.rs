//! Identifier-keyed merge of tile results.
//!
//! First write wins: a `place_id` seen again in a later tile is discarded
//! without comparison. Insertion order is preserved, so enrichment and output
//! follow the order in which places were first seen during grid traversal.

use std::collections::HashMap;

use crate::types::LightweightPlace;

#[derive(Debug, Default, Clone)]
pub struct PlaceTable {
    places: Vec<LightweightPlace>,
    index: HashMap<String, usize>,
}

impl PlaceTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `place` unless its identifier is blank or already present.
    ///
    /// Returns `true` when the place was added.
    pub fn insert(&mut self, place: LightweightPlace) -> bool {
        if place.place_id.trim().is_empty() || self.index.contains_key(&place.place_id) {
            return false;
        }
        self.index.insert(place.place_id.clone(), self.places.len());
        self.places.push(place);
        true
    }

    /// Inserts every place from one tile; returns how many were new.
    pub fn absorb<I>(&mut self, tile: I) -> usize
    where
        I: IntoIterator<Item = LightweightPlace>,
    {
        tile.into_iter()
            .fold(0, |added, place| added + usize::from(self.insert(place)))
    }

    #[must_use]
    pub fn get(&self, place_id: &str) -> Option<&LightweightPlace> {
        self.index.get(place_id).map(|&i| &self.places[i])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Places in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &LightweightPlace> {
        self.places.iter()
    }

    #[must_use]
    pub fn into_places(self) -> Vec<LightweightPlace> {
        self.places
    }
}

impl<'a> IntoIterator for &'a PlaceTable {
    type Item = &'a LightweightPlace;
    type IntoIter = std::slice::Iter<'a, LightweightPlace>;

    fn into_iter(self) -> Self::IntoIter {
        self.places.iter()
    }
}

/// Folds tile results, given in grid traversal order, into one table.
pub fn aggregate<T, I>(tiles: T) -> PlaceTable
where
    T: IntoIterator<Item = I>,
    I: IntoIterator<Item = LightweightPlace>,
{
    tiles.into_iter().fold(PlaceTable::new(), |mut table, tile| {
        table.absorb(tile);
        table
    })
}

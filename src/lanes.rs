//! Lane-indexed storage: a fixed row of horizontal slots, each holding at most
//! one entity. Removal clears the slot.

use rand::Rng;

use crate::error::{GameError, Result};

#[derive(Clone, Debug)]
pub struct LaneSet<T> {
    slots: Vec<Option<T>>,
}

impl<T> LaneSet<T> {
    pub fn new(lanes: usize) -> Self {
        Self { slots: (0..lanes).map(|_| None).collect() }
    }

    pub fn lanes(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied lanes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn get(&self, lane: usize) -> Option<&T> {
        self.slots.get(lane).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, lane: usize) -> Option<&mut T> {
        self.slots.get_mut(lane).and_then(Option::as_mut)
    }

    /// Puts `value` into `lane`, returning whatever was there. Out-of-range
    /// lanes hand the value straight back.
    pub fn insert(&mut self, lane: usize, value: T) -> Option<T> {
        match self.slots.get_mut(lane) {
            Some(slot) => slot.replace(value),
            None => Some(value),
        }
    }

    pub fn remove(&mut self, lane: usize) -> Option<T> {
        self.slots.get_mut(lane).and_then(Option::take)
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    /// Occupied lanes in index order, with their lane number.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| s.as_ref().map(|v| (i, v)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, s)| s.as_mut().map(|v| (i, v)))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().flatten()
    }

    /// Clears every slot whose occupant fails `keep`. Returns how many went.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let mut dropped = 0;
        for slot in self.slots.iter_mut() {
            if slot.as_ref().is_some_and(|v| !keep(v)) {
                *slot = None;
                dropped += 1;
            }
        }
        dropped
    }

    pub fn free_lanes(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().enumerate().filter(|(_, s)| s.is_none()).map(|(i, _)| i)
    }

    /// Picks a uniformly random free lane.
    pub fn random_free_lane(&self, rng: &mut impl Rng) -> Option<usize> {
        let free = self.lanes() - self.len();
        if free == 0 {
            return None;
        }
        self.free_lanes().nth(rng.gen_range(0..free))
    }

    /// Tops the set up to `cap` occupants, building each newcomer with `make`
    /// in a random free lane. Returns the lanes that were filled.
    pub fn fill_to<R: Rng>(
        &mut self,
        cap: usize,
        rng: &mut R,
        mut make: impl FnMut(usize, &mut R) -> T,
    ) -> Result<Vec<usize>> {
        if cap > self.lanes() {
            return Err(GameError::LaneExhausted { cap, lanes: self.lanes() });
        }
        let mut filled = Vec::new();
        while self.len() < cap {
            let lane = self
                .random_free_lane(rng)
                .ok_or(GameError::LaneExhausted { cap, lanes: self.lanes() })?;
            let value = make(lane, rng);
            self.slots[lane] = Some(value);
            filled.push(lane);
        }
        Ok(filled)
    }
}

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;

use anyhow::{Result, bail};
use log::warn;

/// One stored product and the stage that made it.
struct Slot {
    producer: &'static str,
    type_name: &'static str,
    value: Box<dyn Any>,
}

/// Typed value storage connecting the stages of a compliance run.
///
/// Values are keyed by their concrete type, so each intermediate product
/// (regulation, massing, ephemeris, result) has exactly one slot. Every slot
/// remembers its producing stage for failure reports.
#[derive(Default)]
pub struct Bus {
    slots: HashMap<TypeId, Slot>,
}

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` as the product of stage `producer`.
    ///
    /// Replacing a value made by a different stage is logged.
    pub fn put<T: 'static>(&mut self, producer: &'static str, value: T) {
        let slot = Slot {
            producer,
            type_name: type_name::<T>(),
            value: Box::new(value),
        };
        if let Some(old) = self.slots.insert(TypeId::of::<T>(), slot) {
            if old.producer != producer {
                warn!(
                    "{producer} replaced {} produced by {}",
                    old.type_name, old.producer
                );
            }
        }
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.slots
            .get(&TypeId::of::<T>())
            .and_then(|s| s.value.downcast_ref::<T>())
    }

    /// Name of the stage that produced the stored `T`.
    pub fn producer<T: 'static>(&self) -> Option<&'static str> {
        self.slots.get(&TypeId::of::<T>()).map(|s| s.producer)
    }

    /// Gets the stored value of type `T` or fails naming the stage that
    /// needed it and what the Bus holds instead.
    pub fn require<T: 'static>(&self, stage: &str) -> Result<&T> {
        match self.get::<T>() {
            Some(v) => Ok(v),
            None => {
                let mut held: Vec<String> = self
                    .slots
                    .values()
                    .map(|s| format!("{} from {}", s.type_name, s.producer))
                    .collect();
                held.sort();
                let held = if held.is_empty() {
                    "nothing".to_string()
                } else {
                    held.join(", ")
                };
                bail!(
                    "{stage} requires {} on the Bus, which holds {held}",
                    type_name::<T>()
                )
            }
        }
    }

    /// Removes and returns the stored value of type `T`, if present.
    pub fn take<T: 'static>(&mut self) -> Option<T> {
        self.slots
            .remove(&TypeId::of::<T>())
            .and_then(|s| s.value.downcast::<T>().ok())
            .map(|b| *b)
    }
}

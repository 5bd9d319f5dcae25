use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

struct Slot<T> {
  generation: u32,
  value: Option<T>,
}

/// A handle into an [`Arena<T>`], tagged by a zero-sized marker type so that
/// e.g. a `VertexId` and an `EdgeId` are distinct types even though both are
/// just `(index, generation)` pairs underneath.
///
/// The generation counter catches use-after-free: a handle captured before a
/// slot was deleted and reused no longer matches the slot's current
/// generation, so `Arena::get` returns `None` instead of silently returning
/// an unrelated element.
pub struct Handle<Tag> {
  index: u32,
  generation: u32,
  _tag: PhantomData<fn() -> Tag>,
}

impl<Tag> Clone for Handle<Tag> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<Tag> Copy for Handle<Tag> {}

impl<Tag> PartialEq for Handle<Tag> {
  fn eq(&self, other: &Self) -> bool {
    self.index == other.index && self.generation == other.generation
  }
}

impl<Tag> Eq for Handle<Tag> {}

impl<Tag> Hash for Handle<Tag> {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.index.hash(state);
    self.generation.hash(state);
  }
}

impl<Tag> fmt::Debug for Handle<Tag> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}@{}", self.index, self.generation)
  }
}

/// A generational arena. Slots are never physically removed, only marked
/// free and pushed onto a free list for reuse, so live handles always index
/// directly into `slots` with no remapping.
pub struct Arena<T> {
  slots: Vec<Slot<T>>,
  free: Vec<u32>,
  // Insertion order of currently-reused-or-fresh indices, oldest first.
  // Iteration walks this and skips slots that have since been removed, so
  // that re-inserting after a delete doesn't resurrect the old ordering.
  order: Vec<u32>,
}

impl<T> Default for Arena<T> {
  fn default() -> Self {
    Arena {
      slots: Vec::new(),
      free: Vec::new(),
      order: Vec::new(),
    }
  }
}

impl<T> fmt::Debug for Arena<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Arena(len={})", self.len())
  }
}

impl<T> Arena<T> {
  pub fn new() -> Arena<T> {
    Arena::default()
  }

  pub fn len(&self) -> usize {
    self.slots.len() - self.free.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn insert<Tag>(&mut self, value: T) -> Handle<Tag> {
    let index = if let Some(index) = self.free.pop() {
      self.slots[index as usize].value = Some(value);
      index
    } else {
      let index = self.slots.len() as u32;
      self.slots.push(Slot { generation: 0, value: Some(value) });
      index
    };
    self.order.push(index);
    Handle {
      index,
      generation: self.slots[index as usize].generation,
      _tag: PhantomData,
    }
  }

  pub fn get<Tag>(&self, handle: Handle<Tag>) -> Option<&T> {
    let slot = self.slots.get(handle.index as usize)?;
    if slot.generation != handle.generation {
      return None;
    }
    slot.value.as_ref()
  }

  pub fn get_mut<Tag>(&mut self, handle: Handle<Tag>) -> Option<&mut T> {
    let slot = self.slots.get_mut(handle.index as usize)?;
    if slot.generation != handle.generation {
      return None;
    }
    slot.value.as_mut()
  }

  pub fn remove<Tag>(&mut self, handle: Handle<Tag>) -> Option<T> {
    let slot = self.slots.get_mut(handle.index as usize)?;
    if slot.generation != handle.generation {
      return None;
    }
    let value = slot.value.take()?;
    slot.generation = slot.generation.wrapping_add(1);
    self.free.push(handle.index);
    Some(value)
  }

  pub fn ids<Tag>(&self) -> impl Iterator<Item = Handle<Tag>> + '_ {
    self.order.iter().filter_map(move |&index| {
      let slot = &self.slots[index as usize];
      if slot.value.is_some() {
        Some(Handle {
          index,
          generation: slot.generation,
          _tag: PhantomData,
        })
      } else {
        None
      }
    })
  }
}

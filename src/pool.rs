use crate::{Factory, NoReset, PoolConfig, PoolError, Resetter};
use alloc::{boxed::Box, string::String, vec::Vec};
use core::{
    fmt,
    hash::{Hash, Hasher},
    mem::forget,
    ops::{Deref, DerefMut},
    sync::atomic::{AtomicUsize, Ordering},
};
use log::Level;

const LOG_TARGET: &str = "recycle_pool";

// Every pool gets a distinct token so handles from one pool are never
// mistaken for handles of another.
static NEXT_POOL_TOKEN: AtomicUsize = AtomicUsize::new(0);

/// Identifies one in-use object of a [`Pool`].
///
/// Handles are cheap to copy. A handle stays bound to the same object for
/// the lifetime of the pool, so acquiring, releasing and acquiring again may
/// hand out an equal handle for the same recycled object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    pool: usize,
    slot: usize,
}

/// A single-threaded object pool.
///
/// The pool owns every object it creates. Objects move between two states:
/// available (idle, ready to be handed out) and in use (held by a caller
/// through a [`Handle`]). Objects are created by a [`Factory`] and restored by
/// a [`Resetter`] whenever they are released. The pool never destroys an
/// object until the pool itself is dropped.
pub struct Pool<T, F, R = NoReset> {
    factory: F,
    reset: R,
    slots: Vec<T>,
    // Position of each slot inside `in_use`, or `None` while available.
    positions: Vec<Option<usize>>,
    available: Vec<usize>,
    in_use: Vec<usize>,
    auto_grow: bool,
    grow_by: usize,
    pool_id: String,
    exhaustion_level: Level,
    token: usize,
}

impl<T, F, R> Pool<T, F, R> {
    /// Gets the number of available objects.
    pub fn size(&self) -> usize {
        self.available.len()
    }

    /// Gets the number of objects currently in use.
    pub fn in_use(&self) -> usize {
        self.in_use.len()
    }

    /// Gets the number of objects this pool has ever created.
    ///
    /// This never decreases: the pool does not shrink.
    pub fn total_created(&self) -> usize {
        self.slots.len()
    }

    /// Gets the label of this pool.
    pub fn pool_id(&self) -> &str {
        &self.pool_id
    }

    /// Returns whether an exhausted pool grows on [`Self::acquire`].
    pub fn auto_grow(&self) -> bool {
        self.auto_grow
    }

    /// Gets how many objects an exhausted pool grows by.
    pub fn grow_by(&self) -> usize {
        self.grow_by
    }

    /// Checks whether `handle` refers to an object currently in use in this
    /// pool.
    pub fn is_in_use(&self, handle: Handle) -> bool {
        self.in_use_index(handle).is_some()
    }

    /// Borrows the object behind `handle`.
    ///
    /// Returns `None` if the handle is not in use in this pool.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.in_use_index(handle)?;
        self.slots.get(handle.slot)
    }

    /// Mutably borrows the object behind `handle`.
    ///
    /// Returns `None` if the handle is not in use in this pool.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.in_use_index(handle)?;
        self.slots.get_mut(handle.slot)
    }

    fn in_use_index(&self, handle: Handle) -> Option<usize> {
        if handle.pool != self.token {
            return None;
        }
        self.positions.get(handle.slot).copied().flatten()
    }

    fn handle(&self, slot: usize) -> Handle {
        Handle {
            pool: self.token,
            slot,
        }
    }
}

impl<T, F: Factory<T>, R: Resetter<T>> Pool<T, F, R> {
    /// Creates a new pool from `config`.
    ///
    /// If the configuration asks for an initial size, the pool is filled with
    /// that many objects before this returns.
    pub fn new(config: PoolConfig<F, R>) -> Result<Self, PoolError> {
        let mut pool = Pool {
            factory: config.factory,
            reset: config.reset,
            slots: Vec::with_capacity(config.initial_size),
            positions: Vec::with_capacity(config.initial_size),
            available: Vec::with_capacity(config.initial_size),
            in_use: Vec::new(),
            auto_grow: config.auto_grow,
            grow_by: config.grow_by.max(1),
            pool_id: config.pool_id,
            exhaustion_level: config.exhaustion_level,
            token: NEXT_POOL_TOKEN.fetch_add(1, Ordering::Relaxed),
        };
        pool.grow(config.initial_size)?;
        Ok(pool)
    }

    /// Creates `amount` new objects and makes them available.
    ///
    /// Every object is constructed up front. If the factory fails part way,
    /// the objects created so far are dropped and the pool is left unchanged.
    pub fn grow(&mut self, amount: usize) -> Result<(), PoolError> {
        if amount == 0 {
            return Ok(());
        }

        let mut staged = Vec::with_capacity(amount);
        for _ in 0..amount {
            let obj = self
                .factory
                .create(&self.pool_id)
                .map_err(|err| PoolError::Factory {
                    pool_id: self.pool_id.clone(),
                    source: Box::new(err),
                })?;
            staged.push(obj);
        }

        let first = self.slots.len();
        self.slots.extend(staged);
        self.positions.resize(self.slots.len(), None);
        self.available.extend(first..self.slots.len());
        Ok(())
    }

    /// Takes an available object out of the pool.
    ///
    /// If the pool is empty and auto-grow is enabled, the pool grows by
    /// [`Self::grow_by`] objects first. If auto-grow is disabled, `None` is
    /// returned and the pool is left unchanged.
    pub fn acquire(&mut self) -> Result<Option<Handle>, PoolError> {
        let slot = match self.available.pop() {
            Some(slot) => slot,
            None if self.auto_grow => {
                self.grow(self.grow_by)?;
                log::log!(
                    target: LOG_TARGET,
                    self.exhaustion_level,
                    "pool '{}' was empty, grew by {} (total created: {})",
                    self.pool_id,
                    self.grow_by,
                    self.total_created()
                );
                match self.available.pop() {
                    Some(slot) => slot,
                    None => return Ok(None),
                }
            }
            None => return Ok(None),
        };

        self.positions[slot] = Some(self.in_use.len());
        self.in_use.push(slot);
        Ok(Some(self.handle(slot)))
    }

    /// Like [`Self::acquire`], but wraps the object in a guard that releases
    /// it when dropped.
    pub fn acquire_guard(&mut self) -> Result<Option<Pooled<'_, T, F, R>>, PoolError> {
        match self.acquire()? {
            Some(handle) => Ok(Some(Pooled { pool: self, handle })),
            None => Ok(None),
        }
    }

    /// Returns an in-use object to the pool.
    ///
    /// The object is reset before it becomes available again. Releasing a
    /// handle that is not in use in this pool fails with
    /// [`PoolError::NotOwned`] and changes nothing.
    pub fn release(&mut self, handle: Handle) -> Result<(), PoolError> {
        match self.in_use_index(handle) {
            Some(index) => {
                self.release_at(index);
                Ok(())
            }
            None => {
                log::warn!(
                    target: LOG_TARGET,
                    "pool '{}' does not own {:?} (grow by: {}, total created: {})",
                    self.pool_id,
                    handle,
                    self.grow_by,
                    self.total_created()
                );
                Err(PoolError::NotOwned {
                    pool_id: self.pool_id.clone(),
                    handle,
                })
            }
        }
    }

    /// Releases every object currently in use and returns how many were
    /// released.
    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        while let Some(last) = self.in_use.len().checked_sub(1) {
            self.release_at(last);
            released += 1;
        }
        released
    }

    fn release_at(&mut self, index: usize) {
        let slot = self.in_use.swap_remove(index);
        if let Some(&moved) = self.in_use.get(index) {
            self.positions[moved] = Some(index);
        }
        self.positions[slot] = None;
        self.reset.reset(&mut self.slots[slot]);
        self.available.push(slot);
    }
}

impl<T, F, R> fmt::Debug for Pool<T, F, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("pool_id", &self.pool_id)
            .field("size", &self.size())
            .field("in_use", &self.in_use())
            .field("total_created", &self.total_created())
            .field("auto_grow", &self.auto_grow)
            .field("grow_by", &self.grow_by)
            .finish()
    }
}

/// A struct representing a guard over an in-use object of a [`Pool`].
///
/// This struct ensures that the object is released back to the pool, and
/// reset, when it is dropped.
pub struct Pooled<'a, T, F: Factory<T>, R: Resetter<T>> {
    pool: &'a mut Pool<T, F, R>,
    handle: Handle,
}

impl<'a, T, F: Factory<T>, R: Resetter<T>> Pooled<'a, T, F, R> {
    /// Gets the handle of the guarded object.
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Consumes the guard without releasing the object.
    ///
    /// The object stays in use and must be released through the returned
    /// handle.
    pub fn into_handle(self) -> Handle {
        let handle = self.handle;
        forget(self);
        handle
    }
}

impl<'a, T, F: Factory<T>, R: Resetter<T>> Deref for Pooled<'a, T, F, R> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.pool.slots[self.handle.slot]
    }
}

impl<'a, T, F: Factory<T>, R: Resetter<T>> DerefMut for Pooled<'a, T, F, R> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.pool.slots[self.handle.slot]
    }
}

impl<'a, T, F: Factory<T>, R: Resetter<T>> Drop for Pooled<'a, T, F, R> {
    fn drop(&mut self) {
        if let Some(index) = self.pool.in_use_index(self.handle) {
            self.pool.release_at(index);
        }
    }
}

impl<'a, T: Hash, F: Factory<T>, R: Resetter<T>> Hash for Pooled<'a, T, F, R> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}
impl<'a, T: fmt::Display, F: Factory<T>, R: Resetter<T>> fmt::Display for Pooled<'a, T, F, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&**self, f)
    }
}
impl<'a, T: fmt::Debug, F: Factory<T>, R: Resetter<T>> fmt::Debug for Pooled<'a, T, F, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}
impl<'a, T, F: Factory<T>, R: Resetter<T>> core::borrow::Borrow<T> for Pooled<'a, T, F, R> {
    #[inline(always)]
    fn borrow(&self) -> &T {
        self
    }
}
impl<'a, T, F: Factory<T>, R: Resetter<T>> AsRef<T> for Pooled<'a, T, F, R> {
    #[inline(always)]
    fn as_ref(&self) -> &T {
        self
    }
}

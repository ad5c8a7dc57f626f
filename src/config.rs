use alloc::string::String;
use log::Level;

use crate::{Factory, NoReset, Pool, PoolError, Resetter};

/// Label given to pools built without [`PoolConfig::pool_id`].
pub const DEFAULT_POOL_ID: &str = "default_pool_id";

/// Configuration for creating a [`Pool`].
///
/// The factory is mandatory, whereas other settings are optional:
///
/// | setting            | default             |
/// |--------------------|---------------------|
/// | `reset`            | [`NoReset`]         |
/// | `initial_size`     | `0`                 |
/// | `auto_grow`        | `true`              |
/// | `grow_by`          | `1`                 |
/// | `pool_id`          | [`DEFAULT_POOL_ID`] |
/// | `exhaustion_level` | [`Level::Warn`]     |
///
/// # Examples
///
/// ```
/// use recycle_pool::PoolConfig;
///
/// let mut pool = PoolConfig::new(|_: &str| Vec::<u8>::with_capacity(64))
///     .reset(|buf: &mut Vec<u8>| buf.clear())
///     .initial_size(4)
///     .grow_by(2)
///     .pool_id("buffers")
///     .build()
///     .unwrap();
///
/// assert_eq!(pool.size(), 4);
/// let handle = pool.acquire().unwrap().unwrap();
/// pool.get_mut(handle).unwrap().push(1);
/// pool.release(handle).unwrap();
/// assert!(pool.get(handle).is_none());
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct PoolConfig<F, R = NoReset> {
    pub(crate) factory: F,
    pub(crate) reset: R,
    pub(crate) initial_size: usize,
    pub(crate) auto_grow: bool,
    pub(crate) grow_by: usize,
    pub(crate) pool_id: String,
    pub(crate) exhaustion_level: Level,
}

impl<F> PoolConfig<F> {
    /// Creates a configuration with the given factory and default settings.
    pub fn new(factory: F) -> Self {
        PoolConfig {
            factory,
            reset: NoReset,
            initial_size: 0,
            auto_grow: true,
            grow_by: 1,
            pool_id: String::from(DEFAULT_POOL_ID),
            exhaustion_level: Level::Warn,
        }
    }
}

impl<F, R> PoolConfig<F, R> {
    /// Sets the routine that restores a released object before it becomes
    /// available again.
    pub fn reset<R2>(self, reset: R2) -> PoolConfig<F, R2> {
        PoolConfig {
            factory: self.factory,
            reset,
            initial_size: self.initial_size,
            auto_grow: self.auto_grow,
            grow_by: self.grow_by,
            pool_id: self.pool_id,
            exhaustion_level: self.exhaustion_level,
        }
    }

    /// Sets how many objects are created eagerly when the pool is built.
    pub fn initial_size(mut self, initial_size: usize) -> Self {
        self.initial_size = initial_size;
        self
    }

    /// Sets whether [`Pool::acquire`] grows an exhausted pool or returns
    /// `None`.
    pub fn auto_grow(mut self, auto_grow: bool) -> Self {
        self.auto_grow = auto_grow;
        self
    }

    /// Sets how many objects an exhausted pool grows by. Zero is treated as
    /// one.
    pub fn grow_by(mut self, grow_by: usize) -> Self {
        self.grow_by = grow_by;
        self
    }

    /// Sets the label used in diagnostics and passed to the factory.
    pub fn pool_id(mut self, pool_id: impl Into<String>) -> Self {
        self.pool_id = pool_id.into();
        self
    }

    /// Sets the log level of the message emitted when an exhausted pool
    /// grows.
    pub fn exhaustion_level(mut self, level: Level) -> Self {
        self.exhaustion_level = level;
        self
    }

    /// Builds the pool, eagerly creating `initial_size` objects.
    ///
    /// Shorthand for [`Pool::new`].
    pub fn build<T>(self) -> Result<Pool<T, F, R>, PoolError>
    where
        F: Factory<T>,
        R: Resetter<T>,
    {
        Pool::new(self)
    }
}

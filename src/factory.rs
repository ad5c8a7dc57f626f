use core::convert::Infallible;

/// A trait defining how a pool constructs brand-new objects.
///
/// The pool calls [`Factory::create`] once for every instance it grows by,
/// passing its own label so that a single factory can serve several pools.
///
/// Any `FnMut(&str) -> T` closure is a factory that never fails.
pub trait Factory<T> {
    /// The error returned when construction fails.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Creates a new object of type T for the pool labelled `pool_id`.
    fn create(&mut self, pool_id: &str) -> Result<T, Self::Error>;
}

impl<T, F> Factory<T> for F
where
    F: FnMut(&str) -> T,
{
    type Error = Infallible;

    #[inline(always)]
    fn create(&mut self, pool_id: &str) -> Result<T, Infallible> {
        Ok(self(pool_id))
    }
}

/// A trait defining how a released object is restored to its default state
/// before it becomes available again.
///
/// Any `FnMut(&mut T)` closure is a resetter.
pub trait Resetter<T> {
    /// Resets the state of an object so it can be handed out again.
    fn reset(&mut self, obj: &mut T);
}

impl<T, R> Resetter<T> for R
where
    R: FnMut(&mut T),
{
    #[inline(always)]
    fn reset(&mut self, obj: &mut T) {
        self(obj)
    }
}

/// A resetter that leaves released objects untouched.
///
/// This is the default for pools built without [`crate::PoolConfig::reset`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReset;

impl<T> Resetter<T> for NoReset {
    #[inline(always)]
    fn reset(&mut self, _obj: &mut T) {}
}

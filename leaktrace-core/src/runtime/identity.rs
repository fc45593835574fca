//! Object identity.

use std::fmt;
use std::num::NonZeroUsize;

/// Reference identity of a heap object.
///
/// Never zero: a null reference has no identity, so it cannot be stored in an
/// [`IdentitySet`](crate::collections::IdentitySet) by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(NonZeroUsize);

impl ObjectId {
    /// Wrap a raw identity. Returns `None` for 0 (null).
    #[inline]
    pub fn new(raw: usize) -> Option<Self> {
        NonZeroUsize::new(raw).map(Self)
    }

    /// Identity derived from an object's address.
    #[inline]
    pub fn from_ptr<T: ?Sized>(ptr: *const T) -> Option<Self> {
        Self::new(ptr as *const () as usize)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{:x}", self.0.get())
    }
}

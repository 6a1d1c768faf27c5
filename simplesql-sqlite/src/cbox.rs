use std::{
    ops::{Deref, DerefMut},
    ptr,
};

/// Raw sqlite handle released through `dealloc` when dropped, unless it is null.
#[derive(Debug)]
pub(crate) struct CBox<T> {
    pub(crate) ptr: *mut T,
    dealloc: fn(*mut T),
}

impl<T> CBox<T> {
    pub fn new(ptr: *mut T, dealloc: fn(*mut T)) -> Self {
        Self { ptr, dealloc }
    }

    pub fn null(dealloc: fn(*mut T)) -> Self {
        Self::new(ptr::null_mut(), dealloc)
    }

    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// Give up ownership, the caller becomes responsible for releasing the handle.
    pub fn take(&mut self) -> *mut T {
        std::mem::replace(&mut self.ptr, ptr::null_mut())
    }
}

impl<T> Drop for CBox<T> {
    fn drop(&mut self) {
        if !self.is_null() {
            (self.dealloc)(self.take());
        }
    }
}

impl<T> Deref for CBox<T> {
    type Target = *mut T;

    fn deref(&self) -> &Self::Target {
        &self.ptr
    }
}

impl<T> DerefMut for CBox<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ptr
    }
}

unsafe impl<T> Send for CBox<T> {}
unsafe impl<T> Sync for CBox<T> {}

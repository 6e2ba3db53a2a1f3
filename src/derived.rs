use crate::errors::Result;
use std::cell::OnceCell;
use std::fmt;

/// Cache for attributes derived from a geometry's coordinates.
///
/// The value is computed on first read and kept until the owner calls
/// `invalidate`, which needs `&mut` and therefore cannot race a read.
/// A failed computation is not cached.
pub(crate) struct DerivedCell<T> {
    cell: OnceCell<T>,
}

impl<T> DerivedCell<T> {
    pub(crate) fn new() -> Self {
        DerivedCell {
            cell: OnceCell::new(),
        }
    }

    pub(crate) fn get_or_compute<F>(&self, compute: F) -> Result<&T>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }
        let value = compute()?;
        Ok(self.cell.get_or_init(|| value))
    }

    pub(crate) fn get_or_init<F>(&self, compute: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.cell.get_or_init(compute)
    }

    pub(crate) fn invalidate(&mut self) {
        self.cell.take();
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for DerivedCell<T> {
    fn default() -> Self {
        DerivedCell::new()
    }
}

impl<T: Clone> Clone for DerivedCell<T> {
    fn clone(&self) -> Self {
        DerivedCell {
            cell: self.cell.clone(),
        }
    }
}

impl<T> fmt::Debug for DerivedCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedCell")
            .field("valid", &self.is_valid())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GeometryError;
    use std::cell::Cell;

    #[test]
    fn test_computes_once() {
        let calls = Cell::new(0);
        let cell = DerivedCell::new();
        for _ in 0..3 {
            let value = cell
                .get_or_compute(|| {
                    calls.set(calls.get() + 1);
                    Ok(42)
                })
                .unwrap();
            assert_eq!(*value, 42);
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_invalidate_recomputes() {
        let mut cell = DerivedCell::new();
        assert_eq!(*cell.get_or_compute(|| Ok(1)).unwrap(), 1);
        assert!(cell.is_valid());
        cell.invalidate();
        assert!(!cell.is_valid());
        assert_eq!(*cell.get_or_compute(|| Ok(2)).unwrap(), 2);
    }

    #[test]
    fn test_errors_not_cached() {
        let cell: DerivedCell<i32> = DerivedCell::new();
        assert_eq!(
            cell.get_or_compute(|| Err(GeometryError::EmptyAggregate)),
            Err(GeometryError::EmptyAggregate)
        );
        assert!(!cell.is_valid());
        assert_eq!(*cell.get_or_compute(|| Ok(7)).unwrap(), 7);
    }
}

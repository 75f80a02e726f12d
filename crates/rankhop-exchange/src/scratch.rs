//! Growable LIFO scratch for locally produced injector records.
//!
//! Holds the records emitted by custom boundary handlers and local
//! wraparounds during one pass. At most one record is produced per
//! mover, so the scratch is sized to the mover count at the start of
//! every pass and never grows mid-pass. The backing allocation persists
//! across calls until [`release`](InjectorScratch::release).

use crate::error::ExchangeError;
use rankhop_core::InjectorRecord;

/// Record scratch with an explicit logical capacity.
///
/// Growth policy for `ensure(n)`:
///
/// - first allocation: `max(n, min_records)`
/// - later, only when `n > capacity`: `floor(n * growth_factor)`, never
///   below `n`
///
/// The capacity never shrinks except through `release`.
#[derive(Debug)]
pub struct InjectorScratch {
    records: Vec<InjectorRecord>,
    capacity: usize,
    min_records: usize,
    growth_factor: f64,
}

impl InjectorScratch {
    /// Unallocated scratch with the given growth policy.
    pub fn new(min_records: usize, growth_factor: f64) -> Self {
        Self {
            records: Vec::new(),
            capacity: 0,
            min_records,
            growth_factor,
        }
    }

    /// Make room for `n` records and clear any previous contents.
    ///
    /// Allocation failure is fatal to the exchange.
    pub fn ensure(&mut self, n: usize) -> Result<(), ExchangeError> {
        self.records.clear();
        let target = if self.capacity == 0 {
            n.max(self.min_records)
        } else if n > self.capacity {
            ((n as f64 * self.growth_factor) as usize).max(n)
        } else {
            return Ok(());
        };
        let mut fresh = Vec::new();
        fresh
            .try_reserve_exact(target)
            .map_err(|_| ExchangeError::ScratchAllocation { requested: target })?;
        self.records = fresh;
        self.capacity = target;
        Ok(())
    }

    /// Append a record. Returns it back if the scratch is full.
    pub fn push(&mut self, record: InjectorRecord) -> Result<(), InjectorRecord> {
        if self.records.len() >= self.capacity {
            return Err(record);
        }
        self.records.push(record);
        Ok(())
    }

    /// Take the most recently pushed record.
    pub fn pop(&mut self) -> Option<InjectorRecord> {
        self.records.pop()
    }

    /// Records currently held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` if no record is held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Logical capacity in records. Zero until first allocation.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop contents without releasing the allocation.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Free the allocation. The next `ensure` allocates afresh.
    pub fn release(&mut self) {
        self.records = Vec::new();
        self.capacity = 0;
    }

    /// Memory held by the backing allocation in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.records.capacity() * std::mem::size_of::<InjectorRecord>()
    }
}

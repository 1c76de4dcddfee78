//! Heap Tracking Allocator
//!
//! Install [`TrackingAllocator`] as the global allocator to make heap usage
//! observable:
//!
//! ```ignore
//! #[global_allocator]
//! static GLOBAL: sweepbench::TrackingAllocator = sweepbench::TrackingAllocator;
//! ```
//!
//! Without it every reading is 0, so memory profiling reports no growth.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

/// Bytes currently allocated and not yet freed
static LIVE_BYTES: AtomicU64 = AtomicU64::new(0);
/// Bytes allocated since the last counter reset
static ALLOCATED_BYTES: AtomicU64 = AtomicU64::new(0);
/// Allocations since the last counter reset
static ALLOCATION_COUNT: AtomicU64 = AtomicU64::new(0);

/// Global allocator wrapper around [`System`] that keeps process-wide counters
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackingAllocator;

#[inline]
fn record_alloc(size: usize) {
    let size = size as u64;
    LIVE_BYTES.fetch_add(size, Ordering::Relaxed);
    ALLOCATED_BYTES.fetch_add(size, Ordering::Relaxed);
    ALLOCATION_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[inline]
fn record_dealloc(size: usize) {
    LIVE_BYTES.fetch_sub(size as u64, Ordering::Relaxed);
}

// SAFETY: every call is forwarded to `System` with the caller's pointer and
// layout; the wrapper only updates atomic counters.
unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        record_dealloc(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            let old_size = layout.size();
            if new_size >= old_size {
                record_alloc(new_size - old_size);
            } else {
                record_dealloc(old_size - new_size);
            }
        }
        new_ptr
    }
}

/// Bytes currently held on the heap by the process
pub fn live_heap_bytes() -> u64 {
    LIVE_BYTES.load(Ordering::Relaxed)
}

/// Bytes and number of allocations since the last [`reset_allocation_counter`]
pub fn current_allocation() -> (u64, u64) {
    (
        ALLOCATED_BYTES.load(Ordering::Relaxed),
        ALLOCATION_COUNT.load(Ordering::Relaxed),
    )
}

/// Zero the cumulative allocation counters (live bytes are unaffected)
pub fn reset_allocation_counter() {
    ALLOCATED_BYTES.store(0, Ordering::Relaxed);
    ALLOCATION_COUNT.store(0, Ordering::Relaxed);
}

//! Memory use of the loader when a header declares more code than exists.
//!
//! Kept in its own test binary so the tracking allocator only sees this test.

use stackvm::loader::{self, BytecodeHeader, LoadError};
use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Wraps the system allocator, remembering the largest single request
struct PeakRequestAllocator {
    largest: AtomicUsize,
}

unsafe impl GlobalAlloc for PeakRequestAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        self.largest.fetch_max(layout.size(), Ordering::Relaxed);
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        self.largest.fetch_max(new_size, Ordering::Relaxed);
        System.realloc(ptr, layout, new_size)
    }
}

#[global_allocator]
static ALLOCATOR: PeakRequestAllocator = PeakRequestAllocator {
    largest: AtomicUsize::new(0),
};

const ONE_MIB: usize = 1024 * 1024;

#[test]
fn declared_length_is_not_allocated_up_front() {
    let mut bytes = BytecodeHeader::new(u32::MAX).to_bytes().to_vec();
    bytes.push(0x04);

    ALLOCATOR.largest.store(0, Ordering::Relaxed);
    let result = loader::read_program(bytes.as_slice());
    let largest = ALLOCATOR.largest.load(Ordering::Relaxed);

    match result {
        Err(LoadError::TruncatedBody { expected, actual: 1 }) => assert_eq!(expected, u32::MAX as usize),
        other => panic!("unexpected {other:?}"),
    }
    assert!(largest < ONE_MIB, "largest single allocation was {largest} bytes");
}

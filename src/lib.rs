// Allow pre-existing clippy lints across the codebase
#![allow(clippy::needless_range_loop)]

/// Use mimalloc as the global allocator for all binaries.
/// Scratch buffers and generated benchmark data are large, short-lived
/// allocations that mimalloc serves faster than glibc malloc.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod common;
pub mod radix;

pub use radix::{RadixElement, RadixSorter, SortConfig, SortError, radix_sort};

//! # defectlab-fixture
//!
//! A deliberately defective sample program, kept defective on purpose.
//!
//! Each function here reproduces one classic review finding: a copy with no
//! bound check, an allocation that is never released, a function whose
//! nesting depth dwarfs its logic, a release pattern that frees one buffer
//! twice and another not at all, and a bounds check built from bare literals.
//! Review tooling is pointed at this crate to confirm the findings are
//! caught; fixing them here would defeat that purpose.
//!
//! Buffers come from the [`defectlab_trace`] ledger rather than the global
//! allocator so the misuse stays observable (and survivable) at runtime. The
//! catalog functions themselves never consult the ledger's accounting.

use std::sync::atomic::AtomicI32;

pub mod buffers;
pub mod complexity;
pub mod copy;
pub mod demo;
pub mod geometry;
pub mod heap;

pub use buffers::{BUFFER_MESSAGE, create_buffer, memory_problem_example};
pub use complexity::complex_function;
pub use copy::unsafe_string_copy;
pub use geometry::calculate_area;

/// Process-wide counter. Global mutable state; nothing in the demonstrated
/// flows ever mutates or reads it.
pub static GLOBAL_COUNTER: AtomicI32 = AtomicI32::new(0);

//! The sample program: runs the defective flow end to end and reports one
//! number, exiting cleanly no matter what was corrupted or leaked along the
//! way.

use defectlab_fixture::demo;
use defectlab_fixture::heap;

fn main() {
    let result = demo::run_sample_flow(heap::process_ledger());
    println!("Result: {result}");
}

//! This build script copies the `memory.x` file from the crate root into a directory where
//! the linker can always find it at build time, and records the build time as the initial
//! clock reference.

use std::{env, fs::File, io::Write, path::PathBuf};

fn main() {
    // Put memory layout in the output directory and ensure it's on the linker search path.
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());

    // The watch has no battery-backed RTC; start from the build time until the companion
    // sets the clock.
    File::create(out.join("utc.rs"))
        .unwrap()
        .write_fmt(format_args!(
            "const UTC_EPOCH: i64 = {:?};",
            chrono::Utc::now().timestamp()
        ))
        .unwrap();

    // By default, Cargo will re-run a build script whenever any file in the project changes,
    // which keeps the embedded build time fresh.
}

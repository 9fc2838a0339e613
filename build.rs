/*
 * build.rs
 *
 * Build script for cppdemo.
 * Links liblog on Android so the platform log can call __android_log_write.
 */

fn main() {
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();

    /* android-only link flags */
    if target_os == "android" {
        // __android_log_write lives in liblog.so, which the NDK linker
        // does not pull in on its own.
        println!("cargo:rustc-link-lib=log");
    }

    println!("cargo:rerun-if-changed=build.rs");
}

//! Build script recording the toolchain facts reported in a run context.
//!
//! Exports `PROBEDOCK_RUSTC_VERSION` (the compiler that builds this crate) and
//! `PROBEDOCK_TARGET` (the target triple of the compiled artifact).

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=RUSTC");

    match rustc_version::version_meta() {
        Ok(meta) => println!("cargo:rustc-env=PROBEDOCK_RUSTC_VERSION={}", meta.semver),
        Err(e) => println!("cargo:warning=unable to read the rustc version: {e}"),
    }

    let target = std::env::var("TARGET")?;
    println!("cargo:rustc-env=PROBEDOCK_TARGET={target}");

    Ok(())
}

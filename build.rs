//! Embeds build metadata for the `--version` string.
//!
//! Dev builds report the abbreviated commit hash alongside the build date;
//! the `release` feature leaves the hash out so official builds carry a
//! clean version string.

use vergen_gitcl::{BuildBuilder, Emitter};

fn emit() -> Result<(), Box<dyn std::error::Error>> {
    let build = BuildBuilder::default().build_date(true).build()?;
    let mut emitter = Emitter::default();
    emitter.fail_on_error().add_instructions(&build)?;

    #[cfg(not(feature = "release"))]
    {
        let git = vergen_gitcl::GitclBuilder::default().sha(true).build()?;
        emitter.add_instructions(&git)?;
    }

    emitter.emit()?;
    Ok(())
}

fn main() {
    if let Err(err) = emit() {
        // Happens outside a git checkout (source tarballs); the binary
        // falls back to the bare crate version.
        println!("cargo:warning=build metadata unavailable: {err}");
        println!("cargo:rustc-env=VERGEN_BUILD_DATE=unknown");
        println!("cargo:rustc-env=VERGEN_GIT_SHA=unknown");
    }
}

//! Retrieves information about the version of the crate from Git and the build
//! environment. It is exposed at runtime through the `build` module generated
//! by `shadow-rs`.

fn main() -> shadow_rs::SdResult<()> {
    println!("cargo:rerun-if-changed=build.rs");
    shadow_rs::new()
}

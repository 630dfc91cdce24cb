use std::env;

fn main() {
    // Version string shown by `pb --version`; overridable for distro builds
    let version = env::var("PB_BUILD_VERSION")
        .unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap_or_default());
    println!("cargo:rustc-env=PB_VERSION={version}");

    println!("cargo:rerun-if-env-changed=PB_BUILD_VERSION");
    println!("cargo:rerun-if-changed=Cargo.toml");
}

use std::env;
use std::fs;
use std::path::PathBuf;

use nkhost_config::{ConfigOptions, render_header};

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Cargo exposes each enabled feature of this package as CARGO_FEATURE_<NAME>.
    let features: Vec<String> = env::vars()
        .filter_map(|(key, _)| {
            key.strip_prefix("CARGO_FEATURE_")
                .map(|name| name.to_ascii_lowercase().replace('_', "-"))
        })
        .collect();

    let options = ConfigOptions::from_feature_names(&features);
    if let Err(e) = options.validate() {
        panic!("invalid build configuration: {e}");
    }

    let header_path = out_dir.join("nkhost_config.h");
    fs::write(&header_path, render_header(&options))
        .expect("failed to write nkhost_config.h");

    // The C build of the GUI core picks the header up from here.
    println!("cargo:rustc-env=NKHOST_CONFIG_HEADER={}", header_path.display());
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=crates/nkhost-config/src");
}

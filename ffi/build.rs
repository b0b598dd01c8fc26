use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    let crate_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => return,
    };
    let config = cbindgen::Config {
        language: cbindgen::Language::C,
        include_guard: Some("LOSTFOUND_FFI_H".to_string()),
        ..Default::default()
    };

    // A header failure must not break the library build.
    match cbindgen::generate_with_config(&crate_dir, config) {
        Ok(bindings) => {
            let include = crate_dir.join("include");
            if let Err(err) = std::fs::create_dir_all(&include) {
                println!("cargo:warning=cannot create {}: {err}", include.display());
                return;
            }
            bindings.write_to_file(include.join("lostfound.h"));
        }
        Err(err) => println!("cargo:warning=skipping C header generation: {err}"),
    }
}

use keysafe_core::config::valid_module_name;

fn main() {
    let module = std::env::var("KEYSAFE_MODULE_NAME").unwrap_or_else(|_| "KEYSAFE".to_owned());
    assert!(
        valid_module_name(module.as_bytes()),
        "KEYSAFE_MODULE_NAME must match [A-Z0-9_]+, got {module:?}"
    );

    println!("cargo:rustc-env=KEYSAFE_MODULE_NAME={module}");
    println!(
        "cargo:rustc-env=KEYSAFE_MODULE_LABEL={}",
        module.to_ascii_lowercase()
    );
    println!("cargo:rerun-if-env-changed=KEYSAFE_MODULE_NAME");
    println!("cargo:rerun-if-changed=build.rs");
}

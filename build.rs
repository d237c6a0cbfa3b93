fn main() {
    // Stamped into `--version`
    let build_date = chrono::Utc::now().format("%Y-%m-%d").to_string();
    println!("cargo:rustc-env=SIMPLIFIED3D_BUILD_DATE={}", build_date);
    println!("cargo:rerun-if-changed=build.rs");
}

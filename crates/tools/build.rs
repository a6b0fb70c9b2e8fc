use std::process::Command;

fn main() {
    // The version flag reports the commit the tool was built from.
    let hash = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_string())
        .filter(|hash| !hash.is_empty());

    match hash {
        Some(hash) => println!("cargo:rustc-env=BUILD_HASH={hash}"),
        None => println!("cargo:rustc-env=BUILD_HASH=UNKNOWN"),
    }
    println!("cargo:rerun-if-changed=build.rs");
}

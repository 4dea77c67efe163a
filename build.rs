use std::env;
use std::path::PathBuf;

const DEFAULT_VCPKG_TRIPLET: &str = "x64-windows";

fn main() {
    for variable in ["FFMPEG_DIR", "VCPKG_ROOT", "VCPKGRS_DYNAMIC", "VCPKGRS_TRIPLET"] {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    // Linux and macOS find FFmpeg through pkg-config.
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "windows" || env::var_os("FFMPEG_DIR").is_some() {
        return;
    }

    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        println!(
            "cargo:warning=vidinspect needs FFmpeg. On Windows install it with vcpkg and set VCPKG_ROOT and FFMPEG_DIR."
        );
        return;
    };

    let triplet =
        env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| DEFAULT_VCPKG_TRIPLET.to_string());
    let ffmpeg_dir = PathBuf::from(&vcpkg_root).join("installed").join(&triplet);

    if !ffmpeg_dir.exists() {
        println!(
            "cargo:warning=VCPKG_ROOT is set but {} does not contain an FFmpeg install.",
            ffmpeg_dir.display(),
        );
        return;
    }

    println!(
        "cargo:warning=Found vcpkg FFmpeg at {0}. Set FFMPEG_DIR={0} to skip this lookup.",
        ffmpeg_dir.display(),
    );
    if env::var_os("VCPKGRS_DYNAMIC").is_none() {
        println!("cargo:warning=Set VCPKGRS_DYNAMIC=1 if your vcpkg FFmpeg is a dynamic build.");
    }
}

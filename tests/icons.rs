//! Integration tests for icon generation.
//!
//! The in-process resvg backend is exercised for real (it needs no external
//! tools); the rsvg-convert and ImageMagick fallbacks are exercised with
//! shell-script stand-ins, so those tests are unix-only.

use docfigs::{generate_icons, DocfigsError, IconBackend, IconConfig};
use std::path::{Path, PathBuf};

const LOGO_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
  <circle cx="50" cy="50" r="40" fill="#1565c0"/>
  <rect x="35" y="35" width="30" height="30" fill="#fff"/>
</svg>
"##;

fn logo(dir: &Path) -> PathBuf {
    let path = dir.join("logo.svg");
    std::fs::write(&path, LOGO_SVG).unwrap();
    path
}

#[test]
fn native_backend_renders_exact_sizes() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("icons");

    let config = IconConfig::builder()
        .input(logo(dir.path()))
        .output_dir(&out)
        .sizes([64, 32])
        .backend(IconBackend::Native)
        .build()
        .unwrap();

    let output = generate_icons(&config).unwrap();

    assert_eq!(output.stats.generated, 2);
    for (result, size) in output.icons.iter().zip([64u32, 32]) {
        assert_eq!(result.size, size);
        assert_eq!(result.backend, "resvg");
        assert_eq!(result.path, out.join(format!("icon-{size}.png")));
        assert!(result.bytes > 0);

        // Decode and check the pixel dimensions, not just the file's existence.
        let img = image::open(&result.path).unwrap();
        assert_eq!(img.width(), size);
        assert_eq!(img.height(), size);
    }
}

#[test]
fn default_sizes_are_pwa_manifest_sizes() {
    let dir = tempfile::tempdir().unwrap();
    let config = IconConfig::builder()
        .input(logo(dir.path()))
        .output_dir(dir.path().join("icons"))
        .build()
        .unwrap();

    let output = generate_icons(&config).unwrap();
    let sizes: Vec<u32> = output.icons.iter().map(|i| i.size).collect();
    assert_eq!(sizes, [192, 512]);
}

#[cfg(unix)]
#[test]
fn forced_rsvg_uses_the_external_tool() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("icons");

    // rsvg-convert is invoked as: -w S -h S logo.svg -o out.png
    let fake = dir.path().join("fake-rsvg-convert");
    std::fs::write(
        &fake,
        "#!/bin/sh\n[ \"$1\" = \"--version\" ] && exit 0\nprintf 'PNGDATA' > \"$7\"\nexit 0\n",
    )
    .unwrap();
    std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

    let config = IconConfig::builder()
        .input(logo(dir.path()))
        .output_dir(&out)
        .sizes([48])
        .backend(IconBackend::Rsvg)
        .rsvg_path(&fake)
        .build()
        .unwrap();

    let output = generate_icons(&config).unwrap();
    assert_eq!(output.icons[0].backend, "rsvg-convert");
    assert_eq!(
        std::fs::read(&output.icons[0].path).unwrap(),
        b"PNGDATA"
    );
}

#[cfg(unix)]
#[test]
fn chain_falls_through_to_magick() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("icons");

    // Input that passes the magic check but the in-process parser rejects,
    // forcing the run onto the external tools.
    let bad_svg = dir.path().join("logo.svg");
    std::fs::write(&bad_svg, "<svg this is not well-formed xml").unwrap();

    // rsvg answers the probe but fails every conversion; magick succeeds.
    let rsvg = dir.path().join("fake-rsvg-convert");
    std::fs::write(&rsvg, "#!/bin/sh\n[ \"$1\" = \"--version\" ] && exit 0\nexit 1\n").unwrap();
    std::fs::set_permissions(&rsvg, std::fs::Permissions::from_mode(0o755)).unwrap();

    // magick convert is invoked as: -background none -resize SxS logo.svg out.png
    let magick = dir.path().join("fake-convert");
    std::fs::write(
        &magick,
        "#!/bin/sh\n[ \"$1\" = \"--version\" ] && exit 0\nprintf 'PNGDATA' > \"$6\"\nexit 0\n",
    )
    .unwrap();
    std::fs::set_permissions(&magick, std::fs::Permissions::from_mode(0o755)).unwrap();

    let config = IconConfig::builder()
        .input(&bad_svg)
        .output_dir(&out)
        .sizes([192])
        .rsvg_path(&rsvg)
        .magick_path(&magick)
        .build()
        .unwrap();

    let output = generate_icons(&config).unwrap();
    assert_eq!(output.icons[0].backend, "convert");
    assert!(out.join("icon-192.png").exists());
}

#[test]
fn all_backends_failing_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    // Passes the magic check, unparseable in-process, and no external tools.
    let bad_svg = dir.path().join("logo.svg");
    std::fs::write(&bad_svg, "<svg this is not well-formed xml").unwrap();

    let config = IconConfig::builder()
        .input(&bad_svg)
        .output_dir(dir.path().join("icons"))
        .sizes([192])
        .rsvg_path("/nonexistent/rsvg-convert")
        .magick_path("/nonexistent/convert")
        .build()
        .unwrap();

    let err = generate_icons(&config).unwrap_err();
    assert!(matches!(
        err,
        DocfigsError::AllBackendsFailed { size: 192, .. }
    ));
}

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

const HEADER_SIZE: usize = 348;
const VOX_OFFSET: usize = 352;

/// Write a single-file NIfTI-1 volume of float32 voxels with an identity sform
/// scaled by `spacing`.
pub fn write_nifti(path: &Path, size: &[usize], spacing: &[f32], voxels: &[f32]) {
    assert!(!size.is_empty() && size.len() <= 7);
    assert_eq!(size.len(), spacing.len());
    assert_eq!(size.iter().product::<usize>(), voxels.len());

    let mut header = vec![0u8; HEADER_SIZE];
    put_i32(&mut header, 0, HEADER_SIZE as i32);

    let mut dim = [1i16; 8];
    dim[0] = size.len() as i16;
    for (i, &n) in size.iter().enumerate() {
        dim[i + 1] = n as i16;
    }
    for (i, d) in dim.iter().enumerate() {
        put_i16(&mut header, 40 + 2 * i, *d);
    }

    put_i16(&mut header, 70, 16); // datatype: float32
    put_i16(&mut header, 72, 32); // bitpix

    let mut pixdim = [1.0f32; 8];
    for (i, &s) in spacing.iter().enumerate() {
        pixdim[i + 1] = s;
    }
    for (i, p) in pixdim.iter().enumerate() {
        put_f32(&mut header, 76 + 4 * i, *p);
    }

    put_f32(&mut header, 108, VOX_OFFSET as f32);
    put_f32(&mut header, 112, 1.0); // scl_slope

    put_i16(&mut header, 252, 0); // qform_code
    put_i16(&mut header, 254, 1); // sform_code
    let sx = spacing.first().copied().unwrap_or(1.0);
    let sy = spacing.get(1).copied().unwrap_or(1.0);
    let sz = spacing.get(2).copied().unwrap_or(1.0);
    let srows = [[sx, 0.0, 0.0, -10.0], [0.0, sy, 0.0, -20.0], [0.0, 0.0, sz, -30.0]];
    for (r, row) in srows.iter().enumerate() {
        for (c, v) in row.iter().enumerate() {
            put_f32(&mut header, 280 + 16 * r + 4 * c, *v);
        }
    }

    header[344..348].copy_from_slice(b"n+1\0");

    let mut bytes = header;
    bytes.extend_from_slice(&[0u8; VOX_OFFSET - HEADER_SIZE]);
    for v in voxels {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    fs::write(path, bytes).unwrap();
}

/// A small volume with a bright cube in the middle.
pub fn write_phantom(path: &Path, size: &[usize]) {
    let n: usize = size.iter().product();
    let voxels: Vec<f32> = (0..n)
        .map(|i| {
            let mut rem = i;
            let inside = size.iter().all(|&len| {
                let c = rem % len;
                rem /= len;
                c >= len / 4 && c < len - len / 4
            });
            if inside { 100.0 } else { 0.0 }
        })
        .collect();
    let spacing = vec![1.0f32; size.len()];
    write_nifti(path, size, &spacing, &voxels);
}

pub fn write_text(path: &Path, text: &str) {
    fs::write(path, text).unwrap();
}

pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Install an executable `antsRegistration` shell script in `dir`.
#[cfg(unix)]
pub fn write_script(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("antsRegistration");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// Script body that writes every file a SyN run leaves under `prefix`.
pub fn ants_writing_artifacts(prefix: &str) -> String {
    let files = [
        "0GenericAffine.mat",
        "1Warp.nii.gz",
        "1InverseWarp.nii.gz",
        "Warped.nii.gz",
        "InverseWarped.nii.gz",
    ];
    format!("for f in {}; do\n  echo x > '{prefix}'$f\ndone", files.join(" "))
}

fn put_i16(buf: &mut [u8], offset: usize, v: i16) {
    buf[offset..offset + 2].copy_from_slice(&v.to_le_bytes());
}

fn put_i32(buf: &mut [u8], offset: usize, v: i32) {
    buf[offset..offset + 4].copy_from_slice(&v.to_le_bytes());
}

fn put_f32(buf: &mut [u8], offset: usize, v: f32) {
    buf[offset..offset + 4].copy_from_slice(&v.to_le_bytes());
}

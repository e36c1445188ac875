use super::*;
use std::io::Cursor;
use std::path::PathBuf;

use romcheck_dat::{CatalogEntry, FileHasher, HashAlgorithm, compute_digest};
use tempfile::TempDir;

const FOO_DATA: &[u8] = b"foo rom contents";

fn md5_of(data: &[u8]) -> String {
    compute_digest(&mut Cursor::new(data.to_vec()), HashAlgorithm::Md5).unwrap()
}

fn foo_index() -> HashIndex {
    HashIndex::from_entries(&[CatalogEntry {
        game_name: "Foo".into(),
        rom_name: "foo.rom".into(),
        size: FOO_DATA.len() as u64,
        content_hash: md5_of(FOO_DATA),
        status: String::new(),
    }])
}

fn index_naming(rom_name: &str) -> HashIndex {
    HashIndex::from_entries(&[CatalogEntry {
        game_name: "Foo".into(),
        rom_name: rom_name.into(),
        size: FOO_DATA.len() as u64,
        content_hash: md5_of(FOO_DATA),
        status: String::new(),
    }])
}

fn write_file(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, data).unwrap();
    path
}

fn rename_on() -> CheckOptions {
    CheckOptions::default().with_rename(true)
}

/// Hasher that fails every read.
struct BrokenHasher;

impl ContentHasher for BrokenHasher {
    fn digest_file(&self, _path: &Path) -> io::Result<String> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
    }
}

#[test]
fn test_exact_match_is_verified() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "foo.rom", FOO_DATA);

    let result = classify_file(&path, &foo_index(), &FileHasher::default(), &rename_on()).unwrap();
    assert_eq!(
        result,
        ScanResult::Verified {
            name: "foo.rom".into()
        }
    );
    assert!(result.is_verified());
}

#[test]
fn test_misnamed_without_rename_is_mismatched() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "wrong.rom", FOO_DATA);

    let result = classify_file(
        &path,
        &foo_index(),
        &FileHasher::default(),
        &CheckOptions::default(),
    )
    .unwrap();
    assert_eq!(
        result,
        ScanResult::Mismatched {
            actual: "wrong.rom".into(),
            expected: "foo.rom".into(),
        }
    );
    assert!(!result.is_verified());

    // Nothing moved
    assert!(path.exists());
    assert!(!dir.path().join("foo.rom").exists());
}

#[test]
fn test_misnamed_with_rename_is_renamed_and_verified() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "wrong.rom", FOO_DATA);

    let result = classify_file(&path, &foo_index(), &FileHasher::default(), &rename_on()).unwrap();
    assert_eq!(
        result,
        ScanResult::Renamed {
            from: "wrong.rom".into(),
            to: "foo.rom".into(),
        }
    );
    assert!(result.is_verified());
    assert_eq!(result.file_name(), "foo.rom");

    assert!(!path.exists());
    let renamed = dir.path().join("foo.rom");
    assert_eq!(fs::read(renamed).unwrap(), FOO_DATA);
}

#[test]
fn test_unknown_is_never_renamed() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "mystery.bin", b"not in the catalog");

    for options in [CheckOptions::default(), rename_on()] {
        let result = classify_file(&path, &foo_index(), &FileHasher::default(), &options).unwrap();
        assert_eq!(
            result,
            ScanResult::Unknown {
                name: "mystery.bin".into()
            }
        );
        assert!(path.exists());
    }

    let names: Vec<_> = fs::read_dir(dir.path()).unwrap().flatten().collect();
    assert_eq!(names.len(), 1);
}

#[test]
fn test_rename_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "wrong.rom", FOO_DATA);
    write_file(&dir, "foo.rom", b"something else already here");

    let err = classify_file(&path, &foo_index(), &FileHasher::default(), &rename_on()).unwrap_err();
    assert!(matches!(err, CheckError::Rename { .. }));
    assert!(!err.is_fatal());

    // Both files untouched
    assert_eq!(fs::read(&path).unwrap(), FOO_DATA);
    assert_eq!(
        fs::read(dir.path().join("foo.rom")).unwrap(),
        b"something else already here"
    );
}

#[test]
fn test_missing_file_is_stat_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gone.rom");

    let err = classify_file(
        &path,
        &foo_index(),
        &FileHasher::default(),
        &CheckOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CheckError::FileStat { .. }));
}

#[test]
fn test_hash_failure_is_read_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "foo.rom", FOO_DATA);

    let err = classify_file(&path, &foo_index(), &BrokenHasher, &rename_on()).unwrap_err();
    match err {
        CheckError::FileRead { path: p, source } => {
            assert_eq!(p, path);
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
        other => panic!("Expected FileRead, got {other:?}"),
    }
}

#[test]
fn test_other_algorithms_classify_the_same_way() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "wrong.rom", FOO_DATA);

    let crc = compute_digest(&mut Cursor::new(FOO_DATA.to_vec()), HashAlgorithm::Crc32).unwrap();
    let index = HashIndex::from_entries(&[CatalogEntry {
        game_name: "Foo".into(),
        rom_name: "foo.rom".into(),
        size: FOO_DATA.len() as u64,
        content_hash: crc.to_lowercase(),
        status: String::new(),
    }]);

    let hasher = FileHasher::new(HashAlgorithm::Crc32);
    let result = classify_file(&path, &index, &hasher, &CheckOptions::default()).unwrap();
    assert!(matches!(result, ScanResult::Mismatched { expected, .. } if expected == "foo.rom"));
}

#[test]
fn test_rename_keeps_other_file_differing_only_in_case() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "foo.rom", FOO_DATA);
    write_file(&dir, "Foo.rom", b"a different dump the user keeps");
    if fs::read_dir(dir.path()).unwrap().count() == 1 {
        // Case-insensitive filesystem: both names are the same file
        return;
    }

    let err = classify_file(&path, &index_naming("Foo.rom"), &FileHasher::default(), &rename_on())
        .unwrap_err();
    match err {
        CheckError::Rename { source, .. } => {
            assert_eq!(source.kind(), io::ErrorKind::AlreadyExists)
        }
        other => panic!("Expected Rename, got {other:?}"),
    }
    assert_eq!(fs::read(&path).unwrap(), FOO_DATA);
    assert_eq!(
        fs::read(dir.path().join("Foo.rom")).unwrap(),
        b"a different dump the user keeps"
    );
}

#[test]
fn test_case_only_rename() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "foo.rom", FOO_DATA);

    let result =
        classify_file(&path, &index_naming("FOO.rom"), &FileHasher::default(), &rename_on())
            .unwrap();
    assert_eq!(
        result,
        ScanResult::Renamed {
            from: "foo.rom".into(),
            to: "FOO.rom".into(),
        }
    );
    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["FOO.rom".to_string()]);
}

#[test]
fn test_rename_stays_in_folder() {
    let root = TempDir::new().unwrap();
    let roms = root.path().join("roms");
    fs::create_dir(&roms).unwrap();
    let path = roms.join("wrong.rom");
    fs::write(&path, FOO_DATA).unwrap();

    for name in ["../escaped.rom", "sub/foo.rom", "/tmp/foo.rom", ".", ".."] {
        let err = classify_file(&path, &index_naming(name), &FileHasher::default(), &rename_on())
            .unwrap_err();
        match err {
            CheckError::Rename { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::InvalidInput, "{name}")
            }
            other => panic!("Expected Rename for {name}, got {other:?}"),
        }
        assert_eq!(fs::read(&path).unwrap(), FOO_DATA);
    }
    assert!(!root.path().join("escaped.rom").exists());
}

#[test]
fn test_unsafe_catalog_name_is_only_reported_without_rename() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "wrong.rom", FOO_DATA);

    let result = classify_file(
        &path,
        &index_naming("../escaped.rom"),
        &FileHasher::default(),
        &CheckOptions::default(),
    )
    .unwrap();
    assert!(matches!(result, ScanResult::Mismatched { .. }));
    assert!(path.exists());
}

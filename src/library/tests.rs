use std::fs;
use std::path::Path;

use tempfile::tempdir;

use super::{read_title, scan};
use crate::config::LibrarySettings;

fn titles(dir: &Path, settings: &LibrarySettings) -> Vec<String> {
    scan(dir, settings).into_iter().map(|t| t.title).collect()
}

#[test]
fn scan_filters_non_audio_and_sorts_by_title_case_insensitive() {
    let dir = tempdir().unwrap();

    fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
    fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

    let tracks = scan(dir.path(), &LibrarySettings::default());
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].title, "A");
    assert_eq!(tracks[0].id, 1);
    assert_eq!(tracks[1].title, "b");
    assert_eq!(tracks[1].id, 2);
    assert_eq!(tracks[1].locator.path(), dir.path().join("b.MP3"));
}

#[test]
fn scan_skips_hidden_by_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
    fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();
    let hidden_dir = dir.path().join(".cache");
    fs::create_dir_all(&hidden_dir).unwrap();
    fs::write(hidden_dir.join("inner.mp3"), b"not real").unwrap();

    assert_eq!(
        titles(dir.path(), &LibrarySettings::default()),
        vec!["visible".to_string()]
    );

    let settings = LibrarySettings {
        include_hidden: true,
        ..LibrarySettings::default()
    };
    assert_eq!(titles(dir.path(), &settings).len(), 3);
}

#[test]
fn scan_respects_recursive_false() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("child.mp3"), b"not real").unwrap();

    let settings = LibrarySettings {
        recursive: false,
        ..LibrarySettings::default()
    };
    assert_eq!(titles(dir.path(), &settings), vec!["root".to_string()]);
}

#[test]
fn scan_respects_max_depth() {
    let dir = tempdir().unwrap();
    let d1 = dir.path().join("d1");
    let d2 = d1.join("d2");
    fs::create_dir_all(&d2).unwrap();
    fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
    fs::write(d1.join("one.mp3"), b"not real").unwrap();
    fs::write(d2.join("two.mp3"), b"not real").unwrap();

    // WalkDir depth counts root as 0, children as 1, grandchildren as 2...
    let settings = LibrarySettings {
        max_depth: Some(2),
        ..LibrarySettings::default()
    };
    let names = titles(dir.path(), &settings);
    assert!(names.contains(&"root".to_string()));
    assert!(names.contains(&"one".to_string()));
    assert!(!names.contains(&"two".to_string()));
}

#[test]
fn scan_of_missing_directory_is_empty_not_an_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(scan(&missing, &LibrarySettings::default()).is_empty());
}

#[test]
fn scan_breaks_title_ties_by_path() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    fs::write(b.join("same.mp3"), b"x").unwrap();
    fs::write(a.join("same.mp3"), b"x").unwrap();

    let tracks = scan(dir.path(), &LibrarySettings::default());
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].locator.path(), a.join("same.mp3"));
    assert_eq!(tracks[1].locator.path(), b.join("same.mp3"));
}

#[test]
fn read_title_is_none_for_untagged_files() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("junk.mp3");
    fs::write(&p, b"not really audio").unwrap();
    assert_eq!(read_title(&p), None);
}

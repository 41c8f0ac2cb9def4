// tests/output_layout.rs

use std::error::Error;

use storyboard::pipeline::layout::{
    copy_dir_all, create_unique_dir, move_by_copy, raster_file_name, relocate_project, scene_stem,
    stamped_name, vector_file_name,
};
use storyboard_test_utils::builders::{entry_names, write_project};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn scene_names_are_zero_padded_from_one() {
    assert_eq!(scene_stem(1), "scene_01");
    assert_eq!(raster_file_name(9), "scene_09.png");
    assert_eq!(vector_file_name(12), "scene_12.svg");
    assert_eq!(scene_stem(100), "scene_100");
}

#[test]
fn stamped_names_join_with_underscore() {
    assert_eq!(stamped_name("fox", 1_700_000_000), "fox_1700000000");
}

#[tokio::test]
async fn colliding_directories_get_numeric_suffixes() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let root = tmp.path().join("out");

    let a = create_unique_dir(&root, "fox_1").await?;
    let b = create_unique_dir(&root, "fox_1").await?;
    let c = create_unique_dir(&root, "fox_1").await?;

    assert_eq!(a, root.join("fox_1"));
    assert_eq!(b, root.join("fox_1-1"));
    assert_eq!(c, root.join("fox_1-2"));
    assert!(a.is_dir() && b.is_dir() && c.is_dir());
    Ok(())
}

#[tokio::test]
async fn relocation_moves_whole_project() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let input = tmp.path().join("input");
    let processed = tmp.path().join("processed");
    let dir = write_project(&input, "fox", "A fox runs.");

    let dest = relocate_project(&dir, &processed, "fox", 42).await?;

    assert_eq!(dest, processed.join("fox_42"));
    assert!(!dir.exists());
    assert_eq!(entry_names(&dest), vec!["source.png", "story.txt"]);

    // A second project with the same name and second does not overwrite.
    let again = write_project(&input, "fox", "Another fox.");
    let dest2 = relocate_project(&again, &processed, "fox", 42).await?;
    assert_eq!(dest2, processed.join("fox_42-1"));
    assert_eq!(std::fs::read_to_string(dest.join("story.txt"))?, "A fox runs.");
    Ok(())
}

#[tokio::test]
async fn cross_device_fallback_copies_tree_and_removes_source() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let input = tmp.path().join("input");
    let processed = tmp.path().join("processed");
    let dir = write_project(&input, "fox", "A fox runs.");
    std::fs::create_dir(dir.join("notes"))?;
    std::fs::write(dir.join("notes").join("draft.txt"), "first draft")?;

    // Relocation claims the destination before moving into it.
    let dest = create_unique_dir(&processed, "fox_42").await?;
    move_by_copy(&dir, &dest).await?;

    assert!(!dir.exists());
    assert_eq!(entry_names(&dest), vec!["notes", "source.png", "story.txt"]);
    assert_eq!(
        std::fs::read_to_string(dest.join("notes").join("draft.txt"))?,
        "first draft"
    );
    assert_eq!(std::fs::read_to_string(dest.join("story.txt"))?, "A fox runs.");
    Ok(())
}

#[test]
fn copying_a_missing_tree_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let err = copy_dir_all(&tmp.path().join("absent"), &tmp.path().join("copy")).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}

#[tokio::test]
async fn failed_relocation_releases_claimed_name() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let processed = tmp.path().join("processed");

    let result = relocate_project(&tmp.path().join("gone"), &processed, "fox", 42).await;

    assert!(result.is_err());
    assert!(entry_names(&processed).is_empty());
    Ok(())
}

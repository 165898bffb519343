// End-to-end tests for the organize pipeline

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use mediaorg::logger;
use mediaorg::{organize, Action, DateFormat, DateOrganizer, RecordingLogger, RunConfig};
use tempfile::tempdir;

fn create_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn set_modified(path: &Path, epoch_secs: u64) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(UNIX_EPOCH + Duration::from_secs(epoch_secs))
        .unwrap();
}

#[test]
fn test_year_month_day_folder_is_kept() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    create_file(
        &input.path().join("2024-01-10 Description"),
        "TestFile.txt",
        b"test",
    );

    organize(
        input.path(),
        output.path(),
        DateFormat::YearMonthDay,
        false,
        logger::noop(),
    )
    .unwrap();

    assert!(output
        .path()
        .join("2024-01-10 Description/TestFile.txt")
        .exists());
}

#[test]
fn test_bare_date_folder_falls_back_to_modification_date() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    let file = create_file(&input.path().join("2024-01-10"), "TestFile.txt", b"test");

    let modified = fs::metadata(&file).unwrap().modified().unwrap();
    let expected_folder = DateTime::<Utc>::from(modified).format("%Y-%m-%d").to_string();

    organize(
        input.path(),
        output.path(),
        DateFormat::YearMonthDay,
        false,
        logger::noop(),
    )
    .unwrap();

    assert!(output
        .path()
        .join(&expected_folder)
        .join("TestFile.txt")
        .exists());
}

#[test]
fn test_modification_date_is_read_as_utc() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    let file = create_file(&input.path().join("misc"), "late.jpg", b"late");
    // 2023-12-31T23:30:00Z
    set_modified(&file, 1_704_065_400);

    organize(
        input.path(),
        output.path(),
        DateFormat::YearMonthDay,
        false,
        logger::noop(),
    )
    .unwrap();

    assert!(output.path().join("2023-12-31/late.jpg").exists());
}

#[test]
fn test_day_month_year_folder() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    create_file(
        &input.path().join("15-03-1982 Vacation Photos"),
        "beach1.jpg",
        &[7u8; 4096],
    );

    organize(
        input.path(),
        output.path(),
        DateFormat::DayMonthYear,
        false,
        logger::noop(),
    )
    .unwrap();

    let copied = output.path().join("15-03-1982 Vacation Photos/beach1.jpg");
    assert_eq!(fs::read(copied).unwrap(), vec![7u8; 4096]);
}

#[test]
fn test_many_files_in_one_dated_folder() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    let dated = input.path().join("1982-03-15 Vacation Photos");
    for i in 1..=25 {
        create_file(&dated, &format!("beach{}.jpg", i), format!("{}", i).as_bytes());
    }

    let report = organize(
        input.path(),
        output.path(),
        DateFormat::YearMonthDay,
        false,
        logger::noop(),
    )
    .unwrap();

    assert_eq!(report.copied_count(), 25);
    for i in 1..=25 {
        assert!(output
            .path()
            .join(format!("1982-03-15 Vacation Photos/beach{}.jpg", i))
            .exists());
    }
}

#[test]
fn test_preview_creates_nothing() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    let dated = input.path().join("1982-03-15 Vacation Photos");
    for i in 1..=5 {
        create_file(&dated, &format!("beach{}.jpg", i), b"x");
    }
    create_file(&input.path().join("undated"), "other.jpg", b"y");

    let logger = Arc::new(RecordingLogger::new());
    let report = organize(
        input.path(),
        output.path(),
        DateFormat::YearMonthDay,
        true,
        logger.clone(),
    )
    .unwrap();

    assert_eq!(report.previewed_count(), 6);
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
    assert!(logger.contains("Running in preview mode"));
    assert!(logger.contains("Using modification time to make output path"));
}

#[test]
fn test_same_name_in_two_folders_with_same_date() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    let first = create_file(&input.path().join("a"), "IMG_0001.jpg", b"first");
    let second = create_file(&input.path().join("b"), "IMG_0001.jpg", b"second");
    set_modified(&first, 1_600_000_000);
    set_modified(&second, 1_600_000_000);

    let report = organize(
        input.path(),
        output.path(),
        DateFormat::YearMonthDay,
        false,
        logger::noop(),
    )
    .unwrap();

    assert_eq!(report.copied_count(), 2);
    let folder = output.path().join("2020-09-13");
    assert_eq!(fs::read(folder.join("IMG_0001.jpg")).unwrap(), b"first");
    let names: Vec<String> = fs::read_dir(&folder)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names
        .iter()
        .any(|n| n != "IMG_0001.jpg" && n.ends_with("-IMG_0001.jpg")));
}

#[test]
fn test_many_same_named_files_on_one_date_all_land() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    for dir in ["a", "b", "c", "d", "e"] {
        let file = create_file(&input.path().join(dir), "IMG_0001.jpg", dir.as_bytes());
        set_modified(&file, 1_600_000_000);
    }

    let report = organize(
        input.path(),
        output.path(),
        DateFormat::YearMonthDay,
        false,
        logger::noop(),
    )
    .unwrap();

    assert_eq!(report.failed_count(), 0);
    assert_eq!(report.copied_count(), 5);
    let folder = output.path().join("2020-09-13");
    let mut contents: Vec<Vec<u8>> = fs::read_dir(&folder)
        .unwrap()
        .map(|e| fs::read(e.unwrap().path()).unwrap())
        .collect();
    contents.sort();
    assert_eq!(
        contents,
        vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec(), b"d".to_vec(), b"e".to_vec()]
    );
}

#[test]
fn test_output_inside_input_is_not_rescanned() {
    let input = tempdir().unwrap();
    create_file(&input.path().join("2001-01-01 Party"), "cake.jpg", b"cake");
    let output = input.path().join("sorted");

    let report = organize(
        input.path(),
        &output,
        DateFormat::YearMonthDay,
        false,
        logger::noop(),
    )
    .unwrap();

    assert_eq!(report.copied_count(), 1);
    assert!(output.join("2001-01-01 Party/cake.jpg").exists());
}

#[test]
fn test_run_organizes_every_input() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    let output = tempdir().unwrap();
    create_file(&first.path().join("2010-10-10 One"), "a.txt", b"a");
    create_file(&second.path().join("2011-11-11 Two"), "b.txt", b"b");

    let config = RunConfig::new(
        Action::Organize,
        vec![first.path().to_path_buf(), second.path().to_path_buf()],
        output.path().to_path_buf(),
        DateFormat::YearMonthDay,
        false,
    )
    .unwrap();
    let report = mediaorg::run(&config, logger::noop()).unwrap();

    assert_eq!(report.copied_count(), 2);
    assert!(output.path().join("2010-10-10 One/a.txt").exists());
    assert!(output.path().join("2011-11-11 Two/b.txt").exists());
}

#[test]
fn test_constructor_validation() {
    assert!(DateOrganizer::new("", "dest", DateFormat::YearMonthDay, false).is_err());
    assert!(DateOrganizer::new("input", "", DateFormat::YearMonthDay, false).is_err());
}

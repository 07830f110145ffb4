use std::fs;
use std::sync::{Arc, Mutex};

use taskdag::builder::{CleanTaskBuilder, FileTaskBuilder, TaskBuilder};
use taskdag::{TaskArg, TaskName};

#[test]
fn test_plain_builder_binds_name_deps_and_help() {
    let task = TaskBuilder::new("build")
        .arg("release")
        .dependency("compile")
        .dependency("lint")
        .help("Build everything.")
        .build(|_args| Ok(()));

    assert_eq!(task.name(), &TaskName::from("build"));
    assert_eq!(task.args(), &[TaskArg::from("release")]);
    assert_eq!(
        task.dependencies(),
        &[TaskName::from("compile"), TaskName::from("lint")]
    );
    assert_eq!(task.help(), Some("Build everything."));
}

#[test]
fn test_plain_task_passes_bound_args_to_procedure() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in_task = Arc::clone(&seen);

    let task = TaskBuilder::new("greet")
        .arg("hello")
        .arg("world")
        .build(move |args| {
            let mut seen = seen_in_task.lock().unwrap();
            for arg in args {
                seen.push(arg.as_str().unwrap_or("?").to_string());
            }
            Ok(())
        });

    task.run().unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["hello", "world"]);
}

#[test]
fn test_file_builder_runs_when_target_missing() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.txt");

    let ran = Arc::new(Mutex::new(0));
    let ran_in_task = Arc::clone(&ran);
    let task = FileTaskBuilder::new(target.clone()).build(move |_args| {
        *ran_in_task.lock().unwrap() += 1;
        Ok(())
    });

    assert_eq!(task.name(), &TaskName::from(target.as_path()));
    task.run().unwrap();
    assert_eq!(*ran.lock().unwrap(), 1);
}

#[test]
fn test_clean_task_removes_files_and_directories() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("artifact.bin");
    let tree = dir.path().join("build");
    fs::write(&file, b"bytes").unwrap();
    fs::create_dir(&tree).unwrap();
    fs::write(tree.join("nested.txt"), b"nested").unwrap();
    let absent = dir.path().join("never-created");

    let task = CleanTaskBuilder::new("clean")
        .help("Remove build outputs.")
        .build(vec![file.clone(), tree.clone(), absent]);

    task.run().unwrap();
    assert!(!file.exists());
    assert!(!tree.exists());

    // A second run sees nothing to delete and still succeeds.
    task.run().unwrap();
}

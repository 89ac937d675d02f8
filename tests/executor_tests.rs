//! Executor driven through the line prompter, as the binary uses it.

use cleanfiles::analyze::{ActionPlan, Phase};
use cleanfiles::executor::{execute_plan, ApprovalMemory, LinePrompter, PlanOutcome};
use cleanfiles::scanner::read_record;
use cleanfiles::{Action, ActionKind, Config};
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

fn junk_plan(dir: &std::path::Path, names: &[&str]) -> ActionPlan {
    let mut plan = ActionPlan::new(Phase::JunkRemoval);
    for name in names {
        let path = dir.join(name);
        fs::write(&path, b"junk").expect("write");
        let record = read_record(&path).expect("record");
        plan.add_action(Action::delete(record, "Temporary file (.tmp)"));
    }
    plan
}

#[test]
fn test_transcript_shows_each_prompt_until_always() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let plan = junk_plan(temp_dir.path(), &["a.tmp", "b.tmp", "c.tmp", "d.tmp"]);

    let mut prompter = LinePrompter::new(Cursor::new(b"n\na\n".to_vec()), Vec::new());
    let mut memory = ApprovalMemory::new();
    let report = execute_plan(&plan, &Config::default(), &mut prompter, &mut memory, None)
        .expect("execute");

    assert_eq!(report.outcome, PlanOutcome::Finished);
    assert_eq!(report.stats.declined_actions, 1);
    assert_eq!(report.stats.completed_actions, 3);
    assert!(temp_dir.path().join("a.tmp").exists());
    assert!(!temp_dir.path().join("d.tmp").exists());
    assert!(memory.is_always(ActionKind::Delete));

    let transcript = String::from_utf8(prompter.into_output()).expect("utf8");
    assert!(transcript.contains("[1/4]"));
    assert!(transcript.contains("[2/4]"));
    assert!(!transcript.contains("[3/4]"), "no prompt after always");
    assert!(transcript.contains("ISSUE:"));
    assert!(transcript.contains("Temporary file (.tmp)"));
}

#[test]
fn test_end_of_input_aborts_before_touching_anything() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let plan = junk_plan(temp_dir.path(), &["a.tmp", "b.tmp"]);

    let mut prompter = LinePrompter::new(Cursor::new(Vec::new()), Vec::new());
    let report = execute_plan(
        &plan,
        &Config::default(),
        &mut prompter,
        &mut ApprovalMemory::new(),
        None,
    )
    .expect("execute");

    assert_eq!(report.outcome, PlanOutcome::Aborted { at: 1 });
    assert!(temp_dir.path().join("a.tmp").exists());
    assert!(temp_dir.path().join("b.tmp").exists());
}

#[test]
fn test_move_into_target_does_not_overwrite_late_arrival() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let target = temp_dir.path().join("x");
    let source = temp_dir.path().join("y");
    fs::create_dir_all(&target).unwrap();
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("a.txt"), b"moved").unwrap();

    let mut plan = ActionPlan::new(Phase::Consolidation);
    let record = read_record(&source.join("a.txt")).unwrap();
    plan.add_action(Action::move_to(record, target.join("a.txt"), "consolidate"));

    // Appears after planning
    fs::write(target.join("a.txt"), b"already here").unwrap();

    let mut memory = ApprovalMemory::approve_all();
    let mut prompter = LinePrompter::new(Cursor::new(Vec::new()), Vec::new());
    execute_plan(&plan, &Config::default(), &mut prompter, &mut memory, None).expect("execute");

    assert_eq!(fs::read(target.join("a.txt")).unwrap(), b"already here");
    assert_eq!(fs::read(target.join("a_1.txt")).unwrap(), b"moved");
}

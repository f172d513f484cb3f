use suzed::{LoadedSave, SzValue, VarValue};

#[test]
fn modifying_a_value_marks_dirty_and_changes_bytes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sample.json");
    std::fs::write(
        &path,
        br#"{"variables":"Variable={[\"a\"]=1, [\"b\"]=true};","turn":1}"#,
    )
    .expect("write sample");

    let mut save = LoadedSave::load_path(&path).expect("load sample");
    assert!(!save.dirty);

    assert!(save.vars.set("b", VarValue::Bool(false)));
    save.mark_dirty();

    let bytes = save.save_bytes().expect("save bytes");
    assert_ne!(bytes, save.original_bytes);

    let text = std::str::from_utf8(&bytes).expect("utf8");
    SzValue::parse(text).expect("saved json parses");
}

#[test]
fn set_does_not_touch_the_untargeted_entries() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sample.json");
    std::fs::write(
        &path,
        br#"{"variables":"Variable={[\"x\"]=1, [\"y\"]=2, [\"z\"]=3};"}"#,
    )
    .expect("write sample");

    let mut save = LoadedSave::load_path(&path).expect("load sample");
    assert!(save.vars.set("y", VarValue::Int(7)));

    let entries: Vec<(&str, &VarValue)> = save.vars.iter().collect();
    assert_eq!(
        entries,
        vec![
            ("x", &VarValue::Int(1)),
            ("y", &VarValue::Int(7)),
            ("z", &VarValue::Int(3)),
        ]
    );
}

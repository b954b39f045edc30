// End-to-end tests for the skelprefs binary
use std::process::Command;

fn skelprefs() -> Command {
    Command::new(env!("CARGO_BIN_EXE_skelprefs"))
}

#[test]
fn test_render_bundled_skeleton() {
    let output = skelprefs().arg("render").output().unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, skelprefs::SKELETON_PREFS);
}

#[test]
fn test_show_get_raw_value() {
    let output = skelprefs()
        .args(["show", "--get", "network.proxy.autoconfig_url"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "http://wpad.kuins.net/proxy.pac\n"
    );
}

#[test]
fn test_show_query_json() {
    let output = skelprefs()
        .args(["show", "-q", "network.proxy.*"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert_eq!(object["network.proxy.type"], serde_json::json!(2));
}

#[test]
fn test_install_then_refuse_second_install() {
    let home = tempfile::TempDir::new().unwrap();
    let home_arg = home.path().to_str().unwrap();

    let first = skelprefs()
        .args(["install", "--home", home_arg])
        .output()
        .unwrap();
    assert!(first.status.success());
    assert_eq!(
        std::fs::read(home.path().join(".mozilla/firefox/default/prefs.js")).unwrap(),
        skelprefs::SKELETON_PREFS
    );

    let second = skelprefs()
        .args(["install", "--home", home_arg])
        .output()
        .unwrap();
    assert!(!second.status.success());
    assert!(String::from_utf8_lossy(&second.stderr).contains("--overwrite"));
}

#[test]
fn test_check_reports_parse_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("prefs.js");
    std::fs::write(&path, "user_pref(\"a\", 1)\n").unwrap();

    let output = skelprefs()
        .args(["check", path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("line"));
}

#[test]
fn test_show_json_array() {
    let output = skelprefs()
        .args(["show", "-o", "json-array"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 25);
    for entry in entries {
        assert!(entry["key"].is_string());
        assert!(!entry["value"].is_null());
        assert_eq!(entry["pref_type"], serde_json::json!("user"));
    }
}

#[test]
fn test_copy_skel_lists_written_files() {
    let skel = tempfile::TempDir::new().unwrap();
    let home = tempfile::TempDir::new().unwrap();
    let prefs_dir = skel.path().join(".mozilla/firefox/default");
    std::fs::create_dir_all(&prefs_dir).unwrap();
    std::fs::write(prefs_dir.join("prefs.js"), skelprefs::SKELETON_PREFS).unwrap();

    let output = skelprefs()
        .args(["copy-skel", "--skel"])
        .arg(skel.path())
        .arg("--home")
        .arg(home.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let target = home.path().join(".mozilla/firefox/default/prefs.js");
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        format!("{}\n", target.display())
    );
    assert_eq!(std::fs::read(&target).unwrap(), skelprefs::SKELETON_PREFS);
}

#[test]
fn test_profiles_after_install() {
    let home = tempfile::TempDir::new().unwrap();
    let install = skelprefs()
        .arg("install")
        .arg("--home")
        .arg(home.path())
        .output()
        .unwrap();
    assert!(install.status.success());

    let output = skelprefs()
        .arg("profiles")
        .arg("--home")
        .arg(home.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let profiles = json.as_array().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["name"], serde_json::json!("default"));
    assert_eq!(profiles[0]["is_default"], serde_json::json!(true));
}

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("pawpal-{nanos}-{file_name}"))
}

fn spawn(config_path: &PathBuf) -> Child {
    Command::new(env!("CARGO_BIN_EXE_pawpal"))
        .env("PAWPAL_CONFIG_PATH", config_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn interactive session")
}

fn run_interactive(input: &str) -> std::process::Output {
    let mut child = spawn(&temp_path("absent-config.json"));
    child
        .stdin
        .as_mut()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("failed to write to stdin");

    child
        .wait_with_output()
        .expect("failed to read interactive output")
}

fn send(stdin: &mut ChildStdin, stdout: &mut BufReader<ChildStdout>, line: &str) -> String {
    writeln!(stdin, "{line}").expect("write line");
    stdin.flush().expect("flush");
    let mut response = String::new();
    stdout.read_line(&mut response).expect("read response");
    response
}

#[test]
fn interactive_help_shows_usage() {
    let output = run_interactive("help\nexit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"));
}

#[test]
fn interactive_invalid_command_keeps_session_alive() {
    let output = run_interactive("nope\npet add Mochi dog\nexit\n");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stderr.contains("ERROR: invalid_input"));
    assert!(stdout.contains("Added pet: Mochi (dog)"));
}

#[test]
fn interactive_unknown_pet_and_task_are_not_found() {
    let output =
        run_interactive("task add Ghost Walk \"2026-02-15 09:00\"\ndone deadbeef\nexit\n");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: not_found - pet 'Ghost'"));
    assert!(stderr.contains("ERROR: not_found - task 'deadbeef' is not scheduled"));
}

#[test]
fn interactive_conflicts_between_pets() {
    let output = run_interactive(concat!(
        "pet add Mochi dog\n",
        "pet add Luna cat\n",
        "task add Mochi Walk \"2026-02-15 09:00\" --priority high\n",
        "task add Luna Feed \"2026-02-15 09:00\"\n",
        "conflicts\n",
        "exit\n",
    ));

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Conflict detected at 09:00:00 between 'Walk' and 'Feed'"));
}

#[test]
fn interactive_done_schedules_next_occurrence() {
    let mut child = spawn(&temp_path("absent-config.json"));
    let mut stdin = child.stdin.take().expect("stdin");
    let mut stdout = BufReader::new(child.stdout.take().expect("stdout"));

    send(&mut stdin, &mut stdout, "pet add Mochi dog --born 2021-06-01");
    let added = send(
        &mut stdin,
        &mut stdout,
        "--json task add Mochi Breakfast \"2026-02-15 08:00\" --category feeding --every 1",
    );
    let added: serde_json::Value = serde_json::from_str(&added).expect("task json");
    let id = added["id"].as_str().expect("task id").to_string();
    assert_eq!(added["recurrence_days"], 1);

    let done = send(&mut stdin, &mut stdout, &format!("--json done {id}"));
    let done: serde_json::Value = serde_json::from_str(&done).expect("done json");
    assert_eq!(done["completed"]["id"], id.as_str());
    assert_eq!(done["completed"]["is_completed"], true);
    assert_eq!(done["next"]["scheduled_time"], "2026-02-16 08:00");
    assert_eq!(done["next"]["pet"], "Mochi");
    assert_eq!(done["next"]["is_completed"], false);
    assert_ne!(done["next"]["id"], id.as_str());

    let pets = send(&mut stdin, &mut stdout, "--json pet list");
    let pets: serde_json::Value = serde_json::from_str(&pets).expect("pets json");
    assert_eq!(pets[0]["tasks"].as_array().map(Vec::len), Some(2));

    writeln!(stdin, "exit").expect("exit");
    drop(stdin);
    assert!(child.wait().expect("wait").success());
}

#[test]
fn interactive_aliases_come_from_config() {
    let config_path = temp_path("alias-config.json");
    std::fs::write(
        &config_path,
        serde_json::json!({ "aliases": { "clash": "conflicts" } }).to_string(),
    )
    .unwrap();

    let mut child = spawn(&config_path);
    child
        .stdin
        .as_mut()
        .expect("stdin")
        .write_all(b"demo\nclash\nexit\n")
        .expect("write");
    let output = child.wait_with_output().expect("output");
    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let matches = stdout
        .matches("Conflict detected at 07:30:00 between 'Feed Mochi' and 'Feed Luna'")
        .count();
    assert_eq!(matches, 2);
}

mod common;

use assert_cmd::Command;
use predicates::str::contains;

fn script(input: &str) -> assert_cmd::assert::Assert {
    let home = common::isolated_home();
    Command::cargo_bin("budget_widget")
        .unwrap()
        .env("BUDGET_WIDGET_SCRIPT", "1")
        .env("BUDGET_WIDGET_HOME", &home)
        .env("RUST_LOG", "off")
        .write_stdin(input.to_string())
        .assert()
}

#[test]
fn script_mode_tracks_budget() {
    script("add inc Salary 100\nadd exp \"Weekly groceries\" 40\nexit\n")
        .success()
        .stdout(contains("Available budget in"))
        .stdout(contains("Budget - 0.00 | Income + 0.00 | Expenses - 0.00 (---)"))
        .stdout(contains("Weekly groceries"))
        .stdout(contains("Budget + 60.00 | Income + 100.00 | Expenses - 40.00 (40%)"))
        .stdout(contains("Expense shares: exp-0 40%"));
}

#[test]
fn delete_frees_no_ids() {
    script("add exp a 1\nadd exp b 2\ndelete exp-0\nadd exp c 3\nlist\n")
        .success()
        .stdout(contains("removed exp-0"))
        .stdout(contains("Added exp-2"))
        .stdout(contains("Added exp-1"));
}

#[test]
fn invalid_values_are_ignored() {
    script("add inc Salary -5\nadd inc Salary abc\nsummary --json\n")
        .success()
        .stderr(contains("Item ignored"))
        .stderr(contains("`abc` is not a number"))
        .stdout(contains("\"total_income\": 0.0"))
        .stdout(contains("\"spend_percentage\": -1"));
}

#[test]
fn unknown_command_gets_a_suggestion() {
    script("sumary\n")
        .success()
        .stderr(contains("Unknown command `sumary`"))
        .stdout(contains("Suggestion: `summary`?"));
}

#[test]
fn config_separators_drive_formatting() {
    let home = common::isolated_home();
    std::fs::write(
        home.join("config.json"),
        r#"{"decimal_separator":",","grouping_separator":"."}"#,
    )
    .unwrap();
    Command::cargo_bin("budget_widget")
        .unwrap()
        .env("BUDGET_WIDGET_SCRIPT", "1")
        .env("BUDGET_WIDGET_HOME", &home)
        .write_stdin("add inc Salary 2500.5\n")
        .assert()
        .success()
        .stdout(contains("+ 2.500,50"));
}

#[test]
fn broken_config_fails_startup() {
    let home = common::isolated_home();
    std::fs::write(home.join("config.json"), "{ nope").unwrap();
    Command::cargo_bin("budget_widget")
        .unwrap()
        .env("BUDGET_WIDGET_SCRIPT", "1")
        .env("BUDGET_WIDGET_HOME", &home)
        .write_stdin("exit\n")
        .assert()
        .failure()
        .stderr(contains("Error: Configuration error"));
}

#[test]
fn ignored_items_do_not_consume_ids() {
    script("add exp Rent 0\nadd exp \"\" 10\nadd exp Rent 10\n")
        .success()
        .stderr(contains("Item ignored"))
        .stdout(contains("Added exp-0"));
}

#[test]
fn config_command_persists_separators() {
    let home = common::isolated_home();
    Command::cargo_bin("budget_widget")
        .unwrap()
        .env("BUDGET_WIDGET_SCRIPT", "1")
        .env("BUDGET_WIDGET_HOME", &home)
        .write_stdin("config separators , .\nadd inc Salary 1234.5\nconfig\n")
        .assert()
        .success()
        .stdout(contains("Formatting updated."))
        .stdout(contains("+ 1.234,50"))
        .stdout(contains("Decimal separator `,`, grouping separator `.`"));

    let saved = std::fs::read_to_string(home.join("config.json")).unwrap();
    assert!(saved.contains("\"decimal_separator\": \",\""));
}

#[test]
fn config_command_rejects_clashing_separators() {
    script("config separators . .\n")
        .success()
        .stderr(contains("Configuration error"));
}

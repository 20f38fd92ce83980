#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use assert_cmd::Command;
    use predicates::prelude::*;
    use rowdb::{EMAIL_SIZE, PAGE_SIZE, ROW_SIZE, ROWS_PER_PAGE, TABLE_MAX_ROWS, USERNAME_SIZE};
    use tempfile::NamedTempFile;

    // Helper function to run the command with a temporary database file
    fn run_commands<T: AsRef<str>>(commands: &[T]) -> Command {
        let db_path = create_db_path();
        run_commands_with_args(commands, &db_path)
    }

    // The temporary file is removed on drop, leaving a fresh path for the db.
    fn create_db_path() -> PathBuf {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        let db_path: PathBuf = temp_file.path().to_path_buf();
        db_path
    }

    fn run_commands_with_args<T: AsRef<str>>(commands: &[T], db_path: &Path) -> Command {
        let mut cmd = Command::cargo_bin("rowdb").expect("Failed to run command");
        cmd.arg(db_path.to_str().expect("Invalid path"));
        cmd.env_remove("ROWDB_PROMPT").env_remove("RUST_LOG");

        let input = commands
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join("\n");
        cmd.write_stdin(input);
        cmd
    }

    fn insert_commands(range: std::ops::RangeInclusive<usize>) -> Vec<String> {
        range
            .map(|i| format!("insert {i} user{i} person{i}@example.com"))
            .collect()
    }

    #[test]
    fn it_inserts_and_retrieves_a_row() {
        let mut cmd = run_commands(&["insert 1 user1 person1@example.com", "select", ".exit"]);

        let expected = [
            "db > Executed.",
            "db > (1, user1, person1@example.com)",
            "Executed.",
            "db > ",
        ]
        .join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_prints_error_message_when_table_is_full() {
        let mut commands = insert_commands(1..=TABLE_MAX_ROWS + 1);
        commands.push(String::from(".exit"));

        let mut cmd = run_commands(&commands);

        cmd.assert()
            .success()
            .stdout(predicate::str::ends_with("db > Error: Table full.\ndb > "))
            .stderr("");
    }

    #[test]
    fn it_ignores_the_insert_that_overflows() {
        let db_path = create_db_path();
        let mut commands = insert_commands(1..=TABLE_MAX_ROWS + 1);
        commands.push(String::from("select"));

        let mut cmd = run_commands_with_args(&commands, &db_path);
        let last = TABLE_MAX_ROWS;
        let overflow = TABLE_MAX_ROWS + 1;
        cmd.assert()
            .success()
            .stdout(predicate::str::contains(format!(
                "({last}, user{last}, person{last}@example.com)\nExecuted."
            )))
            .stdout(predicate::str::contains(format!("({overflow}, ")).not());
    }

    #[test]
    fn it_fills_and_save_full_table() {
        let mut commands = insert_commands(1..=TABLE_MAX_ROWS);
        let expected: Vec<String> = (1..=TABLE_MAX_ROWS)
            .map(|i| format!("({i}, user{i}, person{i}@example.com)"))
            .collect();
        commands.push(String::from(".exit"));

        let db_path = create_db_path();
        let mut cmd = run_commands_with_args(&commands, &db_path);

        cmd.assert()
            .success()
            .stdout(predicate::str::ends_with("db > "));

        let mut cmd = run_commands_with_args(&["select", ".exit"], &db_path);
        let expected = format!("db > {}\nExecuted.\ndb > ", expected.join("\n"));
        cmd.assert().success().stdout(expected);

        let mut cmd = run_commands_with_args(&["insert 1 user1 a@b.c", ".exit"], &db_path);
        cmd.assert()
            .success()
            .stdout("db > Error: Table full.\ndb > ");
    }

    #[test]
    fn it_allows_inserting_strings_that_are_the_maximum_length() {
        let long_username = "a".repeat(USERNAME_SIZE);
        let long_email = "a".repeat(EMAIL_SIZE);

        let commands = [
            format!("insert 1 {} {}", &long_username, &long_email),
            String::from("select"),
            String::from(".exit"),
        ];

        let mut cmd = run_commands(&commands);

        let expected = [
            String::from("db > Executed."),
            format!("db > (1, {}, {})", long_username, long_email),
            String::from("Executed."),
            String::from("db > "),
        ]
        .join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_prints_error_message_if_strings_are_too_long() {
        let long_username = "a".repeat(USERNAME_SIZE + 1);
        let long_email = "a".repeat(EMAIL_SIZE + 1);

        let commands = [
            format!("insert 1 {} {}", &long_username, &long_email),
            format!("insert 1 user1 {}", &long_email),
            String::from("select"),
            String::from(".exit"),
        ];

        let mut cmd = run_commands(&commands);

        let expected = [
            "db > String is too long.",
            "db > String is too long.",
            "db > Executed.",
            "db > ",
        ]
        .join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_prints_error_message_if_id_is_negative() {
        let mut cmd = run_commands(&["insert -1 user1 person1@example.com", "select", ".exit"]);

        let expected = ["db > ID must be positive.", "db > Executed.", "db > "].join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_rejects_a_zero_id() {
        let mut cmd = run_commands(&["insert 0 user0 person0@example.com", "select", ".exit"]);

        let expected = ["db > ID must be positive.", "db > Executed.", "db > "].join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_prints_syntax_and_keyword_errors() {
        let mut cmd = run_commands(&["insert 1 user1", "update 1 user1 a@b.c", ".tables", ".exit"]);

        let expected = [
            "db > Syntax error. Could not parse statement.",
            "db > Unrecognized keyword at start of 'update 1 user1 a@b.c'.",
            "db > Unrecognized command '.tables'.",
            "db > ",
        ]
        .join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_keeps_data_after_closing_connection() {
        let db_path = create_db_path();

        let mut cmd =
            run_commands_with_args(&["insert 1 user1 person1@example.com", ".exit"], &db_path);
        let expected = ["db > Executed.", "db > "].join("\n");
        cmd.assert().success().stdout(expected);

        let mut cmd = run_commands_with_args(&["select", ".exit"], &db_path);
        let expected = ["db > (1, user1, person1@example.com)\nExecuted.", "db > "].join("\n");
        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_saves_on_end_of_input() {
        let db_path = create_db_path();

        let mut cmd = run_commands_with_args(&["insert 1 user1 person1@example.com"], &db_path);
        cmd.assert().success();

        let mut cmd = run_commands_with_args(&["select"], &db_path);
        cmd.assert()
            .success()
            .stdout("db > (1, user1, person1@example.com)\nExecuted.\ndb > ");
    }

    #[test]
    fn it_keeps_data_after_a_line_that_is_not_utf8() {
        let db_path = create_db_path();

        let mut cmd = Command::cargo_bin("rowdb").expect("Failed to run command");
        cmd.arg(&db_path).env_remove("ROWDB_PROMPT").env_remove("RUST_LOG");
        cmd.write_stdin(
            b"insert 1 user1 person1@example.com\ninsert 2 \xff\xfe a@b.c\nselect\n.exit\n".to_vec(),
        );
        let expected = [
            "db > Executed.",
            "db > Syntax error. Could not parse statement.",
            "db > (1, user1, person1@example.com)",
            "Executed.",
            "db > ",
        ]
        .join("\n");
        cmd.assert().success().stdout(expected);

        let mut cmd = run_commands_with_args(&["select", ".exit"], &db_path);
        cmd.assert()
            .success()
            .stdout("db > (1, user1, person1@example.com)\nExecuted.\ndb > ");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn it_fails_when_pages_cannot_be_written() {
        let mut cmd =
            run_commands_with_args(&["insert 1 user1 person1@example.com", ".exit"], Path::new("/dev/full"));

        cmd.assert()
            .failure()
            .stdout("db > Executed.\ndb > ")
            .stderr(predicate::str::contains("db file I/O failed"));
    }

    #[test]
    fn it_writes_only_occupied_rows_of_the_last_page() {
        let db_path = create_db_path();
        let mut commands = insert_commands(1..=ROWS_PER_PAGE + 1);
        commands.push(String::from(".exit"));

        run_commands_with_args(&commands, &db_path).assert().success();

        let len = std::fs::metadata(&db_path).expect("db file exists").len();
        assert_eq!(len, (PAGE_SIZE + ROW_SIZE) as u64);
    }

    #[test]
    fn it_fails_on_a_corrupt_db_file() {
        let db_path = create_db_path();
        std::fs::write(&db_path, vec![0u8; ROW_SIZE - 1]).expect("write db file");

        let mut cmd = run_commands_with_args(&["select", ".exit"], &db_path);
        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("corrupt db file"));
    }

    #[test]
    fn it_runs_in_memory_without_a_filename() {
        let mut cmd = Command::cargo_bin("rowdb").expect("Failed to run command");
        cmd.env_remove("ROWDB_FILE").env_remove("ROWDB_PROMPT");
        cmd.write_stdin("insert 1 user1 person1@example.com\nselect\n.exit");

        cmd.assert()
            .success()
            .stdout("db > Executed.\ndb > (1, user1, person1@example.com)\nExecuted.\ndb > ");
    }

    #[test]
    fn it_uses_a_custom_prompt() {
        let db_path = create_db_path();
        let mut cmd = run_commands_with_args(&["select", ".exit"], &db_path);
        cmd.args(["--prompt", "sql> "]);

        cmd.assert().success().stdout("sql> Executed.\nsql> ");
    }
}

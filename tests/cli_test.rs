//! CLI integration tests for the apidoc-schema binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("apidoc-schema"))
}

// Helper to create a temp file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const CATALOG: &str = r#"[
    {
        "name": "Buyer",
        "fields": [
            { "name": "email", "type": "string" },
            { "name": "nickname", "type": "string", "nullable": true }
        ]
    },
    {
        "name": "Order",
        "fields": [
            { "name": "total", "type": "number" },
            { "name": "buyer", "type": "model", "model": "Buyer" }
        ]
    }
]"#;

mod formats_command {
    use super::*;

    #[test]
    fn collects_available() {
        cmd()
            .args(["formats", "-a", "full;version={2,1}", "-a", "compact"])
            .assert()
            .success()
            .stdout("full;version=1\nfull;version=2\ncompact\n");
    }

    #[test]
    fn resolves_requested() {
        cmd()
            .args([
                "formats",
                "--available",
                "full;version={1,2,3}",
                "--requested",
                "full;version=2",
            ])
            .assert()
            .success()
            .stdout("full;version=1\nfull;version=2\n");
    }

    #[test]
    fn custom_separator() {
        cmd()
            .args(["formats", "-a", "json; v={1,2}", "--separator", "; v="])
            .assert()
            .success()
            .stdout("json; v=1\njson; v=2\n");
    }

    #[test]
    fn requires_available() {
        cmd().args(["formats"]).assert().failure();
    }
}

mod expand_command {
    use super::*;

    #[test]
    fn expands_with_cap() {
        cmd()
            .args(["expand", "fmt;version={1,2,3}", "--max-version", "2"])
            .assert()
            .success()
            .stdout("fmt;version=1\nfmt;version=2\n");
    }

    #[test]
    fn plain_format_unchanged() {
        cmd()
            .args(["expand", "plainfmt"])
            .assert()
            .success()
            .stdout("plainfmt\n");
    }
}

mod schema_command {
    use super::*;

    #[test]
    fn inline_schema() {
        let dir = TempDir::new().unwrap();
        let catalog = write_temp_file(&dir, "models.json", CATALOG);

        cmd()
            .args(["schema", catalog.to_str().unwrap(), "--model", "Order"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""required":["email"]"#))
            .stdout(predicate::str::contains("$ref").not());
    }

    #[test]
    fn refs_schema() {
        let dir = TempDir::new().unwrap();
        let catalog = write_temp_file(&dir, "models.json", CATALOG);

        cmd()
            .args(["schema", catalog.to_str().unwrap(), "-m", "Order", "--refs"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r##""buyer":{"$ref":"#/definitions/Buyer"}"##,
            ))
            .stdout(predicate::str::contains(r#""definitions":{"Buyer""#));
    }

    #[test]
    fn refs_from_config_file() {
        let dir = TempDir::new().unwrap();
        let catalog = write_temp_file(&dir, "models.json", CATALOG);
        let config = write_temp_file(
            &dir,
            "config.json",
            r##"{ "refs": true, "ref_prefix": "#/components/schemas/" }"##,
        );

        cmd()
            .args([
                "schema",
                catalog.to_str().unwrap(),
                "-m",
                "Order",
                "--config",
                config.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("#/components/schemas/Buyer"));
    }

    #[test]
    fn writes_output_file() {
        let dir = TempDir::new().unwrap();
        let catalog = write_temp_file(&dir, "models.json", CATALOG);
        let output = dir.path().join("out.json");

        cmd()
            .args([
                "schema",
                catalog.to_str().unwrap(),
                "-m",
                "Buyer",
                "--pretty",
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .success();

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("{\n"));
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["description"], "Buyer");
    }

    #[test]
    fn unknown_model_exit_code() {
        let dir = TempDir::new().unwrap();
        let catalog = write_temp_file(&dir, "models.json", CATALOG);

        cmd()
            .args(["schema", catalog.to_str().unwrap(), "-m", "Refund"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("unknown model 'Refund'"));
    }

    #[test]
    fn missing_catalog_exit_code() {
        cmd()
            .args(["schema", "/nonexistent/models.json", "-m", "Order"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("file not found"));
    }

    #[test]
    fn unresolved_model_exit_code() {
        let dir = TempDir::new().unwrap();
        let catalog = write_temp_file(
            &dir,
            "models.json",
            r#"[{ "name": "Order", "fields": [ { "name": "buyer", "type": "model", "model": "Buyer" } ] }]"#,
        );

        cmd()
            .args(["schema", catalog.to_str().unwrap(), "-m", "Order"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("undefined model 'Buyer'"));
    }
}

mod params_command {
    use super::*;

    #[test]
    fn flat_model_params() {
        let dir = TempDir::new().unwrap();
        let catalog = write_temp_file(&dir, "models.json", CATALOG);

        cmd()
            .args(["params", catalog.to_str().unwrap(), "-m", "Buyer"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#"{"name":"email","required":true,"in":"query""#,
            ))
            .stdout(predicate::str::contains(
                r#"{"name":"nickname","required":false,"in":"query""#,
            ));
    }

    #[test]
    fn object_field_rejected_by_default() {
        let dir = TempDir::new().unwrap();
        let catalog = write_temp_file(&dir, "models.json", CATALOG);

        cmd()
            .args(["params", catalog.to_str().unwrap(), "-m", "Order"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("'buyer' is an object"));
    }

    #[test]
    fn object_field_skipped() {
        let dir = TempDir::new().unwrap();
        let catalog = write_temp_file(&dir, "models.json", CATALOG);

        cmd()
            .args([
                "params",
                catalog.to_str().unwrap(),
                "-m",
                "Order",
                "--objects",
                "skip",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("total"))
            .stdout(predicate::str::contains("buyer").not());
    }

    #[test]
    fn unknown_object_policy() {
        let dir = TempDir::new().unwrap();
        let catalog = write_temp_file(&dir, "models.json", CATALOG);

        cmd()
            .args([
                "params",
                catalog.to_str().unwrap(),
                "-m",
                "Order",
                "--objects",
                "flatten",
            ])
            .assert()
            .code(2);
    }
}

//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CATEGORIES: &str = "\
100|Lemmas|200|0|cat
100|Lemmas|101|14|Verbs
101|Verbs|201|0|running
102|Archaic|201|0|running
100|Lemmas|202|0|cats
100|Lemmas|203|0|oxen
100|Lemmas|204|0|colour
500|Form-of templates|300|10|Template:plural of
this line is not a record
";

const STUBS: &str = "100|14|Category:Lemmas\n101|14|Category:Verbs\n102|14|Category:Archaic\n200|0|cat\n";

const REDIRECTS: &str = "\
301|10|pl of|300|10|plural of
302|10|plural form of|300|10|plural of
303|10|p of|301|10|pl of
";

const PAGES: &str = r#"<mediawiki>
  <page><title>cat</title><ns>0</ns><revision><text>==English==
# {{lb|en|informal}} a feline</text></revision></page>
  <page><title>cats</title><ns>0</ns><revision><text># {{pl of|en|cat}}</text></revision></page>
  <page><title>oxen</title><ns>0</ns><revision><text># {{plural of|en|ox}}</text></revision></page>
  <page><title>colour</title><ns>0</ns><revision><text># {{lb|en|archaic}} a hue</text></revision></page>
</mediawiki>"#;

fn workspace() -> TempDir {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("categories.csv"), CATEGORIES).expect("categories");
    fs::write(tmp.path().join("stubs.csv"), STUBS).expect("stubs");
    fs::write(tmp.path().join("redirects.csv"), REDIRECTS).expect("redirects");
    fs::write(tmp.path().join("pages.xml"), PAGES).expect("pages");
    tmp
}

fn wikt_filter(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wikt-filter"));
    cmd.current_dir(dir).env_remove("RUST_LOG").env("XDG_CACHE_HOME", dir.join("cache"));
    cmd
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path).expect("output").lines().map(str::to_string).collect()
}

#[test]
fn test_cli_version() {
    let tmp = TempDir::new().expect("tmp");
    let mut cmd = wikt_filter(tmp.path());
    cmd.arg("--version");
    cmd.assert().success().stdout(predicate::str::contains("wikt-filter"));
}

#[test]
fn test_cli_help() {
    let tmp = TempDir::new().expect("tmp");
    let mut cmd = wikt_filter(tmp.path());
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("terms"))
        .stdout(predicate::str::contains("closure"))
        .stdout(predicate::str::contains("redirects"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_terms_subtracts_excluded_tree() {
    let tmp = workspace();
    let mut cmd = wikt_filter(tmp.path());
    cmd.args(["terms", "--categories", "categories.csv", "-i", "100", "-e", "102", "-o", "out.txt"]);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("wrote 4 term(s)"))
        .stderr(predicate::str::contains("1 malformed record(s) were skipped"));

    similar_asserts::assert_eq!(read_lines(&tmp.path().join("out.txt")), vec!["cat", "cats", "colour", "oxen"]);
}

#[test]
fn test_terms_writes_to_stdout_by_default() {
    let tmp = workspace();
    let mut cmd = wikt_filter(tmp.path());
    cmd.args(["terms", "--categories", "categories.csv", "-i", "101"]);
    cmd.assert().success().stdout("running\n");
}

#[test]
fn test_terms_streaming_ids_match_materialized() {
    let tmp = workspace();
    for extra in [None, Some("--small-memory")] {
        let mut cmd = wikt_filter(tmp.path());
        cmd.args(["terms", "--categories", "categories.csv", "-i", "100", "-e", "102", "--output-ids"]);
        cmd.args(extra);
        cmd.assert().success().stdout("200\n202\n203\n204\n");
    }
}

#[test]
fn test_terms_resolves_titles_through_stubs() {
    let tmp = workspace();
    let mut cmd = wikt_filter(tmp.path());
    cmd.args([
        "terms",
        "--categories",
        "categories.csv",
        "--stubs",
        "stubs.csv",
        "-i",
        "Lemmas",
        "Nowhere",
        "-e",
        "Category:Archaic",
        "--depth",
        "0",
    ]);
    cmd.assert()
        .success()
        .stdout("cat\ncats\ncolour\noxen\n")
        .stderr(predicate::str::contains("could not be resolved"));
}

#[test]
fn test_terms_fails_when_no_include_seed_resolves() {
    let tmp = workspace();
    let mut cmd = wikt_filter(tmp.path());
    cmd.args(["terms", "--categories", "categories.csv", "--stubs", "stubs.csv", "-i", "Nowhere"]);
    cmd.assert().failure().stderr(predicate::str::contains("Nowhere"));
}

#[test]
fn test_terms_sense_filtering() {
    let tmp = workspace();
    let mut cmd = wikt_filter(tmp.path());
    cmd.args([
        "terms",
        "--categories",
        "categories.csv",
        "--redirects",
        "redirects.csv",
        "--pages",
        "pages.xml",
        "--form-of-category",
        "500",
        "--no-form-of-cache",
        "-i",
        "100",
        "-e",
        "102",
        "--label-lang",
        "en",
        "-x",
        "archaic",
        "--report",
        "report.json",
    ]);
    // oxen points at a missing lemma, colour is archaic.
    cmd.assert().success().stdout("cat\ncats\n");

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("report.json")).expect("report")).expect("json");
    assert_eq!(report["output"], 2);
    assert_eq!(report["candidates"], 4);
    assert_eq!(report["senses"]["rejected"], 2);
    assert_eq!(report["senses"]["form_of"]["source"], "computed");
    // "p of" redirects to the alias "pl of", not to the template itself.
    assert_eq!(report["senses"]["chained_redirects"], 1);
}

#[test]
fn test_terms_default_form_of_cache_is_reused() {
    let tmp = workspace();
    let args = [
        "terms",
        "--categories",
        "categories.csv",
        "--redirects",
        "redirects.csv",
        "--pages",
        "pages.xml",
        "--form-of-category",
        "500",
        "-i",
        "100",
        "--parallel",
        "--report",
        "report.json",
    ];

    wikt_filter(tmp.path()).args(args).assert().success();
    let cache_dir = tmp.path().join("cache").join("wikt-filter").join("form-of");
    let cached: Vec<_> = fs::read_dir(&cache_dir).expect("cache dir").collect();
    assert_eq!(cached.len(), 1);

    wikt_filter(tmp.path()).args(args).assert().success().stdout("cat\ncats\ncolour\n");
    let report = fs::read_to_string(tmp.path().join("report.json")).expect("report");
    assert!(report.contains("\"cache_file\""));
}

#[test]
fn test_exclude_labels_without_language_is_rejected() {
    let tmp = workspace();
    let mut cmd = wikt_filter(tmp.path());
    cmd.args([
        "terms",
        "--categories",
        "categories.csv",
        "--redirects",
        "redirects.csv",
        "--pages",
        "pages.xml",
        "-i",
        "100",
        "-x",
        "archaic",
    ]);
    cmd.assert().failure().stderr(predicate::str::contains("label_lang"));
}

#[test]
fn test_terms_reads_discovered_config() {
    let tmp = workspace();
    fs::write(
        tmp.path().join("wikt-filter.toml"),
        "[wikt-filter]\ncategories = 'categories.csv'\ninclude = ['100']\nexclude = '102'\noutput_ids = true\n",
    )
    .expect("config");

    let mut cmd = wikt_filter(tmp.path());
    cmd.arg("terms");
    cmd.assert().success().stdout("200\n202\n203\n204\n");

    // Command-line seeds take precedence over the file.
    let mut cmd = wikt_filter(tmp.path());
    cmd.args(["terms", "-i", "102"]);
    cmd.assert().success().stdout("");
}

#[test]
fn test_explicit_broken_config_fails() {
    let tmp = workspace();
    fs::write(tmp.path().join("broken.toml"), "include = 5\n").expect("config");
    let mut cmd = wikt_filter(tmp.path());
    cmd.args(["terms", "--config", "broken.toml"]);
    cmd.assert().failure().stderr(predicate::str::contains("Invalid TOML config"));
}

#[test]
fn test_closure_ignores_exclusions() {
    let tmp = workspace();
    let mut cmd = wikt_filter(tmp.path());
    cmd.args(["closure", "--categories", "categories.csv", "-i", "100"]);
    cmd.assert().success().stdout("cat\ncats\ncolour\noxen\nrunning\n");
}

#[test]
fn test_redirects_check_lists_chains() {
    let tmp = workspace();
    let mut cmd = wikt_filter(tmp.path());
    cmd.args(["redirects", "check", "redirects.csv"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("p of -> pl of -> ... -> plural of"))
        .stderr(predicate::str::contains("1 double redirect(s) found"));
}

#[test]
fn test_redirects_expand_is_single_hop() {
    let tmp = workspace();
    let mut cmd = wikt_filter(tmp.path());
    cmd.args(["redirects", "expand", "redirects.csv", "plural of", "--templates"]);
    cmd.assert().success().stdout("pl of\nplural form of\nplural of\n");
}

#[test]
fn test_completions_for_bash() {
    let tmp = TempDir::new().expect("tmp");
    let mut cmd = wikt_filter(tmp.path());
    cmd.args(["completions", "bash"]);
    cmd.assert().success().stdout(predicate::str::contains("wikt-filter"));
}

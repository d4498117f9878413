use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TEMPLATE: &str = r#"<html>
<head><title>[TITLE]</title></head>
<body>
    <section class="article-header">
      <span class="resource-card__tag resource-card__tag--[TYPE]">[CATEGORY]</span>
      <h1>[FULL TITLE]</h1>
      <p>[X] min read</p>
    </section>

    <!-- Article Content -->
    <article class="content-body">
      <div class="container container--narrow">
      </div>
    </article>
</body>
</html>
"#;

const INDEX: &str = r#"<html>
<body>
        <div class="resource-grid resource-grid--2col">
        </div>

        <div class="section__footer">
        </div>
</body>
</html>
"#;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sitegen"))
}

fn draft(slug: &str, tag: &str, publish_date: &str) -> String {
    format!(
        "---\nslug: \"{slug}\"\ntitle: \"{slug}\"\nshortTitle: \"{slug}\"\ndescription: \"d\"\ncategory: \"Fleet Operations\"\ntagType: \"{tag}\"\npublishDate: \"{publish_date}\"\nreadTimeMinutes: 4\nhero:\n  src: \"/h.jpg\"\n  alt: \"hero\"\n---\n## Hello\n\nThis is **bold**.\n"
    )
}

fn init_site(root: &Path) {
    let resources = root.join("resources");
    fs::create_dir_all(resources.join("drafts")).unwrap();
    fs::write(root.join("sitegen.yaml"), "timezone: America/New_York\n").unwrap();
    fs::write(resources.join("TEMPLATE-resource-single.html"), TEMPLATE).unwrap();
    fs::write(resources.join("index.html"), INDEX).unwrap();
    fs::write(
        resources.join("resources.manifest.json"),
        r#"{"categoryTags": {"fleet": "Fleet Operations"}, "resources": []}"#,
    )
    .unwrap();
}

#[test]
fn generate_writes_pages_and_summarizes() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    init_site(temp.path());
    fs::write(
        temp.path().join("resources/drafts/fleet.md"),
        draft("fleet-fuel", "fleet", "2026-01-15"),
    )?;

    cli()
        .current_dir(temp.path())
        .arg("generate")
        .assert()
        .success()
        .stdout(contains("fleet.md -> resources/fleet-fuel.html (written)"))
        .stdout(contains("Summary: 1 generated, 0 skipped, 0 errors"));

    let html = fs::read_to_string(temp.path().join("resources/fleet-fuel.html"))?;
    assert!(html.contains("<h2>Hello</h2>"));
    assert!(html.contains("<strong>bold</strong>"));
    Ok(())
}

#[test]
fn rejected_draft_fails_with_data_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    init_site(temp.path());
    fs::write(
        temp.path().join("resources/drafts/bad.md"),
        draft("bad-tag", "marine", "2026-01-15"),
    )?;

    cli()
        .current_dir(temp.path())
        .arg("generate")
        .assert()
        .failure()
        .code(65)
        .stdout(contains("[ERR] bad.md"))
        .stdout(contains("invalid tagType \"marine\""))
        .stdout(contains("Summary: 0 generated, 0 skipped, 1 errors"));

    assert!(!temp.path().join("resources/bad-tag.html").exists());
    Ok(())
}

#[test]
fn index_honors_today_override() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    init_site(temp.path());
    let drafts = temp.path().join("resources/drafts");
    fs::write(drafts.join("a.md"), draft("today-guide", "fleet", "2026-01-15"))?;
    fs::write(drafts.join("b.md"), draft("later-guide", "fleet", "2026-03-01"))?;

    cli()
        .current_dir(temp.path())
        .args(["index", "--today", "2026-01-15"])
        .assert()
        .success()
        .stdout(contains("Today (America/New_York): 2026-01-15"))
        .stdout(contains("Published (publishDate <= today): 1"))
        .stdout(contains("Scheduled for future: 1"))
        .stdout(contains("Newly published today: today-guide"))
        .stdout(contains("Updated resources/index.html"));

    let index = fs::read_to_string(temp.path().join("resources/index.html"))?;
    assert!(index.contains("/resources/today-guide.html"));
    assert!(!index.contains("later-guide"));

    cli()
        .current_dir(temp.path())
        .args(["index", "--today", "2026-01-15"])
        .assert()
        .success()
        .stdout(contains("resources/index.html unchanged"));
    Ok(())
}

#[test]
fn build_json_reports_both_steps() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    init_site(temp.path());
    fs::write(
        temp.path().join("resources/drafts/a.md"),
        draft("fleet-fuel", "fleet", "2026-01-01"),
    )?;

    let output = cli()
        .args(["--root", temp.path().to_str().unwrap(), "--json"])
        .args(["build", "--today", "2026-01-15", "--dry-run"])
        .output()?;
    assert!(output.status.success());

    let payload: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(payload["type"], "build");
    assert_eq!(payload["generation"]["generated"], 1);
    assert_eq!(payload["generation"]["drafts"][0]["write"], "dry_run");
    assert_eq!(payload["index"]["published"][0]["slug"], "fleet-fuel");
    assert_eq!(payload["index"]["changed"], true);

    assert!(!temp.path().join("resources/fleet-fuel.html").exists());
    assert_eq!(fs::read_to_string(temp.path().join("resources/index.html"))?, INDEX);
    Ok(())
}

#[test]
fn check_validates_without_writing() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    init_site(temp.path());
    let drafts = temp.path().join("resources/drafts");
    fs::write(drafts.join("a.md"), draft("fleet-fuel", "fleet", "2026-01-15"))?;
    fs::write(drafts.join("b.md"), "# Notes without front matter\n")?;

    cli()
        .current_dir(drafts.as_path())
        .arg("check")
        .assert()
        .success()
        .stdout(contains("[OK] a.md (fleet-fuel, publishes 2026-01-15)"))
        .stdout(contains("[SKIP] b.md: no front matter"))
        .stdout(contains("Check: 1 valid, 1 skipped, 0 errors"));

    assert!(!temp.path().join("resources/fleet-fuel.html").exists());
    Ok(())
}

#[test]
fn bad_today_is_a_usage_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    init_site(temp.path());

    cli()
        .current_dir(temp.path())
        .args(["index", "--today", "15/01/2026"])
        .assert()
        .failure()
        .code(64)
        .stderr(contains("invalid date"));
    Ok(())
}

#[test]
fn invalid_config_is_a_config_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    init_site(temp.path());
    fs::write(temp.path().join("sitegen.yaml"), "outputDir: dist\n")?;

    cli()
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .failure()
        .code(78);
    Ok(())
}

use splice_core::{BuildOptions, Config, Converter, CopyConverter, build_site, discover_sources};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn site_options(root: &Path) -> BuildOptions {
    BuildOptions::from_config(&Config::default(), root)
}

#[test]
fn converter_built_from_config_resolves_against_site_root() {
    let site = tempdir().unwrap();
    write_file(&site.path().join("_includes/header.html"), "<header/>");

    let converter = CopyConverter::from_config(&Config::default(), site.path());
    assert_eq!(converter.includes_dir(), site.path().join("_includes"));
    assert_eq!(converter.convert("header.html").unwrap(), "<header/>");
}

#[test]
fn discovery_only_returns_claimed_files() {
    let site = tempdir().unwrap();
    write_file(&site.path().join("index.copy"), "header.html");
    write_file(&site.path().join("about.COPY"), "header.html");
    write_file(&site.path().join("style.css"), "body {}");
    write_file(&site.path().join("_includes/header.html"), "<header/>");

    let converter = CopyConverter::from_config(&Config::default(), site.path());
    let sources = discover_sources(&converter, &site_options(site.path())).unwrap();

    assert_eq!(
        sources,
        vec![
            site.path().join("about.COPY"),
            site.path().join("index.copy"),
        ]
    );
}

#[test]
fn discovery_honors_exclude_globs() {
    let site = tempdir().unwrap();
    write_file(&site.path().join("index.copy"), "");
    write_file(&site.path().join("drafts/wip.copy"), "");

    let converter = CopyConverter::from_config(&Config::default(), site.path());
    let mut opts = site_options(site.path());
    opts.exclude = vec!["drafts/**".to_string()];
    let sources = discover_sources(&converter, &opts).unwrap();

    assert_eq!(sources, vec![site.path().join("index.copy")]);
}

#[test]
fn build_places_pages_under_output_dir_with_html_extension() {
    let site = tempdir().unwrap();
    write_file(&site.path().join("_includes/header.html"), "<h1>hi</h1>");
    write_file(&site.path().join("_includes/footer.html"), "<footer/>");
    write_file(&site.path().join("index.copy"), "header.html\nfooter.html");
    write_file(&site.path().join("pages/about.copy"), "header.html");

    let converter = CopyConverter::from_config(&Config::default(), site.path());
    let summary = build_site(&converter, &site_options(site.path()), true).unwrap();

    assert_eq!(summary.pages.len(), 2);
    assert!(summary.failures.is_empty());

    let index = site.path().join("_site/index.html");
    let about = site.path().join("_site/pages/about.html");
    assert_eq!(fs::read_to_string(index).unwrap(), "<h1>hi</h1>\n<footer/>");
    assert_eq!(fs::read_to_string(about).unwrap(), "<h1>hi</h1>");
}

#[test]
fn build_with_missing_include_still_produces_the_page() {
    let site = tempdir().unwrap();
    write_file(&site.path().join("index.copy"), "nowhere.html");

    let converter = CopyConverter::from_config(&Config::default(), site.path());
    let summary = build_site(&converter, &site_options(site.path()), true).unwrap();

    assert_eq!(summary.pages.len(), 1);
    let rendered = fs::read_to_string(site.path().join("_site/index.html")).unwrap();
    let expected = site.path().join("_includes/nowhere.html");
    assert_eq!(rendered, format!("Cannot find file {}", expected.display()));
}

#[test]
fn rebuilding_does_not_consume_pages_already_written() {
    // The output dir sits inside the source dir by default; a second build
    // must not treat the first build's pages as sources.
    let site = tempdir().unwrap();
    write_file(&site.path().join("_includes/a.html"), "a");
    write_file(&site.path().join("index.copy"), "a.html");

    let converter = CopyConverter::from_config(&Config::default(), site.path());
    let opts = site_options(site.path());
    build_site(&converter, &opts, true).unwrap();
    let summary = build_site(&converter, &opts, true).unwrap();

    assert_eq!(summary.pages.len(), 1);
}

use std::fs;
use std::path::{Path, PathBuf};

use oag_client_bundle::resolve::NodeModulesResolver;
use oag_client_bundle::{
    BundleError, BundleOutcome, CLIENT_FILES, ResolveError, generate_client, select_resolver,
};
use oag_core::{OagConfig, ResolverKind};

const INDEX_TS: &str = "export * from './types';\nexport * from './utils';\n";
const TYPES_TS: &str = "export interface Options { baseUrl?: string }\n";
const UTILS_TS: &str = "export const joinPath = (a: string, b: string) => `${a}/${b}`;\n";

fn bundle_config(standalone: bool, bundle: bool) -> OagConfig {
    let mut config = OagConfig::default();
    config.standalone = standalone;
    config.client.bundle = bundle;
    config.client.name = "acme-client".to_string();
    config
}

/// Lay out `<root>/pkgs/acme-client/{dist/index.js, src/*.ts}` and return the entry path.
fn write_package(root: &Path) -> PathBuf {
    let pkg = root.join("pkgs/acme-client");
    fs::create_dir_all(pkg.join("dist")).unwrap();
    fs::create_dir_all(pkg.join("src")).unwrap();
    fs::write(pkg.join("dist/index.js"), "module.exports = {};\n").unwrap();
    fs::write(pkg.join("src/index.ts"), INDEX_TS).unwrap();
    fs::write(pkg.join("src/types.ts"), TYPES_TS).unwrap();
    fs::write(pkg.join("src/utils.ts"), UTILS_TS).unwrap();
    pkg.join("dist/index.js")
}

fn fixed(entry: PathBuf) -> impl Fn(&str) -> Result<PathBuf, ResolveError> {
    move |_: &str| Ok(entry.clone())
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_end_to_end_bundles_sources() {
    let tmp = tempfile::tempdir().unwrap();
    let entry = write_package(tmp.path());
    let output = tmp.path().join("out");

    let outcome = generate_client(
        &bundle_config(true, true),
        &output,
        "acme-client",
        &fixed(entry),
    )
    .unwrap();

    let client_dir = output.join("client");
    match outcome {
        BundleOutcome::Bundled { dir, files } => {
            assert_eq!(dir, client_dir);
            assert_eq!(files.len(), 3);
        }
        BundleOutcome::Skipped => panic!("expected bundling"),
    }
    assert_eq!(dir_entries(&client_dir), ["index.ts", "types.ts", "utils.ts"]);

    let src = tmp.path().join("pkgs/acme-client/src");
    for file in CLIENT_FILES {
        assert_eq!(
            fs::read(client_dir.join(file)).unwrap(),
            fs::read(src.join(file)).unwrap(),
            "{file} differs from source"
        );
    }
}

#[test]
fn test_disabled_bundling_touches_nothing() {
    for (standalone, bundle) in [(false, true), (true, false), (false, false)] {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("out");
        let resolver = |id: &str| -> Result<PathBuf, ResolveError> {
            panic!("resolver called for {id} with bundling disabled")
        };

        let outcome = generate_client(
            &bundle_config(standalone, bundle),
            &output,
            "acme-client",
            &resolver,
        )
        .unwrap();

        assert_eq!(outcome, BundleOutcome::Skipped);
        assert!(!output.exists());
    }
}

#[test]
fn test_second_run_is_identical() {
    let tmp = tempfile::tempdir().unwrap();
    let entry = write_package(tmp.path());
    let output = tmp.path().join("out");
    let config = bundle_config(true, true);
    let resolver = fixed(entry);

    generate_client(&config, &output, "acme-client", &resolver).unwrap();
    let first: Vec<Vec<u8>> = CLIENT_FILES
        .iter()
        .map(|f| fs::read(output.join("client").join(f)).unwrap())
        .collect();

    generate_client(&config, &output, "acme-client", &resolver).unwrap();
    let second: Vec<Vec<u8>> = CLIENT_FILES
        .iter()
        .map(|f| fs::read(output.join("client").join(f)).unwrap())
        .collect();

    assert_eq!(first, second);
    assert_eq!(
        dir_entries(&output.join("client")),
        ["index.ts", "types.ts", "utils.ts"]
    );
}

#[test]
fn test_existing_files_are_overwritten() {
    let tmp = tempfile::tempdir().unwrap();
    let entry = write_package(tmp.path());
    let output = tmp.path().join("out");
    fs::create_dir_all(output.join("client")).unwrap();
    fs::write(output.join("client/types.ts"), "// stale\n").unwrap();

    generate_client(
        &bundle_config(true, true),
        &output,
        "acme-client",
        &fixed(entry),
    )
    .unwrap();

    assert_eq!(
        fs::read_to_string(output.join("client/types.ts")).unwrap(),
        TYPES_TS
    );
}

#[test]
fn test_partial_copy_is_left_in_place() {
    let tmp = tempfile::tempdir().unwrap();
    let entry = write_package(tmp.path());
    fs::remove_file(tmp.path().join("pkgs/acme-client/src/utils.ts")).unwrap();
    let output = tmp.path().join("out");

    let err = generate_client(
        &bundle_config(true, true),
        &output,
        "acme-client",
        &fixed(entry),
    )
    .unwrap_err();

    match err {
        BundleError::Copy { from, to, .. } => {
            assert!(from.ends_with("src/utils.ts"));
            assert_eq!(to, output.join("client/utils.ts"));
        }
        other => panic!("expected Copy, got {other:?}"),
    }
    assert_eq!(dir_entries(&output.join("client")), ["index.ts", "types.ts"]);
}

#[test]
fn test_marker_not_found_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("out");
    let entry = tmp.path().join("pkgs/acme-client/lib/index.js");

    let err = generate_client(
        &bundle_config(true, true),
        &output,
        "acme-client",
        &fixed(entry),
    )
    .unwrap_err();

    assert!(matches!(err, BundleError::MarkerNotFound { .. }));
    assert!(!output.exists());
}

#[test]
fn test_resolution_failure_surfaces() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("out");
    let resolver = NodeModulesResolver::new(tmp.path());

    let err = generate_client(
        &bundle_config(true, true),
        &output,
        "acme-client",
        &resolver,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        BundleError::Resolve(ResolveError::NotFound { .. })
    ));
    assert!(err.to_string().contains("acme-client"));
}

#[test]
fn test_bundles_from_node_modules() {
    let tmp = tempfile::tempdir().unwrap();
    let project = tmp.path().join("app");
    let pkg = project.join("node_modules/acme-client");
    fs::create_dir_all(pkg.join("dist")).unwrap();
    fs::create_dir_all(pkg.join("src")).unwrap();
    fs::write(
        pkg.join("package.json"),
        r#"{ "name": "acme-client", "main": "./dist/index.js" }"#,
    )
    .unwrap();
    fs::write(pkg.join("dist/index.js"), "").unwrap();
    for (file, content) in CLIENT_FILES.iter().zip([INDEX_TS, TYPES_TS, UTILS_TS]) {
        fs::write(pkg.join("src").join(file), content).unwrap();
    }

    let output = project.join("src/generated");
    let resolver = NodeModulesResolver::new(&output);
    generate_client(
        &bundle_config(true, true),
        &output,
        "acme-client",
        &resolver,
    )
    .unwrap();

    assert_eq!(
        fs::read_to_string(output.join("client/utils.ts")).unwrap(),
        UTILS_TS
    );
}

#[test]
fn test_bundles_require_build_in_esm_project() {
    let tmp = tempfile::tempdir().unwrap();
    let project = tmp.path().join("app");
    fs::create_dir_all(&project).unwrap();
    fs::write(project.join("package.json"), r#"{ "type": "module" }"#).unwrap();
    let pkg = project.join("node_modules/acme-client");
    fs::create_dir_all(pkg.join("dist")).unwrap();
    fs::create_dir_all(pkg.join("esm")).unwrap();
    fs::create_dir_all(pkg.join("src")).unwrap();
    fs::write(
        pkg.join("package.json"),
        r#"{ "exports": { "import": "./esm/index.js", "require": "./dist/index.cjs" } }"#,
    )
    .unwrap();
    fs::write(pkg.join("esm/index.js"), "").unwrap();
    fs::write(pkg.join("dist/index.cjs"), "").unwrap();
    for (file, content) in CLIENT_FILES.iter().zip([INDEX_TS, TYPES_TS, UTILS_TS]) {
        fs::write(pkg.join("src").join(file), content).unwrap();
    }

    let output = project.join("src/generated");
    let resolver = select_resolver(ResolverKind::Auto, &project);
    let outcome = generate_client(
        &bundle_config(true, true),
        &output,
        "acme-client",
        &*resolver,
    )
    .unwrap();

    assert!(matches!(outcome, BundleOutcome::Bundled { .. }));
    assert_eq!(
        dir_entries(&output.join("client")),
        ["index.ts", "types.ts", "utils.ts"]
    );
}

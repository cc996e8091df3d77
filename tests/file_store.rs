use homecfg::api::{fields_from_pairs, HomecfgApi, HomecfgPaths};
use homecfg::error::ErrorKind;
use homecfg::store::fs::FileStore;
use std::path::Path;

const SERVICES: &str = "\
- Media:
    # - Plex:
    #     href: http://plex.local
    - Emby:
        href: http://emby.local
        ping: http://emby.local
";

fn api_at(dir: &Path) -> HomecfgApi<FileStore> {
    let paths = HomecfgPaths {
        config_dir: dir.to_path_buf(),
        backup_dir: dir.join("backups"),
    };
    HomecfgApi::new(FileStore::new(dir.join("services.yaml")), paths)
}

#[test]
fn operations_persist_across_api_instances() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("services.yaml"), SERVICES).unwrap();

    let mut api = api_at(dir.path());
    let fields = fields_from_pairs(&["href=http://jelly.local"]).unwrap();
    api.add_entry("Media", "Jellyfin", fields).unwrap();
    api.set_hidden("Media", "Plex", false).unwrap();

    let reopened = api_at(dir.path());
    let document = reopened.list_entries().unwrap().document.unwrap();
    let names: Vec<_> = document.categories[0]
        .entries
        .iter()
        .map(|e| (e.name.as_str(), e.hidden))
        .collect();
    assert_eq!(
        names,
        vec![("Plex", false), ("Emby", false), ("Jellyfin", false)]
    );
}

#[test]
fn first_save_creates_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut api = api_at(dir.path());

    assert!(api.list_entries().unwrap().document.unwrap().is_empty());
    api.create_category("Media").unwrap();
    assert!(dir.path().join("services.yaml").exists());
}

#[test]
fn later_writer_wins() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("services.yaml"), SERVICES).unwrap();

    let mut first = api_at(dir.path());
    let mut second = api_at(dir.path());
    first.set_hidden("Media", "Emby", true).unwrap();
    second.set_hidden("Media", "Emby", false).unwrap();

    let document = api_at(dir.path()).list_entries().unwrap().document.unwrap();
    let emby = document.entry("Media", "Emby").unwrap();
    assert!(!emby.hidden);
}

#[test]
fn backup_needs_an_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let api = api_at(dir.path());
    let err = api.backup().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    std::fs::write(dir.path().join("services.yaml"), SERVICES).unwrap();
    let result = api.backup().unwrap();
    assert_eq!(result.paths.len(), 1);
    assert_eq!(std::fs::read_to_string(&result.paths[0]).unwrap(), SERVICES);
}

#[test]
fn failed_operation_leaves_the_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("services.yaml");
    std::fs::write(&path, SERVICES).unwrap();

    let mut api = api_at(dir.path());
    let err = api.rename_entry("Media", "Emby", "Plex").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), SERVICES);
}

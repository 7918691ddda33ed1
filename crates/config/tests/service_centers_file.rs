use reminder_agent_config::{ConfigError, ServiceCentersConfig};
use std::io::Write;

#[test]
fn test_load_directory_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"centers:
  - id: sc-100
    city_name: Pune
    branch_name: Chakan
    branch_code: PNQ01
    address: Chakan MIDC, Pune
  - id: sc-101
    city_name: Nagpur
    branch_name: Hingna
    branch_code: NAG01
    active: false
"#
    )
    .unwrap();

    let config = ServiceCentersConfig::load(file.path()).unwrap();
    assert_eq!(config.centers.len(), 2);

    let active = config.active_centers();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].branch_code, "PNQ01");
    assert_eq!(active[0].address, "Chakan MIDC, Pune");
}

#[test]
fn test_missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    let err = ServiceCentersConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(_)));
}

#[test]
fn test_malformed_yaml_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "centers: [ this is: not valid").unwrap();
    let err = ServiceCentersConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}

#[test]
fn test_load_or_default_without_path() {
    let config = ServiceCentersConfig::load_or_default(None).unwrap();
    assert!(config.find_by_code("JPR01").is_some());
}

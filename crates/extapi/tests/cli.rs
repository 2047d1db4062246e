use assert_cmd::Command; // Bring Command into scope
use predicates::prelude::*; // Bring predicate traits into scope
use tempfile::tempdir;

fn extapi() -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("extapi")?;
    cmd.env_remove("RUST_LOG");
    Ok(cmd)
}

#[test]
fn test_ping_command() -> Result<(), Box<dyn std::error::Error>> {
    extapi()?
        .arg("--ping")
        .assert()
        .success()
        .stdout(predicate::str::contains("pong"));
    Ok(())
}

#[test]
fn test_no_args_prints_version() -> Result<(), Box<dyn std::error::Error>> {
    extapi()?
        .assert()
        .success()
        .stdout(predicate::str::contains("extapi v"))
        .stdout(predicate::str::contains("pong").not());
    Ok(())
}

#[test]
fn test_extensions_list_and_show() -> Result<(), Box<dyn std::error::Error>> {
    extapi()?
        .args(["extensions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vnfm"))
        .stdout(predicate::str::contains("nfvo"))
        .stdout(predicate::str::contains("monitoring"));

    extapi()?
        .args(["extensions", "show", "vnfm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("VNF Manager"));

    extapi()?
        .args(["extensions", "show", "nope"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Extension with alias nope does not exist"))
        .stderr(predicate::str::contains("404"));
    Ok(())
}

#[test]
fn test_attributes_include_extended_resources() -> Result<(), Box<dyn std::error::Error>> {
    extapi()?
        .args(["attributes", "vnfs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("monitoring_policy"));

    extapi()?
        .args(["attributes", "routers"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown resource 'routers'"));
    Ok(())
}

#[test]
fn test_request_through_middleware() -> Result<(), Box<dyn std::error::Error>> {
    extapi()?
        .args(["request", "GET", "/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("v1.0"))
        .stdout(predicate::str::contains("monitoring"));

    extapi()?
        .args([
            "request",
            "post",
            "/vnfs",
            "--body",
            r#"{"vnf": {"name": "vnf1", "vnfd_id": "d1"}}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("201 Created"))
        .stdout(predicate::str::contains("PENDING_CREATE"));

    extapi()?
        .args(["request", "GET", "/nothing/here"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("404"));
    Ok(())
}

#[test]
fn test_request_body_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let body = dir.path().join("vim.json");
    std::fs::write(
        &body,
        r#"{"vim": {"type": "openstack", "auth_url": "http://keystone:5000", "auth_cred": {}, "vim_project": {}, "name": "site1"}}"#,
    )?;

    extapi()?
        .args(["request", "POST", "/vims", "--body-file"])
        .arg(&body)
        .assert()
        .success()
        .stdout(predicate::str::contains("site1"))
        .stdout(predicate::str::contains("auth_cred").not());

    extapi()?
        .args(["request", "POST", "/vims", "--body-file"])
        .arg(dir.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("read request body"));
    Ok(())
}

#[test]
fn test_drivers() -> Result<(), Box<dyn std::error::Error>> {
    extapi()?
        .args(["drivers", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("openstack"))
        .stdout(predicate::str::contains("kubernetes"));

    extapi()?
        .args([
            "drivers",
            "invoke",
            "openstack",
            "register_vim",
            "--kwargs",
            r#"{"vim_obj": {"auth_url": "http://keystone:5000"}}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://keystone:5000/v3"));

    extapi()?
        .args(["drivers", "invoke", "vmware", "register_vim"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("vmware"));
    Ok(())
}

#[test]
fn test_config_file_selects_drivers() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config = dir.path().join("extapi.json");
    std::fs::write(&config, r#"{"vim_drivers": ["kubernetes"]}"#)?;

    extapi()?
        .arg("--config")
        .arg(&config)
        .args(["drivers", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kubernetes"))
        .stdout(predicate::str::contains("openstack").not());
    Ok(())
}

#[test]
fn test_extra_extension_path_tolerates_bad_modules() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    std::fs::write(dir.path().join("broken.toml"), "exports = [")?;
    std::fs::write(dir.path().join("unknown.toml"), "exports = [\"Unknown\"]\n")?;

    extapi()?
        .arg("--extensions-path")
        .arg(dir.path())
        .args(["extensions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vnfm"))
        .stdout(predicate::str::contains("unknown").not());
    Ok(())
}

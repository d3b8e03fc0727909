//! Building accumulators from a discovered application root.

use anyhow::Result;
use camino::Utf8PathBuf;
use rstest::rstest;
use serde_json::json;
use serial_test::serial;
use strata_config::{APP_ROOT_ENV, ConfigAccumulator, canonicalise};
use test_helpers::figment::{JailResult, figment_error, jail_root, with_jail};

fn canonical_root(jail: &figment::Jail) -> JailResult<Utf8PathBuf> {
    canonicalise(&jail_root(jail)?).map_err(figment_error)
}

#[rstest]
#[serial]
fn discovered_root_supplies_defaults_and_relative_files() -> Result<()> {
    with_jail(|jail| {
        jail.clear_env();
        jail.create_file("package.json", r#"{"name": "jailed", "version": "0.1.0"}"#)?;
        jail.create_dir("config")?;
        jail.create_file("config/app.yaml", "server:\n  port: 8080\n")?;
        let root = canonical_root(jail)?;

        let mut config = ConfigAccumulator::discover().map_err(figment_error)?;
        config.add_file("config/app.yaml").map_err(figment_error)?;
        let value = config.to_value().map_err(figment_error)?;
        let expected = json!({
            "APP_NAME": "jailed",
            "APP_VERSION": "0.1.0",
            "APP_ROOT": root.as_str(),
            "server": {"port": 8080}
        });
        if value != expected {
            return Err(figment_error(format!("unexpected snapshot: {value}")));
        }
        Ok(())
    })
}

#[rstest]
#[serial]
fn environment_root_overrides_the_working_directory() -> Result<()> {
    with_jail(|jail| {
        jail.clear_env();
        jail.create_file("package.json", r#"{"name": "outer"}"#)?;
        jail.create_dir("deployed")?;
        jail.create_file("deployed/package.json", r#"{"name": "deployed"}"#)?;
        let root = canonical_root(jail)?;
        jail.set_env(APP_ROOT_ENV, root.join("deployed").as_str());

        let mut config = ConfigAccumulator::discover().map_err(figment_error)?;
        if config.app_root() != root.join("deployed") {
            return Err(figment_error(format!("unexpected root {}", config.app_root())));
        }
        let value = config.to_value().map_err(figment_error)?;
        if value["APP_NAME"] != json!("deployed") || !value["APP_VERSION"].is_null() {
            return Err(figment_error(format!("unexpected defaults: {value}")));
        }
        Ok(())
    })
}

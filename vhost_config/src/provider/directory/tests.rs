//! Tests for the filesystem layer provider.

use anyhow::{Result, anyhow};
use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use serde_json::json;
use tempfile::TempDir;
use test_helpers::tree::ConfigTree;

use super::*;
use crate::ConfigError;
use crate::provider::LayerProvenance;
use crate::value::RawValue;

struct Workspace {
    _dir: TempDir,
    tree: ConfigTree,
}

impl Workspace {
    fn layers(&self) -> DirectoryLayers {
        DirectoryLayers::new(self.tree.root().to_owned())
    }
}

#[fixture]
fn workspace() -> Workspace {
    let dir = TempDir::new().expect("create temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    Workspace {
        _dir: dir,
        tree: ConfigTree::new(root),
    }
}

#[rstest]
fn missing_base_is_none(workspace: Workspace) -> Result<()> {
    let layers = workspace.layers();
    assert!(layers.base().map_err(|e| anyhow!("{e}"))?.is_none());
    assert!(layers.base_location().ends_with("config/config.toml"));
    Ok(())
}

#[rstest]
fn missing_root_behaves_like_empty_sources() -> Result<()> {
    let layers = DirectoryLayers::new("/nonexistent/vhost-config-root");
    assert!(layers.base().map_err(|e| anyhow!("{e}"))?.is_none());
    assert!(layers.defaults().map_err(|e| anyhow!("{e}"))?.parameters().is_empty());
    assert!(layers.list_virtualhosts().map_err(|e| anyhow!("{e}"))?.is_empty());
    Ok(())
}

#[rstest]
fn reads_each_layer_with_provenance(workspace: Workspace) -> Result<()> {
    workspace.tree.defaults("timeout = 10\n\"db.port\" = 5432\n")?;
    workspace.tree.base("timeout = 20\n")?;
    workspace.tree.virtualhost("tenant1", "timeout = 30\n")?;
    let layers = workspace.layers();

    let defaults = layers.defaults().map_err(|e| anyhow!("{e}"))?;
    assert_eq!(defaults.provenance(), LayerProvenance::Defaults);
    assert_eq!(
        defaults.parameters().get("db.port").and_then(RawValue::as_static),
        Some(&json!(5432))
    );

    let base = layers.base().map_err(|e| anyhow!("{e}"))?.ok_or_else(|| anyhow!("base"))?;
    assert_eq!(base.provenance(), LayerProvenance::Base);
    assert!(base.path().is_some_and(|p| p.ends_with("config/config.toml")));

    let tenant = layers
        .virtualhost("tenant1")
        .map_err(|e| anyhow!("{e}"))?
        .ok_or_else(|| anyhow!("tenant layer"))?;
    assert_eq!(tenant.provenance(), LayerProvenance::Virtualhost);
    assert_eq!(
        tenant.parameters().get("timeout").and_then(RawValue::as_static),
        Some(&json!(30))
    );
    Ok(())
}

#[rstest]
fn lists_override_files_only(workspace: Workspace) -> Result<()> {
    workspace.tree.base("")?;
    workspace.tree.virtualhost("beta", "")?;
    workspace.tree.virtualhost("alpha", "")?;
    workspace.tree.file("config/notes.txt", "ignored")?;
    workspace.tree.file("config/.conf.toml", "")?;
    let found = workspace
        .layers()
        .list_virtualhosts()
        .map_err(|e| anyhow!("{e}"))?;
    assert_eq!(found, vec!["alpha".to_owned(), "beta".to_owned()]);
    Ok(())
}

#[rstest]
#[case("chain = \"trim\"", &["trim"])]
#[case("chain = [\"trim\", \"uppercase\"]", &["trim", "uppercase"])]
#[case("chain = []", &[])]
fn parses_processor_chains(
    workspace: Workspace,
    #[case] contents: &str,
    #[case] expected: &[&str],
) -> Result<()> {
    workspace.tree.processors(contents)?;
    let chains = workspace
        .layers()
        .processor_chains()
        .map_err(|e| anyhow!("{e}"))?;
    let chain = chains.get("chain").ok_or_else(|| anyhow!("chain present"))?;
    assert_eq!(chain, expected);
    Ok(())
}

#[rstest]
#[case("chain = 3")]
#[case("chain = [\"trim\", 3]")]
fn rejects_malformed_processor_chains(workspace: Workspace, #[case] contents: &str) -> Result<()> {
    workspace.tree.processors(contents)?;
    let err = workspace
        .layers()
        .processor_chains()
        .err()
        .ok_or_else(|| anyhow!("expected a malformed chain error"))?;
    assert!(matches!(err.as_ref(), ConfigError::File { .. }), "{err:?}");
    Ok(())
}

#[rstest]
fn reports_parse_errors_with_path(workspace: Workspace) -> Result<()> {
    workspace.tree.base("timeout = = 3")?;
    let err = workspace
        .layers()
        .base()
        .err()
        .ok_or_else(|| anyhow!("expected a parse error"))?;
    assert_eq!(err.code(), "config_file_invalid");
    assert!(err.to_string().contains("config.toml"), "{err}");
    Ok(())
}

#[rstest]
fn virtualhost_names_cannot_escape_the_root(workspace: Workspace) -> Result<()> {
    workspace.tree.base("")?;
    let found = workspace
        .layers()
        .virtualhost("../../etc/passwd")
        .map_err(|e| anyhow!("{e}"))?;
    assert!(found.is_none());
    Ok(())
}

#[cfg(not(feature = "json5"))]
#[rstest]
fn json_needs_the_json5_feature(workspace: Workspace) -> Result<()> {
    workspace.tree.file("config/config.json", "{}")?;
    let layers = DirectoryLayers::builder(workspace.tree.root().to_owned())
        .extension("json")
        .build();
    assert!(layers.base().is_err());
    Ok(())
}

#[test]
fn from_env_reads_the_root() -> Result<()> {
    test_helpers::jail::with_config_root(CONFIG_DIR_ENV, &[], |jail, tree| {
        let layers = DirectoryLayers::from_env()
            .ok_or_else(|| figment::Error::from("expected a provider"))?;
        assert_eq!(layers.root(), tree.root());
        jail.set_env(CONFIG_DIR_ENV, "");
        assert!(DirectoryLayers::from_env().is_none());
        Ok(())
    })
}

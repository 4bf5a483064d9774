//! End-to-end resolution over configuration files on disk.

use anyhow::{Result, anyhow};
use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::json;
use tempfile::TempDir;
use test_helpers::tree::ConfigTree;
use vhost_config::{CONFIG_DIR_ENV, ConfigError, DirectoryLayers, Resolver, ResultIntoFigment};

struct Site {
    _dir: TempDir,
    tree: ConfigTree,
}

impl Site {
    fn resolver(&self) -> Resolver {
        Resolver::new(DirectoryLayers::new(self.tree.root().to_owned()))
    }
}

#[fixture]
fn site() -> Site {
    let dir = TempDir::new().expect("create temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    Site {
        _dir: dir,
        tree: ConfigTree::new(root),
    }
}

#[rstest]
fn override_file_wins_over_base_and_defaults(site: Site) -> Result<()> {
    site.tree.defaults("timeout = 10\nretries = 3\n")?;
    site.tree.base("timeout = 20\nvirtualhost = \"tenant1\"\n")?;
    site.tree.virtualhost("tenant1", "timeout = 30\n")?;
    let resolver = site.resolver();
    assert_eq!(resolver.get("timeout").map_err(|e| anyhow!("{e}"))?, Some(json!(30)));
    assert_eq!(resolver.get("retries").map_err(|e| anyhow!("{e}"))?, Some(json!(3)));
    assert_eq!(resolver.current_virtualhost().as_deref(), Some("tenant1"));
    Ok(())
}

#[rstest]
fn missing_override_file_is_reported_by_path(site: Site) -> Result<()> {
    site.tree.base("virtualhost = \"tenant1\"\n")?;
    let err = site
        .resolver()
        .get("timeout")
        .err()
        .ok_or_else(|| anyhow!("expected a missing override"))?;
    assert_eq!(err.code(), "config_file_missing");
    match err.as_ref() {
        ConfigError::MissingConfigSource { path } => {
            assert!(path.ends_with("config/tenant1.conf.toml"), "{path}");
        }
        other => return Err(anyhow!("unexpected error: {other}")),
    }
    Ok(())
}

#[rstest]
fn missing_base_file_is_reported_by_path(site: Site) -> Result<()> {
    site.tree.defaults("timeout = 10\n")?;
    let err = site
        .resolver()
        .exists("timeout")
        .err()
        .ok_or_else(|| anyhow!("expected a missing base"))?;
    assert!(err.to_string().contains("config.toml"), "{err}");
    Ok(())
}

#[rstest]
fn processor_file_drives_value_cleanup(site: Site) -> Result<()> {
    site.tree.processors("admins = [\"trim\", \"csv\"]\nmode = \"lowercase\"\n")?;
    site.tree.base("admins = \"  a@x , b@x  \"\nmode = \"STRICT\"\n")?;
    let resolver = site.resolver();
    assert_eq!(
        resolver.get("admins").map_err(|e| anyhow!("{e}"))?,
        Some(json!(["a@x", "b@x"]))
    );
    assert_eq!(resolver.get("mode").map_err(|e| anyhow!("{e}"))?, Some(json!("strict")));
    Ok(())
}

#[rstest]
fn unknown_processor_in_file_fails_on_access(site: Site) -> Result<()> {
    site.tree.processors("name = \"nonexistent\"\n")?;
    site.tree.base("name = \"x\"\nother = 1\n")?;
    let resolver = site.resolver();
    assert_eq!(resolver.get("other").map_err(|e| anyhow!("{e}"))?, Some(json!(1)));
    let err = resolver
        .get("name")
        .err()
        .ok_or_else(|| anyhow!("expected an unknown processor"))?;
    assert_eq!(err.code(), "config_unknown_processor");
    Ok(())
}

#[rstest]
fn family_query_over_dotted_keys(site: Site) -> Result<()> {
    site.tree.defaults("\"db.host\" = \"localhost\"\n")?;
    site.tree.base("\"db.port\" = 5432\n\"dbx\" = true\n")?;
    let resolver = site.resolver();
    assert_eq!(
        resolver.get("db.*").map_err(|e| anyhow!("{e}"))?,
        Some(json!({"host": "localhost", "port": 5432}))
    );
    Ok(())
}

#[derive(Debug, Deserialize, PartialEq)]
struct Smtp {
    host: String,
    port: u16,
}

#[rstest]
fn tables_deserialise_into_structs(site: Site) -> Result<()> {
    site.tree.base("[smtp]\nhost = \"mail.internal\"\nport = 25\n")?;
    let smtp: Option<Smtp> = site.resolver().get_as("smtp").map_err(|e| anyhow!("{e}"))?;
    assert_eq!(
        smtp,
        Some(Smtp {
            host: "mail.internal".to_owned(),
            port: 25,
        })
    );
    Ok(())
}

#[rstest]
fn edits_are_seen_only_after_an_explicit_reload(site: Site) -> Result<()> {
    site.tree.base("timeout = 20\n")?;
    site.tree.virtualhost("tenant1", "")?;
    let resolver = site.resolver();
    assert_eq!(resolver.get("timeout").map_err(|e| anyhow!("{e}"))?, Some(json!(20)));

    site.tree.base("timeout = 25\n")?;
    resolver.load(None).map_err(|e| anyhow!("{e}"))?;
    assert_eq!(resolver.get("timeout").map_err(|e| anyhow!("{e}"))?, Some(json!(20)));

    resolver.load(Some("tenant1")).map_err(|e| anyhow!("{e}"))?;
    assert_eq!(resolver.get("timeout").map_err(|e| anyhow!("{e}"))?, Some(json!(25)));
    Ok(())
}

#[rstest]
fn malformed_file_surfaces_on_first_access(site: Site) -> Result<()> {
    site.tree.base("timeout = \n")?;
    let err = site
        .resolver()
        .get("timeout")
        .err()
        .ok_or_else(|| anyhow!("expected a parse error"))?;
    assert_eq!(err.code(), "config_file_invalid");
    Ok(())
}

#[test]
fn root_can_come_from_the_environment() -> Result<()> {
    let files = [
        ("config/config.toml", "greeting = \"hello\"\nvirtualhost = \"eu\"\n"),
        ("config/eu.conf.toml", "greeting = \"hallo\"\n"),
    ];
    test_helpers::jail::with_config_root(CONFIG_DIR_ENV, &files, |_jail, _tree| {
        let layers = DirectoryLayers::from_env()
            .ok_or_else(|| figment::Error::from("expected a provider"))?;
        let resolver = Resolver::new(layers);
        assert_eq!(resolver.get("greeting").to_figment()?, Some(json!("hallo")));
        assert_eq!(resolver.list_virtualhosts().to_figment()?, vec!["eu".to_owned()]);
        Ok(())
    })
}

#[test]
fn resolver_errors_surface_inside_a_jail() -> Result<()> {
    let files = [("config/config.toml", "[smtp]\nport = \"twenty-five\"\n")];
    let message = test_helpers::jail::with_config_root(CONFIG_DIR_ENV, &files, |_jail, tree| {
        let resolver = Resolver::new(DirectoryLayers::new(tree.root().to_owned()));
        let Err(err) = resolver.get_as::<Smtp>("smtp").to_figment() else {
            return Err(figment::Error::from("expected a type mismatch"));
        };
        Ok(err.to_string())
    })?;
    assert!(message.contains("JSON error"), "{message}");
    Ok(())
}

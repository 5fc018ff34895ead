// Integration suite for discovery, bootstrap loading, and the admin listing,
// driven against throwaway theme trees.
mod support;

use anyhow::Result;
use serde_json::Value;
use std::fs;
use support::{SiteFixture, write_component};
use theme_components::{
    Bootstrap, ComponentListing, ComponentRecord, ComponentRegistry, StaticSite, discover,
    discover_components,
};

#[test]
fn two_roots_yield_template_then_override_records() -> Result<()> {
    let site = SiteFixture::new()?;
    let a = site.component("base", "a", &["@version 1.0"])?;
    let b = site.component("child", "b", &["@subpackage Fancy Box"])?;

    let records = discover(&site.layout())?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].filepath, a);
    assert_eq!(records[0].name, "a");
    assert_eq!(records[0].version, "1.0");
    assert_eq!(records[1].filepath, b);
    assert_eq!(records[1].name, "Fancy Box");
    Ok(())
}

#[test]
fn identical_roots_are_scanned_once() -> Result<()> {
    let site = SiteFixture::new()?;
    site.component("base", "hero", &["@version 1"])?;
    site.component("base", "group/card", &["@subpackage my-widget"])?;

    let base = site.theme("base");
    let records = discover_components(&base, &base)?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "My Widget");
    assert_eq!(records[0].slug, "group/card");
    assert_eq!(records[1].name, "hero");

    let via_layout = discover(&site.layout_for("base"))?;
    assert_eq!(via_layout, records);
    Ok(())
}

#[test]
fn same_slug_in_both_roots_is_not_deduplicated() -> Result<()> {
    let site = SiteFixture::new()?;
    site.component("base", "hero", &["@version 1"])?;
    site.component("child", "hero", &["@version 2"])?;

    let records = discover(&site.layout())?;
    let versions: Vec<&str> = records.iter().map(|r| r.version.as_str()).collect();
    assert_eq!(versions, vec!["1", "2"]);
    assert!(records.iter().all(|r| r.slug == "hero"));
    Ok(())
}

#[test]
fn tree_without_markers_is_empty() -> Result<()> {
    let site = SiteFixture::new()?;
    fs::create_dir_all(site.theme("base").join("theme-components").join("empty"))?;
    fs::write(
        site.theme("base")
            .join("theme-components")
            .join("empty")
            .join("readme.txt"),
        "not a component",
    )?;
    assert!(discover(&site.layout())?.is_empty());
    Ok(())
}

#[test]
fn discovery_order_is_stable() -> Result<()> {
    let site = SiteFixture::new()?;
    for slug in ["zeta", "alpha", "mid/inner", "beta"] {
        site.component("base", slug, &[])?;
    }
    let first = discover(&site.layout())?;
    let second = discover(&site.layout())?;
    assert_eq!(first, second);
    let slugs: Vec<&str> = first.iter().map(|r| r.slug.as_str()).collect();
    assert_eq!(slugs, vec!["alpha", "beta", "mid/inner", "zeta"]);
    Ok(())
}

#[test]
fn bootstrap_provisions_and_loads_once() -> Result<()> {
    let site = SiteFixture::new()?;
    site.component("base", "hero", &["@subpackage hero-banner"])?;
    site.component("base", "footer", &[])?;
    let layout = site.layout();

    let mut registry: ComponentRegistry<Vec<String>> = ComponentRegistry::new();
    registry.register(
        "hero",
        |host: &mut Vec<String>, record: &ComponentRecord| -> Result<()> {
            host.push(record.name.clone());
            Ok(())
        },
    );

    let mut host = Vec::new();
    let mut bootstrap = Bootstrap::new();
    let report = bootstrap.run(&layout, &registry, &mut host)?;

    assert!(site.theme("child").join("theme-components").is_dir());
    assert_eq!(host, vec!["Hero Banner".to_string()]);
    assert_eq!(report.loaded.len(), 1);
    assert_eq!(report.unregistered.len(), 1);

    let again = bootstrap.run(&layout, &registry, &mut host)?;
    assert_eq!(host.len(), 1);
    assert_eq!(again.already_loaded, report.loaded);
    Ok(())
}

#[test]
fn override_component_runs_in_place_of_template_with_same_slug() -> Result<()> {
    let site = SiteFixture::new()?;
    let template = site.component("base", "hero", &["@version 1"])?;
    let child = site.component("child", "hero", &["@version 2"])?;
    let layout = site.layout();

    let mut registry: ComponentRegistry<Vec<String>> = ComponentRegistry::new();
    registry.register(
        "hero",
        |host: &mut Vec<String>, record: &ComponentRecord| -> Result<()> {
            host.push(record.version.clone());
            Ok(())
        },
    );

    let mut host = Vec::new();
    let mut bootstrap = Bootstrap::new();
    let report = bootstrap.run(&layout, &registry, &mut host)?;
    assert_eq!(host, vec!["2".to_string()]);
    assert_eq!(report.loaded, vec![child]);
    assert_eq!(report.shadowed, vec![template]);

    bootstrap.run(&layout, &registry, &mut host)?;
    assert_eq!(host.len(), 1);
    Ok(())
}

#[test]
fn bootstrap_continues_when_override_cannot_be_provisioned() -> Result<()> {
    let site = SiteFixture::new()?;
    site.component("base", "hero", &[])?;
    let layout = site.layout_for("missing-child");

    let mut registry: ComponentRegistry<u32> = ComponentRegistry::new();
    registry.register("hero", |count: &mut u32, _: &ComponentRecord| -> Result<()> {
        *count += 1;
        Ok(())
    });

    let mut count = 0;
    let report = Bootstrap::new().run(&layout, &registry, &mut count)?;
    assert_eq!(count, 1);
    assert_eq!(report.loaded.len(), 1);
    assert!(!site.theme("missing-child").exists());
    Ok(())
}

#[test]
fn admin_page_lists_discovered_components() -> Result<()> {
    let site = SiteFixture::new()?;
    site.component(
        "base",
        "hero",
        &[
            "Full-width hero banner",
            "@subpackage hero-banner",
            "@author Jane",
            "@version 1.4",
            "@link https://git.example.com/hero",
        ],
    )?;
    site.component("child", "plain", &[])?;
    let layout = site.layout();
    let services = StaticSite {
        layout: &layout,
        can_edit: true,
    };

    let html = ComponentListing::new(&layout, &services).render_page();
    assert!(html.contains("<strong>Hero Banner</strong>"));
    assert!(html.contains("<p>Full-width hero banner</p><p>Version 1.4 | by Jane</p>"));
    assert!(html.contains("theme=base\">Edit</a> | <a href=\"https://git.example.com/hero\""));
    assert!(html.contains("theme=child\">Edit</a></p>"));
    assert!(html.contains("<strong>plain</strong>"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn unreadable_marker_fails_discovery_but_not_the_page() -> Result<()> {
    let site = SiteFixture::new()?;
    site.component("base", "ok", &[])?;
    let broken_dir = site.theme("base").join("theme-components").join("broken");
    fs::create_dir_all(&broken_dir)?;
    std::os::unix::fs::symlink(broken_dir.join("gone.php"), broken_dir.join("component.php"))?;
    let layout = site.layout();

    let err = discover(&layout).expect_err("dangling marker should fail");
    assert!(format!("{err:#}").contains("broken"));

    let services = StaticSite {
        layout: &layout,
        can_edit: false,
    };
    let html = ComponentListing::new(&layout, &services).render_page();
    assert!(html.contains("<tbody id=\"the-list\">\n</tbody>"));
    Ok(())
}

#[test]
fn records_serialize_for_listing_output() -> Result<()> {
    let site = SiteFixture::new()?;
    write_component(&site.theme("base"), "hero", &["@version 3", "@author Sam"])?;

    let records = discover(&site.layout())?;
    let value: Value = serde_json::to_value(&records)?;
    let first = &value[0];
    assert_eq!(first["name"], "hero");
    assert_eq!(first["version"], "3");
    assert_eq!(first["author"], "Sam");
    assert_eq!(first["repository"], "");
    assert!(first["filepath"].as_str().unwrap_or("").ends_with("component.php"));
    Ok(())
}

#[test]
fn asset_url_points_at_component_directory() -> Result<()> {
    let site = SiteFixture::new()?;
    let marker = site.component("child", "gallery", &[])?;
    let layout = site.layout();
    let services = StaticSite {
        layout: &layout,
        can_edit: false,
    };
    let url = ComponentListing::new(&layout, &services).asset_url(&marker);
    assert_eq!(
        url,
        "https://example.com/themes/child/theme-components/gallery/"
    );
    Ok(())
}

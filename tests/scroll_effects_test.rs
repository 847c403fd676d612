use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use velocity_arena::adapters::{visibility_channel, ChannelObserver};
use velocity_arena::config::{NavigationConfig, ParallaxConfig, RevealConfig};
use velocity_arena::core::attributes::{PageElement, ATTR_PARALLAX};
use velocity_arena::domain::model::{
    ElementId, NavButton, ScrollBehavior, ScrollMetrics, SectionBox, VisibilityEvent,
};
use velocity_arena::domain::ports::PageSurface;
use velocity_arena::{MemorySurface, Navigator, Parallax, RevealController};

fn page(surface: &MemorySurface) -> Arc<dyn PageSurface> {
    Arc::new(surface.clone())
}

fn ids(names: &[&str]) -> Vec<ElementId> {
    names.iter().map(|name| ElementId::new(*name)).collect()
}

#[tokio::test]
async fn test_reveal_adds_visible_class_on_intersection() -> Result<()> {
    let (feed, observer) = visibility_channel();
    let surface = MemorySurface::new();
    let mut reveal = RevealController::new(&RevealConfig::default(), observer, page(&surface));

    assert_eq!(reveal.register(&ids(&["hero", "stats"])).await?, 2);

    feed.notify(VisibilityEvent::entered("hero", 0.05))?;
    feed.notify(VisibilityEvent::entered("hero", 0.2))?;
    feed.notify(VisibilityEvent::left("stats"))?;
    feed.notify(VisibilityEvent::entered("hero", 0.9))?;
    drop(feed);

    reveal.run().await;

    let hero = ElementId::new("hero");
    let stats = ElementId::new("stats");
    assert!(surface.has_class(&hero, "visible"));
    assert!(reveal.is_revealed(&hero));
    assert!(!surface.has_class(&stats, "visible"));

    reveal.hide(&hero);
    assert!(!surface.has_class(&hero, "visible"));
    assert!(!reveal.is_revealed(&hero));

    // 元素持續被觀察，可以再次顯示
    assert!(reveal.handle_event(&VisibilityEvent::entered("hero", 0.5)));
    assert!(surface.has_class(&hero, "visible"));
    Ok(())
}

#[tokio::test]
async fn test_reveal_falls_back_without_observer() -> Result<()> {
    let surface = MemorySurface::new();
    let mut reveal = RevealController::new(
        &RevealConfig::default(),
        ChannelObserver::unsupported(),
        page(&surface),
    );

    assert_eq!(reveal.register(&ids(&["a", "b", "c"])).await?, 3);
    for name in ["a", "b", "c"] {
        assert!(surface.has_class(&ElementId::new(name), "visible"));
        assert!(reveal.is_revealed(&ElementId::new(name)));
    }
    assert_eq!(reveal.revealed_count(), 3);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_delayed_reveal() -> Result<()> {
    let (_feed, observer) = visibility_channel();
    let surface = MemorySurface::new();
    let mut reveal = RevealController::new(&RevealConfig::default(), observer, page(&surface));
    let card = ElementId::new("card");

    let task = reveal.reveal(&card, Duration::from_millis(300));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!surface.has_class(&card, "visible"));
    assert!(!reveal.is_revealed(&card));

    task.await?;
    assert!(surface.has_class(&card, "visible"));
    assert!(reveal.is_revealed(&card));

    reveal.hide(&card);
    assert!(!reveal.is_revealed(&card));
    assert!(!surface.has_class(&card, "visible"));
    Ok(())
}

fn landing_sections() -> Vec<SectionBox> {
    vec![
        SectionBox { id: "hero".to_string(), top: 0.0, height: 800.0 },
        SectionBox { id: "stats".to_string(), top: 800.0, height: 600.0 },
        SectionBox { id: "contact".to_string(), top: 1400.0, height: 600.0 },
    ]
}

fn nav_buttons() -> Vec<NavButton> {
    ["hero", "stats", "contact"]
        .iter()
        .map(|section| NavButton {
            element: ElementId::new(format!("nav-{}", section)),
            section: section.to_string(),
        })
        .collect()
}

#[test]
fn test_navigator_tracks_scroll() {
    let surface = MemorySurface::new();
    let mut nav = Navigator::new(
        &NavigationConfig::default(),
        page(&surface),
        nav_buttons(),
        landing_sections(),
    );

    let metrics = ScrollMetrics { scroll_top: 750.0, scroll_height: 2000.0, client_height: 1000.0 };
    assert_eq!(nav.on_scroll(metrics), Some("stats"));
    assert_eq!(
        surface.style(&ElementId::new("progressBar"), "width").as_deref(),
        Some("75%")
    );
    assert!(surface.has_class(&ElementId::new("nav-stats"), "active"));
    assert!(!surface.has_class(&ElementId::new("nav-hero"), "active"));

    let top = ScrollMetrics { scroll_top: 0.0, scroll_height: 2000.0, client_height: 1000.0 };
    assert_eq!(nav.on_scroll(top), Some("hero"));
    assert!(surface.has_class(&ElementId::new("nav-hero"), "active"));
    assert!(!surface.has_class(&ElementId::new("nav-stats"), "active"));
    assert_eq!(nav.active_section(), Some("hero"));
}

#[test]
fn test_nav_click_scrolls_below_nav_bar() {
    let surface = MemorySurface::new();
    let mut nav = Navigator::new(
        &NavigationConfig::default(),
        page(&surface),
        nav_buttons(),
        landing_sections(),
    );

    let request = nav.on_nav_click(&ElementId::new("nav-contact")).unwrap();
    assert_eq!(request.top, 1320.0);
    assert_eq!(request.behavior, ScrollBehavior::Smooth);
    assert!(surface.has_class(&ElementId::new("nav-contact"), "active"));

    nav.on_nav_click(&ElementId::new("nav-hero"));
    assert!(!surface.has_class(&ElementId::new("nav-contact"), "active"));
    assert!(surface.has_class(&ElementId::new("nav-hero"), "active"));

    assert!(nav.on_nav_click(&ElementId::new("unknown")).is_none());
    assert!(nav.scroll_to_section("pricing").is_none());
}

#[test]
fn test_parallax_translates_layers() {
    let surface = MemorySurface::new();
    let elements = vec![
        PageElement::new("bg").with_attribute(ATTR_PARALLAX, "0.25"),
        PageElement::new("clouds").with_attribute(ATTR_PARALLAX, "oops"),
    ];
    let parallax = Parallax::new(&ParallaxConfig::default(), page(&surface), &elements);
    assert_eq!(parallax.layers().len(), 2);

    parallax.on_scroll(400.0);
    assert_eq!(
        surface.style(&ElementId::new("bg"), "transform").as_deref(),
        Some("translateY(100px)")
    );
    assert_eq!(
        surface.style(&ElementId::new("clouds"), "transform").as_deref(),
        Some("translateY(200px)")
    );
}
